use super::{
    decode, delete_one, fetch_all, fetch_one, insert_new, unroutable, update_from_body, Incoming,
};
use crate::codec::{ApiError, ApiResult, Reply};
use crate::routes::Operation;
use carehub_api_shared::DeleteAllRes;
use carehub_core::model::{Gender, Patient};
use carehub_core::Repositories;
use carehub_types::Age;
use serde::Deserialize;
use utoipa::ToSchema;

/// Demographic fields a patient update may change. Allergies, medications and history are
/// managed separately and always carried over from the stored record.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientUpdate {
    pub name: String,
    #[schema(value_type = u8, example = 36)]
    pub age: Age,
    pub gender: Gender,
    pub address: String,
    pub phone: String,
}

pub(crate) fn dispatch(repos: &Repositories, op: Operation, req: &Incoming<'_>) -> ApiResult {
    match op {
        Operation::List => list_patients(repos),
        Operation::Create => create_patient(repos, req.body),
        Operation::Read(id) => get_patient(repos, &id),
        Operation::Update(id) => update_patient(repos, &id, req.body),
        Operation::Delete(id) => delete_patient(repos, &id),
        Operation::DeleteAll => delete_all_patients(repos),
        other => Err(unroutable(&other)),
    }
}

#[utoipa::path(
    get,
    path = "/api/patients",
    tag = "patients",
    operation_id = "list_patients",
    responses(
        (status = 200, description = "All patients", body = [Patient]),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub(crate) fn list_patients(repos: &Repositories) -> ApiResult {
    Ok(Reply::ok(&fetch_all(repos.patients.as_ref())?))
}

#[utoipa::path(
    post,
    path = "/api/patients",
    tag = "patients",
    operation_id = "create_patient",
    request_body = Patient,
    responses(
        (status = 201, description = "Patient created", body = Patient),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 409, description = "Patient ID already exists", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub(crate) fn create_patient(repos: &Repositories, body: &[u8]) -> ApiResult {
    let patient: Patient = decode(body)?;
    let created = insert_new(repos.patients.as_ref(), patient)?;
    Ok(Reply::created(&created))
}

#[utoipa::path(
    get,
    path = "/api/patients/{id}",
    tag = "patients",
    operation_id = "get_patient",
    params(("id" = String, Path, description = "Patient ID, e.g. PAT1")),
    responses(
        (status = 200, description = "The patient", body = Patient),
        (status = 404, description = "Patient not found", body = ErrorBody)
    )
)]
pub(crate) fn get_patient(repos: &Repositories, id: &str) -> ApiResult {
    Ok(Reply::ok(&fetch_one(repos.patients.as_ref(), id)?))
}

#[utoipa::path(
    put,
    path = "/api/patients/{id}",
    tag = "patients",
    operation_id = "update_patient",
    params(("id" = String, Path, description = "Patient ID, e.g. PAT1")),
    request_body = PatientUpdate,
    responses(
        (status = 200, description = "Updated patient", body = Patient),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 404, description = "Patient not found", body = ErrorBody)
    )
)]
pub(crate) fn update_patient(repos: &Repositories, id: &str, body: &[u8]) -> ApiResult {
    let updated = update_from_body(
        repos.patients.as_ref(),
        id,
        body,
        |patient: &mut Patient, update: &PatientUpdate| {
            patient.name = update.name.clone();
            patient.age = update.age;
            patient.gender = update.gender;
            patient.address = update.address.clone();
            patient.phone = update.phone.clone();
        },
    )?;
    Ok(Reply::ok(&updated))
}

#[utoipa::path(
    delete,
    path = "/api/patients/{id}",
    tag = "patients",
    operation_id = "delete_patient",
    params(("id" = String, Path, description = "Patient ID, e.g. PAT1")),
    responses(
        (status = 200, description = "Patient deleted", body = MessageRes),
        (status = 404, description = "Patient not found", body = ErrorBody)
    )
)]
pub(crate) fn delete_patient(repos: &Repositories, id: &str) -> ApiResult {
    delete_one(repos.patients.as_ref(), id)
}

#[utoipa::path(
    delete,
    path = "/api/patients/deleteAll",
    tag = "patients",
    operation_id = "delete_all_patients",
    responses(
        (status = 200, description = "Every patient deleted", body = DeleteAllRes),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub(crate) fn delete_all_patients(repos: &Repositories) -> ApiResult {
    let deleted = repos
        .patients
        .remove_all()
        .map_err(|e| ApiError::internal("Error deleting patients", e))?;
    tracing::info!(deleted, "deleted all patients");
    Ok(Reply::ok(&DeleteAllRes {
        message: format!("Deleted {deleted} patients"),
        deleted_count: deleted,
    }))
}
