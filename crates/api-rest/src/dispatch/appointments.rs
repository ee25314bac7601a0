//! Appointments. Names of the patient and doctor are cached when an appointment is booked and
//! never re-resolved afterwards.

use super::{
    decode, delete_one, fetch_all, fetch_one, fetch_where, insert_new, query, transition,
    unroutable, update_from_body, Incoming, Transition,
};
use crate::codec::{ApiError, ApiResult, Reply};
use crate::routes::{Action, Operation};
use carehub_core::model::Appointment;
use carehub_core::{Entity, Repositories, Repository};
use carehub_types::RecordKey;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AppointmentFilter {
    /// Only appointments for this patient.
    pub patient_id: Option<String>,
    /// Only appointments with this doctor.
    pub doctor_id: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentUpdate {
    #[schema(value_type = String, example = "PAT1")]
    pub patient_id: RecordKey,
    #[schema(value_type = String, example = "DOC1")]
    pub doctor_id: RecordKey,
    #[schema(example = "2024-05-01")]
    pub date: String,
    #[schema(example = "10:30")]
    pub time: String,
    pub description: String,
}

const COMPLETE: Transition<Appointment> = Transition {
    is_set: |a| a.completed,
    set: |a| a.completed = true,
    state: "completed",
    verb: "completing",
};

pub(crate) fn dispatch(repos: &Repositories, op: Operation, req: &Incoming<'_>) -> ApiResult {
    match op {
        Operation::List => list_appointments(repos, req),
        Operation::Create => create_appointment(repos, req.body),
        Operation::Read(id) => get_appointment(repos, &id),
        Operation::Update(id) => update_appointment(repos, &id, req.body),
        Operation::Delete(id) => delete_appointment(repos, &id),
        Operation::Transition(id, Action::Complete) => complete_appointment(repos, &id),
        other => Err(unroutable(&other)),
    }
}

#[utoipa::path(
    get,
    path = "/api/appointments",
    tag = "appointments",
    operation_id = "list_appointments",
    params(AppointmentFilter),
    responses(
        (status = 200, description = "Matching appointments", body = [Appointment]),
        (status = 400, description = "Invalid query string", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub(crate) fn list_appointments(repos: &Repositories, req: &Incoming<'_>) -> ApiResult {
    let filter: AppointmentFilter = query(req.uri)?;
    let repo = repos.appointments.as_ref();

    let appointments = match (&filter.patient_id, &filter.doctor_id) {
        (None, None) => fetch_all(repo)?,
        (patient_id, doctor_id) => fetch_where(repo, &|a: &Appointment| {
            patient_id.as_deref().map_or(true, |p| a.patient_id == p)
                && doctor_id.as_deref().map_or(true, |d| a.doctor_id == d)
        })?,
    };
    Ok(Reply::ok(&appointments))
}

#[utoipa::path(
    post,
    path = "/api/appointments",
    tag = "appointments",
    operation_id = "create_appointment",
    request_body = Appointment,
    responses(
        (status = 201, description = "Appointment booked", body = Appointment),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 409, description = "Appointment ID already exists", body = ErrorBody)
    )
)]
pub(crate) fn create_appointment(repos: &Repositories, body: &[u8]) -> ApiResult {
    let mut appointment: Appointment = decode(body)?;

    if appointment.patient_name.is_none() {
        appointment.patient_name =
            cached_name(repos.patients.as_ref(), &appointment.patient_id, |p| {
                p.name.clone()
            })?;
    }
    if appointment.doctor_name.is_none() {
        appointment.doctor_name =
            cached_name(repos.doctors.as_ref(), &appointment.doctor_id, |d| {
                d.name.clone()
            })?;
    }

    Ok(Reply::created(&insert_new(
        repos.appointments.as_ref(),
        appointment,
    )?))
}

// An unknown patient or doctor is not an error; the name just stays empty.
fn cached_name<E: Entity>(
    repo: &dyn Repository<E>,
    id: &RecordKey,
    name: impl Fn(&E) -> String,
) -> Result<Option<String>, ApiError> {
    let found = repo.find(id.as_str()).map_err(|e| {
        ApiError::internal(format!("Error resolving {} name", E::LABEL.to_lowercase()), e)
    })?;
    Ok(found.as_ref().map(name))
}

#[utoipa::path(
    get,
    path = "/api/appointments/{id}",
    tag = "appointments",
    operation_id = "get_appointment",
    params(("id" = String, Path, description = "Appointment ID, e.g. APP1")),
    responses(
        (status = 200, description = "The appointment", body = Appointment),
        (status = 404, description = "Appointment not found", body = ErrorBody)
    )
)]
pub(crate) fn get_appointment(repos: &Repositories, id: &str) -> ApiResult {
    Ok(Reply::ok(&fetch_one(repos.appointments.as_ref(), id)?))
}

#[utoipa::path(
    put,
    path = "/api/appointments/{id}",
    tag = "appointments",
    operation_id = "update_appointment",
    params(("id" = String, Path, description = "Appointment ID, e.g. APP1")),
    request_body = AppointmentUpdate,
    responses(
        (status = 200, description = "Updated appointment", body = Appointment),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 404, description = "Appointment not found", body = ErrorBody)
    )
)]
pub(crate) fn update_appointment(repos: &Repositories, id: &str, body: &[u8]) -> ApiResult {
    let updated = update_from_body(
        repos.appointments.as_ref(),
        id,
        body,
        |appointment: &mut Appointment, update: &AppointmentUpdate| {
            appointment.patient_id = update.patient_id.clone();
            appointment.doctor_id = update.doctor_id.clone();
            appointment.date = update.date.clone();
            appointment.time = update.time.clone();
            appointment.description = update.description.clone();
        },
    )?;
    Ok(Reply::ok(&updated))
}

#[utoipa::path(
    delete,
    path = "/api/appointments/{id}",
    tag = "appointments",
    operation_id = "delete_appointment",
    params(("id" = String, Path, description = "Appointment ID, e.g. APP1")),
    responses(
        (status = 200, description = "Appointment deleted", body = MessageRes),
        (status = 404, description = "Appointment not found", body = ErrorBody)
    )
)]
pub(crate) fn delete_appointment(repos: &Repositories, id: &str) -> ApiResult {
    delete_one(repos.appointments.as_ref(), id)
}

#[utoipa::path(
    post,
    path = "/api/appointments/{id}/complete",
    tag = "appointments",
    operation_id = "complete_appointment",
    params(("id" = String, Path, description = "Appointment ID, e.g. APP1")),
    responses(
        (status = 200, description = "Appointment marked as completed", body = MessageRes),
        (status = 400, description = "Appointment already completed", body = ErrorBody),
        (status = 404, description = "Appointment not found", body = ErrorBody)
    )
)]
pub(crate) fn complete_appointment(repos: &Repositories, id: &str) -> ApiResult {
    transition(repos.appointments.as_ref(), id, &COMPLETE)
}
