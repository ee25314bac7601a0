use super::{
    decode, delete_one, fetch_all, fetch_one, insert_new, unroutable, update_from_body, Incoming,
};
use crate::codec::{ApiResult, Reply};
use crate::routes::Operation;
use carehub_core::model::Doctor;
use carehub_core::Repositories;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorUpdate {
    pub name: String,
    pub specialization: String,
    #[schema(example = "9AM-5PM")]
    pub availability: String,
}

pub(crate) fn dispatch(repos: &Repositories, op: Operation, req: &Incoming<'_>) -> ApiResult {
    match op {
        Operation::List => list_doctors(repos),
        Operation::Create => create_doctor(repos, req.body),
        Operation::Read(id) => get_doctor(repos, &id),
        Operation::Update(id) => update_doctor(repos, &id, req.body),
        Operation::Delete(id) => delete_doctor(repos, &id),
        other => Err(unroutable(&other)),
    }
}

#[utoipa::path(
    get,
    path = "/api/doctors",
    tag = "doctors",
    operation_id = "list_doctors",
    responses(
        (status = 200, description = "All doctors", body = [Doctor]),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub(crate) fn list_doctors(repos: &Repositories) -> ApiResult {
    Ok(Reply::ok(&fetch_all(repos.doctors.as_ref())?))
}

#[utoipa::path(
    post,
    path = "/api/doctors",
    tag = "doctors",
    operation_id = "create_doctor",
    request_body = Doctor,
    responses(
        (status = 201, description = "Doctor created", body = Doctor),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 409, description = "Doctor ID already exists", body = ErrorBody)
    )
)]
pub(crate) fn create_doctor(repos: &Repositories, body: &[u8]) -> ApiResult {
    let doctor: Doctor = decode(body)?;
    Ok(Reply::created(&insert_new(repos.doctors.as_ref(), doctor)?))
}

#[utoipa::path(
    get,
    path = "/api/doctors/{id}",
    tag = "doctors",
    operation_id = "get_doctor",
    params(("id" = String, Path, description = "Doctor ID, e.g. DOC1")),
    responses(
        (status = 200, description = "The doctor", body = Doctor),
        (status = 404, description = "Doctor not found", body = ErrorBody)
    )
)]
pub(crate) fn get_doctor(repos: &Repositories, id: &str) -> ApiResult {
    Ok(Reply::ok(&fetch_one(repos.doctors.as_ref(), id)?))
}

#[utoipa::path(
    put,
    path = "/api/doctors/{id}",
    tag = "doctors",
    operation_id = "update_doctor",
    params(("id" = String, Path, description = "Doctor ID, e.g. DOC1")),
    request_body = DoctorUpdate,
    responses(
        (status = 200, description = "Updated doctor", body = Doctor),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 404, description = "Doctor not found", body = ErrorBody)
    )
)]
pub(crate) fn update_doctor(repos: &Repositories, id: &str, body: &[u8]) -> ApiResult {
    let updated = update_from_body(
        repos.doctors.as_ref(),
        id,
        body,
        |doctor: &mut Doctor, update: &DoctorUpdate| {
            doctor.name = update.name.clone();
            doctor.specialization = update.specialization.clone();
            doctor.availability = update.availability.clone();
        },
    )?;
    Ok(Reply::ok(&updated))
}

#[utoipa::path(
    delete,
    path = "/api/doctors/{id}",
    tag = "doctors",
    operation_id = "delete_doctor",
    params(("id" = String, Path, description = "Doctor ID, e.g. DOC1")),
    responses(
        (status = 200, description = "Doctor deleted", body = MessageRes),
        (status = 404, description = "Doctor not found", body = ErrorBody)
    )
)]
pub(crate) fn delete_doctor(repos: &Repositories, id: &str) -> ApiResult {
    delete_one(repos.doctors.as_ref(), id)
}

#[cfg(test)]
mod tests {
    use super::super::testing::{call, dispatcher, outcome};
    use axum::http::Method;
    use serde_json::{json, Value};

    fn smith() -> Value {
        json!({
            "doctorId": "DOC1",
            "name": "Dr. Smith",
            "specialization": "Cardiology",
            "availability": "9AM-5PM"
        })
    }

    #[test]
    fn test_create_then_get_returns_input() {
        let d = dispatcher();
        let (status, created) = outcome(call(&d, Method::POST, "/api/doctors", smith()));
        assert_eq!(status, 201);
        assert_eq!(created, smith());

        let (status, fetched) = outcome(call(&d, Method::GET, "/api/doctors/DOC1", Value::Null));
        assert_eq!(status, 200);
        assert_eq!(fetched, smith());
    }

    #[test]
    fn test_malformed_ids_are_accepted() {
        let d = dispatcher();
        let mut doctor = smith();
        doctor["doctorId"] = json!("smith-cardio");
        let (status, _) = outcome(call(&d, Method::POST, "/api/doctors", doctor));
        assert_eq!(status, 201);
    }

    #[test]
    fn test_id_with_space_is_reachable_when_encoded() {
        let d = dispatcher();
        let mut doctor = smith();
        doctor["doctorId"] = json!("DOC 1");
        let (status, _) = outcome(call(&d, Method::POST, "/api/doctors", doctor.clone()));
        assert_eq!(status, 201);

        let (status, fetched) = outcome(call(&d, Method::GET, "/api/doctors/DOC%201", Value::Null));
        assert_eq!(status, 200);
        assert_eq!(fetched, doctor);

        let (status, body) = outcome(call(&d, Method::DELETE, "/api/doctors/DOC%201", Value::Null));
        assert_eq!(status, 200);
        assert_eq!(body["message"], "Doctor DOC 1 deleted successfully");
    }

    #[test]
    fn test_id_that_is_not_utf8_is_bad_request() {
        let d = dispatcher();
        let (status, body) = outcome(call(&d, Method::GET, "/api/doctors/DOC%FF", Value::Null));
        assert_eq!(status, 400);
        assert_eq!(body["error"], "Doctor ID is not valid UTF-8");
    }

    #[test]
    fn test_blank_id_is_rejected() {
        let d = dispatcher();
        let mut doctor = smith();
        doctor["doctorId"] = json!("  ");
        let (status, _) = outcome(call(&d, Method::POST, "/api/doctors", doctor));
        assert_eq!(status, 400);
    }

    #[test]
    fn test_update_replaces_fields() {
        let d = dispatcher();
        call(&d, Method::POST, "/api/doctors", smith()).unwrap();

        let (status, updated) = outcome(call(
            &d,
            Method::PUT,
            "/api/doctors/DOC1",
            json!({"name": "Dr. Smith", "specialization": "Oncology", "availability": "10AM-2PM"}),
        ));
        assert_eq!(status, 200);
        assert_eq!(updated["specialization"], "Oncology");
        assert_eq!(updated["doctorId"], "DOC1");
    }

    #[test]
    fn test_update_and_delete_unknown_doctor() {
        let d = dispatcher();
        let (status, body) = outcome(call(&d, Method::PUT, "/api/doctors/DOC9", smith()));
        assert_eq!(status, 404);
        assert_eq!(body["error"], "Doctor with ID DOC9 not found");

        let (status, _) = outcome(call(&d, Method::DELETE, "/api/doctors/DOC9", Value::Null));
        assert_eq!(status, 404);
    }
}
