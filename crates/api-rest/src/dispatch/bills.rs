use super::{
    decode, delete_one, fetch_all, fetch_one, fetch_where, insert_new, query, transition,
    unroutable, update_from_body, Incoming, Transition,
};
use crate::codec::{ApiResult, Reply};
use crate::routes::{Action, Operation};
use carehub_core::model::Bill;
use carehub_core::Repositories;
use carehub_types::{Amount, RecordKey};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BillFilter {
    /// Only bills issued to this patient.
    pub patient_id: Option<String>,
}

/// Fields a bill update may change. The paid flag only ever moves through the pay action.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BillUpdate {
    #[schema(value_type = String, example = "PAT1")]
    pub patient_id: RecordKey,
    #[schema(value_type = f64, example = 150.0)]
    pub amount: Amount,
    pub description: String,
}

const PAY: Transition<Bill> = Transition {
    is_set: |b| b.paid,
    set: |b| b.paid = true,
    state: "paid",
    verb: "paying",
};

pub(crate) fn dispatch(repos: &Repositories, op: Operation, req: &Incoming<'_>) -> ApiResult {
    match op {
        Operation::List => list_bills(repos, req),
        Operation::Create => create_bill(repos, req.body),
        Operation::Read(id) => get_bill(repos, &id),
        Operation::Update(id) => update_bill(repos, &id, req.body),
        Operation::Delete(id) => delete_bill(repos, &id),
        Operation::Transition(id, Action::Pay) => pay_bill(repos, &id),
        other => Err(unroutable(&other)),
    }
}

#[utoipa::path(
    get,
    path = "/api/bills",
    tag = "bills",
    operation_id = "list_bills",
    params(BillFilter),
    responses(
        (status = 200, description = "Matching bills", body = [Bill]),
        (status = 400, description = "Invalid query string", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub(crate) fn list_bills(repos: &Repositories, req: &Incoming<'_>) -> ApiResult {
    let filter: BillFilter = query(req.uri)?;
    let repo = repos.bills.as_ref();

    let bills = match filter.patient_id.as_deref() {
        None => fetch_all(repo)?,
        Some(patient_id) => fetch_where(repo, &|b: &Bill| b.patient_id == patient_id)?,
    };
    Ok(Reply::ok(&bills))
}

#[utoipa::path(
    post,
    path = "/api/bills",
    tag = "bills",
    operation_id = "create_bill",
    request_body = Bill,
    responses(
        (status = 201, description = "Bill issued", body = Bill),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 409, description = "Bill ID already exists", body = ErrorBody)
    )
)]
pub(crate) fn create_bill(repos: &Repositories, body: &[u8]) -> ApiResult {
    let bill: Bill = decode(body)?;
    Ok(Reply::created(&insert_new(repos.bills.as_ref(), bill)?))
}

#[utoipa::path(
    get,
    path = "/api/bills/{id}",
    tag = "bills",
    operation_id = "get_bill",
    params(("id" = String, Path, description = "Bill ID, e.g. BILL1")),
    responses(
        (status = 200, description = "The bill", body = Bill),
        (status = 404, description = "Bill not found", body = ErrorBody)
    )
)]
pub(crate) fn get_bill(repos: &Repositories, id: &str) -> ApiResult {
    Ok(Reply::ok(&fetch_one(repos.bills.as_ref(), id)?))
}

#[utoipa::path(
    put,
    path = "/api/bills/{id}",
    tag = "bills",
    operation_id = "update_bill",
    params(("id" = String, Path, description = "Bill ID, e.g. BILL1")),
    request_body = BillUpdate,
    responses(
        (status = 200, description = "Updated bill", body = Bill),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 404, description = "Bill not found", body = ErrorBody)
    )
)]
pub(crate) fn update_bill(repos: &Repositories, id: &str, body: &[u8]) -> ApiResult {
    let updated = update_from_body(
        repos.bills.as_ref(),
        id,
        body,
        |bill: &mut Bill, update: &BillUpdate| {
            bill.patient_id = update.patient_id.clone();
            bill.amount = update.amount;
            bill.description = update.description.clone();
        },
    )?;
    Ok(Reply::ok(&updated))
}

#[utoipa::path(
    delete,
    path = "/api/bills/{id}",
    tag = "bills",
    operation_id = "delete_bill",
    params(("id" = String, Path, description = "Bill ID, e.g. BILL1")),
    responses(
        (status = 200, description = "Bill deleted", body = MessageRes),
        (status = 404, description = "Bill not found", body = ErrorBody)
    )
)]
pub(crate) fn delete_bill(repos: &Repositories, id: &str) -> ApiResult {
    delete_one(repos.bills.as_ref(), id)
}

#[utoipa::path(
    post,
    path = "/api/bills/{id}/pay",
    tag = "bills",
    operation_id = "pay_bill",
    params(("id" = String, Path, description = "Bill ID, e.g. BILL1")),
    responses(
        (status = 200, description = "Bill marked as paid", body = MessageRes),
        (status = 400, description = "Bill already paid", body = ErrorBody),
        (status = 404, description = "Bill not found", body = ErrorBody)
    )
)]
pub(crate) fn pay_bill(repos: &Repositories, id: &str) -> ApiResult {
    transition(repos.bills.as_ref(), id, &PAY)
}

#[cfg(test)]
mod tests {
    use super::super::testing::{call, dispatcher, outcome};
    use axum::http::Method;
    use serde_json::{json, Value};

    fn consultation(id: &str, patient_id: &str) -> Value {
        json!({
            "billId": id,
            "patientId": patient_id,
            "amount": 150.0,
            "description": "Consultation"
        })
    }

    #[test]
    fn test_create_defaults_to_unpaid() {
        let d = dispatcher();
        let (status, created) = outcome(call(
            &d,
            Method::POST,
            "/api/bills",
            consultation("BILL1", "PAT1"),
        ));
        assert_eq!(status, 201);
        assert_eq!(created["paid"], false);
        assert_eq!(created["amount"], 150.0);
    }

    #[test]
    fn test_negative_amount_is_rejected() {
        let d = dispatcher();
        let mut bill = consultation("BILL1", "PAT1");
        bill["amount"] = json!(-5.0);
        let (status, _) = outcome(call(&d, Method::POST, "/api/bills", bill));
        assert_eq!(status, 400);
    }

    #[test]
    fn test_pay_twice() {
        let d = dispatcher();
        call(&d, Method::POST, "/api/bills", consultation("BILL1", "PAT1")).unwrap();

        let (status, body) = outcome(call(&d, Method::POST, "/api/bills/BILL1/pay", Value::Null));
        assert_eq!(status, 200);
        assert_eq!(body, json!({"message": "Bill BILL1 marked as paid"}));

        for _ in 0..3 {
            let (status, body) =
                outcome(call(&d, Method::POST, "/api/bills/BILL1/pay", Value::Null));
            assert_eq!(status, 400);
            assert_eq!(
                body,
                json!({"error": "Bill BILL1 is already paid", "status": "400"})
            );
        }

        let (_, stored) = outcome(call(&d, Method::GET, "/api/bills/BILL1", Value::Null));
        assert_eq!(stored["paid"], true);
    }

    #[test]
    fn test_pay_unknown_bill() {
        let d = dispatcher();
        let (status, body) = outcome(call(&d, Method::POST, "/api/bills/BILL9/pay", Value::Null));
        assert_eq!(status, 404);
        assert_eq!(body["error"], "Bill with ID BILL9 not found");
    }

    #[test]
    fn test_update_keeps_paid_flag() {
        let d = dispatcher();
        call(&d, Method::POST, "/api/bills", consultation("BILL1", "PAT1")).unwrap();
        call(&d, Method::POST, "/api/bills/BILL1/pay", Value::Null).unwrap();

        let mut update = consultation("BILL1", "PAT1");
        update["amount"] = json!(200.0);
        update["paid"] = json!(false);
        let (status, updated) = outcome(call(&d, Method::PUT, "/api/bills/BILL1", update));
        assert_eq!(status, 200);
        assert_eq!(updated["amount"], 200.0);
        assert_eq!(updated["paid"], true);
    }

    #[test]
    fn test_list_filters_by_patient() {
        let d = dispatcher();
        for (id, patient) in [("BILL1", "PAT1"), ("BILL2", "PAT2"), ("BILL3", "PAT1")] {
            call(&d, Method::POST, "/api/bills", consultation(id, patient)).unwrap();
        }

        let (status, listed) =
            outcome(call(&d, Method::GET, "/api/bills?patientId=PAT1", Value::Null));
        assert_eq!(status, 200);
        let ids: Vec<&str> = listed
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["billId"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["BILL1", "BILL3"]);
    }

    #[test]
    fn test_concurrent_pay_succeeds_exactly_once() {
        let d = dispatcher();
        call(&d, Method::POST, "/api/bills", consultation("BILL1", "PAT1")).unwrap();

        let statuses: Vec<u16> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..16)
                .map(|_| {
                    scope.spawn(|| {
                        outcome(call(&d, Method::POST, "/api/bills/BILL1/pay", Value::Null)).0
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().expect("worker should not panic"))
                .collect()
        });

        assert_eq!(statuses.iter().filter(|&&s| s == 200).count(), 1);
        assert_eq!(statuses.iter().filter(|&&s| s == 400).count(), 15);
    }
}
