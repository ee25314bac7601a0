//! CRUD dispatch: one module per resource, sharing the guarded helpers below.
//!
//! Guards that must not race (create-if-absent, update-if-present, flip-a-flag-once) are each
//! a single repository call, so two requests for the same record cannot both pass a guard.

pub(crate) mod appointments;
pub(crate) mod auth;
pub(crate) mod bills;
pub(crate) mod doctors;
pub(crate) mod patients;
pub(crate) mod users;

use crate::codec::{ApiError, ApiResult, Reply};
use crate::routes::{Operation, Resource, RouteError, RouteTable};
use axum::http::{Method, Uri};
use carehub_api_shared::HealthService;
use carehub_core::{Entity, Modified, Repositories, Repository};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A request after the transport has read it.
pub(crate) struct Incoming<'a> {
    pub uri: &'a Uri,
    pub body: &'a [u8],
}

/// Resolves requests against the route table and runs them against the repositories.
///
/// Synchronous: every call blocks on the store. The HTTP layer runs it off the async runtime.
pub struct Dispatcher {
    routes: RouteTable,
    repos: Repositories,
    health: HealthService,
}

impl Dispatcher {
    pub fn new(repos: Repositories) -> Self {
        Self {
            routes: RouteTable::new(),
            repos,
            health: HealthService::new(),
        }
    }

    pub fn repositories(&self) -> &Repositories {
        &self.repos
    }

    pub fn handle(&self, method: &Method, uri: &Uri, body: &[u8]) -> ApiResult {
        let route = self.routes.resolve(method, uri.path())?;
        let req = Incoming { uri, body };
        let repos = &self.repos;

        match route.resource {
            Resource::Health => health(&self.health, repos),
            Resource::Login => auth::login(repos, &req),
            Resource::Patients => patients::dispatch(repos, route.operation, &req),
            Resource::Doctors => doctors::dispatch(repos, route.operation, &req),
            Resource::Appointments => appointments::dispatch(repos, route.operation, &req),
            Resource::Bills => bills::dispatch(repos, route.operation, &req),
            Resource::Users => users::dispatch(repos, route.operation, &req),
        }
    }
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    operation_id = "health",
    responses(
        (status = 200, description = "Store reachability; DOWN is still a 200", body = HealthRes)
    )
)]
pub(crate) fn health(service: &HealthService, repos: &Repositories) -> ApiResult {
    Ok(Reply::ok(&service.check(repos.store.as_ref())))
}

/// For operations the route table never produces for a resource.
pub(crate) fn unroutable(op: &Operation) -> ApiError {
    tracing::warn!(?op, "operation has no handler");
    RouteError::NotFound.into()
}

/// Decodes a request body that must be a JSON object.
pub(crate) fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::bad_request(format!("Invalid request: {e}")))?;
    if !value.is_object() {
        return Err(ApiError::bad_request(
            "Invalid request: body must be a JSON object",
        ));
    }
    serde_json::from_value(value)
        .map_err(|e| ApiError::bad_request(format!("Invalid request: {e}")))
}

/// Decodes the query string, ignoring parameters `T` does not name.
pub(crate) fn query<T: DeserializeOwned>(uri: &Uri) -> Result<T, ApiError> {
    axum::extract::Query::<T>::try_from_uri(uri)
        .map(|q| q.0)
        .map_err(|e| ApiError::bad_request(format!("Invalid request: {e}")))
}

fn label_lower<E: Entity>() -> String {
    E::LABEL.to_lowercase()
}

pub(crate) fn not_found_with_id<E: Entity>(id: &str) -> ApiError {
    ApiError::not_found(format!("{} with ID {id} not found", E::LABEL))
}

pub(crate) fn fetch_all<E: Entity>(repo: &dyn Repository<E>) -> Result<Vec<E>, ApiError> {
    repo.find_all()
        .map_err(|e| ApiError::internal(format!("Error fetching {}", E::PLURAL), e))
}

pub(crate) fn fetch_where<E: Entity>(
    repo: &dyn Repository<E>,
    predicate: &dyn Fn(&E) -> bool,
) -> Result<Vec<E>, ApiError> {
    repo.find_where(predicate)
        .map_err(|e| ApiError::internal(format!("Error fetching {}", E::PLURAL), e))
}

/// Looks up a record for a read, failing with `<Label> not found`.
pub(crate) fn fetch_one<E: Entity>(repo: &dyn Repository<E>, id: &str) -> Result<E, ApiError> {
    repo.find(id)
        .map_err(|e| ApiError::internal(format!("Error fetching {}", label_lower::<E>()), e))?
        .ok_or_else(|| ApiError::not_found(format!("{} not found", E::LABEL)))
}

/// Inserts a new record; an existing key is a conflict and the stored record is left alone.
pub(crate) fn insert_new<E: Entity>(repo: &dyn Repository<E>, entity: E) -> Result<E, ApiError> {
    let id = entity.key().to_string();
    let inserted = repo
        .insert(entity.clone())
        .map_err(|e| ApiError::internal(format!("Error creating {}", label_lower::<E>()), e))?;
    if !inserted {
        tracing::warn!(collection = E::COLLECTION, %id, "create rejected: id already exists");
        return Err(ApiError::Conflict(format!(
            "{} with ID {id} already exists",
            E::LABEL
        )));
    }
    tracing::info!(collection = E::COLLECTION, %id, "created");
    Ok(entity)
}

/// Applies `change` to an existing record in one repository call.
pub(crate) fn apply_update<E: Entity>(
    repo: &dyn Repository<E>,
    id: &str,
    mut change: impl FnMut(&mut E),
) -> Result<E, ApiError> {
    let outcome = repo
        .modify(id, &mut |entity: &mut E| {
            change(entity);
            true
        })
        .map_err(|e| ApiError::internal(format!("Error updating {}", label_lower::<E>()), e))?;

    match outcome {
        Modified::Written(entity) => {
            tracing::info!(collection = E::COLLECTION, %id, "updated");
            Ok(entity)
        }
        Modified::Rejected(_) => Err(ApiError::internal(
            format!("Error updating {}", label_lower::<E>()),
            "change was rejected by the store",
        )),
        Modified::Missing => Err(not_found_with_id::<E>(id)),
    }
}

/// Update shared by every resource: the target must exist before the body is even decoded, and
/// the path id is authoritative.
pub(crate) fn update_from_body<E: Entity, U: DeserializeOwned>(
    repo: &dyn Repository<E>,
    id: &str,
    body: &[u8],
    merge: impl Fn(&mut E, &U),
) -> Result<E, ApiError> {
    let exists = repo
        .exists(id)
        .map_err(|e| ApiError::internal(format!("Error updating {}", label_lower::<E>()), e))?;
    if !exists {
        return Err(not_found_with_id::<E>(id));
    }
    let update: U = decode(body)?;
    apply_update(repo, id, |entity| merge(entity, &update))
}

pub(crate) fn delete_one<E: Entity>(repo: &dyn Repository<E>, id: &str) -> ApiResult {
    let removed = repo
        .remove(id)
        .map_err(|e| ApiError::internal(format!("Error deleting {}", label_lower::<E>()), e))?;
    if !removed {
        return Err(not_found_with_id::<E>(id));
    }
    tracing::info!(collection = E::COLLECTION, %id, "deleted");
    Ok(Reply::message(format!("{} {id} deleted successfully", E::LABEL)))
}

/// A one-way flag flip.
pub(crate) struct Transition<E> {
    pub is_set: fn(&E) -> bool,
    pub set: fn(&mut E),
    /// Past participle for messages, e.g. `paid`.
    pub state: &'static str,
    /// Verb for error context, e.g. `paying`.
    pub verb: &'static str,
}

/// Flips the flag if it is clear. A flag that is already set is a bad request and nothing is
/// written, so retrying a transition always fails after the first success.
pub(crate) fn transition<E: Entity>(
    repo: &dyn Repository<E>,
    id: &str,
    t: &Transition<E>,
) -> ApiResult {
    let outcome = repo
        .modify(id, &mut |entity: &mut E| {
            if (t.is_set)(entity) {
                return false;
            }
            (t.set)(entity);
            true
        })
        .map_err(|e| ApiError::internal(format!("Error {} {}", t.verb, label_lower::<E>()), e))?;

    match outcome {
        Modified::Written(_) => {
            tracing::info!(collection = E::COLLECTION, %id, state = t.state, "transitioned");
            Ok(Reply::message(format!("{} {id} marked as {}", E::LABEL, t.state)))
        }
        Modified::Rejected(_) => {
            tracing::warn!(
                collection = E::COLLECTION,
                %id,
                state = t.state,
                "already in target state"
            );
            Err(ApiError::bad_request(format!(
                "{} {id} is already {}",
                E::LABEL,
                t.state
            )))
        }
        Modified::Missing => Err(not_found_with_id::<E>(id)),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Helpers shared by the dispatcher tests.

    use super::*;
    use carehub_core::{StoreError, StoreResult};
    use serde_json::json;
    use std::sync::Arc;

    pub fn dispatcher() -> Dispatcher {
        Dispatcher::new(Repositories::in_memory())
    }

    pub fn call(d: &Dispatcher, method: Method, uri: &str, body: Value) -> ApiResult {
        let uri: Uri = uri.parse().expect("valid uri");
        let bytes = if body.is_null() {
            Vec::new()
        } else {
            serde_json::to_vec(&body).expect("serialisable body")
        };
        d.handle(&method, &uri, &bytes)
    }

    /// Status and body of a dispatch result, as the client would see them.
    pub fn outcome(result: ApiResult) -> (u16, Value) {
        match result {
            Ok(reply) => (
                reply.status().as_u16(),
                reply.body().cloned().unwrap_or(Value::Null),
            ),
            Err(err) => (
                err.status().as_u16(),
                json!({"error": err.to_string(), "status": err.status().as_u16().to_string()}),
            ),
        }
    }

    /// A repository whose every call fails, as if the store had gone away.
    pub struct FailingRepository;

    impl<E: Entity> Repository<E> for FailingRepository {
        fn insert(&self, _entity: E) -> StoreResult<bool> {
            Err(StoreError::Closed)
        }
        fn find(&self, _key: &str) -> StoreResult<Option<E>> {
            Err(StoreError::Closed)
        }
        fn find_all(&self) -> StoreResult<Vec<E>> {
            Err(StoreError::Closed)
        }
        fn modify(
            &self,
            _key: &str,
            _change: &mut dyn FnMut(&mut E) -> bool,
        ) -> StoreResult<Modified<E>> {
            Err(StoreError::Closed)
        }
        fn remove(&self, _key: &str) -> StoreResult<bool> {
            Err(StoreError::Closed)
        }
        fn remove_all(&self) -> StoreResult<usize> {
            Err(StoreError::Closed)
        }
    }

    pub fn failing_repositories() -> Repositories {
        let mut repos = Repositories::in_memory();
        repos.patients = Arc::new(FailingRepository);
        repos.doctors = Arc::new(FailingRepository);
        repos.appointments = Arc::new(FailingRepository);
        repos.bills = Arc::new(FailingRepository);
        repos.users = Arc::new(FailingRepository);
        repos
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use serde_json::json;

    #[test]
    fn test_health_reports_up_then_down() {
        let store = std::sync::Arc::new(carehub_core::DocumentStore::in_memory());
        let d = Dispatcher::new(Repositories::open(store.clone()));

        let (status, body) = outcome(call(&d, Method::GET, "/health", Value::Null));
        assert_eq!(status, 200);
        assert_eq!(body["status"], "UP");
        assert_eq!(body["database"], "Connected");

        store.close();
        let (status, body) = outcome(call(&d, Method::GET, "/health", Value::Null));
        assert_eq!(status, 200);
        assert_eq!(body["status"], "DOWN");
        assert_eq!(body["database"], "Disconnected");
    }

    #[test]
    fn test_route_errors() {
        let d = dispatcher();
        assert_eq!(
            outcome(call(&d, Method::GET, "/api/nurses", Value::Null)),
            (404, json!({"error": "Endpoint not found", "status": "404"}))
        );
        assert_eq!(
            outcome(call(&d, Method::PATCH, "/api/patients", Value::Null)),
            (405, json!({"error": "Method not allowed", "status": "405"}))
        );
        assert_eq!(
            outcome(call(&d, Method::GET, "/api/doctors/", Value::Null)),
            (400, json!({"error": "Doctor ID is required", "status": "400"}))
        );
    }

    #[test]
    fn test_decode_requires_object() {
        for body in [&b""[..], b"[]", b"42", b"{not json"] {
            let err = decode::<Value>(body).unwrap_err();
            assert_eq!(err.status().as_u16(), 400);
            assert!(err.to_string().starts_with("Invalid request: "));
        }
        assert!(decode::<Value>(b"{}").is_ok());
    }

    #[test]
    fn test_store_failures_are_internal_errors() {
        let d = Dispatcher::new(failing_repositories());
        let (status, body) = outcome(call(&d, Method::GET, "/api/patients", Value::Null));
        assert_eq!(status, 500);
        assert_eq!(
            body["error"],
            "Error fetching patients: store connection is closed"
        );

        let (status, body) = outcome(call(&d, Method::DELETE, "/api/bills/BILL1", Value::Null));
        assert_eq!(status, 500);
        assert_eq!(body["error"], "Error deleting bill: store connection is closed");

        let (status, _) = outcome(call(
            &d,
            Method::POST,
            "/api/auth/login",
            json!({"username": "admin", "password": "admin123"}),
        ));
        assert_eq!(status, 500);
    }
}
