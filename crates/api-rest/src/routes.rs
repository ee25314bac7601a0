//! Route table: turns a method and path into a resource operation.
//!
//! The table is a flat list of prefixes built once at startup and scanned in order. Paths are
//! matched as received except for the id segment, which is percent-decoded.

use axum::http::Method;
use percent_encoding::percent_decode_str;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Health,
    Patients,
    Doctors,
    Appointments,
    Bills,
    Users,
    Login,
}

impl Resource {
    /// Singular label used in messages.
    pub fn label(self) -> &'static str {
        match self {
            Resource::Health => "Health",
            Resource::Patients => "Patient",
            Resource::Doctors => "Doctor",
            Resource::Appointments => "Appointment",
            Resource::Bills => "Bill",
            Resource::Users => "User",
            Resource::Login => "Login",
        }
    }

    fn action(self, suffix: &str) -> Option<Action> {
        match (self, suffix) {
            (Resource::Bills, "pay") => Some(Action::Pay),
            (Resource::Appointments, "complete") => Some(Action::Complete),
            _ => None,
        }
    }
}

/// One-way state transitions addressed as `/{id}/<action>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Pay,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Health,
    List,
    Create,
    Read(String),
    Update(String),
    Delete(String),
    DeleteAll,
    Transition(String, Action),
    Login,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub resource: Resource,
    pub operation: Operation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("Endpoint not found")]
    NotFound,
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("{} ID is required", .0.label())]
    MissingId(Resource),
    #[error("{} ID is not valid UTF-8", .0.label())]
    InvalidId(Resource),
}

enum Shape {
    /// Exact path, single method.
    Endpoint { method: Method, operation: Operation },
    /// `prefix` lists and creates; `prefix/{id}` reads, updates and deletes.
    Collection,
}

struct Entry {
    prefix: &'static str,
    resource: Resource,
    shape: Shape,
}

pub struct RouteTable {
    entries: Vec<Entry>,
}

/// Path segment under `/api/patients` that deletes every patient.
const DELETE_ALL_SEGMENT: &str = "deleteAll";

impl RouteTable {
    pub fn new() -> Self {
        let endpoint = |prefix: &'static str, resource, method, operation| Entry {
            prefix,
            resource,
            shape: Shape::Endpoint { method, operation },
        };
        let collection = |prefix: &'static str, resource| Entry {
            prefix,
            resource,
            shape: Shape::Collection,
        };

        Self {
            entries: vec![
                endpoint("/health", Resource::Health, Method::GET, Operation::Health),
                endpoint(
                    "/api/auth/login",
                    Resource::Login,
                    Method::POST,
                    Operation::Login,
                ),
                collection("/api/patients", Resource::Patients),
                collection("/api/doctors", Resource::Doctors),
                collection("/api/appointments", Resource::Appointments),
                collection("/api/bills", Resource::Bills),
                collection("/api/users", Resource::Users),
            ],
        }
    }

    pub fn resolve(&self, method: &Method, path: &str) -> Result<Route, RouteError> {
        for entry in &self.entries {
            match &entry.shape {
                Shape::Endpoint {
                    method: allowed,
                    operation,
                } => {
                    if path != entry.prefix {
                        continue;
                    }
                    if method != allowed {
                        return Err(RouteError::MethodNotAllowed);
                    }
                    return Ok(Route {
                        resource: entry.resource,
                        operation: operation.clone(),
                    });
                }
                Shape::Collection => {
                    let Some(rest) = path.strip_prefix(entry.prefix) else {
                        continue;
                    };
                    if rest.is_empty() {
                        return collection_route(entry.resource, method);
                    }
                    // `/api/patientsX` is a different path, not an item of this collection.
                    let Some(rest) = rest.strip_prefix('/') else {
                        continue;
                    };
                    return item_route(entry.resource, method, rest);
                }
            }
        }
        Err(RouteError::NotFound)
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

fn collection_route(resource: Resource, method: &Method) -> Result<Route, RouteError> {
    let operation = match *method {
        Method::GET => Operation::List,
        Method::POST => Operation::Create,
        _ => return Err(RouteError::MethodNotAllowed),
    };
    Ok(Route {
        resource,
        operation,
    })
}

fn item_route(resource: Resource, method: &Method, rest: &str) -> Result<Route, RouteError> {
    let (raw_id, suffix) = rest.split_once('/').unwrap_or((rest, ""));
    if raw_id.is_empty() {
        return Err(RouteError::MissingId(resource));
    }
    let decoded = percent_decode_str(raw_id)
        .decode_utf8()
        .map_err(|_| RouteError::InvalidId(resource))?;
    let id: &str = &decoded;

    let operation = if suffix.is_empty() {
        if resource == Resource::Patients && id == DELETE_ALL_SEGMENT {
            if *method != Method::DELETE {
                return Err(RouteError::MethodNotAllowed);
            }
            Operation::DeleteAll
        } else {
            match *method {
                Method::GET => Operation::Read(id.to_string()),
                Method::PUT => Operation::Update(id.to_string()),
                Method::DELETE => Operation::Delete(id.to_string()),
                _ => return Err(RouteError::MethodNotAllowed),
            }
        }
    } else {
        let action = resource.action(suffix).ok_or(RouteError::NotFound)?;
        match *method {
            Method::POST | Method::PUT => Operation::Transition(id.to_string(), action),
            _ => return Err(RouteError::MethodNotAllowed),
        }
    };

    Ok(Route {
        resource,
        operation,
    })
}
