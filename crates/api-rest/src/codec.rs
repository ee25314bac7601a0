//! Response codec: every reply and every error leaves through [`encode`].

use crate::routes::RouteError;
use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use carehub_api_shared::{ErrorBody, MessageRes};
use serde::Serialize;
use serde_json::Value;
use std::fmt::Display;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

// Used if even the error envelope cannot be serialised.
const INTERNAL_ERROR_BODY: &[u8] = br#"{"error":"Internal server error","status":"500"}"#;

const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";

/// A successful outcome. Serialisation happens when the reply is built, so a body that fails
/// to serialise still reaches [`encode`] and becomes a 500 there.
#[derive(Debug)]
pub struct Reply {
    status: StatusCode,
    body: Result<Value, serde_json::Error>,
}

impl Reply {
    pub fn ok<T: Serialize + ?Sized>(body: &T) -> Self {
        Self::with_status(StatusCode::OK, body)
    }

    pub fn created<T: Serialize + ?Sized>(body: &T) -> Self {
        Self::with_status(StatusCode::CREATED, body)
    }

    /// `200 {"message": ...}`
    pub fn message(message: impl Into<String>) -> Self {
        Self::ok(&MessageRes::new(message))
    }

    fn with_status<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> Self {
        Self {
            status,
            body: serde_json::to_value(body),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The serialised body, if serialisation succeeded.
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref().ok()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
}

pub type ApiResult = Result<Reply, ApiError>;

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// A store or runtime failure. Logged here so callers only have to add context.
    pub fn internal(context: impl Display, err: impl Display) -> Self {
        tracing::error!("{context}: {err}");
        Self::Internal(format!("{context}: {err}"))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RouteError> for ApiError {
    fn from(err: RouteError) -> Self {
        match err {
            RouteError::NotFound => ApiError::NotFound(err.to_string()),
            RouteError::MethodNotAllowed => ApiError::MethodNotAllowed,
            RouteError::MissingId(_) | RouteError::InvalidId(_) => {
                ApiError::BadRequest(err.to_string())
            }
        }
    }
}

/// Turns a dispatch result into an HTTP response with the standard headers.
pub fn encode(result: ApiResult) -> Response {
    let (status, bytes) = match result {
        Ok(Reply {
            status,
            body: Ok(value),
        }) => match serde_json::to_vec(&value) {
            Ok(bytes) => (status, bytes),
            Err(e) => internal_error(e),
        },
        Ok(Reply { body: Err(e), .. }) => internal_error(e),
        Err(err) => {
            let status = err.status();
            let body = ErrorBody::new(err.to_string(), status.as_u16());
            match serde_json::to_vec(&body) {
                Ok(bytes) => (status, bytes),
                Err(e) => internal_error(e),
            }
        }
    };

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    response
}

fn internal_error(err: serde_json::Error) -> (StatusCode, Vec<u8>) {
    tracing::error!("Response serialisation error: {err}");
    let body = ErrorBody::new(
        INTERNAL_ERROR_MESSAGE,
        StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
    );
    let bytes = serde_json::to_vec(&body).unwrap_or_else(|_| INTERNAL_ERROR_BODY.to_vec());
    (StatusCode::INTERNAL_SERVER_ERROR, bytes)
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        encode(Ok(self))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        encode(Err(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde::ser::Error as _;
    use serde_json::json;

    async fn body_json(response: Response) -> Value {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body should be readable")
            .to_bytes();
        serde_json::from_slice(&bytes).expect("body should be JSON")
    }

    struct Unserialisable;

    impl Serialize for Unserialisable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("refusing to serialise"))
        }
    }

    #[tokio::test]
    async fn test_success_carries_standard_headers() {
        let response = encode(Ok(Reply::created(&json!({"doctorId": "DOC1"}))));
        assert_eq!(response.status(), StatusCode::CREATED);

        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_METHODS],
            "GET, POST, PUT, DELETE, OPTIONS"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
        assert_eq!(body_json(response).await, json!({"doctorId": "DOC1"}));
    }

    #[tokio::test]
    async fn test_error_envelope() {
        let response = encode(Err(ApiError::not_found("Patient not found")));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            body_json(response).await,
            json!({"error": "Patient not found", "status": "404"})
        );
    }

    #[tokio::test]
    async fn test_route_errors_map_to_statuses() {
        let cases = [
            (RouteError::NotFound, 404, "Endpoint not found"),
            (RouteError::MethodNotAllowed, 405, "Method not allowed"),
        ];
        for (err, status, message) in cases {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status().as_u16(), status);
            assert_eq!(body_json(response).await["error"], message);
        }
    }

    #[tokio::test]
    async fn test_serialisation_failure_becomes_500() {
        let response = Reply::ok(&Unserialisable).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Internal server error", "status": "500"})
        );
    }

    #[test]
    fn test_message_reply() {
        let reply = Reply::message("Bill BILL1 marked as paid");
        assert_eq!(reply.status(), StatusCode::OK);
        assert_eq!(
            reply.body(),
            Some(&json!({"message": "Bill BILL1 marked as paid"}))
        );
    }
}
