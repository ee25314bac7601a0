use super::{decode, Incoming};
use crate::codec::{ApiError, ApiResult, Reply};
use carehub_api_shared::{authenticate, AuthError, LoginReq, LoginRes, UserView};
use carehub_core::Repositories;

/// Checks a username and password. No session or token is issued.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    operation_id = "login",
    request_body = LoginReq,
    responses(
        (status = 200, description = "Credentials accepted", body = LoginRes),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody)
    )
)]
pub(crate) fn login(repos: &Repositories, req: &Incoming<'_>) -> ApiResult {
    let credentials: LoginReq = decode(req.body)?;

    match authenticate(
        repos.users.as_ref(),
        &credentials.username,
        &credentials.password,
    ) {
        Ok(user) => Ok(Reply::ok(&LoginRes {
            message: "Login successful".into(),
            user: UserView::from(user),
        })),
        Err(AuthError::InvalidCredentials) => {
            Err(ApiError::Unauthorized(AuthError::InvalidCredentials.to_string()))
        }
        Err(AuthError::Store(e)) => Err(ApiError::internal("Error authenticating user", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{call, dispatcher, outcome};
    use axum::http::Method;
    use serde_json::json;

    fn with_admin() -> super::super::Dispatcher {
        let d = dispatcher();
        call(
            &d,
            Method::POST,
            "/api/users",
            json!({"username": "admin", "password": "admin123", "role": "ADMIN"}),
        )
        .unwrap();
        d
    }

    #[test]
    fn test_login_success_returns_role_without_password() {
        let d = with_admin();
        let (status, body) = outcome(call(
            &d,
            Method::POST,
            "/api/auth/login",
            json!({"username": "admin", "password": "admin123"}),
        ));
        assert_eq!(status, 200);
        assert_eq!(
            body,
            json!({
                "message": "Login successful",
                "user": {"username": "admin", "role": "ADMIN"}
            })
        );
    }

    #[test]
    fn test_login_failures_are_unauthorized() {
        let d = with_admin();
        for credentials in [
            json!({"username": "admin", "password": "wrong"}),
            json!({"username": "nobody", "password": "admin123"}),
        ] {
            let (status, body) = outcome(call(&d, Method::POST, "/api/auth/login", credentials));
            assert_eq!(status, 401);
            assert_eq!(body, json!({"error": "Invalid credentials", "status": "401"}));
        }
    }

    #[test]
    fn test_login_requires_both_fields() {
        let d = with_admin();
        let (status, _) = outcome(call(
            &d,
            Method::POST,
            "/api/auth/login",
            json!({"username": "admin"}),
        ));
        assert_eq!(status, 400);
    }
}
