//! Staff accounts. Responses always use [`UserView`], so passwords never leave the store.

use super::{
    decode, delete_one, fetch_all, fetch_one, insert_new, unroutable, update_from_body, Incoming,
};
use crate::codec::{ApiResult, Reply};
use crate::routes::Operation;
use carehub_api_shared::UserView;
use carehub_core::model::{User, UserRole};
use carehub_core::Repositories;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct UserUpdate {
    pub password: String,
    pub role: UserRole,
}

pub(crate) fn dispatch(repos: &Repositories, op: Operation, req: &Incoming<'_>) -> ApiResult {
    match op {
        Operation::List => list_users(repos),
        Operation::Create => create_user(repos, req.body),
        Operation::Read(username) => get_user(repos, &username),
        Operation::Update(username) => update_user(repos, &username, req.body),
        Operation::Delete(username) => delete_user(repos, &username),
        other => Err(unroutable(&other)),
    }
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    operation_id = "list_users",
    responses(
        (status = 200, description = "All users, without passwords", body = [UserView]),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub(crate) fn list_users(repos: &Repositories) -> ApiResult {
    let users: Vec<UserView> = fetch_all(repos.users.as_ref())?
        .iter()
        .map(UserView::from)
        .collect();
    Ok(Reply::ok(&users))
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    operation_id = "create_user",
    request_body = User,
    responses(
        (status = 201, description = "User created", body = UserView),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 409, description = "Username already taken", body = ErrorBody)
    )
)]
pub(crate) fn create_user(repos: &Repositories, body: &[u8]) -> ApiResult {
    let user: User = decode(body)?;
    let created = insert_new(repos.users.as_ref(), user)?;
    Ok(Reply::created(&UserView::from(created)))
}

#[utoipa::path(
    get,
    path = "/api/users/{username}",
    tag = "users",
    operation_id = "get_user",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "The user", body = UserView),
        (status = 404, description = "User not found", body = ErrorBody)
    )
)]
pub(crate) fn get_user(repos: &Repositories, username: &str) -> ApiResult {
    let user = fetch_one(repos.users.as_ref(), username)?;
    Ok(Reply::ok(&UserView::from(user)))
}

#[utoipa::path(
    put,
    path = "/api/users/{username}",
    tag = "users",
    operation_id = "update_user",
    params(("username" = String, Path, description = "Username")),
    request_body = UserUpdate,
    responses(
        (status = 200, description = "Updated user", body = UserView),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody)
    )
)]
pub(crate) fn update_user(repos: &Repositories, username: &str, body: &[u8]) -> ApiResult {
    let updated = update_from_body(
        repos.users.as_ref(),
        username,
        body,
        |user: &mut User, update: &UserUpdate| {
            user.password = update.password.clone();
            user.role = update.role;
        },
    )?;
    Ok(Reply::ok(&UserView::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/users/{username}",
    tag = "users",
    operation_id = "delete_user",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "User deleted", body = MessageRes),
        (status = 404, description = "User not found", body = ErrorBody)
    )
)]
pub(crate) fn delete_user(repos: &Repositories, username: &str) -> ApiResult {
    delete_one(repos.users.as_ref(), username)
}

#[cfg(test)]
mod tests {
    use super::super::testing::{call, dispatcher, outcome};
    use axum::http::Method;
    use serde_json::{json, Value};

    #[test]
    fn test_users_never_expose_passwords() {
        let d = dispatcher();
        let (status, created) = outcome(call(
            &d,
            Method::POST,
            "/api/users",
            json!({"username": "nurse1", "password": "s3cret", "role": "RECEPTIONIST"}),
        ));
        assert_eq!(status, 201);
        assert_eq!(created, json!({"username": "nurse1", "role": "RECEPTIONIST"}));

        let (_, listed) = outcome(call(&d, Method::GET, "/api/users", Value::Null));
        assert_eq!(listed, json!([{"username": "nurse1", "role": "RECEPTIONIST"}]));

        let (_, fetched) = outcome(call(&d, Method::GET, "/api/users/nurse1", Value::Null));
        assert!(fetched.get("password").is_none());
    }

    #[test]
    fn test_non_ascii_username_is_reachable_when_encoded() {
        let d = dispatcher();
        let (status, _) = outcome(call(
            &d,
            Method::POST,
            "/api/users",
            json!({"username": "josé", "password": "pw", "role": "DOCTOR"}),
        ));
        assert_eq!(status, 201);

        let (status, fetched) = outcome(call(&d, Method::GET, "/api/users/jos%C3%A9", Value::Null));
        assert_eq!(status, 200);
        assert_eq!(fetched, json!({"username": "josé", "role": "DOCTOR"}));
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let d = dispatcher();
        let (status, _) = outcome(call(
            &d,
            Method::POST,
            "/api/users",
            json!({"username": "x", "password": "y", "role": "JANITOR"}),
        ));
        assert_eq!(status, 400);
    }

    #[test]
    fn test_update_changes_password_and_role() {
        let d = dispatcher();
        call(
            &d,
            Method::POST,
            "/api/users",
            json!({"username": "doctor1", "password": "doc123", "role": "DOCTOR"}),
        )
        .unwrap();

        let (status, updated) = outcome(call(
            &d,
            Method::PUT,
            "/api/users/doctor1",
            json!({"password": "newpass", "role": "ADMIN"}),
        ));
        assert_eq!(status, 200);
        assert_eq!(updated, json!({"username": "doctor1", "role": "ADMIN"}));

        let stored = d
            .repositories()
            .users
            .find("doctor1")
            .unwrap()
            .expect("user should exist");
        assert_eq!(stored.password, "newpass");
    }

    #[test]
    fn test_delete_user() {
        let d = dispatcher();
        call(
            &d,
            Method::POST,
            "/api/users",
            json!({"username": "temp", "password": "p", "role": "ADMIN"}),
        )
        .unwrap();

        let (status, body) = outcome(call(&d, Method::DELETE, "/api/users/temp", Value::Null));
        assert_eq!(status, 200);
        assert_eq!(body["message"], "User temp deleted successfully");

        let (status, body) = outcome(call(&d, Method::GET, "/api/users/temp", Value::Null));
        assert_eq!(status, 404);
        assert_eq!(body["error"], "User not found");
    }
}
