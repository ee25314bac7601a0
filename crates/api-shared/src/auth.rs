use carehub_core::model::User;
use carehub_core::{Repository, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unknown username or wrong password; callers cannot tell which.
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Error authenticating user: {0}")]
    Store(#[from] StoreError),
}

/// Checks a username and password against the user repository.
///
/// Returns the matching user on success. Passwords are compared in constant time.
pub fn authenticate(
    users: &dyn Repository<User>,
    username: &str,
    password: &str,
) -> Result<User, AuthError> {
    let Some(user) = users.find(username)? else {
        tracing::warn!(username, "login failed: unknown user");
        return Err(AuthError::InvalidCredentials);
    };

    if !constant_time_eq(user.password.as_bytes(), password.as_bytes()) {
        tracing::warn!(username, "login failed: wrong password");
        return Err(AuthError::InvalidCredentials);
    }

    tracing::info!(username, role = %user.role, "login succeeded");
    Ok(user)
}

// Timing only depends on the lengths, never on where the first mismatch is.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use carehub_core::model::UserRole;
    use carehub_core::Repositories;
    use carehub_types::RecordKey;

    fn repos_with_admin() -> Repositories {
        let repos = Repositories::in_memory();
        repos
            .users
            .insert(User::new(
                RecordKey::new("admin").unwrap(),
                "admin123",
                UserRole::Admin,
            ))
            .unwrap();
        repos
    }

    #[test]
    fn test_authenticate_accepts_matching_password() {
        let repos = repos_with_admin();
        let user = authenticate(repos.users.as_ref(), "admin", "admin123").unwrap();
        assert_eq!(user.role, UserRole::Admin);
    }

    #[test]
    fn test_authenticate_rejects_wrong_password_and_unknown_user() {
        let repos = repos_with_admin();
        for (username, password) in [("admin", "admin124"), ("admin", ""), ("ghost", "admin123")] {
            let err = authenticate(repos.users.as_ref(), username, password).unwrap_err();
            assert!(matches!(err, AuthError::InvalidCredentials));
        }
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
        assert!(constant_time_eq(b"", b""));
    }
}
