use argon2::Argon2;
use argon2::password_hash::{
    PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};
use chrono::Utc;

use crate::domain::user::{NewUser, User};
use crate::forms::auth::LoginFormPayload;
use crate::forms::users::RegistrationFormPayload;
use crate::repository::{UserReader, UserWriter};
use crate::services::errors::log_repo_error;

use super::{ServiceError, ServiceResult};

const BAD_CREDENTIALS: &str = "Неверное имя пользователя или пароль.";

/// Hash a plaintext password into an argon2 PHC string.
pub fn hash_password(password: &str) -> ServiceResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            log::error!("Failed to hash password: {e}");
            ServiceError::Internal
        })
}

/// Verify a plaintext password against a stored PHC string. A malformed
/// stored hash counts as a failed verification.
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Register a new user. A taken username surfaces as a form error for
/// redisplay.
pub fn register_user<R>(payload: RegistrationFormPayload, repo: &R) -> ServiceResult<User>
where
    R: UserReader + UserWriter,
{
    let password_hash = hash_password(&payload.password)?;

    let user = NewUser {
        username: payload.username,
        first_name: payload.first_name,
        last_name: payload.last_name,
        email: payload.email,
        password_hash,
        date_joined: Utc::now().naive_utc(),
    };

    repo.create_user(&user)
        .map_err(|e| log_repo_error("Failed to create user", e))
}

/// Check credentials and return the matching user.
///
/// Unknown username and wrong password produce the same message, so a login
/// attempt cannot probe which usernames exist.
pub fn login_user<R>(payload: LoginFormPayload, repo: &R) -> ServiceResult<User>
where
    R: UserReader,
{
    let user = repo
        .get_user_by_username(payload.username.as_str())
        .map_err(|e| log_repo_error("Failed to get user", e))?;

    match user {
        Some(user) if verify_password(&payload.password, &user.password_hash) => Ok(user),
        _ => Err(ServiceError::Form(BAD_CREDENTIALS.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{EmailAddress, Username};
    use crate::repository::test::TestRepository;

    fn registration(username: &str) -> RegistrationFormPayload {
        RegistrationFormPayload {
            username: Username::new(username).unwrap(),
            first_name: "Анна".to_string(),
            last_name: "Петрова".to_string(),
            email: EmailAddress::new(format!("{username}@example.com")).unwrap(),
            password: "correct horse".to_string(),
        }
    }

    fn login(username: &str, password: &str) -> LoginFormPayload {
        LoginFormPayload {
            username: Username::new(username).unwrap(),
            password: password.to_string(),
        }
    }

    #[test]
    fn registered_user_can_log_in() {
        let repo = TestRepository::new();
        let user = register_user(registration("anna"), &repo).unwrap();
        assert_ne!(user.password_hash, "correct horse");

        let logged_in = login_user(login("anna", "correct horse"), &repo).unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[test]
    fn wrong_password_is_rejected() {
        let repo = TestRepository::new();
        register_user(registration("anna"), &repo).unwrap();

        let err = login_user(login("anna", "wrong"), &repo).unwrap_err();
        assert!(matches!(err, ServiceError::Form(_)));
    }

    #[test]
    fn unknown_user_gets_the_same_error_as_wrong_password() {
        let repo = TestRepository::new();
        register_user(registration("anna"), &repo).unwrap();

        let wrong_password = login_user(login("anna", "wrong"), &repo).unwrap_err();
        let unknown_user = login_user(login("ghost", "whatever"), &repo).unwrap_err();
        assert_eq!(wrong_password, unknown_user);
    }

    #[test]
    fn duplicate_username_is_a_form_error() {
        let repo = TestRepository::new();
        register_user(registration("anna"), &repo).unwrap();

        let err = register_user(registration("anna"), &repo).unwrap_err();
        assert!(matches!(err, ServiceError::Form(_)));
    }
}
