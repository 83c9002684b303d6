use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{EmailAddress, TypeConstraintError, Username};

/// Registration form. Two password fields must match, mirroring the usual
/// confirm-your-password flow.
#[derive(Deserialize, Validate)]
pub struct RegistrationForm {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(length(max = 30))]
    #[serde(default)]
    pub first_name: String,
    #[validate(length(max = 30))]
    #[serde(default)]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password1: String,
    pub password2: String,
}

#[derive(Debug, Clone)]
pub struct RegistrationFormPayload {
    pub username: Username,
    pub first_name: String,
    pub last_name: String,
    pub email: EmailAddress,
    /// Plaintext password; hashed by the registration service, never stored.
    pub password: String,
}

#[derive(Debug, Error)]
pub enum RegistrationFormError {
    #[error("Registration form validation failed: {0}")]
    Validation(String),
    #[error("Registration form contains invalid data: {0}")]
    TypeConstraint(String),
    #[error("Пароли не совпадают.")]
    PasswordMismatch,
    #[error("Пароль не может состоять только из цифр.")]
    NumericPassword,
}

impl From<ValidationErrors> for RegistrationFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for RegistrationFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<RegistrationForm> for RegistrationFormPayload {
    type Error = RegistrationFormError;

    fn try_from(value: RegistrationForm) -> Result<Self, Self::Error> {
        value.validate()?;

        if value.password1 != value.password2 {
            return Err(RegistrationFormError::PasswordMismatch);
        }
        if value.password1.chars().all(|c| c.is_ascii_digit()) {
            return Err(RegistrationFormError::NumericPassword);
        }

        Ok(Self {
            username: Username::new(value.username)?,
            first_name: value.first_name.trim().to_string(),
            last_name: value.last_name.trim().to_string(),
            email: EmailAddress::new(value.email)?,
            password: value.password1,
        })
    }
}

/// Profile edit form; credentials are changed elsewhere.
#[derive(Deserialize, Validate)]
pub struct UserEditForm {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(length(max = 30))]
    #[serde(default)]
    pub first_name: String,
    #[validate(length(max = 30))]
    #[serde(default)]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct UserEditFormPayload {
    pub username: Username,
    pub first_name: String,
    pub last_name: String,
    pub email: EmailAddress,
}

#[derive(Debug, Error)]
pub enum UserEditFormError {
    #[error("Profile form validation failed: {0}")]
    Validation(String),
    #[error("Profile form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for UserEditFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for UserEditFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<UserEditForm> for UserEditFormPayload {
    type Error = UserEditFormError;

    fn try_from(value: UserEditForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            username: Username::new(value.username)?,
            first_name: value.first_name.trim().to_string(),
            last_name: value.last_name.trim().to_string(),
            email: EmailAddress::new(value.email)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_form() -> RegistrationForm {
        RegistrationForm {
            username: "anna".to_string(),
            first_name: "Анна".to_string(),
            last_name: "Петрова".to_string(),
            email: "anna@example.com".to_string(),
            password1: "correct horse".to_string(),
            password2: "correct horse".to_string(),
        }
    }

    #[test]
    fn registration_accepts_matching_passwords() {
        let payload: RegistrationFormPayload = sample_form().try_into().unwrap();
        assert_eq!(payload.username.as_str(), "anna");
        assert_eq!(payload.password, "correct horse");
    }

    #[test]
    fn registration_rejects_mismatched_passwords() {
        let mut form = sample_form();
        form.password2 = "something else".to_string();
        let err = RegistrationFormPayload::try_from(form).unwrap_err();
        assert!(matches!(err, RegistrationFormError::PasswordMismatch));
    }

    #[test]
    fn registration_rejects_short_password() {
        let mut form = sample_form();
        form.password1 = "short".to_string();
        form.password2 = "short".to_string();
        let err = RegistrationFormPayload::try_from(form).unwrap_err();
        assert!(matches!(err, RegistrationFormError::Validation(_)));
    }

    #[test]
    fn registration_rejects_all_digit_password() {
        let mut form = sample_form();
        form.password1 = "1234567890".to_string();
        form.password2 = "1234567890".to_string();
        let err = RegistrationFormPayload::try_from(form).unwrap_err();
        assert!(matches!(err, RegistrationFormError::NumericPassword));
    }
}
