use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

#[derive(Deserialize, Validate)]
pub struct CommentForm {
    #[validate(length(min = 1))]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommentFormPayload {
    pub text: String,
}

#[derive(Debug, Error)]
pub enum CommentFormError {
    #[error("Comment form validation failed: {0}")]
    Validation(String),
    #[error("Comment text cannot be empty")]
    EmptyText,
}

impl From<ValidationErrors> for CommentFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl TryFrom<CommentForm> for CommentFormPayload {
    type Error = CommentFormError;

    fn try_from(value: CommentForm) -> Result<Self, Self::Error> {
        value.validate()?;
        let text = value.text.trim().to_string();
        if text.is_empty() {
            return Err(CommentFormError::EmptyText);
        }
        Ok(Self { text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_text_is_trimmed() {
        let form = CommentForm {
            text: "  Отличный пост!  ".to_string(),
        };
        let payload: CommentFormPayload = form.try_into().unwrap();
        assert_eq!(payload.text, "Отличный пост!");
    }

    #[test]
    fn whitespace_only_comment_is_rejected() {
        let form = CommentForm {
            text: "   ".to_string(),
        };
        let payload: Result<CommentFormPayload, _> = form.try_into();
        assert!(payload.is_err());
    }
}
