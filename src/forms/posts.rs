use std::fs;
use std::path::Path;

use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use thiserror::Error;

use crate::domain::post::{NewPost, UpdatePost};
use crate::domain::types::{CategoryId, LocationId, PostTitle, TypeConstraintError, UserId};

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Post create/edit form. Submitted as multipart because of the optional
/// image upload; selects post their ids as plain text, the publish checkbox
/// is absent when unchecked.
#[derive(MultipartForm)]
pub struct PostForm {
    pub title: Text<String>,
    pub text: Text<String>,
    pub pub_date: Text<String>,
    pub category_id: Option<Text<String>>,
    pub location_id: Option<Text<String>>,
    pub is_published: Option<Text<String>>,
    #[multipart(limit = "5MB")]
    pub image: Option<TempFile>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostFormPayload {
    pub title: PostTitle,
    pub text: String,
    pub pub_date: NaiveDateTime,
    pub is_published: bool,
    pub category_id: Option<CategoryId>,
    pub location_id: Option<LocationId>,
}

impl PostFormPayload {
    pub fn into_new_post(self, author_id: UserId, image: Option<String>) -> NewPost {
        NewPost {
            title: self.title,
            text: self.text,
            pub_date: self.pub_date,
            image,
            is_published: self.is_published,
            created_at: Utc::now().naive_utc(),
            category_id: self.category_id,
            location_id: self.location_id,
            author_id,
        }
    }

    /// `image: None` keeps whatever image the post already has.
    pub fn into_update_post(self, image: Option<String>) -> UpdatePost {
        UpdatePost {
            title: self.title,
            text: self.text,
            pub_date: self.pub_date,
            image,
            is_published: self.is_published,
            category_id: self.category_id,
            location_id: self.location_id,
        }
    }
}

#[derive(Debug, Error)]
pub enum PostFormError {
    #[error("Post form contains invalid data: {0}")]
    TypeConstraint(String),
    #[error("Неверный формат даты публикации: {0}")]
    InvalidDate(String),
    #[error("Неверный идентификатор: {0}")]
    InvalidReference(String),
    #[error("Изображение должно быть в формате JPEG, PNG, GIF или WebP")]
    UnsupportedImage,
    #[error("Не удалось сохранить изображение")]
    ImageSave(#[from] std::io::Error),
}

impl From<TypeConstraintError> for PostFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

fn parse_pub_date(value: &str) -> Result<NaiveDateTime, PostFormError> {
    let value = value.trim();
    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M") {
        return Ok(datetime);
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Ok(datetime);
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(datetime) = date.and_hms_opt(0, 0, 0) {
            return Ok(datetime);
        }
    }
    Err(PostFormError::InvalidDate(value.to_string()))
}

fn parse_optional_id(value: Option<&Text<String>>, field: &str) -> Result<Option<i32>, PostFormError> {
    match value {
        None => Ok(None),
        Some(text) if text.trim().is_empty() => Ok(None),
        Some(text) => text
            .trim()
            .parse::<i32>()
            .map(Some)
            .map_err(|_| PostFormError::InvalidReference(field.to_string())),
    }
}

/// Validate and convert the raw multipart fields into a typed payload.
/// The image, if any, is handled separately by [`save_image`].
pub fn parse_post_form(form: &PostForm) -> Result<PostFormPayload, PostFormError> {
    let title = PostTitle::new(form.title.as_str())?;
    let text = form.text.trim().to_string();
    if text.is_empty() {
        return Err(PostFormError::TypeConstraint(
            "post text cannot be empty".to_string(),
        ));
    }

    let pub_date = parse_pub_date(&form.pub_date)?;

    let category_id = parse_optional_id(form.category_id.as_ref(), "category")?
        .map(CategoryId::new)
        .transpose()?;
    let location_id = parse_optional_id(form.location_id.as_ref(), "location")?
        .map(LocationId::new)
        .transpose()?;

    let is_published = form
        .is_published
        .as_ref()
        .is_some_and(|v| matches!(v.as_str(), "on" | "true" | "1"));

    Ok(PostFormPayload {
        title,
        text,
        pub_date,
        is_published,
        category_id,
        location_id,
    })
}

fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Persist an uploaded image below `media_root` and return its relative
/// path. The stored name is prefixed with a millisecond timestamp so that
/// repeated uploads of the same file never collide.
pub fn save_image(file: &TempFile, media_root: &str) -> Result<String, PostFormError> {
    let Some(file_name) = file.file_name.as_ref() else {
        return Err(PostFormError::UnsupportedImage);
    };

    let extension_ok = Path::new(&file_name.to_ascii_lowercase())
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext));
    if !extension_ok {
        return Err(PostFormError::UnsupportedImage);
    }

    if let Some(content_type) = file.content_type.as_ref() {
        if !content_type.essence_str().starts_with("image/") {
            return Err(PostFormError::UnsupportedImage);
        }
    }

    let stored_name = format!(
        "{}_{}",
        Utc::now().timestamp_millis(),
        sanitize_file_name(file_name)
    );
    let target_dir = Path::new(media_root).join("posts");
    fs::create_dir_all(&target_dir)?;
    fs::copy(file.file.path(), target_dir.join(&stored_name))?;

    Ok(format!("posts/{stored_name}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_datetime_local_input() {
        let parsed = parse_pub_date("2024-03-01T18:30").unwrap();
        assert_eq!(parsed.format("%Y-%m-%d %H:%M").to_string(), "2024-03-01 18:30");
    }

    #[test]
    fn parses_bare_date_as_midnight() {
        let parsed = parse_pub_date("2024-03-01").unwrap();
        assert_eq!(parsed.format("%H:%M:%S").to_string(), "00:00:00");
    }

    #[test]
    fn rejects_garbage_dates() {
        assert!(parse_pub_date("yesterday").is_err());
    }

    #[test]
    fn sanitizes_unfriendly_file_names() {
        assert_eq!(sanitize_file_name("my photo (1).jpg"), "my-photo--1-.jpg");
    }
}
