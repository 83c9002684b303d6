use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::comment::{Comment as DomainComment, NewComment as DomainNewComment};
use crate::domain::types::TypeConstraintError;

/// Diesel model representing the `comments` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::comments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Comment {
    pub id: i32,
    pub text: String,
    pub created_at: NaiveDateTime,
    pub post_id: i32,
    pub author_id: i32,
}

/// Insertable form of [`Comment`]. `created_at` is assigned by the caller at
/// insert time and never updated.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::comments)]
pub struct NewComment {
    pub text: String,
    pub created_at: NaiveDateTime,
    pub post_id: i32,
    pub author_id: i32,
}

impl TryFrom<Comment> for DomainComment {
    type Error = TypeConstraintError;

    fn try_from(comment: Comment) -> Result<Self, Self::Error> {
        Ok(Self {
            id: comment.id.try_into()?,
            text: comment.text,
            created_at: comment.created_at,
            post_id: comment.post_id.try_into()?,
            author_id: comment.author_id.try_into()?,
            author: None,
        })
    }
}

impl NewComment {
    pub fn from_domain(comment: DomainNewComment, created_at: NaiveDateTime) -> Self {
        Self {
            text: comment.text,
            created_at,
            post_id: comment.post_id.into(),
            author_id: comment.author_id.into(),
        }
    }
}
