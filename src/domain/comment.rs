use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CommentId, PostId, UserId};
use crate::domain::user::AuthorRef;

/// A comment under a post. Comments are listed oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub text: String,
    /// Assigned at insert time, immutable afterwards.
    pub created_at: NaiveDateTime,
    pub post_id: PostId,
    pub author_id: UserId,
    /// Populated when comments are loaded for display.
    pub author: Option<AuthorRef>,
}

/// Information required to create a new [`Comment`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComment {
    pub text: String,
    pub post_id: PostId,
    pub author_id: UserId,
}
