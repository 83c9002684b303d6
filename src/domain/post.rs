use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::location::Location;
use crate::domain::types::{
    CategoryId, CategorySlug, CategoryTitle, LocationId, PostId, PostTitle, UserId,
};
use crate::domain::user::AuthorRef;

/// Category snapshot carried by every loaded post.
///
/// The post listing query joins the category row anyway to evaluate
/// visibility, so the snapshot is always present unless the category has been
/// deleted and the foreign key was nulled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostCategory {
    pub id: CategoryId,
    pub title: CategoryTitle,
    pub slug: CategorySlug,
    pub is_published: bool,
}

/// A blog post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: PostTitle,
    pub text: String,
    /// May be in the future; such posts stay hidden until the date passes.
    pub pub_date: NaiveDateTime,
    /// Path of the uploaded image below the media root.
    pub image: Option<String>,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
    pub location_id: Option<LocationId>,
    pub author_id: UserId,
    /// `None` when the category was deleted out from under the post.
    pub category: Option<PostCategory>,
    /// Populated only when the query asked for related entities.
    pub location: Option<Location>,
    /// Populated only when the query asked for related entities.
    pub author: Option<AuthorRef>,
    /// Populated only when the query asked for comment counts.
    pub comment_count: Option<i64>,
}

/// Information required to create a new [`Post`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPost {
    pub title: PostTitle,
    pub text: String,
    pub pub_date: NaiveDateTime,
    pub image: Option<String>,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
    pub category_id: Option<CategoryId>,
    pub location_id: Option<LocationId>,
    pub author_id: UserId,
}

/// Fields applied when a post is edited. `image: None` keeps the stored one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePost {
    pub title: PostTitle,
    pub text: String,
    pub pub_date: NaiveDateTime,
    pub image: Option<String>,
    pub is_published: bool,
    pub category_id: Option<CategoryId>,
    pub location_id: Option<LocationId>,
}
