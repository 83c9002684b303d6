//! Public visibility rules for posts.

use chrono::NaiveDateTime;

use crate::domain::post::Post;

/// Whether `post` may be shown to a viewer who is not its author.
///
/// A post is publicly visible when it is published itself, its category is
/// present and published, and its publication date is not in the future.
/// A post whose category was deleted is treated as unpublished rather than
/// as an error.
pub fn is_publicly_visible(post: &Post, now: NaiveDateTime) -> bool {
    post.is_published
        && post.category.as_ref().is_some_and(|c| c.is_published)
        && post.pub_date <= now
}

impl Post {
    /// See [`is_publicly_visible`].
    pub fn is_publicly_visible(&self, now: NaiveDateTime) -> bool {
        is_publicly_visible(self, now)
    }
}
