use chrono::NaiveDateTime;

use crate::db::{DbConnection, DbPool};
use crate::domain::category::{Category, NewCategory};
use crate::domain::comment::{Comment, NewComment};
use crate::domain::location::{Location, NewLocation};
use crate::domain::post::{NewPost, Post, UpdatePost};
use crate::domain::types::{CategoryId, CategorySlug, CommentId, PostId, UserId};
use crate::domain::user::{NewUser, User};
use crate::pagination::Pagination;

pub mod category;
pub mod comment;
pub mod errors;
pub mod location;
pub mod post;
#[cfg(test)]
pub mod test;
pub mod user;

use errors::RepositoryResult;

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// The base collection a post listing starts from.
#[derive(Debug, Clone, Default)]
pub enum PostScope {
    #[default]
    All,
    /// Posts filed under the category with this slug.
    Category(CategorySlug),
    /// Posts written by this author.
    Author(UserId),
}

/// Configuration of a composed post listing.
///
/// The flags are applied in a fixed order: visibility filter, relation
/// loading, comment counting (which also orders by publication date,
/// newest first), pagination. The order is part of the contract, not an
/// artifact of call chaining.
#[derive(Debug, Clone, Default)]
pub struct PostListQuery {
    pub scope: PostScope,
    /// When set, retain only posts publicly visible at this instant. The
    /// instant is supplied by the caller so that a request sees one
    /// consistent "now".
    pub published_at: Option<NaiveDateTime>,
    /// Eagerly load locations and authors. A loading-strategy hint; the
    /// returned posts are the same either way, minus the attached entities.
    pub with_related: bool,
    /// Attach per-post comment counts and order by `pub_date` descending,
    /// ties by insertion order.
    pub with_comment_count: bool,
    /// Page window. An out-of-range page clamps to the nearest valid page;
    /// a zero `per_page` is a configuration error.
    pub pagination: Option<Pagination>,
}

impl PostListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, slug: CategorySlug) -> Self {
        self.scope = PostScope::Category(slug);
        self
    }

    pub fn author(mut self, author_id: UserId) -> Self {
        self.scope = PostScope::Author(author_id);
        self
    }

    pub fn published(mut self, now: NaiveDateTime) -> Self {
        self.published_at = Some(now);
        self
    }

    pub fn with_related(mut self) -> Self {
        self.with_related = true;
        self
    }

    pub fn with_comment_count(mut self) -> Self {
        self.with_comment_count = true;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Read-only operations for post entities.
pub trait PostReader {
    /// List posts matching the supplied query configuration. Returns the
    /// pre-pagination total together with the page of posts.
    fn list_posts(&self, query: PostListQuery) -> RepositoryResult<(usize, Vec<Post>)>;
    /// Retrieve a post by its identifier, with category, location and author
    /// attached.
    fn get_post_by_id(&self, id: PostId) -> RepositoryResult<Option<Post>>;
}

/// Write operations for post entities.
pub trait PostWriter {
    /// Persist a new post and return it as stored.
    fn create_post(&self, post: &NewPost) -> RepositoryResult<Post>;
    /// Apply an edit to a post.
    fn update_post(&self, id: PostId, update: &UpdatePost) -> RepositoryResult<usize>;
    /// Delete a post; its comments go with it.
    fn delete_post(&self, id: PostId) -> RepositoryResult<usize>;
}

/// Read-only operations for comment entities.
pub trait CommentReader {
    /// Comments under a post, oldest first, with authors attached.
    fn list_comments(&self, post_id: PostId) -> RepositoryResult<Vec<Comment>>;
    /// Retrieve a comment by its identifier.
    fn get_comment_by_id(&self, id: CommentId) -> RepositoryResult<Option<Comment>>;
}

/// Write operations for comment entities.
pub trait CommentWriter {
    /// Persist a new comment, stamping its creation time.
    fn create_comment(&self, comment: &NewComment) -> RepositoryResult<Comment>;
    /// Replace a comment's text. The creation timestamp is immutable.
    fn update_comment(&self, id: CommentId, text: &str) -> RepositoryResult<usize>;
    /// Delete a comment.
    fn delete_comment(&self, id: CommentId) -> RepositoryResult<usize>;
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    /// Retrieve a category by its slug.
    fn get_category_by_slug(&self, slug: &CategorySlug) -> RepositoryResult<Option<Category>>;
    /// List published categories for selection controls.
    fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
}

/// Write operations for category entities.
pub trait CategoryWriter {
    /// Persist a new category.
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category>;
    /// Delete a category; posts filed under it keep existing with no
    /// category, which takes them out of public view.
    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize>;
}

/// Read-only operations for location entities.
pub trait LocationReader {
    /// List published locations for selection controls.
    fn list_locations(&self) -> RepositoryResult<Vec<Location>>;
}

/// Write operations for location entities.
pub trait LocationWriter {
    /// Persist a new location.
    fn create_location(&self, location: &NewLocation) -> RepositoryResult<Location>;
}

/// Read-only operations for user entities.
pub trait UserReader {
    /// Retrieve a user by its identifier.
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;
    /// Retrieve a user by username.
    fn get_user_by_username(&self, username: &str) -> RepositoryResult<Option<User>>;
}

/// Write operations for user entities.
pub trait UserWriter {
    /// Register a new user. A taken username is a validation error.
    fn create_user(&self, user: &NewUser) -> RepositoryResult<User>;
    /// Update profile fields of a user. Credentials are untouched.
    fn update_user(
        &self,
        id: UserId,
        username: &str,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> RepositoryResult<usize>;
}
