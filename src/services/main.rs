use chrono::NaiveDateTime;

use crate::domain::post::Post;
use crate::pagination::{Paginated, Pagination};
use crate::repository::{PostListQuery, PostReader};
use crate::services::errors::log_repo_error;

use super::ServiceResult;

/// Core business logic for the index page: publicly visible posts, newest
/// first, with related entities and comment counts, paginated.
///
/// `now` is supplied by the caller so that one request evaluates visibility
/// against a single instant.
pub fn show_index<R>(
    page: usize,
    per_page: usize,
    now: NaiveDateTime,
    repo: &R,
) -> ServiceResult<Paginated<Post>>
where
    R: PostReader,
{
    let pagination = Pagination::new(page, per_page);
    let query = PostListQuery::new()
        .published(now)
        .with_related()
        .with_comment_count()
        .paginate(page, per_page);

    let (total, posts) = repo
        .list_posts(query)
        .map_err(|e| log_repo_error("Failed to list posts", e))?;

    Ok(Paginated::from_page(posts, &pagination, total))
}
