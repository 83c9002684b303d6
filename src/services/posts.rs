use chrono::NaiveDateTime;

use crate::domain::access::{MutationTarget, can_mutate};
use crate::domain::comment::Comment;
use crate::domain::post::Post;
use crate::domain::types::PostId;
use crate::forms::posts::PostFormPayload;
use crate::models::auth::AuthenticatedUser;
use crate::repository::{CommentReader, PostReader, PostWriter};
use crate::services::errors::log_repo_error;

use super::{ServiceError, ServiceResult};

/// Fetch a post for display together with its comments, oldest first.
///
/// Anyone may see a publicly visible post; the author additionally sees
/// their own unpublished or future-dated posts. Everyone else gets
/// `NotFound` — indistinguishable from a post that does not exist, so
/// unpublished posts leak nothing.
pub fn show_post<R>(
    post_id: PostId,
    viewer: Option<&AuthenticatedUser>,
    now: NaiveDateTime,
    repo: &R,
) -> ServiceResult<(Post, Vec<Comment>)>
where
    R: PostReader + CommentReader,
{
    let post = repo
        .get_post_by_id(post_id)
        .map_err(|e| log_repo_error("Failed to get post", e))?
        .ok_or(ServiceError::NotFound)?;

    let is_author = viewer.is_some_and(|u| post.author_id == u.id);
    if !is_author && !post.is_publicly_visible(now) {
        return Err(ServiceError::NotFound);
    }

    let comments = repo
        .list_comments(post_id)
        .map_err(|e| log_repo_error("Failed to list comments", e))?;

    Ok((post, comments))
}

/// Create a post authored by the acting user.
pub fn create_post<R>(
    payload: PostFormPayload,
    image: Option<String>,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Post>
where
    R: PostWriter,
{
    let author_id = user.user_id().map_err(|e| {
        log::error!("Invalid user id in session: {e}");
        ServiceError::Internal
    })?;

    let new_post = payload.into_new_post(author_id, image);
    repo.create_post(&new_post)
        .map_err(|e| log_repo_error("Failed to create post", e))
}

/// Apply an edit to a post. Only the author may do this.
pub fn update_post<R>(
    post_id: PostId,
    payload: PostFormPayload,
    image: Option<String>,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: PostReader + PostWriter,
{
    let actor = user.user_id().map_err(|e| {
        log::error!("Invalid user id in session: {e}");
        ServiceError::Internal
    })?;

    let post = repo
        .get_post_by_id(post_id)
        .map_err(|e| log_repo_error("Failed to get post", e))?
        .ok_or(ServiceError::NotFound)?;

    if !can_mutate(actor, MutationTarget::Post(&post)) {
        return Err(ServiceError::Unauthorized);
    }

    let update = payload.into_update_post(image);
    repo.update_post(post_id, &update)
        .map_err(|e| log_repo_error("Failed to update post", e))?;
    Ok(())
}

/// Delete a post and, transitively, its comments. Only the author may do
/// this.
pub fn delete_post<R>(post_id: PostId, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: PostReader + PostWriter,
{
    let actor = user.user_id().map_err(|e| {
        log::error!("Invalid user id in session: {e}");
        ServiceError::Internal
    })?;

    let post = repo
        .get_post_by_id(post_id)
        .map_err(|e| log_repo_error("Failed to get post", e))?
        .ok_or(ServiceError::NotFound)?;

    if !can_mutate(actor, MutationTarget::Post(&post)) {
        return Err(ServiceError::Unauthorized);
    }

    repo.delete_post(post_id)
        .map_err(|e| log_repo_error("Failed to delete post", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{CategoryId, LocationId, PostTitle};
    use crate::repository::test::TestRepository;
    use crate::services::test_fixtures::{sample_auth_user, sample_post, ts};

    fn pid(value: i32) -> PostId {
        PostId::new(value).unwrap()
    }

    fn sample_payload() -> PostFormPayload {
        PostFormPayload {
            title: PostTitle::new("Новый заголовок").unwrap(),
            text: "Новый текст".to_string(),
            pub_date: ts(1_000),
            is_published: true,
            category_id: Some(CategoryId::new(1).unwrap()),
            location_id: None::<LocationId>,
        }
    }

    #[test]
    fn anonymous_viewer_sees_published_post() {
        let repo = TestRepository::new().with_posts(vec![sample_post(1, 1, ts(1_000))]);
        let (post, comments) = show_post(pid(1), None, ts(2_000), &repo).unwrap();
        assert_eq!(post.id, 1);
        assert!(comments.is_empty());
    }

    #[test]
    fn author_sees_own_future_post_but_stranger_does_not() {
        let future = sample_post(1, 1, ts(5_000));
        let repo = TestRepository::new().with_posts(vec![future]);
        let author = sample_auth_user(1, "anna");
        let stranger = sample_auth_user(2, "boris");

        assert!(show_post(pid(1), Some(&author), ts(1_000), &repo).is_ok());
        let err = show_post(pid(1), Some(&stranger), ts(1_000), &repo).unwrap_err();
        assert_eq!(err, ServiceError::NotFound);
    }

    #[test]
    fn missing_post_is_not_found() {
        let repo = TestRepository::new();
        let err = show_post(pid(7), None, ts(0), &repo).unwrap_err();
        assert_eq!(err, ServiceError::NotFound);
    }

    #[test]
    fn non_author_cannot_update_a_post() {
        let repo = TestRepository::new().with_posts(vec![sample_post(1, 1, ts(1_000))]);
        let stranger = sample_auth_user(2, "boris");

        let err = update_post(pid(1), sample_payload(), None, &stranger, &repo).unwrap_err();
        assert_eq!(err, ServiceError::Unauthorized);
    }

    #[test]
    fn non_author_cannot_delete_a_post() {
        let repo = TestRepository::new().with_posts(vec![sample_post(1, 1, ts(1_000))]);
        let stranger = sample_auth_user(2, "boris");

        let err = delete_post(pid(1), &stranger, &repo).unwrap_err();
        assert_eq!(err, ServiceError::Unauthorized);
    }

    #[test]
    fn author_updates_own_post() {
        let repo = TestRepository::new().with_posts(vec![sample_post(1, 1, ts(1_000))]);
        let author = sample_auth_user(1, "anna");

        update_post(pid(1), sample_payload(), None, &author, &repo).unwrap();
        let (post, _) = show_post(pid(1), Some(&author), ts(2_000), &repo).unwrap();
        assert_eq!(post.title.as_str(), "Новый заголовок");
    }

    #[test]
    fn deleting_a_post_removes_its_comments() {
        use crate::repository::CommentReader;
        use crate::services::test_fixtures::sample_comment;

        let repo = TestRepository::new()
            .with_posts(vec![sample_post(1, 1, ts(1_000))])
            .with_comments(vec![sample_comment(1, 1, 2, ts(1_500))]);
        let author = sample_auth_user(1, "anna");

        delete_post(pid(1), &author, &repo).unwrap();
        assert!(repo.list_comments(pid(1)).unwrap().is_empty());
    }
}
