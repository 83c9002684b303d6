use chrono::NaiveDateTime;

use crate::domain::access::{MutationTarget, can_mutate};
use crate::domain::comment::{Comment, NewComment};
use crate::domain::types::{CommentId, PostId};
use crate::forms::comments::CommentFormPayload;
use crate::models::auth::AuthenticatedUser;
use crate::repository::{CommentReader, CommentWriter, PostReader};
use crate::services::errors::log_repo_error;

use super::{ServiceError, ServiceResult};

/// Leave a comment under a post.
///
/// The post must be visible to the actor: public, or the actor's own. A
/// hidden post reports `NotFound`, leaking nothing about its existence.
pub fn add_comment<R>(
    post_id: PostId,
    payload: CommentFormPayload,
    user: &AuthenticatedUser,
    now: NaiveDateTime,
    repo: &R,
) -> ServiceResult<Comment>
where
    R: PostReader + CommentWriter,
{
    let author_id = user.user_id().map_err(|e| {
        log::error!("Invalid user id in session: {e}");
        ServiceError::Internal
    })?;

    let post = repo
        .get_post_by_id(post_id)
        .map_err(|e| log_repo_error("Failed to get post", e))?
        .ok_or(ServiceError::NotFound)?;

    let is_author = post.author_id == author_id;
    if !is_author && !post.is_publicly_visible(now) {
        return Err(ServiceError::NotFound);
    }

    let comment = NewComment {
        text: payload.text,
        post_id,
        author_id,
    };
    repo.create_comment(&comment)
        .map_err(|e| log_repo_error("Failed to create comment", e))
}

/// Replace a comment's text. Only the comment's author may do this.
pub fn update_comment<R>(
    comment_id: CommentId,
    payload: CommentFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: CommentReader + CommentWriter,
{
    let actor = user.user_id().map_err(|e| {
        log::error!("Invalid user id in session: {e}");
        ServiceError::Internal
    })?;

    let comment = repo
        .get_comment_by_id(comment_id)
        .map_err(|e| log_repo_error("Failed to get comment", e))?
        .ok_or(ServiceError::NotFound)?;

    if !can_mutate(actor, MutationTarget::Comment(&comment)) {
        return Err(ServiceError::Unauthorized);
    }

    repo.update_comment(comment_id, &payload.text)
        .map_err(|e| log_repo_error("Failed to update comment", e))?;
    Ok(())
}

/// Delete a comment. Only the comment's author may do this.
pub fn delete_comment<R>(
    comment_id: CommentId,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: CommentReader + CommentWriter,
{
    let actor = user.user_id().map_err(|e| {
        log::error!("Invalid user id in session: {e}");
        ServiceError::Internal
    })?;

    let comment = repo
        .get_comment_by_id(comment_id)
        .map_err(|e| log_repo_error("Failed to get comment", e))?
        .ok_or(ServiceError::NotFound)?;

    if !can_mutate(actor, MutationTarget::Comment(&comment)) {
        return Err(ServiceError::Unauthorized);
    }

    repo.delete_comment(comment_id)
        .map_err(|e| log_repo_error("Failed to delete comment", e))?;
    Ok(())
}
