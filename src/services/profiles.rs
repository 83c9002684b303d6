use chrono::NaiveDateTime;

use crate::domain::access::{MutationTarget, can_mutate};
use crate::domain::post::Post;
use crate::domain::user::User;
use crate::forms::users::UserEditFormPayload;
use crate::models::auth::AuthenticatedUser;
use crate::pagination::{Paginated, Pagination};
use crate::repository::{PostListQuery, PostReader, UserReader, UserWriter};
use crate::services::errors::log_repo_error;

use super::{ServiceError, ServiceResult};

/// Profile page: the user plus their posts.
///
/// The owner sees everything they wrote, unpublished and future-dated posts
/// included; every other viewer sees only what is publicly visible.
pub fn show_profile<R>(
    username: &str,
    viewer: Option<&AuthenticatedUser>,
    page: usize,
    per_page: usize,
    now: NaiveDateTime,
    repo: &R,
) -> ServiceResult<(User, Paginated<Post>)>
where
    R: UserReader + PostReader,
{
    let user = repo
        .get_user_by_username(username)
        .map_err(|e| log_repo_error("Failed to get user", e))?
        .ok_or(ServiceError::NotFound)?;

    let is_owner = viewer.is_some_and(|v| user.id == v.id);

    let pagination = Pagination::new(page, per_page);
    let mut query = PostListQuery::new()
        .author(user.id)
        .with_related()
        .with_comment_count()
        .paginate(page, per_page);
    if !is_owner {
        query = query.published(now);
    }

    let (total, posts) = repo
        .list_posts(query)
        .map_err(|e| log_repo_error("Failed to list profile posts", e))?;

    Ok((user, Paginated::from_page(posts, &pagination, total)))
}

/// Update profile fields. Only the owner may do this.
pub fn update_profile<R>(
    username: &str,
    payload: UserEditFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: UserReader + UserWriter,
{
    let actor = user.user_id().map_err(|e| {
        log::error!("Invalid user id in session: {e}");
        ServiceError::Internal
    })?;

    let profile = repo
        .get_user_by_username(username)
        .map_err(|e| log_repo_error("Failed to get user", e))?
        .ok_or(ServiceError::NotFound)?;

    if !can_mutate(actor, MutationTarget::Profile(&profile)) {
        return Err(ServiceError::Unauthorized);
    }

    repo.update_user(
        profile.id,
        payload.username.as_str(),
        &payload.first_name,
        &payload.last_name,
        payload.email.as_str(),
    )
    .map_err(|e| log_repo_error("Failed to update user", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{EmailAddress, Username};
    use crate::repository::test::TestRepository;
    use crate::services::test_fixtures::{sample_auth_user, sample_post, sample_user, ts};

    #[test]
    fn owner_sees_future_posts_stranger_does_not() {
        let repo = TestRepository::new()
            .with_users(vec![sample_user(1, "anna")])
            .with_posts(vec![sample_post(1, 1, ts(1_000)), sample_post(2, 1, ts(9_000))]);
        let owner = sample_auth_user(1, "anna");

        let (_, own_view) = show_profile("anna", Some(&owner), 1, 10, ts(2_000), &repo).unwrap();
        assert_eq!(own_view.total, 2);

        let (_, public_view) = show_profile("anna", None, 1, 10, ts(2_000), &repo).unwrap();
        assert_eq!(public_view.total, 1);
        assert_eq!(public_view.items[0].id, 1);
    }

    #[test]
    fn unknown_profile_is_not_found() {
        let repo = TestRepository::new();
        let err = show_profile("ghost", None, 1, 10, ts(0), &repo).unwrap_err();
        assert_eq!(err, ServiceError::NotFound);
    }

    #[test]
    fn only_the_owner_may_edit_a_profile() {
        let repo = TestRepository::new().with_users(vec![sample_user(1, "anna")]);
        let stranger = sample_auth_user(2, "boris");
        let payload = UserEditFormPayload {
            username: Username::new("anna").unwrap(),
            first_name: "Анна".to_string(),
            last_name: "Сидорова".to_string(),
            email: EmailAddress::new("anna@example.com").unwrap(),
        };

        let err = update_profile("anna", payload, &stranger, &repo).unwrap_err();
        assert_eq!(err, ServiceError::Unauthorized);
    }

    #[test]
    fn owner_edit_is_applied() {
        let repo = TestRepository::new().with_users(vec![sample_user(1, "anna")]);
        let owner = sample_auth_user(1, "anna");
        let payload = UserEditFormPayload {
            username: Username::new("anna").unwrap(),
            first_name: "Анна".to_string(),
            last_name: "Сидорова".to_string(),
            email: EmailAddress::new("anna@example.com").unwrap(),
        };

        update_profile("anna", payload, &owner, &repo).unwrap();
        let (user, _) = show_profile("anna", Some(&owner), 1, 10, ts(0), &repo).unwrap();
        assert_eq!(user.last_name, "Сидорова");
    }
}
