//! Ownership checks guarding every mutation.

use crate::domain::comment::Comment;
use crate::domain::post::Post;
use crate::domain::types::UserId;
use crate::domain::user::User;

/// The entity a mutation is aimed at.
#[derive(Debug, Clone, Copy)]
pub enum MutationTarget<'a> {
    Post(&'a Post),
    Comment(&'a Comment),
    Profile(&'a User),
}

/// Whether `actor` may modify or delete `target`.
///
/// Posts and comments may only be mutated by their author, profiles only by
/// the user they belong to. Callers must refuse the mutation on `false`;
/// there is no partially-authorized outcome.
pub fn can_mutate(actor: UserId, target: MutationTarget<'_>) -> bool {
    match target {
        MutationTarget::Post(post) => post.author_id == actor,
        MutationTarget::Comment(comment) => comment.author_id == actor,
        MutationTarget::Profile(user) => user.id == actor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{CommentId, EmailAddress, PostId, PostTitle, Username};
    use chrono::DateTime;

    fn uid(value: i32) -> UserId {
        UserId::new(value).unwrap()
    }

    fn sample_post(author: UserId) -> Post {
        Post {
            id: PostId::new(1).unwrap(),
            title: PostTitle::new("Заголовок").unwrap(),
            text: "text".to_string(),
            pub_date: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
            image: None,
            is_published: true,
            created_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
            location_id: None,
            author_id: author,
            category: None,
            location: None,
            author: None,
            comment_count: None,
        }
    }

    fn sample_comment(author: UserId) -> Comment {
        Comment {
            id: CommentId::new(1).unwrap(),
            text: "text".to_string(),
            created_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
            post_id: PostId::new(1).unwrap(),
            author_id: author,
            author: None,
        }
    }

    fn sample_user(id: UserId) -> User {
        User {
            id,
            username: Username::new("reader").unwrap(),
            first_name: String::new(),
            last_name: String::new(),
            email: EmailAddress::new("reader@example.com").unwrap(),
            password_hash: "x".to_string(),
            date_joined: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
        }
    }

    #[test]
    fn only_the_author_may_mutate_a_post() {
        let post = sample_post(uid(1));
        assert!(can_mutate(uid(1), MutationTarget::Post(&post)));
        assert!(!can_mutate(uid(2), MutationTarget::Post(&post)));
    }

    #[test]
    fn only_the_author_may_mutate_a_comment() {
        let comment = sample_comment(uid(3));
        assert!(can_mutate(uid(3), MutationTarget::Comment(&comment)));
        assert!(!can_mutate(uid(1), MutationTarget::Comment(&comment)));
    }

    #[test]
    fn only_the_owner_may_mutate_a_profile() {
        let user = sample_user(uid(5));
        assert!(can_mutate(uid(5), MutationTarget::Profile(&user)));
        assert!(!can_mutate(uid(6), MutationTarget::Profile(&user)));
    }
}
