//! Shared fixtures for service unit tests.

use chrono::{DateTime, NaiveDateTime};

use crate::domain::category::Category;
use crate::domain::comment::Comment;
use crate::domain::post::{Post, PostCategory};
use crate::domain::types::{
    CategoryId, CategorySlug, CategoryTitle, CommentId, EmailAddress, PostId, PostTitle, UserId,
    Username,
};
use crate::domain::user::User;
use crate::models::auth::AuthenticatedUser;

pub fn ts(secs: i64) -> NaiveDateTime {
    DateTime::from_timestamp(secs, 0).unwrap().naive_utc()
}

pub fn published_category() -> PostCategory {
    PostCategory {
        id: CategoryId::new(1).unwrap(),
        title: CategoryTitle::new("Путешествия").unwrap(),
        slug: CategorySlug::new("travel").unwrap(),
        is_published: true,
    }
}

pub fn sample_category(id: i32, slug: &str, is_published: bool) -> Category {
    Category {
        id: CategoryId::new(id).unwrap(),
        title: CategoryTitle::new("Путешествия").unwrap(),
        description: "Заметки из поездок".to_string(),
        slug: CategorySlug::new(slug).unwrap(),
        is_published,
        created_at: ts(0),
    }
}

/// A published post with a published category, visible whenever
/// `pub_date <= now`.
pub fn sample_post(id: i32, author: i32, pub_date: NaiveDateTime) -> Post {
    Post {
        id: PostId::new(id).unwrap(),
        title: PostTitle::new(format!("Пост {id}")).unwrap(),
        text: "text".to_string(),
        pub_date,
        image: None,
        is_published: true,
        created_at: pub_date,
        location_id: None,
        author_id: UserId::new(author).unwrap(),
        category: Some(published_category()),
        location: None,
        author: None,
        comment_count: None,
    }
}

pub fn sample_user(id: i32, username: &str) -> User {
    User {
        id: UserId::new(id).unwrap(),
        username: Username::new(username).unwrap(),
        first_name: "Анна".to_string(),
        last_name: "Петрова".to_string(),
        email: EmailAddress::new(format!("{username}@example.com")).unwrap(),
        password_hash: "unused".to_string(),
        date_joined: ts(0),
    }
}

pub fn sample_auth_user(id: i32, username: &str) -> AuthenticatedUser {
    AuthenticatedUser {
        id,
        username: username.to_string(),
        name: "Анна Петрова".to_string(),
        email: format!("{username}@example.com"),
    }
}

pub fn sample_comment(id: i32, post: i32, author: i32, created_at: NaiveDateTime) -> Comment {
    Comment {
        id: CommentId::new(id).unwrap(),
        text: format!("Комментарий {id}"),
        created_at,
        post_id: PostId::new(post).unwrap(),
        author_id: UserId::new(author).unwrap(),
        author: None,
    }
}
