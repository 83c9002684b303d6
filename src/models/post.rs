use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::post::{
    NewPost as DomainNewPost, Post as DomainPost, PostCategory, UpdatePost as DomainUpdatePost,
};
use crate::domain::types::{PostTitle, TypeConstraintError};
use crate::models::category::Category as DbCategory;

/// Diesel model representing the `posts` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::posts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub text: String,
    pub pub_date: NaiveDateTime,
    pub image: Option<String>,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
    pub category_id: Option<i32>,
    pub location_id: Option<i32>,
    pub author_id: i32,
}

/// Insertable form of [`Post`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::posts)]
pub struct NewPost {
    pub title: String,
    pub text: String,
    pub pub_date: NaiveDateTime,
    pub image: Option<String>,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
    pub category_id: Option<i32>,
    pub location_id: Option<i32>,
    pub author_id: i32,
}

/// Changeset applied when a post is edited.
///
/// `image: None` leaves the stored image untouched; clearing category or
/// location writes NULL.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::posts)]
pub struct UpdatePost {
    pub title: String,
    pub text: String,
    pub pub_date: NaiveDateTime,
    pub image: Option<String>,
    pub is_published: bool,
    #[diesel(treat_none_as_null = true)]
    pub category_id: Option<i32>,
    #[diesel(treat_none_as_null = true)]
    pub location_id: Option<i32>,
}

impl TryFrom<(Post, Option<DbCategory>)> for DomainPost {
    type Error = TypeConstraintError;

    fn try_from((post, category): (Post, Option<DbCategory>)) -> Result<Self, Self::Error> {
        let category = category.map(PostCategory::try_from).transpose()?;
        Ok(Self {
            id: post.id.try_into()?,
            title: PostTitle::new(post.title)?,
            text: post.text,
            pub_date: post.pub_date,
            image: post.image,
            is_published: post.is_published,
            created_at: post.created_at,
            location_id: post.location_id.map(TryInto::try_into).transpose()?,
            author_id: post.author_id.try_into()?,
            category,
            location: None,
            author: None,
            comment_count: None,
        })
    }
}

impl From<DomainNewPost> for NewPost {
    fn from(post: DomainNewPost) -> Self {
        Self {
            title: post.title.into_inner(),
            text: post.text,
            pub_date: post.pub_date,
            image: post.image,
            is_published: post.is_published,
            created_at: post.created_at,
            category_id: post.category_id.map(Into::into),
            location_id: post.location_id.map(Into::into),
            author_id: post.author_id.into(),
        }
    }
}

impl From<DomainUpdatePost> for UpdatePost {
    fn from(post: DomainUpdatePost) -> Self {
        Self {
            title: post.title.into_inner(),
            text: post.text,
            pub_date: post.pub_date,
            image: post.image,
            is_published: post.is_published,
            category_id: post.category_id.map(Into::into),
            location_id: post.location_id.map(Into::into),
        }
    }
}
