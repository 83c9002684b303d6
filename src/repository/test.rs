use std::cell::RefCell;

use chrono::Utc;

use crate::domain::category::{Category, NewCategory};
use crate::domain::comment::{Comment, NewComment};
use crate::domain::location::{Location, NewLocation};
use crate::domain::post::{NewPost, Post, UpdatePost};
use crate::domain::types::{CategoryId, CommentId, PostId, UserId};
use crate::domain::user::{AuthorRef, NewUser, User};
use crate::domain::visibility::is_publicly_visible;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    CategoryReader, CategoryWriter, CommentReader, CommentWriter, LocationReader, LocationWriter,
    PostListQuery, PostReader, PostScope, PostWriter, UserReader, UserWriter,
};

/// Simple in-memory repository used for unit tests.
///
/// Reproduces the composer semantics of the Diesel implementation: insertion
/// order by default, `pub_date` descending with id tie-break when comment
/// counts are requested, page clamping, and the zero-page-size configuration
/// error.
#[derive(Default)]
pub struct TestRepository {
    users: RefCell<Vec<User>>,
    categories: RefCell<Vec<Category>>,
    locations: RefCell<Vec<Location>>,
    posts: RefCell<Vec<Post>>,
    comments: RefCell<Vec<Comment>>,
}

impl TestRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(self, users: Vec<User>) -> Self {
        *self.users.borrow_mut() = users;
        self
    }

    pub fn with_categories(self, categories: Vec<Category>) -> Self {
        *self.categories.borrow_mut() = categories;
        self
    }

    pub fn with_locations(self, locations: Vec<Location>) -> Self {
        *self.locations.borrow_mut() = locations;
        self
    }

    pub fn with_posts(self, posts: Vec<Post>) -> Self {
        *self.posts.borrow_mut() = posts;
        self
    }

    pub fn with_comments(self, comments: Vec<Comment>) -> Self {
        *self.comments.borrow_mut() = comments;
        self
    }

    fn comment_count(&self, post_id: PostId) -> i64 {
        self.comments
            .borrow()
            .iter()
            .filter(|c| c.post_id == post_id)
            .count() as i64
    }

    fn author_ref(&self, author_id: UserId) -> Option<AuthorRef> {
        self.users
            .borrow()
            .iter()
            .find(|u| u.id == author_id)
            .map(AuthorRef::from)
    }
}

impl PostReader for TestRepository {
    fn list_posts(&self, query: PostListQuery) -> RepositoryResult<(usize, Vec<Post>)> {
        if let Some(pagination) = &query.pagination {
            if pagination.per_page == 0 {
                return Err(RepositoryError::Configuration(
                    "per_page must be greater than zero".to_string(),
                ));
            }
        }

        let mut items: Vec<Post> = self.posts.borrow().clone();

        match &query.scope {
            PostScope::All => {}
            PostScope::Category(slug) => {
                items.retain(|p| p.category.as_ref().is_some_and(|c| &c.slug == slug));
            }
            PostScope::Author(author_id) => {
                items.retain(|p| p.author_id == *author_id);
            }
        }

        if let Some(now) = query.published_at {
            items.retain(|p| is_publicly_visible(p, now));
        }

        if query.with_related {
            for post in items.iter_mut() {
                post.location = post.location_id.and_then(|id| {
                    self.locations.borrow().iter().find(|l| l.id == id).cloned()
                });
                post.author = self.author_ref(post.author_id);
            }
        }

        if query.with_comment_count {
            for post in items.iter_mut() {
                post.comment_count = Some(self.comment_count(post.id));
            }
            items.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(a.id.cmp(&b.id)));
        }

        let total = items.len();

        if let Some(pagination) = &query.pagination {
            let offset = pagination.offset(total);
            items = items
                .into_iter()
                .skip(offset)
                .take(pagination.per_page)
                .collect();
        }

        Ok((total, items))
    }

    fn get_post_by_id(&self, id: PostId) -> RepositoryResult<Option<Post>> {
        let mut post = self.posts.borrow().iter().find(|p| p.id == id).cloned();
        if let Some(post) = post.as_mut() {
            post.author = self.author_ref(post.author_id);
            post.location = post
                .location_id
                .and_then(|id| self.locations.borrow().iter().find(|l| l.id == id).cloned());
        }
        Ok(post)
    }
}

impl PostWriter for TestRepository {
    fn create_post(&self, post: &NewPost) -> RepositoryResult<Post> {
        let mut posts = self.posts.borrow_mut();
        let next_id = posts.iter().map(|p| p.id.get()).max().unwrap_or(0) + 1;
        let category = post.category_id.and_then(|id| {
            self.categories
                .borrow()
                .iter()
                .find(|c| c.id == id)
                .map(|c| crate::domain::post::PostCategory {
                    id: c.id,
                    title: c.title.clone(),
                    slug: c.slug.clone(),
                    is_published: c.is_published,
                })
        });
        let created = Post {
            id: PostId::new(next_id)?,
            title: post.title.clone(),
            text: post.text.clone(),
            pub_date: post.pub_date,
            image: post.image.clone(),
            is_published: post.is_published,
            created_at: post.created_at,
            location_id: post.location_id,
            author_id: post.author_id,
            category,
            location: None,
            author: None,
            comment_count: None,
        };
        posts.push(created.clone());
        Ok(created)
    }

    fn update_post(&self, id: PostId, update: &UpdatePost) -> RepositoryResult<usize> {
        let mut posts = self.posts.borrow_mut();
        let Some(post) = posts.iter_mut().find(|p| p.id == id) else {
            return Ok(0);
        };
        post.title = update.title.clone();
        post.text = update.text.clone();
        post.pub_date = update.pub_date;
        post.is_published = update.is_published;
        if let Some(image) = &update.image {
            post.image = Some(image.clone());
        }
        post.location_id = update.location_id;
        post.category = update.category_id.and_then(|id| {
            self.categories
                .borrow()
                .iter()
                .find(|c| c.id == id)
                .map(|c| crate::domain::post::PostCategory {
                    id: c.id,
                    title: c.title.clone(),
                    slug: c.slug.clone(),
                    is_published: c.is_published,
                })
        });
        Ok(1)
    }

    fn delete_post(&self, id: PostId) -> RepositoryResult<usize> {
        let before = self.posts.borrow().len();
        self.posts.borrow_mut().retain(|p| p.id != id);
        self.comments.borrow_mut().retain(|c| c.post_id != id);
        Ok(before - self.posts.borrow().len())
    }
}

impl CommentReader for TestRepository {
    fn list_comments(&self, post_id: PostId) -> RepositoryResult<Vec<Comment>> {
        let mut items: Vec<Comment> = self
            .comments
            .borrow()
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        for comment in items.iter_mut() {
            comment.author = self.author_ref(comment.author_id);
        }
        Ok(items)
    }

    fn get_comment_by_id(&self, id: CommentId) -> RepositoryResult<Option<Comment>> {
        Ok(self.comments.borrow().iter().find(|c| c.id == id).cloned())
    }
}

impl CommentWriter for TestRepository {
    fn create_comment(&self, comment: &NewComment) -> RepositoryResult<Comment> {
        let mut comments = self.comments.borrow_mut();
        let next_id = comments.iter().map(|c| c.id.get()).max().unwrap_or(0) + 1;
        let created = Comment {
            id: CommentId::new(next_id)?,
            text: comment.text.clone(),
            created_at: Utc::now().naive_utc(),
            post_id: comment.post_id,
            author_id: comment.author_id,
            author: None,
        };
        comments.push(created.clone());
        Ok(created)
    }

    fn update_comment(&self, id: CommentId, text: &str) -> RepositoryResult<usize> {
        let mut comments = self.comments.borrow_mut();
        let Some(comment) = comments.iter_mut().find(|c| c.id == id) else {
            return Ok(0);
        };
        comment.text = text.to_string();
        Ok(1)
    }

    fn delete_comment(&self, id: CommentId) -> RepositoryResult<usize> {
        let before = self.comments.borrow().len();
        self.comments.borrow_mut().retain(|c| c.id != id);
        Ok(before - self.comments.borrow().len())
    }
}

impl CategoryReader for TestRepository {
    fn get_category_by_slug(
        &self,
        slug: &crate::domain::types::CategorySlug,
    ) -> RepositoryResult<Option<Category>> {
        Ok(self
            .categories
            .borrow()
            .iter()
            .find(|c| &c.slug == slug)
            .cloned())
    }

    fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        Ok(self
            .categories
            .borrow()
            .iter()
            .filter(|c| c.is_published)
            .cloned()
            .collect())
    }
}

impl CategoryWriter for TestRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category> {
        let mut categories = self.categories.borrow_mut();
        let next_id = categories.iter().map(|c| c.id.get()).max().unwrap_or(0) + 1;
        let created = Category {
            id: CategoryId::new(next_id)?,
            title: category.title.clone(),
            description: category.description.clone(),
            slug: category.slug.clone(),
            is_published: category.is_published,
            created_at: category.created_at,
        };
        categories.push(created.clone());
        Ok(created)
    }

    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize> {
        let before = self.categories.borrow().len();
        self.categories.borrow_mut().retain(|c| c.id != id);
        // Posts keep existing with their category reference severed.
        for post in self.posts.borrow_mut().iter_mut() {
            if post.category.as_ref().is_some_and(|c| c.id == id) {
                post.category = None;
            }
        }
        Ok(before - self.categories.borrow().len())
    }
}

impl LocationReader for TestRepository {
    fn list_locations(&self) -> RepositoryResult<Vec<Location>> {
        Ok(self
            .locations
            .borrow()
            .iter()
            .filter(|l| l.is_published)
            .cloned()
            .collect())
    }
}

impl LocationWriter for TestRepository {
    fn create_location(&self, location: &NewLocation) -> RepositoryResult<Location> {
        let mut locations = self.locations.borrow_mut();
        let next_id = locations.iter().map(|l| l.id.get()).max().unwrap_or(0) + 1;
        let created = Location {
            id: crate::domain::types::LocationId::new(next_id)?,
            name: location.name.clone(),
            is_published: location.is_published,
            created_at: location.created_at,
        };
        locations.push(created.clone());
        Ok(created)
    }
}

impl UserReader for TestRepository {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>> {
        Ok(self.users.borrow().iter().find(|u| u.id == id).cloned())
    }

    fn get_user_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        Ok(self
            .users
            .borrow()
            .iter()
            .find(|u| u.username.as_str() == username)
            .cloned())
    }
}

impl UserWriter for TestRepository {
    fn create_user(&self, user: &NewUser) -> RepositoryResult<User> {
        let mut users = self.users.borrow_mut();
        if users
            .iter()
            .any(|u| u.username.as_str() == user.username.as_str())
        {
            return Err(RepositoryError::Validation(
                "username is already taken".to_string(),
            ));
        }
        let next_id = users.iter().map(|u| u.id.get()).max().unwrap_or(0) + 1;
        let created = User {
            id: UserId::new(next_id)?,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            date_joined: user.date_joined,
        };
        users.push(created.clone());
        Ok(created)
    }

    fn update_user(
        &self,
        id: UserId,
        username: &str,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> RepositoryResult<usize> {
        let mut users = self.users.borrow_mut();
        if users
            .iter()
            .any(|u| u.id != id && u.username.as_str() == username)
        {
            return Err(RepositoryError::Validation(
                "username is already taken".to_string(),
            ));
        }
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(0);
        };
        user.username = crate::domain::types::Username::new(username)?;
        user.first_name = first_name.to_string();
        user.last_name = last_name.to_string();
        user.email = crate::domain::types::EmailAddress::new(email)?;
        Ok(1)
    }
}
