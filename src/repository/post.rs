use std::collections::HashMap;

use diesel::dsl::count_star;
use diesel::prelude::*;

use crate::domain::location::Location;
use crate::domain::post::{NewPost, Post, UpdatePost};
use crate::domain::types::PostId;
use crate::domain::user::AuthorRef;
use crate::models::category::Category as DbCategory;
use crate::models::location::Location as DbLocation;
use crate::models::post::{
    NewPost as DbNewPost, Post as DbPost, UpdatePost as DbUpdatePost,
};
use crate::models::user::User as DbUser;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, PostListQuery, PostReader, PostScope, PostWriter};

impl DieselRepository {
    /// Batch-load locations and authors for the given posts. Two grouped
    /// queries regardless of page size.
    fn attach_related(
        &self,
        conn: &mut crate::db::DbConnection,
        posts: &mut [Post],
    ) -> RepositoryResult<()> {
        use crate::schema::{locations, users};

        let location_ids: Vec<i32> = posts
            .iter()
            .filter_map(|p| p.location_id.map(|id| id.get()))
            .collect();
        let author_ids: Vec<i32> = posts.iter().map(|p| p.author_id.get()).collect();

        let location_map: HashMap<i32, Location> = locations::table
            .filter(locations::id.eq_any(&location_ids))
            .load::<DbLocation>(conn)?
            .into_iter()
            .map(|l| Location::try_from(l).map(|l| (l.id.get(), l)))
            .collect::<Result<_, _>>()?;

        let author_map: HashMap<i32, AuthorRef> = users::table
            .filter(users::id.eq_any(&author_ids))
            .load::<DbUser>(conn)?
            .into_iter()
            .map(|u| {
                crate::domain::user::User::try_from(u).map(|u| (u.id.get(), AuthorRef::from(&u)))
            })
            .collect::<Result<_, _>>()?;

        for post in posts.iter_mut() {
            post.location = post
                .location_id
                .and_then(|id| location_map.get(&id.get()).cloned());
            post.author = author_map.get(&post.author_id.get()).cloned();
        }

        Ok(())
    }

    /// Attach the number of comments to each post with one grouped query.
    fn attach_comment_counts(
        &self,
        conn: &mut crate::db::DbConnection,
        posts: &mut [Post],
    ) -> RepositoryResult<()> {
        use crate::schema::comments;

        let post_ids: Vec<i32> = posts.iter().map(|p| p.id.get()).collect();

        let counts: HashMap<i32, i64> = comments::table
            .filter(comments::post_id.eq_any(&post_ids))
            .group_by(comments::post_id)
            .select((comments::post_id, count_star()))
            .load::<(i32, i64)>(conn)?
            .into_iter()
            .collect();

        for post in posts.iter_mut() {
            post.comment_count = Some(counts.get(&post.id.get()).copied().unwrap_or(0));
        }

        Ok(())
    }
}

impl PostReader for DieselRepository {
    fn list_posts(&self, query: PostListQuery) -> RepositoryResult<(usize, Vec<Post>)> {
        use crate::schema::{categories, posts};

        if let Some(pagination) = &query.pagination {
            if pagination.per_page == 0 {
                return Err(RepositoryError::Configuration(
                    "per_page must be greater than zero".to_string(),
                ));
            }
        }

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = posts::table
                .left_join(categories::table)
                .into_boxed::<diesel::sqlite::Sqlite>();

            match &query.scope {
                PostScope::All => {}
                PostScope::Category(slug) => {
                    items = items.filter(categories::slug.eq(slug.as_str()));
                }
                PostScope::Author(author_id) => {
                    items = items.filter(posts::author_id.eq(author_id.get()));
                }
            }

            // Visibility filter first; a post with no category row fails the
            // category comparison and drops out, matching the pure predicate.
            if let Some(now) = query.published_at {
                items = items
                    .filter(posts::is_published.eq(true))
                    .filter(posts::pub_date.le(now))
                    .filter(categories::is_published.eq(true));
            }

            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();

        // Counting comments is also what orders the listing newest-first;
        // otherwise rows come back in insertion order.
        if query.with_comment_count {
            items = items.order((posts::pub_date.desc(), posts::id.asc()));
        } else {
            items = items.order(posts::id.asc());
        }

        if let Some(pagination) = &query.pagination {
            let offset = pagination.offset(total) as i64;
            let limit = pagination.per_page as i64;
            items = items.offset(offset).limit(limit);
        }

        let rows: Vec<(DbPost, Option<DbCategory>)> = items
            .select((DbPost::as_select(), Option::<DbCategory>::as_select()))
            .load(&mut conn)?;

        let mut posts_page = rows
            .into_iter()
            .map(Post::try_from)
            .collect::<Result<Vec<Post>, _>>()?;

        if query.with_related {
            self.attach_related(&mut conn, &mut posts_page)?;
        }

        if query.with_comment_count {
            self.attach_comment_counts(&mut conn, &mut posts_page)?;
        }

        Ok((total, posts_page))
    }

    fn get_post_by_id(&self, id: PostId) -> RepositoryResult<Option<Post>> {
        use crate::schema::{categories, posts};

        let mut conn = self.conn()?;

        let row: Option<(DbPost, Option<DbCategory>)> = posts::table
            .left_join(categories::table)
            .filter(posts::id.eq(id.get()))
            .select((DbPost::as_select(), Option::<DbCategory>::as_select()))
            .first(&mut conn)
            .optional()?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut posts = vec![Post::try_from(row)?];
        self.attach_related(&mut conn, &mut posts)?;
        Ok(posts.pop())
    }
}

impl PostWriter for DieselRepository {
    fn create_post(&self, post: &NewPost) -> RepositoryResult<Post> {
        use crate::schema::{categories, posts};

        let mut conn = self.conn()?;

        let record = DbNewPost::from(post.clone());

        conn.transaction(|conn| {
            let inserted: DbPost = diesel::insert_into(posts::table)
                .values(&record)
                .get_result(conn)?;

            let category: Option<DbCategory> = match inserted.category_id {
                Some(category_id) => categories::table
                    .filter(categories::id.eq(category_id))
                    .first(conn)
                    .optional()?,
                None => None,
            };

            Ok(Post::try_from((inserted, category))?)
        })
    }

    fn update_post(&self, id: PostId, update: &UpdatePost) -> RepositoryResult<usize> {
        use crate::schema::posts;

        let mut conn = self.conn()?;

        let record = DbUpdatePost::from(update.clone());
        Ok(diesel::update(posts::table.filter(posts::id.eq(id.get())))
            .set(&record)
            .execute(&mut conn)?)
    }

    fn delete_post(&self, id: PostId) -> RepositoryResult<usize> {
        use crate::schema::posts;

        let mut conn = self.conn()?;

        Ok(diesel::delete(posts::table.filter(posts::id.eq(id.get()))).execute(&mut conn)?)
    }
}
