use chrono::Utc;
use diesel::prelude::*;

use crate::domain::comment::{Comment, NewComment};
use crate::domain::types::{CommentId, PostId};
use crate::domain::user::{AuthorRef, User};
use crate::models::comment::{Comment as DbComment, NewComment as DbNewComment};
use crate::models::user::User as DbUser;
use crate::repository::errors::RepositoryResult;
use crate::repository::{CommentReader, CommentWriter, DieselRepository};

impl CommentReader for DieselRepository {
    fn list_comments(&self, post_id: PostId) -> RepositoryResult<Vec<Comment>> {
        use crate::schema::{comments, users};

        let mut conn = self.conn()?;

        let rows: Vec<(DbComment, DbUser)> = comments::table
            .inner_join(users::table)
            .filter(comments::post_id.eq(post_id.get()))
            .order((comments::created_at.asc(), comments::id.asc()))
            .select((DbComment::as_select(), DbUser::as_select()))
            .load(&mut conn)?;

        rows.into_iter()
            .map(|(comment, author)| {
                let author = User::try_from(author)?;
                let mut comment = Comment::try_from(comment)?;
                comment.author = Some(AuthorRef::from(&author));
                Ok(comment)
            })
            .collect()
    }

    fn get_comment_by_id(&self, id: CommentId) -> RepositoryResult<Option<Comment>> {
        use crate::schema::comments;

        let mut conn = self.conn()?;

        let row: Option<DbComment> = comments::table
            .filter(comments::id.eq(id.get()))
            .first(&mut conn)
            .optional()?;

        row.map(|c| Ok(Comment::try_from(c)?)).transpose()
    }
}

impl CommentWriter for DieselRepository {
    fn create_comment(&self, comment: &NewComment) -> RepositoryResult<Comment> {
        use crate::schema::comments;

        let mut conn = self.conn()?;

        let record = DbNewComment::from_domain(comment.clone(), Utc::now().naive_utc());
        let inserted: DbComment = diesel::insert_into(comments::table)
            .values(&record)
            .get_result(&mut conn)?;

        Ok(Comment::try_from(inserted)?)
    }

    fn update_comment(&self, id: CommentId, text: &str) -> RepositoryResult<usize> {
        use crate::schema::comments;

        let mut conn = self.conn()?;

        Ok(
            diesel::update(comments::table.filter(comments::id.eq(id.get())))
                .set(comments::text.eq(text))
                .execute(&mut conn)?,
        )
    }

    fn delete_comment(&self, id: CommentId) -> RepositoryResult<usize> {
        use crate::schema::comments;

        let mut conn = self.conn()?;

        Ok(diesel::delete(comments::table.filter(comments::id.eq(id.get()))).execute(&mut conn)?)
    }
}
