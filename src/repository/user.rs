use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::domain::types::UserId;
use crate::domain::user::{NewUser, User};
use crate::models::user::{NewUser as DbNewUser, UpdateUser as DbUpdateUser, User as DbUser};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, UserReader, UserWriter};

fn map_unique_violation(err: DieselError, message: &str) -> RepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            RepositoryError::Validation(message.to_string())
        }
        other => RepositoryError::Database(other),
    }
}

impl UserReader for DieselRepository {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let row: Option<DbUser> = users::table
            .filter(users::id.eq(id.get()))
            .first(&mut conn)
            .optional()?;

        row.map(|u| Ok(User::try_from(u)?)).transpose()
    }

    fn get_user_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let row: Option<DbUser> = users::table
            .filter(users::username.eq(username))
            .first(&mut conn)
            .optional()?;

        row.map(|u| Ok(User::try_from(u)?)).transpose()
    }
}

impl UserWriter for DieselRepository {
    fn create_user(&self, user: &NewUser) -> RepositoryResult<User> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let record = DbNewUser::from(user.clone());
        let inserted: DbUser = diesel::insert_into(users::table)
            .values(&record)
            .get_result(&mut conn)
            .map_err(|e| map_unique_violation(e, "username is already taken"))?;

        Ok(User::try_from(inserted)?)
    }

    fn update_user(
        &self,
        id: UserId,
        username: &str,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> RepositoryResult<usize> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let record = DbUpdateUser {
            username: username.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
        };

        diesel::update(users::table.filter(users::id.eq(id.get())))
            .set(&record)
            .execute(&mut conn)
            .map_err(|e| map_unique_violation(e, "username is already taken"))
    }
}
