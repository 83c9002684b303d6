use diesel::prelude::*;

use crate::domain::category::{Category, NewCategory};
use crate::domain::types::{CategoryId, CategorySlug};
use crate::models::category::{Category as DbCategory, NewCategory as DbNewCategory};
use crate::repository::errors::RepositoryResult;
use crate::repository::{CategoryReader, CategoryWriter, DieselRepository};

impl CategoryReader for DieselRepository {
    fn get_category_by_slug(&self, slug: &CategorySlug) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let row: Option<DbCategory> = categories::table
            .filter(categories::slug.eq(slug.as_str()))
            .first(&mut conn)
            .optional()?;

        row.map(|c| Ok(Category::try_from(c)?)).transpose()
    }

    fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let rows: Vec<DbCategory> = categories::table
            .filter(categories::is_published.eq(true))
            .order(categories::title.asc())
            .load(&mut conn)?;

        rows.into_iter()
            .map(|c| Ok(Category::try_from(c)?))
            .collect()
    }
}

impl CategoryWriter for DieselRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let record = DbNewCategory::from(category.clone());
        let inserted: DbCategory = diesel::insert_into(categories::table)
            .values(&record)
            .get_result(&mut conn)?;

        Ok(Category::try_from(inserted)?)
    }

    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        Ok(
            diesel::delete(categories::table.filter(categories::id.eq(id.get())))
                .execute(&mut conn)?,
        )
    }
}
