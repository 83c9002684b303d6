use diesel::prelude::*;

use crate::domain::location::{Location, NewLocation};
use crate::models::location::{Location as DbLocation, NewLocation as DbNewLocation};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, LocationReader, LocationWriter};

impl LocationReader for DieselRepository {
    fn list_locations(&self) -> RepositoryResult<Vec<Location>> {
        use crate::schema::locations;

        let mut conn = self.conn()?;

        let rows: Vec<DbLocation> = locations::table
            .filter(locations::is_published.eq(true))
            .order(locations::name.asc())
            .load(&mut conn)?;

        rows.into_iter()
            .map(|l| Ok(Location::try_from(l)?))
            .collect()
    }
}

impl LocationWriter for DieselRepository {
    fn create_location(&self, location: &NewLocation) -> RepositoryResult<Location> {
        use crate::schema::locations;

        let mut conn = self.conn()?;

        let record = DbNewLocation::from(location.clone());
        let inserted: DbLocation = diesel::insert_into(locations::table)
            .values(&record)
            .get_result(&mut conn)?;

        Ok(Location::try_from(inserted)?)
    }
}
