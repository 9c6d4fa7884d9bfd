use crate::backend::TableQuery;
use crate::domain::types::VolunteerId;
use crate::domain::volunteer::{NewVolunteer, UpdateVolunteer, Volunteer};
use crate::models::volunteer::{
    NewVolunteer as DbNewVolunteer, VOLUNTEERS_TABLE, Volunteer as DbVolunteer, VolunteerPatch,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{BackendRepository, VolunteerReader, VolunteerWriter, convert_rows};

fn by_id(id: VolunteerId) -> TableQuery {
    TableQuery::new().eq("id", id)
}

fn first_row(rows: Vec<DbVolunteer>) -> RepositoryResult<Volunteer> {
    let row = rows.into_iter().next().ok_or(RepositoryError::NotFound)?;
    Ok(Volunteer::try_from(row)?)
}

impl VolunteerReader for BackendRepository {
    async fn list_volunteers(&self) -> RepositoryResult<Vec<Volunteer>> {
        let query = TableQuery::new().select("*").order_desc("created_at");
        let rows: Vec<DbVolunteer> = self.client.select(VOLUNTEERS_TABLE, &query).await?;
        Ok(convert_rows(VOLUNTEERS_TABLE, rows))
    }

    async fn get_volunteer(&self, id: VolunteerId) -> RepositoryResult<Option<Volunteer>> {
        let query = by_id(id).select("*");
        let row: Option<DbVolunteer> = self.client.select_one(VOLUNTEERS_TABLE, &query).await?;
        row.map(|row| Volunteer::try_from(row).map_err(RepositoryError::from))
            .transpose()
    }
}

impl VolunteerWriter for BackendRepository {
    async fn create_volunteer(&self, new_volunteer: &NewVolunteer) -> RepositoryResult<Volunteer> {
        let payload = [DbNewVolunteer::from(new_volunteer)];
        let rows = self.client.insert(VOLUNTEERS_TABLE, &payload, "*").await?;
        first_row(rows)
    }

    async fn update_volunteer(
        &self,
        id: VolunteerId,
        updates: &UpdateVolunteer,
    ) -> RepositoryResult<Volunteer> {
        let patch = VolunteerPatch::from(updates);
        let rows = self
            .client
            .update(VOLUNTEERS_TABLE, &by_id(id).select("*"), &patch)
            .await?;
        first_row(rows)
    }

    async fn delete_volunteer(&self, id: VolunteerId) -> RepositoryResult<()> {
        self.client.delete(VOLUNTEERS_TABLE, &by_id(id)).await
    }
}
