use crate::backend::TableQuery;
use crate::domain::inspection::{Inspection, NewInspection, UpdateInspection};
use crate::domain::types::InspectionId;
use crate::models::inspection::{
    INSPECTION_WITH_VOLUNTEER, INSPECTIONS_TABLE, Inspection as DbInspection, InspectionPatch,
    NewInspection as DbNewInspection,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{BackendRepository, InspectionReader, InspectionWriter, convert_rows};

fn by_id(id: InspectionId) -> TableQuery {
    TableQuery::new().eq("id", id)
}

fn first_row(rows: Vec<DbInspection>) -> RepositoryResult<Inspection> {
    let row = rows.into_iter().next().ok_or(RepositoryError::NotFound)?;
    Ok(Inspection::try_from(row)?)
}

impl InspectionReader for BackendRepository {
    async fn list_inspections(&self) -> RepositoryResult<Vec<Inspection>> {
        let query = TableQuery::new()
            .select(INSPECTION_WITH_VOLUNTEER)
            .order_desc("created_at");
        let rows: Vec<DbInspection> = self.client.select(INSPECTIONS_TABLE, &query).await?;
        Ok(convert_rows(INSPECTIONS_TABLE, rows))
    }

    async fn get_inspection(&self, id: InspectionId) -> RepositoryResult<Option<Inspection>> {
        let query = by_id(id).select(INSPECTION_WITH_VOLUNTEER);
        let row: Option<DbInspection> =
            self.client.select_one(INSPECTIONS_TABLE, &query).await?;
        row.map(|row| Inspection::try_from(row).map_err(RepositoryError::from))
            .transpose()
    }
}

impl InspectionWriter for BackendRepository {
    async fn create_inspection(
        &self,
        new_inspection: &NewInspection,
    ) -> RepositoryResult<Inspection> {
        let payload = [DbNewInspection::from(new_inspection)];
        let rows = self
            .client
            .insert(INSPECTIONS_TABLE, &payload, INSPECTION_WITH_VOLUNTEER)
            .await?;
        first_row(rows)
    }

    async fn update_inspection(
        &self,
        id: InspectionId,
        updates: &UpdateInspection,
    ) -> RepositoryResult<Inspection> {
        let patch = InspectionPatch::from(updates);
        let query = by_id(id).select(INSPECTION_WITH_VOLUNTEER);
        let rows = self.client.update(INSPECTIONS_TABLE, &query, &patch).await?;
        first_row(rows)
    }

    async fn delete_inspection(&self, id: InspectionId) -> RepositoryResult<()> {
        self.client.delete(INSPECTIONS_TABLE, &by_id(id)).await
    }
}
