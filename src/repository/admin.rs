use crate::backend::TableQuery;
use crate::domain::admin::{Admin, NewAdmin};
use crate::domain::types::EmailAddress;
use crate::models::admin::{ADMIN_TABLE, Admin as DbAdmin, NewAdmin as DbNewAdmin};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{AdminReader, AdminWriter, BackendRepository};

impl AdminReader for BackendRepository {
    async fn get_admin_by_email(&self, email: &EmailAddress) -> RepositoryResult<Option<Admin>> {
        let query = TableQuery::new().select("*").eq("email", email.as_str());
        let row: Option<DbAdmin> = self.client.select_one(ADMIN_TABLE, &query).await?;
        row.map(|row| Admin::try_from(row).map_err(RepositoryError::from))
            .transpose()
    }
}

impl AdminWriter for BackendRepository {
    async fn create_admin(&self, new_admin: &NewAdmin) -> RepositoryResult<Admin> {
        let payload = [DbNewAdmin::from(new_admin)];
        let rows: Vec<DbAdmin> = self.client.insert(ADMIN_TABLE, &payload, "*").await?;
        let row = rows.into_iter().next().ok_or(RepositoryError::NotFound)?;
        Ok(Admin::try_from(row)?)
    }
}
