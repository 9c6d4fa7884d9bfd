//! Data-access traits and their backend implementation.
//!
//! Reads and writes are split per entity, mirroring the screens that use
//! them. [`BackendRepository`] implements every trait over the hosted
//! backend; `memory::InMemoryRepository` is its test double.
#![allow(async_fn_in_trait)]

use crate::backend::{BackendClient, TableQuery};
use crate::domain::{
    admin::{Admin, NewAdmin},
    inspection::{Inspection, NewInspection, UpdateInspection},
    tree::{NewTree, Tree, TreeSummary, TreeType, UpdateTreeMetrics},
    types::{
        EmailAddress, InspectionId, SpeciesName, TreeName, TreeTypeCode, TypeConstraintError,
        VolunteerId,
    },
    volunteer::{NewVolunteer, UpdateVolunteer, Volunteer},
};
use crate::models::tree::TREES_TABLE;
use crate::models::volunteer::VOLUNTEERS_TABLE;
use crate::repository::errors::RepositoryResult;

pub mod admin;
pub mod errors;
pub mod inspection;
#[cfg(any(test, feature = "test-mocks"))]
pub mod memory;
pub mod tree;
pub mod volunteer;

/// Converts listed rows into domain values.
///
/// Rows the backend accepted but that fail conversion are logged and left
/// out, so one malformed record does not hide the rest of the table.
pub(crate) fn convert_rows<R, T>(table: &str, rows: Vec<R>) -> Vec<T>
where
    T: TryFrom<R, Error = TypeConstraintError>,
{
    rows.into_iter()
        .filter_map(|row| match T::try_from(row) {
            Ok(value) => Some(value),
            Err(err) => {
                log::warn!("Skipping unreadable row of {table}: {err}");
                None
            }
        })
        .collect()
}

#[derive(Debug, Clone, Default)]
/// Filters for reading individual tree rows.
pub struct TreeListQuery {
    pub search: Option<String>,
}

impl TreeListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search = (!term.trim().is_empty()).then_some(term);
        self
    }
}

#[derive(Debug, Clone)]
/// Arguments of the server-side summary aggregation.
pub struct TreeSummaryQuery {
    pub search: Option<String>,
    pub limit: usize,
    pub offset: usize,
}

impl TreeSummaryQuery {
    pub fn new(limit: usize) -> Self {
        Self {
            search: None,
            limit,
            offset: 0,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search = (!term.trim().is_empty()).then_some(term);
        self
    }

    /// Offsets the window to the given one-based page.
    pub fn page(mut self, page: usize) -> Self {
        self.offset = page.saturating_sub(1) * self.limit;
        self
    }
}

pub trait TreeReader {
    /// Tree rows, newest first.
    async fn list_trees(&self, query: &TreeListQuery) -> RepositoryResult<Vec<Tree>>;
    async fn get_tree_summary(&self, query: &TreeSummaryQuery)
    -> RepositoryResult<Vec<TreeSummary>>;
    async fn list_tree_types(&self) -> RepositoryResult<Vec<TreeType>>;
    async fn resolve_tree_type_id(
        &self,
        tree_name: &TreeName,
        species: &SpeciesName,
    ) -> RepositoryResult<Option<TreeTypeCode>>;
    async fn count_trees(&self) -> RepositoryResult<usize>;
    /// `(tree_name, species)` of every row, ordered by name.
    async fn list_tree_pairs(&self) -> RepositoryResult<Vec<(String, String)>>;
    async fn count_trees_of_type(
        &self,
        tree_name: &TreeName,
        species: &SpeciesName,
    ) -> RepositoryResult<usize>;
}

pub trait TreeWriter {
    async fn create_trees(&self, new_trees: &[NewTree]) -> RepositoryResult<usize>;
    async fn update_tree_metrics(
        &self,
        tree_name: &TreeName,
        species: &SpeciesName,
        metrics: &UpdateTreeMetrics,
    ) -> RepositoryResult<usize>;
    async fn delete_trees_of_type(
        &self,
        tree_name: &TreeName,
        species: &SpeciesName,
    ) -> RepositoryResult<()>;
    /// Removes the registry row of a type from `tree_types`.
    async fn delete_tree_type(
        &self,
        tree_name: &TreeName,
        species: &SpeciesName,
    ) -> RepositoryResult<()>;
}

pub trait VolunteerReader {
    /// Volunteers, newest first.
    async fn list_volunteers(&self) -> RepositoryResult<Vec<Volunteer>>;
    async fn get_volunteer(&self, id: VolunteerId) -> RepositoryResult<Option<Volunteer>>;
}

pub trait VolunteerWriter {
    async fn create_volunteer(&self, new_volunteer: &NewVolunteer) -> RepositoryResult<Volunteer>;
    async fn update_volunteer(
        &self,
        id: VolunteerId,
        updates: &UpdateVolunteer,
    ) -> RepositoryResult<Volunteer>;
    async fn delete_volunteer(&self, id: VolunteerId) -> RepositoryResult<()>;
}

pub trait InspectionReader {
    /// Inspections joined with their volunteer, newest first.
    async fn list_inspections(&self) -> RepositoryResult<Vec<Inspection>>;
    async fn get_inspection(&self, id: InspectionId) -> RepositoryResult<Option<Inspection>>;
}

pub trait InspectionWriter {
    async fn create_inspection(
        &self,
        new_inspection: &NewInspection,
    ) -> RepositoryResult<Inspection>;
    async fn update_inspection(
        &self,
        id: InspectionId,
        updates: &UpdateInspection,
    ) -> RepositoryResult<Inspection>;
    async fn delete_inspection(&self, id: InspectionId) -> RepositoryResult<()>;
}

pub trait AdminReader {
    async fn get_admin_by_email(&self, email: &EmailAddress) -> RepositoryResult<Option<Admin>>;
}

pub trait AdminWriter {
    async fn create_admin(&self, new_admin: &NewAdmin) -> RepositoryResult<Admin>;
}

/// Repository backed by the hosted REST interface.
#[derive(Clone, Debug)]
pub struct BackendRepository {
    client: BackendClient,
}

impl BackendRepository {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// Counts trees and volunteers to prove the backend is reachable.
    pub async fn check_connection(&self) -> RepositoryResult<(usize, usize)> {
        let trees = self.client.count(TREES_TABLE, &TableQuery::new()).await?;
        let volunteers = self
            .client
            .count(VOLUNTEERS_TABLE, &TableQuery::new())
            .await?;
        Ok((trees, volunteers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::volunteer::Volunteer as DbVolunteer;
    use serde_json::json;

    fn volunteer_row(name: &str, email: &str, phone: &str) -> DbVolunteer {
        serde_json::from_value(json!({
            "id": uuid::Uuid::new_v4(),
            "volunteer_id": null,
            "salutation": null,
            "name": name,
            "type": "individual",
            "email": email,
            "gender": null,
            "phone": phone,
            "organization_name": null,
            "no_of_volunteers": null,
            "aadhaar_number": null,
            "address": null,
            "document_url": null,
            "last_activity": null,
            "verification_status": null,
            "created_at": null,
            "updated_at": null
        }))
        .unwrap()
    }

    #[test]
    fn listing_skips_unreadable_rows_and_keeps_the_rest() {
        let rows = vec![
            volunteer_row("Asha", "asha@example.com", "12345"),
            volunteer_row("Ravi", "not-an-email", "9876543210"),
            volunteer_row("Meena", "meena@example.com", "044 2345"),
        ];

        let volunteers: Vec<Volunteer> = convert_rows(VOLUNTEERS_TABLE, rows);

        let names: Vec<&str> = volunteers.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Asha", "Meena"]);
        assert_eq!(volunteers[0].phone.as_str(), "12345");
    }

    #[test]
    fn summary_query_offsets_by_page() {
        let query = TreeSummaryQuery::new(10).page(3).search("  ");
        assert_eq!(query.offset, 20);
        assert_eq!(query.limit, 10);
        assert!(query.search.is_none());

        assert_eq!(TreeSummaryQuery::new(10).page(0).offset, 0);
    }

    #[test]
    fn tree_query_ignores_blank_search() {
        assert!(TreeListQuery::new().search(" ").search.is_none());
        assert_eq!(
            TreeListQuery::new().search("neem").search.as_deref(),
            Some("neem")
        );
    }
}
