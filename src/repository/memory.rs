//! In-memory repository used to exercise services without a backend.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use uuid::Uuid;

use crate::domain::admin::{Admin, NewAdmin};
use crate::domain::inspection::{Inspection, NewInspection, UpdateInspection};
use crate::domain::tree::{
    NewTree, Tree, TreeStatus, TreeSummary, TreeType, UpdateTreeMetrics, summarize_trees,
};
use crate::domain::types::{
    AdminId, EmailAddress, InspectionId, SpeciesName, TreeId, TreeName, TreeTypeCode, VolunteerId,
};
use crate::domain::volunteer::{NewVolunteer, UpdateVolunteer, Volunteer};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    AdminReader, AdminWriter, InspectionReader, InspectionWriter, TreeListQuery, TreeReader,
    TreeSummaryQuery, TreeWriter, VolunteerReader, VolunteerWriter,
};

#[derive(Default)]
struct State {
    trees: Vec<Tree>,
    tree_types: Vec<(String, String)>,
    volunteers: Vec<Volunteer>,
    inspections: Vec<Inspection>,
    admins: Vec<Admin>,
    writes: usize,
}

/// Repository holding every collection in memory.
///
/// Collections are stored newest first, like the backend returns them.
/// Failure switches let tests take the error paths of services.
#[derive(Default)]
pub struct InMemoryRepository {
    state: Mutex<State>,
    summary_missing: bool,
    fail_reads: bool,
    fail_writes: bool,
    fail_tree_type_delete: bool,
}

fn failure() -> RepositoryError {
    RepositoryError::ConnectionError("backend unavailable".to_string())
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trees(self, trees: Vec<Tree>) -> Self {
        {
            let mut state = self.state();
            for tree in &trees {
                let pair = (tree.tree_name.to_string(), tree.species.to_string());
                if !state.tree_types.contains(&pair) {
                    state.tree_types.push(pair);
                }
            }
            state.trees = trees;
        }
        self
    }

    pub fn with_volunteers(self, volunteers: Vec<Volunteer>) -> Self {
        self.state().volunteers = volunteers;
        self
    }

    pub fn with_inspections(self, inspections: Vec<Inspection>) -> Self {
        self.state().inspections = inspections;
        self
    }

    pub fn with_admins(self, admins: Vec<Admin>) -> Self {
        self.state().admins = admins;
        self
    }

    /// Makes the summary procedure fail as if it was not installed.
    pub fn without_summary_procedure(mut self) -> Self {
        self.summary_missing = true;
        self
    }

    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn failing_tree_type_delete(mut self) -> Self {
        self.fail_tree_type_delete = true;
        self
    }

    /// Number of successful write calls so far.
    pub fn writes(&self) -> usize {
        self.state().writes
    }

    pub fn trees(&self) -> Vec<Tree> {
        self.state().trees.clone()
    }

    pub fn tree_types(&self) -> Vec<(String, String)> {
        self.state().tree_types.clone()
    }

    pub fn volunteers(&self) -> Vec<Volunteer> {
        self.state().volunteers.clone()
    }

    pub fn inspections(&self) -> Vec<Inspection> {
        self.state().inspections.clone()
    }

    pub fn admins(&self) -> Vec<Admin> {
        self.state().admins.clone()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read(&self) -> RepositoryResult<MutexGuard<'_, State>> {
        if self.fail_reads {
            return Err(failure());
        }
        Ok(self.state())
    }

    fn write(&self) -> RepositoryResult<MutexGuard<'_, State>> {
        if self.fail_writes {
            return Err(failure());
        }
        let mut state = self.state();
        state.writes += 1;
        Ok(state)
    }
}

fn is_type(tree: &Tree, tree_name: &TreeName, species: &SpeciesName) -> bool {
    &tree.tree_name == tree_name && &tree.species == species
}

impl TreeReader for InMemoryRepository {
    async fn list_trees(&self, query: &TreeListQuery) -> RepositoryResult<Vec<Tree>> {
        let state = self.read()?;
        Ok(state
            .trees
            .iter()
            .filter(|tree| match &query.search {
                Some(term) => {
                    contains_ci(tree.tree_name.as_str(), term)
                        || contains_ci(tree.species.as_str(), term)
                        || tree
                            .custom_id
                            .as_ref()
                            .is_some_and(|code| contains_ci(code.as_str(), term))
                }
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn get_tree_summary(
        &self,
        query: &TreeSummaryQuery,
    ) -> RepositoryResult<Vec<TreeSummary>> {
        if self.summary_missing {
            return Err(RepositoryError::BackendError(
                "Could not find the function get_tree_summary".to_string(),
            ));
        }
        let trees = self
            .list_trees(&TreeListQuery {
                search: query.search.clone(),
            })
            .await?;
        Ok(summarize_trees(&trees)
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .collect())
    }

    async fn list_tree_types(&self) -> RepositoryResult<Vec<TreeType>> {
        let state = self.read()?;
        Ok(summarize_trees(&state.trees)
            .into_iter()
            .map(|summary| TreeType {
                custom_id: summary.custom_id,
                tree_name: summary.tree_name,
                species: summary.species,
                tree_count: summary.total_trees,
            })
            .collect())
    }

    async fn resolve_tree_type_id(
        &self,
        tree_name: &TreeName,
        species: &SpeciesName,
    ) -> RepositoryResult<Option<TreeTypeCode>> {
        let state = self.read()?;
        Ok(state
            .trees
            .iter()
            .find(|tree| is_type(tree, tree_name, species))
            .and_then(|tree| tree.custom_id.clone()))
    }

    async fn count_trees(&self) -> RepositoryResult<usize> {
        Ok(self.read()?.trees.len())
    }

    async fn list_tree_pairs(&self) -> RepositoryResult<Vec<(String, String)>> {
        let state = self.read()?;
        let mut pairs: Vec<(String, String)> = state
            .trees
            .iter()
            .map(|tree| (tree.tree_name.to_string(), tree.species.to_string()))
            .collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(pairs)
    }

    async fn count_trees_of_type(
        &self,
        tree_name: &TreeName,
        species: &SpeciesName,
    ) -> RepositoryResult<usize> {
        let state = self.read()?;
        Ok(state
            .trees
            .iter()
            .filter(|tree| is_type(tree, tree_name, species))
            .count())
    }
}

impl TreeWriter for InMemoryRepository {
    async fn create_trees(&self, new_trees: &[NewTree]) -> RepositoryResult<usize> {
        let mut state = self.write()?;
        for new_tree in new_trees {
            let existing = state
                .trees
                .iter()
                .find(|tree| is_type(tree, &new_tree.tree_name, &new_tree.species))
                .and_then(|tree| tree.custom_id.clone());
            let custom_id = existing.unwrap_or_else(|| {
                TreeTypeCode::from_number(100 + state.tree_types.len() as u32)
            });
            let pair = (new_tree.tree_name.to_string(), new_tree.species.to_string());
            if !state.tree_types.contains(&pair) {
                state.tree_types.push(pair);
            }
            state.trees.insert(
                0,
                Tree {
                    id: TreeId::new(Uuid::new_v4()),
                    custom_id: Some(custom_id),
                    tree_name: new_tree.tree_name.clone(),
                    species: new_tree.species.clone(),
                    o2_released: new_tree.o2_released.clone(),
                    co2_released: new_tree.co2_released.clone(),
                    status: TreeStatus::Active,
                    created_at: Some(Utc::now()),
                    updated_at: None,
                },
            );
        }
        Ok(new_trees.len())
    }

    async fn update_tree_metrics(
        &self,
        tree_name: &TreeName,
        species: &SpeciesName,
        metrics: &UpdateTreeMetrics,
    ) -> RepositoryResult<usize> {
        let mut state = self.write()?;
        let mut updated = 0;
        for tree in state
            .trees
            .iter_mut()
            .filter(|tree| is_type(tree, tree_name, species))
        {
            tree.o2_released = metrics.o2_released.clone();
            tree.co2_released = metrics.co2_released.clone();
            tree.updated_at = Some(Utc::now());
            updated += 1;
        }
        Ok(updated)
    }

    async fn delete_trees_of_type(
        &self,
        tree_name: &TreeName,
        species: &SpeciesName,
    ) -> RepositoryResult<()> {
        let mut state = self.write()?;
        state
            .trees
            .retain(|tree| !is_type(tree, tree_name, species));
        Ok(())
    }

    async fn delete_tree_type(
        &self,
        tree_name: &TreeName,
        species: &SpeciesName,
    ) -> RepositoryResult<()> {
        if self.fail_tree_type_delete {
            return Err(failure());
        }
        let mut state = self.write()?;
        state
            .tree_types
            .retain(|(name, spec)| name != tree_name.as_str() || spec != species.as_str());
        Ok(())
    }
}

impl VolunteerReader for InMemoryRepository {
    async fn list_volunteers(&self) -> RepositoryResult<Vec<Volunteer>> {
        Ok(self.read()?.volunteers.clone())
    }

    async fn get_volunteer(&self, id: VolunteerId) -> RepositoryResult<Option<Volunteer>> {
        let state = self.read()?;
        Ok(state.volunteers.iter().find(|v| v.id == id).cloned())
    }
}

impl VolunteerWriter for InMemoryRepository {
    async fn create_volunteer(&self, new_volunteer: &NewVolunteer) -> RepositoryResult<Volunteer> {
        let mut state = self.write()?;
        if state
            .volunteers
            .iter()
            .any(|v| v.email == new_volunteer.email)
        {
            return Err(RepositoryError::ConstraintViolation(
                "Unique constraint violation: volunteers_email_key".to_string(),
            ));
        }
        let profile = new_volunteer.profile.clone();
        let volunteer = Volunteer {
            id: VolunteerId::new(Uuid::new_v4()),
            volunteer_id: format!("VT{}", state.volunteers.len() + 1),
            salutation: profile.salutation,
            name: new_volunteer.name.clone(),
            kind: new_volunteer.kind,
            email: new_volunteer.email.clone(),
            gender: profile.gender,
            phone: new_volunteer.phone.clone(),
            organization_name: profile.organization_name,
            no_of_volunteers: profile.no_of_volunteers,
            aadhaar_number: profile.aadhaar_number,
            address: profile.address,
            document_url: new_volunteer.document_url.clone(),
            trees_planted: 0,
            last_activity: None,
            verification_status: profile.verification_status,
            created_at: Some(Utc::now()),
            updated_at: None,
        };
        state.volunteers.insert(0, volunteer.clone());
        Ok(volunteer)
    }

    async fn update_volunteer(
        &self,
        id: VolunteerId,
        updates: &UpdateVolunteer,
    ) -> RepositoryResult<Volunteer> {
        let mut state = self.write()?;
        let volunteer = state
            .volunteers
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or(RepositoryError::NotFound)?;
        let profile = updates.profile.clone();
        volunteer.name = updates.name.clone();
        volunteer.kind = updates.kind;
        volunteer.email = updates.email.clone();
        volunteer.phone = updates.phone.clone();
        volunteer.salutation = profile.salutation;
        volunteer.gender = profile.gender;
        volunteer.organization_name = profile.organization_name;
        volunteer.no_of_volunteers = profile.no_of_volunteers;
        volunteer.aadhaar_number = profile.aadhaar_number;
        volunteer.address = profile.address;
        volunteer.verification_status = profile.verification_status;
        if let Some(document_url) = &updates.document_url {
            volunteer.document_url = Some(document_url.clone());
        }
        volunteer.updated_at = Some(Utc::now());
        Ok(volunteer.clone())
    }

    async fn delete_volunteer(&self, id: VolunteerId) -> RepositoryResult<()> {
        let mut state = self.write()?;
        state.volunteers.retain(|v| v.id != id);
        Ok(())
    }
}

impl InspectionReader for InMemoryRepository {
    async fn list_inspections(&self) -> RepositoryResult<Vec<Inspection>> {
        Ok(self.read()?.inspections.clone())
    }

    async fn get_inspection(&self, id: InspectionId) -> RepositoryResult<Option<Inspection>> {
        let state = self.read()?;
        Ok(state.inspections.iter().find(|i| i.id == id).cloned())
    }
}

impl InspectionWriter for InMemoryRepository {
    async fn create_inspection(
        &self,
        new_inspection: &NewInspection,
    ) -> RepositoryResult<Inspection> {
        let mut state = self.write()?;
        let volunteer = state
            .volunteers
            .iter()
            .find(|v| v.id == new_inspection.volunteer_id)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::ConstraintViolation(
                    "Foreign key constraint violation: inspections_volunteer_id_fkey".to_string(),
                )
            })?;
        let inspection = Inspection {
            id: InspectionId::new(Uuid::new_v4()),
            inspection_id: format!("IN{:03}", state.inspections.len() + 1),
            volunteer_id: new_inspection.volunteer_id,
            area: new_inspection.area.clone(),
            trees_count: new_inspection.trees_count,
            due_date: new_inspection.due_date,
            status: new_inspection.status,
            trees_inspected: 0,
            completed_date: None,
            tree_condition: None,
            inspector_notes: None,
            inspection_images: Vec::new(),
            assigned_by: new_inspection.assigned_by.clone(),
            scheme_name: Some(new_inspection.scheme_name.clone()),
            tree_species: Some(new_inspection.tree_species.join(", ")),
            inspection_cycle: Some(new_inspection.inspection_cycle),
            start_date: Some(new_inspection.start_date),
            end_date: Some(new_inspection.end_date),
            description: new_inspection
                .description
                .as_ref()
                .map(|d| d.as_str().to_string()),
            created_at: Some(Utc::now()),
            updated_at: None,
            volunteer: Some(volunteer),
        };
        state.inspections.insert(0, inspection.clone());
        Ok(inspection)
    }

    async fn update_inspection(
        &self,
        id: InspectionId,
        updates: &UpdateInspection,
    ) -> RepositoryResult<Inspection> {
        let mut state = self.write()?;
        let inspection = state
            .inspections
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(RepositoryError::NotFound)?;
        if let Some(status) = updates.status {
            inspection.status = status;
        }
        if let Some(trees_inspected) = updates.trees_inspected {
            inspection.trees_inspected = trees_inspected;
        }
        if let Some(completed_date) = updates.completed_date {
            inspection.completed_date = Some(completed_date);
        }
        if let Some(condition) = &updates.tree_condition {
            inspection.tree_condition = Some(condition.clone());
        }
        if let Some(notes) = &updates.inspector_notes {
            inspection.inspector_notes = Some(notes.as_str().to_string());
        }
        inspection.updated_at = Some(Utc::now());
        Ok(inspection.clone())
    }

    async fn delete_inspection(&self, id: InspectionId) -> RepositoryResult<()> {
        let mut state = self.write()?;
        state.inspections.retain(|i| i.id != id);
        Ok(())
    }
}

impl AdminReader for InMemoryRepository {
    async fn get_admin_by_email(&self, email: &EmailAddress) -> RepositoryResult<Option<Admin>> {
        let state = self.read()?;
        Ok(state.admins.iter().find(|a| &a.email == email).cloned())
    }
}

impl AdminWriter for InMemoryRepository {
    async fn create_admin(&self, new_admin: &NewAdmin) -> RepositoryResult<Admin> {
        let mut state = self.write()?;
        if state.admins.iter().any(|a| a.email == new_admin.email) {
            return Err(RepositoryError::ConstraintViolation(
                "Unique constraint violation: admin_email_key".to_string(),
            ));
        }
        let admin = Admin {
            id: AdminId::new(Uuid::new_v4()),
            email: new_admin.email.clone(),
            phone: Some(new_admin.phone.as_str().to_string()),
            password_hash: new_admin.password_hash.clone(),
        };
        state.admins.push(admin.clone());
        Ok(admin)
    }
}
