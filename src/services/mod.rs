//! Services orchestrating repositories on behalf of the routes.
//!
//! Services never touch HTTP types. They receive parsed forms and queries,
//! talk to repositories through their traits and return [`ServiceResult`].

use thiserror::Error;

use crate::domain::types::TypeConstraintError;
use crate::forms::FormError;
use crate::repository::errors::RepositoryError;

pub mod api;
pub mod auth;
pub mod dashboard;
pub mod inspections;
pub mod master;
pub mod trees;
pub mod volunteers;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    /// Message meant to be shown to staff as is.
    #[error("{0}")]
    Form(String),

    #[error("type constraint violation: {0}")]
    TypeConstraint(String),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::Form(err.to_string())
    }
}

impl From<TypeConstraintError> for ServiceError {
    fn from(err: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(err.to_string())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Sample rows shared by service tests.

    use chrono::NaiveDate;
    use uuid::Uuid;

    use crate::domain::inspection::{Inspection, InspectionStatus};
    use crate::domain::tree::{Tree, TreeStatus};
    use crate::domain::types::{
        AreaName, EmailAddress, InspectionId, PersonName, PhoneNumber, SpeciesName, TreeId,
        TreeName, TreeTypeCode, VolunteerId,
    };
    use crate::domain::volunteer::{VerificationStatus, Volunteer, VolunteerType};

    pub fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    pub fn tree(name: &str, species: &str, code: u32, status: TreeStatus) -> Tree {
        Tree {
            id: TreeId::new(Uuid::new_v4()),
            custom_id: Some(TreeTypeCode::from_number(code)),
            tree_name: TreeName::new(name).unwrap(),
            species: SpeciesName::new(species).unwrap(),
            o2_released: "10 kg".to_string(),
            co2_released: "4 kg".to_string(),
            status,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn volunteer(code: &str, name: &str, email: &str, address: &str) -> Volunteer {
        Volunteer {
            id: VolunteerId::new(Uuid::new_v4()),
            volunteer_id: code.to_string(),
            salutation: None,
            name: PersonName::new(name).unwrap(),
            kind: VolunteerType::Individual,
            email: EmailAddress::new(email).unwrap(),
            gender: None,
            phone: PhoneNumber::new("+91 98765 43210").unwrap(),
            organization_name: None,
            no_of_volunteers: None,
            aadhaar_number: None,
            address: Some(address.to_string()),
            document_url: None,
            trees_planted: 0,
            last_activity: None,
            verification_status: VerificationStatus::Pending,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn inspection(
        code: &str,
        volunteer: &Volunteer,
        area: &str,
        due: &str,
        status: InspectionStatus,
    ) -> Inspection {
        Inspection {
            id: InspectionId::new(Uuid::new_v4()),
            inspection_id: code.to_string(),
            volunteer_id: volunteer.id,
            area: AreaName::new(area).unwrap(),
            trees_count: 10,
            due_date: date(due),
            status,
            trees_inspected: 0,
            completed_date: None,
            tree_condition: None,
            inspector_notes: None,
            inspection_images: vec![],
            assigned_by: None,
            scheme_name: None,
            tree_species: None,
            inspection_cycle: None,
            start_date: None,
            end_date: None,
            description: None,
            created_at: None,
            updated_at: None,
            volunteer: Some(volunteer.clone()),
        }
    }
}
