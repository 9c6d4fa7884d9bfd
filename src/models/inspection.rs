//! Backend row shapes for the `inspections` table.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::inspection::{
    Inspection as DomainInspection, InspectionCycle, InspectionStatus,
    NewInspection as DomainNewInspection, UpdateInspection as DomainUpdateInspection,
};
use crate::domain::types::{AreaName, InspectionId, TypeConstraintError, VolunteerId};
use crate::domain::volunteer::Volunteer as DomainVolunteer;
use crate::models::parse_date;
use crate::models::volunteer::Volunteer;

pub const INSPECTIONS_TABLE: &str = "inspections";

/// Select clause embedding the owning volunteer.
pub const INSPECTION_WITH_VOLUNTEER: &str = "*,volunteer:volunteers(*)";

#[derive(Debug, Clone, Deserialize)]
/// Row of the `inspections` table, optionally joined with its volunteer.
pub struct Inspection {
    pub id: Uuid,
    pub inspection_id: Option<String>,
    pub volunteer_id: Uuid,
    pub area: String,
    pub trees_count: Option<u32>,
    pub due_date: String,
    pub status: String,
    pub trees_inspected: Option<u32>,
    pub completed_date: Option<String>,
    pub tree_condition: Option<String>,
    pub inspector_notes: Option<String>,
    pub inspection_images: Option<Vec<String>>,
    pub assigned_by: Option<String>,
    pub scheme_name: Option<String>,
    pub tree_species: Option<String>,
    pub inspection_cycle: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub volunteer: Option<Volunteer>,
}

#[derive(Debug, Serialize)]
/// Insert payload for the `inspections` table.
pub struct NewInspection<'a> {
    pub volunteer_id: Uuid,
    pub area: &'a str,
    pub trees_count: u32,
    pub due_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_by: Option<&'a str>,
    pub status: InspectionStatus,
    pub scheme_name: &'a str,
    pub tree_species: String,
    pub inspection_cycle: InspectionCycle,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
}

#[derive(Debug, Serialize)]
/// Partial patch for the `inspections` table; unset fields are not sent.
pub struct InspectionPatch<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<InspectionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trees_inspected: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree_condition: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inspector_notes: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

fn optional_date(value: Option<String>) -> Result<Option<NaiveDate>, TypeConstraintError> {
    value
        .filter(|s| !s.trim().is_empty())
        .map(|s| parse_date(&s))
        .transpose()
}

impl TryFrom<Inspection> for DomainInspection {
    type Error = TypeConstraintError;

    fn try_from(row: Inspection) -> Result<Self, Self::Error> {
        let status = InspectionStatus::try_from(row.status.as_str())
            .map_err(TypeConstraintError::InvalidValue)?;
        // An unreadable embedded volunteer is dropped; `volunteer_id` still links it.
        let volunteer = row
            .volunteer
            .and_then(|volunteer| DomainVolunteer::try_from(volunteer).ok());

        Ok(Self {
            id: InspectionId::new(row.id),
            inspection_id: row.inspection_id.unwrap_or_default(),
            volunteer_id: VolunteerId::new(row.volunteer_id),
            area: AreaName::new(row.area)?,
            trees_count: row.trees_count.unwrap_or_default(),
            due_date: parse_date(&row.due_date)?,
            status,
            trees_inspected: row.trees_inspected.unwrap_or_default(),
            completed_date: optional_date(row.completed_date)?,
            tree_condition: row.tree_condition,
            inspector_notes: row.inspector_notes,
            inspection_images: row.inspection_images.unwrap_or_default(),
            assigned_by: row.assigned_by,
            scheme_name: row.scheme_name,
            tree_species: row.tree_species,
            inspection_cycle: row.inspection_cycle.as_deref().map(InspectionCycle::from),
            start_date: optional_date(row.start_date)?,
            end_date: optional_date(row.end_date)?,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
            volunteer,
        })
    }
}

impl<'a> From<&'a DomainNewInspection> for NewInspection<'a> {
    fn from(inspection: &'a DomainNewInspection) -> Self {
        Self {
            volunteer_id: inspection.volunteer_id.get(),
            area: inspection.area.as_str(),
            trees_count: inspection.trees_count,
            due_date: inspection.due_date,
            assigned_by: inspection.assigned_by.as_deref(),
            status: inspection.status,
            scheme_name: inspection.scheme_name.as_str(),
            tree_species: inspection.tree_species.join(", "),
            inspection_cycle: inspection.inspection_cycle,
            start_date: inspection.start_date,
            end_date: inspection.end_date,
            description: inspection.description.as_ref().map(|d| d.as_str()),
        }
    }
}

impl<'a> From<&'a DomainUpdateInspection> for InspectionPatch<'a> {
    fn from(updates: &'a DomainUpdateInspection) -> Self {
        Self {
            status: updates.status,
            trees_inspected: updates.trees_inspected,
            completed_date: updates.completed_date,
            tree_condition: updates.tree_condition.as_deref(),
            inspector_notes: updates.inspector_notes.as_ref().map(|n| n.as_str()),
            updated_at: Utc::now(),
        }
    }
}
