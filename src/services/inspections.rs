//! Inspection assignment, review and listing.

use chrono::NaiveDate;

use crate::domain::inspection::{Inspection, InspectionStats, InspectionStatus, UpdateInspection};
use crate::domain::types::{EmailAddress, InspectionId, PersonName, VolunteerId};
use crate::dto::inspections::{InspectionsPageData, InspectionsQuery};
use crate::forms::inspections::{
    AssignInspectionForm, AssignInspectionPayload, UpdateInspectionForm,
};
use crate::listing::{
    DEFAULT_ITEMS_PER_PAGE, MultiSelect, Paginated, distinct_values, matches_search,
};
use crate::models::auth::AuthenticatedAdmin;
use crate::repository::{InspectionReader, InspectionWriter, VolunteerReader};
use crate::services::{ServiceError, ServiceResult};

fn matches_inspection(inspection: &Inspection, term: &str) -> bool {
    matches_search(
        term,
        [
            inspection.volunteer_name().unwrap_or_default(),
            inspection.area.as_str(),
            inspection.inspection_id.as_str(),
            inspection.volunteer_email().unwrap_or_default(),
        ],
    )
}

/// Lists inspections with overdue reclassification applied as of `today`.
pub async fn load_inspections_page<R>(
    repo: &R,
    query: InspectionsQuery,
    today: NaiveDate,
) -> ServiceResult<InspectionsPageData>
where
    R: InspectionReader + ?Sized,
{
    let mut inspections = repo.list_inspections().await.map_err(|err| {
        log::error!("Failed to list inspections: {err}");
        err
    })?;
    for inspection in &mut inspections {
        inspection.reclassify_overdue(today);
    }

    let search_query = query
        .q
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let selected_statuses = MultiSelect::new(query.status);
    let selected_areas = MultiSelect::new(query.area);
    let selected_volunteers = MultiSelect::new(query.volunteer);

    let area_options = distinct_values(inspections.iter().map(|i| i.area.as_str()));
    let volunteer_options =
        distinct_values(inspections.iter().filter_map(Inspection::volunteer_name));

    let filtered: Vec<Inspection> = inspections
        .into_iter()
        .filter(|i| {
            search_query
                .as_deref()
                .is_none_or(|term| matches_inspection(i, term))
        })
        .filter(|i| selected_statuses.matches(i.status.as_str()))
        .filter(|i| selected_areas.matches(i.area.as_str()))
        .filter(|i| selected_volunteers.matches(i.volunteer_name().unwrap_or_default()))
        .collect();

    Ok(InspectionsPageData {
        stats: InspectionStats::from_inspections(&filtered),
        inspections: Paginated::from_slice(
            &filtered,
            query.page.unwrap_or(1),
            DEFAULT_ITEMS_PER_PAGE,
        ),
        search_query,
        selected_statuses,
        selected_areas,
        selected_volunteers,
        area_options,
        volunteer_options,
    })
}

pub async fn load_inspection<R>(
    repo: &R,
    id: InspectionId,
    today: NaiveDate,
) -> ServiceResult<Inspection>
where
    R: InspectionReader + ?Sized,
{
    let mut inspection = repo
        .get_inspection(id)
        .await
        .map_err(|err| {
            log::error!("Failed to load inspection {id}: {err}");
            err
        })?
        .ok_or(ServiceError::NotFound)?;
    inspection.reclassify_overdue(today);
    Ok(inspection)
}

/// Assigns a new pending inspection to the volunteer and returns the
/// volunteer's name.
pub async fn assign_inspection<R>(
    repo: &R,
    volunteer_id: VolunteerId,
    form: AssignInspectionForm,
    admin: &AuthenticatedAdmin,
) -> ServiceResult<PersonName>
where
    R: VolunteerReader + InspectionWriter + ?Sized,
{
    let payload = AssignInspectionPayload::try_from(form)?;
    let assigned_by = EmailAddress::new(admin.email.as_str())?;

    let volunteer = repo
        .get_volunteer(volunteer_id)
        .await
        .map_err(|err| {
            log::error!("Failed to load volunteer {volunteer_id}: {err}");
            err
        })?
        .ok_or(ServiceError::NotFound)?;

    let new_inspection = payload.into_domain(volunteer.id, &assigned_by);
    repo.create_inspection(&new_inspection).await.map_err(|err| {
        log::error!("Failed to assign inspection to {volunteer_id}: {err}");
        err
    })?;

    Ok(volunteer.name)
}

pub async fn update_inspection<R>(
    repo: &R,
    id: InspectionId,
    form: UpdateInspectionForm,
) -> ServiceResult<Inspection>
where
    R: InspectionWriter + ?Sized,
{
    let updates = UpdateInspection::try_from(form)?;
    repo.update_inspection(id, &updates).await.map_err(|err| {
        log::error!("Failed to update inspection {id}: {err}");
        ServiceError::from(err)
    })
}

/// Accepting only touches the update timestamp of a completed inspection.
pub async fn accept_inspection<R>(repo: &R, id: InspectionId) -> ServiceResult<Inspection>
where
    R: InspectionReader + InspectionWriter + ?Sized,
{
    let inspection = repo
        .get_inspection(id)
        .await
        .map_err(|err| {
            log::error!("Failed to load inspection {id}: {err}");
            err
        })?
        .ok_or(ServiceError::NotFound)?;

    if inspection.status != InspectionStatus::Completed {
        return Err(ServiceError::Form(
            "Only completed inspections can be accepted".to_string(),
        ));
    }

    repo.update_inspection(id, &UpdateInspection::default())
        .await
        .map_err(|err| {
            log::error!("Failed to accept inspection {id}: {err}");
            ServiceError::from(err)
        })
}

pub async fn delete_inspection<R>(repo: &R, id: InspectionId) -> ServiceResult<()>
where
    R: InspectionWriter + ?Sized,
{
    repo.delete_inspection(id).await.map_err(|err| {
        log::error!("Failed to delete inspection {id}: {err}");
        ServiceError::from(err)
    })
}
