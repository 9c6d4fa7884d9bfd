//! Volunteer listing and maintenance.

use std::path::Path;

use crate::domain::tree::TreeOptions;
use crate::domain::types::VolunteerId;
use crate::domain::volunteer::Volunteer;
use crate::dto::volunteers::{VolunteerPageData, VolunteersPageData, VolunteersQuery};
use crate::forms::volunteers::{VolunteerForm, VolunteerPayload};
use crate::listing::{
    DEFAULT_ITEMS_PER_PAGE, MultiSelect, Paginated, distinct_values, matches_search,
};
use crate::repository::{TreeReader, VolunteerReader, VolunteerWriter};
use crate::services::{ServiceError, ServiceResult};

/// Name, email and code match case-insensitively; the phone matches the raw
/// term as a substring.
fn matches_volunteer(volunteer: &Volunteer, term: &str) -> bool {
    let term = term.trim();
    matches_search(
        term,
        [
            volunteer.name.as_str(),
            volunteer.email.as_str(),
            volunteer.volunteer_id.as_str(),
        ],
    ) || volunteer.phone.as_str().contains(term)
}

pub async fn load_volunteers_page<R>(
    repo: &R,
    query: VolunteersQuery,
) -> ServiceResult<VolunteersPageData>
where
    R: VolunteerReader + ?Sized,
{
    let volunteers = repo.list_volunteers().await.map_err(|err| {
        log::error!("Failed to list volunteers: {err}");
        err
    })?;

    let search_query = query
        .q
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let selected_types = MultiSelect::new(query.kind);
    let selected_locations = MultiSelect::new(query.location);
    let location_options = distinct_values(volunteers.iter().filter_map(Volunteer::location));

    let filtered: Vec<Volunteer> = volunteers
        .into_iter()
        .filter(|v| {
            search_query
                .as_deref()
                .is_none_or(|term| matches_volunteer(v, term))
        })
        .filter(|v| selected_types.matches(v.kind.as_str()))
        .filter(|v| selected_locations.matches(v.location().unwrap_or_default()))
        .collect();

    Ok(VolunteersPageData {
        volunteers: Paginated::from_slice(
            &filtered,
            query.page.unwrap_or(1),
            DEFAULT_ITEMS_PER_PAGE,
        ),
        search_query,
        selected_types,
        selected_locations,
        location_options,
    })
}

/// Loads one volunteer together with the species offered by the assignment form.
pub async fn load_volunteer<R>(repo: &R, id: VolunteerId) -> ServiceResult<VolunteerPageData>
where
    R: VolunteerReader + TreeReader + ?Sized,
{
    let volunteer = repo
        .get_volunteer(id)
        .await
        .map_err(|err| {
            log::error!("Failed to load volunteer {id}: {err}");
            err
        })?
        .ok_or(ServiceError::NotFound)?;

    let pairs = repo.list_tree_pairs().await.map_err(|err| {
        log::error!("Failed to list tree species: {err}");
        err
    })?;

    Ok(VolunteerPageData::new(
        volunteer,
        TreeOptions::from_pairs(pairs).species,
    ))
}

/// Stores the optional document and returns its reference.
fn store_document(
    payload: &mut VolunteerPayload,
    upload_dir: &Path,
) -> ServiceResult<Option<String>> {
    payload
        .document
        .take()
        .map(|document| document.store(upload_dir))
        .transpose()
        .map_err(|err| {
            log::error!("Failed to store volunteer document: {err}");
            ServiceError::Internal(format!("Failed to store document: {err}"))
        })
}

fn discard_document(upload_dir: &Path, document_url: Option<&str>) {
    if let Some(reference) = document_url
        && let Err(err) = std::fs::remove_file(upload_dir.join(reference))
    {
        log::warn!("Failed to remove orphaned document {reference}: {err}");
    }
}

/// Validates the form, stores the document and inserts the volunteer.
pub async fn create_volunteer<R>(
    repo: &R,
    form: VolunteerForm,
    upload_dir: &Path,
) -> ServiceResult<Volunteer>
where
    R: VolunteerWriter + ?Sized,
{
    let mut payload = VolunteerPayload::try_from(form)?;
    let document_url = store_document(&mut payload, upload_dir)?;

    let new_volunteer = payload.into_new_volunteer(document_url.clone());
    repo.create_volunteer(&new_volunteer).await.map_err(|err| {
        log::error!("Failed to create volunteer {}: {err}", new_volunteer.email);
        discard_document(upload_dir, document_url.as_deref());
        ServiceError::from(err)
    })
}

/// Saves an edit. The stored document is replaced only when a new one is
/// uploaded.
pub async fn update_volunteer<R>(
    repo: &R,
    id: VolunteerId,
    form: VolunteerForm,
    upload_dir: &Path,
) -> ServiceResult<Volunteer>
where
    R: VolunteerWriter + ?Sized,
{
    let mut payload = VolunteerPayload::try_from(form)?;
    let document_url = store_document(&mut payload, upload_dir)?;

    let updates = payload.into_update(document_url.clone());
    repo.update_volunteer(id, &updates).await.map_err(|err| {
        log::error!("Failed to update volunteer {id}: {err}");
        discard_document(upload_dir, document_url.as_deref());
        ServiceError::from(err)
    })
}

pub async fn delete_volunteer<R>(repo: &R, id: VolunteerId) -> ServiceResult<()>
where
    R: VolunteerWriter + ?Sized,
{
    repo.delete_volunteer(id).await.map_err(|err| {
        log::error!("Failed to delete volunteer {id}: {err}");
        ServiceError::from(err)
    })
}
