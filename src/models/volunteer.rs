//! Backend row shapes for the `volunteers` table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::types::{EmailAddress, PersonName, PhoneNumber, TypeConstraintError, VolunteerId};
use crate::domain::volunteer::{
    NewVolunteer as DomainNewVolunteer, UpdateVolunteer as DomainUpdateVolunteer,
    VerificationStatus, Volunteer as DomainVolunteer, VolunteerType,
};

pub const VOLUNTEERS_TABLE: &str = "volunteers";

#[derive(Debug, Clone, Deserialize, Serialize)]
/// Row of the `volunteers` table.
pub struct Volunteer {
    pub id: Uuid,
    pub volunteer_id: Option<String>,
    pub salutation: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub email: String,
    pub gender: Option<String>,
    pub phone: String,
    pub organization_name: Option<String>,
    pub no_of_volunteers: Option<u32>,
    pub aadhaar_number: Option<String>,
    pub address: Option<String>,
    pub document_url: Option<String>,
    #[serde(default)]
    pub trees_planted: Option<u32>,
    pub last_activity: Option<String>,
    pub verification_status: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
/// Insert payload for the `volunteers` table.
pub struct NewVolunteer<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salutation: Option<&'a str>,
    pub name: &'a str,
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<&'a str>,
    pub phone: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_of_volunteers: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aadhaar_number: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_url: Option<&'a str>,
    pub verification_status: &'a str,
}

#[derive(Debug, Serialize)]
/// Patch payload for the `volunteers` table.
///
/// Profile fields are always sent so that cleared values become `null`; the
/// document reference is only sent when replaced.
pub struct VolunteerPatch<'a> {
    pub salutation: Option<&'a str>,
    pub name: &'a str,
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub email: &'a str,
    pub gender: Option<&'a str>,
    pub phone: &'a str,
    pub organization_name: Option<&'a str>,
    pub no_of_volunteers: Option<u32>,
    pub aadhaar_number: Option<&'a str>,
    pub address: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_url: Option<&'a str>,
    pub verification_status: &'a str,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<Volunteer> for DomainVolunteer {
    type Error = TypeConstraintError;

    fn try_from(row: Volunteer) -> Result<Self, Self::Error> {
        Ok(Self {
            id: VolunteerId::new(row.id),
            volunteer_id: row.volunteer_id.unwrap_or_default(),
            salutation: row.salutation,
            name: PersonName::new(row.name)?,
            kind: VolunteerType::from(row.kind.as_str()),
            email: EmailAddress::new(row.email)?,
            gender: row.gender,
            phone: PhoneNumber::new(row.phone)?,
            organization_name: row.organization_name,
            no_of_volunteers: row.no_of_volunteers,
            aadhaar_number: row.aadhaar_number,
            address: row.address,
            document_url: row.document_url,
            trees_planted: row.trees_planted.unwrap_or_default(),
            last_activity: row.last_activity,
            verification_status: row
                .verification_status
                .as_deref()
                .map(VerificationStatus::from)
                .unwrap_or_default(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewVolunteer> for NewVolunteer<'a> {
    fn from(volunteer: &'a DomainNewVolunteer) -> Self {
        let profile = &volunteer.profile;
        Self {
            salutation: profile.salutation.as_deref(),
            name: volunteer.name.as_str(),
            kind: volunteer.kind.as_str(),
            email: volunteer.email.as_str(),
            gender: profile.gender.as_deref(),
            phone: volunteer.phone.as_str(),
            organization_name: profile.organization_name.as_deref(),
            no_of_volunteers: profile.no_of_volunteers,
            aadhaar_number: profile.aadhaar_number.as_deref(),
            address: profile.address.as_deref(),
            document_url: volunteer.document_url.as_deref(),
            verification_status: profile.verification_status.as_str(),
        }
    }
}

impl<'a> From<&'a DomainUpdateVolunteer> for VolunteerPatch<'a> {
    fn from(volunteer: &'a DomainUpdateVolunteer) -> Self {
        let profile = &volunteer.profile;
        Self {
            salutation: profile.salutation.as_deref(),
            name: volunteer.name.as_str(),
            kind: volunteer.kind.as_str(),
            email: volunteer.email.as_str(),
            gender: profile.gender.as_deref(),
            phone: volunteer.phone.as_str(),
            organization_name: profile.organization_name.as_deref(),
            no_of_volunteers: profile.no_of_volunteers,
            aadhaar_number: profile.aadhaar_number.as_deref(),
            address: profile.address.as_deref(),
            document_url: volunteer.document_url.as_deref(),
            verification_status: profile.verification_status.as_str(),
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::volunteer::VolunteerProfile;
    use serde_json::json;

    fn update(kind: VolunteerType, document_url: Option<String>) -> DomainUpdateVolunteer {
        DomainUpdateVolunteer::new(
            PersonName::new("Kavya").unwrap(),
            kind,
            EmailAddress::new("kavya@example.com").unwrap(),
            PhoneNumber::new("9876543210").unwrap(),
            VolunteerProfile {
                organization_name: Some("Green Club".to_string()),
                ..VolunteerProfile::default()
            },
            document_url,
        )
    }

    #[test]
    fn patch_clears_organization_fields_for_individuals() {
        let updates = update(VolunteerType::Individual, None);
        let payload = serde_json::to_value(VolunteerPatch::from(&updates)).unwrap();

        assert_eq!(payload["type"], json!("individual"));
        assert_eq!(payload["organization_name"], json!(null));
        assert!(payload.get("document_url").is_none());
        assert!(payload.get("updated_at").is_some());
    }

    #[test]
    fn patch_sends_replacement_document() {
        let updates = update(
            VolunteerType::Organization,
            Some("documents/id.pdf".to_string()),
        );
        let payload = serde_json::to_value(VolunteerPatch::from(&updates)).unwrap();

        assert_eq!(payload["document_url"], json!("documents/id.pdf"));
        assert_eq!(payload["organization_name"], json!("Green Club"));
    }

    #[test]
    fn row_defaults_missing_counters_and_keeps_short_phone() {
        let row: Volunteer = serde_json::from_value(json!({
            "id": "6f1c1a5e-8e0f-4c1e-9d8a-0f7c2b1d3e4f",
            "volunteer_id": "VT12",
            "salutation": null,
            "name": "Philip",
            "type": "organization",
            "email": "Philip@Example.com",
            "gender": null,
            "phone": "12345",
            "organization_name": "Rotary",
            "no_of_volunteers": 12,
            "aadhaar_number": null,
            "address": "Main Road, Tuticorin",
            "document_url": null,
            "last_activity": null,
            "verification_status": "in_progress",
            "created_at": null,
            "updated_at": null
        }))
        .unwrap();

        let volunteer = DomainVolunteer::try_from(row).unwrap();
        assert_eq!(volunteer.trees_planted, 0);
        assert_eq!(volunteer.phone.as_str(), "12345");
        assert_eq!(volunteer.email.as_str(), "philip@example.com");
        assert_eq!(volunteer.kind, VolunteerType::Organization);
        assert_eq!(volunteer.verification_status, VerificationStatus::InProgress);
        assert_eq!(volunteer.location(), Some("Tuticorin"));
    }
}
