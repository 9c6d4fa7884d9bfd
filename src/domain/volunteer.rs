use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{EmailAddress, PersonName, PhoneNumber, VolunteerId};

/// Discriminates individual volunteers from organizations.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum VolunteerType {
    #[default]
    Individual,
    Organization,
}

impl VolunteerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VolunteerType::Individual => "individual",
            VolunteerType::Organization => "organization",
        }
    }
}

impl Display for VolunteerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for VolunteerType {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "organization" | "organisation" => VolunteerType::Organization,
            _ => VolunteerType::Individual,
        }
    }
}

/// Identity document verification progress.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::InProgress => "in_progress",
            VerificationStatus::Completed => "completed",
        }
    }
}

impl From<&str> for VerificationStatus {
    fn from(s: &str) -> Self {
        match s.trim() {
            "in_progress" => VerificationStatus::InProgress,
            "completed" => VerificationStatus::Completed,
            _ => VerificationStatus::Pending,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Volunteer {
    pub id: VolunteerId,
    /// Human-facing code assigned by the backend (e.g. `VT12`).
    pub volunteer_id: String,
    pub salutation: Option<String>,
    pub name: PersonName,
    pub kind: VolunteerType,
    pub email: EmailAddress,
    pub gender: Option<String>,
    pub phone: PhoneNumber,
    pub organization_name: Option<String>,
    pub no_of_volunteers: Option<u32>,
    pub aadhaar_number: Option<String>,
    pub address: Option<String>,
    pub document_url: Option<String>,
    pub trees_planted: u32,
    pub last_activity: Option<String>,
    pub verification_status: VerificationStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Volunteer {
    /// Last comma-separated segment of the address, e.g. the city.
    pub fn location(&self) -> Option<&str> {
        location_of(self.address.as_deref())
    }
}

pub(crate) fn location_of(address: Option<&str>) -> Option<&str> {
    address
        .and_then(|a| a.rsplit(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Optional profile fields shared by create and update payloads.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VolunteerProfile {
    pub salutation: Option<String>,
    pub gender: Option<String>,
    pub organization_name: Option<String>,
    pub no_of_volunteers: Option<u32>,
    pub aadhaar_number: Option<String>,
    pub address: Option<String>,
    pub verification_status: VerificationStatus,
}

impl VolunteerProfile {
    /// Trims strings, drops empties and clears organization-only fields for
    /// individuals.
    #[must_use]
    pub fn normalized(self, kind: VolunteerType) -> Self {
        let clean = |value: Option<String>| {
            value
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        let is_organization = kind == VolunteerType::Organization;
        Self {
            salutation: clean(self.salutation),
            gender: clean(self.gender),
            organization_name: clean(self.organization_name).filter(|_| is_organization),
            no_of_volunteers: self.no_of_volunteers.filter(|_| is_organization),
            aadhaar_number: clean(self.aadhaar_number),
            address: clean(self.address),
            verification_status: self.verification_status,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewVolunteer {
    pub name: PersonName,
    pub kind: VolunteerType,
    pub email: EmailAddress,
    pub phone: PhoneNumber,
    pub profile: VolunteerProfile,
    pub document_url: Option<String>,
}

impl NewVolunteer {
    #[must_use]
    pub fn new(
        name: PersonName,
        kind: VolunteerType,
        email: EmailAddress,
        phone: PhoneNumber,
        profile: VolunteerProfile,
        document_url: Option<String>,
    ) -> Self {
        Self {
            name,
            kind,
            email,
            phone,
            profile: profile.normalized(kind),
            document_url,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct UpdateVolunteer {
    pub name: PersonName,
    pub kind: VolunteerType,
    pub email: EmailAddress,
    pub phone: PhoneNumber,
    pub profile: VolunteerProfile,
    /// Replacement document; `None` keeps the current one.
    pub document_url: Option<String>,
}

impl UpdateVolunteer {
    #[must_use]
    pub fn new(
        name: PersonName,
        kind: VolunteerType,
        email: EmailAddress,
        phone: PhoneNumber,
        profile: VolunteerProfile,
        document_url: Option<String>,
    ) -> Self {
        Self {
            name,
            kind,
            email,
            phone,
            profile: profile.normalized(kind),
            document_url,
        }
    }
}
