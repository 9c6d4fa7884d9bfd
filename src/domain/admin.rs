use serde::Serialize;

use crate::domain::types::{AdminId, EmailAddress, PhoneNumber};

/// Dashboard administrator stored in the backend's `admin` table.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Admin {
    pub id: AdminId,
    pub email: EmailAddress,
    pub phone: Option<String>,
    /// bcrypt hash; never rendered.
    #[serde(skip_serializing)]
    pub password_hash: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewAdmin {
    pub email: EmailAddress,
    pub phone: PhoneNumber,
    pub password_hash: String,
}
