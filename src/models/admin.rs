//! Backend row shapes for the custom `admin` table.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::admin::{Admin as DomainAdmin, NewAdmin as DomainNewAdmin};
use crate::domain::types::{AdminId, EmailAddress, TypeConstraintError};

pub const ADMIN_TABLE: &str = "admin";

#[derive(Debug, Clone, Deserialize)]
/// Row of the `admin` table. `password` holds a bcrypt hash.
pub struct Admin {
    pub id: Uuid,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
}

#[derive(Debug, Serialize)]
/// Insert payload for the `admin` table.
pub struct NewAdmin<'a> {
    pub email: &'a str,
    pub phone: &'a str,
    pub password: &'a str,
}

impl TryFrom<Admin> for DomainAdmin {
    type Error = TypeConstraintError;

    fn try_from(row: Admin) -> Result<Self, Self::Error> {
        Ok(Self {
            id: AdminId::new(row.id),
            email: EmailAddress::new(row.email)?,
            phone: row.phone,
            password_hash: row.password,
        })
    }
}

impl<'a> From<&'a DomainNewAdmin> for NewAdmin<'a> {
    fn from(admin: &'a DomainNewAdmin) -> Self {
        Self {
            email: admin.email.as_str(),
            phone: admin.phone.as_str(),
            password: admin.password_hash.as_str(),
        }
    }
}
