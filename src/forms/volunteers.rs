use std::path::Path;

use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use uuid::Uuid;

use crate::domain::types::{EmailAddress, PersonName, PhoneNumber};
use crate::domain::volunteer::{
    NewVolunteer, UpdateVolunteer, VerificationStatus, VolunteerProfile, VolunteerType,
};
use crate::forms::{FormError, non_blank, parse_optional_number};

/// Largest accepted identity document.
pub const MAX_DOCUMENT_BYTES: usize = 5 * 1024 * 1024;

/// Content types accepted for identity documents.
pub const ALLOWED_DOCUMENT_TYPES: [&str; 4] =
    ["image/jpeg", "image/png", "image/jpg", "application/pdf"];

/// Subdirectory of the upload root holding documents.
pub const DOCUMENTS_DIR: &str = "documents";

#[derive(MultipartForm)]
/// Create and edit form of a volunteer, with an optional identity document.
pub struct VolunteerForm {
    pub salutation: Option<Text<String>>,
    pub name: Text<String>,
    #[multipart(rename = "type")]
    pub kind: Text<String>,
    pub email: Text<String>,
    pub gender: Option<Text<String>>,
    pub phone: Text<String>,
    pub organization_name: Option<Text<String>>,
    pub no_of_volunteers: Option<Text<String>>,
    pub aadhaar_number: Option<Text<String>>,
    pub address: Option<Text<String>>,
    pub verification_status: Option<Text<String>>,
    #[multipart(limit = "10MB")]
    pub document: Option<TempFile>,
}

/// Uploaded document that passed type and size checks.
pub struct DocumentUpload {
    file: TempFile,
    file_name: String,
}

impl DocumentUpload {
    /// Checks the content type and size of an uploaded file. Empty parts,
    /// sent by browsers when nothing was chosen, yield `None`.
    pub fn validate(file: TempFile) -> Result<Option<Self>, FormError> {
        if file.size == 0 {
            return Ok(None);
        }
        let content_type = file
            .content_type
            .as_ref()
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_default();
        if !ALLOWED_DOCUMENT_TYPES.contains(&content_type.as_str()) {
            return Err(FormError::InvalidFileType);
        }
        if file.size > MAX_DOCUMENT_BYTES {
            return Err(FormError::FileTooLarge);
        }
        let file_name = sanitize_file_name(file.file_name.as_deref().unwrap_or("document"));
        Ok(Some(Self { file, file_name }))
    }

    /// Copies the document under `{upload_dir}/documents/` and returns the
    /// reference stored on the volunteer, `documents/{file_name}`.
    pub fn store(self, upload_dir: &Path) -> std::io::Result<String> {
        let directory = upload_dir.join(DOCUMENTS_DIR);
        std::fs::create_dir_all(&directory)?;
        let stored_name = format!("{}_{}", Uuid::new_v4().simple(), self.file_name);
        std::fs::copy(self.file.file.path(), directory.join(&stored_name))?;
        Ok(format!("{DOCUMENTS_DIR}/{stored_name}"))
    }
}

/// Keeps the last path segment of a client-supplied name and replaces
/// characters outside `[A-Za-z0-9._-]`.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "document".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Validated contents of [`VolunteerForm`].
pub struct VolunteerPayload {
    pub name: PersonName,
    pub kind: VolunteerType,
    pub email: EmailAddress,
    pub phone: PhoneNumber,
    pub profile: VolunteerProfile,
    pub document: Option<DocumentUpload>,
}

fn text(value: &Option<Text<String>>) -> Option<&str> {
    value.as_ref().map(|t| t.as_str())
}

impl TryFrom<VolunteerForm> for VolunteerPayload {
    type Error = FormError;

    fn try_from(form: VolunteerForm) -> Result<Self, Self::Error> {
        if [&form.name, &form.email, &form.phone]
            .iter()
            .any(|value| value.trim().is_empty())
        {
            return Err(FormError::MissingRequired);
        }

        let profile = VolunteerProfile {
            salutation: non_blank(text(&form.salutation)),
            gender: non_blank(text(&form.gender)),
            organization_name: non_blank(text(&form.organization_name)),
            no_of_volunteers: parse_optional_number(text(&form.no_of_volunteers))?,
            aadhaar_number: non_blank(text(&form.aadhaar_number)),
            address: non_blank(text(&form.address)),
            verification_status: text(&form.verification_status)
                .map(VerificationStatus::from)
                .unwrap_or_default(),
        };

        let document = form
            .document
            .map(DocumentUpload::validate)
            .transpose()?
            .flatten();

        Ok(Self {
            name: PersonName::new(form.name.into_inner())?,
            kind: VolunteerType::from(form.kind.as_str()),
            email: EmailAddress::new(form.email.into_inner())?,
            phone: PhoneNumber::new(form.phone.into_inner())?,
            profile,
            document,
        })
    }
}

impl VolunteerPayload {
    pub fn into_new_volunteer(self, document_url: Option<String>) -> NewVolunteer {
        NewVolunteer::new(
            self.name,
            self.kind,
            self.email,
            self.phone,
            self.profile,
            document_url,
        )
    }

    pub fn into_update(self, document_url: Option<String>) -> UpdateVolunteer {
        UpdateVolunteer::new(
            self.name,
            self.kind,
            self.email,
            self.phone,
            self.profile,
            document_url,
        )
    }
}
