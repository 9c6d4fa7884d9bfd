//! Sign-in and sign-up of dashboard administrators.

use crate::domain::admin::{Admin, NewAdmin};
use crate::forms::auth::{SignInForm, SignInPayload, SignUpForm, SignUpPayload};
use crate::repository::errors::RepositoryError;
use crate::repository::{AdminReader, AdminWriter};
use crate::services::{ServiceError, ServiceResult};

/// bcrypt work factor of stored password hashes.
pub const PASSWORD_HASH_COST: u32 = 10;

/// Checks the credentials and returns the matching admin.
pub async fn sign_in<R>(repo: &R, form: SignInForm) -> ServiceResult<Admin>
where
    R: AdminReader + ?Sized,
{
    let payload = SignInPayload::try_from(form)?;

    let admin = repo
        .get_admin_by_email(&payload.email)
        .await
        .map_err(|err| {
            log::error!("Failed to look up admin: {err}");
            err
        })?
        .ok_or_else(|| ServiceError::Form("Login failed: User not found.".to_string()))?;

    match bcrypt::verify(&payload.password, &admin.password_hash) {
        Ok(true) => Ok(admin),
        Ok(false) => Err(ServiceError::Form("Incorrect password.".to_string())),
        Err(err) => {
            log::error!("Failed to verify password hash of {}: {err}", admin.email);
            Err(ServiceError::Form("Incorrect password.".to_string()))
        }
    }
}

/// Registers a new admin with a bcrypt-hashed password.
pub async fn sign_up<R>(repo: &R, form: SignUpForm) -> ServiceResult<Admin>
where
    R: AdminReader + AdminWriter + ?Sized,
{
    let payload = SignUpPayload::try_from(form)?;

    let existing = repo.get_admin_by_email(&payload.email).await.map_err(|err| {
        log::error!("Failed to look up admin: {err}");
        err
    })?;
    if existing.is_some() {
        return Err(ServiceError::Form("Email already registered.".to_string()));
    }

    let password_hash = bcrypt::hash(&payload.password, PASSWORD_HASH_COST)
        .map_err(|err| ServiceError::Internal(format!("Failed to hash password: {err}")))?;

    let new_admin = NewAdmin {
        email: payload.email,
        phone: payload.phone,
        password_hash,
    };

    repo.create_admin(&new_admin).await.map_err(|err| {
        log::error!("Failed to create admin {}: {err}", new_admin.email);
        match err {
            RepositoryError::ConstraintViolation(_) => {
                ServiceError::Form("Email already registered.".to_string())
            }
            _ => ServiceError::Form("Failed to sign up. Try again.".to_string()),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::memory::InMemoryRepository;

    fn sign_up_form(email: &str) -> SignUpForm {
        SignUpForm {
            email: email.to_string(),
            phone: " 98765 43210 ".to_string(),
            password: "secret-pass".to_string(),
            confirm_password: "secret-pass".to_string(),
        }
    }

    fn sign_in_form(email: &str, password: &str) -> SignInForm {
        SignInForm {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[actix_web::test]
    async fn sign_up_then_sign_in() {
        let repo = InMemoryRepository::new();

        let admin = sign_up(&repo, sign_up_form(" Staff@City.gov ")).await.unwrap();
        assert_eq!(admin.email.as_str(), "staff@city.gov");
        assert_eq!(admin.phone.as_deref(), Some("98765 43210"));
        assert_ne!(admin.password_hash, "secret-pass");

        let signed_in = sign_in(&repo, sign_in_form("staff@city.gov", "secret-pass"))
            .await
            .unwrap();
        assert_eq!(signed_in.id, admin.id);
    }

    #[actix_web::test]
    async fn duplicate_email_is_rejected_before_insert() {
        let repo = InMemoryRepository::new();
        sign_up(&repo, sign_up_form("staff@city.gov")).await.unwrap();
        let writes = repo.writes();

        let result = sign_up(&repo, sign_up_form("STAFF@city.gov")).await;

        assert!(matches!(result, Err(ServiceError::Form(m)) if m == "Email already registered."));
        assert_eq!(repo.writes(), writes);
    }

    #[actix_web::test]
    async fn password_mismatch_never_reaches_backend() {
        let repo = InMemoryRepository::new();
        let mut form = sign_up_form("staff@city.gov");
        form.confirm_password = "other".to_string();

        let result = sign_up(&repo, form).await;

        assert!(matches!(result, Err(ServiceError::Form(m)) if m == "Passwords do not match."));
        assert_eq!(repo.writes(), 0);
    }

    #[actix_web::test]
    async fn failed_insert_reports_generic_message() {
        let repo = InMemoryRepository::new().failing_writes();

        let result = sign_up(&repo, sign_up_form("staff@city.gov")).await;

        assert!(matches!(result, Err(ServiceError::Form(m)) if m == "Failed to sign up. Try again."));
    }

    #[actix_web::test]
    async fn sign_in_errors() {
        let repo = InMemoryRepository::new();
        sign_up(&repo, sign_up_form("staff@city.gov")).await.unwrap();

        let unknown = sign_in(&repo, sign_in_form("nobody@city.gov", "secret-pass")).await;
        assert!(matches!(unknown, Err(ServiceError::Form(m)) if m == "Login failed: User not found."));

        let wrong = sign_in(&repo, sign_in_form("staff@city.gov", "nope")).await;
        assert!(matches!(wrong, Err(ServiceError::Form(m)) if m == "Incorrect password."));
    }
}
