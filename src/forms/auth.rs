use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{EmailAddress, PhoneNumber};
use crate::forms::FormError;

#[derive(Deserialize, Validate)]
/// Sign-in form on the landing page.
pub struct SignInForm {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Deserialize, Validate)]
/// Sign-up form on the landing page.
pub struct SignUpForm {
    #[validate(length(min = 1))]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[validate(length(min = 1))]
    pub password: String,
    pub confirm_password: String,
}

pub struct SignInPayload {
    pub email: EmailAddress,
    pub password: String,
}

pub struct SignUpPayload {
    pub email: EmailAddress,
    pub phone: PhoneNumber,
    pub password: String,
}

impl TryFrom<SignInForm> for SignInPayload {
    type Error = FormError;

    fn try_from(form: SignInForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            email: EmailAddress::new(form.email)?,
            password: form.password,
        })
    }
}

impl TryFrom<SignUpForm> for SignUpPayload {
    type Error = FormError;

    fn try_from(form: SignUpForm) -> Result<Self, Self::Error> {
        if form.password != form.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        if form.phone.trim().is_empty() {
            return Err(FormError::MissingPhone);
        }
        form.validate()?;
        Ok(Self {
            email: EmailAddress::new(form.email)?,
            phone: PhoneNumber::new(form.phone)?,
            password: form.password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_up(phone: &str, password: &str, confirm: &str) -> SignUpForm {
        SignUpForm {
            email: " Staff@City.gov ".to_string(),
            phone: phone.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn password_mismatch_is_checked_first() {
        let result = SignUpPayload::try_from(sign_up("", "secret", "other"));
        assert!(matches!(result, Err(FormError::PasswordMismatch)));
    }

    #[test]
    fn phone_is_required() {
        let result = SignUpPayload::try_from(sign_up("  ", "secret", "secret"));
        assert!(matches!(result, Err(FormError::MissingPhone)));
    }

    #[test]
    fn valid_sign_up_is_normalized() {
        let payload = SignUpPayload::try_from(sign_up(" 98765 43210 ", "secret", "secret")).unwrap();
        assert_eq!(payload.email.as_str(), "staff@city.gov");
        assert_eq!(payload.phone.as_str(), "98765 43210");
    }

    #[test]
    fn sign_in_rejects_bad_email() {
        let form = SignInForm {
            email: "not-an-email".to_string(),
            password: "secret".to_string(),
        };
        assert!(matches!(
            SignInPayload::try_from(form),
            Err(FormError::InvalidEmail)
        ));
    }
}
