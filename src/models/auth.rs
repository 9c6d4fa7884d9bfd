//! Session claims of a signed-in administrator.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::admin::Admin;
use crate::models::config::ServerConfig;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
/// Claims stored in the identity cookie as an HS256 token.
pub struct AuthenticatedAdmin {
    /// Admin id.
    pub sub: String,
    pub email: String,
    /// Expiry as a unix timestamp.
    pub exp: i64,
}

impl AuthenticatedAdmin {
    pub fn new(admin: &Admin, ttl_hours: u64) -> Self {
        let ttl = Duration::hours(i64::try_from(ttl_hours).unwrap_or(i64::MAX / 3600));
        Self {
            sub: admin.id.to_string(),
            email: admin.email.as_str().to_string(),
            exp: (Utc::now() + ttl).timestamp(),
        }
    }

    pub fn to_jwt(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    pub fn from_jwt(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedAdmin, actix_web::Error> {
    let unauthorized = || actix_web::error::ErrorUnauthorized("Authentication required");

    let config = req
        .app_data::<web::Data<ServerConfig>>()
        .ok_or_else(unauthorized)?;
    let identity = req.get_identity().map_err(|_| unauthorized())?;
    let token = identity.id().map_err(|_| unauthorized())?;

    AuthenticatedAdmin::from_jwt(&token, &config.secret).map_err(|e| {
        log::warn!("Rejected session token: {e}");
        unauthorized()
    })
}

impl FromRequest for AuthenticatedAdmin {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{AdminId, EmailAddress};
    use uuid::Uuid;

    const SECRET: &str = "a-test-secret-that-is-long-enough-for-hs256";

    fn admin() -> Admin {
        Admin {
            id: AdminId::new(Uuid::new_v4()),
            email: EmailAddress::new("Staff@City.gov").unwrap(),
            phone: None,
            password_hash: String::new(),
        }
    }

    #[test]
    fn token_round_trips() {
        let claims = AuthenticatedAdmin::new(&admin(), 1);
        let token = claims.to_jwt(SECRET).unwrap();

        let decoded = AuthenticatedAdmin::from_jwt(&token, SECRET).unwrap();
        assert_eq!(decoded, claims);
        assert_eq!(decoded.email, "staff@city.gov");
    }

    #[test]
    fn token_with_wrong_secret_is_rejected() {
        let token = AuthenticatedAdmin::new(&admin(), 1).to_jwt(SECRET).unwrap();
        assert!(AuthenticatedAdmin::from_jwt(&token, "another-secret").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut claims = AuthenticatedAdmin::new(&admin(), 1);
        claims.exp = (Utc::now() - Duration::hours(2)).timestamp();
        let token = claims.to_jwt(SECRET).unwrap();
        assert!(AuthenticatedAdmin::from_jwt(&token, SECRET).is_err());
    }

    #[actix_web::test]
    async fn extractor_without_identity_is_unauthorized() {
        let req = actix_web::test::TestRequest::default().to_http_request();
        let result = AuthenticatedAdmin::extract(&req).await;
        let err = result.unwrap_err();
        assert_eq!(
            err.as_response_error().status_code(),
            actix_web::http::StatusCode::UNAUTHORIZED
        );
    }
}
