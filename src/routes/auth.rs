use actix_identity::Identity;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::domain::admin::Admin;
use crate::forms::auth::{SignInForm, SignUpForm};
use crate::models::auth::AuthenticatedAdmin;
use crate::models::config::ServerConfig;
use crate::repository::BackendRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, auth as auth_service};

#[derive(Deserialize)]
struct LandingQuery {
    mode: Option<String>,
}

#[get("/")]
pub async fn show_landing(
    query: web::Query<LandingQuery>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = base_context(&flash_messages, None, "landing");
    let signup = query.mode.as_deref() == Some("signup");
    context.insert("signup", &signup);

    render_template(&tera, "index.html", &context)
}

/// Stores the session token of `admin` in the identity cookie.
fn start_session(req: &HttpRequest, admin: &Admin, config: &ServerConfig) -> Result<(), String> {
    let claims = AuthenticatedAdmin::new(admin, config.session_ttl_hours);
    let token = claims
        .to_jwt(&config.secret)
        .map_err(|e| format!("Failed to sign session token: {e}"))?;
    Identity::login(&req.extensions(), token)
        .map_err(|e| format!("Failed to attach identity: {e}"))?;
    Ok(())
}

fn signed_in(req: &HttpRequest, admin: &Admin, config: &ServerConfig, message: &str) -> HttpResponse {
    match start_session(req, admin, config) {
        Ok(()) => {
            FlashMessage::success(message).send();
            redirect("/dashboard")
        }
        Err(err) => {
            log::error!("{err}");
            FlashMessage::error("Login failed. Please try again.").send();
            redirect("/")
        }
    }
}

#[post("/auth/signin")]
pub async fn sign_in(
    req: HttpRequest,
    repo: web::Data<BackendRepository>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<SignInForm>,
) -> impl Responder {
    match auth_service::sign_in(repo.get_ref(), form).await {
        Ok(admin) => signed_in(&req, &admin, &server_config, "Login successful!"),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to sign in: {err}");
            FlashMessage::error("Login failed. Please try again.").send();
            redirect("/")
        }
    }
}

#[post("/auth/signup")]
pub async fn sign_up(
    req: HttpRequest,
    repo: web::Data<BackendRepository>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<SignUpForm>,
) -> impl Responder {
    match auth_service::sign_up(repo.get_ref(), form).await {
        Ok(admin) => signed_in(&req, &admin, &server_config, "Sign up successful!"),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/?mode=signup")
        }
        Err(err) => {
            log::error!("Failed to sign up: {err}");
            FlashMessage::error("Failed to sign up. Try again.").send();
            redirect("/?mode=signup")
        }
    }
}

#[post("/logout")]
pub async fn logout(identity: Identity) -> impl Responder {
    identity.logout();
    redirect("/")
}
