use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use chrono::Local;
use tera::Tera;

use crate::models::auth::AuthenticatedAdmin;
use crate::repository::BackendRepository;
use crate::routes::{base_context, render_fetch_error, render_template};
use crate::services::dashboard as dashboard_service;

#[get("/dashboard")]
pub async fn show_dashboard(
    admin: AuthenticatedAdmin,
    repo: web::Data<BackendRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let today = Local::now().date_naive();
    match dashboard_service::load_dashboard(repo.get_ref(), today).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, Some(&admin), "dashboard");
            context.insert("stats", &data);
            render_template(&tera, "dashboard.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render dashboard: {err}");
            render_fetch_error(&tera, &admin, "dashboard", "Failed to fetch dashboard data")
        }
    }
}
