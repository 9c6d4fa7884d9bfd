//! Administrative dashboard of a municipal tree tracking programme.
//!
//! Staff browse planted trees, manage volunteers, assign and review
//! inspections and maintain the master catalog of tree types. All data lives
//! in a hosted PostgREST backend reached through [`backend::BackendClient`].

#[cfg(feature = "server")]
use actix_cors::Cors;
#[cfg(feature = "server")]
use actix_files::Files;
#[cfg(feature = "server")]
use actix_identity::IdentityMiddleware;
#[cfg(feature = "server")]
use actix_session::{SessionMiddleware, config::PersistentSession, storage::CookieSessionStore};
#[cfg(feature = "server")]
use actix_web::cookie::{Key, time::Duration as CookieDuration};
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, middleware as actix_middleware, web};
#[cfg(feature = "server")]
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
#[cfg(feature = "server")]
use tera::Tera;

#[cfg(feature = "server")]
use crate::backend::BackendClient;
#[cfg(feature = "server")]
use crate::middleware::RedirectUnauthorized;
#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::repository::BackendRepository;
#[cfg(feature = "server")]
use crate::routes::api::{api_v1_health, api_v1_tree_type_id, api_v1_tree_types};
#[cfg(feature = "server")]
use crate::routes::auth::{logout, show_landing, sign_in, sign_up};
#[cfg(feature = "server")]
use crate::routes::dashboard::show_dashboard;
#[cfg(feature = "server")]
use crate::routes::inspections::{
    accept_inspection, delete_inspection, show_inspection, show_inspections, update_inspection,
};
#[cfg(feature = "server")]
use crate::routes::master::{add_tree, delete_tree, show_master, update_tree, upload_trees};
#[cfg(feature = "server")]
use crate::routes::trees::show_trees;
#[cfg(feature = "server")]
use crate::routes::volunteers::{
    add_volunteer, assign_inspection, delete_volunteer, save_volunteer, show_volunteer,
    show_volunteers,
};

pub mod domain;
pub mod models;

#[cfg(feature = "server")]
pub mod backend;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod listing;
#[cfg(feature = "server")]
pub mod middleware;
#[cfg(feature = "server")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    let client = BackendClient::new(&server_config.backend).map_err(|e| {
        std::io::Error::other(format!("Failed to build the backend client: {e}"))
    })?;
    let repo = BackendRepository::new(client);

    match repo.check_connection().await {
        Ok((trees, volunteers)) => {
            log::info!("Backend reachable: {trees} trees, {volunteers} volunteers");
        }
        Err(e) => log::error!("Backend connection check failed: {e}"),
    }

    std::fs::create_dir_all(&server_config.upload_dir)?;

    // Keys and stores for identity, sessions, and flash messages.
    let secret_key = Key::derive_from(server_config.secret.as_bytes());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);
    let session_ttl = CookieDuration::hours(
        i64::try_from(server_config.session_ttl_hours).unwrap_or(i64::MAX / 3600),
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(server_config.domain.clone()))
                    .session_lifecycle(PersistentSession::default().session_ttl(session_ttl))
                    .build(),
            )
            .wrap(actix_middleware::Compress::default())
            .wrap(actix_middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(Files::new("/uploads", server_config.upload_dir.clone()))
            .service(show_landing)
            .service(sign_in)
            .service(sign_up)
            .service(
                web::scope("/api")
                    .service(api_v1_tree_types)
                    .service(api_v1_tree_type_id)
                    .service(api_v1_health),
            )
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .service(show_dashboard)
                    .service(show_trees)
                    .service(show_volunteers)
                    .service(add_volunteer)
                    .service(show_volunteer)
                    .service(save_volunteer)
                    .service(delete_volunteer)
                    .service(assign_inspection)
                    .service(show_inspections)
                    .service(show_inspection)
                    .service(update_inspection)
                    .service(accept_inspection)
                    .service(delete_inspection)
                    .service(show_master)
                    .service(add_tree)
                    .service(update_tree)
                    .service(delete_tree)
                    .service(upload_trees)
                    .service(logout),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
