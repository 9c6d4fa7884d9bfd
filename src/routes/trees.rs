use actix_web::{HttpRequest, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::dto::trees::TreesQuery;
use crate::models::auth::AuthenticatedAdmin;
use crate::repository::BackendRepository;
use crate::routes::{base_context, parse_query, render_fetch_error, render_template};
use crate::services::trees as trees_service;

#[get("/trees")]
pub async fn show_trees(
    req: HttpRequest,
    admin: AuthenticatedAdmin,
    repo: web::Data<BackendRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let query: TreesQuery = parse_query(&req);
    match trees_service::load_trees_page(repo.get_ref(), query).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, Some(&admin), "trees");
            context.insert("trees", &data.trees);
            context.insert("search_query", &data.search_query);
            context.insert("species_options", &data.species_options);
            context.insert("selected_species", &data.selected_species);
            render_template(&tera, "trees/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to list trees: {err}");
            render_fetch_error(&tera, &admin, "trees", "Failed to fetch tree data")
        }
    }
}
