use actix_multipart::form::MultipartForm;
use actix_web::{HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::dto::master::MasterQuery;
use crate::forms::master::{AddTreeForm, DeleteTreeForm, UpdateTreeForm, UploadTreesForm};
use crate::models::auth::AuthenticatedAdmin;
use crate::repository::BackendRepository;
use crate::routes::{base_context, parse_query, redirect, render_fetch_error, render_template};
use crate::services::{ServiceError, master as master_service};

#[get("/master")]
pub async fn show_master(
    req: HttpRequest,
    admin: AuthenticatedAdmin,
    repo: web::Data<BackendRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let query: MasterQuery = parse_query(&req);
    match master_service::load_master_page(repo.get_ref(), query).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, Some(&admin), "master");
            context.insert("summaries", &data.summaries);
            context.insert("search_query", &data.search_query);
            context.insert("filter", &data.filter);
            context.insert("options", &data.options);
            render_template(&tera, "master.html", &context)
        }
        Err(err) => {
            log::error!("Failed to load the master catalog: {err}");
            render_fetch_error(&tera, &admin, "master", "Failed to fetch tree data")
        }
    }
}

#[post("/master/add")]
pub async fn add_tree(
    _admin: AuthenticatedAdmin,
    repo: web::Data<BackendRepository>,
    web::Form(form): web::Form<AddTreeForm>,
) -> impl Responder {
    match master_service::add_tree(repo.get_ref(), form).await {
        Ok(name) => {
            FlashMessage::success(format!("Added new tree: {name}")).send();
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
        }
        Err(err) => {
            log::error!("Failed to add tree: {err}");
            FlashMessage::error("Failed to add tree").send();
        }
    }
    redirect("/master")
}

#[post("/master/update")]
pub async fn update_tree(
    _admin: AuthenticatedAdmin,
    repo: web::Data<BackendRepository>,
    web::Form(form): web::Form<UpdateTreeForm>,
) -> impl Responder {
    match master_service::update_tree_type(repo.get_ref(), form).await {
        Ok(name) => {
            FlashMessage::success(format!("Updated {name} trees")).send();
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
        }
        Err(err) => {
            log::error!("Failed to update trees: {err}");
            FlashMessage::error("Failed to update trees").send();
        }
    }
    redirect("/master")
}

#[post("/master/delete")]
pub async fn delete_tree(
    _admin: AuthenticatedAdmin,
    repo: web::Data<BackendRepository>,
    web::Form(form): web::Form<DeleteTreeForm>,
) -> impl Responder {
    match master_service::delete_tree_type(repo.get_ref(), form).await {
        Ok(name) => {
            FlashMessage::success(format!("Deleted all {name} trees")).send();
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
        }
        Err(err) => {
            log::error!("Failed to delete trees: {err}");
            FlashMessage::error("Failed to delete trees").send();
        }
    }
    redirect("/master")
}

#[post("/master/upload")]
pub async fn upload_trees(
    _admin: AuthenticatedAdmin,
    repo: web::Data<BackendRepository>,
    MultipartForm(form): MultipartForm<UploadTreesForm>,
) -> impl Responder {
    match master_service::upload_trees(repo.get_ref(), &form).await {
        Ok(count) => {
            FlashMessage::success(format!("Imported {count} trees")).send();
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
        }
        Err(err) => {
            log::error!("Failed to import trees: {err}");
            FlashMessage::error("Failed to import trees").send();
        }
    }
    redirect("/master")
}
