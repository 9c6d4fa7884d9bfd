use actix_web::{HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::Local;
use tera::Tera;
use uuid::Uuid;

use crate::domain::inspection::InspectionStatus;
use crate::domain::types::InspectionId;
use crate::dto::inspections::InspectionsQuery;
use crate::forms::inspections::UpdateInspectionForm;
use crate::models::auth::AuthenticatedAdmin;
use crate::repository::BackendRepository;
use crate::routes::{base_context, parse_query, redirect, render_fetch_error, render_template};
use crate::services::{ServiceError, inspections as inspections_service};

#[get("/inspections")]
pub async fn show_inspections(
    req: HttpRequest,
    admin: AuthenticatedAdmin,
    repo: web::Data<BackendRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let query: InspectionsQuery = parse_query(&req);
    let today = Local::now().date_naive();
    match inspections_service::load_inspections_page(repo.get_ref(), query, today).await {
        Ok(data) => {
            let statuses: Vec<&str> = InspectionStatus::ALL.iter().map(|s| s.as_str()).collect();
            let mut context = base_context(&flash_messages, Some(&admin), "inspections");
            context.insert("inspections", &data.inspections);
            context.insert("stats", &data.stats);
            context.insert("search_query", &data.search_query);
            context.insert("statuses", &statuses);
            context.insert("selected_statuses", &data.selected_statuses);
            context.insert("selected_areas", &data.selected_areas);
            context.insert("selected_volunteers", &data.selected_volunteers);
            context.insert("area_options", &data.area_options);
            context.insert("volunteer_options", &data.volunteer_options);
            render_template(&tera, "inspections/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to list inspections: {err}");
            render_fetch_error(&tera, &admin, "inspections", "Failed to fetch inspections")
        }
    }
}

#[get("/inspections/{inspection_id}")]
pub async fn show_inspection(
    inspection_id: web::Path<Uuid>,
    admin: AuthenticatedAdmin,
    repo: web::Data<BackendRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let id = InspectionId::new(inspection_id.into_inner());
    let today = Local::now().date_naive();
    match inspections_service::load_inspection(repo.get_ref(), id, today).await {
        Ok(inspection) => {
            let statuses: Vec<&str> = InspectionStatus::ALL.iter().map(|s| s.as_str()).collect();
            let mut context = base_context(&flash_messages, Some(&admin), "inspections");
            context.insert("inspection", &inspection);
            context.insert("statuses", &statuses);
            render_template(&tera, "inspections/view.html", &context)
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Inspection not found").send();
            redirect("/inspections")
        }
        Err(err) => {
            log::error!("Failed to load inspection {id}: {err}");
            render_fetch_error(&tera, &admin, "inspections", "Failed to fetch inspections")
        }
    }
}

#[post("/inspections/{inspection_id}/update")]
pub async fn update_inspection(
    inspection_id: web::Path<Uuid>,
    _admin: AuthenticatedAdmin,
    repo: web::Data<BackendRepository>,
    web::Form(form): web::Form<UpdateInspectionForm>,
) -> impl Responder {
    let id = InspectionId::new(inspection_id.into_inner());
    match inspections_service::update_inspection(repo.get_ref(), id, form).await {
        Ok(_) => {
            FlashMessage::success("Inspection updated successfully").send();
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
        }
        Err(err) => {
            log::error!("Failed to update inspection {id}: {err}");
            FlashMessage::error("Failed to update inspection").send();
        }
    }
    redirect(&format!("/inspections/{id}"))
}

#[post("/inspections/{inspection_id}/accept")]
pub async fn accept_inspection(
    inspection_id: web::Path<Uuid>,
    _admin: AuthenticatedAdmin,
    repo: web::Data<BackendRepository>,
) -> impl Responder {
    let id = InspectionId::new(inspection_id.into_inner());
    match inspections_service::accept_inspection(repo.get_ref(), id).await {
        Ok(_) => {
            FlashMessage::success("Inspection accepted successfully").send();
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
        }
        Err(err) => {
            log::error!("Failed to accept inspection {id}: {err}");
            FlashMessage::error("Failed to accept inspection").send();
        }
    }
    redirect("/inspections")
}

#[post("/inspections/{inspection_id}/delete")]
pub async fn delete_inspection(
    inspection_id: web::Path<Uuid>,
    _admin: AuthenticatedAdmin,
    repo: web::Data<BackendRepository>,
) -> impl Responder {
    let id = InspectionId::new(inspection_id.into_inner());
    match inspections_service::delete_inspection(repo.get_ref(), id).await {
        Ok(()) => {
            FlashMessage::success("Inspection deleted successfully").send();
        }
        Err(err) => {
            log::error!("Failed to delete inspection {id}: {err}");
            FlashMessage::error("Failed to delete inspection").send();
        }
    }
    redirect("/inspections")
}
