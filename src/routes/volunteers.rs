use std::path::Path;

use actix_multipart::form::MultipartForm;
use actix_web::{HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;
use uuid::Uuid;

use crate::domain::types::VolunteerId;
use crate::dto::volunteers::VolunteersQuery;
use crate::forms::inspections::AssignInspectionForm;
use crate::forms::volunteers::VolunteerForm;
use crate::models::auth::AuthenticatedAdmin;
use crate::models::config::ServerConfig;
use crate::repository::BackendRepository;
use crate::routes::{base_context, parse_query, redirect, render_fetch_error, render_template};
use crate::services::{
    ServiceError, inspections as inspections_service, volunteers as volunteers_service,
};

#[get("/volunteers")]
pub async fn show_volunteers(
    req: HttpRequest,
    admin: AuthenticatedAdmin,
    repo: web::Data<BackendRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let query: VolunteersQuery = parse_query(&req);
    match volunteers_service::load_volunteers_page(repo.get_ref(), query).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, Some(&admin), "volunteers");
            context.insert("volunteers", &data.volunteers);
            context.insert("search_query", &data.search_query);
            context.insert("selected_types", &data.selected_types);
            context.insert("selected_locations", &data.selected_locations);
            context.insert("location_options", &data.location_options);
            render_template(&tera, "volunteers/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to list volunteers: {err}");
            render_fetch_error(&tera, &admin, "volunteers", "Failed to fetch volunteers")
        }
    }
}

#[post("/volunteers/add")]
pub async fn add_volunteer(
    _admin: AuthenticatedAdmin,
    repo: web::Data<BackendRepository>,
    server_config: web::Data<ServerConfig>,
    MultipartForm(form): MultipartForm<VolunteerForm>,
) -> impl Responder {
    let upload_dir = Path::new(&server_config.upload_dir);
    match volunteers_service::create_volunteer(repo.get_ref(), form, upload_dir).await {
        Ok(_) => {
            FlashMessage::success("Volunteer created successfully!").send();
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
        }
        Err(err) => {
            log::error!("Failed to create volunteer: {err}");
            FlashMessage::error("Failed to create volunteer. Please try again.").send();
        }
    }
    redirect("/volunteers")
}

#[get("/volunteers/{volunteer_id}")]
pub async fn show_volunteer(
    volunteer_id: web::Path<Uuid>,
    admin: AuthenticatedAdmin,
    repo: web::Data<BackendRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let id = VolunteerId::new(volunteer_id.into_inner());
    match volunteers_service::load_volunteer(repo.get_ref(), id).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, Some(&admin), "volunteers");
            context.insert("volunteer", &data.volunteer);
            context.insert("species_options", &data.species_options);
            context.insert("cycles", &data.cycles);
            render_template(&tera, "volunteers/view.html", &context)
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Volunteer not found").send();
            redirect("/volunteers")
        }
        Err(err) => {
            log::error!("Failed to load volunteer {id}: {err}");
            render_fetch_error(&tera, &admin, "volunteers", "Failed to fetch volunteers")
        }
    }
}

#[post("/volunteers/{volunteer_id}/save")]
pub async fn save_volunteer(
    volunteer_id: web::Path<Uuid>,
    _admin: AuthenticatedAdmin,
    repo: web::Data<BackendRepository>,
    server_config: web::Data<ServerConfig>,
    MultipartForm(form): MultipartForm<VolunteerForm>,
) -> impl Responder {
    let id = VolunteerId::new(volunteer_id.into_inner());
    let upload_dir = Path::new(&server_config.upload_dir);
    match volunteers_service::update_volunteer(repo.get_ref(), id, form, upload_dir).await {
        Ok(_) => {
            FlashMessage::success("Volunteer updated successfully!").send();
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
        }
        Err(err) => {
            log::error!("Failed to update volunteer {id}: {err}");
            FlashMessage::error("Failed to update volunteer. Please try again.").send();
        }
    }
    redirect(&format!("/volunteers/{id}"))
}

#[post("/volunteers/{volunteer_id}/delete")]
pub async fn delete_volunteer(
    volunteer_id: web::Path<Uuid>,
    _admin: AuthenticatedAdmin,
    repo: web::Data<BackendRepository>,
) -> impl Responder {
    let id = VolunteerId::new(volunteer_id.into_inner());
    match volunteers_service::delete_volunteer(repo.get_ref(), id).await {
        Ok(()) => {
            FlashMessage::success("Volunteer deleted successfully").send();
        }
        Err(err) => {
            log::error!("Failed to delete volunteer {id}: {err}");
            FlashMessage::error("Failed to delete volunteer").send();
        }
    }
    redirect("/volunteers")
}

#[post("/volunteers/{volunteer_id}/assign")]
pub async fn assign_inspection(
    volunteer_id: web::Path<Uuid>,
    admin: AuthenticatedAdmin,
    repo: web::Data<BackendRepository>,
    body: web::Bytes,
) -> impl Responder {
    let id = VolunteerId::new(volunteer_id.into_inner());
    let back = format!("/volunteers/{id}");

    let form = match AssignInspectionForm::from_bytes(&body) {
        Ok(form) => form,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect(&back);
        }
    };

    match inspections_service::assign_inspection(repo.get_ref(), id, form, &admin).await {
        Ok(name) => {
            FlashMessage::success(format!("Inspection assigned to {name} successfully!")).send();
            redirect("/inspections")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&back)
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Volunteer not found").send();
            redirect("/volunteers")
        }
        Err(err) => {
            log::error!("Failed to assign inspection to {id}: {err}");
            FlashMessage::error("Failed to assign inspection. Please try again.").send();
            redirect(&back)
        }
    }
}
