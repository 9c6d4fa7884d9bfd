use actix_web::{HttpResponse, Responder, get, web};

use crate::dto::api::{ApiResponse, TreeTypeIdQuery};
use crate::models::auth::AuthenticatedAdmin;
use crate::repository::BackendRepository;
use crate::services::{ServiceError, api as api_service};

#[get("/v1/trees/types")]
pub async fn api_v1_tree_types(
    _admin: AuthenticatedAdmin,
    repo: web::Data<BackendRepository>,
) -> impl Responder {
    match api_service::list_tree_types(repo.get_ref()).await {
        Ok(types) => HttpResponse::Ok().json(ApiResponse::ok(types)),
        Err(err) => HttpResponse::BadGateway().json(ApiResponse::<()>::error(err.to_string())),
    }
}

#[get("/v1/trees/type-id")]
pub async fn api_v1_tree_type_id(
    _admin: AuthenticatedAdmin,
    repo: web::Data<BackendRepository>,
    query: web::Query<TreeTypeIdQuery>,
) -> impl Responder {
    match api_service::resolve_tree_type_id(repo.get_ref(), query.into_inner()).await {
        Ok(code) => HttpResponse::Ok().json(ApiResponse::ok(code)),
        Err(ServiceError::Form(message)) => {
            HttpResponse::BadRequest().json(ApiResponse::<()>::error(message))
        }
        Err(err) => {
            log::error!("Failed to resolve tree type id: {err}");
            HttpResponse::InternalServerError().json(ApiResponse::<()>::error(err.to_string()))
        }
    }
}

#[get("/v1/health")]
pub async fn api_v1_health(
    _admin: AuthenticatedAdmin,
    repo: web::Data<BackendRepository>,
) -> impl Responder {
    match api_service::health(repo.get_ref()).await {
        Ok(count) => HttpResponse::Ok().json(ApiResponse::ok(count)),
        Err(err) => {
            HttpResponse::ServiceUnavailable().json(ApiResponse::<()>::error(err.to_string()))
        }
    }
}
