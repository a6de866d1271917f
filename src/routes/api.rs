//! JSON endpoints. Users without access receive `401 Unauthorized`.

use actix_web::{HttpResponse, Responder, get, web};
use chrono::Local;
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::config::StationsConfig;
use crate::forms::sales::SalesFilterQuery;
use crate::repository::DieselRepository;
use crate::services::deliveries::load_reconciliation;
use crate::services::permissions::{my_permissions, permission_registry};
use crate::services::{ServiceError, main as main_service};

#[get("/api/v1/dashboard")]
/// Dashboard figures for the same filter as the index page.
pub async fn api_v1_dashboard(
    params: web::Query<SalesFilterQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    settings: web::Data<StationsConfig>,
) -> impl Responder {
    let today = Local::now().date_naive();

    match main_service::load_dashboard(
        repo.get_ref(),
        &user,
        params.into_inner(),
        today,
        settings.license_warning_days,
    ) {
        Ok(data) => HttpResponse::Ok().json(data),
        Err(ServiceError::Unauthorized) => HttpResponse::Unauthorized().finish(),
        Err(ServiceError::Form(message)) => HttpResponse::BadRequest().body(message),
        Err(err) => {
            log::error!("Failed to load dashboard: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/api/v1/permissions/me")]
/// Effective permission matrix of the signed-in user.
pub async fn api_v1_my_permissions(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match my_permissions(repo.get_ref(), &user) {
        Ok(matrix) => HttpResponse::Ok().json(matrix),
        Err(ServiceError::Unauthorized) => HttpResponse::Unauthorized().finish(),
        Err(err) => {
            log::error!("Failed to load permissions of {}: {err}", user.email);
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/api/v1/permissions/registry")]
pub async fn api_v1_permission_registry(_user: AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().json(permission_registry())
}

#[get("/api/v1/deliveries/{delivery_id}/reconciliation")]
pub async fn api_v1_delivery_reconciliation(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let delivery_id = path.into_inner();

    match load_reconciliation(repo.get_ref(), &user, delivery_id) {
        Ok(reconciliation) => HttpResponse::Ok().json(reconciliation),
        Err(ServiceError::Unauthorized) => HttpResponse::Unauthorized().finish(),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to reconcile delivery {delivery_id}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
