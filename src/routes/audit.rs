use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::domain::permission::PAGE_REGISTRY;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::audit::{AuditQuery, load_audit_log};

#[get("/audit")]
pub async fn show_audit_log(
    params: web::Query<AuditQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_audit_log(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context =
                base_context(&flash_messages, &user, "audit", &server_config.auth_service_url);
            context.insert("entries", &data.entries);
            context.insert("entity", &data.entity);
            context.insert("entities", &PAGE_REGISTRY);
            render_template(&tera, "audit/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this page.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list audit entries: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
