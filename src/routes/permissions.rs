use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::domain::user::User;
use crate::forms::permissions::{ApplyTemplateForm, BulkGroupForm, SavePermissionsForm};
use crate::repository::DieselRepository;
use crate::services::permissions::{
    PermissionsQuery, apply_template, bulk_update_group, load_permission_editor,
    reset_permissions, save_permissions,
};
use crate::services::{ServiceError, ServiceResult};

fn editor_url(user_id: i32) -> String {
    format!("/permissions?user_id={user_id}")
}

/// Shared outcome handling of the editor's POST forms.
fn after_update(result: ServiceResult<User>, user_id: i32, success: &str) -> HttpResponse {
    match result {
        Ok(profile) => {
            FlashMessage::success(format!("{success} for {}.", profile.email)).send();
            redirect(&editor_url(user_id))
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this page.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&editor_url(user_id))
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Profile not found.").send();
            redirect("/permissions")
        }
        Err(err) => {
            log::error!("Failed to update permissions of user {user_id}: {err}");
            FlashMessage::error("Could not update the permissions.").send();
            redirect(&editor_url(user_id))
        }
    }
}

#[get("/permissions")]
pub async fn show_permissions(
    params: web::Query<PermissionsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_permission_editor(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "permissions",
                &server_config.auth_service_url,
            );
            context.insert("profiles", &data.profiles);
            context.insert("selected", &data.selected);
            context.insert("actions", &data.actions);
            context.insert("templates", &data.templates);
            render_template(&tera, "permissions/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this page.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Profile not found.").send();
            redirect("/permissions")
        }
        Err(err) => {
            log::error!("Failed to load permission editor: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// The checkbox matrix repeats the `grants` key, which `web::Form` cannot collect.
#[post("/permissions/save")]
pub async fn save_user_permissions(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let form: SavePermissionsForm = match serde_html_form::from_bytes(&body) {
        Ok(form) => form,
        Err(err) => {
            log::error!("Failed to parse permissions form: {err}");
            FlashMessage::error("The permissions form could not be read.").send();
            return redirect("/permissions");
        }
    };

    let user_id = form.user_id;
    after_update(
        save_permissions(repo.get_ref(), &user, form),
        user_id,
        "Permissions saved",
    )
}

#[post("/permissions/template")]
pub async fn apply_permission_template(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<ApplyTemplateForm>,
) -> impl Responder {
    let form = form.into_inner();
    let user_id = form.user_id;
    after_update(
        apply_template(repo.get_ref(), &user, form),
        user_id,
        "Template applied",
    )
}

#[post("/permissions/bulk")]
pub async fn bulk_update_permissions(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<BulkGroupForm>,
) -> impl Responder {
    let form = form.into_inner();
    let user_id = form.user_id;
    after_update(
        bulk_update_group(repo.get_ref(), &user, form),
        user_id,
        "Group permissions updated",
    )
}

#[post("/permissions/{user_id}/reset")]
pub async fn reset_user_permissions(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let user_id = path.into_inner();
    after_update(
        reset_permissions(repo.get_ref(), &user, user_id),
        user_id,
        "Permissions reset to the role template",
    )
}
