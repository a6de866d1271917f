use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::forms::users::{AddUserForm, EditUserForm};
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::users::{UserQuery, create_user, load_users, modify_user, remove_user};

#[get("/users")]
pub async fn show_users(
    params: web::Query<UserQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_users(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context =
                base_context(&flash_messages, &user, "users", &server_config.auth_service_url);
            context.insert("users", &data.users);
            context.insert("search", &data.search);
            context.insert("stations", &data.stations);
            context.insert("roles", &data.roles);
            render_template(&tera, "users/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this page.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list users: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/users/add")]
pub async fn add_user(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<AddUserForm>,
) -> impl Responder {
    match create_user(repo.get_ref(), &user, form.into_inner()) {
        Ok(created) => {
            FlashMessage::success(format!("Profile for {} added.", created.email)).send();
            redirect("/users")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this page.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/users")
        }
        Err(ServiceError::Conflict) => {
            FlashMessage::error("A profile with this email already exists.").send();
            redirect("/users")
        }
        Err(err) => {
            log::error!("Failed to create user: {err}");
            FlashMessage::error("Could not add the profile.").send();
            redirect("/users")
        }
    }
}

#[post("/users/edit")]
pub async fn edit_user(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<EditUserForm>,
) -> impl Responder {
    match modify_user(repo.get_ref(), &user, form.into_inner()) {
        Ok(updated) => {
            FlashMessage::success(format!("Profile for {} updated.", updated.email)).send();
            redirect("/users")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this page.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/users")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Profile not found.").send();
            redirect("/users")
        }
        Err(err) => {
            log::error!("Failed to update user: {err}");
            FlashMessage::error("Could not update the profile.").send();
            redirect("/users")
        }
    }
}

#[post("/users/{user_id}/delete")]
pub async fn delete_user(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let user_id = path.into_inner();

    match remove_user(repo.get_ref(), &user, user_id) {
        Ok(()) => {
            FlashMessage::success("Profile deleted.").send();
            redirect("/users")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this page.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/users")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Profile not found or already deleted.").send();
            redirect("/users")
        }
        Err(err) => {
            log::error!("Failed to delete user {user_id}: {err}");
            FlashMessage::error("Could not delete the profile.").send();
            redirect("/users")
        }
    }
}
