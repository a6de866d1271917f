use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::forms::inventory::{RecordReadingForm, SaveTankForm};
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::inventory::{
    InventoryQuery, load_inventory, record_reading, remove_tank, save_tank,
};

#[get("/inventory")]
pub async fn show_inventory(
    params: web::Query<InventoryQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_inventory(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "inventory",
                &server_config.auth_service_url,
            );
            context.insert("tanks", &data.tanks);
            context.insert("stations", &data.stations);
            context.insert("station_id", &data.station_id);
            context.insert("grades", &data.grades);
            context.insert("low_count", &data.low_count);
            render_template(&tera, "inventory/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this page.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list inventory: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/inventory/tank")]
pub async fn save_inventory_tank(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<SaveTankForm>,
) -> impl Responder {
    match save_tank(repo.get_ref(), &user, form.into_inner()) {
        Ok(tank) => {
            FlashMessage::success(format!("{} tank saved.", tank.grade.label())).send();
            redirect("/inventory")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this page.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/inventory")
        }
        Err(err) => {
            log::error!("Failed to save tank: {err}");
            FlashMessage::error("Could not save the tank.").send();
            redirect("/inventory")
        }
    }
}

#[post("/inventory/reading")]
pub async fn add_inventory_reading(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<RecordReadingForm>,
) -> impl Responder {
    match record_reading(repo.get_ref(), &user, form.into_inner()) {
        Ok(tank) if tank.is_low() => {
            FlashMessage::warning(format!(
                "Reading saved. The {} tank is below its low level.",
                tank.grade.label()
            ))
            .send();
            redirect("/inventory")
        }
        Ok(_) => {
            FlashMessage::success("Reading saved.").send();
            redirect("/inventory")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this page.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/inventory")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Tank not found.").send();
            redirect("/inventory")
        }
        Err(err) => {
            log::error!("Failed to record reading: {err}");
            FlashMessage::error("Could not save the reading.").send();
            redirect("/inventory")
        }
    }
}

#[post("/inventory/{inventory_id}/delete")]
pub async fn delete_inventory_tank(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let inventory_id = path.into_inner();

    match remove_tank(repo.get_ref(), &user, inventory_id) {
        Ok(()) => {
            FlashMessage::success("Tank removed.").send();
            redirect("/inventory")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this page.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Tank not found or already removed.").send();
            redirect("/inventory")
        }
        Err(err) => {
            log::error!("Failed to delete tank {inventory_id}: {err}");
            FlashMessage::error("Could not remove the tank.").send();
            redirect("/inventory")
        }
    }
}
