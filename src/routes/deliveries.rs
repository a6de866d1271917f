use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::domain::fuel::FuelGrade;
use crate::forms::deliveries::AddDeliveryForm;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::deliveries::{
    DeliveryQuery, create_delivery, load_deliveries, load_delivery, remove_delivery,
};

#[get("/deliveries")]
pub async fn show_deliveries(
    params: web::Query<DeliveryQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_deliveries(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "deliveries",
                &server_config.auth_service_url,
            );
            context.insert("deliveries", &data.deliveries);
            context.insert("stations", &data.stations);
            context.insert("station_id", &data.station_id);
            context.insert("grades", &FuelGrade::ALL);
            render_template(&tera, "deliveries/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this page.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list deliveries: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/deliveries/{delivery_id}")]
pub async fn show_delivery(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let delivery_id = path.into_inner();

    match load_delivery(repo.get_ref(), &user, delivery_id) {
        Ok(delivery) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "deliveries",
                &server_config.auth_service_url,
            );
            context.insert("delivery", &delivery);
            render_template(&tera, "deliveries/show.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this page.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Delivery not found.").send();
            redirect("/deliveries")
        }
        Err(err) => {
            log::error!("Failed to load delivery {delivery_id}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/deliveries/add")]
pub async fn add_delivery(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<AddDeliveryForm>,
) -> impl Responder {
    match create_delivery(repo.get_ref(), &user, form.into_inner()) {
        Ok(view) if view.reconciliation.has_discrepancy => {
            FlashMessage::warning(
                "Delivery recorded. The tank readings do not match the delivered volume.",
            )
            .send();
            redirect(&format!("/deliveries/{}", view.delivery.id))
        }
        Ok(view) => {
            FlashMessage::success("Delivery recorded.").send();
            redirect(&format!("/deliveries/{}", view.delivery.id))
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this page.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/deliveries")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Station not found.").send();
            redirect("/deliveries")
        }
        Err(err) => {
            log::error!("Failed to create delivery: {err}");
            FlashMessage::error("Could not record the delivery.").send();
            redirect("/deliveries")
        }
    }
}

#[post("/deliveries/{delivery_id}/delete")]
pub async fn delete_delivery(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let delivery_id = path.into_inner();

    match remove_delivery(repo.get_ref(), &user, delivery_id) {
        Ok(()) => {
            FlashMessage::success("Delivery deleted.").send();
            redirect("/deliveries")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this page.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Delivery not found or already deleted.").send();
            redirect("/deliveries")
        }
        Err(err) => {
            log::error!("Failed to delete delivery {delivery_id}: {err}");
            FlashMessage::error("Could not delete the delivery.").send();
            redirect("/deliveries")
        }
    }
}
