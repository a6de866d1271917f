use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::forms::stations::{AddStationForm, EditStationForm};
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::stations::{
    StationQuery, create_station, load_stations, modify_station, remove_station,
};

#[get("/stations")]
pub async fn show_stations(
    params: web::Query<StationQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_stations(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "stations",
                &server_config.auth_service_url,
            );
            context.insert("stations", &data.stations);
            context.insert("search", &data.search);
            render_template(&tera, "stations/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this page.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list stations: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/stations/add")]
pub async fn add_station(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<AddStationForm>,
) -> impl Responder {
    match create_station(repo.get_ref(), &user, form.into_inner()) {
        Ok(station) => {
            FlashMessage::success(format!("Station \"{}\" added.", station.name)).send();
            redirect("/stations")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this page.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/stations")
        }
        Err(ServiceError::Conflict) => {
            FlashMessage::error("A station with this name already exists.").send();
            redirect("/stations")
        }
        Err(err) => {
            log::error!("Failed to create station: {err}");
            FlashMessage::error("Could not add the station.").send();
            redirect("/stations")
        }
    }
}

#[post("/stations/edit")]
pub async fn edit_station(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<EditStationForm>,
) -> impl Responder {
    match modify_station(repo.get_ref(), &user, form.into_inner()) {
        Ok(station) => {
            FlashMessage::success(format!("Station \"{}\" updated.", station.name)).send();
            redirect("/stations")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this page.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/stations")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Station not found.").send();
            redirect("/stations")
        }
        Err(ServiceError::Conflict) => {
            FlashMessage::error("A station with this name already exists.").send();
            redirect("/stations")
        }
        Err(err) => {
            log::error!("Failed to update station: {err}");
            FlashMessage::error("Could not update the station.").send();
            redirect("/stations")
        }
    }
}

#[post("/stations/{station_id}/delete")]
pub async fn delete_station(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let station_id = path.into_inner();

    match remove_station(repo.get_ref(), &user, station_id) {
        Ok(()) => {
            FlashMessage::success("Station deleted.").send();
            redirect("/stations")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this page.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Station not found or already deleted.").send();
            redirect("/stations")
        }
        Err(err) => {
            log::error!("Failed to delete station {station_id}: {err}");
            FlashMessage::error(
                "Could not delete the station. Remove its reports and tanks first.",
            )
            .send();
            redirect("/stations")
        }
    }
}
