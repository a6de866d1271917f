use actix_files::NamedFile;
use actix_multipart::form::MultipartForm;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::Local;
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::config::StationsConfig;
use crate::forms::licenses::{AddLicenseForm, EditLicenseForm, UploadLicenseDocumentForm};
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::licenses::{
    LicenseDocumentError, LicenseQuery, attach_document, create_license, document_path,
    load_licenses, modify_license, remove_license,
};
use crate::storage::{DocumentStore, StorageError};

#[get("/licenses")]
pub async fn show_licenses(
    params: web::Query<LicenseQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    settings: web::Data<StationsConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let today = Local::now().date_naive();

    match load_licenses(
        repo.get_ref(),
        &user,
        params.into_inner(),
        today,
        settings.license_warning_days,
    ) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "licenses",
                &server_config.auth_service_url,
            );
            context.insert("licenses", &data.licenses);
            context.insert("stations", &data.stations);
            context.insert("station_id", &data.station_id);
            context.insert("expiring_only", &data.expiring_only);
            context.insert("expiring_count", &data.expiring_count);
            context.insert("expired_count", &data.expired_count);
            context.insert("warning_days", &settings.license_warning_days);
            render_template(&tera, "licenses/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this page.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list licenses: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/licenses/add")]
pub async fn add_license(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<AddLicenseForm>,
) -> impl Responder {
    match create_license(repo.get_ref(), &user, form.into_inner()) {
        Ok(license) => {
            FlashMessage::success(format!("License \"{}\" added.", license.name)).send();
            redirect("/licenses")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this page.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/licenses")
        }
        Err(err) => {
            log::error!("Failed to create license: {err}");
            FlashMessage::error("Could not add the license.").send();
            redirect("/licenses")
        }
    }
}

#[post("/licenses/edit")]
pub async fn edit_license(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<EditLicenseForm>,
) -> impl Responder {
    match modify_license(repo.get_ref(), &user, form.into_inner()) {
        Ok(license) => {
            FlashMessage::success(format!("License \"{}\" updated.", license.name)).send();
            redirect("/licenses")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this page.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/licenses")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("License not found.").send();
            redirect("/licenses")
        }
        Err(err) => {
            log::error!("Failed to update license: {err}");
            FlashMessage::error("Could not update the license.").send();
            redirect("/licenses")
        }
    }
}

#[post("/licenses/upload")]
pub async fn upload_license_document(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    store: web::Data<DocumentStore>,
    MultipartForm(mut form): MultipartForm<UploadLicenseDocumentForm>,
) -> impl Responder {
    match attach_document(repo.get_ref(), &user, store.get_ref(), &mut form) {
        Ok(license) => {
            FlashMessage::success(format!("Document attached to \"{}\".", license.name)).send();
            redirect("/licenses")
        }
        Err(LicenseDocumentError::Service(ServiceError::Unauthorized)) => {
            FlashMessage::error("You do not have access to this page.").send();
            redirect("/na")
        }
        Err(LicenseDocumentError::Service(ServiceError::NotFound)) => {
            FlashMessage::error("License not found.").send();
            redirect("/licenses")
        }
        Err(LicenseDocumentError::Storage(
            err @ (StorageError::UnsupportedType(_) | StorageError::Empty),
        )) => {
            FlashMessage::error(err.to_string()).send();
            redirect("/licenses")
        }
        Err(err) => {
            log::error!("Failed to attach license document: {err}");
            FlashMessage::error("Could not store the document.").send();
            redirect("/licenses")
        }
    }
}

#[get("/licenses/{license_id}/document")]
pub async fn download_license_document(
    req: HttpRequest,
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    store: web::Data<DocumentStore>,
) -> impl Responder {
    let license_id = path.into_inner();

    let file_path = match document_path(repo.get_ref(), &user, store.get_ref(), license_id) {
        Ok(file_path) => file_path,
        Err(LicenseDocumentError::Service(ServiceError::Unauthorized)) => {
            FlashMessage::error("You do not have access to this page.").send();
            return redirect("/na");
        }
        Err(LicenseDocumentError::Service(ServiceError::NotFound) | LicenseDocumentError::Missing) => {
            FlashMessage::error("This license has no document.").send();
            return redirect("/licenses");
        }
        Err(err) => {
            log::error!("Failed to locate document of license {license_id}: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    match NamedFile::open_async(&file_path).await {
        Ok(file) => file.into_response(&req),
        Err(err) => {
            log::error!("Failed to open {}: {err}", file_path.display());
            FlashMessage::error("The document file is missing.").send();
            redirect("/licenses")
        }
    }
}

#[post("/licenses/{license_id}/delete")]
pub async fn delete_license(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    store: web::Data<DocumentStore>,
) -> impl Responder {
    let license_id = path.into_inner();

    match remove_license(repo.get_ref(), &user, store.get_ref(), license_id) {
        Ok(()) => {
            FlashMessage::success("License deleted.").send();
            redirect("/licenses")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this page.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("License not found or already deleted.").send();
            redirect("/licenses")
        }
        Err(err) => {
            log::error!("Failed to delete license {license_id}: {err}");
            FlashMessage::error("Could not delete the license.").send();
            redirect("/licenses")
        }
    }
}
