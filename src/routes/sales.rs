use actix_multipart::form::MultipartForm;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::Local;
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::forms::sales::{
    AddSalesReportForm, EditSalesReportForm, SalesFilterQuery, UploadSalesReportsForm,
};
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::sales::{
    create_sales_report, export_sales_csv, import_sales_reports, load_sales,
    modify_sales_report, remove_sales_report,
};

#[get("/sales")]
pub async fn show_sales(
    params: web::Query<SalesFilterQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_sales(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context =
                base_context(&flash_messages, &user, "sales", &server_config.auth_service_url);
            context.insert("reports", &data.reports);
            context.insert("totals", &data.totals);
            context.insert("stations", &data.stations);
            context.insert("station_id", &data.station_id);
            context.insert("from", &data.from);
            context.insert("to", &data.to);
            render_template(&tera, "sales/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this page.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/sales")
        }
        Err(err) => {
            log::error!("Failed to list sales reports: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/sales/add")]
pub async fn add_sales_report(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<AddSalesReportForm>,
) -> impl Responder {
    match create_sales_report(repo.get_ref(), &user, form.into_inner()) {
        Ok(report) => {
            FlashMessage::success(format!("Report for {} added.", report.report_date)).send();
            redirect("/sales")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this page.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/sales")
        }
        Err(ServiceError::Conflict) => {
            FlashMessage::error("This station already has a report for that day.").send();
            redirect("/sales")
        }
        Err(err) => {
            log::error!("Failed to create sales report: {err}");
            FlashMessage::error("Could not add the report.").send();
            redirect("/sales")
        }
    }
}

#[post("/sales/edit")]
pub async fn edit_sales_report(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<EditSalesReportForm>,
) -> impl Responder {
    match modify_sales_report(repo.get_ref(), &user, form.into_inner()) {
        Ok(report) => {
            FlashMessage::success(format!("Report for {} updated.", report.report_date)).send();
            redirect("/sales")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this page.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/sales")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Report not found.").send();
            redirect("/sales")
        }
        Err(err) => {
            log::error!("Failed to update sales report: {err}");
            FlashMessage::error("Could not update the report.").send();
            redirect("/sales")
        }
    }
}

#[post("/sales/{report_id}/delete")]
pub async fn delete_sales_report(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let report_id = path.into_inner();

    match remove_sales_report(repo.get_ref(), &user, report_id) {
        Ok(()) => {
            FlashMessage::success("Report deleted.").send();
            redirect("/sales")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this page.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Report not found or already deleted.").send();
            redirect("/sales")
        }
        Err(err) => {
            log::error!("Failed to delete sales report {report_id}: {err}");
            FlashMessage::error("Could not delete the report.").send();
            redirect("/sales")
        }
    }
}

#[post("/sales/upload")]
pub async fn upload_sales_reports(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    MultipartForm(mut form): MultipartForm<UploadSalesReportsForm>,
) -> impl Responder {
    match import_sales_reports(repo.get_ref(), &user, &mut form) {
        Ok(imported) => {
            FlashMessage::success(format!("Imported {imported} reports.")).send();
            redirect("/sales")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this page.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/sales")
        }
        Err(ServiceError::Conflict) => {
            FlashMessage::error(
                "The file repeats a station and day that already has a report. Nothing was imported.",
            )
            .send();
            redirect("/sales")
        }
        Err(err) => {
            log::error!("Failed to import sales reports: {err}");
            FlashMessage::error("Could not import the file.").send();
            redirect("/sales")
        }
    }
}

#[get("/sales/export")]
pub async fn export_sales(
    params: web::Query<SalesFilterQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match export_sales_csv(repo.get_ref(), &user, params.into_inner()) {
        Ok(body) => {
            let file_name = format!("sales-{}.csv", Local::now().date_naive());
            HttpResponse::Ok()
                .content_type("text/csv; charset=utf-8")
                .insert_header(ContentDisposition {
                    disposition: DispositionType::Attachment,
                    parameters: vec![DispositionParam::Filename(file_name)],
                })
                .body(body)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this page.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/sales")
        }
        Err(err) => {
            log::error!("Failed to export sales reports: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
