use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::forms::payroll::AddPayrollRecordForm;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::payroll::{
    PayrollQuery, create_payroll_record, load_payroll, remove_payroll_record,
};

#[get("/payroll")]
pub async fn show_payroll(
    params: web::Query<PayrollQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_payroll(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "payroll",
                &server_config.auth_service_url,
            );
            context.insert("records", &data.records);
            context.insert("employees", &data.employees);
            context.insert("employee_id", &data.employee_id);
            render_template(&tera, "payroll/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this page.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list payroll records: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/payroll/add")]
pub async fn add_payroll_record(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<AddPayrollRecordForm>,
) -> impl Responder {
    match create_payroll_record(repo.get_ref(), &user, form.into_inner()) {
        Ok(_) => {
            FlashMessage::success("Pay period recorded.").send();
            redirect("/payroll")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this page.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/payroll")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Employee not found.").send();
            redirect("/payroll")
        }
        Err(err) => {
            log::error!("Failed to create payroll record: {err}");
            FlashMessage::error("Could not record the pay period.").send();
            redirect("/payroll")
        }
    }
}

#[post("/payroll/{record_id}/delete")]
pub async fn delete_payroll_record(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let record_id = path.into_inner();

    match remove_payroll_record(repo.get_ref(), &user, record_id) {
        Ok(()) => {
            FlashMessage::success("Payroll record deleted.").send();
            redirect("/payroll")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this page.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Payroll record not found or already deleted.").send();
            redirect("/payroll")
        }
        Err(err) => {
            log::error!("Failed to delete payroll record {record_id}: {err}");
            FlashMessage::error("Could not delete the payroll record.").send();
            redirect("/payroll")
        }
    }
}
