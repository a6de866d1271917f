use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::forms::employees::{AddEmployeeForm, EditEmployeeForm};
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::employees::{
    EmployeeQuery, create_employee, load_employees, modify_employee, remove_employee,
};

#[get("/employees")]
pub async fn show_employees(
    params: web::Query<EmployeeQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_employees(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "employees",
                &server_config.auth_service_url,
            );
            context.insert("employees", &data.employees);
            context.insert("stations", &data.stations);
            context.insert("station_id", &data.station_id);
            context.insert("search", &data.search);
            render_template(&tera, "employees/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this page.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list employees: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/employees/add")]
pub async fn add_employee(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<AddEmployeeForm>,
) -> impl Responder {
    match create_employee(repo.get_ref(), &user, form.into_inner()) {
        Ok(employee) => {
            FlashMessage::success(format!("Employee {} added.", employee.full_name())).send();
            redirect("/employees")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this page.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/employees")
        }
        Err(err) => {
            log::error!("Failed to create employee: {err}");
            FlashMessage::error("Could not add the employee.").send();
            redirect("/employees")
        }
    }
}

#[post("/employees/edit")]
pub async fn edit_employee(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<EditEmployeeForm>,
) -> impl Responder {
    match modify_employee(repo.get_ref(), &user, form.into_inner()) {
        Ok(employee) => {
            FlashMessage::success(format!("Employee {} updated.", employee.full_name())).send();
            redirect("/employees")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this page.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/employees")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Employee not found.").send();
            redirect("/employees")
        }
        Err(err) => {
            log::error!("Failed to update employee: {err}");
            FlashMessage::error("Could not update the employee.").send();
            redirect("/employees")
        }
    }
}

#[post("/employees/{employee_id}/delete")]
pub async fn delete_employee(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let employee_id = path.into_inner();

    match remove_employee(repo.get_ref(), &user, employee_id) {
        Ok(()) => {
            FlashMessage::success("Employee deleted.").send();
            redirect("/employees")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this page.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Employee not found or already deleted.").send();
            redirect("/employees")
        }
        Err(err) => {
            log::error!("Failed to delete employee {employee_id}: {err}");
            FlashMessage::error("Could not delete the employee. Remove their payroll records first.")
                .send();
            redirect("/employees")
        }
    }
}
