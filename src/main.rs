use std::env;

use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use dotenvy::dotenv;
use pushkind_common::db::establish_connection_pool;
use pushkind_common::middleware::RedirectUnauthorized;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{logout, not_assigned};
use tera::Tera;

use pushkind_stations::config::StationsConfig;
use pushkind_stations::repository::DieselRepository;
use pushkind_stations::routes::api::{
    api_v1_dashboard, api_v1_delivery_reconciliation, api_v1_my_permissions,
    api_v1_permission_registry,
};
use pushkind_stations::routes::audit::show_audit_log;
use pushkind_stations::routes::deliveries::{
    add_delivery, delete_delivery, show_deliveries, show_delivery,
};
use pushkind_stations::routes::employees::{
    add_employee, delete_employee, edit_employee, show_employees,
};
use pushkind_stations::routes::inventory::{
    add_inventory_reading, delete_inventory_tank, save_inventory_tank, show_inventory,
};
use pushkind_stations::routes::licenses::{
    add_license, delete_license, download_license_document, edit_license, show_licenses,
    upload_license_document,
};
use pushkind_stations::routes::main::show_index;
use pushkind_stations::routes::payroll::{
    add_payroll_record, delete_payroll_record, show_payroll,
};
use pushkind_stations::routes::permissions::{
    apply_permission_template, bulk_update_permissions, reset_user_permissions,
    save_user_permissions, show_permissions,
};
use pushkind_stations::routes::sales::{
    add_sales_report, delete_sales_report, edit_sales_report, export_sales, show_sales,
    upload_sales_reports,
};
use pushkind_stations::routes::sms::{
    save_sms_settings, send_sms_alerts, send_test_sms, show_sms, show_sms_balance,
};
use pushkind_stations::routes::stations::{
    add_station, delete_station, edit_station, show_stations,
};
use pushkind_stations::routes::users::{add_user, delete_user, edit_user, show_users};
use pushkind_stations::storage::DocumentStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let database_url = env::var("DATABASE_URL").unwrap_or("app.db".to_string());
    let port = env::var("PORT").unwrap_or("8080".to_string());
    let port = port.parse::<u16>().unwrap_or(8080);
    let address = env::var("ADDRESS").unwrap_or("127.0.0.1".to_string());

    let secret = env::var("SECRET_KEY");
    let secret_key = match &secret {
        Ok(key) => Key::from(key.as_bytes()),
        Err(_) => Key::generate(),
    };

    let auth_service_url = env::var("AUTH_SERVICE_URL");
    let auth_service_url = match auth_service_url {
        Ok(auth_service_url) => auth_service_url,
        Err(_) => {
            log::error!("AUTH_SERVICE_URL environment variable not set");
            std::process::exit(1);
        }
    };

    let common_config = CommonServerConfig {
        secret: secret.unwrap_or_default(),
        auth_service_url,
    };
    let stations_config = StationsConfig::from_env();

    let domain = env::var("DOMAIN").unwrap_or("localhost".to_string());

    let pool = match establish_connection_pool(&database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    if let Err(e) = std::fs::create_dir_all(&stations_config.upload_dir) {
        log::error!(
            "Failed to create upload directory {}: {e}",
            stations_config.upload_dir.display()
        );
        std::process::exit(1);
    }
    let document_store = DocumentStore::new(stations_config.upload_dir.clone());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = match Tera::new("templates/**/*") {
        Ok(t) => t,
        Err(e) => {
            log::error!("Parsing error(s): {e}");
            std::process::exit(1);
        }
    };

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{domain}")))
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(not_assigned)
            .service(api_v1_dashboard)
            .service(api_v1_my_permissions)
            .service(api_v1_permission_registry)
            .service(api_v1_delivery_reconciliation)
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .service(show_index)
                    .service(show_stations)
                    .service(add_station)
                    .service(edit_station)
                    .service(delete_station)
                    .service(show_users)
                    .service(add_user)
                    .service(edit_user)
                    .service(delete_user)
                    .service(show_employees)
                    .service(add_employee)
                    .service(edit_employee)
                    .service(delete_employee)
                    .service(show_payroll)
                    .service(add_payroll_record)
                    .service(delete_payroll_record)
                    .service(show_sales)
                    .service(export_sales)
                    .service(upload_sales_reports)
                    .service(add_sales_report)
                    .service(edit_sales_report)
                    .service(delete_sales_report)
                    .service(show_inventory)
                    .service(save_inventory_tank)
                    .service(add_inventory_reading)
                    .service(delete_inventory_tank)
                    .service(show_deliveries)
                    .service(add_delivery)
                    .service(show_delivery)
                    .service(delete_delivery)
                    .service(show_licenses)
                    .service(add_license)
                    .service(edit_license)
                    .service(upload_license_document)
                    .service(download_license_document)
                    .service(delete_license)
                    .service(show_sms)
                    .service(save_sms_settings)
                    .service(send_test_sms)
                    .service(show_sms_balance)
                    .service(send_sms_alerts)
                    .service(show_permissions)
                    .service(save_user_permissions)
                    .service(apply_permission_template)
                    .service(bulk_update_permissions)
                    .service(reset_user_permissions)
                    .service(show_audit_log)
                    .service(logout),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(common_config.clone()))
            .app_data(web::Data::new(stations_config.clone()))
            .app_data(web::Data::new(document_store.clone()))
    })
    .bind((address, port))?
    .run()
    .await
}
