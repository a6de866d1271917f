use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::Local;
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::config::StationsConfig;
use crate::domain::sms::SmsConfig;
use crate::forms::sms::{SaveSmsConfigForm, SendTestSmsForm};
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::alerts::run_alerts;
use crate::services::sms::{
    SmsQuery, SmsServiceError, check_balance, load_sms_page, save_sms_config, send_test_message,
};
use crate::sms::gateway_for;

/// Flash the failure of a provider call and go back to the SMS page.
fn sms_failure(err: SmsServiceError, action: &str) -> HttpResponse {
    match err {
        SmsServiceError::Service(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this page.").send();
            return redirect("/na");
        }
        SmsServiceError::Service(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
        }
        SmsServiceError::NotConfigured | SmsServiceError::Disabled => {
            FlashMessage::warning(err.to_string()).send();
        }
        SmsServiceError::Sms(err) => {
            log::warn!("SMS provider call failed ({action}): {err}");
            FlashMessage::error(format!("The SMS provider refused the request: {err}")).send();
        }
        SmsServiceError::Service(err) => {
            log::error!("Failed to {action}: {err}");
            FlashMessage::error("Something went wrong. Try again later.").send();
        }
    }
    redirect("/sms")
}

#[get("/sms")]
pub async fn show_sms(
    params: web::Query<SmsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_sms_page(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context =
                base_context(&flash_messages, &user, "sms", &server_config.auth_service_url);
            context.insert("config", &data.config);
            context.insert("messages", &data.messages);
            context.insert("providers", &data.providers);
            render_template(&tera, "sms/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this page.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to load SMS settings: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/sms/config")]
pub async fn save_sms_settings(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<SaveSmsConfigForm>,
) -> impl Responder {
    match save_sms_config(repo.get_ref(), &user, form.into_inner()) {
        Ok(config) if config.is_enabled => {
            FlashMessage::success("SMS settings saved. Alerts are enabled.").send();
            redirect("/sms")
        }
        Ok(_) => {
            FlashMessage::success("SMS settings saved. Alerts are disabled.").send();
            redirect("/sms")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this page.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/sms")
        }
        Err(err) => {
            log::error!("Failed to save SMS settings: {err}");
            FlashMessage::error("Could not save the SMS settings.").send();
            redirect("/sms")
        }
    }
}

#[post("/sms/test")]
pub async fn send_test_sms(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    settings: web::Data<StationsConfig>,
    form: web::Form<SendTestSmsForm>,
) -> impl Responder {
    let connect = |config: &SmsConfig| gateway_for(config, settings.get_ref());

    match send_test_message(repo.get_ref(), &user, form.into_inner(), connect).await {
        Ok(sent) => {
            FlashMessage::success(format!(
                "Test message sent (reference {}).",
                sent.provider_message_id
            ))
            .send();
            redirect("/sms")
        }
        Err(err) => sms_failure(err, "send a test SMS"),
    }
}

#[post("/sms/balance")]
pub async fn show_sms_balance(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    settings: web::Data<StationsConfig>,
) -> impl Responder {
    let connect = |config: &SmsConfig| gateway_for(config, settings.get_ref());

    match check_balance(repo.get_ref(), &user, connect).await {
        Ok(balance) => {
            FlashMessage::info(format!(
                "Account balance: {:.2} {}",
                balance.amount, balance.currency
            ))
            .send();
            redirect("/sms")
        }
        Err(err) => sms_failure(err, "check the SMS balance"),
    }
}

#[post("/sms/alerts")]
pub async fn send_sms_alerts(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    settings: web::Data<StationsConfig>,
) -> impl Responder {
    let today = Local::now().date_naive();
    let connect = |config: &SmsConfig| gateway_for(config, settings.get_ref());

    match run_alerts(
        repo.get_ref(),
        &user,
        today,
        settings.license_warning_days,
        connect,
    )
    .await
    {
        Ok(run) if run.alerts.is_empty() => {
            FlashMessage::info("Nothing to report: no alerts right now.").send();
            redirect("/sms")
        }
        Ok(run) if run.failed > 0 => {
            FlashMessage::warning(format!(
                "{} alerts: {} messages sent, {} failed. See the message log.",
                run.alerts.len(),
                run.sent,
                run.failed
            ))
            .send();
            redirect("/sms")
        }
        Ok(run) => {
            FlashMessage::success(format!(
                "{} alerts: {} messages sent.",
                run.alerts.len(),
                run.sent
            ))
            .send();
            redirect("/sms")
        }
        Err(err) => sms_failure(err, "send SMS alerts"),
    }
}
