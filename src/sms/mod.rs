//! Clients of the SMS providers.
//!
//! Both providers sit behind [`SmsGateway`] so the services can be exercised
//! with a fake gateway and the clients can be pointed at a mock server.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::config::StationsConfig;
use crate::domain::sms::{SmsConfig, SmsProvider};

pub mod clicksend;
pub mod twilio;

pub use clicksend::ClickSendClient;
pub use twilio::TwilioClient;

/// Errors returned by the SMS provider clients.
#[derive(Debug, Error)]
pub enum SmsError {
    #[error("could not reach the SMS provider: {0}")]
    Http(#[from] reqwest::Error),
    #[error("SMS provider answered {status}: {message}")]
    Provider { status: u16, message: String },
    #[error("SMS provider rejected the message: {0}")]
    Rejected(String),
    #[error("unexpected SMS provider response: {0}")]
    InvalidResponse(String),
}

/// Provider reference of an accepted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub provider_message_id: String,
}

/// Remaining account credit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Balance {
    pub amount: f64,
    pub currency: String,
}

#[async_trait]
pub trait SmsGateway: Send + Sync {
    /// Send `body` to the E.164 number `to`.
    async fn send(&self, to: &str, body: &str) -> Result<SentMessage, SmsError>;

    async fn balance(&self) -> Result<Balance, SmsError>;
}

/// Build the client for the provider selected in `config`.
pub fn gateway_for(
    config: &SmsConfig,
    settings: &StationsConfig,
) -> Result<Box<dyn SmsGateway>, SmsError> {
    let http = reqwest::Client::builder()
        .timeout(settings.sms_timeout)
        .build()?;

    let gateway: Box<dyn SmsGateway> = match config.provider {
        SmsProvider::Twilio => Box::new(TwilioClient::new(
            http,
            &settings.twilio_api_url,
            &config.account_id,
            &config.auth_token,
            &config.sender,
        )),
        SmsProvider::ClickSend => Box::new(ClickSendClient::new(
            http,
            &settings.clicksend_api_url,
            &config.account_id,
            &config.auth_token,
            &config.sender,
        )),
    };

    Ok(gateway)
}

/// Parse amounts that providers return either as JSON strings or numbers.
pub(crate) fn parse_amount(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(number) => number.as_f64(),
        serde_json::Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
