use std::fmt;

use chrono::NaiveDateTime;
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Length of a Twilio account SID (`AC` followed by 32 hex characters).
pub const TWILIO_SID_LEN: usize = 34;
/// Length of a Twilio auth token.
pub const TWILIO_TOKEN_LEN: usize = 32;
/// Minimum length of a ClickSend API key.
pub const CLICKSEND_KEY_MIN_LEN: usize = 20;

/// Supported SMS providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmsProvider {
    Twilio,
    ClickSend,
}

impl SmsProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            SmsProvider::Twilio => "twilio",
            SmsProvider::ClickSend => "clicksend",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "twilio" => Some(SmsProvider::Twilio),
            "clicksend" => Some(SmsProvider::ClickSend),
            _ => None,
        }
    }
}

impl fmt::Display for SmsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SmsProvider::Twilio => f.write_str("Twilio"),
            SmsProvider::ClickSend => f.write_str("ClickSend"),
        }
    }
}

/// Problems detected in provider credentials or phone numbers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Twilio account SID must start with `AC` and be {TWILIO_SID_LEN} characters long")]
    InvalidTwilioSid,
    #[error("Twilio auth token must be {TWILIO_TOKEN_LEN} characters long")]
    InvalidTwilioToken,
    #[error("ClickSend username cannot be empty")]
    MissingClickSendUsername,
    #[error("ClickSend API key must be at least {CLICKSEND_KEY_MIN_LEN} characters long")]
    InvalidClickSendKey,
    #[error("`{0}` is not a phone number in international format (+15551234567)")]
    InvalidPhone(String),
    #[error("at least one alert recipient is required")]
    NoRecipients,
}

/// Check the shape of provider credentials before they are stored or used.
pub fn validate_credentials(
    provider: SmsProvider,
    account_id: &str,
    auth_token: &str,
) -> Result<(), CredentialError> {
    match provider {
        SmsProvider::Twilio => {
            if !account_id.starts_with("AC") || account_id.len() != TWILIO_SID_LEN {
                return Err(CredentialError::InvalidTwilioSid);
            }
            if auth_token.len() != TWILIO_TOKEN_LEN {
                return Err(CredentialError::InvalidTwilioToken);
            }
        }
        SmsProvider::ClickSend => {
            if account_id.trim().is_empty() {
                return Err(CredentialError::MissingClickSendUsername);
            }
            if auth_token.len() < CLICKSEND_KEY_MIN_LEN {
                return Err(CredentialError::InvalidClickSendKey);
            }
        }
    }
    Ok(())
}

/// Whether `phone` is an E.164 number: `+` followed by 8 to 15 digits.
pub fn is_e164(phone: &str) -> bool {
    let Some(digits) = phone.strip_prefix('+') else {
        return false;
    };
    (8..=15).contains(&digits.len())
        && digits.chars().all(|ch| ch.is_ascii_digit())
        && !digits.starts_with('0')
}

/// Normalize a typed phone number (spaces, dashes, parentheses) to E.164.
pub fn normalize_phone(input: &str) -> Result<String, CredentialError> {
    let compact: String = input
        .trim()
        .chars()
        .filter(|ch| !matches!(ch, ' ' | '-' | '(' | ')' | '.'))
        .collect();
    if is_e164(&compact) {
        Ok(compact)
    } else {
        Err(CredentialError::InvalidPhone(input.trim().to_string()))
    }
}

/// Split a comma/newline separated recipient list into normalized numbers.
pub fn parse_recipients(input: &str) -> Result<Vec<String>, CredentialError> {
    let recipients = input
        .split([',', '\n', ';'])
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(normalize_phone)
        .collect::<Result<Vec<_>, _>>()?;

    if recipients.is_empty() {
        return Err(CredentialError::NoRecipients);
    }
    Ok(recipients)
}

/// Provider configuration of a hub.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SmsConfig {
    pub id: i32,
    pub hub_id: i32,
    pub provider: SmsProvider,
    /// Twilio account SID or ClickSend username.
    pub account_id: String,
    /// Twilio auth token or ClickSend API key.
    #[serde(skip_serializing)]
    pub auth_token: String,
    /// Sender phone number or alphanumeric sender id.
    pub sender: String,
    /// Phone numbers receiving alerts.
    pub recipients: Vec<String>,
    pub is_enabled: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl SmsConfig {
    /// Auth token with everything but the last four characters hidden.
    pub fn masked_token(&self) -> String {
        let visible: String = self
            .auth_token
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("••••{visible}")
    }
}

/// Configuration saved (inserted or replaced) for a hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSmsConfig {
    pub hub_id: i32,
    pub provider: SmsProvider,
    pub account_id: String,
    pub auth_token: String,
    pub sender: String,
    pub recipients: Vec<String>,
    pub is_enabled: bool,
}

/// Outcome of a single send attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmsStatus {
    Sent,
    Failed,
}

impl SmsStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SmsStatus::Sent => "sent",
            SmsStatus::Failed => "failed",
        }
    }
}

impl From<&str> for SmsStatus {
    fn from(value: &str) -> Self {
        match value {
            "sent" => SmsStatus::Sent,
            _ => SmsStatus::Failed,
        }
    }
}

/// Logged SMS send attempt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SmsMessage {
    pub id: i32,
    pub hub_id: i32,
    pub recipient: String,
    pub body: String,
    pub status: SmsStatus,
    pub provider_message_id: Option<String>,
    pub error: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Log entry written after a send attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSmsMessage {
    pub hub_id: i32,
    pub recipient: String,
    pub body: String,
    pub status: SmsStatus,
    pub provider_message_id: Option<String>,
    pub error: Option<String>,
}

impl NewSmsMessage {
    pub fn sent(
        hub_id: i32,
        recipient: impl Into<String>,
        body: impl Into<String>,
        provider_message_id: Option<String>,
    ) -> Self {
        Self {
            hub_id,
            recipient: recipient.into(),
            body: body.into(),
            status: SmsStatus::Sent,
            provider_message_id,
            error: None,
        }
    }

    pub fn failed(
        hub_id: i32,
        recipient: impl Into<String>,
        body: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            hub_id,
            recipient: recipient.into(),
            body: body.into(),
            status: SmsStatus::Failed,
            provider_message_id: None,
            error: Some(error.into()),
        }
    }
}

/// Query definition used to list logged messages for a hub.
#[derive(Debug, Clone)]
pub struct SmsMessageListQuery {
    pub hub_id: i32,
    pub pagination: Option<Pagination>,
}

impl SmsMessageListQuery {
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            pagination: None,
        }
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
