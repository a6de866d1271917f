use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::sms::{
    CredentialError, NewSmsConfig, SmsProvider, normalize_phone, parse_recipients,
    validate_credentials,
};

/// Maximum length of a test message body.
pub const TEST_MESSAGE_MAX_LEN: u64 = 320;

/// Result type returned by the SMS form helpers.
pub type SmsFormResult<T> = Result<T, SmsFormError>;

/// Errors that can occur while processing SMS forms.
#[derive(Debug, Error)]
pub enum SmsFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("unknown SMS provider `{0}`")]
    UnknownProvider(String),
    #[error("an auth token or API key is required")]
    MissingToken,
    #[error(transparent)]
    Credentials(#[from] CredentialError),
}

/// Payload of the SMS settings form.
#[derive(Debug, Deserialize, Validate)]
pub struct SaveSmsConfigForm {
    pub provider: String,
    #[validate(length(min = 1, max = 128))]
    pub account_id: String,
    /// Left blank to keep the stored token.
    pub auth_token: Option<String>,
    pub sender: String,
    /// Comma or newline separated phone numbers.
    pub recipients: String,
    #[serde(default)]
    pub is_enabled: bool,
}

impl SaveSmsConfigForm {
    /// Validate the settings; `stored_token` is reused when the token field is blank.
    pub fn into_new_sms_config(
        self,
        hub_id: i32,
        stored_token: Option<&str>,
    ) -> SmsFormResult<NewSmsConfig> {
        self.validate()?;

        let provider = SmsProvider::parse(&self.provider)
            .ok_or_else(|| SmsFormError::UnknownProvider(self.provider.trim().to_string()))?;

        let account_id = self.account_id.trim().to_string();
        let auth_token = match self.auth_token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => token.to_string(),
            _ => stored_token
                .map(str::to_string)
                .ok_or(SmsFormError::MissingToken)?,
        };

        validate_credentials(provider, &account_id, &auth_token)?;

        Ok(NewSmsConfig {
            hub_id,
            provider,
            account_id,
            auth_token,
            sender: normalize_phone(&self.sender)?,
            recipients: parse_recipients(&self.recipients)?,
            is_enabled: self.is_enabled,
        })
    }
}

/// Payload of the "Send test message" form.
#[derive(Debug, Deserialize, Validate)]
pub struct SendTestSmsForm {
    pub phone: String,
    #[validate(length(max = TEST_MESSAGE_MAX_LEN))]
    pub message: Option<String>,
}

impl SendTestSmsForm {
    /// Normalized recipient and message body.
    pub fn into_parts(self) -> SmsFormResult<(String, String)> {
        self.validate()?;

        let phone = normalize_phone(&self.phone)?;
        let body = self
            .message
            .map(|message| message.trim().to_string())
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| "Test message from the station back office.".to_string());

        Ok((phone, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SID: &str = "AC0123456789abcdef0123456789abcdef";
    const TOKEN: &str = "0123456789abcdef0123456789abcdef";

    fn form(token: Option<&str>) -> SaveSmsConfigForm {
        SaveSmsConfigForm {
            provider: "twilio".to_string(),
            account_id: SID.to_string(),
            auth_token: token.map(str::to_string),
            sender: "+1 555 000 0000".to_string(),
            recipients: "+15551234567\n+15557654321".to_string(),
            is_enabled: true,
        }
    }

    #[test]
    fn saves_valid_twilio_settings() {
        let config = form(Some(TOKEN))
            .into_new_sms_config(1, None)
            .expect("valid form");

        assert_eq!(config.provider, SmsProvider::Twilio);
        assert_eq!(config.sender, "+15550000000");
        assert_eq!(config.recipients.len(), 2);
    }

    #[test]
    fn blank_token_keeps_stored_one() {
        let config = form(Some(" "))
            .into_new_sms_config(1, Some(TOKEN))
            .expect("valid form");

        assert_eq!(config.auth_token, TOKEN);
    }

    #[test]
    fn blank_token_without_stored_one_is_rejected() {
        assert!(matches!(
            form(None).into_new_sms_config(1, None),
            Err(SmsFormError::MissingToken)
        ));
    }

    #[test]
    fn invalid_credentials_are_rejected() {
        assert!(matches!(
            form(Some("short")).into_new_sms_config(1, None),
            Err(SmsFormError::Credentials(CredentialError::InvalidTwilioToken))
        ));
    }

    #[test]
    fn test_message_defaults_body() {
        let form = SendTestSmsForm {
            phone: "+1 (555) 123-4567".to_string(),
            message: Some("  ".to_string()),
        };

        let (phone, body) = form.into_parts().expect("valid form");

        assert_eq!(phone, "+15551234567");
        assert!(!body.is_empty());
    }
}
