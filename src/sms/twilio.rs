use async_trait::async_trait;
use serde::Deserialize;

use crate::sms::{Balance, SentMessage, SmsError, SmsGateway, parse_amount};

/// Twilio Programmable Messaging client.
#[derive(Debug, Clone)]
pub struct TwilioClient {
    http: reqwest::Client,
    base_url: String,
    account_sid: String,
    auth_token: String,
    from: String,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    sid: Option<String>,
    status: Option<String>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BalanceResponse {
    balance: serde_json::Value,
    currency: Option<String>,
}

impl TwilioClient {
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        account_sid: &str,
        auth_token: &str,
        from: &str,
    ) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            account_sid: account_sid.to_string(),
            auth_token: auth_token.to_string(),
            from: from.to_string(),
        }
    }

    fn account_url(&self, resource: &str) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/{resource}",
            self.base_url, self.account_sid
        )
    }

    async fn error_from(response: reqwest::Response) -> SmsError {
        let status = response.status().as_u16();
        let message = match response.json::<ErrorResponse>().await {
            Ok(ErrorResponse {
                message: Some(message),
            }) => message,
            _ => "no error details".to_string(),
        };
        SmsError::Provider { status, message }
    }
}

#[async_trait]
impl SmsGateway for TwilioClient {
    async fn send(&self, to: &str, body: &str) -> Result<SentMessage, SmsError> {
        let response = self
            .http
            .post(self.account_url("Messages.json"))
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("To", to), ("From", self.from.as_str()), ("Body", body)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let message: MessageResponse = response.json().await?;
        if matches!(message.status.as_deref(), Some("failed" | "undelivered")) {
            return Err(SmsError::Rejected(
                message
                    .error_message
                    .unwrap_or_else(|| "message failed".to_string()),
            ));
        }

        let sid = message
            .sid
            .ok_or_else(|| SmsError::InvalidResponse("message sid is missing".to_string()))?;

        log::info!("Twilio accepted message {sid}");
        Ok(SentMessage {
            provider_message_id: sid,
        })
    }

    async fn balance(&self) -> Result<Balance, SmsError> {
        let response = self
            .http
            .get(self.account_url("Balance.json"))
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let balance: BalanceResponse = response.json().await?;
        let amount = parse_amount(&balance.balance)
            .ok_or_else(|| SmsError::InvalidResponse(format!("balance `{}`", balance.balance)))?;

        Ok(Balance {
            amount,
            currency: balance.currency.unwrap_or_else(|| "USD".to_string()),
        })
    }
}
