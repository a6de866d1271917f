use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::sms::{Balance, SentMessage, SmsError, SmsGateway, parse_amount};

/// ClickSend REST v3 client.
#[derive(Debug, Clone)]
pub struct ClickSendClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    api_key: String,
    from: String,
}

#[derive(Debug, Serialize)]
struct OutgoingMessage<'a> {
    source: &'a str,
    from: &'a str,
    to: &'a str,
    body: &'a str,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    messages: Vec<OutgoingMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    response_msg: Option<String>,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct SendData {
    #[serde(default)]
    messages: Vec<MessageResult>,
}

#[derive(Debug, Deserialize)]
struct MessageResult {
    message_id: Option<String>,
    status: String,
}

#[derive(Debug, Deserialize)]
struct AccountData {
    balance: serde_json::Value,
    #[serde(rename = "_currency")]
    currency: Option<Currency>,
}

#[derive(Debug, Deserialize)]
struct Currency {
    currency_name_short: Option<String>,
}

impl ClickSendClient {
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        username: &str,
        api_key: &str,
        from: &str,
    ) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            api_key: api_key.to_string(),
            from: from.to_string(),
        }
    }

    async fn error_from(response: reqwest::Response) -> SmsError {
        let status = response.status().as_u16();
        let message = match response.json::<Envelope<serde_json::Value>>().await {
            Ok(Envelope {
                response_msg: Some(message),
                ..
            }) => message,
            _ => "no error details".to_string(),
        };
        SmsError::Provider { status, message }
    }
}

#[async_trait]
impl SmsGateway for ClickSendClient {
    async fn send(&self, to: &str, body: &str) -> Result<SentMessage, SmsError> {
        let request = SendRequest {
            messages: vec![OutgoingMessage {
                source: "rust",
                from: &self.from,
                to,
                body,
            }],
        };

        let response = self
            .http
            .post(format!("{}/v3/sms/send", self.base_url))
            .basic_auth(&self.username, Some(&self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let envelope: Envelope<SendData> = response.json().await?;
        let result = envelope
            .data
            .and_then(|data| data.messages.into_iter().next())
            .ok_or_else(|| SmsError::InvalidResponse("no message status returned".to_string()))?;

        if result.status != "SUCCESS" {
            return Err(SmsError::Rejected(result.status));
        }

        let message_id = result
            .message_id
            .ok_or_else(|| SmsError::InvalidResponse("message id is missing".to_string()))?;

        log::info!("ClickSend accepted message {message_id}");
        Ok(SentMessage {
            provider_message_id: message_id,
        })
    }

    async fn balance(&self) -> Result<Balance, SmsError> {
        let response = self
            .http
            .get(format!("{}/v3/account", self.base_url))
            .basic_auth(&self.username, Some(&self.api_key))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let envelope: Envelope<AccountData> = response.json().await?;
        let account = envelope
            .data
            .ok_or_else(|| SmsError::InvalidResponse("account data is missing".to_string()))?;
        let amount = parse_amount(&account.balance)
            .ok_or_else(|| SmsError::InvalidResponse(format!("balance `{}`", account.balance)))?;

        Ok(Balance {
            amount,
            currency: account
                .currency
                .and_then(|currency| currency.currency_name_short)
                .unwrap_or_else(|| "USD".to_string()),
        })
    }
}
