use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::sms::{
    NewSmsConfig as DomainNewSmsConfig, NewSmsMessage as DomainNewSmsMessage,
    SmsConfig as DomainSmsConfig, SmsMessage as DomainSmsMessage, SmsProvider, SmsStatus,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::sms_configs)]
pub struct SmsConfig {
    pub id: i32,
    pub hub_id: i32,
    pub provider: String,
    pub account_id: String,
    pub auth_token: String,
    pub sender: String,
    pub recipients: String,
    pub is_enabled: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::sms_configs)]
pub struct NewSmsConfig<'a> {
    pub hub_id: i32,
    pub provider: &'a str,
    pub account_id: &'a str,
    pub auth_token: &'a str,
    pub sender: &'a str,
    pub recipients: String,
    pub is_enabled: bool,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::sms_messages)]
pub struct SmsMessage {
    pub id: i32,
    pub hub_id: i32,
    pub recipient: String,
    pub body: String,
    pub status: String,
    pub provider_message_id: Option<String>,
    pub error: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::sms_messages)]
pub struct NewSmsMessage<'a> {
    pub hub_id: i32,
    pub recipient: &'a str,
    pub body: &'a str,
    pub status: &'a str,
    pub provider_message_id: Option<&'a str>,
    pub error: Option<&'a str>,
}

impl SmsConfig {
    /// Convert the row, or `None` when the stored provider is not supported.
    pub fn into_domain(self) -> Option<DomainSmsConfig> {
        let Some(provider) = SmsProvider::parse(&self.provider) else {
            log::warn!(
                "Ignoring SMS configuration of hub {} with unknown provider `{}`",
                self.hub_id,
                self.provider
            );
            return None;
        };

        let recipients = self
            .recipients
            .split(',')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect();

        Some(DomainSmsConfig {
            id: self.id,
            hub_id: self.hub_id,
            provider,
            account_id: self.account_id,
            auth_token: self.auth_token,
            sender: self.sender,
            recipients,
            is_enabled: self.is_enabled,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewSmsConfig> for NewSmsConfig<'a> {
    fn from(value: &'a DomainNewSmsConfig) -> Self {
        Self {
            hub_id: value.hub_id,
            provider: value.provider.as_str(),
            account_id: value.account_id.as_str(),
            auth_token: value.auth_token.as_str(),
            sender: value.sender.as_str(),
            recipients: value.recipients.join(","),
            is_enabled: value.is_enabled,
        }
    }
}

impl From<SmsMessage> for DomainSmsMessage {
    fn from(value: SmsMessage) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            recipient: value.recipient,
            body: value.body,
            status: SmsStatus::from(value.status.as_str()),
            provider_message_id: value.provider_message_id,
            error: value.error,
            created_at: value.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewSmsMessage> for NewSmsMessage<'a> {
    fn from(value: &'a DomainNewSmsMessage) -> Self {
        Self {
            hub_id: value.hub_id,
            recipient: value.recipient.as_str(),
            body: value.body.as_str(),
            status: value.status.as_str(),
            provider_message_id: value.provider_message_id.as_deref(),
            error: value.error.as_deref(),
        }
    }
}
