use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::audit::AuditAction;
use crate::domain::permission::{PermissionAction, pages};
use crate::domain::sms::{NewSmsMessage, SmsConfig, SmsMessage, SmsMessageListQuery, SmsProvider};
use crate::forms::sms::{SaveSmsConfigForm, SendTestSmsForm};
use crate::repository::{
    AuditWriter, SmsConfigReader, SmsConfigWriter, SmsLogReader, SmsLogWriter, UserReader,
};
use crate::services::access::authorize;
use crate::services::{ServiceError, ServiceResult, audit, total_pages};
use crate::sms::{Balance, SentMessage, SmsError, SmsGateway};

/// Errors of the operations that talk to the SMS provider.
#[derive(Debug, Error)]
pub enum SmsServiceError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Sms(#[from] SmsError),
    #[error("SMS alerts are not configured yet")]
    NotConfigured,
    #[error("SMS alerts are disabled")]
    Disabled,
}

pub type SmsServiceResult<T> = Result<T, SmsServiceError>;

#[derive(Debug, Default, Deserialize)]
pub struct SmsQuery {
    pub page: Option<usize>,
}

/// Stored settings as shown on the settings page; the token is masked.
#[derive(Debug, Serialize)]
pub struct SmsConfigView {
    #[serde(flatten)]
    pub config: SmsConfig,
    pub masked_token: String,
    pub recipients_text: String,
}

impl From<SmsConfig> for SmsConfigView {
    fn from(config: SmsConfig) -> Self {
        Self {
            masked_token: config.masked_token(),
            recipients_text: config.recipients.join("\n"),
            config,
        }
    }
}

pub struct SmsPageData {
    pub config: Option<SmsConfigView>,
    pub messages: Paginated<SmsMessage>,
    pub providers: Vec<SmsProvider>,
}

pub fn load_sms_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: SmsQuery,
) -> ServiceResult<SmsPageData>
where
    R: SmsConfigReader + SmsLogReader + UserReader + ?Sized,
{
    authorize(repo, user, pages::SMS, PermissionAction::View)?;

    let page = query.page.unwrap_or(1);
    let config = repo
        .get_sms_config(user.hub_id)
        .map_err(ServiceError::from)?
        .map(SmsConfigView::from);
    let (total, messages) = repo
        .list_sms_messages(
            SmsMessageListQuery::new(user.hub_id).paginate(page, DEFAULT_ITEMS_PER_PAGE),
        )
        .map_err(ServiceError::from)?;

    Ok(SmsPageData {
        config,
        messages: Paginated::new(messages, page, total_pages(total)),
        providers: vec![SmsProvider::Twilio, SmsProvider::ClickSend],
    })
}

/// Validate and store the provider settings of the hub.
pub fn save_sms_config<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: SaveSmsConfigForm,
) -> ServiceResult<SmsConfig>
where
    R: SmsConfigReader + SmsConfigWriter + AuditWriter + UserReader + ?Sized,
{
    authorize(repo, user, pages::SMS, PermissionAction::Edit)?;

    let stored = repo
        .get_sms_config(user.hub_id)
        .map_err(ServiceError::from)?;
    let stored_token = stored.as_ref().map(|config| config.auth_token.as_str());

    let new_config = form
        .into_new_sms_config(user.hub_id, stored_token)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let saved = repo
        .save_sms_config(&new_config)
        .map_err(ServiceError::from)?;

    audit::record(
        repo,
        user,
        AuditAction::Update,
        pages::SMS,
        Some(saved.id),
        Some(saved.provider.as_str().to_string()),
    );
    Ok(saved)
}

/// Configured settings of the hub, or [`SmsServiceError::NotConfigured`].
pub(crate) fn stored_config<R>(repo: &R, hub_id: i32) -> SmsServiceResult<SmsConfig>
where
    R: SmsConfigReader + ?Sized,
{
    repo.get_sms_config(hub_id)
        .map_err(ServiceError::from)?
        .ok_or(SmsServiceError::NotConfigured)
}

/// Send one message and log the attempt, whatever its outcome.
pub(crate) async fn deliver<R>(
    repo: &R,
    gateway: &dyn SmsGateway,
    hub_id: i32,
    to: &str,
    body: &str,
) -> Result<SentMessage, SmsError>
where
    R: SmsLogWriter + ?Sized,
{
    let result = gateway.send(to, body).await;

    let entry = match &result {
        Ok(sent) => NewSmsMessage::sent(
            hub_id,
            to,
            body,
            Some(sent.provider_message_id.clone()),
        ),
        Err(err) => {
            log::warn!("SMS to {to} failed: {err}");
            NewSmsMessage::failed(hub_id, to, body, err.to_string())
        }
    };
    if let Err(err) = repo.record_sms_message(&entry) {
        log::warn!("Failed to log SMS to {to}: {err}");
    }

    result
}

/// Ask the provider for the remaining account credit.
pub async fn check_balance<R, F>(
    repo: &R,
    user: &AuthenticatedUser,
    connect: F,
) -> SmsServiceResult<Balance>
where
    R: SmsConfigReader + UserReader + ?Sized,
    F: FnOnce(&SmsConfig) -> Result<Box<dyn SmsGateway>, SmsError>,
{
    authorize(repo, user, pages::SMS, PermissionAction::View)?;

    let config = stored_config(repo, user.hub_id)?;
    let gateway = connect(&config)?;
    Ok(gateway.balance().await?)
}

/// Send the test message of the form. Works while alerts are disabled.
pub async fn send_test_message<R, F>(
    repo: &R,
    user: &AuthenticatedUser,
    form: SendTestSmsForm,
    connect: F,
) -> SmsServiceResult<SentMessage>
where
    R: SmsConfigReader + SmsLogWriter + UserReader + ?Sized,
    F: FnOnce(&SmsConfig) -> Result<Box<dyn SmsGateway>, SmsError>,
{
    authorize(repo, user, pages::SMS, PermissionAction::Create)?;

    let (phone, body) = form
        .into_parts()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let config = stored_config(repo, user.hub_id)?;
    let gateway = connect(&config)?;

    let sent = deliver(repo, gateway.as_ref(), user.hub_id, &phone, &body).await?;
    log::info!("Test SMS sent to {phone} via {}", config.provider);
    Ok(sent)
}


#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use super::fake::FakeGateway;
    use super::*;
    use crate::domain::sms::SmsStatus;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{HUB_ID, admin, audit_entry, fixed_datetime};

    pub const SID: &str = "AC0123456789abcdef0123456789abcdef";
    pub const TOKEN: &str = "0123456789abcdef0123456789abcdef";

    pub fn config(is_enabled: bool) -> SmsConfig {
        SmsConfig {
            id: 1,
            hub_id: HUB_ID,
            provider: SmsProvider::Twilio,
            account_id: SID.to_string(),
            auth_token: TOKEN.to_string(),
            sender: "+15550000000".to_string(),
            recipients: vec!["+15551234567".to_string(), "+15557654321".to_string()],
            is_enabled,
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    pub fn logged(message: &NewSmsMessage) -> SmsMessage {
        SmsMessage {
            id: 1,
            hub_id: message.hub_id,
            recipient: message.recipient.clone(),
            body: message.body.clone(),
            status: message.status,
            provider_message_id: message.provider_message_id.clone(),
            error: message.error.clone(),
            created_at: fixed_datetime(),
        }
    }

    fn connect_to(
        gateway: Arc<FakeGateway>,
    ) -> impl FnOnce(&SmsConfig) -> Result<Box<dyn SmsGateway>, SmsError> {
        move |_| Ok(Box::new(gateway) as Box<dyn SmsGateway>)
    }

    #[test]
    fn page_masks_token() {
        let mut repo = MockRepository::new();
        repo.expect_get_sms_config()
            .returning(|_| Ok(Some(config(true))));
        repo.expect_list_sms_messages()
            .returning(|_| Ok((0, vec![])));

        let data = load_sms_page(&repo, &admin(), SmsQuery::default()).expect("sms page");

        let view = serde_json::to_value(data.config.expect("configured")).expect("serializes");
        assert!(view.get("auth_token").is_none());
        assert_eq!(view["masked_token"], "••••cdef");
        assert_eq!(view["recipients_text"], "+15551234567\n+15557654321");
    }

    #[test]
    fn save_keeps_stored_token_when_blank() {
        let mut repo = MockRepository::new();
        repo.expect_get_sms_config()
            .returning(|_| Ok(Some(config(false))));
        repo.expect_save_sms_config()
            .withf(|new_config| new_config.auth_token == TOKEN && new_config.is_enabled)
            .times(1)
            .returning(|_| Ok(config(true)));
        repo.expect_record_audit_entry()
            .withf(|entry| entry.entity == pages::SMS)
            .times(1)
            .returning(|entry| Ok(audit_entry(entry)));

        let form = SaveSmsConfigForm {
            provider: "twilio".to_string(),
            account_id: SID.to_string(),
            auth_token: Some(String::new()),
            sender: "+15550000000".to_string(),
            recipients: "+15551234567".to_string(),
            is_enabled: true,
        };

        assert!(save_sms_config(&repo, &admin(), form).is_ok());
    }

    #[test]
    fn save_rejects_short_twilio_token() {
        let mut repo = MockRepository::new();
        repo.expect_get_sms_config().returning(|_| Ok(None));
        repo.expect_save_sms_config().never();

        let form = SaveSmsConfigForm {
            provider: "twilio".to_string(),
            account_id: SID.to_string(),
            auth_token: Some("short".to_string()),
            sender: "+15550000000".to_string(),
            recipients: "+15551234567".to_string(),
            is_enabled: true,
        };

        assert!(matches!(
            save_sms_config(&repo, &admin(), form),
            Err(ServiceError::Form(_))
        ));
    }

    #[tokio::test]
    async fn test_message_is_sent_and_logged() {
        let gateway = Arc::new(FakeGateway::default());
        let mut repo = MockRepository::new();
        repo.expect_get_sms_config()
            .returning(|_| Ok(Some(config(false))));
        repo.expect_record_sms_message()
            .withf(|message| {
                message.status == SmsStatus::Sent
                    && message.recipient == "+15551112222"
                    && message.provider_message_id.as_deref() == Some("SM1")
            })
            .times(1)
            .returning(|message| Ok(logged(message)));

        let form = SendTestSmsForm {
            phone: "+1 (555) 111-2222".to_string(),
            message: None,
        };
        let sent = send_test_message(&repo, &admin(), form, connect_to(gateway.clone()))
            .await
            .expect("sent");

        assert_eq!(sent.provider_message_id, "SM1");
        assert_eq!(gateway.sent().len(), 1);
    }

    #[tokio::test]
    async fn failed_test_message_is_logged_as_failed() {
        let gateway = Arc::new(FakeGateway::failing(&["+15551112222"]));
        let mut repo = MockRepository::new();
        repo.expect_get_sms_config()
            .returning(|_| Ok(Some(config(true))));
        repo.expect_record_sms_message()
            .withf(|message| message.status == SmsStatus::Failed && message.error.is_some())
            .times(1)
            .returning(|message| Ok(logged(message)));

        let form = SendTestSmsForm {
            phone: "+15551112222".to_string(),
            message: Some("ping".to_string()),
        };
        let result = send_test_message(&repo, &admin(), form, connect_to(gateway)).await;

        assert!(matches!(result, Err(SmsServiceError::Sms(SmsError::Rejected(_)))));
    }

    #[tokio::test]
    async fn balance_requires_configuration() {
        let mut repo = MockRepository::new();
        repo.expect_get_sms_config().returning(|_| Ok(None));

        let result = check_balance(&repo, &admin(), |_| {
            Ok(Box::new(FakeGateway::default()) as Box<dyn SmsGateway>)
        })
        .await;

        assert!(matches!(result, Err(SmsServiceError::NotConfigured)));
    }

    #[tokio::test]
    async fn balance_comes_from_gateway() {
        let mut repo = MockRepository::new();
        repo.expect_get_sms_config()
            .returning(|_| Ok(Some(config(true))));

        let balance = check_balance(&repo, &admin(), |_| {
            Ok(Box::new(FakeGateway::default()) as Box<dyn SmsGateway>)
        })
        .await
        .expect("balance");

        assert_eq!(balance.currency, "USD");
    }
}
