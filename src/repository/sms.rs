use chrono::Local;
use diesel::prelude::*;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::domain::sms::{
    NewSmsConfig as DomainNewSmsConfig, NewSmsMessage as DomainNewSmsMessage,
    SmsConfig as DomainSmsConfig, SmsMessage as DomainSmsMessage, SmsMessageListQuery,
};
use crate::models::sms::{
    NewSmsConfig as DbNewSmsConfig, NewSmsMessage as DbNewSmsMessage, SmsConfig as DbSmsConfig,
    SmsMessage as DbSmsMessage,
};
use crate::repository::{
    DieselRepository, SmsConfigReader, SmsConfigWriter, SmsLogReader, SmsLogWriter, page_bounds,
};
use crate::schema::{sms_configs, sms_messages};

impl SmsConfigReader for DieselRepository {
    fn get_sms_config(&self, hub_id: i32) -> RepositoryResult<Option<DomainSmsConfig>> {
        let mut conn = self.conn()?;

        let config = sms_configs::table
            .filter(sms_configs::hub_id.eq(hub_id))
            .first::<DbSmsConfig>(&mut conn)
            .optional()?;

        Ok(config.and_then(DbSmsConfig::into_domain))
    }
}

impl SmsConfigWriter for DieselRepository {
    fn save_sms_config(&self, config: &DomainNewSmsConfig) -> RepositoryResult<DomainSmsConfig> {
        let mut conn = self.conn()?;
        let insertable = DbNewSmsConfig::from(config);

        let saved = diesel::insert_into(sms_configs::table)
            .values(&insertable)
            .on_conflict(sms_configs::hub_id)
            .do_update()
            .set((
                &insertable,
                sms_configs::updated_at.eq(Local::now().naive_utc()),
            ))
            .get_result::<DbSmsConfig>(&mut conn)?;

        saved.into_domain().ok_or(RepositoryError::NotFound)
    }
}

impl SmsLogReader for DieselRepository {
    fn list_sms_messages(
        &self,
        query: SmsMessageListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainSmsMessage>)> {
        let mut conn = self.conn()?;

        let total = sms_messages::table
            .filter(sms_messages::hub_id.eq(query.hub_id))
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items = sms_messages::table
            .filter(sms_messages::hub_id.eq(query.hub_id))
            .order((sms_messages::created_at.desc(), sms_messages::id.desc()))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(pagination) = &query.pagination {
            let (offset, limit) = page_bounds(pagination.page, pagination.per_page);
            items = items.offset(offset).limit(limit);
        }

        let rows = items.load::<DbSmsMessage>(&mut conn)?;

        Ok((total, rows.into_iter().map(Into::into).collect()))
    }
}

impl SmsLogWriter for DieselRepository {
    fn record_sms_message(
        &self,
        message: &DomainNewSmsMessage,
    ) -> RepositoryResult<DomainSmsMessage> {
        let mut conn = self.conn()?;
        let insertable = DbNewSmsMessage::from(message);

        let created = diesel::insert_into(sms_messages::table)
            .values(&insertable)
            .get_result::<DbSmsMessage>(&mut conn)?;

        Ok(created.into())
    }
}
