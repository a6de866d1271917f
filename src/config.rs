//! Station-specific settings read from the environment.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::license::{DEFAULT_WARNING_DAYS, MAX_WARNING_DAYS};

pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const DEFAULT_SMS_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_TWILIO_API_URL: &str = "https://api.twilio.com";
pub const DEFAULT_CLICKSEND_API_URL: &str = "https://rest.clicksend.com";

/// Settings shared by the HTTP handlers in addition to `CommonServerConfig`.
#[derive(Debug, Clone)]
pub struct StationsConfig {
    /// Directory receiving uploaded license documents.
    pub upload_dir: PathBuf,
    /// Days before expiry a license is reported as expiring.
    pub license_warning_days: i64,
    pub sms_timeout: Duration,
    pub twilio_api_url: String,
    pub clicksend_api_url: String,
}

impl Default for StationsConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            license_warning_days: DEFAULT_WARNING_DAYS,
            sms_timeout: Duration::from_secs(DEFAULT_SMS_TIMEOUT_SECS),
            twilio_api_url: DEFAULT_TWILIO_API_URL.to_string(),
            clicksend_api_url: DEFAULT_CLICKSEND_API_URL.to_string(),
        }
    }
}

impl StationsConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let upload_dir = lookup("UPLOAD_DIR")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.upload_dir);

        let license_warning_days = parse_or(
            &lookup,
            "LICENSE_WARNING_DAYS",
            defaults.license_warning_days,
            |days: &i64| (0..=MAX_WARNING_DAYS).contains(days),
        );

        let sms_timeout_secs = parse_or(
            &lookup,
            "SMS_TIMEOUT_SECS",
            DEFAULT_SMS_TIMEOUT_SECS,
            |secs: &u64| *secs > 0,
        );

        Self {
            upload_dir,
            license_warning_days,
            sms_timeout: Duration::from_secs(sms_timeout_secs),
            twilio_api_url: url_or(&lookup, "TWILIO_API_URL", defaults.twilio_api_url),
            clicksend_api_url: url_or(&lookup, "CLICKSEND_API_URL", defaults.clicksend_api_url),
        }
    }
}

fn parse_or<F, T, P>(lookup: &F, key: &str, default: T, accept: P) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Display,
    P: Fn(&T) -> bool,
{
    let Some(raw) = lookup(key) else {
        return default;
    };

    match raw.trim().parse::<T>() {
        Ok(value) if accept(&value) => value,
        _ => {
            log::warn!("Invalid {key} value `{raw}`, using {default}");
            default
        }
    }
}

fn url_or<F>(lookup: &F, key: &str, default: String) -> String
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
            url.trim_end_matches('/').to_string()
        }
        Some(url) => {
            log::warn!("Invalid {key} value `{url}`, using {default}");
            default
        }
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(pairs: &[(&str, &str)]) -> StationsConfig {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        StationsConfig::from_lookup(|key| values.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config(&[]);

        assert_eq!(config.upload_dir, PathBuf::from(DEFAULT_UPLOAD_DIR));
        assert_eq!(config.license_warning_days, 30);
        assert_eq!(config.sms_timeout, Duration::from_secs(10));
        assert_eq!(config.twilio_api_url, DEFAULT_TWILIO_API_URL);
    }

    #[test]
    fn values_are_read_and_trimmed() {
        let config = config(&[
            ("UPLOAD_DIR", "/var/lib/stations"),
            ("LICENSE_WARNING_DAYS", " 45 "),
            ("SMS_TIMEOUT_SECS", "3"),
            ("CLICKSEND_API_URL", "http://127.0.0.1:9000/"),
        ]);

        assert_eq!(config.upload_dir, PathBuf::from("/var/lib/stations"));
        assert_eq!(config.license_warning_days, 45);
        assert_eq!(config.sms_timeout, Duration::from_secs(3));
        assert_eq!(config.clicksend_api_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = config(&[
            ("LICENSE_WARNING_DAYS", "-2"),
            ("SMS_TIMEOUT_SECS", "soon"),
            ("TWILIO_API_URL", "api.twilio.com"),
        ]);

        assert_eq!(config.license_warning_days, 30);
        assert_eq!(config.sms_timeout, Duration::from_secs(10));
        assert_eq!(config.twilio_api_url, DEFAULT_TWILIO_API_URL);
    }

    #[test]
    fn warning_window_is_bounded() {
        assert_eq!(
            config(&[("LICENSE_WARNING_DAYS", "3650")]).license_warning_days,
            MAX_WARNING_DAYS
        );
        assert_eq!(
            config(&[("LICENSE_WARNING_DAYS", "200000000000")]).license_warning_days,
            DEFAULT_WARNING_DAYS
        );
    }
}
