//! Startup configuration read from the environment.

use crate::core::{Validate, WatchOptions};
use crate::error::{Result, ValidationError, WatchError};
use crate::notify::telegram::DEFAULT_API_URL;
use crate::sources::TargetSpec;
use chrono::FixedOffset;
use config::Environment;
use reqwest::Url;
use serde::Deserialize;
use std::ffi::OsString;
use std::fmt;
use std::time::Duration;
use tracing::info;

/// Environment variables read by [`WatchConfig`].
pub const KNOWN_VARS: &[&str] = &[
    "TELEGRAM_BOT_TOKEN",
    "TELEGRAM_CHAT_ID",
    "CHECK_INTERVAL",
    "TARGET_URLS",
    "LOOKAHEAD_DAYS",
    "UTC_OFFSET_HOURS",
    "REQUEST_TIMEOUT",
    "NOTIFY_COOLDOWN",
    "ALERT_LINK",
    "TELEGRAM_API_URL",
];

/// Ticketing widget endpoints for the padel event.
pub const DEFAULT_TARGET_URLS: &str = "\
agent_info=https://tickets.mos.ru/widget/api/widget/agent_info?agent_id=museum1038,\
event_info=https://tickets.mos.ru/widget/api/widget/getevents?event_id=65305&agent_uid=museum1038,\
sessions=https://tickets.mos.ru/widget/api/widget/events/getperformances?event_id=65305&agent_uid=museum1038&date={date}";

/// Booking page linked from change notifications.
pub const DEFAULT_ALERT_LINK: &str = "https://bilet.mos.ru/event/344458257/";

fn default_check_interval() -> i64 {
    10
}

fn default_target_urls() -> String {
    DEFAULT_TARGET_URLS.to_string()
}

fn default_lookahead_days() -> i64 {
    7
}

fn default_utc_offset_hours() -> i64 {
    3
}

fn default_request_timeout() -> i64 {
    30
}

fn default_alert_link() -> String {
    DEFAULT_ALERT_LINK.to_string()
}

fn default_telegram_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

/// Values as found in the environment, before any parsing.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawVars {
    telegram_bot_token: Option<String>,
    telegram_chat_id: Option<String>,
    check_interval: Option<String>,
    target_urls: Option<String>,
    lookahead_days: Option<String>,
    utc_offset_hours: Option<String>,
    request_timeout: Option<String>,
    notify_cooldown: Option<String>,
    alert_link: Option<String>,
    telegram_api_url: Option<String>,
}

/// Everything the monitor reads at startup.
///
/// Field names are the lowercase environment variable names. Only the two
/// Telegram values are required; everything else has a default.
///
/// # Examples
///
/// ```rust
/// use padel_watch::settings::WatchConfig;
///
/// let config = WatchConfig::from_vars([
///     ("TELEGRAM_BOT_TOKEN", "123:ABC"),
///     ("TELEGRAM_CHAT_ID", "-1001"),
///     ("CHECK_INTERVAL", "30"),
/// ])
/// .unwrap();
///
/// assert_eq!(config.interval().as_secs(), 30);
/// ```
#[derive(Clone)]
pub struct WatchConfig {
    /// Bot API token (`TELEGRAM_BOT_TOKEN`).
    pub telegram_bot_token: String,
    /// Destination chat (`TELEGRAM_CHAT_ID`).
    pub telegram_chat_id: String,
    /// Seconds between cycle starts (`CHECK_INTERVAL`).
    pub check_interval: i64,
    /// Comma separated `[name=]url` list (`TARGET_URLS`).
    pub target_urls: String,
    /// Days covered by `{date}` targets (`LOOKAHEAD_DAYS`).
    pub lookahead_days: i64,
    /// Local zone for the date window (`UTC_OFFSET_HOURS`).
    pub utc_offset_hours: i64,
    /// Per-request timeout in seconds (`REQUEST_TIMEOUT`).
    pub request_timeout: i64,
    /// Minimum seconds between notifications, 0 disables (`NOTIFY_COOLDOWN`).
    pub notify_cooldown: i64,
    /// Link appended to change notifications, empty for none (`ALERT_LINK`).
    pub alert_link: String,
    /// Bot API base URL (`TELEGRAM_API_URL`).
    pub telegram_api_url: String,
}

impl WatchConfig {
    /// Load from the process environment, after seeding it from `.env` if
    /// one exists.
    ///
    /// # Errors
    ///
    /// Returns an error naming every missing or invalid variable.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_vars(known_vars(std::env::vars_os()))
    }

    /// Load from an explicit set of variables.
    ///
    /// Empty values count as unset, except for `ALERT_LINK` where an empty
    /// value turns the link off.
    ///
    /// # Errors
    ///
    /// Returns an error naming every missing or invalid variable.
    pub fn from_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Result<Self>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let vars: config::Map<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let settings = config::Config::builder()
            .add_source(Environment::default().source(Some(vars)))
            .build()
            .map_err(|e| WatchError::Config(format!("Failed to read environment: {}", e)))?;

        let raw: RawVars = settings.try_deserialize().map_err(|e| {
            WatchError::Config(format!("Failed to parse environment variables: {}", e))
        })?;

        Ok(Self::from_raw(raw)?)
    }

    /// Parse and validate raw values, reporting every problem at once.
    ///
    /// A number that does not parse is reported and replaced by its default
    /// so the remaining checks still run.
    fn from_raw(raw: RawVars) -> std::result::Result<Self, ValidationError> {
        let mut errors = Vec::new();

        let mut number = |name: &str, value: Option<String>, default: i64| -> i64 {
            let Some(text) = value.filter(|v| !v.trim().is_empty()) else {
                return default;
            };
            text.trim().parse().unwrap_or_else(|_| {
                errors.push(ValidationError::invalid_field(
                    name,
                    format!("'{}' is not a whole number", text),
                ));
                default
            })
        };
        let check_interval = number(
            "CHECK_INTERVAL",
            raw.check_interval,
            default_check_interval(),
        );
        let lookahead_days = number(
            "LOOKAHEAD_DAYS",
            raw.lookahead_days,
            default_lookahead_days(),
        );
        let utc_offset_hours = number(
            "UTC_OFFSET_HOURS",
            raw.utc_offset_hours,
            default_utc_offset_hours(),
        );
        let request_timeout = number(
            "REQUEST_TIMEOUT",
            raw.request_timeout,
            default_request_timeout(),
        );
        let notify_cooldown = number("NOTIFY_COOLDOWN", raw.notify_cooldown, 0);

        let text = |value: Option<String>, default: fn() -> String| {
            value.filter(|v| !v.trim().is_empty()).unwrap_or_else(default)
        };
        let config = Self {
            telegram_bot_token: text(raw.telegram_bot_token, String::new),
            telegram_chat_id: text(raw.telegram_chat_id, String::new),
            check_interval,
            target_urls: text(raw.target_urls, default_target_urls),
            lookahead_days,
            utc_offset_hours,
            request_timeout,
            notify_cooldown,
            alert_link: raw.alert_link.unwrap_or_else(default_alert_link),
            telegram_api_url: text(raw.telegram_api_url, default_telegram_api_url),
        };

        match config.validate() {
            Ok(()) => {}
            Err(ValidationError::Multiple(list)) => errors.extend(list),
            Err(e) => errors.push(e),
        }
        match ValidationError::from_list(errors) {
            Some(err) => Err(err),
            None => Ok(config),
        }
    }

    /// Time between cycle starts.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.check_interval.max(1) as u64)
    }

    /// Timeout for fetches and notification calls.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout.max(1) as u64)
    }

    /// Notification cooldown, `None` when disabled.
    pub fn cooldown(&self) -> Option<Duration> {
        (self.notify_cooldown > 0).then(|| Duration::from_secs(self.notify_cooldown as u64))
    }

    /// Options for the watch loop.
    ///
    /// # Errors
    ///
    /// Returns an error if targets or the UTC offset are invalid; both are
    /// already checked by validation.
    pub fn watch_options(&self) -> Result<WatchOptions> {
        Ok(WatchOptions {
            interval: self.interval(),
            targets: TargetSpec::parse_list(&self.target_urls)?,
            lookahead_days: u32::try_from(self.lookahead_days).map_err(|_| {
                ValidationError::invalid_field("LOOKAHEAD_DAYS", "out of range")
            })?,
            utc_offset: utc_offset(self.utc_offset_hours)?,
            cooldown: self.cooldown(),
            alert_link: Some(self.alert_link.trim())
                .filter(|link| !link.is_empty())
                .map(str::to_string),
        })
    }

    /// Log the effective configuration without secrets.
    pub fn log_redacted(&self) {
        info!(
            token = %redact(&self.telegram_bot_token),
            chat_id = %self.telegram_chat_id,
            interval_secs = self.check_interval,
            lookahead_days = self.lookahead_days,
            utc_offset_hours = self.utc_offset_hours,
            request_timeout_secs = self.request_timeout,
            notify_cooldown_secs = self.notify_cooldown,
            "Configuration loaded"
        );
    }
}

impl Validate for WatchConfig {
    fn validate(&self) -> std::result::Result<(), ValidationError> {
        let mut errors = Vec::new();

        let missing: Vec<&str> = [
            ("TELEGRAM_BOT_TOKEN", &self.telegram_bot_token),
            ("TELEGRAM_CHAT_ID", &self.telegram_chat_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();
        if !missing.is_empty() {
            errors.push(ValidationError::custom(format!(
                "Missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        if self.check_interval <= 0 {
            errors.push(ValidationError::invalid_field(
                "CHECK_INTERVAL",
                "must be a positive number of seconds",
            ));
        }
        if !(1..=366).contains(&self.lookahead_days) {
            errors.push(ValidationError::invalid_field(
                "LOOKAHEAD_DAYS",
                "must be between 1 and 366",
            ));
        }
        if let Err(e) = utc_offset(self.utc_offset_hours) {
            errors.push(e);
        }
        if self.request_timeout <= 0 {
            errors.push(ValidationError::invalid_field(
                "REQUEST_TIMEOUT",
                "must be a positive number of seconds",
            ));
        }
        if self.notify_cooldown < 0 {
            errors.push(ValidationError::invalid_field(
                "NOTIFY_COOLDOWN",
                "must not be negative",
            ));
        }
        if let Err(e) = TargetSpec::parse_list(&self.target_urls) {
            errors.push(e);
        }
        if let Err(e) = Url::parse(&self.telegram_api_url) {
            errors.push(ValidationError::invalid_field(
                "TELEGRAM_API_URL",
                e.to_string(),
            ));
        }

        match ValidationError::from_list(errors) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for WatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchConfig")
            .field("telegram_bot_token", &redact(&self.telegram_bot_token))
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field("check_interval", &self.check_interval)
            .field("target_urls", &self.target_urls)
            .field("lookahead_days", &self.lookahead_days)
            .field("utc_offset_hours", &self.utc_offset_hours)
            .field("request_timeout", &self.request_timeout)
            .field("notify_cooldown", &self.notify_cooldown)
            .field("alert_link", &self.alert_link)
            .field("telegram_api_url", &self.telegram_api_url)
            .finish()
    }
}

/// Known variables whose name and value are both valid UTF-8.
fn known_vars(vars: impl IntoIterator<Item = (OsString, OsString)>) -> Vec<(String, String)> {
    vars.into_iter()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .filter(|(key, _)| KNOWN_VARS.contains(&key.as_str()))
        .collect()
}

fn utc_offset(hours: i64) -> std::result::Result<FixedOffset, ValidationError> {
    i32::try_from(hours)
        .ok()
        .filter(|h| (-23..=23).contains(h))
        .and_then(|h| FixedOffset::east_opt(h * 3600))
        .ok_or_else(|| {
            ValidationError::invalid_field("UTC_OFFSET_HOURS", "must be between -23 and 23")
        })
}

/// First characters of a secret plus its length.
fn redact(secret: &str) -> String {
    let shown: String = secret.chars().take(4).collect();
    format!("{}...({} chars)", shown, secret.chars().count())
}
