use std::env::var;
use std::str::FromStr;
use std::time::Duration;

use dotenvy::dotenv;

use crate::application::services::pacing::PacingPolicy;
use crate::application::services::safe_send::SendPolicy;
use crate::domain::value_objects::RecipientDefaults;

pub struct Config {
    pub port: u16,
    pub scheme: String,
    pub host: String,
    /// Base URL of the messaging bridge sidecar.
    pub bridge_url: String,
    /// How often the bridge session status is polled.
    pub bridge_status_poll: Duration,
    /// Directory holding `<list_id>.json` recipient list files.
    pub recipient_lists_dir: String,
    /// Raw identifier that receives the completion summary, if any.
    pub operator: Option<String>,
    pub defaults: RecipientDefaults,
    pub send: SendPolicy,
    pub pacing: PacingPolicy,
}

impl Config {
    pub fn try_parse() -> Result<Config, String> {
        let _ = dotenv();

        Ok(Config {
            port: env_parse("PORT", 3000)?,
            scheme: env_or("SCHEME", "http"),
            host: env_or("HOST", "localhost"),
            bridge_url: env_or("BRIDGE_URL", "http://localhost:21465"),
            bridge_status_poll: Duration::from_secs(env_parse("BRIDGE_STATUS_POLL_SECS", 5)?),
            recipient_lists_dir: env_or("RECIPIENT_LISTS_DIR", "./recipient-lists"),
            operator: var("OPERATOR_RECIPIENT").ok().filter(|v| !v.trim().is_empty()),
            defaults: RecipientDefaults {
                country_prefix: env_or("COUNTRY_PREFIX", "91"),
                suffix: env_or("RECIPIENT_SUFFIX", "@c.us"),
            },
            send: SendPolicy {
                max_retries: env_parse("SEND_MAX_RETRIES", 3)?,
                call_timeout: Duration::from_secs(env_parse("SEND_TIMEOUT_SECS", 30)?),
                transient_backoff: Duration::from_secs(env_parse("TRANSIENT_BACKOFF_SECS", 3)?),
                reconnect_backoff: Duration::from_secs(env_parse("RECONNECT_BACKOFF_SECS", 5)?),
            },
            pacing: PacingPolicy {
                start_hour: env_parse("WINDOW_START_HOUR", 9)?,
                end_hour: env_parse("WINDOW_END_HOUR", 21)?,
                daily_limit: env_parse("DAILY_LIMIT", 200)?,
                min_delay: Duration::from_secs(env_parse("MIN_DELAY_SECS", 30)?),
                max_delay: Duration::from_secs(env_parse("MAX_DELAY_SECS", 45)?),
                failure_delay: Duration::from_secs(env_parse("FAILURE_DELAY_SECS", 5)?),
                quota_cooldown: Duration::from_secs(env_parse("QUOTA_COOLDOWN_SECS", 6 * 60 * 60)?),
                window_poll: Duration::from_secs(env_parse("WINDOW_POLL_SECS", 60)?),
            },
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    var(name).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T>(name: &str, default: T) -> Result<T, String>
where
    T: FromStr,
{
    match var(name) {
        Ok(value) => value
            .parse::<T>()
            .map_err(|_| format!("An error occured while parsing {name} env param")),
        Err(_) => Ok(default),
    }
}
