use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use zeroize::Zeroizing;

/// The environment name that turns off `Secure` cookies.
pub const DEVELOPMENT_ENV: &str = "development";

/// Longest accepted session lifetime in days.
pub const MAX_SESSION_DURATION_DAYS: i64 = 3650;

/// Settings for the transactional email plugin.
#[derive(Clone)]
pub struct MailerConfig {
    /// The Brevo API key. Mail is disabled when absent.
    pub api_key: Option<Zeroizing<String>>,
    /// The base URL of the Brevo API.
    pub api_base: String,
    pub sender_email: String,
    pub sender_name: String,
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: "https://api.brevo.com/v3".to_string(),
            sender_email: "no-reply@orderdesk.local".to_string(),
            sender_name: "Orderdesk".to_string(),
        }
    }
}

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The deployment environment (`APP_ENV`).
    pub environment: String,
    /// The address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// The URL of the Redis server. Sessions live in memory when unset.
    pub redis_url: Option<String>,
    /// The duration of a session in days.
    pub session_duration_days: i64,
    /// Upper bound on clearing a session during logout.
    pub logout_timeout: Duration,
    /// Origins allowed to call the API with credentials.
    pub cors_origins: Vec<String>,
    pub mailer: MailerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: DEVELOPMENT_ENV.to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            redis_url: None,
            session_duration_days: 7,
            logout_timeout: Duration::from_millis(5000),
            cors_origins: vec!["http://localhost:3000".to_string()],
            mailer: MailerConfig::default(),
        }
    }
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let environment = env::var("APP_ENV").unwrap_or(defaults.environment);

        let redis_url = env::var("REDIS_URL").ok().filter(|url| !url.trim().is_empty());
        if redis_url.is_none() && environment != DEVELOPMENT_ENV {
            anyhow::bail!("REDIS_URL must be set outside development");
        }

        let bind_addr = match env::var("BIND_ADDR") {
            Ok(addr) => addr.parse().context("Invalid BIND_ADDR")?,
            Err(_) => defaults.bind_addr,
        };

        let logout_timeout_ms: u64 = env::var("LOGOUT_TIMEOUT_MS")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .context("Invalid LOGOUT_TIMEOUT_MS")?;

        let cors_origins = match env::var("CORS_ORIGINS") {
            Ok(origins) => parse_list(&origins),
            Err(_) => defaults.cors_origins,
        };

        let mailer_defaults = defaults.mailer;
        let mailer = MailerConfig {
            api_key: env::var("BREVO_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty())
                .map(Zeroizing::new),
            api_base: env::var("BREVO_API_BASE").unwrap_or(mailer_defaults.api_base),
            sender_email: env::var("BREVO_SENDER_EMAIL").unwrap_or(mailer_defaults.sender_email),
            sender_name: env::var("BREVO_SENDER_NAME").unwrap_or(mailer_defaults.sender_name),
        };

        Ok(Self {
            environment,
            bind_addr,
            redis_url,
            session_duration_days: parse_session_duration_days(
                &env::var("SESSION_DURATION_DAYS").unwrap_or_else(|_| "7".to_string()),
            )?,
            logout_timeout: Duration::from_millis(logout_timeout_ms),
            cors_origins,
            mailer,
        })
    }

    /// Whether cookies must carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.environment != DEVELOPMENT_ENV
    }

    /// The session lifetime as a `chrono` duration.
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.session_duration_days.clamp(1, MAX_SESSION_DURATION_DAYS))
    }
}

fn parse_session_duration_days(raw: &str) -> Result<i64> {
    let days: i64 = raw.trim().parse().context("Invalid SESSION_DURATION_DAYS")?;
    if !(1..=MAX_SESSION_DURATION_DAYS).contains(&days) {
        anyhow::bail!(
            "SESSION_DURATION_DAYS must be between 1 and {} (got {})",
            MAX_SESSION_DURATION_DAYS,
            days
        );
    }
    Ok(days)
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
