// config.rs
use std::env;
use std::str::FromStr;

use chrono::Duration;

use crate::errors::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailTransport {
    Smtp,
    Http,
    Log,
}

impl FromStr for MailTransport {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "smtp" => Ok(MailTransport::Smtp),
            "http" => Ok(MailTransport::Http),
            "log" | "" => Ok(MailTransport::Log),
            other => Err(AppError::configuration(format!(
                "MAIL_TRANSPORT must be smtp, http or log (got {})",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub transport: MailTransport,
    pub from: String,
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_tls: bool,
    pub api_url: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BootstrapHr {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub jwt_ttl: Duration,
    pub database_url: String,
    pub database_name: String,
    pub redis_url: Option<String>,
    pub otp_ttl: Duration,
    pub otp_retention: Duration,
    pub expose_otp_in_response: bool,
    pub bcrypt_cost: u32,
    pub mail: MailConfig,
    pub cors_origin: String,
    pub host: String,
    pub port: u16,
    pub bootstrap_hr: Option<BootstrapHr>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, so tests can feed a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret =
            get("JWT_SECRET").ok_or_else(|| AppError::configuration("JWT_SECRET must be set"))?;

        let bootstrap_hr = match (get("BOOTSTRAP_HR_EMAIL"), get("BOOTSTRAP_HR_PASSWORD")) {
            (Some(email), Some(password)) => Some(BootstrapHr {
                email,
                password,
                name: get("BOOTSTRAP_HR_NAME").unwrap_or_else(|| "HR Admin".to_string()),
            }),
            _ => None,
        };

        let bcrypt_cost: u32 = parse_or(&get, "BCRYPT_COST", 10)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(AppError::configuration("BCRYPT_COST must be between 4 and 31"));
        }

        Ok(AppConfig {
            jwt_secret,
            jwt_ttl: parse_secs(&get, "JWT_TTL_SECS", 3600, 1)?,
            database_url: get("DATABASE_URL")
                .unwrap_or_else(|| "mongodb://localhost:27017".to_string()),
            database_name: get("DATABASE_NAME").unwrap_or_else(|| "recruva".to_string()),
            redis_url: get("REDIS_URL"),
            otp_ttl: parse_secs(&get, "OTP_TTL_SECS", 300, 1)?,
            otp_retention: parse_secs(&get, "OTP_RETENTION_SECS", 3600, 0)?,
            expose_otp_in_response: parse_or(&get, "EXPOSE_OTP_IN_RESPONSE", false)?,
            bcrypt_cost,
            mail: MailConfig {
                transport: get("MAIL_TRANSPORT")
                    .map(|v| v.parse::<MailTransport>())
                    .transpose()?
                    .unwrap_or(MailTransport::Log),
                from: get("MAIL_FROM")
                    .unwrap_or_else(|| "Recruva <no-reply@recruva.local>".to_string()),
                smtp_host: get("SMTP_HOST"),
                smtp_port: parse_or(&get, "SMTP_PORT", 587)?,
                smtp_username: get("SMTP_USERNAME"),
                smtp_password: get("SMTP_PASSWORD"),
                smtp_tls: parse_or(&get, "SMTP_TLS", true)?,
                api_url: get("MAIL_API_URL"),
                api_key: get("MAIL_API_KEY"),
            },
            cors_origin: get("CORS_ORIGIN").unwrap_or_else(|| "*".to_string()),
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&get, "PORT", 5000)?,
            bootstrap_hr,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::configuration(format!("{} has an invalid value: {}", key, raw))),
        None => Ok(default),
    }
}

/// Upper bound for any configured lifetime, so `now + ttl` cannot overflow.
const MAX_SECS: i64 = 10 * 365 * 24 * 60 * 60;

fn parse_secs<G>(get: &G, key: &str, default: i64, min: i64) -> Result<Duration>
where
    G: Fn(&str) -> Option<String>,
{
    let secs: i64 = parse_or(get, key, default)?;
    if secs < min || secs > MAX_SECS {
        return Err(AppError::configuration(format!(
            "{} must be between {} and {} seconds (got {})",
            key, min, MAX_SECS, secs
        )));
    }
    Duration::try_seconds(secs)
        .ok_or_else(|| AppError::configuration(format!("{} is out of range: {}", key, secs)))
}
