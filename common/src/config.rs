//! Application configuration.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the working directory.

use std::str::FromStr;

use crate::errors::{AppError, AppResult};

const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
const DEFAULT_SERVER_PORT: u16 = 8080;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format: {}", other)),
        }
    }
}

/// Values pre-filled into the login form.
#[derive(Debug, Clone)]
pub struct FormDefaults {
    pub db_host: String,
    pub db_port: String,
    pub db_user: String,
}

impl Default for FormDefaults {
    fn default() -> Self {
        Self {
            db_host: "localhost".to_string(),
            db_port: "3306".to_string(),
            db_user: "root".to_string(),
        }
    }
}

/// Process-wide configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Service name used in logs and API responses.
    pub service_name: String,
    /// Address the HTTP listener binds to.
    pub host: String,
    /// Port the HTTP listener binds to.
    pub port: u16,
    /// Upper bound for a single connect attempt to the database server.
    pub connect_timeout_secs: u64,
    pub form_defaults: FormDefaults,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service_name: "workbench".to_string(),
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            form_defaults: FormDefaults::default(),
            log_format: LogFormat::Text,
        }
    }
}

impl AppConfig {
    /// Loads configuration for the named service.
    ///
    /// A missing `.env` file is not an error; unset variables keep their
    /// defaults.
    ///
    /// # Errors
    /// `AppError::Config` when a variable is set but cannot be parsed.
    pub fn load_with_service(service_name: &str) -> AppResult<Self> {
        // .env 文件不存在时忽略
        let _ = dotenvy::dotenv();

        let defaults = Self::default();
        let form = FormDefaults::default();

        Ok(Self {
            service_name: service_name.to_string(),
            host: env_string("SERVER_HOST").unwrap_or(defaults.host),
            port: env_parsed("SERVER_PORT")?.unwrap_or(defaults.port),
            connect_timeout_secs: env_parsed("DB_CONNECT_TIMEOUT_SECS")?
                .unwrap_or(defaults.connect_timeout_secs),
            form_defaults: FormDefaults {
                db_host: env_string("DEFAULT_DB_HOST").unwrap_or(form.db_host),
                db_port: env_string("DEFAULT_DB_PORT").unwrap_or(form.db_port),
                db_user: env_string("DEFAULT_DB_USER").unwrap_or(form.db_user),
            },
            log_format: env_parsed("LOG_FORMAT")?.unwrap_or(defaults.log_format),
        })
    }

    /// Returns the listener address as `host:port`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parsed<T>(key: &str) -> AppResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = env_string(key) else {
        return Ok(None);
    };
    raw.parse()
        .map(Some)
        .map_err(|e| AppError::Config(format!("{}={}: {}", key, raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_login_form() {
        let config = AppConfig::default();
        assert_eq!(config.form_defaults.db_host, "localhost");
        assert_eq!(config.form_defaults.db_port, "3306");
        assert_eq!(config.form_defaults.db_user, "root");
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!(" text ".parse::<LogFormat>(), Ok(LogFormat::Text));
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_unparseable_variable_is_config_error() {
        std::env::set_var("WORKBENCH_TEST_TIMEOUT", "ten");
        let err = env_parsed::<u64>("WORKBENCH_TEST_TIMEOUT").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("WORKBENCH_TEST_TIMEOUT=ten"));

        std::env::remove_var("WORKBENCH_TEST_TIMEOUT");
        assert!(env_parsed::<u64>("WORKBENCH_TEST_TIMEOUT").unwrap().is_none());
    }
}
