use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration build error: {0}")]
    Build(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

#[derive(Deserialize)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

#[derive(Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub smtp: SmtpConfig,
    /// Base URL of the storefront. Reminder call-to-action links point back
    /// at `{storefront_url}/cart`.
    pub storefront_url: String,
    /// Seconds between dispatcher passes when the host uses
    /// [`crate::dispatcher::run_dispatch_loop`] instead of an external cron.
    #[serde(default = "default_dispatch_interval_secs")]
    pub dispatch_interval_secs: u64,
}

fn default_dispatch_interval_secs() -> u64 {
    300
}

/// Load application configuration from `config.yaml` + environment overrides.
///
/// Environment variable override convention: any var matching the key path
/// separated by double underscores (e.g. `SMTP__PORT`) overrides the file
/// value.
///
/// Returns a `ConfigError` instead of panicking so the caller can decide how
/// to fail.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    use config::{Config, Environment, File};
    let cfg = Config::builder()
        .add_source(File::with_name("config.yaml"))
        .add_source(Environment::default().separator("__"))
        .build()?;

    let app: AppConfig = cfg.try_deserialize()?;
    validate(&app)?;
    Ok(app)
}

fn validate(app: &AppConfig) -> Result<(), ConfigError> {
    if app.database_url.is_empty() {
        return Err(ConfigError::Validation("database_url must be set".into()));
    }
    if app.smtp.port == 0 {
        return Err(ConfigError::Validation("smtp.port must be > 0".into()));
    }
    if app.storefront_url.is_empty() {
        return Err(ConfigError::Validation("storefront_url must be set".into()));
    }
    if app.dispatch_interval_secs == 0 {
        return Err(ConfigError::Validation(
            "dispatch_interval_secs must be > 0".into(),
        ));
    }
    Ok(())
}

/// Convenience helper for hosts wanting panic-on-error behaviour.
pub fn load_config_or_panic() -> AppConfig {
    match load_config() {
        Ok(c) => c,
        Err(e) => panic!("Failed to load configuration: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        AppConfig {
            database_url: "postgres://localhost/marketplace".into(),
            smtp: SmtpConfig {
                server: "smtp.example.com".into(),
                port: 587,
                username: "mailer".into(),
                password: "secret".into(),
                from: "Marketplace <no-reply@example.com>".into(),
            },
            storefront_url: "https://shop.example.com".into(),
            dispatch_interval_secs: 300,
        }
    }

    #[test]
    fn accepts_valid_config() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn rejects_zero_smtp_port() {
        let mut cfg = valid_config();
        cfg.smtp.port = 0;
        assert!(matches!(
            validate(&cfg),
            Err(ConfigError::Validation(msg)) if msg.contains("smtp.port")
        ));
    }

    #[test]
    fn rejects_empty_storefront_url() {
        let mut cfg = valid_config();
        cfg.storefront_url.clear();
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn rejects_zero_dispatch_interval() {
        let mut cfg = valid_config();
        cfg.dispatch_interval_secs = 0;
        assert!(validate(&cfg).is_err());
    }
}
