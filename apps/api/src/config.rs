use anyhow::{Context, Result};
use tracing::warn;

const DEFAULT_APP_NAME: &str = "Executive Hiring Notification System";

/// Application configuration loaded from environment variables.
/// Everything has a default; mail delivery is enabled only when its
/// settings are complete.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Deployment tag; `production` hides internal error details.
    pub environment: String,
    pub app_name: String,
    pub data_dir: String,
    pub email: Option<EmailSettings>,
}

#[derive(Debug, Clone)]
pub struct EmailSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

impl Config {
    /// Reads the process environment. `.env` is loaded by `main` before
    /// logging starts, so `RUST_LOG` from the file applies too.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            port: get("PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            environment: get("APP_ENV").unwrap_or_else(|| "development".to_string()),
            app_name: get("APP_NAME").unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
            data_dir: get("DATA_DIR").unwrap_or_else(|| "data".to_string()),
            email: email_settings(&get)?,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

fn email_settings<F>(get: &F) -> Result<Option<EmailSettings>>
where
    F: Fn(&str) -> Option<String>,
{
    let (host, username, password) = match (get("EMAIL_HOST"), get("EMAIL_USER"), get("EMAIL_PASS")) {
        (Some(host), Some(user), Some(pass)) => (host, user, pass),
        (None, None, None) => return Ok(None),
        _ => {
            warn!("Incomplete email configuration (EMAIL_HOST, EMAIL_USER and EMAIL_PASS are all required)");
            return Ok(None);
        }
    };

    let port = get("EMAIL_PORT")
        .map(|p| p.parse::<u16>())
        .transpose()
        .context("EMAIL_PORT must be a valid port number")?
        .unwrap_or(587);

    Ok(Some(EmailSettings {
        from: get("EMAIL_FROM").unwrap_or_else(|| username.clone()),
        host,
        port,
        username,
        password,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let c = config(&[]).unwrap();
        assert_eq!(c.port, 3000);
        assert_eq!(c.environment, "development");
        assert_eq!(c.app_name, DEFAULT_APP_NAME);
        assert_eq!(c.data_dir, "data");
        assert!(c.email.is_none());
        assert!(!c.is_production());
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        assert!(config(&[("PORT", "eighty")]).is_err());
        assert!(config(&[
            ("EMAIL_HOST", "smtp.x.com"),
            ("EMAIL_USER", "u@x.com"),
            ("EMAIL_PASS", "p"),
            ("EMAIL_PORT", "abc"),
        ])
        .is_err());
    }

    #[test]
    fn test_complete_email_settings() {
        let c = config(&[
            ("EMAIL_HOST", "smtp.x.com"),
            ("EMAIL_USER", "u@x.com"),
            ("EMAIL_PASS", "p"),
        ])
        .unwrap();
        let email = c.email.unwrap();
        assert_eq!(email.port, 587);
        assert_eq!(email.from, "u@x.com");
    }

    #[test]
    fn test_explicit_from_and_port() {
        let c = config(&[
            ("EMAIL_HOST", "smtp.x.com"),
            ("EMAIL_PORT", "2525"),
            ("EMAIL_USER", "u@x.com"),
            ("EMAIL_PASS", "p"),
            ("EMAIL_FROM", "hiring@x.com"),
        ])
        .unwrap();
        let email = c.email.unwrap();
        assert_eq!(email.port, 2525);
        assert_eq!(email.from, "hiring@x.com");
    }

    #[test]
    fn test_partial_email_settings_disable_mail() {
        let c = config(&[("EMAIL_HOST", "smtp.x.com"), ("EMAIL_PASS", "")]).unwrap();
        assert!(c.email.is_none());
    }

    #[test]
    fn test_production_tag() {
        assert!(config(&[("APP_ENV", "Production")]).unwrap().is_production());
    }
}
