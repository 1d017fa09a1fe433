use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const API_URL_VAR: &str = "STUDY_RADAR_API_URL";
pub const LOG_PATH_VAR: &str = "STUDY_RADAR_LOG";
pub const TIMEOUT_VAR: &str = "STUDY_RADAR_TIMEOUT_SECS";

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_LOG_PATH: &str = "study-radar.log";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{TIMEOUT_VAR} must be a whole number of seconds, got `{0}`")]
    InvalidTimeout(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_url: String,
    pub log_path: PathBuf,
    /// `None` waits for the backend indefinitely.
    pub timeout: Option<Duration>,
}

/// Loads `.env` and reads the configuration from the environment.
pub fn init_app_config() -> Result<AppConfig, ConfigError> {
    dotenv().ok();
    AppConfig::from_lookup(|key| env::var(key).ok())
}

impl AppConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = lookup(API_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let log_path = lookup(LOG_PATH_VAR)
            .filter(|path| !path.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_LOG_PATH), PathBuf::from);

        // 0 means no timeout
        let timeout = match lookup(TIMEOUT_VAR) {
            Some(raw) if !raw.trim().is_empty() => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            _ => None,
        };

        Ok(Self {
            api_url,
            log_path,
            timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect::<HashMap<_, _>>();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config(&[]).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.log_path, PathBuf::from(DEFAULT_LOG_PATH));
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = config(&[
            (API_URL_VAR, "http://progress.internal:8080/app"),
            (LOG_PATH_VAR, "/tmp/radar.log"),
            (TIMEOUT_VAR, "15"),
        ])
        .unwrap();
        assert_eq!(config.api_url, "http://progress.internal:8080/app");
        assert_eq!(config.log_path, PathBuf::from("/tmp/radar.log"));
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn zero_timeout_disables_it() {
        assert_eq!(config(&[(TIMEOUT_VAR, "0")]).unwrap().timeout, None);
    }

    #[test]
    fn malformed_timeout_is_rejected() {
        assert_eq!(
            config(&[(TIMEOUT_VAR, "soon")]),
            Err(ConfigError::InvalidTimeout("soon".to_string()))
        );
    }
}
