use std::env;
use std::path::PathBuf;
use std::time::Duration;
use crate::error::{AppError, Result};

pub const DEFAULT_THEATERS_URL: &str = "http://www.myapifilms.com/imdb/inTheaters";
pub const DEFAULT_OMDB_URL: &str = "http://www.omdbapi.com/";
pub const DEFAULT_WIKIPEDIA_URL: &str = "https://en.wikipedia.org/w/api.php";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct Config {
    pub theaters_url: String,
    pub myapifilms_token: Option<String>,
    pub omdb_url: String,
    pub omdb_api_key: Option<String>,
    pub wikipedia_url: String,
    pub request_timeout: Duration,
    pub chart_font: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset or blank keys take defaults.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let or_default = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let timeout_secs = match var("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                AppError::ConfigError(format!("Invalid HTTP_TIMEOUT_SECS: {}", e))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Config {
            theaters_url: or_default("THEATERS_API_URL", DEFAULT_THEATERS_URL),
            myapifilms_token: var("MYAPIFILMS_TOKEN"),
            omdb_url: or_default("OMDB_API_URL", DEFAULT_OMDB_URL),
            omdb_api_key: var("OMDB_API_KEY"),
            wikipedia_url: or_default("WIKIPEDIA_API_URL", DEFAULT_WIKIPEDIA_URL),
            request_timeout: Duration::from_secs(timeout_secs),
            chart_font: var("CHART_FONT_PATH").map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.theaters_url, DEFAULT_THEATERS_URL);
        assert_eq!(config.omdb_url, DEFAULT_OMDB_URL);
        assert_eq!(config.wikipedia_url, DEFAULT_WIKIPEDIA_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.omdb_api_key.is_none());
        assert!(config.myapifilms_token.is_none());
        assert!(config.chart_font.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("OMDB_API_KEY", "abc123"),
            ("WIKIPEDIA_API_URL", "http://localhost:9000/w/api.php"),
            ("HTTP_TIMEOUT_SECS", " 5 "),
            ("CHART_FONT_PATH", "/usr/share/fonts/NotoSans-Regular.ttf"),
        ])
        .unwrap();
        assert_eq!(
            config.chart_font,
            Some(PathBuf::from("/usr/share/fonts/NotoSans-Regular.ttf"))
        );
        assert_eq!(config.omdb_api_key.as_deref(), Some("abc123"));
        assert_eq!(config.wikipedia_url, "http://localhost:9000/w/api.php");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = config_from(&[("OMDB_API_KEY", "  "), ("OMDB_API_URL", "")]).unwrap();
        assert!(config.omdb_api_key.is_none());
        assert_eq!(config.omdb_url, DEFAULT_OMDB_URL);
    }

    #[test]
    fn test_invalid_timeout() {
        match config_from(&[("HTTP_TIMEOUT_SECS", "soon")]) {
            Err(AppError::ConfigError(msg)) => assert!(msg.contains("HTTP_TIMEOUT_SECS")),
            other => panic!("Expected ConfigError, got {:?}", other),
        }
    }
}
