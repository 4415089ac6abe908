use reqwest::StatusCode;
use reqwest::blocking::{Client, ClientBuilder};
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::{LookupError, Result};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Anything that can answer a GET with a JSON document.
pub trait JsonSource {
    fn get_json(&self, url: &str) -> std::result::Result<Value, LookupError>;
}

/// Blocking HTTP client shared by every lookup of a run.
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = builder(config).build()?;

        Ok(HttpClient { client })
    }
}

fn builder(config: &Config) -> ClientBuilder {
    ClientBuilder::new()
        .timeout(config.request_timeout)
        .user_agent(USER_AGENT)
}

impl JsonSource for HttpClient {
    fn get_json(&self, url: &str) -> std::result::Result<Value, LookupError> {
        debug!(url, "GET");
        let response = self.client.get(url).send()?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(LookupError::Status(status.as_u16()));
        }

        let body = response.text()?;
        serde_json::from_str(&body).map_err(|e| LookupError::Malformed(e.to_string()))
    }
}

/// Appends query parameters to `base`. Values must already be URL-safe.
pub fn build_url(base: &str, params: &[(&str, &str)]) -> String {
    let mut url = String::with_capacity(base.len() + params.len() * 16);
    url.push_str(base);

    let mut separator = if base.contains('?') { '&' } else { '?' };
    for (key, value) in params {
        url.push(separator);
        url.push_str(key);
        url.push('=');
        url.push_str(value);
        separator = '&';
    }
    url
}
