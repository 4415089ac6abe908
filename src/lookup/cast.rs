use tracing::debug;

use crate::client::{JsonSource, build_url};
use crate::config::Config;
use crate::error::LookupError;
use crate::lookup::models::TitleResponse;

pub trait CastResolver {
    /// Cast of `title` as released in `reference_year`, or the year before.
    fn resolve_cast(&self, title: &str, reference_year: i32) -> Result<Vec<String>, LookupError>;
}

/// Cast lookups against an OMDb-style film database.
pub struct OmdbCastResolver<'a, S: ?Sized> {
    source: &'a S,
    url: String,
    api_key: Option<String>,
}

impl<'a, S: JsonSource + ?Sized> OmdbCastResolver<'a, S> {
    pub fn new(source: &'a S, config: &Config) -> Self {
        OmdbCastResolver {
            source,
            url: config.omdb_url.clone(),
            api_key: config.omdb_api_key.clone(),
        }
    }

    fn lookup(&self, encoded_title: &str, year: i32) -> Result<TitleResponse, LookupError> {
        let year = year.to_string();
        let api_key = self.api_key.as_deref().map(urlencoding::encode);

        let mut params = vec![
            ("t", encoded_title),
            ("plot", "short"),
            ("r", "json"),
            ("y", year.as_str()),
        ];
        if let Some(key) = api_key.as_deref() {
            params.push(("apikey", key));
        }

        let value = self.source.get_json(&build_url(&self.url, &params))?;
        serde_json::from_value(value).map_err(|e| LookupError::Malformed(e.to_string()))
    }
}

impl<S: JsonSource + ?Sized> CastResolver for OmdbCastResolver<'_, S> {
    fn resolve_cast(&self, title: &str, reference_year: i32) -> Result<Vec<String>, LookupError> {
        let encoded = urlencoding::encode(title);

        let mut response = self.lookup(&encoded, reference_year)?;
        if let Some(error) = &response.error {
            debug!(title, year = reference_year, %error, "title not found, trying previous year");
            response = self.lookup(&encoded, reference_year - 1)?;
            if let Some(error) = &response.error {
                debug!(title, year = reference_year - 1, %error, "title not found");
                return Err(LookupError::NotFound);
            }
        }

        let actors = response.actors.ok_or_else(|| {
            LookupError::Malformed("response has neither Actors nor Error".to_string())
        })?;
        Ok(split_actors(&actors))
    }
}

/// Splits a comma-separated cast string, dropping one leading space per name.
pub fn split_actors(actors: &str) -> Vec<String> {
    actors
        .split(',')
        .map(|actor| actor.strip_prefix(' ').unwrap_or(actor))
        .filter(|actor| !actor.is_empty())
        .map(str::to_string)
        .collect()
}
