use tracing::debug;

use crate::client::{JsonSource, build_url};
use crate::config::Config;
use crate::error::LookupError;
use crate::lookup::models::TheaterEntry;

/// Client for the now-playing listing.
pub struct TheaterListing<'a, S: ?Sized> {
    source: &'a S,
    url: String,
    token: Option<String>,
}

impl<'a, S: JsonSource + ?Sized> TheaterListing<'a, S> {
    pub fn new(source: &'a S, config: &Config) -> Self {
        TheaterListing {
            source,
            url: config.theaters_url.clone(),
            token: config.myapifilms_token.clone(),
        }
    }

    /// Titles currently in theaters, in listing order. Duplicates are kept.
    pub fn now_playing(&self) -> Result<Vec<String>, LookupError> {
        let token = self.token.as_deref().map(urlencoding::encode);
        let mut params = Vec::new();
        if let Some(token) = token.as_deref() {
            params.push(("token", token));
        }

        let value = self.source.get_json(&build_url(&self.url, &params))?;
        let entries: Vec<TheaterEntry> =
            serde_json::from_value(value).map_err(|e| LookupError::Malformed(e.to_string()))?;

        let mut titles = Vec::new();
        for movie in entries.iter().flat_map(|entry| entry.movies.iter()) {
            match movie.display_title() {
                Some(title) => titles.push(title.to_string()),
                None => debug!("listing entry without a title skipped"),
            }
        }

        Ok(titles)
    }
}
