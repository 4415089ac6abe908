use once_cell::sync::Lazy;
use regex::Regex;

use crate::client::{JsonSource, build_url};
use crate::config::Config;
use crate::error::LookupError;
use crate::lookup::models::QueryResponse;

// First run of digits after the template opening of the infobox birth_date field.
static BIRTH_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\| birth_date\s*=\s*\{\{.*?\|(\d+).*\}\}")
        .expect("Failed to compile birth date pattern")
});

pub trait AgeResolver {
    /// Age of the actor whose normalized name is `normalized_name`.
    fn resolve_age(&self, normalized_name: &str) -> Result<i32, LookupError>;
}

/// Wiki page title form of an actor name: trimmed, underscores for spaces, percent-encoded.
pub fn normalize_actor_name(name: &str) -> String {
    urlencoding::encode(&name.trim().replace(' ', "_")).into_owned()
}

/// Best-effort birth year from infobox wikitext.
///
/// Only the first single-line `birth_date = {{...}}` field is considered, and
/// the year is the first parameter inside the template that starts with a
/// digit. Named parameters such as `df=yes` are skipped, but any other bare
/// number placed before the year is taken as the year. Nothing here checks
/// plausibility, but a digit run too long for an `i32` counts as no match.
pub fn extract_birth_year(wikitext: &str) -> Option<i32> {
    BIRTH_DATE
        .captures(wikitext)?
        .get(1)?
        .as_str()
        .parse()
        .ok()
}

/// Age lookups against a MediaWiki action API.
pub struct WikipediaAgeResolver<'a, S: ?Sized> {
    source: &'a S,
    url: String,
    current_year: i32,
}

impl<'a, S: JsonSource + ?Sized> WikipediaAgeResolver<'a, S> {
    pub fn new(source: &'a S, config: &Config, current_year: i32) -> Self {
        WikipediaAgeResolver {
            source,
            url: config.wikipedia_url.clone(),
            current_year,
        }
    }

    fn article_intro(&self, normalized_name: &str) -> Result<String, LookupError> {
        let url = build_url(
            &self.url,
            &[
                ("action", "query"),
                ("prop", "revisions"),
                ("rvprop", "content"),
                ("rvslots", "main"),
                ("format", "json"),
                ("rvsection", "0"),
                ("titles", normalized_name),
            ],
        );

        let value = self.source.get_json(&url)?;
        let response: QueryResponse =
            serde_json::from_value(value).map_err(|e| LookupError::Malformed(e.to_string()))?;

        let page = response
            .query
            .pages
            .into_values()
            .next()
            .ok_or_else(|| LookupError::Malformed("no pages in response".to_string()))?;
        if !page.exists() {
            return Err(LookupError::NotFound);
        }

        page.revisions
            .first()
            .and_then(|revision| revision.text())
            .map(str::to_string)
            .ok_or_else(|| LookupError::Malformed("page has no revision text".to_string()))
    }
}

impl<S: JsonSource + ?Sized> AgeResolver for WikipediaAgeResolver<'_, S> {
    fn resolve_age(&self, normalized_name: &str) -> Result<i32, LookupError> {
        let intro = self.article_intro(normalized_name)?;
        let birth_year = extract_birth_year(&intro).ok_or(LookupError::NoBirthDate)?;
        Ok(self.current_year - birth_year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::ScriptedSource;
    use serde_json::json;

    const AMY_ADAMS: &str = "{{Infobox person
| name = Amy Adams
| birth_name = Amy Lou Adams
| birth_date = {{birth date and age|1974|8|20}}
| birth_place = [[Vicenza]], Italy
}}";

    fn config() -> Config {
        Config::from_vars(|key| match key {
            "WIKIPEDIA_API_URL" => Some("http://wiki.test/w/api.php".to_string()),
            _ => None,
        })
        .unwrap()
    }

    fn page(text: &str) -> serde_json::Value {
        json!({"batchcomplete": "", "query": {"pages": {"1234": {
            "pageid": 1234, "ns": 0, "title": "Amy Adams",
            "revisions": [{"contentformat": "text/x-wiki", "*": text}]
        }}}})
    }

    #[test]
    fn test_extract_birth_year() {
        assert_eq!(extract_birth_year(AMY_ADAMS), Some(1974));
        assert_eq!(
            extract_birth_year("| birth_date={{Birth date and age|df=yes|1962|7|3}}"),
            Some(1962)
        );
    }

    #[test]
    fn test_extract_birth_year_absent() {
        assert_eq!(extract_birth_year("| name = Nobody\n| occupation = Actor"), None);
        assert_eq!(extract_birth_year("| birth_date = 20 August 1974"), None);
        assert_eq!(extract_birth_year(""), None);
    }

    #[test]
    fn test_extract_birth_year_overflow_is_no_match() {
        assert_eq!(extract_birth_year("| birth_date = {{birth date|99999999999|1|1}}"), None);
        assert_eq!(extract_birth_year("| birth_date = {{birth date|0001|1|1}}"), Some(1));
    }

    #[test]
    fn test_extract_birth_year_does_not_span_lines() {
        let text = "| birth_date = {{birth date and age\n|1974|8|20}}";
        assert_eq!(extract_birth_year(text), None);
    }

    #[test]
    fn test_normalize_actor_name() {
        assert_eq!(normalize_actor_name("Amy Adams"), "Amy_Adams");
        assert_eq!(normalize_actor_name(" Penélope Cruz "), "Pen%C3%A9lope_Cruz");
        assert_eq!(normalize_actor_name("Lupita Nyong'o"), "Lupita_Nyong%27o");
    }

    #[test]
    fn test_percent_encoding_round_trip() {
        for name in ["Penélope Cruz", "Zhang Ziyi 章子怡", "Chloë Grace Moretz"] {
            let encoded = urlencoding::encode(name);
            assert!(!encoded.contains(' '));
            assert_eq!(urlencoding::decode(&encoded).unwrap(), name);

            let normalized = normalize_actor_name(name);
            assert_eq!(urlencoding::decode(&normalized).unwrap(), name.replace(' ', "_"));
        }
    }

    #[test]
    fn test_resolve_age() {
        let source = ScriptedSource::new().reply("titles=Amy_Adams", page(AMY_ADAMS));
        let resolver = WikipediaAgeResolver::new(&source, &config(), 2016);

        assert_eq!(resolver.resolve_age("Amy_Adams"), Ok(42));
        assert_eq!(
            source.requests.borrow()[0],
            concat!(
                "http://wiki.test/w/api.php?action=query&prop=revisions&rvprop=content",
                "&rvslots=main&format=json&rvsection=0&titles=Amy_Adams"
            )
        );
    }

    #[test]
    fn test_resolve_age_from_main_slot() {
        let source = ScriptedSource::new().reply(
            "titles=Amy_Adams",
            json!({"query": {"pages": {"1234": {
                "revisions": [{"slots": {"main": {"*": AMY_ADAMS}}}]
            }}}}),
        );
        let resolver = WikipediaAgeResolver::new(&source, &config(), 2024);
        assert_eq!(resolver.resolve_age("Amy_Adams"), Ok(50));
    }

    #[test]
    fn test_missing_page_is_not_found() {
        let source = ScriptedSource::new().reply(
            "titles=Nobody",
            json!({"query": {"pages": {"-1": {"ns": 0, "title": "Nobody", "missing": ""}}}}),
        );
        let resolver = WikipediaAgeResolver::new(&source, &config(), 2016);
        assert_eq!(resolver.resolve_age("Nobody"), Err(LookupError::NotFound));
    }

    #[test]
    fn test_article_without_birth_date() {
        let source = ScriptedSource::new()
            .reply("titles=Band", page("{{Infobox musical artist\n| name = Band\n}}"));
        let resolver = WikipediaAgeResolver::new(&source, &config(), 2016);
        assert_eq!(resolver.resolve_age("Band"), Err(LookupError::NoBirthDate));
    }

    #[test]
    fn test_failures_are_distinguished() {
        let source = ScriptedSource::new()
            .fail("titles=Down", LookupError::Transport("dns error".to_string()))
            .fail("titles=Busy", LookupError::Status(429))
            .reply("titles=Odd", json!({"warnings": {}}));
        let resolver = WikipediaAgeResolver::new(&source, &config(), 2016);

        assert!(matches!(resolver.resolve_age("Down"), Err(LookupError::Transport(_))));
        assert_eq!(resolver.resolve_age("Busy"), Err(LookupError::Status(429)));
        assert!(matches!(resolver.resolve_age("Odd"), Err(LookupError::Malformed(_))));
    }

    #[test]
    fn test_implausible_year_is_not_clamped() {
        let source = ScriptedSource::new()
            .reply("titles=Future", page("| birth_date = {{birth date|2100|1|1}}"));
        let resolver = WikipediaAgeResolver::new(&source, &config(), 2016);
        assert_eq!(resolver.resolve_age("Future"), Ok(-84));
    }
}
