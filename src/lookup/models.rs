use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
pub struct TheaterEntry {
    #[serde(default)]
    pub movies: Vec<TheaterMovie>,
}

#[derive(Debug, Deserialize)]
pub struct TheaterMovie {
    #[serde(rename = "originalTitle", default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl TheaterMovie {
    /// The original-language title when the listing has one, else the local title.
    pub fn display_title(&self) -> Option<&str> {
        self.original_title
            .as_deref()
            .filter(|t| !t.is_empty())
            .or_else(|| self.title.as_deref().filter(|t| !t.is_empty()))
    }
}

#[derive(Debug, Deserialize)]
pub struct TitleResponse {
    #[serde(rename = "Actors", default)]
    pub actors: Option<String>,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    pub query: Query,
}

#[derive(Debug, Deserialize)]
pub struct Query {
    pub pages: BTreeMap<String, Page>,
}

#[derive(Debug, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub missing: Option<Value>,
    #[serde(default)]
    pub invalid: Option<Value>,
    #[serde(default)]
    pub revisions: Vec<Revision>,
}

impl Page {
    pub fn exists(&self) -> bool {
        self.missing.is_none() && self.invalid.is_none()
    }
}

#[derive(Debug, Deserialize)]
pub struct Revision {
    #[serde(rename = "*", default)]
    pub content: Option<String>,
    #[serde(default)]
    pub slots: Option<Slots>,
}

#[derive(Debug, Deserialize)]
pub struct Slots {
    pub main: SlotContent,
}

#[derive(Debug, Deserialize)]
pub struct SlotContent {
    #[serde(rename = "*", default)]
    pub content: Option<String>,
}

impl Revision {
    /// Raw wikitext, from either the legacy field or the `main` slot.
    pub fn text(&self) -> Option<&str> {
        self.content
            .as_deref()
            .or_else(|| self.slots.as_ref().and_then(|s| s.main.content.as_deref()))
    }
}
