//! Upstream payload shapes
//!
//! The proxy treats upstream responses as opaque JSON wherever possible.
//! These types cover only the parts the orchestrator must traverse: juz verse
//! mappings, verse listings, translations, and pagination. Unknown fields are
//! preserved through `serde_json::Value` passthrough.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// == Chapters ==
/// Envelope of `GET /chapters/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChapterEnvelope {
    pub chapter: Value,
}

// == Juzs ==
/// Envelope of `GET /juzs`.
#[derive(Debug, Clone, Deserialize)]
pub struct JuzsEnvelope {
    pub juzs: Vec<Juz>,
}

/// One juz grouping: a juz number plus a per-chapter verse-range mapping
/// (chapter id, as a string key, to `"first-last"` verse numbers).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Juz {
    pub juz_number: u32,
    #[serde(default)]
    pub verse_mapping: HashMap<String, String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Juz {
    /// Whether this juz contains any verses of the given chapter.
    pub fn contains_chapter(&self, chapter_id: u32) -> bool {
        self.verse_mapping.contains_key(&chapter_id.to_string())
    }
}

// == Verses ==
/// Envelope of the paginated verse listings (`/verses/by_juz/...`,
/// `/quran/verses/{script}?chapter_number=...`).
#[derive(Debug, Clone, Deserialize)]
pub struct VersesEnvelope {
    #[serde(default)]
    pub verses: Vec<ScriptVerse>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// A verse in one script rendering. The text field name varies by script
/// (`text_uthmani`, `text_indopak`), so fields stay flattened.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptVerse {
    pub verse_key: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ScriptVerse {
    /// Chapter id parsed from the `chapter:verse` key.
    pub fn chapter_id(&self) -> Option<u32> {
        self.verse_key.split(':').next()?.parse().ok()
    }

    /// Script text under the `text_{script}` field.
    pub fn text(&self, script: &str) -> Option<&str> {
        self.fields
            .get(&format!("text_{}", script))
            .and_then(Value::as_str)
    }
}

/// Upstream pagination block.
#[derive(Debug, Clone, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub next_page: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub total_records: Option<u64>,
}

// == Translations ==
/// Envelope of `GET /quran/translations/{resource_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TranslationsEnvelope {
    #[serde(default)]
    pub translations: Vec<TranslationItem>,
}

/// One translated verse. Items arrive in verse order without keys; callers
/// map them to `chapter:verse` keys by position.
#[derive(Debug, Clone, Deserialize)]
pub struct TranslationItem {
    pub text: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
