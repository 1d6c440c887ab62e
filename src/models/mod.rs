//! Request, response, and upstream payload models
//!
//! This module defines the DTOs used for the proxy's own HTTP surface and
//! the minimally-typed shapes used to traverse upstream payloads.

pub mod requests;
pub mod responses;
pub mod upstream;

// Re-export commonly used types
pub use requests::{ChapterDetailQuery, RandomVerseQuery};
pub use responses::{CacheStatusResponse, ClearResponse, ErrorResponse, HealthResponse};
pub use upstream::{
    ChapterEnvelope, Juz, JuzsEnvelope, Pagination, ScriptVerse, TranslationItem,
    TranslationsEnvelope, VersesEnvelope,
};
