//! Snippet entity and the closed set of language tags.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Language tag attached to a snippet.
///
/// The set is closed: nothing outside these variants can be stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Text,
    Javascript,
    Python,
    Java,
    Csharp,
    Php,
}

impl Language {
    /// Every accepted language, in declaration order.
    pub const ALL: [Language; 6] = [
        Language::Text,
        Language::Javascript,
        Language::Python,
        Language::Java,
        Language::Csharp,
        Language::Php,
    ];

    /// Wire name of this language.
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Text => "text",
            Language::Javascript => "javascript",
            Language::Python => "python",
            Language::Java => "java",
            Language::Csharp => "csharp",
            Language::Php => "php",
        }
    }

    /// Resolve a wire name. Matching is exact and case-sensitive.
    ///
    /// # Returns
    /// `Some(language)` for one of the six accepted names, otherwise `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|language| language.as_str() == name)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored snippet as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub id: String,
    pub title: String,
    pub code: String,
    pub language: Language,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for a snippet that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSnippet {
    pub title: String,
    pub code: String,
    pub language: Language,
}

/// Response body for a successful create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedSnippet {
    pub id: String,
}
