//! Domain models and value objects

use serde::{Deserialize, Serialize};
use std::fmt;

/// Species of an adoptable pet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    #[default]
    Dog,
    Cat,
}

impl Species {
    /// Singular form used in post text ("dog" / "cat")
    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Dog => "dog",
            Species::Cat => "cat",
        }
    }

    /// Plural form used by provider search endpoints ("dogs" / "cats")
    pub fn endpoint(&self) -> &'static str {
        match self {
            Species::Dog => "dogs",
            Species::Cat => "cats",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical, cleaned representation of one adoptable animal
///
/// Built fresh on every fetch and never mutated. `adoption_url` and
/// `image_url` are genuinely optional: absence is distinct from an
/// empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdoptablePet {
    /// Cleaned display name (promotional suffixes stripped)
    pub name: String,
    pub species: Species,
    /// Defaults to "Mixed" when the source omits it
    pub breed: String,
    /// Display label, not a structured address
    pub location: String,
    /// Cleaned, entity-decoded, whitespace-normalized, capped at 500 chars
    pub description: String,
    pub adoption_url: Option<String>,
    pub image_url: Option<String>,
}

impl AdoptablePet {
    /// A pet without an image cannot be posted
    pub fn is_postable(&self) -> bool {
        self.image_url.is_some()
    }
}

/// Platform-agnostic rendered content derived from a pet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub text: String,
    pub image_url: Option<String>,
    pub link: Option<String>,
    /// For image accessibility
    pub alt_text: Option<String>,
    /// Appended to text in listed order
    pub tags: Vec<String>,
}

/// Outcome of one publish attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostResult {
    pub success: bool,
    pub post_id: Option<String>,
    pub post_url: Option<String>,
    pub error_message: Option<String>,
}

impl PostResult {
    /// Successful publish without platform identifiers
    pub fn ok() -> Self {
        Self {
            success: true,
            post_id: None,
            post_url: None,
            error_message: None,
        }
    }

    /// Successful publish carrying whatever identifiers the platform returned
    pub fn published(post_id: Option<String>, post_url: Option<String>) -> Self {
        Self {
            success: true,
            post_id,
            post_url,
            error_message: None,
        }
    }

    /// Failed publish; the message is always present on failure
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            post_id: None,
            post_url: None,
            error_message: Some(message.into()),
        }
    }
}
