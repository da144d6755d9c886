//! RescueGroups.org source adapter
//!
//! API documentation: https://api.rescuegroups.org/v5/public/docs

use async_trait::async_trait;
use cutepets_domain::{AdoptablePet, PetSource, Species, SourceError};
use html_escape::decode_html_entities;
use regex::Regex;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::sync::LazyLock;
use std::time::Duration;

/// Descriptions longer than this are cut with a trailing ellipsis
const MAX_DESCRIPTION_CHARS: usize = 500;

static NAME_DELIMITER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*[*\-|]+\s*").expect("valid name delimiter pattern"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

static PROMO_BANNER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\*\*Home for the Holidays.*?\*\*").expect("valid promo banner pattern")
});

static THUMBNAIL_WIDTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\?width=\d+").expect("valid width suffix pattern"));

/// Configuration for the RescueGroups source
///
/// A constructor-supplied `api_key` takes precedence over the
/// environment variable named by `api_key_env`.
#[derive(Debug, Clone)]
pub struct RescueGroupsConfig {
    pub api_key: Option<SecretString>,
    pub api_key_env: String,
    pub postal_code: String,
    pub radius_miles: u32,
    pub species: Species,
    pub limit: u32,
    /// Display label only, e.g. "Boston, MA"
    pub location_label: String,
}

impl Default for RescueGroupsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: "CUTEPETSBOSTON_RESCUEGROUPS_API_KEY".to_string(),
            postal_code: "02108".to_string(),
            radius_miles: 50,
            species: Species::Dog,
            limit: 25,
            location_label: "Boston, MA".to_string(),
        }
    }
}

/// Fetches adoptable pets from the RescueGroups.org public search API
pub struct SourceRescueGroups {
    client: Client,
    config: RescueGroupsConfig,
    base_url: String,
}

impl SourceRescueGroups {
    pub fn new(config: RescueGroupsConfig) -> Self {
        Self::with_base_url(config, "https://api.rescuegroups.org".to_string())
    }

    pub fn with_base_url(config: RescueGroupsConfig, base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            config,
            base_url,
        }
    }

    /// Constructor value first, then the configured environment variable
    fn resolve_api_key(&self) -> Option<SecretString> {
        self.config.api_key.clone().or_else(|| {
            crate::env_value(&self.config.api_key_env).map(|v| SecretString::new(v.into()))
        })
    }

    /// Parse one animal record; malformed records are logged and dropped
    fn parse_animal(&self, record: AnimalRecord) -> Option<AdoptablePet> {
        let animal_id = record.id.clone().unwrap_or_else(|| "unknown".to_string());

        let attrs: AnimalAttributes = match serde_json::from_value(record.attributes) {
            Ok(attrs) => attrs,
            Err(e) => {
                tracing::warn!(animal_id = %animal_id, error = %e, "Failed to parse animal, skipping");
                return None;
            }
        };

        let name = clean_name(attrs.name.as_deref().unwrap_or("Unknown"));

        // Species comes from the endpoint we queried, not per-record data
        let species = self.config.species;

        let breed = attrs
            .breed_string
            .or(attrs.breed_primary)
            .unwrap_or_else(|| "Mixed".to_string());

        let description = clean_description(attrs.description_text.as_deref().unwrap_or(""));

        let adoption_url = attrs
            .slug
            .filter(|s| !s.is_empty())
            .map(|slug| format!("https://www.rescuegroups.org/pet/{}", slug));

        let image_url = attrs
            .picture_thumbnail_url
            .filter(|u| !u.is_empty())
            .map(|u| full_size_image_url(&u));

        Some(AdoptablePet {
            name,
            species,
            breed,
            location: self.config.location_label.clone(),
            description,
            adoption_url,
            image_url,
        })
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<AnimalRecord>,
}

#[derive(Deserialize)]
struct AnimalRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    attributes: serde_json::Value,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct AnimalAttributes {
    name: Option<String>,
    breed_string: Option<String>,
    breed_primary: Option<String>,
    description_text: Option<String>,
    slug: Option<String>,
    picture_thumbnail_url: Option<String>,
}

/// Strip promotional suffixes from a pet name
///
/// "Doli ***Home for the Holidays 1/2 price!" -> "Doli"
fn clean_name(name: &str) -> String {
    NAME_DELIMITER
        .split(name)
        .next()
        .unwrap_or(name)
        .trim()
        .to_string()
}

/// Decode entities, normalize whitespace, drop promo banners, cap length
fn clean_description(description: &str) -> String {
    if description.is_empty() {
        return String::new();
    }

    let text = decode_html_entities(description);
    let text = WHITESPACE_RUN.replace_all(&text, " ");
    let text = PROMO_BANNER.replace_all(&text, "");
    let text = text.trim();

    if text.chars().count() > MAX_DESCRIPTION_CHARS {
        let mut capped: String = text.chars().take(MAX_DESCRIPTION_CHARS - 3).collect();
        capped.push_str("...");
        capped
    } else {
        text.to_string()
    }
}

/// Drop the "?width=..." suffix to request the unscaled image
fn full_size_image_url(thumbnail: &str) -> String {
    THUMBNAIL_WIDTH.replace(thumbnail, "").to_string()
}

#[async_trait]
impl PetSource for SourceRescueGroups {
    fn source_name(&self) -> String {
        format!("RescueGroups ({})", self.config.species.endpoint())
    }

    async fn fetch_pets(&self) -> Result<Vec<AdoptablePet>, SourceError> {
        let Some(api_key) = self.resolve_api_key() else {
            return Err(SourceError::Config(format!(
                "RescueGroups API key not configured. Set the {} environment variable.",
                self.config.api_key_env
            )));
        };

        let url = format!(
            "{}/v5/public/animals/search/available/{}",
            self.base_url,
            self.config.species.endpoint()
        );

        tracing::info!(
            species = self.config.species.endpoint(),
            postal_code = %self.config.postal_code,
            radius_miles = self.config.radius_miles,
            limit = self.config.limit,
            "Fetching pets from RescueGroups"
        );

        let response = self
            .client
            .get(&url)
            .header("Authorization", api_key.expose_secret())
            .header("Content-Type", "application/vnd.api+json")
            .query(&[
                ("limit", self.config.limit.to_string()),
                ("postalcode", self.config.postal_code.clone()),
                ("radius", self.config.radius_miles.to_string()),
            ])
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Transport(format!(
                "RescueGroups returned {}: {}",
                status, body
            )));
        }

        let search: SearchResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        tracing::info!(count = search.data.len(), "Received animals from RescueGroups");

        let pets = search
            .data
            .into_iter()
            .filter_map(|record| self.parse_animal(record))
            .collect();

        Ok(pets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(api_key: Option<&str>) -> RescueGroupsConfig {
        RescueGroupsConfig {
            api_key: api_key.map(|k| SecretString::new(k.into())),
            // Deliberately unset so env cannot leak into tests
            api_key_env: "CUTEPETS_TEST_UNSET_RESCUEGROUPS_KEY".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_clean_name_strips_promotional_suffixes() {
        assert_eq!(
            clean_name("Doli ***Home for the Holidays 1/2 price!"),
            "Doli"
        );
        assert_eq!(
            clean_name("Cylana *Home for the holidays 1/2 price!"),
            "Cylana"
        );
        assert_eq!(clean_name("Rex - good boy"), "Rex");
        assert_eq!(clean_name("Luna | bonded pair"), "Luna");
        assert_eq!(clean_name("Kathy"), "Kathy");
        assert_eq!(clean_name("  Kathy  "), "Kathy");
    }

    #[test]
    fn test_clean_description_decodes_and_normalizes() {
        let cleaned = clean_description("She&#39;s a good\n\n  dog&nbsp;indeed");
        assert_eq!(cleaned, "She's a good dog indeed");
    }

    #[test]
    fn test_clean_description_strips_promo_banner() {
        let cleaned =
            clean_description("**home for the holidays 1/2 price!** A sweet senior girl.");
        assert_eq!(cleaned, "A sweet senior girl.");
    }

    #[test]
    fn test_clean_description_caps_at_500_chars() {
        let long = "word ".repeat(200);
        let cleaned = clean_description(&long);

        assert_eq!(cleaned.chars().count(), 500);
        assert!(cleaned.ends_with("..."));
    }

    #[test]
    fn test_short_description_is_untouched() {
        assert_eq!(clean_description("A sweet dog."), "A sweet dog.");
        assert_eq!(clean_description(""), "");
    }

    #[test]
    fn test_full_size_image_url() {
        assert_eq!(
            full_size_image_url("https://cdn.example.com/pic.jpg?width=100"),
            "https://cdn.example.com/pic.jpg"
        );
        assert_eq!(
            full_size_image_url("https://cdn.example.com/pic.jpg"),
            "https://cdn.example.com/pic.jpg"
        );
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_any_request() {
        let mock_server = MockServer::start().await;
        let source = SourceRescueGroups::with_base_url(test_config(None), mock_server.uri());

        let result = source.fetch_pets().await;

        assert!(matches!(result, Err(SourceError::Config(_))));
        assert!(
            mock_server
                .received_requests()
                .await
                .expect("request recording enabled")
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_fetch_parses_and_cleans_records() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v5/public/animals/search/available/dogs"))
            .and(header("Authorization", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [
                    {
                        "id": "101",
                        "attributes": {
                            "name": "Doli ***Home for the Holidays 1/2 price!",
                            "breedString": "Labrador Retriever Mix",
                            "descriptionText": "A &amp; sweet   girl.",
                            "slug": "doli-101",
                            "pictureThumbnailUrl": "https://cdn.example.com/doli.jpg?width=100"
                        }
                    },
                    {
                        "id": "102",
                        "attributes": {
                            "name": "Kathy",
                            "breedPrimary": "Beagle"
                        }
                    }
                ]
            })))
            .mount(&mock_server)
            .await;

        let source =
            SourceRescueGroups::with_base_url(test_config(Some("test-key")), mock_server.uri());

        let pets = source.fetch_pets().await.unwrap();

        assert_eq!(pets.len(), 2);

        assert_eq!(pets[0].name, "Doli");
        assert_eq!(pets[0].species, Species::Dog);
        assert_eq!(pets[0].breed, "Labrador Retriever Mix");
        assert_eq!(pets[0].description, "A & sweet girl.");
        assert_eq!(
            pets[0].adoption_url.as_deref(),
            Some("https://www.rescuegroups.org/pet/doli-101")
        );
        assert_eq!(
            pets[0].image_url.as_deref(),
            Some("https://cdn.example.com/doli.jpg")
        );

        assert_eq!(pets[1].name, "Kathy");
        assert_eq!(pets[1].breed, "Beagle");
        assert_eq!(pets[1].description, "");
        assert!(pets[1].adoption_url.is_none());
        assert!(pets[1].image_url.is_none());
    }

    #[tokio::test]
    async fn test_malformed_record_is_skipped_not_fatal() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v5/public/animals/search/available/dogs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [
                    { "id": "bad", "attributes": "not an object" },
                    {
                        "id": "103",
                        "attributes": { "name": "Cylana *Home for the holidays 1/2 price!" }
                    }
                ]
            })))
            .mount(&mock_server)
            .await;

        let source =
            SourceRescueGroups::with_base_url(test_config(Some("test-key")), mock_server.uri());

        let pets = source.fetch_pets().await.unwrap();

        assert_eq!(pets.len(), 1);
        assert_eq!(pets[0].name, "Cylana");
        assert_eq!(pets[0].breed, "Mixed");
    }

    #[tokio::test]
    async fn test_http_error_is_transport() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v5/public/animals/search/available/dogs"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let source =
            SourceRescueGroups::with_base_url(test_config(Some("test-key")), mock_server.uri());

        let result = source.fetch_pets().await;

        assert!(matches!(result, Err(SourceError::Transport(_))));
    }
}
