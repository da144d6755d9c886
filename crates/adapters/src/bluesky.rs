//! Bluesky (AT Protocol) poster adapter

use async_trait::async_trait;
use cutepets_domain::{Post, PostResult, SocialPoster};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::sync::Mutex;

use crate::env_value;

/// Bluesky caps posts at 300 characters
const MAX_POST_CHARS: usize = 300;

/// Credential resolution for the Bluesky poster
///
/// Constructor values win over the primary environment variables,
/// which win over the test fallbacks.
#[derive(Debug, Clone)]
pub struct BlueskyConfig {
    pub handle: Option<String>,
    pub password: Option<SecretString>,
    pub handle_env: String,
    pub handle_fallback_env: String,
    pub password_env: String,
    pub password_fallback_env: String,
    pub max_chars: usize,
}

impl Default for BlueskyConfig {
    fn default() -> Self {
        Self {
            handle: None,
            password: None,
            handle_env: "BLUESKY_HANDLE".to_string(),
            handle_fallback_env: "BLUESKY_TEST_HANDLE".to_string(),
            password_env: "BLUESKY_PASSWORD".to_string(),
            password_fallback_env: "BLUESKY_TEST_PASSWORD".to_string(),
            max_chars: MAX_POST_CHARS,
        }
    }
}

#[derive(Clone)]
struct Credentials {
    handle: String,
    password: SecretString,
}

#[derive(Clone)]
struct Session {
    access_jwt: String,
    did: String,
}

/// Publishes posts as app.bsky.feed.post records, uploading the image
/// blob first when the post carries one
pub struct PosterBluesky {
    client: Client,
    base_url: String,
    credentials: Option<Credentials>,
    /// Cached session; the only mutable state this adapter holds
    session: Mutex<Option<Session>>,
    max_chars: usize,
}

impl PosterBluesky {
    pub fn new(config: BlueskyConfig) -> Self {
        Self::with_base_url(config, "https://bsky.social".to_string())
    }

    pub fn with_base_url(config: BlueskyConfig, base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        let handle = config
            .handle
            .clone()
            .or_else(|| env_value(&config.handle_env))
            .or_else(|| env_value(&config.handle_fallback_env));
        let password = config
            .password
            .clone()
            .or_else(|| env_value(&config.password_env).map(|v| SecretString::new(v.into())))
            .or_else(|| {
                env_value(&config.password_fallback_env).map(|v| SecretString::new(v.into()))
            });

        let credentials = match (handle, password) {
            (Some(handle), Some(password)) => Some(Credentials { handle, password }),
            _ => None,
        };

        Self {
            client,
            base_url,
            credentials,
            session: Mutex::new(None),
            max_chars: config.max_chars,
        }
    }

    async fn create_session(&self, creds: &Credentials) -> Result<Session, String> {
        let url = format!("{}/xrpc/com.atproto.server.createSession", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "identifier": creds.handle,
                "password": creds.password.expose_secret(),
            }))
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(format!("createSession returned {}: {}", status, body));
        }

        let session: SessionResponse = response.json().await.map_err(|e| e.to_string())?;

        match (session.access_jwt, session.did) {
            (Some(access_jwt), Some(did)) if !access_jwt.is_empty() && !did.is_empty() => {
                Ok(Session { access_jwt, did })
            }
            _ => Err("createSession response missing token or DID".to_string()),
        }
    }

    /// Fetch the image bytes and upload them as a blob; the returned
    /// value is the opaque blob reference to embed in the record
    async fn upload_image(
        &self,
        session: &Session,
        image_url: &str,
    ) -> Result<serde_json::Value, String> {
        let image_response = self
            .client
            .get(image_url)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !image_response.status().is_success() {
            return Err(format!(
                "image download returned {}",
                image_response.status()
            ));
        }

        let bytes = image_response.bytes().await.map_err(|e| e.to_string())?;

        let url = format!("{}/xrpc/com.atproto.repo.uploadBlob", self.base_url);
        let upload = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", session.access_jwt))
            .header("Content-Type", "image/jpeg")
            .body(bytes)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !upload.status().is_success() {
            let status = upload.status();
            let body = upload.text().await.unwrap_or_default();
            return Err(format!("uploadBlob returned {}: {}", status, body));
        }

        let blob: BlobResponse = upload.json().await.map_err(|e| e.to_string())?;
        blob.blob.ok_or_else(|| "uploadBlob response missing blob".to_string())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionResponse {
    access_jwt: Option<String>,
    did: Option<String>,
}

#[derive(Deserialize)]
struct BlobResponse {
    blob: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct CreateRecordResponse {
    cid: Option<String>,
    uri: Option<String>,
}

#[async_trait]
impl SocialPoster for PosterBluesky {
    fn platform_name(&self) -> &'static str {
        "Bluesky"
    }

    async fn authenticate(&self) -> bool {
        let Some(creds) = &self.credentials else {
            return false;
        };

        match self.create_session(creds).await {
            Ok(session) => {
                *self.session.lock().await = Some(session);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Bluesky authentication failed");
                *self.session.lock().await = None;
                false
            }
        }
    }

    async fn is_authenticated(&self) -> bool {
        self.session.lock().await.is_some()
    }

    async fn publish(&self, post: &Post) -> PostResult {
        if self.credentials.is_none() {
            return PostResult::failure("Bluesky credentials not available.");
        }

        if !self.is_authenticated().await && !self.authenticate().await {
            return PostResult::failure("Bluesky authentication failed.");
        }

        let Some(session) = self.session.lock().await.clone() else {
            return PostResult::failure("Bluesky authentication failed.");
        };

        let mut image_blob = None;
        if let Some(image_url) = &post.image_url {
            match self.upload_image(&session, image_url).await {
                Ok(blob) => image_blob = Some(blob),
                Err(e) => return PostResult::failure(e),
            }
        }

        let created_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default();

        let mut record = serde_json::json!({
            "$type": "app.bsky.feed.post",
            "text": crate::text::assemble_text(post, self.max_chars),
            "createdAt": created_at,
        });

        if let Some(blob) = image_blob {
            record["embed"] = serde_json::json!({
                "$type": "app.bsky.embed.images",
                "images": [{
                    "alt": post.alt_text.as_deref().unwrap_or("Adoptable pet"),
                    "image": blob,
                }],
            });
        }

        let url = format!("{}/xrpc/com.atproto.repo.createRecord", self.base_url);
        let response = match self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", session.access_jwt))
            .json(&serde_json::json!({
                "repo": session.did,
                "collection": "app.bsky.feed.post",
                "record": record,
            }))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return PostResult::failure(e.to_string()),
        };

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return PostResult::failure(format!("createRecord returned {}: {}", status, body));
        }

        match response.json::<CreateRecordResponse>().await {
            Ok(created) => PostResult::published(created.cid, created.uri),
            Err(e) => PostResult::failure(e.to_string()),
        }
    }
}
