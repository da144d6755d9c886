//! Instagram poster adapter
//!
//! Image-centric platform: a post without an image is rejected before
//! anything else happens. The platform has no structured blob model,
//! so publishing is a login / image upload with caption flow.

use async_trait::async_trait;
use cutepets_domain::{Post, PostResult, SocialPoster};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::env_value;

/// Instagram caps captions at 2200 characters
const MAX_CAPTION_CHARS: usize = 2200;

/// Credential resolution for the Instagram poster; constructor values
/// win over the environment variables
#[derive(Debug, Clone)]
pub struct InstagramConfig {
    pub handle: Option<String>,
    pub password: Option<SecretString>,
    pub handle_env: String,
    pub password_env: String,
}

impl Default for InstagramConfig {
    fn default() -> Self {
        Self {
            handle: None,
            password: None,
            handle_env: "INSTAGRAM_HANDLE".to_string(),
            password_env: "INSTAGRAM_PASSWORD".to_string(),
        }
    }
}

#[derive(Clone)]
struct Credentials {
    handle: String,
    password: SecretString,
}

/// Publishes an image with a caption through a login/upload flow
///
/// The session is dropped after every publish attempt; each post logs
/// in fresh.
pub struct PosterInstagram {
    client: Client,
    base_url: String,
    credentials: Option<Credentials>,
    session: Mutex<Option<String>>,
}

impl PosterInstagram {
    pub fn new(config: InstagramConfig) -> Self {
        Self::with_base_url(config, "https://www.instagram.com".to_string())
    }

    pub fn with_base_url(config: InstagramConfig, base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        let handle = config.handle.clone().or_else(|| env_value(&config.handle_env));
        let password = config
            .password
            .clone()
            .or_else(|| env_value(&config.password_env).map(|v| SecretString::new(v.into())));

        let credentials = match (handle, password) {
            (Some(handle), Some(password)) => Some(Credentials { handle, password }),
            _ => None,
        };

        Self {
            client,
            base_url,
            credentials,
            session: Mutex::new(None),
        }
    }

    async fn login(&self, creds: &Credentials) -> Result<String, String> {
        let url = format!("{}/accounts/login", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "username": creds.handle,
                "password": creds.password.expose_secret(),
            }))
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("login returned {}", response.status()));
        }

        let login: LoginResponse = response.json().await.map_err(|e| e.to_string())?;
        login
            .session_id
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "login response missing session id".to_string())
    }

    async fn download_image(&self, image_url: &str) -> Result<Vec<u8>, String> {
        let response = self
            .client
            .get(image_url)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("image download returned {}", response.status()));
        }

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| e.to_string())
    }

    async fn upload_photo(
        &self,
        session_id: &str,
        image: Vec<u8>,
        caption: &str,
    ) -> Result<(), String> {
        let url = format!("{}/media/upload", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("X-Session-Id", session_id)
            .header("Content-Type", "image/jpeg")
            .query(&[("caption", caption)])
            .body(image)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(format!("upload returned {}: {}", status, body));
        }

        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    session_id: Option<String>,
}

#[async_trait]
impl SocialPoster for PosterInstagram {
    fn platform_name(&self) -> &'static str {
        "Instagram"
    }

    async fn authenticate(&self) -> bool {
        let Some(creds) = &self.credentials else {
            return false;
        };

        match self.login(creds).await {
            Ok(session_id) => {
                *self.session.lock().await = Some(session_id);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Instagram authentication failed");
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
            return PostResult::failure("Instagram credentials not available.");
        }

        let Some(image_url) = &post.image_url else {
            return PostResult::failure("Instagram posts require an image URL.");
        };

        if !self.is_authenticated().await && !self.authenticate().await {
            return PostResult::failure("Instagram authentication failed.");
        }

        let Some(session_id) = self.session.lock().await.clone() else {
            return PostResult::failure("Instagram authentication failed.");
        };

        let result = match self.download_image(image_url).await {
            Ok(image) => {
                let caption = crate::text::assemble_text(post, MAX_CAPTION_CHARS);
                match self.upload_photo(&session_id, image, &caption).await {
                    Ok(()) => PostResult::ok(),
                    Err(e) => PostResult::failure(e),
                }
            }
            Err(e) => PostResult::failure(e),
        };

        // The session is per-post; drop it after every attempt
        *self.session.lock().await = None;

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param_contains};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(handle: Option<&str>, password: Option<&str>) -> InstagramConfig {
        InstagramConfig {
            handle: handle.map(String::from),
            password: password.map(|p| SecretString::new(p.into())),
            // Deliberately unset so env cannot leak into tests
            handle_env: "CUTEPETS_TEST_UNSET_IG_HANDLE".to_string(),
            password_env: "CUTEPETS_TEST_UNSET_IG_PASSWORD".to_string(),
        }
    }

    fn sample_post(image_url: Option<&str>) -> Post {
        Post {
            text: "Meet Poppy! This adorable Mixed dog is looking for a forever home in Boston, MA."
                .to_string(),
            image_url: image_url.map(String::from),
            link: None,
            alt_text: None,
            tags: vec!["adoptdontshop".to_string(), "rescue".to_string()],
        }
    }

    #[tokio::test]
    async fn test_missing_credentials_fails_with_zero_requests() {
        let mock_server = MockServer::start().await;
        let poster = PosterInstagram::with_base_url(test_config(None, None), mock_server.uri());

        let result = poster.publish(&sample_post(Some("https://x/p.jpg"))).await;

        assert!(!result.success);
        assert_eq!(
            result.error_message.as_deref(),
            Some("Instagram credentials not available.")
        );
        assert!(
            mock_server
                .received_requests()
                .await
                .expect("request recording enabled")
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_missing_image_fails_before_authentication() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/accounts/login"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let poster = PosterInstagram::with_base_url(
            test_config(Some("cutepets"), Some("secret")),
            mock_server.uri(),
        );

        let result = poster.publish(&sample_post(None)).await;

        assert!(!result.success);
        assert_eq!(
            result.error_message.as_deref(),
            Some("Instagram posts require an image URL.")
        );
    }

    #[tokio::test]
    async fn test_publish_logs_in_and_uploads_with_caption() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/accounts/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sessionId": "sess-1",
            })))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/images/poppy.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg-bytes".to_vec()))
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/media/upload"))
            .and(query_param_contains("caption", "#adoptdontshop #rescue"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let poster = PosterInstagram::with_base_url(
            test_config(Some("cutepets"), Some("secret")),
            mock_server.uri(),
        );

        let image_url = format!("{}/images/poppy.jpg", mock_server.uri());
        let result = poster.publish(&sample_post(Some(&image_url))).await;

        assert!(result.success, "publish failed: {:?}", result.error_message);
        // Session is not kept across posts
        assert!(!poster.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_upload_failure_is_a_failed_result() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/accounts/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sessionId": "sess-1",
            })))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/images/poppy.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg-bytes".to_vec()))
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/media/upload"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let poster = PosterInstagram::with_base_url(
            test_config(Some("cutepets"), Some("secret")),
            mock_server.uri(),
        );

        let image_url = format!("{}/images/poppy.jpg", mock_server.uri());
        let result = poster.publish(&sample_post(Some(&image_url))).await;

        assert!(!result.success);
        assert!(
            result
                .error_message
                .as_deref()
                .is_some_and(|m| m.contains("upload"))
        );
    }
}
