//! Debug poster that writes post content to a caller-supplied sink

use async_trait::async_trait;
use cutepets_domain::{Post, PostResult, SocialPoster};
use std::io::Write;
use std::sync::{Arc, Mutex};

/// No-network poster for local testing
///
/// The output sink is injected so tests can capture and assert on the
/// would-be post content.
pub struct PosterDebug {
    sink: Arc<Mutex<dyn Write + Send>>,
}

impl PosterDebug {
    pub fn new(sink: Arc<Mutex<dyn Write + Send>>) -> Self {
        Self { sink }
    }

    pub fn stdout() -> Self {
        Self::new(Arc::new(Mutex::new(std::io::stdout())))
    }
}

#[async_trait]
impl SocialPoster for PosterDebug {
    fn platform_name(&self) -> &'static str {
        "Debug"
    }

    async fn authenticate(&self) -> bool {
        true
    }

    async fn publish(&self, post: &Post) -> PostResult {
        let output = format!(
            "Debug post\nText:\n{}\nImage: {:?}\nLink: {:?}\nAlt: {:?}\nTags: {:?}\n",
            post.text, post.image_url, post.link, post.alt_text, post.tags
        );

        let mut sink = match self.sink.lock() {
            Ok(sink) => sink,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Err(e) = sink.write_all(output.as_bytes()).and_then(|()| sink.flush()) {
            return PostResult::failure(format!("debug sink write failed: {}", e));
        }

        PostResult::published(Some("debug".to_string()), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post() -> Post {
        Post {
            text: "Meet Poppy!".to_string(),
            image_url: Some("https://example.com/poppy.jpg".to_string()),
            link: Some("https://example.com/adopt/poppy".to_string()),
            alt_text: Some("Photo of Poppy".to_string()),
            tags: vec!["adoptdontshop".to_string()],
        }
    }

    #[tokio::test]
    async fn test_publish_writes_post_to_sink() {
        let buffer: Arc<Mutex<Vec<u8>>> = Arc::new(Mutex::new(Vec::new()));
        let poster = PosterDebug::new(buffer.clone());

        let result = poster.publish(&sample_post()).await;

        assert!(result.success);
        assert_eq!(result.post_id.as_deref(), Some("debug"));

        let captured = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(captured.contains("Meet Poppy!"));
        assert!(captured.contains("https://example.com/poppy.jpg"));
        assert!(captured.contains("adoptdontshop"));
    }

    #[tokio::test]
    async fn test_authenticate_always_succeeds() {
        let poster = PosterDebug::new(Arc::new(Mutex::new(Vec::new())));

        assert!(poster.authenticate().await);
        assert_eq!(poster.platform_name(), "Debug");
    }
}
