//! Port definitions (traits) for external dependencies
//!
//! These traits define the boundaries between the domain and external systems.
//! Adapters implement these traits to connect to real infrastructure.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{AdoptablePet, Post, PostResult};
use crate::usecases::render;

/// Error type for pet source operations
///
/// Only `Config` is a hard failure: it aborts the whole run before any
/// network call. `Transport` is absorbed by the orchestrator as an
/// empty fetch outcome. Individual malformed records never surface
/// here at all; sources skip them with a logged warning.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("transport error: {0}")]
    Transport(String),
}

/// Port for fetching adoptable pets from a provider
#[async_trait]
pub trait PetSource: Send + Sync {
    /// Name of the source, for display and logging only
    fn source_name(&self) -> String;

    /// Fetch currently available pets
    ///
    /// Finite and restartable: no cursor state persists across calls.
    async fn fetch_pets(&self) -> Result<Vec<AdoptablePet>, SourceError>;
}

/// Port for publishing posts to one social platform
///
/// `authenticate` and `publish` never raise; failures are communicated
/// through the boolean and the `PostResult` respectively.
#[async_trait]
pub trait SocialPoster: Send + Sync {
    /// Name of the platform, for display and logging
    fn platform_name(&self) -> &'static str;

    /// Authenticate with the platform, caching session state on success
    /// and clearing it on failure
    async fn authenticate(&self) -> bool;

    /// Whether a cached session exists; platforms without session state
    /// keep the default
    async fn is_authenticated(&self) -> bool {
        false
    }

    /// Publish a post, converting every failure into a failed result
    async fn publish(&self, post: &Post) -> PostResult;

    /// Render a pet into a post for this platform
    ///
    /// Override to customize formatting for a specific platform.
    fn format_post(&self, pet: &AdoptablePet) -> Post {
        render::format_post(pet)
    }
}
