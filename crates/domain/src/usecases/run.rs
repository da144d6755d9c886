//! Run use case - orchestrates fetching, selection, rendering, and publishing

use rand::Rng;
use std::sync::Arc;
use thiserror::Error;

use crate::model::PostResult;
use crate::ports::{PetSource, SocialPoster, SourceError};
use crate::selection;

/// Error aborting a whole run
///
/// Only a source configuration problem is fatal; everything else is
/// reported as data in the returned results.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("source {source_name} is misconfigured: {message}")]
    Config { source_name: String, message: String },
}

/// Run the full pipeline once: fetch from every source, pick one
/// postable pet, render and publish through every poster.
///
/// Returns one `PostResult` per poster, in configured order. An empty
/// result list (no postable pet, or no posters) is a normal outcome.
/// A misconfigured source aborts immediately; a source that fails at
/// the transport level contributes no pets and the run continues.
pub async fn run_pipeline<R>(
    sources: &[Arc<dyn PetSource>],
    posters: &[Arc<dyn SocialPoster>],
    rng: &mut R,
) -> Result<Vec<PostResult>, RunError>
where
    R: Rng + ?Sized,
{
    let mut pool = Vec::new();

    for source in sources {
        let name = source.source_name();
        match source.fetch_pets().await {
            Ok(pets) => {
                tracing::info!(source = %name, count = pets.len(), "Fetched pets");
                pool.extend(pets);
            }
            Err(SourceError::Config(message)) => {
                return Err(RunError::Config {
                    source_name: name,
                    message,
                });
            }
            Err(SourceError::Transport(message)) => {
                tracing::warn!(source = %name, error = %message, "Fetch failed, skipping source");
            }
        }
    }

    let Some(pet) = selection::choose_postable(&pool, rng) else {
        tracing::info!(pool_size = pool.len(), "No postable pet available");
        return Ok(vec![]);
    };

    tracing::info!(pet = %pet.name, species = %pet.species, "Selected pet to promote");

    if posters.is_empty() {
        tracing::info!("No posters configured");
        return Ok(vec![]);
    }

    let mut results = Vec::with_capacity(posters.len());

    for poster in posters {
        let post = poster.format_post(pet);
        let result = poster.publish(&post).await;

        if result.success {
            tracing::info!(
                platform = poster.platform_name(),
                post_id = ?result.post_id,
                post_url = ?result.post_url,
                "Published"
            );
        } else {
            tracing::error!(
                platform = poster.platform_name(),
                error = ?result.error_message,
                "Publish failed"
            );
        }

        results.push(result);
    }

    Ok(results)
}
