//! Run command - fetch pets, pick one, publish a post per poster

use anyhow::{Result, bail};
use cutepets_adapters::{
    BlueskyConfig, InstagramConfig, PosterBluesky, PosterDebug, PosterInstagram,
    RescueGroupsConfig, SourceManual, SourceRescueGroups,
};
use cutepets_domain::{PetSource, SocialPoster, Species, usecases::run_pipeline};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::sync::Arc;

use crate::args::RunArgs;
use crate::config::AppConfig;

pub async fn execute(args: RunArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;

    let sources = build_sources(&args, &config)?;
    let posters = build_posters(&args, &config);

    tracing::info!(
        sources = sources.len(),
        posters = posters.len(),
        debug = args.debug,
        "Starting cutepets run"
    );

    if posters.is_empty() {
        tracing::warn!("No posters configured; enable one in config or pass --debug");
    }

    let mut rng = StdRng::from_os_rng();
    let results = run_pipeline(&sources, &posters, &mut rng).await?;

    if results.is_empty() {
        tracing::info!("Nothing was posted");
        return Ok(());
    }

    let published = results.iter().filter(|r| r.success).count();
    let failed = results.len() - published;
    tracing::info!(published, failed, "Run complete");

    Ok(())
}

fn build_sources(args: &RunArgs, config: &AppConfig) -> Result<Vec<Arc<dyn PetSource>>> {
    if args.manual_source {
        return Ok(vec![Arc::new(SourceManual::new())]);
    }

    let mut sources: Vec<Arc<dyn PetSource>> = Vec::new();

    if config.rescue_groups.enabled {
        let species = parse_species(
            args.species
                .as_deref()
                .unwrap_or(&config.rescue_groups.species),
        )?;

        sources.push(Arc::new(SourceRescueGroups::new(RescueGroupsConfig {
            api_key: None,
            api_key_env: config.rescue_groups.api_key_env.clone(),
            postal_code: config.rescue_groups.postal_code.clone(),
            radius_miles: config.rescue_groups.radius_miles,
            species,
            limit: config.rescue_groups.limit,
            location_label: config.rescue_groups.location_label.clone(),
        })));
    }

    Ok(sources)
}

fn build_posters(args: &RunArgs, config: &AppConfig) -> Vec<Arc<dyn SocialPoster>> {
    if args.debug {
        return vec![Arc::new(PosterDebug::stdout())];
    }

    let mut posters: Vec<Arc<dyn SocialPoster>> = Vec::new();

    if config.bluesky.enabled {
        posters.push(Arc::new(PosterBluesky::new(BlueskyConfig {
            handle: None,
            password: None,
            handle_env: config.bluesky.handle_env.clone(),
            handle_fallback_env: config.bluesky.handle_fallback_env.clone(),
            password_env: config.bluesky.password_env.clone(),
            password_fallback_env: config.bluesky.password_fallback_env.clone(),
            max_chars: config.bluesky.max_chars,
        })));
    }

    if config.instagram.enabled {
        posters.push(Arc::new(PosterInstagram::new(InstagramConfig {
            handle: None,
            password: None,
            handle_env: config.instagram.handle_env.clone(),
            password_env: config.instagram.password_env.clone(),
        })));
    }

    posters
}

fn parse_species(value: &str) -> Result<Species> {
    match value.trim().to_lowercase().as_str() {
        "dog" | "dogs" => Ok(Species::Dog),
        "cat" | "cats" => Ok(Species::Cat),
        other => bail!("Invalid species: {} (expected dog or cat)", other),
    }
}
