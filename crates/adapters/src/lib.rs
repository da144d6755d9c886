//! cutepets adapters crate
//!
//! This crate contains infrastructure adapters implementing the domain ports:
//! - `rescue_groups`: RescueGroups.org API source
//! - `manual`: static demo source
//! - `bluesky`: Bluesky (AT Protocol) poster
//! - `instagram`: Instagram poster
//! - `debug`: no-network poster writing to an injectable sink

pub mod bluesky;
pub mod debug;
pub mod instagram;
pub mod manual;
pub mod rescue_groups;

mod text;

pub use bluesky::{BlueskyConfig, PosterBluesky};
pub use debug::PosterDebug;
pub use instagram::{InstagramConfig, PosterInstagram};
pub use manual::SourceManual;
pub use rescue_groups::{RescueGroupsConfig, SourceRescueGroups};

/// Read an environment variable, treating empty values as unset
pub(crate) fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
