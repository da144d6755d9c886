//! cutepets domain crate
//!
//! This crate contains the core domain logic following hexagonal architecture:
//! - `model`: Domain entities and value objects
//! - `ports`: Trait definitions for external dependencies (adapters)
//! - `selection`: Policy choosing one postable pet from a pool
//! - `usecases`: Rendering and the run pipeline

pub mod model;
pub mod ports;
pub mod selection;
pub mod usecases;

pub use model::*;
pub use ports::*;
