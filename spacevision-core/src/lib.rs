//! SpaceVision data layer
//!
//! Remote fetching with retry, record normalization, and the persisted
//! favorites store behind an in-memory coordinator.

pub mod config;
pub mod dates;
pub mod logging;
pub mod module;

pub use spacevision_common as common;
