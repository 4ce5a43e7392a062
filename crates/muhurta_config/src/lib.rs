//! Configuration for the muhurta advisory engine.
//!
//! This crate provides:
//! - `MuhurtaConfig`: aspect orbs, search parameters and file paths, from TOML
//! - The search order `$MUHURTA_CONFIG` → `./muhurta.toml` → defaults
//! - Topic catalog overrides loaded from a separate TOML file

pub mod config;
pub mod error;
pub mod topics;

pub use config::{AspectOrbs, CONFIG_ENV_VAR, ConfigSource, LOCAL_CONFIG_FILE, MuhurtaConfig};
pub use error::ConfigError;
pub use topics::{load_topic_catalog, parse_topic_catalog};
