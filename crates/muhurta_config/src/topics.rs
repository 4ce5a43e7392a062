//! Topic catalog overrides from TOML.
//!
//! ```toml
//! [contract]
//! description = "Signing contracts"
//! houses = [3, 7, 10]
//!
//! [contract.weights]
//! mercury = 3.5
//!
//! [[contract.recommendations.good]]
//! text = "Sign in the best window."
//! priority = "high"
//! category = "timing"
//! ```
//!
//! Topics and fields left out keep their built-in values.

use std::collections::BTreeMap;
use std::path::Path;

use muhurta_chart::Body;
use muhurta_search::{RecommendationBank, Topic, TopicCatalog, TopicOverride};
use serde::Deserialize;
use tracing::info;

use crate::error::ConfigError;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TopicEntry {
    description: Option<String>,
    #[serde(default)]
    weights: BTreeMap<String, f64>,
    houses: Option<Vec<u8>>,
    recommendations: Option<RecommendationBank>,
}

/// Load a catalog file and apply it over the built-in catalog.
pub fn load_topic_catalog(path: &Path) -> Result<TopicCatalog, ConfigError> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
    let catalog = parse_topic_catalog(&contents, path)?;
    info!(path = %path.display(), "loaded topic catalog overrides");
    Ok(catalog)
}

/// Parse catalog overrides. `origin` only labels errors.
pub fn parse_topic_catalog(contents: &str, origin: &Path) -> Result<TopicCatalog, ConfigError> {
    let raw: BTreeMap<String, TopicEntry> =
        toml::from_str(contents).map_err(|e| ConfigError::Parse(origin.to_path_buf(), e))?;

    let mut errors = Vec::new();
    let mut overrides = BTreeMap::new();
    for (key, entry) in raw {
        let Some(topic) = Topic::from_key(&key) else {
            errors.push(format!("unknown topic `{key}`"));
            continue;
        };
        let mut weights = BTreeMap::new();
        for (name, w) in entry.weights {
            match name.parse::<Body>() {
                Ok(body) => {
                    weights.insert(body, w);
                }
                Err(_) => errors.push(format!("{key}.weights: unknown body `{name}`")),
            }
        }
        overrides.insert(
            topic,
            TopicOverride {
                description: entry.description,
                weights,
                houses: entry.houses,
                recommendations: entry.recommendations,
            },
        );
    }
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors));
    }

    TopicCatalog::builtin()
        .with_overrides(&overrides)
        .map_err(|e| ConfigError::Validation(vec![e.to_string()]))
}
