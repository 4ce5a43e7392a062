//! Engine configuration file.
//!
//! ```toml
//! topics_path = "topics.toml"
//! ephemeris_path = "ephemeris.json"
//!
//! [aspects]
//! conjunction = 8.0
//! sextile = 6.0
//!
//! [search]
//! window_count = 24
//! window_minutes = 60
//! top_n = 5
//! parallel = false
//! ```
//!
//! Every key is optional; omitted keys take the built-in defaults.

use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};

use muhurta_chart::{ALL_ASPECT_KINDS, AspectKind, AspectSpec, AspectTable};
use muhurta_search::{AdviceSettings, SearchConfig, TopicCatalog};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ConfigError;
use crate::topics::load_topic_catalog;

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "MUHURTA_CONFIG";
/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "muhurta.toml";

/// Max orb per aspect kind, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AspectOrbs {
    pub conjunction: f64,
    pub sextile: f64,
    pub square: f64,
    pub trine: f64,
    pub opposition: f64,
}

impl Default for AspectOrbs {
    fn default() -> Self {
        Self {
            conjunction: AspectKind::Conjunction.default_max_orb(),
            sextile: AspectKind::Sextile.default_max_orb(),
            square: AspectKind::Square.default_max_orb(),
            trine: AspectKind::Trine.default_max_orb(),
            opposition: AspectKind::Opposition.default_max_orb(),
        }
    }
}

impl AspectOrbs {
    pub fn orb(&self, kind: AspectKind) -> f64 {
        match kind {
            AspectKind::Conjunction => self.conjunction,
            AspectKind::Sextile => self.sextile,
            AspectKind::Square => self.square,
            AspectKind::Trine => self.trine,
            AspectKind::Opposition => self.opposition,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MuhurtaConfig {
    /// Topic catalog overrides, see [`crate::topics`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topics_path: Option<PathBuf>,
    /// Tabulated ephemeris used by the CLI when none is given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ephemeris_path: Option<PathBuf>,
    pub aspects: AspectOrbs,
    pub search: SearchConfig,
}

/// Where a loaded config came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Env(PathBuf),
    Local(PathBuf),
    Defaults,
}

impl Display for ConfigSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Env(p) => write!(f, "{} (${CONFIG_ENV_VAR})", p.display()),
            Self::Local(p) => write!(f, "{}", p.display()),
            Self::Defaults => f.write_str("built-in defaults"),
        }
    }
}

impl MuhurtaConfig {
    /// Load using the standard search order:
    /// 1. `$MUHURTA_CONFIG`
    /// 2. `./muhurta.toml`
    /// 3. Built-in defaults
    ///
    /// A file that fails to load is logged and skipped.
    pub fn load() -> Self {
        let env = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        Self::load_with_source(env.as_deref(), Path::new(LOCAL_CONFIG_FILE)).0
    }

    /// Search order with explicit candidates, returning which one won.
    pub fn load_with_source(env_path: Option<&Path>, local_path: &Path) -> (Self, ConfigSource) {
        if let Some(p) = env_path {
            if p.exists() {
                match Self::load_from_file(p) {
                    Ok(config) => {
                        info!(path = %p.display(), "loaded config from {CONFIG_ENV_VAR}");
                        return (config, ConfigSource::Env(p.to_path_buf()));
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "failed to load config from {CONFIG_ENV_VAR}, falling back");
                    }
                }
            } else {
                warn!(path = %p.display(), "{CONFIG_ENV_VAR} points to a missing file, falling back");
            }
        }

        if local_path.exists() {
            match Self::load_from_file(local_path) {
                Ok(config) => {
                    info!(path = %local_path.display(), "loaded config");
                    return (config, ConfigSource::Local(local_path.to_path_buf()));
                }
                Err(e) => {
                    warn!(path = %local_path.display(), error = %e, "failed to load config, using defaults");
                }
            }
        }

        info!("no config file found, using built-in defaults");
        (Self::default(), ConfigSource::Defaults)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "config saved");
        Ok(())
    }

    /// Collect every problem rather than stopping at the first.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        for kind in ALL_ASPECT_KINDS {
            let orb = self.aspects.orb(kind);
            if !orb.is_finite() || orb <= 0.0 || orb > 30.0 {
                errors.push(format!("aspects.{kind} must be in (0, 30], got {orb}"));
            }
        }
        if let Err(e) = self.search.validate() {
            errors.push(format!("search: {e}"));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    pub fn aspect_table(&self) -> Result<AspectTable, ConfigError> {
        let specs = ALL_ASPECT_KINDS
            .into_iter()
            .map(|kind| AspectSpec {
                kind,
                exact_angle: kind.exact_angle(),
                max_orb: self.aspects.orb(kind),
            })
            .collect();
        AspectTable::new(specs).map_err(|e| ConfigError::Validation(vec![e.to_string()]))
    }

    /// Built-in catalog with `topics_path` overrides applied, if set.
    pub fn topic_catalog(&self) -> Result<TopicCatalog, ConfigError> {
        match &self.topics_path {
            Some(path) => load_topic_catalog(path),
            None => Ok(TopicCatalog::builtin().clone()),
        }
    }

    /// Advisory settings borrowing an already loaded catalog.
    pub fn advice_settings<'a>(
        &self,
        catalog: &'a TopicCatalog,
    ) -> Result<AdviceSettings<'a>, ConfigError> {
        Ok(AdviceSettings {
            catalog,
            aspects: self.aspect_table()?,
            search: self.search,
        })
    }
}
