//! JSON configuration for selecting and building a normalization
//!
//! ```json
//! { "method": "RobustZScore", "dims": [0], "nan_safe": true, "threads": 4 }
//! ```
//!
//! An optional `"statistics"` list overrides the family's estimators, e.g.
//! `["median", "std"]` for a z-score centered on the median.

use crate::element::Element;
use crate::errors::Result;
use crate::normalization::{Normalization, Normalizer};
use crate::parallel::ParallelConfig;
use crate::statistics::Statistic;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Declarative description of a normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationConfig {
    /// Registry family, written by name, e.g. `"ZScore"`
    pub method: Normalization,

    /// Estimators replacing the family's defaults
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<Vec<Statistic>>,

    /// Axes to reduce over; every axis when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dims: Option<Vec<usize>>,

    /// Skip NaN values when estimating parameters
    #[serde(default)]
    pub nan_safe: bool,

    /// Worker threads for slice iteration; Rayon's default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
}

impl NormalizationConfig {
    /// Configuration for `family` with default settings.
    #[must_use]
    pub fn new(family: Normalization) -> Self {
        Self {
            method: family,
            statistics: None,
            dims: None,
            nan_safe: false,
            threads: None,
        }
    }

    /// Parse a configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`NormError::ConfigError`](crate::NormError::ConfigError) on malformed
    /// JSON or an unknown method or statistic name.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or a configuration
    /// error if its contents are not valid.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading normalization config");
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serialize the configuration to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`NormError::ConfigError`](crate::NormError::ConfigError) if
    /// serialization fails.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build the unfit [`Normalizer`] this configuration describes.
    ///
    /// # Errors
    ///
    /// Returns an error for duplicated axes or a statistics override whose
    /// length differs from the family's arity.
    pub fn build<T: Element>(&self) -> Result<Normalizer<T>> {
        let mut normalizer = Normalizer::new(self.method);
        if let Some(statistics) = &self.statistics {
            normalizer = normalizer.with_statistics(statistics.clone())?;
        }
        if let Some(dims) = &self.dims {
            normalizer = normalizer.with_dims(dims.clone())?;
        }
        if self.nan_safe {
            normalizer = normalizer.nan_safe();
        }
        Ok(normalizer)
    }

    /// Thread-pool settings for this configuration.
    #[must_use]
    pub fn parallel(&self) -> ParallelConfig {
        ParallelConfig::new(self.threads)
    }

    /// Size Rayon's global pool from `threads`.
    ///
    /// Meant for process start-up; afterwards every reduction and transform
    /// runs on the configured pool without [`ParallelConfig::install`].
    ///
    /// # Errors
    ///
    /// Returns [`NormError::ThreadPoolError`](crate::NormError::ThreadPoolError)
    /// if `threads` is set and the global pool has already been built.
    pub fn apply_global_pool(&self) -> Result<()> {
        self.parallel().setup_global_pool()
    }
}
