// ⚙️ Dataset Configuration
// Scenario inputs for the synthetic series generator: time horizon,
// vehicle models, states, trend constants, and the RNG seed

use anyhow::{Context as AnyhowContext, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// ============================================================================
// MODEL SPEC
// ============================================================================

/// A vehicle model with its ex-showroom price band (in lakh)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelSpec {
    /// Display label, e.g. "Nexon EV"
    pub label: String,

    /// Lower bound of the average unit price draw (lakh, inclusive)
    pub price_min_lakh: f64,

    /// Upper bound of the average unit price draw (lakh, exclusive)
    pub price_max_lakh: f64,
}

impl ModelSpec {
    pub fn new(label: &str, price_min_lakh: f64, price_max_lakh: f64) -> Self {
        ModelSpec {
            label: label.to_string(),
            price_min_lakh,
            price_max_lakh,
        }
    }

    /// Column-name slug for this model: lowercase, non-alphanumerics to '_'
    /// "Nexon EV" -> "nexon_ev"
    pub fn slug(&self) -> String {
        let mut slug = String::with_capacity(self.label.len());
        let mut prev_sep = true;
        for ch in self.label.chars() {
            if ch.is_ascii_alphanumeric() {
                slug.push(ch.to_ascii_lowercase());
                prev_sep = false;
            } else if !prev_sep {
                slug.push('_');
                prev_sep = true;
            }
        }
        while slug.ends_with('_') {
            slug.pop();
        }
        slug
    }
}

// ============================================================================
// CONFIG ERROR
// ============================================================================

/// Configuration rejection with the offending field
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub field: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: String) -> Self {
        ConfigError {
            field: field.to_string(),
            message,
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid config: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// DATASET CONFIG
// ============================================================================

/// Full scenario for one generation run
///
/// `Default` reproduces the reference scenario: 100 months from Jan 2015,
/// four Tata EV models in a 13-18 lakh band, ten states, seed 42.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetConfig {
    /// Anchor of the first monthly period
    pub start_date: NaiveDate,

    /// Number of monthly periods (rows per state)
    pub periods: usize,

    /// Vehicle models, in output column order
    pub models: Vec<ModelSpec>,

    /// States, in output row order within each period
    pub states: Vec<String>,

    /// RNG seed; the whole run is deterministic given this
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// National sales Poisson mean at offset 0
    #[serde(default = "default_sales_base")]
    pub sales_base: f64,

    /// Monthly increase of the national sales mean
    #[serde(default = "default_sales_slope")]
    pub sales_slope: f64,

    /// Market share trend at the first period (percent)
    #[serde(default = "default_share_start")]
    pub share_start_pct: f64,

    /// Market share trend at the last period (percent)
    #[serde(default = "default_share_end")]
    pub share_end_pct: f64,

    /// Std-dev of the Gaussian noise added to the share trend
    #[serde(default = "default_share_noise")]
    pub share_noise_std: f64,

    /// Per-state monthly charging-station additions, lower bound (inclusive)
    #[serde(default = "default_stations_min")]
    pub stations_added_min: u32,

    /// Per-state monthly charging-station additions, upper bound (exclusive)
    #[serde(default = "default_stations_max")]
    pub stations_added_max: u32,
}

// Serde defaults
fn default_seed() -> u64 {
    42
}

fn default_sales_base() -> f64 {
    2000.0
}

fn default_sales_slope() -> f64 {
    50.0
}

fn default_share_start() -> f64 {
    2.0
}

fn default_share_end() -> f64 {
    10.0
}

fn default_share_noise() -> f64 {
    0.5
}

fn default_stations_min() -> u32 {
    5
}

fn default_stations_max() -> u32 {
    25
}

impl Default for DatasetConfig {
    fn default() -> Self {
        let models = vec![
            ModelSpec::new("Nexon EV", 13.0, 18.0),
            ModelSpec::new("Tigor EV", 13.0, 18.0),
            ModelSpec::new("Tiago EV", 13.0, 18.0),
            ModelSpec::new("Punch EV", 13.0, 18.0),
        ];

        let states = [
            "Maharashtra",
            "Delhi",
            "Karnataka",
            "Tamil Nadu",
            "Gujarat",
            "Rajasthan",
            "West Bengal",
            "Punjab",
            "Kerala",
            "Uttar Pradesh",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        DatasetConfig {
            start_date: NaiveDate::from_ymd_opt(2015, 1, 1).expect("valid anchor date"),
            periods: 100,
            models,
            states,
            seed: default_seed(),
            sales_base: default_sales_base(),
            sales_slope: default_sales_slope(),
            share_start_pct: default_share_start(),
            share_end_pct: default_share_end(),
            share_noise_std: default_share_noise(),
            stations_added_min: default_stations_min(),
            stations_added_max: default_stations_max(),
        }
    }
}

impl DatasetConfig {
    /// Load a scenario from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: DatasetConfig =
            serde_json::from_str(&content).context("Failed to parse config JSON")?;

        Ok(config)
    }

    /// Check the scenario before generation
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.periods == 0 {
            return Err(ConfigError::new("periods", "must be positive".to_string()));
        }

        if self.models.is_empty() {
            return Err(ConfigError::new(
                "models",
                "at least one vehicle model is required".to_string(),
            ));
        }

        if self.states.is_empty() {
            return Err(ConfigError::new(
                "states",
                "at least one state is required".to_string(),
            ));
        }

        for model in &self.models {
            if model.price_min_lakh <= 0.0 || model.price_min_lakh >= model.price_max_lakh {
                return Err(ConfigError::new(
                    "models",
                    format!(
                        "{}: price band must satisfy 0 < min < max (got {} .. {})",
                        model.label, model.price_min_lakh, model.price_max_lakh
                    ),
                ));
            }
        }

        if self.sales_base <= 0.0 {
            return Err(ConfigError::new(
                "sales_base",
                "must be positive".to_string(),
            ));
        }

        if self.stations_added_min >= self.stations_added_max {
            return Err(ConfigError::new(
                "stations_added_min",
                format!(
                    "must be below stations_added_max ({} >= {})",
                    self.stations_added_min, self.stations_added_max
                ),
            ));
        }

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
