//! Pipeline configuration
//!
//! All domain constants of the pipeline (Overpass endpoint and timeout,
//! proximity buffer distance, tier list) live here with the defaults the
//! analysis was designed around. Every field can be overridden from a TOML
//! file; file paths are never configured here, they arrive as CLI arguments.

use crate::error::{FloodlineError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Meters in one statute mile, the conversion used for every buffer distance.
pub const MILE_IN_METERS: f64 = 1609.34;

/// Pipeline-wide configuration with reasonable defaults for a residential
/// flood/hazard proximity analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub overpass: OverpassConfig,
    pub proximity: ProximityConfig,
    /// Concentric buffer tiers, in insertion order.
    pub tiers: Vec<TierSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverpassConfig {
    /// Overpass API interpreter endpoint.
    pub endpoint: String,
    /// Query timeout in seconds, applied both to the Overpass QL header and
    /// the HTTP client.
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProximityConfig {
    /// River buffer distance in statute miles.
    pub buffer_miles: f64,
}

/// One labeled buffer tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierSpec {
    pub label: String,
    pub miles: f64,
}

impl TierSpec {
    pub fn new(label: impl Into<String>, miles: f64) -> Self {
        Self { label: label.into(), miles }
    }

    /// Tier distance in meters.
    pub fn meters(&self) -> f64 {
        self.miles * MILE_IN_METERS
    }
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://overpass-api.de/api/interpreter".to_string(),
            timeout_secs: 60,
        }
    }
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self { buffer_miles: 1.0 }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            overpass: OverpassConfig::default(),
            proximity: ProximityConfig::default(),
            // Labels are kept from the original analysis outputs so
            // downstream maps keep working.
            tiers: vec![
                TierSpec::new("buffer_0_15mi", 0.10),
                TierSpec::new("buffer_0_25mi", 0.25),
            ],
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a TOML file, falling back to defaults for any
    /// missing section.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: PipelineConfig =
            toml::from_str(&content).map_err(|e| FloodlineError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject distances that cannot produce a meaningful buffer.
    pub fn validate(&self) -> Result<()> {
        if self.proximity.buffer_miles <= 0.0 {
            return Err(FloodlineError::ConfigInvalid {
                key: "proximity.buffer_miles".to_string(),
                reason: format!("must be positive, got {}", self.proximity.buffer_miles),
            });
        }
        if self.tiers.is_empty() {
            return Err(FloodlineError::ConfigInvalid {
                key: "tiers".to_string(),
                reason: "at least one tier is required".to_string(),
            });
        }
        for tier in &self.tiers {
            if tier.miles <= 0.0 {
                return Err(FloodlineError::ConfigInvalid {
                    key: format!("tiers.{}", tier.label),
                    reason: format!("distance must be positive, got {}", tier.miles),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_analysis() {
        let config = PipelineConfig::default();
        assert_eq!(config.overpass.timeout_secs, 60);
        assert_eq!(config.proximity.buffer_miles, 1.0);
        assert_eq!(config.tiers.len(), 2);
        assert_eq!(config.tiers[0].label, "buffer_0_15mi");
        assert!((config.tiers[0].meters() - 160.934).abs() < 1e-9);
        assert!((config.tiers[1].meters() - 402.335).abs() < 1e-9);
    }

    #[test]
    fn partial_toml_overrides_keep_defaults() {
        let toml_str = r#"
            [proximity]
            buffer_miles = 0.5
        "#;
        let config: PipelineConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.proximity.buffer_miles, 0.5);
        assert_eq!(config.overpass.timeout_secs, 60);
        assert_eq!(config.tiers.len(), 2);
    }

    #[test]
    fn negative_tier_distance_is_rejected() {
        let mut config = PipelineConfig::default();
        config.tiers.push(TierSpec::new("bad", -0.1));
        assert!(config.validate().is_err());
    }
}
