//! Engine configuration.
//!
//! Every knob the engine exposes lives here: sphere radius, reported metric,
//! output unit and the batch size at which parallel fan-out kicks in. The
//! search radius is deliberately absent; it is an explicit argument to every
//! counting call.
use crate::compute::distance::{DistanceMetric, DistanceUnit, EARTH_RADIUS_KM};
use crate::compute::validation::validate_earth_radius_km;
use crate::error::{GeoproxError, Result};
use serde::de::Error;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Sphere radius in kilometers used by every distance computation
    #[serde(default = "Config::default_earth_radius_km")]
    pub earth_radius_km: f64,

    /// Metric reported by index queries and joins
    #[serde(default)]
    pub metric: DistanceMetric,

    /// Unit for distance outputs in joins and feature tables
    #[serde(default)]
    pub unit: DistanceUnit,

    /// Minimum batch length before queries fan out over the worker pool.
    /// Ignored without the `parallel` feature.
    #[serde(default = "Config::default_parallel_threshold")]
    pub parallel_threshold: usize,
}

impl Config {
    const fn default_earth_radius_km() -> f64 {
        EARTH_RADIUS_KM
    }

    const fn default_parallel_threshold() -> usize {
        1024
    }

    pub fn with_earth_radius_km(mut self, earth_radius_km: f64) -> Self {
        assert!(
            earth_radius_km.is_finite() && earth_radius_km > 0.0,
            "Earth radius must be positive and finite"
        );
        self.earth_radius_km = earth_radius_km;
        self
    }

    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_unit(mut self, unit: DistanceUnit) -> Self {
        self.unit = unit;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        assert!(threshold > 0, "Parallel threshold must be greater than zero");
        self.parallel_threshold = threshold;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_earth_radius_km(self.earth_radius_km)?;

        if self.parallel_threshold == 0 {
            return Err(GeoproxError::InvalidInput(
                "Parallel threshold must be greater than zero".to_string(),
            ));
        }

        if self.metric == DistanceMetric::Chord {
            log::debug!("Chord metric selected; reported distances underestimate arc length");
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(serde_json::Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            earth_radius_km: Self::default_earth_radius_km(),
            metric: DistanceMetric::default(),
            unit: DistanceUnit::default(),
            parallel_threshold: Self::default_parallel_threshold(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.earth_radius_km, 6371.0);
        assert_eq!(config.metric, DistanceMetric::Haversine);
        assert_eq!(config.unit, DistanceUnit::Kilometers);
        assert_eq!(config.parallel_threshold, 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default()
            .with_earth_radius_km(6378.137)
            .with_metric(DistanceMetric::Chord)
            .with_unit(DistanceUnit::Meters)
            .with_parallel_threshold(64);

        let json = config.to_json().unwrap();
        assert!(json.contains("\"chord\""));
        assert!(json.contains("\"meters\""));

        let deserialized = Config::from_json(&json).unwrap();
        assert_eq!(deserialized, config);
    }

    #[test]
    fn test_config_partial_json_uses_defaults() {
        let config = Config::from_json(r#"{ "unit": "meters" }"#).unwrap();
        assert_eq!(config.unit, DistanceUnit::Meters);
        assert_eq!(config.earth_radius_km, 6371.0);
        assert_eq!(config.metric, DistanceMetric::Haversine);
    }

    #[test]
    fn test_config_rejects_unknown_fields() {
        assert!(Config::from_json(r#"{ "radius_km": 0.7 }"#).is_err());
    }

    #[test]
    fn test_config_rejects_invalid_values() {
        assert!(Config::from_json(r#"{ "earth_radius_km": -1.0 }"#).is_err());
        assert!(Config::from_json(r#"{ "parallel_threshold": 0 }"#).is_err());
        assert!(Config::from_json(r#"{ "metric": "manhattan" }"#).is_err());
    }

    #[test]
    #[should_panic(expected = "Earth radius must be positive and finite")]
    fn test_with_earth_radius_panics_on_zero() {
        let _ = Config::default().with_earth_radius_km(0.0);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_config_toml_roundtrip() {
        let config = Config::default().with_unit(DistanceUnit::Meters);
        let toml_str = config.to_toml().unwrap();
        let back = Config::from_toml(&toml_str).unwrap();
        assert_eq!(back, config);
    }
}
