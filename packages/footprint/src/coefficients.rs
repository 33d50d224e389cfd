//! Emission coefficient table.
//!
//! The default table is embedded at compile time from `coefficients.toml`.
//! A replacement table with the same shape can be supplied at process start
//! through the `CARBON_COEFFICIENTS_PATH` environment variable. Once loaded,
//! a table is never mutated.

use std::collections::BTreeMap;
use std::path::Path;

use carbon_tracker_footprint_models::{DietType, TransportMode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming an override TOML file.
pub const COEFFICIENTS_PATH_ENV: &str = "CARBON_COEFFICIENTS_PATH";

/// Days in the fixed month used for the food term when a table does not
/// set `days_per_month`.
pub const DEFAULT_DAYS_PER_MONTH: u32 = 30;

const EMBEDDED_TOML: &str = include_str!("../coefficients.toml");

/// Errors from loading or validating a coefficient table.
#[derive(Debug, Error)]
pub enum CoefficientError {
    /// The override file could not be read.
    #[error("Failed to read coefficient file {path}: {source}")]
    Io {
        /// Path that was attempted.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The TOML did not match the expected shape.
    #[error("Invalid coefficient TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// A table key did not name a known transport mode or diet.
    #[error("Unknown {section} key: {key}")]
    UnknownKey {
        /// Table the key appeared in.
        section: &'static str,
        /// The unrecognized key.
        key: String,
    },

    /// A factor was zero, negative, or not finite.
    #[error("Coefficient {name} must be a positive finite number, got {value}")]
    NotPositive {
        /// Which coefficient.
        name: String,
        /// The rejected value.
        value: f64,
    },

    /// A diet had no factor.
    #[error("Missing diet coefficient: {0}")]
    MissingDiet(DietType),

    /// `days_per_month` was outside 1..=31.
    #[error("days_per_month must be between 1 and 31, got {0}")]
    InvalidDaysPerMonth(u32),
}

#[derive(Deserialize)]
struct RawCoefficients {
    electricity: f64,
    waste: f64,
    #[serde(default = "default_days_per_month")]
    days_per_month: u32,
    #[serde(default)]
    transport: BTreeMap<String, f64>,
    diet: BTreeMap<String, f64>,
}

const fn default_days_per_month() -> u32 {
    DEFAULT_DAYS_PER_MONTH
}

/// Immutable per-category emission factors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmissionCoefficients {
    transport: BTreeMap<TransportMode, f64>,
    diet: BTreeMap<DietType, f64>,
    electricity: f64,
    waste: f64,
    days_per_month: u32,
}

impl EmissionCoefficients {
    /// Parses the table compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns [`CoefficientError`] if the embedded TOML is invalid.
    pub fn embedded() -> Result<Self, CoefficientError> {
        Self::from_toml_str(EMBEDDED_TOML)
    }

    /// Loads the override table named by [`COEFFICIENTS_PATH_ENV`], or the
    /// embedded table when the variable is unset.
    ///
    /// # Errors
    ///
    /// Returns [`CoefficientError`] if the override cannot be read or is
    /// invalid.
    pub fn load_from_env() -> Result<Self, CoefficientError> {
        match std::env::var(COEFFICIENTS_PATH_ENV) {
            Ok(path) => {
                log::info!("Loading emission coefficients from {path}");
                Self::from_file(Path::new(&path))
            }
            Err(_) => {
                log::info!("Using embedded emission coefficients");
                Self::embedded()
            }
        }
    }

    /// Reads and validates a TOML coefficient file.
    ///
    /// # Errors
    ///
    /// Returns [`CoefficientError`] if the file cannot be read or is invalid.
    pub fn from_file(path: &Path) -> Result<Self, CoefficientError> {
        let contents = std::fs::read_to_string(path).map_err(|source| CoefficientError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates a TOML coefficient table.
    ///
    /// # Errors
    ///
    /// Returns [`CoefficientError`] if the TOML is malformed, names an
    /// unknown mode or diet, omits a diet, or carries a non-positive factor.
    pub fn from_toml_str(s: &str) -> Result<Self, CoefficientError> {
        let raw: RawCoefficients = toml::from_str(s)?;

        let electricity = positive("electricity", raw.electricity)?;
        let waste = positive("waste", raw.waste)?;

        if !(1..=31).contains(&raw.days_per_month) {
            return Err(CoefficientError::InvalidDaysPerMonth(raw.days_per_month));
        }

        let mut transport = BTreeMap::new();
        for (key, value) in raw.transport {
            let mode: TransportMode = key.parse().map_err(|_| CoefficientError::UnknownKey {
                section: "transport",
                key: key.clone(),
            })?;
            transport.insert(mode, positive(&key, value)?);
        }

        let mut diet = BTreeMap::new();
        for (key, value) in raw.diet {
            let diet_type: DietType = key.parse().map_err(|_| CoefficientError::UnknownKey {
                section: "diet",
                key: key.clone(),
            })?;
            diet.insert(diet_type, positive(&key, value)?);
        }

        if let Some(missing) = DietType::all().iter().find(|d| !diet.contains_key(d)) {
            return Err(CoefficientError::MissingDiet(*missing));
        }

        Ok(Self {
            transport,
            diet,
            electricity,
            waste,
            days_per_month: raw.days_per_month,
        })
    }

    /// Factor for a transport mode; zero when the table has no entry.
    #[must_use]
    pub fn transport(&self, mode: TransportMode) -> f64 {
        self.transport.get(&mode).copied().unwrap_or(0.0)
    }

    /// Daily factor for a diet.
    #[must_use]
    pub fn diet(&self, diet: DietType) -> f64 {
        self.diet.get(&diet).copied().unwrap_or(0.0)
    }

    /// Factor per kWh of electricity.
    #[must_use]
    pub const fn electricity(&self) -> f64 {
        self.electricity
    }

    /// Factor per kg of waste.
    #[must_use]
    pub const fn waste(&self) -> f64 {
        self.waste
    }

    /// Length of the month used for the food term.
    #[must_use]
    pub const fn days_per_month(&self) -> u32 {
        self.days_per_month
    }
}

fn positive(name: &str, value: f64) -> Result<f64, CoefficientError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(CoefficientError::NotPositive {
            name: name.to_string(),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r"
        electricity = 0.4
        waste = 0.2

        [transport]
        car = 0.3

        [diet]
        vegan = 1.0
        vegetarian = 1.1
        pescatarian = 1.2
        omnivore = 1.3
        meat_heavy = 1.4
    ";

    #[test]
    fn embedded_table_loads() {
        let coeffs = EmissionCoefficients::embedded().unwrap();
        assert!((coeffs.transport(TransportMode::Car) - 0.271).abs() < f64::EPSILON);
        assert!((coeffs.diet(DietType::Vegan) - 1.5).abs() < f64::EPSILON);
        assert_eq!(coeffs.days_per_month(), 30);
    }

    #[test]
    fn embedded_table_covers_every_mode() {
        let coeffs = EmissionCoefficients::embedded().unwrap();
        for mode in TransportMode::all() {
            assert!(coeffs.transport(*mode) > 0.0, "no factor for {mode}");
        }
    }

    #[test]
    fn missing_transport_mode_is_zero() {
        let coeffs = EmissionCoefficients::from_toml_str(MINIMAL).unwrap();
        assert!(coeffs.transport(TransportMode::LongHaulFlight).abs() < f64::EPSILON);
        assert_eq!(coeffs.days_per_month(), DEFAULT_DAYS_PER_MONTH);
    }

    #[test]
    fn rejects_unknown_mode() {
        let toml = MINIMAL.replace("car = 0.3", "hovercraft = 0.3");
        assert!(matches!(
            EmissionCoefficients::from_toml_str(&toml),
            Err(CoefficientError::UnknownKey {
                section: "transport",
                ..
            })
        ));
    }

    #[test]
    fn rejects_non_positive_factor() {
        let toml = MINIMAL.replace("waste = 0.2", "waste = 0.0");
        assert!(matches!(
            EmissionCoefficients::from_toml_str(&toml),
            Err(CoefficientError::NotPositive { .. })
        ));

        let toml = MINIMAL.replace("car = 0.3", "car = -0.3");
        assert!(matches!(
            EmissionCoefficients::from_toml_str(&toml),
            Err(CoefficientError::NotPositive { .. })
        ));
    }

    #[test]
    fn rejects_missing_diet() {
        let toml = MINIMAL.replace("meat_heavy = 1.4", "");
        assert!(matches!(
            EmissionCoefficients::from_toml_str(&toml),
            Err(CoefficientError::MissingDiet(DietType::MeatHeavy))
        ));
    }

    #[test]
    fn days_per_month_is_configurable() {
        let toml = format!("days_per_month = 31\n{MINIMAL}");
        let coeffs = EmissionCoefficients::from_toml_str(&toml).unwrap();
        assert_eq!(coeffs.days_per_month(), 31);

        let toml = format!("days_per_month = 0\n{MINIMAL}");
        assert!(matches!(
            EmissionCoefficients::from_toml_str(&toml),
            Err(CoefficientError::InvalidDaysPerMonth(0))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = EmissionCoefficients::from_file(Path::new("/nonexistent/coefficients.toml"));
        assert!(matches!(result, Err(CoefficientError::Io { .. })));
    }
}
