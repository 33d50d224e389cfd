#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Carbon footprint calculators.
//!
//! [`compute_footprint`] is the monthly per-category model, driven by the
//! [`EmissionCoefficients`] table and a session's transport ledger.
//! [`annual::estimate_annual`] is the independent coarse annual model with
//! its own fixed coefficients. The two are never combined: their units and
//! time bases differ.

pub mod annual;
pub mod coefficients;
pub mod ledger;

pub use coefficients::{CoefficientError, EmissionCoefficients};
pub use ledger::RecordLedger;

use carbon_tracker_footprint_models::{DietType, FootprintBreakdown, TransportationRecord};

/// Computes monthly emissions in kg CO2e.
///
/// Inputs are expected to be validated already (non-negative, finite).
/// A transport mode without a coefficient contributes zero. The food term
/// is the daily diet factor times the table's `days_per_month`.
#[must_use]
pub fn compute_footprint(
    records: &[TransportationRecord],
    electricity_kwh: f64,
    diet: DietType,
    waste_kg: f64,
    coeffs: &EmissionCoefficients,
) -> FootprintBreakdown {
    let transportation: f64 = records
        .iter()
        .map(|r| r.total_km() * coeffs.transport(r.mode))
        .sum();
    let electricity = electricity_kwh * coeffs.electricity();
    let food = coeffs.diet(diet) * f64::from(coeffs.days_per_month());
    let waste = waste_kg * coeffs.waste();

    FootprintBreakdown::from_components(transportation, electricity, food, waste)
}
