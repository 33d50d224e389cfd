#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Emission category types shared across the carbon tracker.
//!
//! Two calculators live side by side and deliberately do not share types:
//!
//! - The monthly per-category model ([`TransportationRecord`],
//!   [`FootprintBreakdown`]) in kg CO2e per month.
//! - The coarse annual model ([`AnnualInputs`], [`AnnualEstimate`]) in
//!   metric tons CO2e per year.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// Ways of travelling that carry a per-kilometre emission factor.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TransportMode {
    /// Private car, single occupant.
    Car,
    /// Bus, tram, metro and regional rail.
    PublicTransport,
    /// Flights under roughly 1500 km.
    ShortHaulFlight,
    /// Flights over roughly 1500 km.
    LongHaulFlight,
}

impl TransportMode {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Car,
            Self::PublicTransport,
            Self::ShortHaulFlight,
            Self::LongHaulFlight,
        ]
    }

    /// Human-readable label for display.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Car => "Car",
            Self::PublicTransport => "Public Transport",
            Self::ShortHaulFlight => "Short-Haul Flight",
            Self::LongHaulFlight => "Long-Haul Flight",
        }
    }
}

/// Diet categories, each with a fixed daily emission factor.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DietType {
    /// No animal products.
    Vegan,
    /// No meat or fish.
    Vegetarian,
    /// Fish but no meat.
    Pescatarian,
    /// Mixed diet with moderate meat.
    #[default]
    Omnivore,
    /// Meat with most meals.
    MeatHeavy,
}

impl DietType {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Vegan,
            Self::Vegetarian,
            Self::Pescatarian,
            Self::Omnivore,
            Self::MeatHeavy,
        ]
    }
}

/// The four components of a monthly footprint.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FootprintComponent {
    /// Travel, summed over the transport ledger.
    Transportation,
    /// Household electricity.
    Electricity,
    /// Diet.
    Food,
    /// Household waste.
    Waste,
}

impl FootprintComponent {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Transportation,
            Self::Electricity,
            Self::Food,
            Self::Waste,
        ]
    }
}

/// A single entry in a session's transport ledger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportationRecord {
    /// How the distance was travelled.
    pub mode: TransportMode,
    /// One-way distance of a single trip in kilometres.
    pub distance_km: f64,
    /// Number of trips of this distance.
    pub trips: u32,
}

impl TransportationRecord {
    /// Upper bound for a single trip's distance, a little over one trip
    /// around the equator.
    pub const MAX_DISTANCE_KM: f64 = 50_000.0;

    /// Total kilometres covered by this entry.
    #[must_use]
    pub fn total_km(&self) -> f64 {
        self.distance_km * f64::from(self.trips)
    }
}

/// Monthly emissions per component, in kg CO2e.
///
/// `total` always equals the plain sum of the four components; no rounding
/// is applied here. The only way to build one is
/// [`FootprintBreakdown::from_components`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FootprintBreakdown {
    transportation: f64,
    electricity: f64,
    food: f64,
    waste: f64,
    total: f64,
}

impl FootprintBreakdown {
    /// Builds a breakdown, computing `total` from the components.
    #[must_use]
    pub fn from_components(transportation: f64, electricity: f64, food: f64, waste: f64) -> Self {
        Self {
            transportation,
            electricity,
            food,
            waste,
            total: transportation + electricity + food + waste,
        }
    }

    /// Transport emissions.
    #[must_use]
    pub const fn transportation(&self) -> f64 {
        self.transportation
    }

    /// Electricity emissions.
    #[must_use]
    pub const fn electricity(&self) -> f64 {
        self.electricity
    }

    /// Diet emissions.
    #[must_use]
    pub const fn food(&self) -> f64 {
        self.food
    }

    /// Waste emissions.
    #[must_use]
    pub const fn waste(&self) -> f64 {
        self.waste
    }

    /// Sum of the four components.
    #[must_use]
    pub const fn total(&self) -> f64 {
        self.total
    }

    /// Returns the value of one component.
    #[must_use]
    pub const fn component(&self, component: FootprintComponent) -> f64 {
        match component {
            FootprintComponent::Transportation => self.transportation,
            FootprintComponent::Electricity => self.electricity,
            FootprintComponent::Food => self.food,
            FootprintComponent::Waste => self.waste,
        }
    }

    /// Each component's fraction of the total, in [`FootprintComponent::all`]
    /// order. All zero when the total is zero.
    #[must_use]
    pub fn category_shares(&self) -> Vec<(FootprintComponent, f64)> {
        FootprintComponent::all()
            .iter()
            .map(|c| {
                let share = if self.total > 0.0 {
                    self.component(*c) / self.total
                } else {
                    0.0
                };
                (*c, share)
            })
            .collect()
    }
}

/// Errors raised at the input boundary before values reach a calculator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    /// A quantity was NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A quantity was outside its accepted range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
        /// Lower bound (inclusive).
        min: f64,
        /// Upper bound (inclusive).
        max: f64,
    },
}

/// Checks that `value` is finite and within `min..=max`.
///
/// # Errors
///
/// Returns [`InputError`] when the value is not finite or is out of range.
pub fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<f64, InputError> {
    if !value.is_finite() {
        return Err(InputError::NotFinite { field });
    }
    if value < min || value > max {
        return Err(InputError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(value)
}

/// Inputs to the coarse annual calculator.
///
/// Each field has its own unit and time base; see the field docs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnualInputs {
    /// Kilometres driven by car per year.
    pub transport_km_per_year: f64,
    /// Electricity used per year, in MWh.
    pub energy_mwh_per_year: f64,
    /// Meals containing meat per month.
    pub meat_meals_per_month: f64,
    /// Household waste per week, in kg.
    pub waste_kg_per_week: f64,
}

impl AnnualInputs {
    /// Upper bound for yearly car kilometres.
    pub const MAX_TRANSPORT_KM: f64 = 50_000.0;
    /// Upper bound for yearly electricity in MWh.
    pub const MAX_ENERGY_MWH: f64 = 50.0;
    /// Upper bound for monthly meat meals.
    pub const MAX_MEAT_MEALS: f64 = 100.0;
    /// Upper bound for weekly waste in kg.
    pub const MAX_WASTE_KG: f64 = 50.0;

    /// Validates every field against the calculator's accepted ranges.
    ///
    /// # Errors
    ///
    /// Returns the first [`InputError`] encountered.
    pub fn validate(&self) -> Result<(), InputError> {
        check_range(
            "transportKmPerYear",
            self.transport_km_per_year,
            0.0,
            Self::MAX_TRANSPORT_KM,
        )?;
        check_range(
            "energyMwhPerYear",
            self.energy_mwh_per_year,
            0.0,
            Self::MAX_ENERGY_MWH,
        )?;
        check_range(
            "meatMealsPerMonth",
            self.meat_meals_per_month,
            0.0,
            Self::MAX_MEAT_MEALS,
        )?;
        check_range(
            "wasteKgPerWeek",
            self.waste_kg_per_week,
            0.0,
            Self::MAX_WASTE_KG,
        )?;
        Ok(())
    }
}

/// Result of the coarse annual calculator, in metric tons CO2e per year.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnualEstimate {
    /// Car travel.
    pub transport: f64,
    /// Electricity.
    pub energy: f64,
    /// Meat consumption.
    pub food: f64,
    /// Household waste.
    pub waste: f64,
    /// Sum of the four terms.
    pub total: f64,
}
