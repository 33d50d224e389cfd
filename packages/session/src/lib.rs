#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Session-scoped state for one user of the carbon tracker.
//!
//! A [`Session`] owns the transport ledger, household inputs, map point
//! buffer and chat transcript. Nothing here is global: callers hold a
//! session (or look one up in a [`store::SessionStore`]) and pass it
//! explicitly. Sessions never share state and are discarded when they end.

pub mod chat;
pub mod store;

pub use chat::{ChatHistory, ChatRole, ChatTurn};
pub use store::{SessionError, SessionStore};

use carbon_tracker_footprint::{EmissionCoefficients, RecordLedger, compute_footprint};
use carbon_tracker_footprint_models::{DietType, FootprintBreakdown, InputError, check_range};
use carbon_tracker_geography::PointBuffer;
use serde::{Deserialize, Serialize};

/// Non-transport inputs to the monthly footprint.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdInputs {
    /// Electricity used per month in kWh.
    pub electricity_kwh: f64,
    /// Diet type.
    pub diet: DietType,
    /// Waste produced per month in kg.
    pub waste_kg: f64,
}

impl HouseholdInputs {
    /// Upper bound for monthly electricity in kWh.
    pub const MAX_ELECTRICITY_KWH: f64 = 50_000.0;
    /// Upper bound for monthly waste in kg.
    pub const MAX_WASTE_KG: f64 = 5_000.0;

    /// Checks that quantities are finite, non-negative and within the
    /// household bounds.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] for the first invalid field.
    pub fn validate(&self) -> Result<(), InputError> {
        check_range(
            "electricityKwh",
            self.electricity_kwh,
            0.0,
            Self::MAX_ELECTRICITY_KWH,
        )?;
        check_range("wasteKg", self.waste_kg, 0.0, Self::MAX_WASTE_KG)?;
        Ok(())
    }
}

/// Everything one user accumulates during a session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Transport entries.
    pub ledger: RecordLedger,
    /// Map selections.
    pub points: PointBuffer,
    /// Chat transcript.
    pub chat: ChatHistory,
    inputs: HouseholdInputs,
}

impl Session {
    /// Creates an empty session with default inputs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current household inputs.
    #[must_use]
    pub const fn inputs(&self) -> &HouseholdInputs {
        &self.inputs
    }

    /// Replaces the household inputs after validating them. Invalid inputs
    /// leave the session unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] if a quantity is negative or not finite.
    pub fn set_inputs(&mut self, inputs: HouseholdInputs) -> Result<(), InputError> {
        inputs.validate()?;
        self.inputs = inputs;
        Ok(())
    }

    /// Recomputes the monthly footprint from the current ledger and inputs.
    #[must_use]
    pub fn footprint(&self, coeffs: &EmissionCoefficients) -> FootprintBreakdown {
        compute_footprint(
            self.ledger.records(),
            self.inputs.electricity_kwh,
            self.inputs.diet,
            self.inputs.waste_kg,
            coeffs,
        )
    }

    /// Clears the ledger, points and transcript and restores default inputs.
    pub fn reset(&mut self) {
        self.ledger.reset();
        self.points.reset();
        self.chat.clear();
        self.inputs = HouseholdInputs::default();
    }
}
