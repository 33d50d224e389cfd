//! Coarse annual footprint estimate.
//!
//! Four raw yearly/monthly/weekly quantities, each multiplied by a fixed
//! coefficient and summed. Results are metric tons CO2e per year. This model
//! shares nothing with the monthly per-category table.

use carbon_tracker_footprint_models::{AnnualEstimate, AnnualInputs};

/// Tons CO2e per km driven per year.
pub const TRANSPORT_FACTOR: f64 = 0.2;
/// Tons CO2e per MWh per year.
pub const ENERGY_FACTOR: f64 = 0.3;
/// Tons CO2e per meat meal per month.
pub const FOOD_FACTOR: f64 = 0.1;
/// Tons CO2e per kg of waste per week.
pub const WASTE_FACTOR: f64 = 0.05;

/// Generic reduction advice shown next to the annual estimate.
pub const REDUCTION_TIPS: &[(&str, &str)] = &[
    (
        "Reduce car travel",
        "Consider carpooling, public transportation, biking, or walking.",
    ),
    (
        "Save energy",
        "Switch to energy-efficient appliances and use renewable energy sources.",
    ),
    (
        "Eat less meat",
        "Consider reducing your meat consumption or switching to plant-based alternatives.",
    ),
    (
        "Reduce waste",
        "Recycle, compost, and minimize single-use plastics.",
    ),
];

/// Computes the annual estimate. Inputs should be validated with
/// [`AnnualInputs::validate`] first.
#[must_use]
pub fn estimate_annual(inputs: &AnnualInputs) -> AnnualEstimate {
    let transport = inputs.transport_km_per_year * TRANSPORT_FACTOR;
    let energy = inputs.energy_mwh_per_year * ENERGY_FACTOR;
    let food = inputs.meat_meals_per_month * FOOD_FACTOR;
    let waste = inputs.waste_kg_per_week * WASTE_FACTOR;

    AnnualEstimate {
        transport,
        energy,
        food,
        waste,
        total: transport + energy + food + waste,
    }
}
