#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the carbon tracker server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the domain types to allow independent evolution of the API
//! contract.

use carbon_tracker_footprint_models::{
    AnnualEstimate, DietType, FootprintBreakdown, FootprintComponent, TransportMode,
    TransportationRecord,
};
use carbon_tracker_geography_models::GeoPoint;
use carbon_tracker_session::{ChatTurn, HouseholdInputs};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Error body returned with any non-2xx status.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    /// What went wrong.
    pub error: String,
}

/// Response to starting a session.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSession {
    /// Id to use in subsequent session URLs.
    pub session_id: Uuid,
}

/// Body for adding a transport record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTransportRequest {
    /// Mode of travel.
    pub mode: TransportMode,
    /// Distance of a single trip in km.
    pub distance_km: f64,
    /// Number of trips.
    pub trips: u32,
}

/// A ledger entry as shown to the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTransportRecord {
    /// 1-based position in the ledger.
    pub index: usize,
    /// Mode of travel.
    pub mode: TransportMode,
    /// Display label for the mode.
    pub mode_label: String,
    /// Distance of a single trip in km.
    pub distance_km: f64,
    /// Number of trips.
    pub trips: u32,
}

impl ApiTransportRecord {
    /// Builds the display form of a ledger entry.
    #[must_use]
    pub fn new(index: usize, record: &TransportationRecord) -> Self {
        Self {
            index,
            mode: record.mode,
            mode_label: record.mode.label().to_string(),
            distance_km: record.distance_km,
            trips: record.trips,
        }
    }
}

/// The ledger, plus whether the last add was accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTransportLedger {
    /// Whether the submitted record was appended. Absent for plain reads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added: Option<bool>,
    /// All entries in insertion order.
    pub records: Vec<ApiTransportRecord>,
}

/// Body for replacing the household inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInputsRequest {
    /// Electricity per month in kWh.
    pub electricity_kwh: f64,
    /// Diet type.
    pub diet: DietType,
    /// Waste per month in kg.
    pub waste_kg: f64,
}

impl From<UpdateInputsRequest> for HouseholdInputs {
    fn from(req: UpdateInputsRequest) -> Self {
        Self {
            electricity_kwh: req.electricity_kwh,
            diet: req.diet,
            waste_kg: req.waste_kg,
        }
    }
}

/// One component's share of the footprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiShare {
    /// Which component.
    pub component: FootprintComponent,
    /// Fraction of the total in [0, 1].
    pub share: f64,
}

/// Monthly footprint for a session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFootprint {
    /// Per-component and total kg CO2e per month.
    pub breakdown: FootprintBreakdown,
    /// Component shares of the total.
    pub shares: Vec<ApiShare>,
    /// Inputs the breakdown was computed from.
    pub inputs: HouseholdInputs,
    /// Number of ledger entries included.
    pub record_count: usize,
}

impl ApiFootprint {
    /// Assembles the response from a computed breakdown.
    #[must_use]
    pub fn new(breakdown: FootprintBreakdown, inputs: HouseholdInputs, record_count: usize) -> Self {
        let shares = breakdown
            .category_shares()
            .into_iter()
            .map(|(component, share)| ApiShare { component, share })
            .collect();
        Self {
            breakdown,
            shares,
            inputs,
            record_count,
        }
    }
}

/// Body for recording a map click.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPointRequest {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

/// Current map selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPoints {
    /// Held points, oldest first.
    pub points: Vec<GeoPoint>,
    /// Geodesic distance in km, present only with exactly two points.
    pub distance_km: Option<f64>,
}

/// Body for a chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessageRequest {
    /// What the user typed.
    pub text: String,
}

/// A rendered assistant reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiReply {
    /// Reply text, or `"Error: <message>"`.
    pub reply: String,
    /// Whether the upstream call failed.
    pub is_error: bool,
}

/// A session's chat transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiChatHistory {
    /// Turns in insertion order.
    pub turns: Vec<ChatTurn>,
}

/// A generic reduction tip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiTip {
    /// Short heading.
    pub title: String,
    /// Advice.
    pub detail: String,
}

/// Annual estimate plus generic advice.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAnnualEstimate {
    /// Metric tons CO2e per year by term.
    pub estimate: AnnualEstimate,
    /// Total formatted to two decimals.
    pub summary: String,
    /// Static reduction tips.
    pub tips: Vec<ApiTip>,
}
