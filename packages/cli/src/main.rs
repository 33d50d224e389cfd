#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the carbon tracker.
//!
//! ```text
//! carbon_tracker annual --transport-km 12000 --energy-mwh 4 --meat-meals 20 --waste-kg 8
//! carbon_tracker monthly --record car:25:20 --electricity-kwh 250 --diet omnivore --waste-kg 30
//! carbon_tracker distance --from 40.7128,-74.006 --to 51.5074,-0.1278
//! carbon_tracker tips --footprint 420
//! carbon_tracker ask "Is a heat pump worth it?"
//! carbon_tracker serve
//! ```
//!
//! Running with no subcommand starts an interactive session.

mod interactive;
mod parse;

use std::sync::Arc;

use carbon_tracker_ai::{TipsAdapter, render_reply};
use carbon_tracker_footprint::annual::{REDUCTION_TIPS, estimate_annual};
use carbon_tracker_footprint::{EmissionCoefficients, RecordLedger, compute_footprint};
use carbon_tracker_footprint_models::{AnnualInputs, DietType, FootprintComponent};
use carbon_tracker_geography::{GeoPoint, distance_km};
use carbon_tracker_session::HouseholdInputs;
use clap::{Parser, Subcommand};

use crate::parse::RecordArg;

#[derive(Parser)]
#[command(name = "carbon_tracker", about = "Estimate and reduce your carbon footprint")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Coarse annual estimate in metric tons CO2e
    Annual {
        /// Kilometres travelled by car per year
        #[arg(long, default_value = "0")]
        transport_km: f64,
        /// Electricity used per year in MWh
        #[arg(long, default_value = "0")]
        energy_mwh: f64,
        /// Meals with meat per month
        #[arg(long, default_value = "0")]
        meat_meals: f64,
        /// Waste produced per week in kg
        #[arg(long, default_value = "0")]
        waste_kg: f64,
    },
    /// Monthly per-category footprint in kg CO2e
    Monthly {
        /// Transport entry as `mode:km:trips` (repeatable)
        #[arg(long = "record", value_parser = parse::parse_record)]
        records: Vec<RecordArg>,
        /// Electricity used per month in kWh
        #[arg(long, default_value = "0")]
        electricity_kwh: f64,
        /// Diet type (vegan, vegetarian, pescatarian, omnivore, meat_heavy)
        #[arg(long, default_value = "omnivore", value_parser = parse::parse_diet)]
        diet: DietType,
        /// Waste produced per month in kg
        #[arg(long, default_value = "0")]
        waste_kg: f64,
    },
    /// Geodesic distance between two `lat,lon` points
    Distance {
        /// First point as `lat,lon`
        #[arg(long, value_parser = parse::parse_point, allow_hyphen_values = true)]
        from: GeoPoint,
        /// Second point as `lat,lon`
        #[arg(long, value_parser = parse::parse_point, allow_hyphen_values = true)]
        to: GeoPoint,
    },
    /// Ask the AI service for tips on a monthly footprint
    Tips {
        /// Monthly footprint in kg CO2e
        #[arg(long)]
        footprint: f64,
    },
    /// Ask the AI service a free-form question
    Ask {
        /// The question
        text: String,
    },
    /// Start the HTTP API server
    Serve,
}

fn tips_adapter() -> TipsAdapter {
    TipsAdapter::new(Arc::from(
        carbon_tracker_ai::providers::provider_from_env_or_unconfigured(),
    ))
}

fn run_annual(inputs: &AnnualInputs) -> Result<(), Box<dyn std::error::Error>> {
    inputs.validate()?;
    let estimate = estimate_annual(inputs);

    println!("Transport: {:>10.2} t CO2e", estimate.transport);
    println!("Energy:    {:>10.2} t CO2e", estimate.energy);
    println!("Food:      {:>10.2} t CO2e", estimate.food);
    println!("Waste:     {:>10.2} t CO2e", estimate.waste);
    println!(
        "\nYour estimated carbon footprint is {:.2} metric tons of CO2e per year.\n",
        estimate.total
    );

    println!("Tips to reduce your carbon footprint:");
    for (title, detail) in REDUCTION_TIPS {
        println!("  - {title}: {detail}");
    }
    Ok(())
}

fn run_monthly(
    records: &[RecordArg],
    electricity_kwh: f64,
    diet: DietType,
    waste_kg: f64,
) -> Result<(), Box<dyn std::error::Error>> {
    let coeffs = EmissionCoefficients::load_from_env()?;
    HouseholdInputs {
        electricity_kwh,
        diet,
        waste_kg,
    }
    .validate()?;

    let mut ledger = RecordLedger::new();
    for r in records {
        if !ledger.add(r.mode, r.distance_km, r.trips) {
            log::warn!(
                "Skipping {} record with {} km x {} trips",
                r.mode,
                r.distance_km,
                r.trips
            );
        }
    }

    for (i, r) in ledger.numbered() {
        println!(
            "{i}. {}: {} km x {} trips",
            r.mode.label(),
            r.distance_km,
            r.trips
        );
    }

    let breakdown = compute_footprint(ledger.records(), electricity_kwh, diet, waste_kg, &coeffs);
    for component in FootprintComponent::all() {
        println!(
            "{:<15} {:>10.2} kg CO2e",
            component.to_string(),
            breakdown.component(*component)
        );
    }
    println!("{:<15} {:>10.2} kg CO2e per month", "total", breakdown.total());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return interactive::run().await;
    };

    match command {
        Commands::Annual {
            transport_km,
            energy_mwh,
            meat_meals,
            waste_kg,
        } => run_annual(&AnnualInputs {
            transport_km_per_year: transport_km,
            energy_mwh_per_year: energy_mwh,
            meat_meals_per_month: meat_meals,
            waste_kg_per_week: waste_kg,
        })?,
        Commands::Monthly {
            records,
            electricity_kwh,
            diet,
            waste_kg,
        } => run_monthly(&records, electricity_kwh, diet, waste_kg)?,
        Commands::Distance { from, to } => {
            println!("Distance from {from} to {to}: {:.2} km", distance_km(&from, &to));
        }
        Commands::Tips { footprint } => {
            parse::non_negative("footprint", footprint)?;
            let result = tips_adapter().get_tips(footprint).await;
            println!("{}", render_reply(&result));
        }
        Commands::Ask { text } => {
            let result = tips_adapter().get_bot_response(&text).await;
            println!("{}", render_reply(&result));
        }
        Commands::Serve => {
            // The server uses actix-web's runtime, so we need to run it
            // in a blocking task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(carbon_tracker_server::run_server())
            })
            .await??;
        }
    }

    Ok(())
}
