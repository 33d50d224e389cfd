//! Interactive session in the terminal.
//!
//! Holds one [`Session`] for the life of the process and loops over a menu
//! of actions until the user quits. All state is dropped on exit.

use std::sync::Arc;

use carbon_tracker_ai::{TipsAdapter, render_reply};
use carbon_tracker_footprint::EmissionCoefficients;
use carbon_tracker_footprint_models::{DietType, FootprintComponent, TransportMode};
use carbon_tracker_geography::GeoPoint;
use carbon_tracker_session::{ChatRole, HouseholdInputs, Session};
use dialoguer::{Input, Select};

enum Action {
    AddTransport,
    SetInputs,
    ShowFootprint,
    AddPoint,
    GetTips,
    Ask,
    ShowChat,
    Reset,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::AddTransport,
        Self::SetInputs,
        Self::ShowFootprint,
        Self::AddPoint,
        Self::GetTips,
        Self::Ask,
        Self::ShowChat,
        Self::Reset,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::AddTransport => "Add transport record",
            Self::SetInputs => "Set electricity, diet and waste",
            Self::ShowFootprint => "Show monthly footprint",
            Self::AddPoint => "Add map point",
            Self::GetTips => "Get AI tips for my footprint",
            Self::Ask => "Ask the chatbot",
            Self::ShowChat => "Show chat history",
            Self::Reset => "Reset session",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the interactive session loop.
///
/// # Errors
///
/// Returns an error if the coefficient table cannot be loaded or a prompt
/// fails (e.g. the terminal is closed).
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let coeffs = EmissionCoefficients::load_from_env()?;
    let tips = TipsAdapter::new(Arc::from(
        carbon_tracker_ai::providers::provider_from_env_or_unconfigured(),
    ));
    let mut session = Session::new();

    println!("Carbon Footprint Calculator");
    println!();

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    loop {
        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        match Action::ALL[idx] {
            Action::AddTransport => add_transport(&mut session)?,
            Action::SetInputs => set_inputs(&mut session)?,
            Action::ShowFootprint => show_footprint(&session, &coeffs),
            Action::AddPoint => add_point(&mut session)?,
            Action::GetTips => {
                let total = session.footprint(&coeffs).total();
                println!("{}", render_reply(&tips.get_tips(total).await));
            }
            Action::Ask => {
                let text: String = Input::new().with_prompt("You").interact_text()?;
                session.chat.append_turn(ChatRole::User, text.clone());
                let reply = render_reply(&tips.get_bot_response(&text).await);
                println!("Bot: {reply}");
                session.chat.append_turn(ChatRole::Assistant, reply);
            }
            Action::ShowChat => print!("{}", session.chat.render()),
            Action::Reset => {
                session.reset();
                println!("Session cleared.");
            }
            Action::Quit => break,
        }
        println!();
    }

    Ok(())
}

fn add_transport(session: &mut Session) -> Result<(), Box<dyn std::error::Error>> {
    let modes = TransportMode::all();
    let labels: Vec<&str> = modes.iter().map(|m| m.label()).collect();
    let idx = Select::new()
        .with_prompt("Mode")
        .items(&labels)
        .default(0)
        .interact()?;

    let distance_km: f64 = Input::new()
        .with_prompt("Distance per trip (km)")
        .interact_text()?;
    let trips: u32 = Input::new()
        .with_prompt("Number of trips")
        .default(1)
        .interact_text()?;

    if session.ledger.add(modes[idx], distance_km, trips) {
        for (i, r) in session.ledger.numbered() {
            println!(
                "{i}. {}: {} km x {} trips",
                r.mode.label(),
                r.distance_km,
                r.trips
            );
        }
    } else {
        println!("Distance and trips must both be greater than zero.");
    }
    Ok(())
}

fn set_inputs(session: &mut Session) -> Result<(), Box<dyn std::error::Error>> {
    let current = *session.inputs();

    let electricity_kwh: f64 = Input::new()
        .with_prompt("Electricity per month (kWh)")
        .default(current.electricity_kwh)
        .interact_text()?;

    let diets = DietType::all();
    let labels: Vec<String> = diets.iter().map(ToString::to_string).collect();
    let default_diet = diets.iter().position(|d| *d == current.diet).unwrap_or(0);
    let idx = Select::new()
        .with_prompt("Diet")
        .items(&labels)
        .default(default_diet)
        .interact()?;

    let waste_kg: f64 = Input::new()
        .with_prompt("Waste per month (kg)")
        .default(current.waste_kg)
        .interact_text()?;

    if let Err(e) = session.set_inputs(HouseholdInputs {
        electricity_kwh,
        diet: diets[idx],
        waste_kg,
    }) {
        println!("Not updated: {e}");
    }
    Ok(())
}

fn show_footprint(session: &Session, coeffs: &EmissionCoefficients) {
    let breakdown = session.footprint(coeffs);
    for (component, share) in breakdown.category_shares() {
        println!(
            "{:<15} {:>10.2} kg CO2e ({:>5.1}%)",
            component.to_string(),
            breakdown.component(component),
            share * 100.0
        );
    }
    println!("{:<15} {:>10.2} kg CO2e per month", "total", breakdown.total());

    if breakdown.total() > 0.0 {
        let largest = FootprintComponent::all()
            .iter()
            .copied()
            .max_by(|a, b| breakdown.component(*a).total_cmp(&breakdown.component(*b)));
        if let Some(largest) = largest {
            println!("Largest contributor: {largest}");
        }
    }
}

fn add_point(session: &mut Session) -> Result<(), Box<dyn std::error::Error>> {
    let latitude: f64 = Input::new().with_prompt("Latitude").interact_text()?;
    let longitude: f64 = Input::new().with_prompt("Longitude").interact_text()?;

    match GeoPoint::new(latitude, longitude) {
        Ok(point) => session.points.record_click(point),
        Err(e) => {
            println!("{e}");
            return Ok(());
        }
    }

    for (i, p) in session.points.points().iter().enumerate() {
        println!("Point {}: {p}", i + 1);
    }
    if let Some(d) = session.points.distance_km() {
        println!("Distance: {d:.2} km");
    }
    Ok(())
}
