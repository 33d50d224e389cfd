#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the carbon tracker.
//!
//! Reads `BIND_ADDR`, `PORT`, `RUST_LOG`, the AI provider variables, and
//! `CARBON_COEFFICIENTS_PATH` from the environment.

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    carbon_tracker_server::run_server().await
}
