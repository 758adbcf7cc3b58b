//! Command-line host: stands in for the browser runtime around the core.
mod app;
mod cli;
mod config;
mod effects;
mod render;
mod snapshot;

pub use app::run_app;
