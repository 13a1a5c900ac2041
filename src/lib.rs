//! Water-tank monitoring dashboard: subscriber list and tank request form.

pub mod app;
pub mod config;
pub mod requests;
pub mod subscribers;
pub mod telemetry;
pub mod ui;
