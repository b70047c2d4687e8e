//! Weather dashboard - daily temperature chart and table for a date range
//!
//! The library exposes the dashboard's modules for testing.

pub mod action;
pub mod api;
pub mod chart;
pub mod components;
pub mod effect;
pub mod logging;
pub mod reducer;
pub mod state;
