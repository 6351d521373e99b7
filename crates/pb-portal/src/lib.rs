//! Calculation core for the participatory budgeting portal.
//!
//! Committee scoring, reach coefficients for public voting, and the financial
//! dashboard aggregates live here as pure functions over caller-supplied data.
//! The `committee` module wraps scoring in a repository-backed service and
//! exposes it over HTTP.

pub mod coefficient;
pub mod committee;
pub mod config;
pub mod domain;
pub mod error;
pub mod finance;
pub mod roles;
pub mod scoring;
pub mod telemetry;
