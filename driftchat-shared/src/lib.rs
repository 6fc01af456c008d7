//! Shared models and configuration for the DriftChat client stack.

pub mod config;
pub mod models;
