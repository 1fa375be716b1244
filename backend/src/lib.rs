//! FoodBuddy Backend Library
//!
//! This library exposes the backend modules for use in tests and the binary.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod generation;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
pub mod telemetry;
