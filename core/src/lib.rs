//! Credit desk core for small-business ("PyME") loan applicants.
//!
//! Layers, leaf-first:
//!   ratios       pure solvency and profitability indicators
//!   portfolio    population averages for benchmarking
//!   risk         placeholder delinquency scoring
//!   store        SQLite applicant records
//!   desk         request façade tying the above together

pub mod applicant;
pub mod config;
pub mod desk;
pub mod error;
pub mod portfolio;
pub mod ratios;
pub mod risk;
pub mod rng;
pub mod store;
pub mod types;
pub mod warnings;
