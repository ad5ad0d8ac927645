//! Core domain types and logic.

pub mod backtest;
pub mod config_validation;
pub mod crossover;
pub mod error;
pub mod indicator;
pub mod portfolio;
pub mod price;
pub mod signal;
pub mod strategy;
pub mod summary;
