//! Command implementations for the CLI
//!
//! - run: interactive cost estimation form
//! - quote: headless calculation for rows given on the command line
//! - catalog: list the pricing catalog
//! - config: configuration display and validation

pub mod catalog;
pub mod config;
pub mod quote;
pub mod run;
