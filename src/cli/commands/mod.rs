//! CLI command implementations.

pub mod dashboard;
pub mod fx;
pub mod output;
pub mod seed;
pub mod session;
pub mod stocks;
pub mod validate;
