//! Core types and traits for the markets dashboard.
//!
//! This crate provides the foundational building blocks including:
//! - Warehouse row types (raw long-format rows and pivoted records)
//! - The stock metric selector shared by views and the CLI
//! - The `WarehouseSession` trait the data adapter is written against
//! - The error taxonomy shared across crates

pub mod error;
pub mod traits;
pub mod types;

pub use error::{DashboardError, DashboardResult, DataError};
pub use traits::*;
pub use types::*;
