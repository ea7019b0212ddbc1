//! Core traits for the markets dashboard.

mod session;

pub use session::WarehouseSession;
