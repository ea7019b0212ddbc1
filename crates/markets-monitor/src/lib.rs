//! Terminal dashboard and logging setup.

mod dashboard;
mod logging;

pub use dashboard::{Dashboard, DashboardAction, DashboardState, SHIFT_DAYS};
pub use logging::setup_logging;
