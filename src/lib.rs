pub mod adapters;
pub mod ci;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::ServiceConfig;

pub use crate::core::ForecastEngine;
pub use server::{build_router, AppState};
pub use utils::error::{ForecastError, Result};
pub use utils::metrics::MetricsCollector;
