//! Demandcast
//!
//! Demand-forecasting engine for inventory management: normalizes
//! per-SKU sales history into daily series, forecasts future demand with
//! interchangeable methods, and derives replenishment advice.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod migrator;
pub mod repositories;
pub mod services;

pub mod prelude {
    pub use crate::config::{load_config, AppConfig};
    pub use crate::db::DbPool;
    pub use crate::errors::ServiceError;
    pub use crate::repositories::{
        ForecastRepository, InventoryRepository, SalesHistoryRepository,
    };
    pub use crate::services::forecasting::{
        DailySeries, DemandForecast, ForecastMethod, ForecastRequest, ForecastingService,
        ReorderPriority, ReorderSuggestion,
    };
}
