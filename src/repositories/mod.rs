//! Collaborator seams around the forecasting engine.
//!
//! The engine consumes the sales ledger and inventory levels read-only and
//! writes forecast points best-effort. Each seam is an object-safe async
//! trait with a SeaORM-backed implementation, so tests and alternative
//! backends can stand in without touching the orchestrator.

pub mod forecast_repository;
pub mod inventory_repository;
pub mod sales_history_repository;

pub use forecast_repository::{ForecastRepository, NewForecastPoint, SqlForecastRepository};
pub use inventory_repository::{InventoryRepository, SqlInventoryRepository};
pub use sales_history_repository::{SalesHistoryRepository, SqlSalesHistoryRepository};
