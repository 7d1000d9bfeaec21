//! Demand forecasting engine.
//!
//! Turns the per-SKU sales ledger into a gapless daily series, runs the
//! selected prediction method over it, and derives replenishment advice by
//! comparing predicted demand against stock on hand. Forecast points are
//! written through to the forecast store best-effort; that write never
//! delays or fails the caller's request.

pub mod predictors;
pub mod reorder;
pub mod series;

pub use predictors::{FitMetrics, ForecastMethod};
pub use reorder::{advise, ReorderPriority, ReorderSuggestion};
pub use series::DailySeries;

use chrono::{DateTime, Days, NaiveDate, Utc};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::errors::ServiceError;
use crate::repositories::{
    ForecastRepository, InventoryRepository, NewForecastPoint, SalesHistoryRepository,
    SqlForecastRepository, SqlInventoryRepository, SqlSalesHistoryRepository,
};

/// Horizon applied when a request leaves it unset
pub const DEFAULT_HORIZON_DAYS: u16 = 30;
/// Shortest accepted forecast horizon
pub const MIN_HORIZON_DAYS: u16 = 1;
/// Longest accepted forecast horizon
pub const MAX_HORIZON_DAYS: u16 = 90;
/// Placeholder confidence attached to persisted points; not derived from
/// residuals.
pub const CONFIDENCE_SCORE: f64 = 0.5;

/// Parameters for a single-SKU forecast.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ForecastRequest {
    #[validate(length(min = 1, message = "sku must not be empty"))]
    pub sku: String,

    /// Days ahead to forecast (1-90)
    #[serde(default = "default_horizon")]
    #[validate(range(min = 1, max = 90))]
    pub horizon_days: u16,

    #[serde(default)]
    pub method: ForecastMethod,

    /// Bound the sales history to the trailing N calendar days
    /// (today inclusive); unset means the full ledger.
    #[validate(range(min = 1))]
    pub lookback_days: Option<u16>,
}

impl ForecastRequest {
    /// Forecast `sku` with the combined method over the default horizon.
    pub fn new(sku: impl Into<String>) -> Self {
        Self {
            sku: sku.into(),
            horizon_days: DEFAULT_HORIZON_DAYS,
            method: ForecastMethod::default(),
            lookback_days: None,
        }
    }
}

fn default_horizon() -> u16 {
    DEFAULT_HORIZON_DAYS
}

/// One forecast day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted_demand: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPeriod {
    pub days: u16,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// What the ledger showed for the SKU before forecasting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalSummary {
    /// Raw ledger rows fetched
    pub total_records: usize,
    /// Total sales divided by the number of days the series spans
    pub average_daily_demand: f64,
    pub total_historical_sales: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub total_predicted_demand: i64,
    pub average_daily_demand: f64,
    /// Day with the highest predicted demand; earliest wins a tie
    pub peak_day: ForecastPoint,
}

/// Method descriptor and in-sample accuracy over the historical window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Distinct days with at least one sale
    pub data_points: usize,
    pub mae: Option<f64>,
    pub mape: Option<f64>,
}

/// The shaped result of a single-SKU forecast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandForecast {
    pub sku: String,
    pub method: ForecastMethod,
    pub forecast_period: ForecastPeriod,
    pub historical: HistoricalSummary,
    pub forecast: Vec<ForecastPoint>,
    pub summary: ForecastSummary,
    pub model_info: ModelInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reorder_suggestion: Option<ReorderSuggestion>,
    pub generated_at: DateTime<Utc>,
}

/// One SKU's entry in the batch planning report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchForecastItem {
    pub sku: String,
    pub current_stock: i64,
    pub reorder_threshold: i64,
    pub total_predicted_demand: i64,
    pub average_daily_demand: f64,
    pub priority: ReorderPriority,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchForecastError {
    pub sku: String,
    pub error: String,
}

/// Result of forecasting every SKU in the inventory snapshot, ordered by
/// priority (high first) with inventory-listing order preserved among ties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchForecastReport {
    pub results: Vec<BatchForecastItem>,
    pub errors: Vec<BatchForecastError>,
    pub generated_at: DateTime<Utc>,
}

/// Service for generating demand forecasts and replenishment advice
#[derive(Clone)]
pub struct ForecastingService {
    sales: Arc<dyn SalesHistoryRepository>,
    inventory: Arc<dyn InventoryRepository>,
    forecasts: Arc<dyn ForecastRepository>,
}

impl ForecastingService {
    pub fn new(
        sales: Arc<dyn SalesHistoryRepository>,
        inventory: Arc<dyn InventoryRepository>,
        forecasts: Arc<dyn ForecastRepository>,
    ) -> Self {
        Self {
            sales,
            inventory,
            forecasts,
        }
    }

    /// Wire the service to SeaORM-backed repositories over one connection
    /// pool.
    pub fn from_database(db: Arc<DatabaseConnection>) -> Self {
        Self::new(
            Arc::new(SqlSalesHistoryRepository::new(db.clone())),
            Arc::new(SqlInventoryRepository::new(db.clone())),
            Arc::new(SqlForecastRepository::new(db)),
        )
    }

    /// Generate a forecast for one SKU.
    ///
    /// Fails with `ValidationError` on bad parameters and `NotFound` when
    /// the SKU has no sales history. A missing or unreadable inventory
    /// record only omits the reorder suggestion, and persistence of the
    /// forecast points happens on a detached task whose failure is logged,
    /// never surfaced.
    #[instrument(skip(self, request), fields(sku = %request.sku, method = %request.method))]
    pub async fn generate_forecast(
        &self,
        request: ForecastRequest,
    ) -> Result<DemandForecast, ServiceError> {
        request.validate()?;
        let sku = request.sku.trim().to_string();
        if sku.is_empty() {
            return Err(ServiceError::ValidationError(
                "sku must not be empty".to_string(),
            ));
        }

        let horizon = usize::from(request.horizon_days);
        info!(horizon, "generating demand forecast");

        let range = request.lookback_days.map(|days| {
            let end = Utc::now().date_naive();
            let start = end - Days::new(u64::from(days) - 1);
            (start, end)
        });

        let observations = self.sales.fetch_for_sku(&sku, range).await?;
        if observations.is_empty() {
            return Err(ServiceError::NotFound(format!(
                "no sales history for SKU {}",
                sku
            )));
        }

        let series = DailySeries::from_observations(
            observations.iter().map(|o| (o.sale_date, o.quantity_sold)),
        )
        .ok_or_else(|| ServiceError::NotFound(format!("no sales history for SKU {}", sku)))?;

        let predicted = request.method.predict(series.values(), horizon);
        let fit = request.method.in_sample_fit(series.values());

        let start_date = series.end_date() + Days::new(1);
        let forecast: Vec<ForecastPoint> = predicted
            .iter()
            .enumerate()
            .map(|(i, &predicted_demand)| ForecastPoint {
                date: start_date + Days::new(i as u64),
                predicted_demand,
            })
            .collect();

        let total_predicted_demand: i64 = predicted.iter().sum();
        let peak_day = forecast[peak_index(&predicted)].clone();

        let total_historical_sales: i64 = observations.iter().map(|o| o.quantity_sold).sum();
        let observed_days: BTreeSet<NaiveDate> =
            observations.iter().map(|o| o.sale_date).collect();

        let generated_at = Utc::now();

        let reorder_suggestion = match self.inventory.find_by_sku(&sku).await {
            Ok(Some(record)) => Some(advise(
                total_predicted_demand,
                request.horizon_days,
                record.current_stock,
                record.reorder_threshold,
            )),
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "inventory lookup failed; omitting reorder suggestion");
                None
            }
        };

        self.persist_points(&sku, &forecast, generated_at);

        Ok(DemandForecast {
            sku,
            method: request.method,
            forecast_period: ForecastPeriod {
                days: request.horizon_days,
                start_date,
                end_date: start_date + Days::new(horizon as u64 - 1),
            },
            historical: HistoricalSummary {
                total_records: observations.len(),
                average_daily_demand: total_historical_sales as f64 / series.len() as f64,
                total_historical_sales,
            },
            forecast,
            summary: ForecastSummary {
                total_predicted_demand,
                average_daily_demand: total_predicted_demand as f64 / horizon as f64,
                peak_day,
            },
            model_info: ModelInfo {
                data_points: observed_days.len(),
                mae: fit.mae,
                mape: fit.mape,
            },
            reorder_suggestion,
            generated_at,
        })
    }

    /// Forecast every SKU in the inventory snapshot with the combined
    /// method.
    ///
    /// A SKU without sales history (or whose ledger fetch fails) is
    /// recorded in the error list and the batch continues.
    #[instrument(skip(self))]
    pub async fn generate_all_forecasts(
        &self,
        horizon_days: u16,
    ) -> Result<BatchForecastReport, ServiceError> {
        if !(MIN_HORIZON_DAYS..=MAX_HORIZON_DAYS).contains(&horizon_days) {
            return Err(ServiceError::ValidationError(format!(
                "horizon_days must be between {} and {}",
                MIN_HORIZON_DAYS, MAX_HORIZON_DAYS
            )));
        }

        let items = self.inventory.list_all().await?;
        info!(skus = items.len(), "generating forecasts for all SKUs");

        let horizon = usize::from(horizon_days);
        let mut results = Vec::with_capacity(items.len());
        let mut errors = Vec::new();

        for item in items {
            let observations = match self.sales.fetch_for_sku(&item.sku, None).await {
                Ok(observations) => observations,
                Err(e) => {
                    errors.push(BatchForecastError {
                        sku: item.sku,
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            let Some(series) = DailySeries::from_observations(
                observations.iter().map(|o| (o.sale_date, o.quantity_sold)),
            ) else {
                errors.push(BatchForecastError {
                    sku: item.sku,
                    error: "no sales history".to_string(),
                });
                continue;
            };

            let predicted = ForecastMethod::Combined.predict(series.values(), horizon);
            let total_predicted_demand: i64 = predicted.iter().sum();

            let priority = if item.current_stock <= item.reorder_threshold {
                ReorderPriority::High
            } else if total_predicted_demand > item.current_stock {
                ReorderPriority::Medium
            } else {
                ReorderPriority::Low
            };

            results.push(BatchForecastItem {
                sku: item.sku,
                current_stock: item.current_stock,
                reorder_threshold: item.reorder_threshold,
                total_predicted_demand,
                average_daily_demand: total_predicted_demand as f64 / horizon as f64,
                priority,
            });
        }

        // Stable sort keeps inventory-listing order among equal priorities
        results.sort_by_key(|item| item.priority.rank());

        Ok(BatchForecastReport {
            results,
            errors,
            generated_at: Utc::now(),
        })
    }

    /// Fire-and-forget write of the generated points to the forecast store.
    fn persist_points(&self, sku: &str, forecast: &[ForecastPoint], generated_at: DateTime<Utc>) {
        let points: Vec<NewForecastPoint> = forecast
            .iter()
            .map(|point| NewForecastPoint {
                predicted_date: point.date,
                predicted_demand: point.predicted_demand,
                confidence_score: CONFIDENCE_SCORE,
                generated_at,
            })
            .collect();

        let repository = Arc::clone(&self.forecasts);
        let sku = sku.to_string();
        tokio::spawn(async move {
            if let Err(e) = repository.upsert_points(&sku, points).await {
                warn!(sku = %sku, error = %e, "failed to persist forecast points");
            }
        });
    }
}

/// Index of the highest value; the earliest index wins a tie.
fn peak_index(values: &[i64]) -> usize {
    let mut best = 0;
    for (i, &value) in values.iter().enumerate() {
        if value > values[best] {
            best = i;
        }
    }
    best
}
