use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionError, TransactionTrait,
};
use sea_orm::error::DbErr;
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::demand_forecasts::{self, Entity as DemandForecasts};
use crate::errors::ServiceError;

/// A forecast point ready for persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct NewForecastPoint {
    pub predicted_date: NaiveDate,
    pub predicted_demand: i64,
    pub confidence_score: f64,
    pub generated_at: DateTime<Utc>,
}

/// Write-through store for generated forecast points.
///
/// Callers treat the write as best-effort; failures here must never fail
/// the forecast request that produced the points.
#[async_trait]
pub trait ForecastRepository: Send + Sync {
    /// Upsert points for one SKU, keyed by (sku, predicted_date).
    async fn upsert_points(
        &self,
        sku: &str,
        points: Vec<NewForecastPoint>,
    ) -> Result<(), ServiceError>;
}

/// SeaORM-backed forecast store
#[derive(Debug, Clone)]
pub struct SqlForecastRepository {
    db: Arc<DatabaseConnection>,
}

impl SqlForecastRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ForecastRepository for SqlForecastRepository {
    async fn upsert_points(
        &self,
        sku: &str,
        points: Vec<NewForecastPoint>,
    ) -> Result<(), ServiceError> {
        let sku = sku.to_string();

        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    for point in points {
                        let existing = DemandForecasts::find()
                            .filter(demand_forecasts::Column::Sku.eq(sku.as_str()))
                            .filter(
                                demand_forecasts::Column::PredictedDate.eq(point.predicted_date),
                            )
                            .one(txn)
                            .await?;

                        match existing {
                            Some(model) => {
                                let mut active: demand_forecasts::ActiveModel = model.into();
                                active.predicted_demand = Set(point.predicted_demand);
                                active.confidence_score = Set(point.confidence_score);
                                active.generated_at = Set(point.generated_at);
                                active.update(txn).await?;
                            }
                            None => {
                                demand_forecasts::ActiveModel {
                                    id: Set(Uuid::new_v4()),
                                    sku: Set(sku.clone()),
                                    predicted_date: Set(point.predicted_date),
                                    predicted_demand: Set(point.predicted_demand),
                                    confidence_score: Set(point.confidence_score),
                                    generated_at: Set(point.generated_at),
                                }
                                .insert(txn)
                                .await?;
                            }
                        }
                    }
                    Ok(())
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(e) => ServiceError::DatabaseError(e),
                TransactionError::Transaction(e) => ServiceError::DatabaseError(e),
            })
    }
}
