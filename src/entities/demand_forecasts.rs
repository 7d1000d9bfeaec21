use chrono::NaiveDate;
use sea_orm::prelude::*;
use serde::{Deserialize, Serialize};

/// Persisted forecast point, unique per (sku, predicted_date).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "demand_forecasts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub sku: String,
    pub predicted_date: NaiveDate,
    pub predicted_demand: i64,
    pub confidence_score: f64,
    pub generated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
