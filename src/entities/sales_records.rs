use chrono::NaiveDate;
use sea_orm::prelude::*;
use serde::{Deserialize, Serialize};

/// One raw sales event for a SKU. Several rows may share a date; the
/// forecasting normalizer sums them.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub sku: String,
    pub sale_date: NaiveDate,
    pub quantity_sold: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
