use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use std::sync::Arc;

use crate::entities::sales_records::{self, Entity as SalesRecords};
use crate::errors::ServiceError;

/// Read-only access to the per-SKU sales ledger.
#[async_trait]
pub trait SalesHistoryRepository: Send + Sync {
    /// Fetch raw sales rows for one SKU, oldest first, optionally bounded
    /// to an inclusive date range.
    async fn fetch_for_sku(
        &self,
        sku: &str,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Vec<sales_records::Model>, ServiceError>;
}

/// SeaORM-backed sales ledger access
#[derive(Debug, Clone)]
pub struct SqlSalesHistoryRepository {
    db: Arc<DatabaseConnection>,
}

impl SqlSalesHistoryRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SalesHistoryRepository for SqlSalesHistoryRepository {
    async fn fetch_for_sku(
        &self,
        sku: &str,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Vec<sales_records::Model>, ServiceError> {
        let mut query = SalesRecords::find().filter(sales_records::Column::Sku.eq(sku));

        if let Some((start, end)) = range {
            query = query
                .filter(sales_records::Column::SaleDate.gte(start))
                .filter(sales_records::Column::SaleDate.lte(end));
        }

        query
            .order_by_asc(sales_records::Column::SaleDate)
            .all(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)
    }
}
