use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use std::sync::Arc;

use crate::entities::inventory_items::{self, Entity as InventoryItems};
use crate::errors::ServiceError;

/// Read-only access to current stock levels and reorder thresholds.
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// Look up the inventory record for one SKU, if any.
    async fn find_by_sku(&self, sku: &str)
        -> Result<Option<inventory_items::Model>, ServiceError>;

    /// Snapshot of every inventory record in listing order.
    async fn list_all(&self) -> Result<Vec<inventory_items::Model>, ServiceError>;
}

/// SeaORM-backed inventory access
#[derive(Debug, Clone)]
pub struct SqlInventoryRepository {
    db: Arc<DatabaseConnection>,
}

impl SqlInventoryRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl InventoryRepository for SqlInventoryRepository {
    async fn find_by_sku(
        &self,
        sku: &str,
    ) -> Result<Option<inventory_items::Model>, ServiceError> {
        InventoryItems::find()
            .filter(inventory_items::Column::Sku.eq(sku))
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    async fn list_all(&self) -> Result<Vec<inventory_items::Model>, ServiceError> {
        InventoryItems::find()
            .order_by_asc(inventory_items::Column::CreatedAt)
            .all(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)
    }
}
