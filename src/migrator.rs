use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_sales_records_table::Migration),
            Box::new(m20240101_000002_create_inventory_items_table::Migration),
            Box::new(m20240101_000003_create_demand_forecasts_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_sales_records_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_sales_records_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Per-day sales ledger aligned with entities::sales_records
            manager
                .create_table(
                    Table::create()
                        .table(SalesRecords::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SalesRecords::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SalesRecords::Sku).string().not_null())
                        .col(ColumnDef::new(SalesRecords::SaleDate).date().not_null())
                        .col(
                            ColumnDef::new(SalesRecords::QuantitySold)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SalesRecords::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_sales_records_sku_sale_date")
                        .table(SalesRecords::Table)
                        .col(SalesRecords::Sku)
                        .col(SalesRecords::SaleDate)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(SalesRecords::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum SalesRecords {
        Table,
        Id,
        Sku,
        SaleDate,
        QuantitySold,
        CreatedAt,
    }
}

mod m20240101_000002_create_inventory_items_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_inventory_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(InventoryItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(InventoryItems::Sku).string().not_null())
                        .col(
                            ColumnDef::new(InventoryItems::CurrentStock)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::ReorderThreshold)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_inventory_items_sku")
                        .table(InventoryItems::Table)
                        .col(InventoryItems::Sku)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(InventoryItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum InventoryItems {
        Table,
        Id,
        Sku,
        CurrentStock,
        ReorderThreshold,
        UpdatedAt,
        CreatedAt,
    }
}

mod m20240101_000003_create_demand_forecasts_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_demand_forecasts_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // One row per (sku, predicted_date); rewritten on each forecast run
            manager
                .create_table(
                    Table::create()
                        .table(DemandForecasts::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(DemandForecasts::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(DemandForecasts::Sku).string().not_null())
                        .col(
                            ColumnDef::new(DemandForecasts::PredictedDate)
                                .date()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DemandForecasts::PredictedDemand)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DemandForecasts::ConfidenceScore)
                                .double()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DemandForecasts::GeneratedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_demand_forecasts_sku_predicted_date")
                        .table(DemandForecasts::Table)
                        .col(DemandForecasts::Sku)
                        .col(DemandForecasts::PredictedDate)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(DemandForecasts::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum DemandForecasts {
        Table,
        Id,
        Sku,
        PredictedDate,
        PredictedDemand,
        ConfidenceScore,
        GeneratedAt,
    }
}
