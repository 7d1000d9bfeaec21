//! End-to-end tests for the forecasting service over in-memory
//! repositories, with mocked failures for the degraded paths.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_matches::assert_matches;
use async_trait::async_trait;
use chrono::{Days, NaiveDate, Utc};
use mockall::mock;
use sea_orm::error::DbErr;
use uuid::Uuid;

use demandcast::entities::{inventory_items, sales_records};
use demandcast::errors::ServiceError;
use demandcast::repositories::{
    ForecastRepository, InventoryRepository, NewForecastPoint, SalesHistoryRepository,
};
use demandcast::services::forecasting::{
    ForecastMethod, ForecastRequest, ForecastingService, ReorderPriority, CONFIDENCE_SCORE,
};

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
}

fn sales_row(sku: &str, sale_date: NaiveDate, quantity_sold: i64) -> sales_records::Model {
    sales_records::Model {
        id: Uuid::new_v4(),
        sku: sku.to_string(),
        sale_date,
        quantity_sold,
        created_at: Utc::now(),
    }
}

fn inventory_row(sku: &str, current_stock: i64, reorder_threshold: i64) -> inventory_items::Model {
    inventory_items::Model {
        id: Uuid::new_v4(),
        sku: sku.to_string(),
        current_stock,
        reorder_threshold,
        updated_at: Utc::now(),
        created_at: Utc::now(),
    }
}

struct InMemorySalesHistory {
    rows: Vec<sales_records::Model>,
}

#[async_trait]
impl SalesHistoryRepository for InMemorySalesHistory {
    async fn fetch_for_sku(
        &self,
        sku: &str,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Vec<sales_records::Model>, ServiceError> {
        let mut rows: Vec<_> = self
            .rows
            .iter()
            .filter(|row| row.sku == sku)
            .filter(|row| match range {
                Some((start, end)) => row.sale_date >= start && row.sale_date <= end,
                None => true,
            })
            .cloned()
            .collect();
        rows.sort_by_key(|row| row.sale_date);
        Ok(rows)
    }
}

struct InMemoryInventory {
    items: Vec<inventory_items::Model>,
}

#[async_trait]
impl InventoryRepository for InMemoryInventory {
    async fn find_by_sku(
        &self,
        sku: &str,
    ) -> Result<Option<inventory_items::Model>, ServiceError> {
        Ok(self.items.iter().find(|item| item.sku == sku).cloned())
    }

    async fn list_all(&self) -> Result<Vec<inventory_items::Model>, ServiceError> {
        Ok(self.items.clone())
    }
}

#[derive(Default)]
struct RecordingForecastStore {
    upserts: Mutex<Vec<(String, Vec<NewForecastPoint>)>>,
}

#[async_trait]
impl ForecastRepository for RecordingForecastStore {
    async fn upsert_points(
        &self,
        sku: &str,
        points: Vec<NewForecastPoint>,
    ) -> Result<(), ServiceError> {
        self.upserts
            .lock()
            .unwrap()
            .push((sku.to_string(), points));
        Ok(())
    }
}

struct FailingForecastStore;

#[async_trait]
impl ForecastRepository for FailingForecastStore {
    async fn upsert_points(
        &self,
        _sku: &str,
        _points: Vec<NewForecastPoint>,
    ) -> Result<(), ServiceError> {
        Err(ServiceError::InternalError("store unavailable".to_string()))
    }
}

mock! {
    SalesRepo {}

    #[async_trait]
    impl SalesHistoryRepository for SalesRepo {
        async fn fetch_for_sku(
            &self,
            sku: &str,
            range: Option<(NaiveDate, NaiveDate)>,
        ) -> Result<Vec<sales_records::Model>, ServiceError>;
    }
}

mock! {
    InventoryRepo {}

    #[async_trait]
    impl InventoryRepository for InventoryRepo {
        async fn find_by_sku(
            &self,
            sku: &str,
        ) -> Result<Option<inventory_items::Model>, ServiceError>;

        async fn list_all(&self) -> Result<Vec<inventory_items::Model>, ServiceError>;
    }
}

fn service(
    sales: Vec<sales_records::Model>,
    inventory: Vec<inventory_items::Model>,
) -> (ForecastingService, Arc<RecordingForecastStore>) {
    let store = Arc::new(RecordingForecastStore::default());
    let service = ForecastingService::new(
        Arc::new(InMemorySalesHistory { rows: sales }),
        Arc::new(InMemoryInventory { items: inventory }),
        store.clone(),
    );
    (service, store)
}

fn request(sku: &str, horizon_days: u16, method: ForecastMethod) -> ForecastRequest {
    let mut request = ForecastRequest::new(sku);
    request.horizon_days = horizon_days;
    request.method = method;
    request
}

async fn wait_for_upsert(store: &RecordingForecastStore) -> (String, Vec<NewForecastPoint>) {
    for _ in 0..100 {
        if let Some(entry) = store.upserts.lock().unwrap().first().cloned() {
            return entry;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("forecast points were never persisted");
}

#[tokio::test]
async fn linear_forecast_extends_the_trend_and_shapes_the_result() {
    let rows: Vec<_> = [10, 12, 14, 16, 18]
        .iter()
        .enumerate()
        .map(|(i, &qty)| sales_row("WIDGET-1", date(1) + Days::new(i as u64), qty))
        .collect();
    let (service, _store) = service(rows, vec![inventory_row("WIDGET-1", 100, 10)]);

    let result = service
        .generate_forecast(request("WIDGET-1", 3, ForecastMethod::Linear))
        .await
        .unwrap();

    assert_eq!(result.sku, "WIDGET-1");
    assert_eq!(result.method, ForecastMethod::Linear);

    let demands: Vec<i64> = result
        .forecast
        .iter()
        .map(|p| p.predicted_demand)
        .collect();
    assert_eq!(demands, vec![20, 22, 24]);

    assert_eq!(result.forecast_period.days, 3);
    assert_eq!(result.forecast_period.start_date, date(6));
    assert_eq!(result.forecast_period.end_date, date(8));

    assert_eq!(result.historical.total_records, 5);
    assert_eq!(result.historical.total_historical_sales, 70);
    assert!((result.historical.average_daily_demand - 14.0).abs() < 1e-9);

    assert_eq!(result.summary.total_predicted_demand, 66);
    assert_eq!(result.summary.peak_day.predicted_demand, 24);
    assert_eq!(result.summary.peak_day.date, date(8));

    assert_eq!(result.model_info.data_points, 5);
    assert!(result.model_info.mae.unwrap() < 1e-9);
}

#[tokio::test]
async fn combined_forecast_with_inventory_produces_reorder_advice() {
    // Two weeks of steady sales of 10/day against a nearly empty shelf
    let rows: Vec<_> = (0..14)
        .map(|i| sales_row("WIDGET-2", date(1) + Days::new(i), 10))
        .collect();
    let (service, _store) = service(rows, vec![inventory_row("WIDGET-2", 5, 20)]);

    let result = service
        .generate_forecast(request("WIDGET-2", 7, ForecastMethod::Combined))
        .await
        .unwrap();

    assert_eq!(result.forecast.len(), 7);
    assert!(result.forecast.iter().all(|p| p.predicted_demand >= 0));

    let suggestion = result.reorder_suggestion.expect("advice expected");
    assert!(suggestion.needed);
    assert_eq!(suggestion.priority, ReorderPriority::High);
    assert_eq!(suggestion.current_stock, 5);
    // 70 predicted - 5 on hand + 20 threshold
    assert_eq!(suggestion.suggested_quantity, Some(85));
}

#[tokio::test]
async fn missing_inventory_record_omits_the_advisory() {
    let rows = vec![sales_row("WIDGET-3", date(1), 4)];
    let (service, _store) = service(rows, Vec::new());

    let result = service
        .generate_forecast(request("WIDGET-3", 5, ForecastMethod::Exponential))
        .await
        .unwrap();

    assert!(result.reorder_suggestion.is_none());
    assert_eq!(result.forecast.len(), 5);
}

#[tokio::test]
async fn inventory_lookup_failure_omits_the_advisory_but_succeeds() {
    let mut inventory = MockInventoryRepo::new();
    inventory
        .expect_find_by_sku()
        .returning(|_| Err(ServiceError::DatabaseError(DbErr::Custom("gone".into()))));

    let store = Arc::new(RecordingForecastStore::default());
    let service = ForecastingService::new(
        Arc::new(InMemorySalesHistory {
            rows: vec![sales_row("WIDGET-4", date(1), 6)],
        }),
        Arc::new(inventory),
        store,
    );

    let result = service
        .generate_forecast(request("WIDGET-4", 4, ForecastMethod::Combined))
        .await
        .unwrap();

    assert!(result.reorder_suggestion.is_none());
}

#[tokio::test]
async fn ledger_failure_is_surfaced() {
    let mut sales = MockSalesRepo::new();
    sales
        .expect_fetch_for_sku()
        .returning(|_, _| Err(ServiceError::DatabaseError(DbErr::Custom("down".into()))));

    let service = ForecastingService::new(
        Arc::new(sales),
        Arc::new(InMemoryInventory { items: Vec::new() }),
        Arc::new(RecordingForecastStore::default()),
    );

    let err = service
        .generate_forecast(request("WIDGET-5", 7, ForecastMethod::Combined))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::DatabaseError(_));
}

#[tokio::test]
async fn unknown_sku_is_not_found() {
    let (service, _store) = service(Vec::new(), Vec::new());

    let err = service
        .generate_forecast(request("GHOST-1", 7, ForecastMethod::Combined))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));
}

#[tokio::test]
async fn invalid_requests_are_rejected_before_any_fetch() {
    let (service, _store) = service(Vec::new(), Vec::new());

    for request in [
        request("", 7, ForecastMethod::Combined),
        request("   ", 7, ForecastMethod::Combined),
        request("WIDGET-1", 0, ForecastMethod::Combined),
        request("WIDGET-1", 91, ForecastMethod::Combined),
    ] {
        let err = service.generate_forecast(request).await.unwrap_err();
        assert_matches!(err, ServiceError::ValidationError(_));
    }
}

#[tokio::test]
async fn forecast_points_are_persisted_with_placeholder_confidence() {
    let rows: Vec<_> = (0..7)
        .map(|i| sales_row("WIDGET-6", date(1) + Days::new(i), 3))
        .collect();
    let (service, store) = service(rows, Vec::new());

    let result = service
        .generate_forecast(request("WIDGET-6", 5, ForecastMethod::Combined))
        .await
        .unwrap();

    let (sku, points) = wait_for_upsert(&store).await;
    assert_eq!(sku, "WIDGET-6");
    assert_eq!(points.len(), 5);
    for (point, forecast) in points.iter().zip(&result.forecast) {
        assert_eq!(point.predicted_date, forecast.date);
        assert_eq!(point.predicted_demand, forecast.predicted_demand);
        assert_eq!(point.confidence_score, CONFIDENCE_SCORE);
        assert_eq!(point.generated_at, result.generated_at);
    }
}

#[tokio::test]
async fn persistence_failure_never_fails_the_request() {
    let service = ForecastingService::new(
        Arc::new(InMemorySalesHistory {
            rows: vec![sales_row("WIDGET-7", date(1), 2)],
        }),
        Arc::new(InMemoryInventory { items: Vec::new() }),
        Arc::new(FailingForecastStore),
    );

    let result = service
        .generate_forecast(request("WIDGET-7", 3, ForecastMethod::Combined))
        .await;
    assert!(result.is_ok());

    // Give the detached write a chance to run (and fail) before teardown
    tokio::time::sleep(Duration::from_millis(20)).await;
}

#[tokio::test]
async fn lookback_window_bounds_the_history() {
    let today = Utc::now().date_naive();
    let mut rows = vec![sales_row("WIDGET-8", today - Days::new(200), 500)];
    for i in 1..=5u64 {
        rows.push(sales_row("WIDGET-8", today - Days::new(i), 4));
    }
    let (service, _store) = service(rows, Vec::new());

    let mut request = request("WIDGET-8", 7, ForecastMethod::Exponential);
    request.lookback_days = Some(10);
    let result = service.generate_forecast(request).await.unwrap();

    // The 200-day-old spike is outside the window
    assert_eq!(result.historical.total_records, 5);
    assert_eq!(result.historical.total_historical_sales, 20);
}

#[tokio::test]
async fn batch_sorts_by_priority_and_records_per_item_errors() {
    let mut rows = Vec::new();
    for i in 0..14u64 {
        rows.push(sales_row("SKU-A", date(1) + Days::new(i), 5));
        rows.push(sales_row("SKU-C", date(1) + Days::new(i), 1));
        rows.push(sales_row("SKU-B", date(1) + Days::new(i), 1));
        rows.push(sales_row("SKU-E", date(1) + Days::new(i), 1));
    }
    let inventory = vec![
        inventory_row("SKU-A", 0, 5),     // at/below threshold -> high
        inventory_row("SKU-C", 2, 1),     // demand outruns stock -> medium
        inventory_row("SKU-B", 1000, 10), // comfortable -> low
        inventory_row("SKU-E", 900, 10),  // comfortable -> low, listed after B
        inventory_row("SKU-D", 50, 10),   // no sales history -> error entry
    ];
    let (service, _store) = service(rows, inventory);

    let report = service.generate_all_forecasts(30).await.unwrap();

    let order: Vec<&str> = report.results.iter().map(|r| r.sku.as_str()).collect();
    assert_eq!(order, vec!["SKU-A", "SKU-C", "SKU-B", "SKU-E"]);

    let priorities: Vec<ReorderPriority> =
        report.results.iter().map(|r| r.priority).collect();
    assert_eq!(
        priorities,
        vec![
            ReorderPriority::High,
            ReorderPriority::Medium,
            ReorderPriority::Low,
            ReorderPriority::Low,
        ]
    );

    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].sku, "SKU-D");
    assert!(report.errors[0].error.contains("no sales history"));
}

#[tokio::test]
async fn batch_rejects_an_out_of_range_horizon() {
    let (service, _store) = service(Vec::new(), Vec::new());

    let err = service.generate_all_forecasts(0).await.unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));

    let err = service.generate_all_forecasts(91).await.unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));
}
