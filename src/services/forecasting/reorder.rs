use serde::{Deserialize, Serialize};

/// Replenishment urgency, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReorderPriority {
    High,
    Medium,
    Low,
}

impl ReorderPriority {
    /// Sort key: high sorts before medium sorts before low.
    pub(crate) fn rank(self) -> u8 {
        match self {
            ReorderPriority::High => 0,
            ReorderPriority::Medium => 1,
            ReorderPriority::Low => 2,
        }
    }
}

/// Replenishment advice for one SKU, derived from predicted demand and the
/// current inventory record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderSuggestion {
    pub needed: bool,
    pub current_stock: i64,
    pub predicted_demand: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_until_stockout: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_of_stock: Option<i64>,
    pub priority: ReorderPriority,
}

/// Compare predicted demand against stock on hand.
///
/// The stock-depletion divisor substitutes 1 for a sub-unit average daily
/// demand, bounding the stockout figure instead of reporting it as
/// undefined when demand is near zero.
pub fn advise(
    total_predicted_demand: i64,
    horizon_days: u16,
    current_stock: i64,
    reorder_threshold: i64,
) -> ReorderSuggestion {
    let average_daily_demand = total_predicted_demand as f64 / f64::from(horizon_days);
    let depletion_rate = average_daily_demand.max(1.0);

    if total_predicted_demand > current_stock {
        let priority = if current_stock <= reorder_threshold {
            ReorderPriority::High
        } else {
            ReorderPriority::Medium
        };

        ReorderSuggestion {
            needed: true,
            current_stock,
            predicted_demand: total_predicted_demand,
            suggested_quantity: Some(total_predicted_demand - current_stock + reorder_threshold),
            days_until_stockout: Some((current_stock as f64 / depletion_rate).floor() as i64),
            days_of_stock: None,
            priority,
        }
    } else {
        ReorderSuggestion {
            needed: false,
            current_stock,
            predicted_demand: total_predicted_demand,
            suggested_quantity: None,
            days_until_stockout: None,
            days_of_stock: Some((current_stock as f64 / depletion_rate).floor() as i64),
            priority: ReorderPriority::Low,
        }
    }
}
