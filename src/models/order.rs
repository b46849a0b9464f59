use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

/// Represents an order placed by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// The unique identifier for the order.
    pub id: i64,
    /// The client that placed the order (`Client::id`).
    pub client_id: i64,
    /// Human readable order reference.
    pub reference: String,
    pub description: Option<String>,
    /// Order total in cents.
    pub amount_cents: i64,
    pub status: OrderStatus,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Filters for listing orders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    /// Inclusive lower bound on `created_at`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created_at`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
}

/// Aggregate figures over a set of orders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStats {
    pub total: usize,
    pub by_status: BTreeMap<OrderStatus, usize>,
    pub total_amount_cents: i64,
}

impl OrderStats {
    /// Computes the aggregate over `orders`.
    ///
    /// Cancelled orders are counted but do not contribute to the amount.
    pub fn from_orders(orders: &[Order]) -> Self {
        let mut stats = OrderStats::default();

        for order in orders {
            stats.total += 1;
            *stats.by_status.entry(order.status).or_insert(0) += 1;
            if order.status != OrderStatus::Cancelled {
                stats.total_amount_cents += order.amount_cents;
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(id: i64, status: OrderStatus, amount_cents: i64) -> Order {
        Order {
            id,
            client_id: 1,
            reference: format!("ORD-{id:04}"),
            description: None,
            amount_cents,
            status,
            due_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn stats_count_by_status_and_skip_cancelled_amounts() {
        let orders = vec![
            order(1, OrderStatus::Pending, 1_000),
            order(2, OrderStatus::Completed, 2_500),
            order(3, OrderStatus::Completed, 500),
            order(4, OrderStatus::Cancelled, 9_999),
        ];

        let stats = OrderStats::from_orders(&orders);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.by_status.get(&OrderStatus::Completed), Some(&2));
        assert_eq!(stats.by_status.get(&OrderStatus::InProgress), None);
        assert_eq!(stats.total_amount_cents, 4_000);
    }

    #[test]
    fn order_serializes_client_id_in_camel_case() {
        let json = sonic_rs::to_string(&order(9, OrderStatus::InProgress, 10)).unwrap();
        assert!(json.contains(r#""clientId":1"#));
        assert!(json.contains(r#""status":"in_progress""#));
    }
}
