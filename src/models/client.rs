use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::order::Order;

/// The lifecycle status of a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    Active,
    Inactive,
    Lead,
}

/// Represents a client of the business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// The unique identifier for the client.
    pub id: i64,
    /// The client's display name.
    pub name: String,
    /// The client's contact email.
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub status: ClientStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Filters for listing clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientFilter {
    /// Free text matched against name, email and company.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ClientStatus>,
}

/// A client together with its orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientWithOrders {
    #[serde(flatten)]
    pub client: Client,
    pub orders: Vec<Order>,
}
