use super::{EntityId, Money, ProductSummary, UserSummary};
use crate::errors::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    // Administrators may move an order between any two states.
    const TRANSITIONS: [(OrderStatus, &'static [OrderStatus]); 5] = [
        (OrderStatus::Pending, &OrderStatus::ALL),
        (OrderStatus::Processing, &OrderStatus::ALL),
        (OrderStatus::Shipped, &OrderStatus::ALL),
        (OrderStatus::Delivered, &OrderStatus::ALL),
        (OrderStatus::Cancelled, &OrderStatus::ALL),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        Self::TRANSITIONS
            .iter()
            .find(|(from, _)| from == self)
            .map_or(false, |(_, allowed)| allowed.contains(&next))
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| {
                DomainError::InvalidRequest(format!(
                    "unknown order status {:?}; expected one of pending, processing, shipped, delivered, cancelled",
                    s
                ))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineItem {
    pub product: EntityId,
    pub quantity: u32,
}

impl LineItem {
    pub fn new(product: EntityId, quantity: u32) -> Self {
        Self { product, quantity }
    }
}

/// A placed order. `total_price` is fixed when the order is created and is
/// never recomputed from later product prices.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub user: EntityId,
    #[serde(rename = "products")]
    pub items: Vec<LineItem>,
    pub total_price: Money,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn new(user: EntityId, items: Vec<LineItem>, total_price: Money) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            user,
            items,
            total_price,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn with_id(
        id: EntityId,
        user: EntityId,
        items: Vec<LineItem>,
        total_price: Money,
        status: OrderStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Some(id),
            user,
            items,
            total_price,
            status,
            created_at,
            updated_at,
        }
    }

    pub fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    pub fn transition_to(&mut self, next: OrderStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidRequest(format!(
                "order cannot move from {} to {}",
                self.status, next
            )));
        }
        self.set_status(next);
        Ok(())
    }
}

/// Order as shown in listings. The summaries are filled in only for the
/// admin-wide listing and are omitted from the JSON when absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub user: EntityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<UserSummary>,
    pub products: Vec<LineItemView>,
    pub total_price: Money,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItemView {
    pub product: EntityId,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ProductSummary>,
}

impl From<Order> for OrderView {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            user: order.user,
            customer: None,
            products: order
                .items
                .into_iter()
                .map(|item| LineItemView {
                    product: item.product,
                    quantity: item.quantity,
                    details: None,
                })
                .collect(),
            total_price: order.total_price,
            status: order.status,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}
