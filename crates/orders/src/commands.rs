//! Inputs to order mutations.
//!
//! Every command carries `occurred_at`, the timestamp that becomes the
//! order's `order_updated` when the command succeeds. Callers decide the
//! clock, so domain code never reads the system time.

use chrono::{DateTime, Utc};

use orderdesk_core::{CustomerId, OrderId, OrderItemId};

use crate::item::ItemDraft;
use crate::status::OrderStatus;

/// Command: CreateOrder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOrder {
    pub customer_id: CustomerId,
    /// Defaults to `pending` when absent.
    pub status: Option<OrderStatus>,
    /// Creation timestamp supplied by the caller; falls back to `occurred_at`.
    pub created_at: Option<DateTime<Utc>>,
    /// Items added in order right after creation.
    pub items: Vec<ItemDraft>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateOrder (unguarded field replace, distinct from cancel).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOrder {
    pub order_id: OrderId,
    /// Ignored by the aggregate; the customer is fixed at creation.
    pub customer_id: Option<CustomerId>,
    pub status: Option<OrderStatus>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: CancelOrder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelOrder {
    pub order_id: OrderId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AddItem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddItem {
    pub order_id: OrderId,
    pub item: ItemDraft,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateItem (full replace of product, quantity and price).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateItem {
    pub order_id: OrderId,
    pub item_id: OrderItemId,
    pub item: ItemDraft,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveItem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveItem {
    pub order_id: OrderId,
    pub item_id: OrderItemId,
    pub occurred_at: DateTime<Utc>,
}
