use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use orderdesk_core::{CustomerId, DomainError, DomainResult, OrderId, OrderItemId};
use orderdesk_orders::{
    AddItem, CreateOrder, ItemDraft, Order, OrderFilter, OrderItem, OrderStatus, UpdateItem,
    UpdateOrder,
};

// -------------------------
// Request DTOs
// -------------------------

/// Integer that may arrive as a JSON number or as a numeric string
/// (form-driven clients send `"customer_id": "7"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LenientInt(pub i64);

impl<'de> Deserialize<'de> for LenientInt {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Str(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Int(v) => Ok(LenientInt(v)),
            Raw::Str(s) => s
                .trim()
                .parse::<i64>()
                .map(LenientInt)
                .map_err(|_| serde::de::Error::custom(format!("expected an integer, got '{s}'"))),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: Option<LenientInt>,
    pub order_status: Option<String>,
    pub order_created: Option<String>,
    pub orderitems: Option<Vec<ItemRequest>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateOrderRequest {
    pub customer_id: Option<LenientInt>,
    pub order_status: Option<String>,
    pub order_updated: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ItemRequest {
    /// Accepted for client compatibility; the path decides the parent order.
    pub order_id: Option<LenientInt>,
    pub product_id: Option<LenientInt>,
    pub quantity: Option<LenientInt>,
    pub price: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListOrdersQuery {
    pub customer: Option<String>,
    pub status: Option<String>,
    pub created: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchItemsQuery {
    pub search: Option<String>,
}

fn required<T>(value: Option<T>, field: &str) -> DomainResult<T> {
    value.ok_or_else(|| DomainError::validation(format!("missing required field '{field}'")))
}

/// Treat absent and blank strings alike.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_timestamp(raw: &str, field: &str) -> DomainResult<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = day.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    Err(DomainError::validation(format!(
        "{field} must be an RFC 3339 timestamp or YYYY-MM-DD date, got '{raw}'"
    )))
}

fn parse_status(raw: Option<&str>) -> DomainResult<Option<OrderStatus>> {
    non_blank(raw).map(str::parse).transpose()
}

fn parse_customer(raw: i64) -> DomainResult<CustomerId> {
    CustomerId::new(raw)
        .map_err(|_| DomainError::validation(format!("customer_id must be positive, got {raw}")))
}

impl ItemRequest {
    pub fn into_draft(self) -> DomainResult<ItemDraft> {
        let product_id = required(self.product_id, "product_id")?;
        let quantity = required(self.quantity, "quantity")?;
        let price = required(self.price, "price")?;
        ItemDraft::new(product_id.0, quantity.0, price)
    }

    pub fn into_add_command(self, order_id: OrderId, now: DateTime<Utc>) -> DomainResult<AddItem> {
        Ok(AddItem {
            order_id,
            item: self.into_draft()?,
            occurred_at: now,
        })
    }

    pub fn into_update_command(
        self,
        order_id: OrderId,
        item_id: OrderItemId,
        now: DateTime<Utc>,
    ) -> DomainResult<UpdateItem> {
        Ok(UpdateItem {
            order_id,
            item_id,
            item: self.into_draft()?,
            occurred_at: now,
        })
    }
}

impl CreateOrderRequest {
    pub fn into_command(self, now: DateTime<Utc>) -> DomainResult<CreateOrder> {
        let customer_id = parse_customer(required(self.customer_id, "customer_id")?.0)?;
        let status = parse_status(self.order_status.as_deref())?;
        let created_at = non_blank(self.order_created.as_deref())
            .map(|raw| parse_timestamp(raw, "order_created"))
            .transpose()?;
        let items = self
            .orderitems
            .unwrap_or_default()
            .into_iter()
            .map(ItemRequest::into_draft)
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(CreateOrder {
            customer_id,
            status,
            created_at,
            items,
            occurred_at: now,
        })
    }
}

impl UpdateOrderRequest {
    /// `order_updated`, when given, replaces the server clock.
    pub fn into_command(self, order_id: OrderId, now: DateTime<Utc>) -> DomainResult<UpdateOrder> {
        let customer_id = self.customer_id.map(|c| parse_customer(c.0)).transpose()?;
        let status = parse_status(self.order_status.as_deref())?;
        let occurred_at = match non_blank(self.order_updated.as_deref()) {
            Some(raw) => parse_timestamp(raw, "order_updated")?,
            None => now,
        };

        Ok(UpdateOrder {
            order_id,
            customer_id,
            status,
            occurred_at,
        })
    }
}

impl ListOrdersQuery {
    pub fn into_filter(self) -> DomainResult<OrderFilter> {
        let mut filter = OrderFilter::new();
        if let Some(raw) = non_blank(self.customer.as_deref()) {
            let customer = raw
                .parse::<CustomerId>()
                .map_err(|_| DomainError::validation(format!("invalid customer filter '{raw}'")))?;
            filter = filter.customer(customer);
        }
        if let Some(status) = non_blank(self.status.as_deref()) {
            filter = filter.status(status);
        }
        if let Some(raw) = non_blank(self.created.as_deref()) {
            let day = parse_timestamp(raw, "created")?.date_naive();
            filter = filter.created_on(day);
        }
        Ok(filter)
    }
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn item_to_json(item: &OrderItem) -> serde_json::Value {
    serde_json::json!({
        "id": item.id,
        "order_id": item.order_id,
        "product_id": item.product_id,
        "quantity": item.quantity,
        "price": item.price,
    })
}

pub fn order_to_json(order: &Order) -> serde_json::Value {
    serde_json::json!({
        "id": order.order_id(),
        "customer_id": order.customer_id(),
        "order_status": order.status().as_str(),
        "order_created": order.created_at().to_rfc3339(),
        "order_updated": order.updated_at().to_rfc3339(),
        "orderitems": order.items().iter().map(item_to_json).collect::<Vec<_>>(),
    })
}
