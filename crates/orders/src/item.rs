use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use orderdesk_core::{DomainError, DomainResult, Entity, OrderId, OrderItemId, ProductId, ValueObject};

/// Number of units on an order line. Always at least one.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Quantity(i64);

impl Quantity {
    pub fn new(value: i64) -> DomainResult<Self> {
        if value < 1 {
            return Err(DomainError::validation(format!(
                "quantity must be at least 1, got {value}"
            )));
        }
        Ok(Self(value))
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for Quantity {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for i64 {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

impl ValueObject for Quantity {}

/// Unit price of an order line. Always strictly positive.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    pub fn new(value: Decimal) -> DomainResult<Self> {
        if value <= Decimal::ZERO {
            return Err(DomainError::validation(format!(
                "price must be greater than 0, got {value}"
            )));
        }
        Ok(Self(value.normalize()))
    }

    pub fn get(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Price {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(value: Price) -> Self {
        value.0
    }
}

impl ValueObject for Price {}

/// Validated item contents, used both to add and to fully replace an item.
///
/// Holding an `ItemDraft` means every field already passed validation, so
/// the aggregate can apply it without further checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    pub product_id: ProductId,
    pub quantity: Quantity,
    pub price: Price,
}

impl ItemDraft {
    /// Validate raw item fields. The first failing field is reported.
    pub fn new(product_id: i64, quantity: i64, price: Decimal) -> DomainResult<Self> {
        let product_id = ProductId::new(product_id)
            .map_err(|_| DomainError::validation(format!("product_id must be positive, got {product_id}")))?;
        Ok(Self {
            product_id,
            quantity: Quantity::new(quantity)?,
            price: Price::new(price)?,
        })
    }
}

impl ValueObject for ItemDraft {}

/// One product line inside an order.
///
/// Items are owned by exactly one order; `order_id` is fixed when the item is
/// added and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: Quantity,
    pub price: Price,
}

impl OrderItem {
    pub(crate) fn from_draft(id: OrderItemId, order_id: OrderId, draft: ItemDraft) -> Self {
        Self {
            id,
            order_id,
            product_id: draft.product_id,
            quantity: draft.quantity,
            price: draft.price,
        }
    }

    /// Overwrite product, quantity and price. Identity and parent stay put.
    pub(crate) fn replace_with(&mut self, draft: ItemDraft) {
        self.product_id = draft.product_id;
        self.quantity = draft.quantity;
        self.price = draft.price;
    }
}

impl Entity for OrderItem {
    type Id = OrderItemId;
    type OwnerId = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn owner_id(&self) -> &Self::OwnerId {
        &self.order_id
    }
}
