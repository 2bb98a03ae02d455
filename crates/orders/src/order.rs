use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use orderdesk_core::{
    position_of, AggregateRoot, CustomerId, DomainError, DomainResult, Entity, OrderId, OrderItemId,
};

use crate::commands::{AddItem, CreateOrder, RemoveItem, UpdateItem, UpdateOrder};
use crate::item::{ItemDraft, OrderItem};
use crate::search::ItemMatches;
use crate::status::OrderStatus;

/// Aggregate root: Order.
///
/// Owns its items exclusively. Every successful mutation stamps
/// `order_updated` with the command's `occurred_at` (never moving it
/// backwards) and bumps `version`; `order_created` is written once in
/// [`Order::create`] and never again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: OrderId,
    customer_id: CustomerId,
    status: OrderStatus,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
    items: Vec<OrderItem>,
    version: u64,
}

impl Order {
    /// Build a new order under an already-assigned id.
    ///
    /// `item_ids` must hold one fresh id per initial item, in order.
    pub fn create(id: OrderId, cmd: &CreateOrder, item_ids: Vec<OrderItemId>) -> DomainResult<Self> {
        if item_ids.len() != cmd.items.len() {
            return Err(DomainError::invariant(format!(
                "{} item ids supplied for {} initial items",
                item_ids.len(),
                cmd.items.len()
            )));
        }

        let items = item_ids
            .into_iter()
            .zip(cmd.items.iter().cloned())
            .map(|(item_id, draft)| OrderItem::from_draft(item_id, id, draft))
            .collect();

        Ok(Self {
            id,
            customer_id: cmd.customer_id,
            status: cmd.status.clone().unwrap_or_default(),
            created: cmd.created_at.unwrap_or(cmd.occurred_at),
            updated: cmd.occurred_at,
            items,
            version: 1,
        })
    }

    pub fn order_id(&self) -> OrderId {
        self.id
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn status(&self) -> &OrderStatus {
        &self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn item(&self, item_id: OrderItemId) -> DomainResult<&OrderItem> {
        let idx = self.item_index(item_id)?;
        Ok(&self.items[idx])
    }

    /// Lazily filter this order's items by `term` (see [`ItemMatches`]).
    pub fn search_items<'a>(&'a self, term: &'a str) -> ItemMatches<'a> {
        ItemMatches::new(&self.items, term)
    }

    /// Replace the status.
    ///
    /// No lifecycle check: any status may be written here. The customer is
    /// fixed at creation; `cmd.customer_id` is never written back.
    pub fn apply_update(&mut self, cmd: &UpdateOrder) -> DomainResult<()> {
        self.ensure_order_id(cmd.order_id)?;

        if let Some(status) = &cmd.status {
            self.status = status.clone();
        }
        self.touch(cmd.occurred_at);
        Ok(())
    }

    /// Append a new item under a freshly assigned id.
    pub fn add_item(&mut self, item_id: OrderItemId, cmd: &AddItem) -> DomainResult<&OrderItem> {
        self.ensure_order_id(cmd.order_id)?;
        if position_of(&self.items, &item_id).is_some() {
            return Err(DomainError::invariant(format!(
                "item id {item_id} already used in order {}",
                self.id
            )));
        }

        self.items
            .push(OrderItem::from_draft(item_id, self.id, cmd.item.clone()));
        self.touch(cmd.occurred_at);
        Ok(&self.items[self.items.len() - 1])
    }

    pub fn update_item(&mut self, cmd: &UpdateItem) -> DomainResult<&OrderItem> {
        self.ensure_order_id(cmd.order_id)?;
        let idx = self.item_index(cmd.item_id)?;

        self.items[idx].replace_with(cmd.item.clone());
        self.touch(cmd.occurred_at);
        Ok(&self.items[idx])
    }

    pub fn remove_item(&mut self, cmd: &RemoveItem) -> DomainResult<OrderItem> {
        self.ensure_order_id(cmd.order_id)?;
        let idx = self.item_index(cmd.item_id)?;

        let removed = self.items.remove(idx);
        self.touch(cmd.occurred_at);
        Ok(removed)
    }

    pub(crate) fn set_status(&mut self, status: OrderStatus, at: DateTime<Utc>) {
        self.status = status;
        self.touch(at);
    }

    /// Commands may be stamped before the order lock is taken, so a later
    /// commit can carry an earlier clock reading.
    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated = self.updated.max(at);
        self.version += 1;
    }

    fn ensure_order_id(&self, order_id: OrderId) -> DomainResult<()> {
        if self.id != order_id {
            return Err(DomainError::invariant("order_id mismatch"));
        }
        Ok(())
    }

    fn item_index(&self, item_id: OrderItemId) -> DomainResult<usize> {
        position_of(&self.items, &item_id)
            .filter(|&idx| self.items[idx].belongs_to(&self.id))
            .ok_or_else(|| self.item_not_found(item_id))
    }

    fn item_not_found(&self, item_id: OrderItemId) -> DomainError {
        DomainError::not_found(format!("item {item_id} in order {}", self.id))
    }
}

impl AggregateRoot for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Convenience for building an [`AddItem`] from raw fields.
pub fn add_item_command(
    order_id: OrderId,
    product_id: i64,
    quantity: i64,
    price: Decimal,
    occurred_at: DateTime<Utc>,
) -> DomainResult<AddItem> {
    Ok(AddItem {
        order_id,
        item: ItemDraft::new(product_id, quantity, price)?,
        occurred_at,
    })
}
