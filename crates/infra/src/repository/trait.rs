use thiserror::Error;

use orderdesk_core::{DomainError, OrderId, OrderItemId};
use orderdesk_orders::{CreateOrder, Order, OrderFilter};

/// Errors returned by an [`OrderRepository`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("order {0} not found")]
    NotFound(OrderId),

    /// The mutation applied inside [`OrderRepository::update`] was rejected.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Backend failure (lock poisoning, exhausted id space, IO).
    #[error("storage failure: {0}")]
    Storage(String),
}

/// Durable storage of orders and the items they own.
///
/// ## Consistency
///
/// An order and its items are one unit: they are stored, loaded and deleted
/// together. All writes to one order go through [`OrderRepository::update`],
/// which serializes them per order id and commits only when the mutation
/// succeeds. Reads return snapshots and never observe a half-applied write.
///
/// ## Ordering
///
/// [`OrderRepository::list`] returns orders in creation order.
pub trait OrderRepository: Send + Sync {
    /// Assign a fresh order id (and item ids for any initial items) and store
    /// the new order.
    fn create(&self, cmd: &CreateOrder) -> Result<Order, RepositoryError>;

    fn get(&self, id: OrderId) -> Result<Order, RepositoryError>;

    /// Apply `mutate` to the stored order while holding that order's write
    /// lock. On `Err` nothing is written. Returns the committed state.
    fn update<F>(&self, id: OrderId, mutate: F) -> Result<Order, RepositoryError>
    where
        F: FnOnce(&mut Order) -> Result<(), DomainError>;

    /// Remove the order and every item it owns.
    fn delete(&self, id: OrderId) -> Result<(), RepositoryError>;

    fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, RepositoryError>;

    /// Reserve an item id. Ids are unique across the repository and never
    /// reused, even if the reserving write later fails.
    fn next_item_id(&self) -> Result<OrderItemId, RepositoryError>;
}
