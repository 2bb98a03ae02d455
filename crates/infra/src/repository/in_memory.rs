use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use orderdesk_core::{DomainError, OrderId, OrderItemId};
use orderdesk_orders::{CreateOrder, Order, OrderFilter};

use super::r#trait::{OrderRepository, RepositoryError};

/// One stored order. `None` once the order has been deleted, so a writer that
/// grabbed the slot before the delete sees `NotFound` instead of writing into
/// a detached copy.
type Slot = Arc<Mutex<Option<Order>>>;

/// In-memory order repository.
///
/// The table lock guards only the id → slot map and is never held while an
/// order is being mutated. Each order has its own mutex, so writers to
/// different orders do not contend and writers to the same order run one at
/// a time.
#[derive(Debug)]
pub struct InMemoryOrderRepository {
    orders: RwLock<BTreeMap<OrderId, Slot>>,
    next_order_id: AtomicI64,
    next_item_id: AtomicI64,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self {
            orders: RwLock::new(BTreeMap::new()),
            next_order_id: AtomicI64::new(1),
            next_item_id: AtomicI64::new(1),
        }
    }

    fn slot(&self, id: OrderId) -> Result<Slot, RepositoryError> {
        let orders = self.orders.read().map_err(|_| poisoned())?;
        orders.get(&id).cloned().ok_or(RepositoryError::NotFound(id))
    }

    fn allocate(counter: &AtomicI64, what: &str) -> Result<i64, RepositoryError> {
        let id = counter.fetch_add(1, Ordering::Relaxed);
        if id <= 0 {
            return Err(RepositoryError::Storage(format!("{what} id space exhausted")));
        }
        Ok(id)
    }
}

impl Default for InMemoryOrderRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> RepositoryError {
    RepositoryError::Storage("lock poisoned".to_string())
}

impl OrderRepository for InMemoryOrderRepository {
    fn create(&self, cmd: &CreateOrder) -> Result<Order, RepositoryError> {
        let item_ids = cmd
            .items
            .iter()
            .map(|_| self.next_item_id())
            .collect::<Result<Vec<_>, _>>()?;

        let raw = Self::allocate(&self.next_order_id, "order")?;
        let id = OrderId::new(raw)?;
        let order = Order::create(id, cmd, item_ids)?;

        let mut orders = self.orders.write().map_err(|_| poisoned())?;
        if orders.contains_key(&id) {
            return Err(RepositoryError::Storage(format!("order id {id} assigned twice")));
        }
        orders.insert(id, Arc::new(Mutex::new(Some(order.clone()))));
        Ok(order)
    }

    fn get(&self, id: OrderId) -> Result<Order, RepositoryError> {
        let slot = self.slot(id)?;
        let guard = slot.lock().map_err(|_| poisoned())?;
        guard.clone().ok_or(RepositoryError::NotFound(id))
    }

    fn update<F>(&self, id: OrderId, mutate: F) -> Result<Order, RepositoryError>
    where
        F: FnOnce(&mut Order) -> Result<(), DomainError>,
    {
        let slot = self.slot(id)?;
        let mut guard = slot.lock().map_err(|_| poisoned())?;
        let current = guard.as_ref().ok_or(RepositoryError::NotFound(id))?;

        // Mutate a working copy so a failed command leaves no trace.
        let mut working = current.clone();
        mutate(&mut working)?;
        *guard = Some(working.clone());
        Ok(working)
    }

    fn delete(&self, id: OrderId) -> Result<(), RepositoryError> {
        let slot = {
            let mut orders = self.orders.write().map_err(|_| poisoned())?;
            orders.remove(&id).ok_or(RepositoryError::NotFound(id))?
        };

        // Waits for an in-flight writer on this order, then tombstones it.
        let mut guard = slot.lock().map_err(|_| poisoned())?;
        *guard = None;
        Ok(())
    }

    fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, RepositoryError> {
        // Ids are handed out in creation order, so map order is creation order.
        let slots: Vec<Slot> = {
            let orders = self.orders.read().map_err(|_| poisoned())?;
            orders.values().cloned().collect()
        };

        let mut out = Vec::new();
        for slot in slots {
            let guard = slot.lock().map_err(|_| poisoned())?;
            if let Some(order) = guard.as_ref() {
                if filter.matches(order) {
                    out.push(order.clone());
                }
            }
        }
        Ok(out)
    }

    fn next_item_id(&self) -> Result<OrderItemId, RepositoryError> {
        let raw = Self::allocate(&self.next_item_id, "item")?;
        Ok(OrderItemId::new(raw)?)
    }
}
