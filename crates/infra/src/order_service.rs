//! Order command/query orchestration.
//!
//! Every request enters through [`OrderService`], which:
//!
//! ```text
//! request
//!   ↓
//! 1. Load the order (repository, scoped to one order id)
//!   ↓
//! 2. Apply a lifecycle transition or an item mutation (pure domain code)
//!   ↓
//! 3. Commit the result atomically, or discard it on any error
//! ```
//!
//! Input validation happens before step 1: commands carry already-validated
//! value objects (`ItemDraft`, `OrderStatus`), so a rejected request never
//! reaches storage.

use thiserror::Error;
use tracing::{info, instrument, warn};

use orderdesk_core::{AggregateRoot, DomainError, OrderId, OrderItemId};
use orderdesk_orders::{
    AddItem, CancelOrder, CreateOrder, Order, OrderFilter, OrderItem, OrderLifecycle, RemoveItem,
    UpdateItem, UpdateOrder,
};

use crate::repository::{OrderRepository, RepositoryError};

/// Errors surfaced to callers of the service.
///
/// This is the full taxonomy the HTTP layer maps to status codes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Malformed or out-of-range input.
    #[error("{0}")]
    Validation(String),
    /// Unknown order or item.
    #[error("{0}")]
    NotFound(String),
    /// Resource exists but its state forbids the request (e.g. cancel on a
    /// non-pending order).
    #[error("{0}")]
    Conflict(String),
    /// Anything else: storage failures, broken invariants.
    #[error("{0}")]
    Internal(String),
}

impl From<DomainError> for ServiceError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => {
                ServiceError::Validation(msg)
            }
            e @ DomainError::NotFound(_) => ServiceError::NotFound(e.to_string()),
            DomainError::Conflict(msg) => ServiceError::Conflict(msg),
            e @ DomainError::InvariantViolation(_) => ServiceError::Internal(e.to_string()),
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            e @ RepositoryError::NotFound(_) => ServiceError::NotFound(e.to_string()),
            RepositoryError::Domain(e) => e.into(),
            e @ RepositoryError::Storage(_) => ServiceError::Internal(e.to_string()),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Application service over an [`OrderRepository`].
#[derive(Debug)]
pub struct OrderService<R> {
    repo: R,
}

impl<R> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }
}

impl<R> OrderService<R>
where
    R: OrderRepository,
{
    #[instrument(skip(self, cmd), fields(customer_id = %cmd.customer_id))]
    pub fn create_order(&self, cmd: CreateOrder) -> ServiceResult<Order> {
        let order = self.repo.create(&cmd)?;
        info!(
            order_id = %order.order_id(),
            status = %order.status(),
            items = order.items().len(),
            "order created"
        );
        Ok(order)
    }

    pub fn get_order(&self, id: OrderId) -> ServiceResult<Order> {
        Ok(self.repo.get(id)?)
    }

    /// Unguarded status replace. Does not consult the lifecycle, and the
    /// customer stays whatever it was at creation.
    #[instrument(skip(self, cmd), fields(order_id = %cmd.order_id))]
    pub fn update_order(&self, cmd: UpdateOrder) -> ServiceResult<Order> {
        let order = self.repo.update(cmd.order_id, |order| order.apply_update(&cmd))?;
        if let Some(requested) = cmd.customer_id.filter(|c| *c != order.customer_id()) {
            warn!(
                requested = %requested,
                customer_id = %order.customer_id(),
                "customer change ignored"
            );
        }
        info!(status = %order.status(), version = order.version(), "order updated");
        Ok(order)
    }

    #[instrument(skip(self))]
    pub fn delete_order(&self, id: OrderId) -> ServiceResult<()> {
        self.repo.delete(id)?;
        info!("order deleted");
        Ok(())
    }

    /// Guarded `pending` → `canceled` transition.
    ///
    /// Unknown ids are `NotFound`, never `Conflict`: the lookup happens before
    /// the lifecycle check.
    #[instrument(skip(self, cmd), fields(order_id = %cmd.order_id))]
    pub fn cancel_order(&self, cmd: CancelOrder) -> ServiceResult<Order> {
        match self
            .repo
            .update(cmd.order_id, |order| OrderLifecycle::cancel(order, &cmd))
        {
            Ok(order) => {
                info!("order canceled");
                Ok(order)
            }
            Err(RepositoryError::Domain(e @ DomainError::Conflict(_))) => {
                warn!(reason = %e, "cancel rejected");
                Err(e.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn list_orders(&self, filter: &OrderFilter) -> ServiceResult<Vec<Order>> {
        Ok(self.repo.list(filter)?)
    }

    #[instrument(skip(self, cmd), fields(order_id = %cmd.order_id))]
    pub fn add_item(&self, cmd: AddItem) -> ServiceResult<OrderItem> {
        // Reserve the id outside the order lock; a failed add just leaves a gap.
        let item_id = self.repo.next_item_id()?;
        let order = self
            .repo
            .update(cmd.order_id, |order| order.add_item(item_id, &cmd).map(|_| ()))?;
        let item = order.item(item_id)?.clone();
        info!(item_id = %item.id, product_id = %item.product_id, "item added");
        Ok(item)
    }

    pub fn get_item(&self, order_id: OrderId, item_id: OrderItemId) -> ServiceResult<OrderItem> {
        let order = self.repo.get(order_id)?;
        Ok(order.item(item_id)?.clone())
    }

    #[instrument(skip(self, cmd), fields(order_id = %cmd.order_id, item_id = %cmd.item_id))]
    pub fn update_item(&self, cmd: UpdateItem) -> ServiceResult<OrderItem> {
        let order = self
            .repo
            .update(cmd.order_id, |order| order.update_item(&cmd).map(|_| ()))?;
        let item = order.item(cmd.item_id)?.clone();
        info!("item updated");
        Ok(item)
    }

    #[instrument(skip(self, cmd), fields(order_id = %cmd.order_id, item_id = %cmd.item_id))]
    pub fn remove_item(&self, cmd: RemoveItem) -> ServiceResult<()> {
        self.repo
            .update(cmd.order_id, |order| order.remove_item(&cmd).map(|_| ()))?;
        info!("item removed");
        Ok(())
    }

    /// Items of one order whose product id matches `term`; empty term lists all.
    pub fn search_items(&self, order_id: OrderId, term: &str) -> ServiceResult<Vec<OrderItem>> {
        let order = self.repo.get(order_id)?;
        Ok(order.search_items(term).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    use chrono::{DateTime, Duration, TimeZone, Utc};
    use orderdesk_core::CustomerId;
    use orderdesk_orders::{ItemDraft, OrderStatus, add_item_command};
    use rust_decimal::Decimal;

    use crate::repository::InMemoryOrderRepository;

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() + Duration::seconds(secs)
    }

    fn service() -> OrderService<InMemoryOrderRepository> {
        OrderService::new(InMemoryOrderRepository::new())
    }

    fn create(svc: &OrderService<InMemoryOrderRepository>, customer: i64) -> Order {
        svc.create_order(CreateOrder {
            customer_id: CustomerId::new(customer).unwrap(),
            status: None,
            created_at: None,
            items: vec![],
            occurred_at: t(0),
        })
        .unwrap()
    }

    fn cancel(order_id: OrderId, secs: i64) -> CancelOrder {
        CancelOrder {
            order_id,
            occurred_at: t(secs),
        }
    }

    #[test]
    fn end_to_end_scenario() {
        let svc = service();
        let order = create(&svc, 7);
        let id = order.order_id();
        assert!(order.status().is_pending());

        let item = svc
            .add_item(add_item_command(id, 42, 3, Decimal::new(999, 2), t(1)).unwrap())
            .unwrap();
        assert_eq!(item.order_id, id);

        let after_add = svc.get_order(id).unwrap();
        assert_eq!(after_add.items().len(), 1);
        assert_ne!(after_add.updated_at(), order.updated_at());

        let canceled = svc.cancel_order(cancel(id, 2)).unwrap();
        assert!(canceled.status().is_canceled());

        let err = svc.cancel_order(cancel(id, 3)).unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        svc.delete_order(id).unwrap();
        assert!(matches!(svc.get_order(id), Err(ServiceError::NotFound(_))));
        assert!(matches!(
            svc.get_item(id, item.id),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn cancel_unknown_order_is_not_found() {
        let svc = service();
        let err = svc
            .cancel_order(cancel(OrderId::new(404).unwrap(), 1))
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn created_timestamp_survives_every_mutation() {
        let svc = service();
        let order = create(&svc, 7);
        let id = order.order_id();

        let item = svc
            .add_item(add_item_command(id, 1, 1, Decimal::ONE, t(1)).unwrap())
            .unwrap();
        svc.update_item(UpdateItem {
            order_id: id,
            item_id: item.id,
            item: ItemDraft::new(2, 2, Decimal::TWO).unwrap(),
            occurred_at: t(2),
        })
        .unwrap();
        svc.update_order(UpdateOrder {
            order_id: id,
            customer_id: None,
            status: Some(OrderStatus::Other("Shipped".into())),
            occurred_at: t(3),
        })
        .unwrap();
        svc.remove_item(RemoveItem {
            order_id: id,
            item_id: item.id,
            occurred_at: t(4),
        })
        .unwrap();

        let stored = svc.get_order(id).unwrap();
        assert_eq!(stored.created_at(), order.created_at());
        assert_eq!(stored.updated_at(), t(4));
    }

    #[test]
    fn update_item_under_wrong_order_is_not_found() {
        let svc = service();
        let a = create(&svc, 1).order_id();
        let b = create(&svc, 2).order_id();
        let item = svc
            .add_item(add_item_command(a, 1, 1, Decimal::ONE, t(1)).unwrap())
            .unwrap();

        let err = svc
            .update_item(UpdateItem {
                order_id: b,
                item_id: item.id,
                item: ItemDraft::new(1, 5, Decimal::ONE).unwrap(),
                occurred_at: t(2),
            })
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert_eq!(svc.get_item(a, item.id).unwrap().quantity.get(), 1);
    }

    #[test]
    fn items_can_still_change_after_cancel() {
        let svc = service();
        let id = create(&svc, 1).order_id();
        svc.cancel_order(cancel(id, 1)).unwrap();

        let item = svc
            .add_item(add_item_command(id, 5, 1, Decimal::ONE, t(2)).unwrap())
            .unwrap();
        assert_eq!(item.order_id, id);
    }

    #[test]
    fn search_filters_by_product() {
        let svc = service();
        let id = create(&svc, 1).order_id();
        for product in [42, 7, 420] {
            svc.add_item(add_item_command(id, product, 1, Decimal::ONE, t(1)).unwrap())
                .unwrap();
        }

        let hits = svc.search_items(id, "42").unwrap();
        let products: Vec<i64> = hits.iter().map(|i| i.product_id.get()).collect();
        assert_eq!(products, vec![42, 420]);
        assert_eq!(svc.search_items(id, "").unwrap().len(), 3);
        assert!(matches!(
            svc.search_items(OrderId::new(99).unwrap(), ""),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn concurrent_cancels_succeed_exactly_once() {
        let svc = Arc::new(service());
        let id = create(&svc, 1).order_id();

        let handles: Vec<_> = (0..16)
            .map(|n| {
                let svc = Arc::clone(&svc);
                thread::spawn(move || svc.cancel_order(cancel(id, n + 1)))
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let ok = results.iter().filter(|r| r.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, Err(ServiceError::Conflict(_))))
            .count();
        assert_eq!(ok, 1);
        assert_eq!(conflicts, 15);
        assert_eq!(svc.get_order(id).unwrap().version(), 2);
    }

    #[test]
    fn concurrent_item_adds_are_not_lost() {
        let svc = Arc::new(service());
        let id = create(&svc, 1).order_id();

        let handles: Vec<_> = (1..=20)
            .map(|product| {
                let svc = Arc::clone(&svc);
                thread::spawn(move || {
                    svc.add_item(add_item_command(id, product, 1, Decimal::ONE, t(product)).unwrap())
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap().unwrap();
        }

        let order = svc.get_order(id).unwrap();
        assert_eq!(order.items().len(), 20);
        assert_eq!(order.version(), 21);
    }

    #[test]
    fn update_ignores_customer_change() {
        let svc = service();
        let id = create(&svc, 7).order_id();

        let updated = svc
            .update_order(UpdateOrder {
                order_id: id,
                customer_id: Some(CustomerId::new(8).unwrap()),
                status: Some(OrderStatus::Other("Shipped".into())),
                occurred_at: t(1),
            })
            .unwrap();
        assert_eq!(updated.customer_id().get(), 7);
        assert_eq!(updated.status().as_str(), "Shipped");
    }

    #[test]
    fn add_stamped_before_cancel_keeps_cancel_timestamp() {
        let svc = service();
        let id = create(&svc, 1).order_id();

        let canceled = svc.cancel_order(cancel(id, 5)).unwrap();
        svc.add_item(add_item_command(id, 9, 1, Decimal::ONE, t(1)).unwrap())
            .unwrap();

        let stored = svc.get_order(id).unwrap();
        assert!(stored.status().is_canceled());
        assert_eq!(stored.updated_at(), canceled.updated_at());
    }

    #[test]
    fn cancel_racing_item_writes_leaves_consistent_order() {
        let svc = Arc::new(service());
        let id = create(&svc, 1).order_id();

        let cancel_handle = {
            let svc = Arc::clone(&svc);
            thread::spawn(move || svc.cancel_order(cancel(id, 10)))
        };
        let adders: Vec<_> = (1..=12)
            .map(|product| {
                let svc = Arc::clone(&svc);
                thread::spawn(move || {
                    svc.add_item(add_item_command(id, product, 1, Decimal::ONE, t(product)).unwrap())
                })
            })
            .collect();

        let canceled = cancel_handle.join().unwrap().unwrap();
        for h in adders {
            h.join().unwrap().unwrap();
        }

        let order = svc.get_order(id).unwrap();
        assert!(order.status().is_canceled());
        assert_eq!(order.items().len(), 12);
        assert_eq!(order.version(), 14);
        assert!(order.updated_at() >= canceled.updated_at());
        assert!(order.updated_at() >= t(10));
    }

    #[test]
    fn domain_errors_map_onto_service_taxonomy() {
        assert!(matches!(
            ServiceError::from(DomainError::invalid_id("x")),
            ServiceError::Validation(_)
        ));
        assert!(matches!(
            ServiceError::from(DomainError::invariant("x")),
            ServiceError::Internal(_)
        ));
        assert!(matches!(
            ServiceError::from(RepositoryError::Storage("disk".into())),
            ServiceError::Internal(_)
        ));
    }
}
