//! Guarded status transitions.
//!
//! Cancellation is the only transition with a precondition. Plain updates
//! go through [`Order::apply_update`] and are not checked here.

use orderdesk_core::{DomainError, DomainResult};

use crate::commands::CancelOrder;
use crate::order::Order;
use crate::status::OrderStatus;

/// Order status state machine.
pub struct OrderLifecycle;

impl OrderLifecycle {
    pub fn can_cancel(order: &Order) -> bool {
        order.status().is_pending()
    }

    /// `pending` → `canceled`.
    ///
    /// Any other source state is a `Conflict`: the order exists but cannot be
    /// canceled as it stands. The order is left untouched on failure.
    pub fn cancel(order: &mut Order, cmd: &CancelOrder) -> DomainResult<()> {
        if order.order_id() != cmd.order_id {
            return Err(DomainError::invariant("order_id mismatch"));
        }

        if !Self::can_cancel(order) {
            return Err(DomainError::conflict(format!(
                "order {} cannot be canceled from status '{}'",
                cmd.order_id,
                order.status()
            )));
        }

        order.set_status(OrderStatus::Canceled, cmd.occurred_at);
        Ok(())
    }
}
