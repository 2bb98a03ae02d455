use chrono::NaiveDate;

use orderdesk_core::CustomerId;

use crate::order::Order;

/// Predicates for listing orders. Every set field must match (AND).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub customer_id: Option<CustomerId>,
    /// Exact, case-sensitive match against the stored status text.
    pub status: Option<String>,
    /// Matches orders created on this UTC calendar day.
    pub created_on: Option<NaiveDate>,
}

impl OrderFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn customer(mut self, customer_id: CustomerId) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn created_on(mut self, day: NaiveDate) -> Self {
        self.created_on = Some(day);
        self
    }

    pub fn matches(&self, order: &Order) -> bool {
        if let Some(customer_id) = self.customer_id {
            if order.customer_id() != customer_id {
                return false;
            }
        }
        if let Some(status) = &self.status {
            if order.status().as_str() != status {
                return false;
            }
        }
        if let Some(day) = self.created_on {
            if order.created_at().date_naive() != day {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CreateOrder;
    use crate::status::OrderStatus;
    use chrono::{TimeZone, Utc};
    use orderdesk_core::OrderId;

    fn order(id: i64, customer: i64, status: &str, day: u32) -> Order {
        Order::create(
            OrderId::new(id).unwrap(),
            &CreateOrder {
                customer_id: CustomerId::new(customer).unwrap(),
                status: Some(status.parse::<OrderStatus>().unwrap()),
                created_at: Some(Utc.with_ymd_and_hms(2024, 5, day, 23, 59, 0).unwrap()),
                items: vec![],
                occurred_at: Utc::now(),
            },
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = OrderFilter::new();
        assert!(filter.matches(&order(1, 7, "pending", 1)));
    }

    #[test]
    fn predicates_are_anded() {
        let filter = OrderFilter::new()
            .customer(CustomerId::new(7).unwrap())
            .status("Shipped");
        assert!(filter.matches(&order(1, 7, "Shipped", 1)));
        assert!(!filter.matches(&order(2, 7, "pending", 1)));
        assert!(!filter.matches(&order(3, 8, "Shipped", 1)));
    }

    #[test]
    fn status_match_is_case_sensitive() {
        let filter = OrderFilter::new().status("shipped");
        assert!(!filter.matches(&order(1, 7, "Shipped", 1)));
        // known statuses are stored lowercase
        assert!(OrderFilter::new().status("pending").matches(&order(2, 7, "PENDING", 1)));
    }

    #[test]
    fn created_on_truncates_to_day() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let filter = OrderFilter::new().created_on(day);
        assert!(filter.matches(&order(1, 7, "pending", 2)));
        assert!(!filter.matches(&order(2, 7, "pending", 3)));
    }
}
