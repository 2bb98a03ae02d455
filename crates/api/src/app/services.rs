use orderdesk_infra::{InMemoryOrderRepository, OrderService};

/// Process-wide service graph handed to every handler.
#[derive(Debug)]
pub struct AppServices {
    pub orders: OrderService<InMemoryOrderRepository>,
}

impl AppServices {
    pub fn new(repo: InMemoryOrderRepository) -> Self {
        Self {
            orders: OrderService::new(repo),
        }
    }
}

pub fn build_services() -> AppServices {
    AppServices::new(InMemoryOrderRepository::new())
}
