//! Infrastructure layer: order storage and request orchestration.

pub mod order_service;
pub mod repository;

pub use order_service::{OrderService, ServiceError, ServiceResult};
pub use repository::{InMemoryOrderRepository, OrderRepository, RepositoryError};
