//! Order storage boundary.
//!
//! This module defines the persistence abstraction for the order aggregate
//! plus an in-memory backend used by the API and tests.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryOrderRepository;
pub use r#trait::{OrderRepository, RepositoryError};
