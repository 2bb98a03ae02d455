//! Orders domain module.
//!
//! This crate contains business rules for orders and their items, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod commands;
pub mod filter;
pub mod item;
pub mod lifecycle;
pub mod order;
pub mod search;
pub mod status;

pub use commands::{AddItem, CancelOrder, CreateOrder, RemoveItem, UpdateItem, UpdateOrder};
pub use filter::OrderFilter;
pub use item::{ItemDraft, OrderItem, Price, Quantity};
pub use lifecycle::OrderLifecycle;
pub use order::{Order, add_item_command};
pub use search::ItemMatches;
pub use status::OrderStatus;
