use axum::Router;

pub mod items;
pub mod orders;
pub mod system;

/// Router for the `/orders` resource tree.
pub fn router() -> Router {
    Router::new()
        .nest("/orders", orders::router().merge(items::router()))
}
