use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;

use orderdesk_core::{OrderId, OrderItemId};
use orderdesk_orders::RemoveItem;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

/// Item routes, nested under `/orders` next to the order routes.
pub fn router() -> Router {
    Router::new()
        .route("/:id/items", get(list_items).post(add_item))
        .route(
            "/:id/items/:item_id",
            get(get_item).put(update_item).delete(remove_item),
        )
}

fn parse_ids(id: &str, item_id: &str) -> Result<(OrderId, OrderItemId), Response> {
    Ok((errors::parse_order_id(id)?, errors::parse_item_id(item_id)?))
}

pub async fn add_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::ItemRequest>, JsonRejection>,
) -> Response {
    let order_id = match errors::parse_order_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    let cmd = match body.into_add_command(order_id, Utc::now()) {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.orders.add_item(cmd) {
        Ok(item) => (StatusCode::CREATED, Json(dto::item_to_json(&item))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// Lists the order's items, narrowed by `?search=` when given.
pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    query: Result<Query<dto::SearchItemsQuery>, QueryRejection>,
) -> Response {
    let order_id = match errors::parse_order_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Query(query) = match query {
        Ok(q) => q,
        Err(rejection) => return errors::query_rejection_to_response(rejection),
    };

    let term = query.search.unwrap_or_default();
    match services.orders.search_items(order_id, &term) {
        Ok(items) => {
            let body = items.iter().map(dto::item_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path((id, item_id)): Path<(String, String)>,
) -> Response {
    let (order_id, item_id) = match parse_ids(&id, &item_id) {
        Ok(ids) => ids,
        Err(resp) => return resp,
    };

    match services.orders.get_item(order_id, item_id) {
        Ok(item) => (StatusCode::OK, Json(dto::item_to_json(&item))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path((id, item_id)): Path<(String, String)>,
    body: Result<Json<dto::ItemRequest>, JsonRejection>,
) -> Response {
    let (order_id, item_id) = match parse_ids(&id, &item_id) {
        Ok(ids) => ids,
        Err(resp) => return resp,
    };
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    let cmd = match body.into_update_command(order_id, item_id, Utc::now()) {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.orders.update_item(cmd) {
        Ok(item) => (StatusCode::OK, Json(dto::item_to_json(&item))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn remove_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path((id, item_id)): Path<(String, String)>,
) -> Response {
    let (order_id, item_id) = match parse_ids(&id, &item_id) {
        Ok(ids) => ids,
        Err(resp) => return resp,
    };

    let cmd = RemoveItem {
        order_id,
        item_id,
        occurred_at: Utc::now(),
    };
    match services.orders.remove_item(cmd) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
