use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use orderdesk_core::{DomainError, OrderId, OrderItemId};
use orderdesk_infra::ServiceError;

const INTERNAL_MESSAGE: &str = "an unexpected error occurred";

pub fn service_error_to_response(err: ServiceError) -> Response {
    match err {
        ServiceError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, msg),
        ServiceError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, msg),
        ServiceError::Conflict(msg) => json_error(StatusCode::CONFLICT, msg),
        ServiceError::Internal(msg) => {
            tracing::error!(error = %msg, "internal error while handling request");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE)
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> Response {
    service_error_to_response(err.into())
}

pub fn json_rejection_to_response(rejection: JsonRejection) -> Response {
    json_error(StatusCode::BAD_REQUEST, rejection.body_text())
}

pub fn query_rejection_to_response(rejection: QueryRejection) -> Response {
    json_error(StatusCode::BAD_REQUEST, rejection.body_text())
}

/// Error body shared by every non-2xx response.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "status": status.as_u16(),
            "error": status.canonical_reason().unwrap_or("Error"),
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn parse_order_id(raw: &str) -> Result<OrderId, Response> {
    parse_path_id(raw, "order")
}

pub fn parse_item_id(raw: &str) -> Result<OrderItemId, Response> {
    parse_path_id(raw, "item")
}

/// Non-numeric segments are a bad request. Numbers outside the id range
/// name nothing that could exist, so they are a plain 404.
fn parse_path_id<T>(raw: &str, what: &str) -> Result<T, Response>
where
    T: TryFrom<i64>,
{
    let value = raw.trim().parse::<i64>().map_err(|_| {
        json_error(
            StatusCode::BAD_REQUEST,
            format!("{what} id must be an integer, got '{raw}'"),
        )
    })?;
    T::try_from(value).map_err(|_| {
        service_error_to_response(ServiceError::NotFound(format!("{what} {value} not found")))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_statuses() {
        let cases = [
            (ServiceError::Validation("v".into()), StatusCode::BAD_REQUEST),
            (ServiceError::NotFound("n".into()), StatusCode::NOT_FOUND),
            (ServiceError::Conflict("c".into()), StatusCode::CONFLICT),
            (
                ServiceError::Internal("lock poisoned".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(service_error_to_response(err).status(), status);
        }
    }

    #[test]
    fn out_of_range_path_ids_are_not_found() {
        assert_eq!(parse_order_id("0").unwrap_err().status(), StatusCode::NOT_FOUND);
        assert_eq!(parse_order_id("-3").unwrap_err().status(), StatusCode::NOT_FOUND);
        assert_eq!(parse_item_id("0").unwrap_err().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn path_ids_must_be_integers() {
        assert_eq!(parse_order_id(" 12 ").unwrap().get(), 12);
        assert_eq!(
            parse_order_id("abc").unwrap_err().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            parse_item_id("1.5").unwrap_err().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
