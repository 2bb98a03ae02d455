use core::str::FromStr;

use serde::{Deserialize, Serialize};

use orderdesk_core::DomainError;

/// Order status.
///
/// Only `pending` and `canceled` carry meaning for the lifecycle. Any other
/// business state (shipped, delivered, ...) is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OrderStatus {
    #[default]
    Pending,
    Canceled,
    Other(String),
}

impl OrderStatus {
    pub const PENDING: &'static str = "pending";
    pub const CANCELED: &'static str = "canceled";

    /// Stored textual form. Known statuses are lowercase.
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Pending => Self::PENDING,
            OrderStatus::Canceled => Self::CANCELED,
            OrderStatus::Other(s) => s,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, OrderStatus::Pending)
    }

    pub fn is_canceled(&self) -> bool {
        matches!(self, OrderStatus::Canceled)
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    /// Known statuses match case-insensitively; blank input is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("order_status must not be empty"));
        }
        if trimmed.eq_ignore_ascii_case(Self::PENDING) {
            Ok(OrderStatus::Pending)
        } else if trimmed.eq_ignore_ascii_case(Self::CANCELED) {
            Ok(OrderStatus::Canceled)
        } else {
            Ok(OrderStatus::Other(trimmed.to_string()))
        }
    }
}

impl TryFrom<String> for OrderStatus {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OrderStatus> for String {
    fn from(value: OrderStatus) -> Self {
        match value {
            OrderStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
