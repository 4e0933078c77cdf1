//! Order lifecycle orchestration.
//!
//! The service validates placement input, persists records through the
//! append-only store, answers progress queries by recomputing stage from
//! elapsed time, and fires stage notifications after the write has
//! committed. Notification failures never fail an operation.

pub mod progress;
mod service;

pub use service::{
    DeliveryNotice, OrderService, OrderStatusView, PlaceOrderRequest, PlacedOrder, ProgressReport,
    INITIAL_STATUS,
};

use uvs_store::StoreError;

// ---------------------------------------------------------------------------
// ServiceError
// ---------------------------------------------------------------------------

/// Operation failures surfaced to callers.
///
/// Notification transport failures are deliberately absent: they are
/// reported through [`uvs_notify::DispatchOutcome`] only.
#[derive(Debug)]
pub enum ServiceError {
    /// A required input was empty or whitespace-only. Recoverable; the
    /// store is untouched.
    Validation { field: &'static str },
    /// No stored order carries the requested order number.
    NotFound { order_number: String },
    /// The order store could not be read or rewritten.
    Storage(StoreError),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::Validation { field } => {
                write!(f, "VALIDATION_FAILED field={field}: must not be empty")
            }
            ServiceError::NotFound { order_number } => {
                write!(f, "ORDER_NOT_FOUND order_number={order_number}")
            }
            ServiceError::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        ServiceError::Storage(err)
    }
}
