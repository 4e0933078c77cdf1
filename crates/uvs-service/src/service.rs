use chrono::{DateTime, Utc};
use tracing::info;

use uvs_notify::{DispatchOutcome, NotificationDispatcher, StageKey};
use uvs_schemas::{OrderRecord, NO_DELIVERY_REQUEST};
use uvs_store::OrderStore;

use crate::progress::{self, Progress, Remaining};
use crate::ServiceError;

/// Cosmetic status label stamped on every new record. The live stage is
/// always recomputed from `created_at`.
pub const INITIAL_STATUS: &str = "in delivery 🚀";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Input for one placement. Request-scoped: no session state lives in the
/// service.
#[derive(Debug, Clone)]
pub struct PlaceOrderRequest {
    pub item: String,
    pub address: String,
    /// Blank or absent collapses to the `"none"` sentinel.
    pub delivery_request: Option<String>,
    /// Passed through unchanged; the presentation layer owns the value set.
    pub mental_state: String,
    /// Display label, never parsed.
    pub price_label: String,
}

/// A successful placement: the persisted record plus the fire-and-forget
/// send outcomes, in dispatch order. Outcomes are inspection-only — a
/// failed send never fails the placement.
#[derive(Debug)]
pub struct PlacedOrder {
    pub record: OrderRecord,
    pub notifications: Vec<(StageKey, DispatchOutcome)>,
}

/// One history row with its live progress.
#[derive(Debug, Clone)]
pub struct OrderStatusView {
    pub record: OrderRecord,
    pub progress: Progress,
}

/// Live progress for a single order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressReport {
    pub progress: Progress,
    /// `None` once the order has reached 100%.
    pub remaining: Option<Remaining>,
}

/// Result of a delivered-ping request.
#[derive(Debug)]
pub enum DeliveryNotice {
    /// The order is at 100% and the delivered message was dispatched.
    Dispatched(DispatchOutcome),
    /// The order has not reached 100% yet; nothing was sent.
    NotYetDue { percent: i64 },
}

// ---------------------------------------------------------------------------
// OrderService
// ---------------------------------------------------------------------------

/// Orchestrates validation, persistence, progress queries, and stage
/// notifications. Every operation takes `now` explicitly so behavior is
/// reproducible under test.
pub struct OrderService {
    store: OrderStore,
    dispatcher: NotificationDispatcher,
}

impl OrderService {
    pub fn new(store: OrderStore, dispatcher: NotificationDispatcher) -> Self {
        Self { store, dispatcher }
    }

    /// Validate, persist, then announce. The two initial notifications go
    /// out only after the append has committed, and their failures are
    /// carried in the result instead of raised.
    pub fn place_order(
        &self,
        req: PlaceOrderRequest,
        now: DateTime<Utc>,
    ) -> Result<PlacedOrder, ServiceError> {
        if req.item.trim().is_empty() {
            return Err(ServiceError::Validation { field: "item" });
        }
        if req.address.trim().is_empty() {
            return Err(ServiceError::Validation { field: "address" });
        }

        let existing = self.store.load()?;
        let order_number = next_order_number(&existing, now);

        let delivery_request = req
            .delivery_request
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| NO_DELIVERY_REQUEST.to_string());

        let record = OrderRecord {
            order_number,
            item: req.item,
            address: req.address,
            delivery_request,
            mental_state: req.mental_state,
            price: req.price_label,
            created_at: now,
            status: INITIAL_STATUS.to_string(),
        };

        self.store.append(record.clone())?;
        info!(order_number = %record.order_number, "order placed");

        let notifications = vec![
            (
                StageKey::Received,
                self.dispatcher
                    .send(StageKey::Received, &record.order_number, &record.item),
            ),
            (
                StageKey::Shipped,
                self.dispatcher
                    .send(StageKey::Shipped, &record.order_number, &record.item),
            ),
        ];

        Ok(PlacedOrder {
            record,
            notifications,
        })
    }

    /// Every stored order with its live progress, most recent first.
    pub fn list_orders(&self, now: DateTime<Utc>) -> Result<Vec<OrderStatusView>, ServiceError> {
        let mut views: Vec<OrderStatusView> = self
            .store
            .load()?
            .into_iter()
            .map(|record| OrderStatusView {
                progress: progress::compute(record.created_at, now),
                record,
            })
            .collect();
        // Insertion order is creation order; newest first for display.
        views.reverse();
        Ok(views)
    }

    /// Live progress for one order.
    pub fn get_progress(
        &self,
        order_number: &str,
        now: DateTime<Utc>,
    ) -> Result<ProgressReport, ServiceError> {
        let record = self.find(order_number)?;
        Ok(ProgressReport {
            progress: progress::compute(record.created_at, now),
            remaining: progress::remaining(record.created_at, now),
        })
    }

    /// Fire the delivered ping for a completed order. Resends on every
    /// call — no de-duplication state is persisted.
    pub fn notify_delivery_complete(
        &self,
        order_number: &str,
        now: DateTime<Utc>,
    ) -> Result<DeliveryNotice, ServiceError> {
        let record = self.find(order_number)?;
        let live = progress::compute(record.created_at, now);
        if live.percent < 100 {
            return Ok(DeliveryNotice::NotYetDue {
                percent: live.percent,
            });
        }

        let outcome = self
            .dispatcher
            .send(StageKey::Delivered, &record.order_number, &record.item);
        Ok(DeliveryNotice::Dispatched(outcome))
    }

    fn find(&self, order_number: &str) -> Result<OrderRecord, ServiceError> {
        self.store
            .load()?
            .into_iter()
            .find(|r| r.order_number == order_number)
            .ok_or_else(|| ServiceError::NotFound {
                order_number: order_number.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Order numbers
// ---------------------------------------------------------------------------

/// Derive the next order number from the creation instant:
/// `UNIVERSE-{unix_seconds}`, extended with a millisecond suffix and then a
/// counter when two placements land in the same second. Time-prefixed, so
/// numbers sort by creation.
fn next_order_number(existing: &[OrderRecord], created_at: DateTime<Utc>) -> String {
    let taken = |candidate: &str| existing.iter().any(|r| r.order_number == candidate);

    let base = format!("UNIVERSE-{}", created_at.timestamp());
    if !taken(&base) {
        return base;
    }

    let with_millis = format!("{base}-{:03}", created_at.timestamp_subsec_millis());
    if !taken(&with_millis) {
        return with_millis;
    }

    let mut n = 1u32;
    loop {
        let candidate = format!("{with_millis}-{n}");
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
