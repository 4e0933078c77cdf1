//! Delivery progress math.
//!
//! # Design
//!
//! Progress is never stored and never advanced by an event. It is a pure
//! function of `(created_at, now)`: a crash leaves no partial transition to
//! recover, and every query is idempotent. `now` is always injected — this
//! module has no clock, no I/O, and no side effects.
//!
//! # Stage table
//!
//! The full delivery window is 3 hours. `percent` is
//! `floor(100 * elapsed / 3h)` clamped to `[0, 100]`, and the stage is read
//! off fixed thresholds:
//!
//! | percent   | stage                 |
//! |-----------|-----------------------|
//! | 0–19      | `received`            |
//! | 20–39     | `departed warehouse`  |
//! | 40–59     | `in transit`          |
//! | 60–99     | `finalizing`          |
//! | 100       | `delivered`           |

use chrono::{DateTime, Utc};

/// Fixed delivery window, anchored at the order's `created_at`.
pub const TOTAL_DELIVERY_SECS: i64 = 3 * 60 * 60;

// ---------------------------------------------------------------------------
// DeliveryStage
// ---------------------------------------------------------------------------

/// The five fixed delivery-progress labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryStage {
    Received,
    DepartedWarehouse,
    InTransit,
    Finalizing,
    /// Fulfillment complete. **Terminal.**
    Delivered,
}

impl DeliveryStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStage::Received => "received",
            DeliveryStage::DepartedWarehouse => "departed warehouse",
            DeliveryStage::InTransit => "in transit",
            DeliveryStage::Finalizing => "finalizing",
            DeliveryStage::Delivered => "delivered",
        }
    }

    /// Returns `true` once no further stage change is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, DeliveryStage::Delivered)
    }

    fn from_percent(percent: i64) -> Self {
        match percent {
            100.. => DeliveryStage::Delivered,
            60..=99 => DeliveryStage::Finalizing,
            40..=59 => DeliveryStage::InTransit,
            20..=39 => DeliveryStage::DepartedWarehouse,
            _ => DeliveryStage::Received,
        }
    }
}

impl std::fmt::Display for DeliveryStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Live progress of one order at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Whole percent, floored, clamped to `0..=100`.
    pub percent: i64,
    pub stage: DeliveryStage,
}

/// Time left until the delivery window closes, floor-rounded to whole hours
/// and minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Remaining {
    pub hours: i64,
    pub minutes: i64,
}

/// Compute the live progress for an order created at `created_at`.
///
/// A `now` before `created_at` (clock skew) clamps to 0%.
pub fn compute(created_at: DateTime<Utc>, now: DateTime<Utc>) -> Progress {
    let elapsed = (now - created_at).num_seconds().max(0);
    let percent = (elapsed * 100 / TOTAL_DELIVERY_SECS).min(100);
    Progress {
        percent,
        stage: DeliveryStage::from_percent(percent),
    }
}

/// Remaining time before the window closes; `None` at or past 100%.
pub fn remaining(created_at: DateTime<Utc>, now: DateTime<Utc>) -> Option<Remaining> {
    if compute(created_at, now).percent >= 100 {
        return None;
    }
    let elapsed = (now - created_at).num_seconds().clamp(0, TOTAL_DELIVERY_SECS);
    let left = TOTAL_DELIVERY_SECS - elapsed;
    Some(Remaining {
        hours: left / 3600,
        minutes: (left % 3600) / 60,
    })
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
