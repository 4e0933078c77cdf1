use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel stored when the customer leaves the delivery request blank.
pub const NO_DELIVERY_REQUEST: &str = "none";

/// One persisted order. Append-only: never edited or deleted once written.
///
/// The serialized field names (`order_num`, `state`, `date`, ...) and the
/// `date` format are the layout of the existing `orders_history.json`
/// files, so old data keeps loading unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Globally unique, time-derived, sortable by creation.
    #[serde(rename = "order_num")]
    pub order_number: String,
    pub item: String,
    pub address: String,
    /// Free-text delivery wish; `"none"` when the customer left it blank.
    /// Older files predate this field, hence the serde default.
    #[serde(rename = "delivery_request", default = "default_delivery_request")]
    pub delivery_request: String,
    /// Customer-reported mental state. Presentation metadata, passed
    /// through unchanged.
    #[serde(rename = "state")]
    pub mental_state: String,
    /// Display-formatted price label ("unshakable faith", ...). Never
    /// parsed or computed on.
    pub price: String,
    /// Creation instant. Sole time anchor for delivery progress; immutable
    /// after append.
    #[serde(rename = "date", with = "order_date")]
    pub created_at: DateTime<Utc>,
    /// Display label captured at creation. Live stage is always recomputed
    /// from `created_at`; this field is cosmetic.
    pub status: String,
}

fn default_delivery_request() -> String {
    NO_DELIVERY_REQUEST.to_string()
}

/// Transient session cart line. Never persisted; only feeds order placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: String,
    pub price: String,
    pub added_at: DateTime<Utc>,
}

/// Legacy timestamp codec: `2025-01-02 13:45:07` — second precision, no
/// timezone marker, interpreted as UTC.
pub mod order_date {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&dt.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let naive = NaiveDateTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)?;
        Ok(naive.and_utc())
    }
}
