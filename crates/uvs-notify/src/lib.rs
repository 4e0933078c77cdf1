//! Stage-transition notifications.
//!
//! # Contract
//! - One Telegram `sendMessage` POST per call, with an explicit request
//!   timeout. Exactly one attempt: no retry, no backoff, no queuing.
//! - Transport failure is reported through [`DispatchOutcome`] and a
//!   `tracing::warn!`, never as an error. Order placement must succeed even
//!   when every send fails.
//! - The bot token is embedded in the request URL, so error values are
//!   stripped of their URL before they reach logs or outcomes, and
//!   [`TelegramCredentials`] redacts itself in `Debug` output.

use std::time::Duration;

use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

/// Bounded wait for the push endpoint; a hung network call must not stall
/// the caller.
const SEND_TIMEOUT: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// StageKey
// ---------------------------------------------------------------------------

/// The three lifecycle transitions that produce a customer message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKey {
    /// Order accepted — the receipt message.
    Received,
    /// Left the universe warehouse.
    Shipped,
    /// Fulfillment confirmed at 100%.
    Delivered,
}

impl StageKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageKey::Received => "received",
            StageKey::Shipped => "shipped",
            StageKey::Delivered => "delivered",
        }
    }
}

// ---------------------------------------------------------------------------
// Message templates
// ---------------------------------------------------------------------------

/// Render the fixed Markdown template for a stage, interpolating the order
/// number and item.
pub fn render_message(stage: StageKey, order_number: &str, item: &str) -> String {
    match stage {
        StageKey::Received => format!(
            "🎊 *Universe Store order receipt*\n\
             ━━━━━━━━━━━━━━━━━━━━━\n\
             📦 *Item:* {item}\n\
             🏷️ *Order number:* {order_number}\n\
             💳 *Payment:* Universe Card (already settled)\n\
             ━━━━━━━━━━━━━━━━━━━━━\n\
             ✅ *Payment complete*\n\
             🚀 *Delivery:* cosmic shipping started\n\n\
             It is done. It is already yours.\n\
             💌 Universe Fulfillment Center"
        ),
        StageKey::Shipped => format!(
            "🚀 Order *{order_number}* has departed the universe warehouse.\n\
             📦 {item} is crossing the quantum tunnel to you."
        ),
        StageKey::Delivered => format!(
            "📍 Order *{order_number}* delivered.\n\
             ✨ {item} has arrived in your timeline. Enjoy."
        ),
    }
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Telegram push credentials, resolved once at startup and passed in.
/// **Values are redacted in `Debug` output.**
#[derive(Clone)]
pub struct TelegramCredentials {
    pub bot_token: String,
    pub chat_id: String,
}

impl std::fmt::Debug for TelegramCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramCredentials")
            .field("bot_token", &"<REDACTED>")
            .field("chat_id", &"<REDACTED>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// DispatchOutcome
// ---------------------------------------------------------------------------

/// What happened to one fire-and-forget send. Inspection only — callers may
/// log or display it, but must never propagate it as an operation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The endpoint accepted the message.
    Sent,
    /// No credentials configured; nothing was attempted.
    Skipped,
    /// The single attempt failed (network error, timeout, or non-2xx).
    Failed { reason: String },
}

impl DispatchOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, DispatchOutcome::Sent)
    }
}

// ---------------------------------------------------------------------------
// NotificationDispatcher
// ---------------------------------------------------------------------------

/// Best-effort push to the Telegram Bot API.
///
/// Credentials are optional in every environment — an unconfigured
/// dispatcher skips every send instead of failing.
#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
    http: reqwest::blocking::Client,
    base_url: String,
    credentials: Option<TelegramCredentials>,
}

impl NotificationDispatcher {
    pub fn new(credentials: Option<TelegramCredentials>) -> Self {
        Self::new_with_base_url(credentials, DEFAULT_BASE_URL.to_string())
    }

    pub fn new_with_base_url(credentials: Option<TelegramCredentials>, base_url: String) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            base_url,
            credentials,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    /// Send the stage message for one order. Never raises: the outcome is
    /// the whole story.
    pub fn send(&self, stage: StageKey, order_number: &str, item: &str) -> DispatchOutcome {
        let Some(creds) = &self.credentials else {
            debug!(stage = stage.as_str(), order_number, "notification skipped: no credentials");
            return DispatchOutcome::Skipped;
        };

        let url = format!(
            "{}/bot{}/sendMessage",
            self.base_url.trim_end_matches('/'),
            creds.bot_token
        );
        let text = render_message(stage, order_number, item);
        let params = [
            ("chat_id", creds.chat_id.as_str()),
            ("text", text.as_str()),
            ("parse_mode", "Markdown"),
        ];

        let result = self
            .http
            .post(url)
            .timeout(SEND_TIMEOUT)
            .form(&params)
            .send();

        match result {
            Ok(resp) if resp.status().is_success() => {
                debug!(stage = stage.as_str(), order_number, "notification sent");
                DispatchOutcome::Sent
            }
            Ok(resp) => {
                let reason = format!("endpoint returned status {}", resp.status().as_u16());
                warn!(stage = stage.as_str(), order_number, %reason, "notification rejected");
                DispatchOutcome::Failed { reason }
            }
            Err(err) => {
                // The URL carries the bot token; drop it before the error
                // becomes a log line or an outcome string.
                let err = err.without_url();
                let reason = err.to_string();
                warn!(stage = stage.as_str(), order_number, %reason, "notification failed");
                DispatchOutcome::Failed { reason }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_interpolate_order_number_and_item() {
        for stage in [StageKey::Received, StageKey::Shipped, StageKey::Delivered] {
            let msg = render_message(stage, "UNIVERSE-42", "🏠 Dream home");
            assert!(msg.contains("UNIVERSE-42"), "{stage:?} must carry the order number");
            assert!(msg.contains("🏠 Dream home"), "{stage:?} must carry the item");
        }
    }

    #[test]
    fn templates_differ_per_stage() {
        let received = render_message(StageKey::Received, "UNIVERSE-1", "x");
        let shipped = render_message(StageKey::Shipped, "UNIVERSE-1", "x");
        let delivered = render_message(StageKey::Delivered, "UNIVERSE-1", "x");
        assert_ne!(received, shipped);
        assert_ne!(shipped, delivered);
        assert_ne!(received, delivered);
    }

    #[test]
    fn credentials_debug_is_redacted() {
        let creds = TelegramCredentials {
            bot_token: "123456:AAH-real-token".to_string(),
            chat_id: "987654321".to_string(),
        };
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("<REDACTED>"));
        assert!(!rendered.contains("AAH-real-token"));
        assert!(!rendered.contains("987654321"));
    }

    #[test]
    fn unconfigured_dispatcher_skips() {
        let dispatcher = NotificationDispatcher::new(None);
        let outcome = dispatcher.send(StageKey::Received, "UNIVERSE-1", "x");
        assert_eq!(outcome, DispatchOutcome::Skipped);
    }
}
