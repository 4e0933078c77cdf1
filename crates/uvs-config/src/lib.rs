//! Settings and secret resolution.
//!
//! # Contract
//! - The settings file stores only env var **NAMES** for the Telegram
//!   credentials, never the values.
//! - Secrets are resolved from the environment **once** at startup via
//!   [`resolve_telegram`]; the result is passed into constructors. Do not
//!   scatter `std::env::var` calls across the codebase.
//! - [`ResolvedTelegram`] redacts its values in `Debug` output, and error
//!   messages reference the env var NAME, never the value.
//! - Telegram credentials are optional in every environment: a missing or
//!   blank variable produces `None`, and the dispatcher runs unconfigured.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// The fixed set of customer mental states offered by the order form. The
/// core passes the chosen value through unchanged.
pub const MENTAL_STATES: &[&str] = &[
    "already received",
    "hopeful",
    "desperate",
    "calm certainty",
];

/// Fallback price label for custom orders without a catalog match.
pub const DEFAULT_PRICE_LABEL: &str = "unshakable faith";

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Runtime settings, loadable from a YAML file. Every field has a default,
/// so a missing or partial file works.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Path of the append-only order history file.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    #[serde(default)]
    pub telegram: TelegramEnvNames,
    #[serde(default = "default_catalog")]
    pub catalog: Vec<CatalogEntry>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            telegram: TelegramEnvNames::default(),
            catalog: default_catalog(),
        }
    }
}

impl Settings {
    /// Load from a YAML file, or fall back to the built-in defaults when no
    /// path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {path:?}"))?;
        serde_yaml::from_str(&raw).with_context(|| format!("invalid settings yaml {path:?}"))
    }

    /// Catalog price label for an item, or the custom-order fallback.
    pub fn price_for(&self, item: &str) -> String {
        self.catalog
            .iter()
            .find(|entry| entry.name == item)
            .map(|entry| entry.price.clone())
            .unwrap_or_else(|| DEFAULT_PRICE_LABEL.to_string())
    }
}

fn default_store_path() -> PathBuf {
    // Legacy filename; existing data files keep working.
    PathBuf::from("orders_history.json")
}

/// Env var NAMES holding the Telegram credentials. Names live in config;
/// values live in the environment only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramEnvNames {
    #[serde(default = "default_token_env")]
    pub bot_token_env: String,
    #[serde(default = "default_chat_id_env")]
    pub chat_id_env: String,
}

impl Default for TelegramEnvNames {
    fn default() -> Self {
        Self {
            bot_token_env: default_token_env(),
            chat_id_env: default_chat_id_env(),
        }
    }
}

fn default_token_env() -> String {
    "UVS_TELEGRAM_TOKEN".to_string()
}

fn default_chat_id_env() -> String {
    "UVS_TELEGRAM_CHAT_ID".to_string()
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// One featured product. Static presentation data, not core state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub desc: String,
    pub price: String,
    pub emoji: String,
}

fn entry(name: &str, desc: &str, price: &str, emoji: &str) -> CatalogEntry {
    CatalogEntry {
        name: name.to_string(),
        desc: desc.to_string(),
        price: price.to_string(),
        emoji: emoji.to_string(),
    }
}

/// The built-in storefront catalog: five featured products plus the
/// custom-order entry.
pub fn default_catalog() -> Vec<CatalogEntry> {
    vec![
        entry(
            "💰 Steady monthly income",
            "Reliable cash flow | ⭐⭐⭐⭐⭐ (9,847 reviews)",
            "unshakable faith",
            "💰",
        ),
        entry(
            "❤️ Love of your life",
            "A soulmate match | ⭐⭐⭐⭐⭐ (7,231 reviews)",
            "self-love",
            "❤️",
        ),
        entry(
            "💪 A healthy body",
            "Energy to spare | ⭐⭐⭐⭐⭐ (12,441 reviews)",
            "self-respect",
            "💪",
        ),
        entry(
            "🏠 Dream home",
            "The perfect space | ⭐⭐⭐⭐⭐ (5,392 reviews)",
            "inner peace",
            "🏠",
        ),
        entry(
            "✈️ A life of free travel",
            "Time and money freedom | ⭐⭐⭐⭐⭐ (8,129 reviews)",
            "expanded belief",
            "✈️",
        ),
        entry(
            "🎯 Custom order",
            "Order exactly what you want",
            "custom pricing",
            "🎯",
        ),
    ]
}

// ---------------------------------------------------------------------------
// Secret resolution
// ---------------------------------------------------------------------------

/// Telegram credentials resolved from the environment.
/// **Values are redacted in `Debug` output.**
#[derive(Clone)]
pub struct ResolvedTelegram {
    pub bot_token: String,
    pub chat_id: String,
}

impl std::fmt::Debug for ResolvedTelegram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedTelegram")
            .field("bot_token", &"<REDACTED>")
            .field("chat_id", &"<REDACTED>")
            .finish()
    }
}

/// Resolve a named environment variable. `None` when unset or blank; the
/// value never appears in any error path.
fn resolve_env(var_name: &str) -> Option<String> {
    match std::env::var(var_name) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

/// Resolve the Telegram credentials once at startup. `None` unless **both**
/// variables are set and non-blank — a half-configured channel is treated
/// as unconfigured rather than an error.
pub fn resolve_telegram(names: &TelegramEnvNames) -> Option<ResolvedTelegram> {
    let bot_token = resolve_env(&names.bot_token_env)?;
    let chat_id = resolve_env(&names.chat_id_env)?;
    Some(ResolvedTelegram { bot_token, chat_id })
}
