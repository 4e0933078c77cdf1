//! Command handlers for the `uvs` binary.

pub mod catalog;
pub mod order;

use std::path::Path;

use anyhow::Result;
use tracing::info;

use uvs_config::Settings;
use uvs_notify::{NotificationDispatcher, TelegramCredentials};
use uvs_service::OrderService;
use uvs_store::OrderStore;

/// Everything a command handler needs, built once per invocation.
pub struct Context {
    pub settings: Settings,
    pub service: OrderService,
}

impl Context {
    pub fn build(config_path: Option<&Path>) -> Result<Self> {
        let settings = Settings::load(config_path)?;

        // Secrets resolved once here; constructors receive values, the rest
        // of the codebase never touches the environment.
        let credentials =
            uvs_config::resolve_telegram(&settings.telegram).map(|resolved| TelegramCredentials {
                bot_token: resolved.bot_token,
                chat_id: resolved.chat_id,
            });
        if credentials.is_none() {
            info!("telegram channel unconfigured; notifications will be skipped");
        }

        let store = OrderStore::new(&settings.store_path);
        let dispatcher = NotificationDispatcher::new(credentials);

        Ok(Self {
            settings,
            service: OrderService::new(store, dispatcher),
        })
    }
}
