//! Telegram digest delivery.
//!
//! Posts the daily digest to a chat via the Bot API. Credentials are
//! referenced by env-var name in `config.toml` and resolved at startup.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::info;

use super::Notifier;
use crate::config::{AlertsConfig, AppConfig};

const API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

pub struct TelegramNotifier {
    client: Client,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    /// Build from the alerts config, resolving env-var-referenced
    /// credentials. Returns `Ok(None)` when Telegram alerts are disabled.
    pub fn from_config(alerts: &AlertsConfig) -> Result<Option<Self>> {
        if !alerts.telegram_enabled {
            return Ok(None);
        }
        let token_env = alerts
            .telegram_bot_token_env
            .as_deref()
            .context("telegram_enabled but telegram_bot_token_env not set")?;
        let chat_env = alerts
            .telegram_chat_id_env
            .as_deref()
            .context("telegram_enabled but telegram_chat_id_env not set")?;

        Ok(Some(Self {
            client: Client::new(),
            bot_token: AppConfig::resolve_env(token_env)?,
            chat_id: AppConfig::resolve_env(chat_env)?,
        }))
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, body: &str) -> Result<()> {
        let url = format!("{API_BASE}/bot{}/sendMessage", self.bot_token);
        let payload = SendMessage {
            chat_id: &self.chat_id,
            text: body,
        };

        self.client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .context("Telegram sendMessage request failed")?
            .error_for_status()
            .context("Telegram sendMessage returned an error status")?;

        info!(chars = body.len(), "Telegram digest sent");
        Ok(())
    }

    fn name(&self) -> &str {
        "telegram"
    }
}
