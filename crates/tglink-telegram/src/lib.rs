//! Telegram adapter (Bot HTTP API over reqwest).
//!
//! This crate implements the `tglink-core` TelegramGateway port. Every call is
//! a single request: no retries, no rate-limit handling.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

pub mod types;

use tglink_core::{
    config::DEFAULT_TELEGRAM_API_URL,
    domain::{BotId, ChatId, TelegramHandle},
    errors::Error,
    ports::TelegramGateway,
    Result,
};

use types::{find_chat_for, ApiResponse, BotUser, SendMessageBody, Update};

#[derive(Clone, Debug)]
pub struct HttpTelegramGateway {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl HttpTelegramGateway {
    pub fn new(token: Option<String>) -> Result<Self> {
        Self::with_base_url(DEFAULT_TELEGRAM_API_URL, token)
    }

    /// Point the gateway at another Bot API host (local Bot API server, tests).
    pub fn with_base_url(base_url: impl Into<String>, token: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Config(format!("failed to build http client: {e}")))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
            http,
        })
    }

    fn method_url(&self, method: &str) -> Result<String> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| Error::Config("TELEGRAM_BOT_TOKEN is not set".to_string()))?;
        Ok(format!("{}/bot{token}/{method}", self.base_url))
    }

    /// Send a prepared request and unwrap the `{ok, result}` envelope.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        req: reqwest::RequestBuilder,
    ) -> Result<T> {
        tracing::debug!(method, "telegram api call");

        // The URL embeds the bot token, so it is stripped from transport errors.
        let resp = req
            .send()
            .await
            .map_err(|e| Error::Gateway(format!("{method} request error: {}", e.without_url())))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Gateway(format!(
                "{method} failed: {status} {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let envelope: ApiResponse<T> = resp.json().await.map_err(|e| {
            Error::Gateway(format!("{method} returned an unexpected body: {}", e.without_url()))
        })?;

        if !envelope.ok {
            return Err(Error::Gateway(format!(
                "{method} rejected: {}",
                envelope.description.unwrap_or_else(|| "no description".to_string())
            )));
        }

        envelope
            .result
            .ok_or_else(|| Error::Gateway(format!("{method} returned no result")))
    }
}

#[async_trait]
impl TelegramGateway for HttpTelegramGateway {
    async fn get_bot_identity(&self) -> Result<BotId> {
        let url = self.method_url("getMe")?;
        let me: BotUser = self.call("getMe", self.http.get(url)).await?;
        Ok(BotId(me.username))
    }

    async fn find_chat_id_for_handle(&self, handle: &TelegramHandle) -> Result<Option<ChatId>> {
        let url = self.method_url("getUpdates")?;
        let updates: Vec<Update> = self.call("getUpdates", self.http.get(url)).await?;
        tracing::debug!(count = updates.len(), "scanning recent updates");
        Ok(find_chat_for(updates, handle))
    }

    async fn send_message(&self, chat_id: &ChatId, text: &str) -> Result<()> {
        let url = self.method_url("sendMessage")?;
        let body = SendMessageBody {
            chat_id: &chat_id.0,
            text,
        };
        // The sent Message is only checked for shape.
        let _: serde_json::Value = self
            .call("sendMessage", self.http.post(url).json(&body))
            .await?;
        Ok(())
    }
}
