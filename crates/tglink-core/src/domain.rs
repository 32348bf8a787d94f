use std::fmt;

use serde::{Deserialize, Serialize};

/// Internal application user id (opaque string).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

/// Telegram username as stored: never carries a "@".
///
/// Deserialization goes through [`TelegramHandle::normalize`], so a stored
/// `"@Bob"` reads back as `"Bob"` and an empty or all-"@" value is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TelegramHandle(String);

impl TelegramHandle {
    /// Strip every "@" from a user supplied handle.
    ///
    /// Returns `None` when nothing is left (e.g. `""` or `"@"`).
    pub fn normalize(raw: &str) -> Option<Self> {
        let cleaned: String = raw.chars().filter(|c| *c != '@').collect();
        if cleaned.is_empty() {
            None
        } else {
            Some(Self(cleaned))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TelegramHandle {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::normalize(&raw).ok_or_else(|| format!("invalid telegram handle: {raw:?}"))
    }
}

impl From<TelegramHandle> for String {
    fn from(h: TelegramHandle) -> Self {
        h.0
    }
}

impl fmt::Display for TelegramHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Telegram chat id, kept in its decimal string form.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub String);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The bot's own username.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BotId(pub String);

impl fmt::Display for BotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A user record as held by a [`UserDirectory`](crate::ports::UserDirectory).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedAccount {
    pub user_id: UserId,
    #[serde(default)]
    pub telegram_handle: Option<TelegramHandle>,
    #[serde(default)]
    pub chat_id: Option<ChatId>,
}

impl LinkedAccount {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            telegram_handle: None,
            chat_id: None,
        }
    }
}

/// Input of a notification action.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyRequest {
    #[serde(default)]
    pub telegram_handle: Option<String>,
    pub message_text: String,
}
