//! Result values returned across the public operation boundary.
//!
//! Nothing here is persisted; each value is built fresh per request and
//! errors never escape as `Err` past the service.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    domain::{BotId, ChatId, TelegramHandle, UserId},
    errors::Error,
};

/// Why an action did not succeed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// No authenticated session.
    Unauthorized,
    /// No handle stored for the user and none supplied.
    MissingHandle,
    /// The bot has no recent message from the handle, so no chat is known.
    BotNotStarted,
    /// Transport failure, non-2xx or malformed reply from the Bot API.
    GatewayError,
    /// A required credential is not configured.
    ConfigError,
    /// The user directory could not be read or written.
    StorageError,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::MissingHandle => "MissingHandle",
            ErrorKind::BotNotStarted => "BotNotStarted",
            ErrorKind::GatewayError => "GatewayError",
            ErrorKind::ConfigError => "ConfigError",
            ErrorKind::StorageError => "StorageError",
        }
    }

    /// Default user-facing message for kinds that carry no detail of their own.
    pub fn default_message(self) -> &'static str {
        match self {
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::MissingHandle => "No Telegram handle set",
            ErrorKind::BotNotStarted => {
                "Bot not started: send any message to the bot on Telegram, then try again"
            }
            ErrorKind::GatewayError => "Telegram API request failed",
            ErrorKind::ConfigError => "Telegram bot is not configured",
            ErrorKind::StorageError => "Failed to access the user directory",
        }
    }

    pub fn of(err: &Error) -> Self {
        match err {
            Error::Config(_) => ErrorKind::ConfigError,
            Error::Gateway(_) => ErrorKind::GatewayError,
            Error::Storage(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::InvalidDirectory { .. } => ErrorKind::StorageError,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of `check_setup`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram_handle: Option<TelegramHandle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<ChatId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bot_id: Option<BotId>,
}

impl SetupResult {
    pub fn linked(user_id: UserId, handle: TelegramHandle, chat_id: ChatId, bot_id: BotId) -> Self {
        Self {
            success: true,
            error_kind: None,
            error: None,
            user_id: Some(user_id),
            telegram_handle: Some(handle),
            chat_id: Some(chat_id),
            bot_id: Some(bot_id),
        }
    }

    pub fn failed(kind: ErrorKind) -> Self {
        Self::failed_with(kind, kind.default_message())
    }

    pub fn failed_with(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_kind: Some(kind),
            error: Some(message.into()),
            user_id: None,
            telegram_handle: None,
            chat_id: None,
            bot_id: None,
        }
    }

    pub fn for_user(mut self, user_id: &UserId) -> Self {
        self.user_id = Some(user_id.clone());
        self
    }

    pub fn with_bot(mut self, bot_id: Option<&BotId>) -> Self {
        self.bot_id = bot_id.cloned();
        self
    }
}

/// Outcome of `notify`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bot_id: Option<BotId>,
}

impl NotifyOutcome {
    pub fn sent(bot_id: BotId) -> Self {
        Self {
            success: true,
            error_kind: None,
            error: None,
            bot_id: Some(bot_id),
        }
    }

    pub fn failed_with(kind: ErrorKind, message: impl Into<String>, bot_id: Option<BotId>) -> Self {
        Self {
            success: false,
            error_kind: Some(kind),
            error: Some(message.into()),
            bot_id,
        }
    }
}

impl From<SetupResult> for NotifyOutcome {
    /// Forward a failed setup check unchanged.
    fn from(r: SetupResult) -> Self {
        Self {
            success: r.success,
            error_kind: r.error_kind,
            error: r.error,
            bot_id: r.bot_id,
        }
    }
}

/// Outcome of `lookup_handle`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleLookup {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram_handle: Option<TelegramHandle>,
}

impl HandleLookup {
    pub fn found(handle: TelegramHandle) -> Self {
        Self {
            success: true,
            error_kind: None,
            error: None,
            telegram_handle: Some(handle),
        }
    }

    pub fn failed_with(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_kind: Some(kind),
            error: Some(message.into()),
            telegram_handle: None,
        }
    }
}

/// Uniform shape handed back to the calling action layer:
/// `{success: true, data}` or `{success: false, error, data}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub data: Map<String, Value>,
}

impl ActionResponse {
    /// Split a serialized outcome into the envelope fields and its data.
    fn from_serialized(value: Value) -> Self {
        let mut data = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let success = data
            .remove("success")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        let error = data
            .remove("error")
            .and_then(|v| v.as_str().map(str::to_string));
        Self {
            success,
            error,
            data,
        }
    }

    fn from_outcome<T: Serialize>(outcome: &T, success: bool, error: Option<String>) -> Self {
        match serde_json::to_value(outcome) {
            Ok(v) => Self::from_serialized(v),
            // Plain structs of strings and bools; kept total anyway.
            Err(e) => Self {
                success,
                error: error.or_else(|| Some(format!("failed to encode result: {e}"))),
                data: Map::new(),
            },
        }
    }
}

impl From<SetupResult> for ActionResponse {
    fn from(r: SetupResult) -> Self {
        Self::from_outcome(&r, r.success, r.error.clone())
    }
}

impl From<NotifyOutcome> for ActionResponse {
    fn from(r: NotifyOutcome) -> Self {
        Self::from_outcome(&r, r.success, r.error.clone())
    }
}

impl From<HandleLookup> for ActionResponse {
    fn from(r: HandleLookup) -> Self {
        Self::from_outcome(&r, r.success, r.error.clone())
    }
}
