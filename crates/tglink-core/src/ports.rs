use async_trait::async_trait;

use crate::{
    domain::{BotId, ChatId, TelegramHandle, UserId},
    Result,
};

/// Session lookup for the caller of an action.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// The authenticated user, or `None` when there is no session.
    async fn current_user(&self) -> Option<UserId>;
}

/// Persistence port mapping app users to their Telegram handle.
///
/// Implementations own their concurrency; concurrent `set`s for the same user
/// are last-write-wins.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get(&self, user: &UserId) -> Result<Option<TelegramHandle>>;
    async fn set(&self, user: &UserId, handle: &TelegramHandle) -> Result<()>;
}

/// Hexagonal port over the Telegram Bot API.
#[async_trait]
pub trait TelegramGateway: Send + Sync {
    /// Ask Telegram for the bot's own username.
    async fn get_bot_identity(&self) -> Result<BotId>;

    /// Scan the bot's recent updates for a message sent by `handle`.
    ///
    /// `Ok(None)` means the user has not messaged the bot within the window
    /// Telegram returns; it is not an error.
    async fn find_chat_id_for_handle(&self, handle: &TelegramHandle) -> Result<Option<ChatId>>;

    async fn send_message(&self, chat_id: &ChatId, text: &str) -> Result<()>;
}

/// Auth provider with a fixed answer.
#[derive(Clone, Debug, Default)]
pub struct StaticAuth {
    user: Option<UserId>,
}

impl StaticAuth {
    pub fn signed_in(user: impl Into<String>) -> Self {
        Self {
            user: Some(UserId(user.into())),
        }
    }

    pub fn anonymous() -> Self {
        Self { user: None }
    }
}

#[async_trait]
impl AuthProvider for StaticAuth {
    async fn current_user(&self) -> Option<UserId> {
        self.user.clone()
    }
}
