//! Link an app user to the Telegram chat they opened with the bot, and send
//! them messages there.
//!
//! Every public method is a short sequential chain of awaited port calls.
//! Failures end the request and come back as a value, never as `Err`.

use std::sync::Arc;

use crate::{
    config::LinkConfig,
    domain::{BotId, NotifyRequest, TelegramHandle, UserId},
    errors::Error,
    outcome::{ErrorKind, HandleLookup, NotifyOutcome, SetupResult},
    ports::{AuthProvider, TelegramGateway, UserDirectory},
    Result,
};

#[derive(Clone)]
pub struct TelegramLinkService {
    cfg: LinkConfig,
    auth: Arc<dyn AuthProvider>,
    directory: Arc<dyn UserDirectory>,
    gateway: Arc<dyn TelegramGateway>,
}

impl TelegramLinkService {
    pub fn new(
        cfg: LinkConfig,
        auth: Arc<dyn AuthProvider>,
        directory: Arc<dyn UserDirectory>,
        gateway: Arc<dyn TelegramGateway>,
    ) -> Self {
        Self {
            cfg,
            auth,
            directory,
            gateway,
        }
    }

    /// Configured bot username, or ask Telegram (`getMe`) when none is set.
    pub async fn resolve_bot_identity(&self) -> Result<BotId> {
        if let Some(name) = self.cfg.bot_username.as_deref() {
            let name = name.trim_start_matches('@');
            if !name.is_empty() {
                return Ok(BotId(name.to_string()));
            }
        }
        if !self.cfg.has_credential() {
            return Err(Error::Config(
                "TELEGRAM_BOT_TOKEN is not set and no bot username is configured".to_string(),
            ));
        }
        self.gateway.get_bot_identity().await
    }

    /// Verify the current user can be reached on Telegram.
    ///
    /// `handle_override` replaces the stored handle when present. On success
    /// the normalized handle is persisted if it differs from the stored one.
    pub async fn check_setup(&self, handle_override: Option<&str>) -> SetupResult {
        let Some(user) = self.auth.current_user().await else {
            tracing::warn!("check_setup: no authenticated user");
            return SetupResult::failed(ErrorKind::Unauthorized);
        };

        let result = self.check_setup_for(&user, handle_override).await;
        if result.success {
            tracing::info!(
                user = %user.0,
                handle = ?result.telegram_handle.as_ref().map(|h| h.as_str()),
                "telegram link verified"
            );
        } else if let Some(kind) = result.error_kind {
            tracing::warn!(
                user = %user.0,
                kind = %kind,
                error = ?result.error,
                "telegram link check failed"
            );
        }
        result
    }

    async fn check_setup_for(&self, user: &UserId, handle_override: Option<&str>) -> SetupResult {
        let bot_id = match self.resolve_bot_identity().await {
            Ok(id) => id,
            Err(e) => return failure(&e).for_user(user),
        };
        let fail = |kind: ErrorKind| SetupResult::failed(kind).for_user(user).with_bot(Some(&bot_id));
        let fail_err = |e: &Error| failure(e).for_user(user).with_bot(Some(&bot_id));

        let stored = match self.directory.get(user).await {
            Ok(h) => h,
            Err(e) => return fail_err(&storage(e)),
        };

        // An override that is present wins, even when empty.
        let effective = match handle_override {
            Some(raw) => Some(raw.to_string()),
            None => stored.as_ref().map(|h| h.as_str().to_string()),
        };
        let Some(handle) = effective.as_deref().and_then(TelegramHandle::normalize) else {
            return fail(ErrorKind::MissingHandle);
        };

        let chat_id = match self.gateway.find_chat_id_for_handle(&handle).await {
            Ok(Some(id)) => id,
            Ok(None) => return fail(ErrorKind::BotNotStarted),
            Err(e) => return fail_err(&e),
        };

        if stored.as_ref() != Some(&handle) {
            if let Err(e) = self.directory.set(user, &handle).await {
                return fail_err(&storage(e));
            }
            tracing::debug!(user = %user.0, handle = %handle, "stored telegram handle");
        }

        SetupResult::linked(user.clone(), handle, chat_id, bot_id)
    }

    /// Send `message_text` to the current user's Telegram chat.
    pub async fn notify(&self, handle_override: Option<&str>, message_text: &str) -> NotifyOutcome {
        if !self.cfg.has_credential() {
            tracing::warn!("notify: TELEGRAM_BOT_TOKEN is not configured");
            return NotifyOutcome::failed_with(
                ErrorKind::ConfigError,
                ErrorKind::ConfigError.default_message(),
                None,
            );
        }

        let setup = self.check_setup(handle_override).await;
        if !setup.success {
            return setup.into();
        }
        let (Some(chat_id), Some(bot_id)) = (setup.chat_id, setup.bot_id) else {
            // `SetupResult::linked` always fills both.
            return NotifyOutcome::failed_with(
                ErrorKind::GatewayError,
                "setup check returned no chat",
                None,
            );
        };

        match self.gateway.send_message(&chat_id, message_text).await {
            Ok(()) => {
                tracing::info!(chat = %chat_id, "telegram notification sent");
                NotifyOutcome::sent(bot_id)
            }
            Err(e) => {
                tracing::warn!(chat = %chat_id, error = %e, "telegram notification failed");
                NotifyOutcome::failed_with(ErrorKind::GatewayError, e.to_string(), Some(bot_id))
            }
        }
    }

    pub async fn notify_request(&self, req: &NotifyRequest) -> NotifyOutcome {
        self.notify(req.telegram_handle.as_deref(), &req.message_text)
            .await
    }

    /// The handle stored for the current user, if any.
    pub async fn lookup_handle(&self) -> HandleLookup {
        let Some(user) = self.auth.current_user().await else {
            return HandleLookup::failed_with(
                ErrorKind::Unauthorized,
                ErrorKind::Unauthorized.default_message(),
            );
        };

        match self.directory.get(&user).await {
            Ok(Some(handle)) => HandleLookup::found(handle),
            Ok(None) => HandleLookup::failed_with(
                ErrorKind::MissingHandle,
                ErrorKind::MissingHandle.default_message(),
            ),
            Err(e) => {
                let e = storage(e);
                HandleLookup::failed_with(ErrorKind::of(&e), e.to_string())
            }
        }
    }
}

fn failure(e: &Error) -> SetupResult {
    SetupResult::failed_with(ErrorKind::of(e), e.to_string())
}

/// Directory failures always surface as storage errors, whatever their source.
fn storage(e: Error) -> Error {
    match e {
        Error::Storage(_) => e,
        other => Error::Storage(other.to_string()),
    }
}
