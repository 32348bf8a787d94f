use std::{process::ExitCode, sync::Arc};

use anyhow::Context;
use async_trait::async_trait;
use clap::{Parser, Subcommand};

use tglink_core::{
    config::Config,
    directory::JsonFileDirectory,
    domain::UserId,
    outcome::ActionResponse,
    ports::AuthProvider,
    TelegramLinkService,
};
use tglink_telegram::HttpTelegramGateway;

/// Link the signed-in user to their Telegram chat and send them messages.
#[derive(Debug, Parser)]
#[command(name = "tglink", version)]
struct Cli {
    /// Session user; unset means "not signed in".
    #[arg(long, env = "TGLINK_USER_ID", global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Verify the bot can reach the user and store their handle.
    Check {
        /// Use this handle instead of the stored one.
        #[arg(long)]
        handle: Option<String>,
    },
    /// Send a message to the user's Telegram chat.
    Notify {
        #[arg(long)]
        handle: Option<String>,
        text: String,
    },
    /// Print the stored handle.
    Lookup,
}

/// Session from the command line or `TGLINK_USER_ID`.
struct EnvAuth {
    user: Option<UserId>,
}

impl EnvAuth {
    fn new(raw: Option<String>) -> Self {
        let user = raw
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .map(UserId);
        Self { user }
    }
}

#[async_trait]
impl AuthProvider for EnvAuth {
    async fn current_user(&self) -> Option<UserId> {
        self.user.clone()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tglink_core::logging::init("tglink")?;

    let cfg = Config::load().context("failed to load configuration")?;
    let cli = Cli::parse();
    tracing::debug!(
        directory = %cfg.directory_path.display(),
        api = %cfg.telegram_api_url,
        "tglink configured"
    );

    let gateway = HttpTelegramGateway::with_base_url(
        cfg.telegram_api_url.clone(),
        cfg.telegram_bot_token.clone(),
    )?;
    let service = TelegramLinkService::new(
        cfg.link_config(),
        Arc::new(EnvAuth::new(cli.user)),
        Arc::new(JsonFileDirectory::new(cfg.directory_path.clone())),
        Arc::new(gateway),
    );

    let response: ActionResponse = match cli.command {
        Command::Check { handle } => service.check_setup(handle.as_deref()).await.into(),
        Command::Notify { handle, text } => service.notify(handle.as_deref(), &text).await.into(),
        Command::Lookup => service.lookup_handle().await.into(),
    };

    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(if response.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
