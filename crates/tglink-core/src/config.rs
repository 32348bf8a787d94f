use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::Result;

pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
const DEFAULT_DIRECTORY_PATH: &str = "tglink-accounts.json";

/// Settings the link service needs, passed in at construction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkConfig {
    /// Bot API token. Required to send messages or to ask Telegram who the bot is.
    pub bot_token: Option<String>,
    /// Pre-known bot username; skips the `getMe` round trip when set.
    pub bot_username: Option<String>,
}

impl LinkConfig {
    pub fn has_credential(&self) -> bool {
        self.bot_token
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty())
    }
}

/// Typed process configuration, read once from the environment.
#[derive(Clone, Debug)]
pub struct Config {
    pub telegram_bot_token: Option<String>,
    pub telegram_bot_username: Option<String>,
    pub telegram_api_url: String,
    pub directory_path: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Ok(Self::from_lookup(|key| env::var(key).ok()))
    }

    /// Build the config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).and_then(non_empty);

        let telegram_api_url = get("TELEGRAM_API_URL")
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string());

        let directory_path = get("TGLINK_DIRECTORY_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DIRECTORY_PATH));

        Self {
            telegram_bot_token: get("TELEGRAM_BOT_TOKEN"),
            telegram_bot_username: get("TELEGRAM_BOT_USERNAME")
                .map(|u| u.trim_start_matches('@').to_string()),
            telegram_api_url,
            directory_path,
        }
    }

    pub fn link_config(&self) -> LinkConfig {
        LinkConfig {
            bot_token: self.telegram_bot_token.clone(),
            bot_username: self.telegram_bot_username.clone(),
        }
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        out.push((key.to_string(), val));
    }
    out
}

fn non_empty(s: String) -> Option<String> {
    let t = s.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}
