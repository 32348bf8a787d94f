//! `UserDirectory` implementations.

use std::{collections::BTreeMap, path::PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{LinkedAccount, TelegramHandle, UserId},
    errors::Error,
    ports::UserDirectory,
    Result,
};

type AccountMap = BTreeMap<UserId, LinkedAccount>;

fn upsert_handle(accounts: &mut AccountMap, user: &UserId, handle: &TelegramHandle) {
    accounts
        .entry(user.clone())
        .or_insert_with(|| LinkedAccount::new(user.clone()))
        .telegram_handle = Some(handle.clone());
}

/// Process-local directory.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    accounts: Mutex<AccountMap>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_accounts(accounts: impl IntoIterator<Item = LinkedAccount>) -> Self {
        let accounts = accounts
            .into_iter()
            .map(|a| (a.user_id.clone(), a))
            .collect();
        Self {
            accounts: Mutex::new(accounts),
        }
    }

    pub async fn account(&self, user: &UserId) -> Option<LinkedAccount> {
        self.accounts.lock().await.get(user).cloned()
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn get(&self, user: &UserId) -> Result<Option<TelegramHandle>> {
        Ok(self
            .accounts
            .lock()
            .await
            .get(user)
            .and_then(|a| a.telegram_handle.clone()))
    }

    async fn set(&self, user: &UserId, handle: &TelegramHandle) -> Result<()> {
        upsert_handle(&mut *self.accounts.lock().await, user, handle);
        Ok(())
    }
}

/// Directory persisted as one JSON object keyed by user id.
///
/// Every `set` rewrites the whole file. The lock only serializes writers
/// inside this process.
#[derive(Debug)]
pub struct JsonFileDirectory {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<AccountMap> {
        let txt = match tokio::fs::read_to_string(&self.path).await {
            Ok(txt) => txt,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(AccountMap::new()),
            Err(e) => return Err(Error::Io(e)),
        };
        if txt.trim().is_empty() {
            return Ok(AccountMap::new());
        }
        serde_json::from_str(&txt).map_err(|e| Error::InvalidDirectory {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    async fn save(&self, accounts: &AccountMap) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let txt = serde_json::to_string_pretty(accounts)?;
        tokio::fs::write(&self.path, txt).await?;
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for JsonFileDirectory {
    async fn get(&self, user: &UserId) -> Result<Option<TelegramHandle>> {
        let _guard = self.lock.lock().await;
        let accounts = self.load().await?;
        Ok(accounts.get(user).and_then(|a| a.telegram_handle.clone()))
    }

    async fn set(&self, user: &UserId, handle: &TelegramHandle) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut accounts = self.load().await?;
        upsert_handle(&mut accounts, user, handle);
        self.save(&accounts).await
    }
}
