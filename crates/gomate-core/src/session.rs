// SPDX-License-Identifier: AGPL-3.0
// GoMate Core - Session and preference persistence
//
// Each value lives under its own fixed key. Structured values are stored
// as JSON text. Reads never fail: absent or corrupt values come back as
// their defaults.

use crate::storage::Storage;
use crate::types::{RegisteredUser, User};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::Mutex;

pub const AUTH_TOKEN_KEY: &str = "@gomate_auth_token";
pub const USER_DATA_KEY: &str = "@gomate_user_data";
pub const FAVOURITES_KEY: &str = "@gomate_favourites";
pub const THEME_KEY: &str = "@gomate_theme";
pub const REGISTERED_USERS_KEY: &str = "@gomate_registered_users";

/// Username -> registered account
pub type RegisteredUserTable = HashMap<String, RegisteredUser>;

/// Persistent auth token, user, theme, favourites and local accounts
pub struct SessionStore {
    storage: Storage,
    /// Serializes read-modify-write of the favourites list
    favourites_lock: Mutex<()>,
    /// Serializes read-modify-write of the registered users table
    registry_lock: Mutex<()>,
}

impl SessionStore {
    pub fn new(storage: Storage) -> Self {
        Self {
            storage,
            favourites_lock: Mutex::new(()),
            registry_lock: Mutex::new(()),
        }
    }

    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.storage.get(key).await?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring corrupt value under {}: {}", key, e);
                None
            }
        }
    }

    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        match serde_json::to_string(value) {
            Ok(raw) => self.storage.set(key, raw).await,
            Err(e) => {
                tracing::error!("Error serializing {}: {}", key, e);
                false
            }
        }
    }

    // Auth token

    pub async fn save_token(&self, token: &str) -> bool {
        self.storage.set(AUTH_TOKEN_KEY, token).await
    }

    pub async fn get_token(&self) -> Option<String> {
        self.storage.get(AUTH_TOKEN_KEY).await
    }

    pub async fn clear_token(&self) {
        self.storage.remove(AUTH_TOKEN_KEY).await;
    }

    // User

    pub async fn save_user(&self, user: &User) -> bool {
        self.write_json(USER_DATA_KEY, user).await
    }

    pub async fn get_user(&self) -> Option<User> {
        self.read_json(USER_DATA_KEY).await
    }

    pub async fn clear_user(&self) {
        self.storage.remove(USER_DATA_KEY).await;
    }

    // Favourites

    pub async fn save_favourites(&self, ids: &[u64]) -> bool {
        self.write_json(FAVOURITES_KEY, ids).await
    }

    /// Stored favourite ids in stored order; empty if absent or corrupt
    pub async fn get_favourites(&self) -> Vec<u64> {
        self.read_json(FAVOURITES_KEY).await.unwrap_or_default()
    }

    /// Add `id` if absent, remove it if present, and persist the result.
    /// Returns the new list.
    pub async fn toggle_favourite(&self, id: u64) -> Vec<u64> {
        let _guard = self.favourites_lock.lock().await;

        let mut ids = self.get_favourites().await;
        if let Some(pos) = ids.iter().position(|existing| *existing == id) {
            ids.remove(pos);
        } else {
            ids.push(id);
        }

        self.save_favourites(&ids).await;
        ids
    }

    // Theme

    pub async fn save_theme(&self, is_dark: bool) -> bool {
        self.write_json(THEME_KEY, &is_dark).await
    }

    /// Dark mode flag; false if absent or corrupt
    pub async fn get_theme(&self) -> bool {
        self.read_json(THEME_KEY).await.unwrap_or(false)
    }

    /// Remove token, user and favourites. The theme survives logout.
    pub async fn clear_session(&self) {
        self.storage
            .remove_many(&[AUTH_TOKEN_KEY, USER_DATA_KEY, FAVOURITES_KEY])
            .await;
    }

    // Registered users

    /// Insert or overwrite the account for `username`. The whole table is
    /// written back in a single storage call. Nothing is written if the
    /// existing table cannot be read, so stored accounts are never dropped.
    pub async fn register_local_user(&self, username: &str, password: &str, user: &User) -> bool {
        let _guard = self.registry_lock.lock().await;

        let mut table = match self.storage.try_get(REGISTERED_USERS_KEY).await {
            Ok(None) => RegisteredUserTable::new(),
            Ok(Some(raw)) => match serde_json::from_str::<RegisteredUserTable>(&raw) {
                Ok(table) => table,
                Err(e) => {
                    tracing::error!("Registered users table is corrupt, not saving: {}", e);
                    return false;
                }
            },
            Err(e) => {
                tracing::error!("Error reading registered users, not saving: {}", e);
                return false;
            }
        };
        table.insert(
            username.to_string(),
            RegisteredUser {
                password: password.to_string(),
                user_data: user.clone(),
            },
        );

        self.write_json(REGISTERED_USERS_KEY, &table).await
    }

    /// The stored user for `username`, only on an exact password match
    pub async fn authenticate_local_user(&self, username: &str, password: &str) -> Option<User> {
        let mut table: RegisteredUserTable = self.read_json(REGISTERED_USERS_KEY).await?;
        match table.remove(username) {
            Some(entry) if entry.password == password => Some(entry.user_data),
            _ => None,
        }
    }
}
