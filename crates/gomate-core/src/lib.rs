// SPDX-License-Identifier: AGPL-3.0
// GoMate Core - Shared logic for all frontends
//
// This crate provides:
// - TransportItem, User and AppError types
// - Storage, the key-value persistence adapter
// - The local catalog and its remote reconciliation
// - SessionStore for token, user, theme, favourites and local accounts
// - AuthService for demo, local and remote login
// - AppState, the state object handed to every view
//
// Frontend-specific code lives in separate crates.

pub mod auth;
pub mod catalog;
pub mod config;
pub mod reconcile;
pub mod remote;
pub mod session;
pub mod state;
pub mod storage;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use auth::{AuthService, LoginCredentials, RegisterData};
pub use catalog::CatalogFilter;
pub use config::ClientConfig;
pub use reconcile::TransportService;
pub use remote::{CatalogClient, RemoteRecord};
pub use session::SessionStore;
pub use state::{AppState, AuthSlice, CatalogSlice};
pub use storage::{FileBackend, KeyValueBackend, MemoryBackend, Storage};
pub use types::{
    AppError, FieldError, RegisteredUser, TransportCategory, TransportItem, TransportStatus, User,
};
pub use validation::{PasswordChangeForm, ProfileForm, RegisterForm};
