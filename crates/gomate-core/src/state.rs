// SPDX-License-Identifier: AGPL-3.0
// GoMate Core - Application state
//
// One explicit state object owned by the frontend and handed to each view.
// It is split into auth, theme, favourites and catalog slices; every
// mutation that must survive a restart is written through `SessionStore`.

use crate::auth::{self, AuthService, LoginCredentials, RegisterData};
use crate::catalog::CatalogFilter;
use crate::config::ClientConfig;
use crate::reconcile::TransportService;
use crate::session::SessionStore;
use crate::storage::Storage;
use crate::types::{AppError, TransportItem, User};
use crate::validation::{self, PasswordChangeForm, ProfileForm, RegisterForm};
use std::collections::HashSet;
use std::sync::Arc;

/// Who is logged in
#[derive(Debug, Clone, Default)]
pub struct AuthSlice {
    pub user: Option<User>,
    /// Message of the last failed login or registration
    pub error: Option<String>,
}

impl AuthSlice {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Items currently on screen
#[derive(Debug, Clone, Default)]
pub struct CatalogSlice {
    pub items: Vec<TransportItem>,
    pub is_loading: bool,
}

impl CatalogSlice {
    pub fn filtered(&self, filter: CatalogFilter) -> Vec<&TransportItem> {
        self.items.iter().filter(|item| filter.accepts(item)).collect()
    }

    pub fn find(&self, id: u64) -> Option<&TransportItem> {
        self.items.iter().find(|item| item.id == id)
    }
}

pub struct AppState {
    session: Arc<SessionStore>,
    auth_service: AuthService,
    transport: TransportService,
    auth: AuthSlice,
    dark_mode: bool,
    favourites: Vec<u64>,
    catalog: CatalogSlice,
}

impl AppState {
    /// Build state over the configured storage file. Only an invalid
    /// configuration is an error; an unreadable file starts empty.
    pub async fn open(config: &ClientConfig) -> Result<Self, AppError> {
        config.validate()?;
        let storage = Storage::open_file(&config.storage_path).await;
        Ok(Self::with_storage(config, storage))
    }

    /// Build state over any storage
    pub fn with_storage(config: &ClientConfig, storage: Storage) -> Self {
        let session = Arc::new(SessionStore::new(storage));
        let transport = TransportService::new(config);
        let auth_service = AuthService::new(transport.client().clone(), session.clone());

        Self {
            session,
            auth_service,
            transport,
            auth: AuthSlice::default(),
            dark_mode: false,
            favourites: Vec::new(),
            catalog: CatalogSlice::default(),
        }
    }

    /// Load the persisted session, theme and favourites. Call once at
    /// startup, before anything is shown.
    pub async fn restore(&mut self) {
        self.dark_mode = self.session.get_theme().await;
        self.favourites = self.session.get_favourites().await;
        self.auth.user = self.session.get_user().await;

        if let Some(user) = &self.auth.user {
            tracing::info!("Restored session for {}", user.username);
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    // Auth slice

    pub fn auth(&self) -> &AuthSlice {
        &self.auth
    }

    pub fn current_user(&self) -> Option<&User> {
        self.auth.user.as_ref()
    }

    /// Re-fetch the profile behind a remote session token and persist it.
    /// Demo and local sessions, and any fetch failure, keep the cached user.
    pub async fn refresh_user(&mut self) -> Option<&User> {
        if self.auth.user.is_some() {
            let token = self
                .session
                .get_token()
                .await
                .filter(|token| auth::is_remote_token(token));
            if let Some(token) = token {
                match self.auth_service.current_user(&token).await {
                    Ok(user) => {
                        self.session.save_user(&user).await;
                        self.auth.user = Some(user);
                    }
                    Err(e) => tracing::warn!("Keeping cached profile: {}", e),
                }
            }
        }
        self.auth.user.as_ref()
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<User, AppError> {
        self.auth.error = None;
        validation::validate_login(username, password)?;

        let credentials = LoginCredentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        match self.auth_service.login(&credentials).await {
            Ok(user) => {
                self.start_session(user.clone()).await;
                Ok(user)
            }
            Err(e) => {
                self.auth.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn register(&mut self, form: &RegisterForm) -> Result<User, AppError> {
        self.auth.error = None;
        validation::validate_registration(form)?;

        let data = RegisterData {
            username: form.username.clone(),
            email: form.email.clone(),
            password: form.password.clone(),
            first_name: form.first_name.clone(),
            last_name: form.last_name.clone(),
        };
        match self.auth_service.register(&data).await {
            Ok(user) => {
                self.start_session(user.clone()).await;
                Ok(user)
            }
            Err(e) => {
                self.auth.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    async fn start_session(&mut self, user: User) {
        self.session
            .save_token(user.token.as_deref().unwrap_or_default())
            .await;
        self.session.save_user(&user).await;
        self.auth.user = Some(user);
    }

    /// Forget the user and their favourites. Dark mode is kept.
    pub async fn logout(&mut self) {
        self.session.clear_session().await;
        self.auth = AuthSlice::default();
        self.favourites.clear();
    }

    /// Apply an edited profile to the logged-in user and persist it
    pub async fn update_profile(&mut self, form: &ProfileForm) -> Result<User, AppError> {
        let current = self.auth.user.as_ref().ok_or(AppError::NotAuthenticated)?;
        validation::validate_profile(form)?;

        let updated = User {
            first_name: form.first_name.clone(),
            last_name: form.last_name.clone(),
            email: form.email.clone(),
            ..current.clone()
        };

        if !self.session.save_user(&updated).await {
            return Err(AppError::Storage("Failed to update profile".to_string()));
        }
        self.auth.user = Some(updated.clone());
        Ok(updated)
    }

    /// Change the password of an account registered on this device
    pub async fn change_password(&mut self, form: &PasswordChangeForm) -> Result<(), AppError> {
        let current = self.auth.user.clone().ok_or(AppError::NotAuthenticated)?;
        validation::validate_password_change(form)?;

        let stored = self
            .session
            .authenticate_local_user(&current.username, &form.current_password)
            .await;
        if stored.is_none() {
            return Err(AppError::Unsupported(
                "Only accounts registered on this device can change their password".to_string(),
            ));
        }

        if !self
            .session
            .register_local_user(&current.username, &form.new_password, &current)
            .await
        {
            return Err(AppError::Storage("Failed to change password".to_string()));
        }
        Ok(())
    }

    // Theme slice

    pub fn is_dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub async fn set_dark_mode(&mut self, is_dark: bool) {
        self.dark_mode = is_dark;
        self.session.save_theme(is_dark).await;
    }

    /// Flip dark mode and return the new value
    pub async fn toggle_theme(&mut self) -> bool {
        self.set_dark_mode(!self.dark_mode).await;
        self.dark_mode
    }

    // Favourites slice

    pub fn favourite_ids(&self) -> &[u64] {
        &self.favourites
    }

    pub fn is_favourite(&self, id: u64) -> bool {
        self.favourites.contains(&id)
    }

    /// Toggle `id` in the persisted favourites. Returns true if it was added.
    pub async fn toggle_favourite(&mut self, id: u64) -> bool {
        self.favourites = self.session.toggle_favourite(id).await;
        self.is_favourite(id)
    }

    pub async fn clear_favourites(&mut self) {
        self.favourites.clear();
        self.session.save_favourites(&[]).await;
    }

    /// Loaded items that are favourites, in list order. Stale ids that match
    /// no loaded item are skipped.
    pub fn favourite_items(&self) -> Vec<&TransportItem> {
        let ids: HashSet<u64> = self.favourites.iter().copied().collect();
        self.catalog
            .items
            .iter()
            .filter(|item| ids.contains(&item.id))
            .collect()
    }

    // Catalog slice

    pub fn catalog(&self) -> &CatalogSlice {
        &self.catalog
    }

    /// Reload the listing
    pub async fn refresh(&mut self) -> &[TransportItem] {
        self.catalog.is_loading = true;
        self.catalog.items = self.transport.fetch_transport_items().await;
        self.catalog.is_loading = false;
        &self.catalog.items
    }

    /// Replace the list with search results; a blank query reloads the listing
    pub async fn search(&mut self, query: &str) -> &[TransportItem] {
        let query = query.trim();
        if query.is_empty() {
            return self.refresh().await;
        }

        self.catalog.is_loading = true;
        self.catalog.items = self.transport.search_transport(query).await;
        self.catalog.is_loading = false;
        &self.catalog.items
    }

    /// A single item by id, from the loaded list or else from the service
    pub async fn item(&self, id: u64) -> Option<TransportItem> {
        if let Some(item) = self.catalog.find(id) {
            return Some(item.clone());
        }
        self.transport.fetch_transport_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    fn offline_config() -> ClientConfig {
        ClientConfig::default().with_base_url("http://127.0.0.1:9")
    }

    fn offline_state(storage: Storage) -> AppState {
        AppState::with_storage(&offline_config(), storage)
    }

    #[tokio::test]
    async fn test_demo_login_persists_session() {
        let storage = Storage::in_memory();
        let mut state = offline_state(storage.clone());

        let user = state.login("demo", "demo123").await.unwrap();
        assert_eq!(user.id, 1001);
        assert!(state.auth().is_authenticated());

        let mut restarted = offline_state(storage);
        assert!(!restarted.auth().is_authenticated());
        restarted.restore().await;
        assert_eq!(restarted.current_user(), Some(&user));
        assert_eq!(
            restarted.session().get_token().await.as_deref(),
            Some("demo-token-1001")
        );
    }

    #[tokio::test]
    async fn test_failed_login_records_error() {
        let mut state = offline_state(Storage::in_memory());
        let err = state.login("nobody", "secret1").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
        assert_eq!(
            state.auth().error.as_deref(),
            Some("Invalid username or password")
        );
        assert!(!state.auth().is_authenticated());

        let err = state.login("x", "").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_logout_keeps_theme() {
        let storage = Storage::in_memory();
        let mut state = offline_state(storage.clone());
        state.login("john", "john123").await.unwrap();
        state.set_dark_mode(true).await;
        state.toggle_favourite(3).await;

        state.logout().await;
        assert!(state.is_dark_mode());
        assert!(state.favourite_ids().is_empty());
        assert!(state.current_user().is_none());

        let mut restarted = offline_state(storage);
        restarted.restore().await;
        assert!(restarted.is_dark_mode());
        assert!(restarted.current_user().is_none());
        assert!(restarted.favourite_ids().is_empty());
        assert!(restarted.session().get_token().await.is_none());
    }

    #[tokio::test]
    async fn test_offline_refresh_shows_local_catalog() {
        let mut state = offline_state(Storage::in_memory());
        let items = state.refresh().await.to_vec();
        assert_eq!(items, catalog::all());
        assert!(!state.catalog().is_loading);
        assert_eq!(state.catalog().filtered(CatalogFilter::Routes).len(), 10);
    }

    #[tokio::test]
    async fn test_blank_search_refreshes() {
        let mut state = offline_state(Storage::in_memory());
        assert_eq!(state.search("sigiriya").await.len(), 2);
        assert_eq!(state.search("   ").await.len(), catalog::len());
    }

    #[tokio::test]
    async fn test_favourites_follow_loaded_items() {
        let mut state = offline_state(Storage::in_memory());
        state.refresh().await;

        assert!(state.toggle_favourite(11).await);
        assert!(state.toggle_favourite(2).await);
        assert!(state.toggle_favourite(999).await);
        assert!(!state.toggle_favourite(2).await);
        assert_eq!(state.favourite_ids(), &[11, 999]);

        let titles: Vec<&str> = state
            .favourite_items()
            .iter()
            .map(|item| item.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Kandy to Ella - Most Scenic Train"]);

        state.clear_favourites().await;
        assert!(state.favourite_items().is_empty());
        assert!(state.session().get_favourites().await.is_empty());
    }

    #[tokio::test]
    async fn test_toggle_theme_persists() {
        let storage = Storage::in_memory();
        let mut state = offline_state(storage.clone());
        assert!(state.toggle_theme().await);
        assert!(!state.toggle_theme().await);
        assert!(state.toggle_theme().await);

        let mut restarted = offline_state(storage);
        restarted.restore().await;
        assert!(restarted.is_dark_mode());
    }

    fn registration() -> RegisterForm {
        RegisterForm {
            first_name: "Nimal".to_string(),
            last_name: "Silva".to_string(),
            email: "nimal@example.lk".to_string(),
            username: "nimal_s".to_string(),
            password: "Colombo7".to_string(),
            confirm_password: "Colombo7".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_edit_profile() {
        let storage = Storage::in_memory();
        let mut state = offline_state(storage.clone());

        let err = state
            .update_profile(&ProfileForm::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotAuthenticated));

        let user = state.register(&registration()).await.unwrap();
        let updated = state
            .update_profile(&ProfileForm {
                first_name: "Nimal".to_string(),
                last_name: "Perera".to_string(),
                email: "nimal.perera@example.lk".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(updated.id, user.id);
        assert_eq!(updated.token, user.token);

        let mut restarted = offline_state(storage);
        restarted.restore().await;
        assert_eq!(restarted.current_user().unwrap().last_name, "Perera");

        restarted.logout().await;
        let again = restarted.login("nimal_s", "Colombo7").await.unwrap();
        assert_eq!(again.id, user.id);
    }

    #[tokio::test]
    async fn test_change_password_for_local_account() {
        let mut state = offline_state(Storage::in_memory());
        state.register(&registration()).await.unwrap();

        state
            .change_password(&PasswordChangeForm {
                current_password: "Colombo7".to_string(),
                new_password: "Kandy2025".to_string(),
                confirm_password: "Kandy2025".to_string(),
            })
            .await
            .unwrap();

        state.logout().await;
        assert!(state.login("nimal_s", "Colombo7").await.is_err());
        assert!(state.login("nimal_s", "Kandy2025").await.is_ok());

        state.logout().await;
        state.login("demo", "demo123").await.unwrap();
        let err = state
            .change_password(&PasswordChangeForm {
                current_password: "demo123".to_string(),
                new_password: "Demo1234".to_string(),
                confirm_password: "Demo1234".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unsupported(_)));
    }

    #[tokio::test]
    async fn test_item_lookup_prefers_loaded_list() {
        let mut state = offline_state(Storage::in_memory());
        assert_eq!(state.item(4).await.unwrap().title, "Colombo City");
        state.refresh().await;
        assert_eq!(state.item(4).await.unwrap().title, "Colombo City");
        assert!(state.item(4040).await.is_none());
    }

    #[tokio::test]
    async fn test_open_survives_unreadable_storage() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig {
            storage_path: dir.path().to_path_buf(),
            ..offline_config()
        };

        let mut state = AppState::open(&config).await.unwrap();
        state.restore().await;
        assert!(state.current_user().is_none());
        assert_eq!(state.refresh().await.len(), catalog::len());
    }

    #[tokio::test]
    async fn test_refresh_user_for_remote_session() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/auth/me")
            .match_header("authorization", "Bearer jwt-abc")
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "id": 3,
                    "username": "sophiab",
                    "email": "sophia.new@x.dummyjson.com",
                    "firstName": "Sophia",
                    "lastName": "Brown"
                })
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let storage = Storage::in_memory();
        let session = SessionStore::new(storage.clone());
        session.save_token("jwt-abc").await;
        session
            .save_user(&User {
                id: 3,
                username: "sophiab".to_string(),
                email: "sophia@x.dummyjson.com".to_string(),
                first_name: "Sophia".to_string(),
                last_name: "Brown".to_string(),
                token: Some("jwt-abc".to_string()),
            })
            .await;

        let config = ClientConfig::default().with_base_url(server.url());
        let mut state = AppState::with_storage(&config, storage);
        state.restore().await;

        let user = state.refresh_user().await.unwrap();
        assert_eq!(user.email, "sophia.new@x.dummyjson.com");
        assert_eq!(user.token.as_deref(), Some("jwt-abc"));
        assert_eq!(
            state.session().get_user().await.unwrap().email,
            "sophia.new@x.dummyjson.com"
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_refresh_user_keeps_demo_and_failed_sessions() {
        let storage = Storage::in_memory();
        let mut state = offline_state(storage.clone());
        assert!(state.refresh_user().await.is_none());

        let demo = state.login("demo", "demo123").await.unwrap();
        assert_eq!(state.refresh_user().await, Some(&demo));

        // A remote token whose profile cannot be fetched keeps the cached user
        state.session().save_token("jwt-offline").await;
        assert_eq!(state.refresh_user().await, Some(&demo));
    }
}
