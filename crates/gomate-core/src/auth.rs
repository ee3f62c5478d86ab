// SPDX-License-Identifier: AGPL-3.0
// GoMate Core - Login and registration
//
// Login tries, in order: the built-in demo accounts, accounts registered
// on this device, then the remote login endpoint. The first match wins.
// This is a demo flow; passwords are compared and stored in plain text.

use crate::remote::CatalogClient;
use crate::session::SessionStore;
use crate::types::{AppError, User};
use std::sync::Arc;

struct DemoAccount {
    password: &'static str,
    id: u64,
    username: &'static str,
    email: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    token: &'static str,
}

const DEMO_ACCOUNTS: &[DemoAccount] = &[
    DemoAccount {
        password: "demo123",
        id: 1001,
        username: "demo",
        email: "demo@gomate.com",
        first_name: "Demo",
        last_name: "User",
        token: "demo-token-1001",
    },
    DemoAccount {
        password: "john123",
        id: 1002,
        username: "john",
        email: "john@gomate.com",
        first_name: "John",
        last_name: "Doe",
        token: "demo-token-1002",
    },
    DemoAccount {
        password: "sarah123",
        id: 1003,
        username: "sarah",
        email: "sarah@gomate.com",
        first_name: "Sarah",
        last_name: "Silva",
        token: "demo-token-1003",
    },
];

impl DemoAccount {
    fn to_user(&self) -> User {
        User {
            id: self.id,
            username: self.username.to_string(),
            email: self.email.to_string(),
            first_name: self.first_name.to_string(),
            last_name: self.last_name.to_string(),
            token: Some(self.token.to_string()),
        }
    }
}

/// The built-in demo user for these credentials, if they match one
pub fn demo_account(username: &str, password: &str) -> Option<User> {
    DEMO_ACCOUNTS
        .iter()
        .find(|account| account.username == username && account.password == password)
        .map(DemoAccount::to_user)
}

const DEMO_TOKEN_PREFIX: &str = "demo-token-";
const LOCAL_TOKEN_PREFIX: &str = "local-token-";

/// Whether `token` was issued by the remote service rather than by a demo
/// or local login
pub fn is_remote_token(token: &str) -> bool {
    !token.is_empty()
        && !token.starts_with(DEMO_TOKEN_PREFIX)
        && !token.starts_with(LOCAL_TOKEN_PREFIX)
}

#[derive(Debug, Clone)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct RegisterData {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Authentication against demo, local and remote accounts
#[derive(Clone)]
pub struct AuthService {
    client: CatalogClient,
    session: Arc<SessionStore>,
}

impl AuthService {
    pub fn new(client: CatalogClient, session: Arc<SessionStore>) -> Self {
        Self { client, session }
    }

    /// Resolve credentials to a user. Every failure is reported as
    /// `AppError::InvalidCredentials`.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<User, AppError> {
        if let Some(user) = demo_account(&credentials.username, &credentials.password) {
            tracing::info!("Logged in with demo account {}", user.username);
            return Ok(user);
        }

        if let Some(user) = self
            .session
            .authenticate_local_user(&credentials.username, &credentials.password)
            .await
        {
            tracing::info!("Logged in with local account {}", user.username);
            return Ok(user);
        }

        let user = self
            .client
            .login(&credentials.username, &credentials.password)
            .await?;
        tracing::info!("Logged in with remote account {}", user.username);
        Ok(user)
    }

    /// Create an account on this device and return its user
    pub async fn register(&self, data: &RegisterData) -> Result<User, AppError> {
        let now = chrono::Utc::now().timestamp_millis().max(0) as u64;
        let user = User {
            id: now,
            username: data.username.clone(),
            email: data.email.clone(),
            first_name: data.first_name.clone(),
            last_name: data.last_name.clone(),
            token: Some(format!("{}{}", LOCAL_TOKEN_PREFIX, now)),
        };

        if !self
            .session
            .register_local_user(&data.username, &data.password, &user)
            .await
        {
            return Err(AppError::Storage("Registration failed".to_string()));
        }

        tracing::info!("Registered local account {}", user.username);
        Ok(user)
    }

    /// Fetch the remote profile behind a remote token
    pub async fn current_user(&self, token: &str) -> Result<User, AppError> {
        self.client.current_user(token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Storage;
    use mockito::Matcher;
    use reqwest::Client;
    use serde_json::json;

    fn credentials(username: &str, password: &str) -> LoginCredentials {
        LoginCredentials {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    fn register_data(username: &str, password: &str) -> RegisterData {
        RegisterData {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password: password.to_string(),
            first_name: "Kamal".to_string(),
            last_name: "Perera".to_string(),
        }
    }

    fn offline_service() -> AuthService {
        AuthService::new(
            CatalogClient::with_client(Client::new(), "http://127.0.0.1:9"),
            Arc::new(SessionStore::new(Storage::in_memory())),
        )
    }

    #[test]
    fn test_remote_token_detection() {
        assert!(is_remote_token("eyJhbGciOiJIUzI1NiJ9.payload.sig"));
        assert!(!is_remote_token("demo-token-1001"));
        assert!(!is_remote_token("local-token-1700000000000"));
        assert!(!is_remote_token(""));
    }

    #[test]
    fn test_demo_accounts() {
        let user = demo_account("sarah", "sarah123").unwrap();
        assert_eq!(user.id, 1003);
        assert_eq!(user.last_name, "Silva");
        assert!(demo_account("sarah", "john123").is_none());
        assert!(demo_account("nobody", "demo123").is_none());
    }

    #[tokio::test]
    async fn test_demo_login_works_offline() {
        let service = offline_service();
        let user = service.login(&credentials("demo", "demo123")).await.unwrap();
        assert_eq!(user.id, 1001);
        assert_eq!(user.email, "demo@gomate.com");
        assert_eq!(user.token.as_deref(), Some("demo-token-1001"));
    }

    #[tokio::test]
    async fn test_demo_wins_over_local_registration() {
        let service = offline_service();
        service
            .register(&register_data("demo", "demo123"))
            .await
            .unwrap();

        let user = service.login(&credentials("demo", "demo123")).await.unwrap();
        assert_eq!(user.id, 1001);
    }

    #[tokio::test]
    async fn test_registered_user_can_log_in_offline() {
        let service = offline_service();
        let registered = service
            .register(&register_data("kamal_p", "Secret1"))
            .await
            .unwrap();
        assert!(registered
            .token
            .as_deref()
            .unwrap()
            .starts_with("local-token-"));

        let user = service.login(&credentials("kamal_p", "Secret1")).await.unwrap();
        assert_eq!(user, registered);

        let err = service
            .login(&credentials("kamal_p", "wrong"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_remote_login_is_last_resort() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/login")
            .match_body(Matcher::PartialJson(json!({"username": "emilys"})))
            .with_status(200)
            .with_body(
                json!({
                    "id": 1,
                    "username": "emilys",
                    "email": "emily.johnson@x.dummyjson.com",
                    "firstName": "Emily",
                    "lastName": "Johnson",
                    "accessToken": "jwt"
                })
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let service = AuthService::new(
            CatalogClient::with_client(Client::new(), &server.url()),
            Arc::new(SessionStore::new(Storage::in_memory())),
        );

        // demo credentials never reach the server
        service.login(&credentials("john", "john123")).await.unwrap();

        let user = service
            .login(&credentials("emilys", "emilyspass"))
            .await
            .unwrap();
        assert_eq!(user.username, "emilys");
        assert_eq!(user.token.as_deref(), Some("jwt"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_register_reports_storage_failure() {
        let service = AuthService::new(
            CatalogClient::with_client(Client::new(), "http://127.0.0.1:9"),
            Arc::new(SessionStore::new(crate::storage::tests::failing_storage())),
        );
        let err = service
            .register(&register_data("kamal_p", "Secret1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }
}
