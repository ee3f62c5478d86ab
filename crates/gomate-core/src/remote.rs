// SPDX-License-Identifier: AGPL-3.0
// GoMate Core - Remote catalog client
//
// Thin HTTP client over the demo products API. It knows nothing about
// routes or destinations: records are passed through as raw JSON and only
// their `id` is ever read. One attempt per call, no retries, no timeout
// beyond the HTTP client's defaults.

use crate::config::ClientConfig;
use crate::types::{AppError, User};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A product record from the remote service
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RemoteRecord(pub Value);

impl RemoteRecord {
    /// The record's id, if it carries a usable one: a positive whole
    /// number, whether encoded as an integer or as a float like `5.0`
    pub fn id(&self) -> Option<u64> {
        let id = self.0.get("id")?;
        id.as_u64()
            .or_else(|| {
                id.as_f64()
                    .filter(|f| f.fract() == 0.0 && *f > 0.0 && *f < u64::MAX as f64)
                    .map(|f| f as u64)
            })
            .filter(|id| *id != 0)
    }
}

/// `{ "products": [...] }` envelope shared by listing and search
#[derive(Debug, Deserialize)]
struct ProductsEnvelope {
    products: Option<Vec<RemoteRecord>>,
}

impl ProductsEnvelope {
    fn into_records(self) -> Result<Vec<RemoteRecord>, AppError> {
        self.products
            .ok_or_else(|| AppError::MalformedResponse("missing `products` array".to_string()))
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteUser {
    id: u64,
    username: String,
    email: String,
    first_name: String,
    last_name: String,
    #[serde(default, alias = "accessToken")]
    token: Option<String>,
}

impl From<RemoteUser> for User {
    fn from(remote: RemoteUser) -> Self {
        User {
            id: remote.id,
            username: remote.username,
            email: remote.email,
            first_name: remote.first_name,
            last_name: remote.last_name,
            token: remote.token,
        }
    }
}

/// Client for the remote catalog and auth endpoints
#[derive(Clone)]
pub struct CatalogClient {
    http_client: Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_client(Client::new(), &config.api_base_url)
    }

    pub fn with_client(http_client: Client, base_url: &str) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /products?limit={limit}`
    pub async fn list_products(&self, limit: usize) -> Result<Vec<RemoteRecord>, AppError> {
        let url = format!("{}/products", self.base_url);
        tracing::debug!("GET {} limit={}", url, limit);

        let envelope: ProductsEnvelope = self
            .http_client
            .get(url)
            .query(&[("limit", limit)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        envelope.into_records()
    }

    /// `GET /products/search?q={query}`
    pub async fn search_products(&self, query: &str) -> Result<Vec<RemoteRecord>, AppError> {
        let url = format!("{}/products/search", self.base_url);
        tracing::debug!("GET {} q={:?}", url, query);

        let envelope: ProductsEnvelope = self
            .http_client
            .get(url)
            .query(&[("q", query)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        envelope.into_records()
    }

    /// `GET /products/{id}`
    pub async fn product(&self, id: u64) -> Result<RemoteRecord, AppError> {
        let url = format!("{}/products/{}", self.base_url, id);
        tracing::debug!("GET {}", url);

        let record: RemoteRecord = self
            .http_client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if record.0.is_object() {
            Ok(record)
        } else {
            Err(AppError::MalformedResponse(
                "product is not an object".to_string(),
            ))
        }
    }

    /// `POST /auth/login`. Every failure, whatever its cause, is reported as
    /// invalid credentials.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AppError> {
        let url = format!("{}/auth/login", self.base_url);
        tracing::debug!("POST {} username={}", url, username);

        let result: Result<RemoteUser, reqwest::Error> = async {
            self.http_client
                .post(url)
                .json(&LoginRequest { username, password })
                .send()
                .await?
                .error_for_status()?
                .json()
                .await
        }
        .await;

        result.map(User::from).map_err(|e| {
            tracing::warn!("Remote login failed: {}", e);
            AppError::InvalidCredentials
        })
    }

    /// `GET /auth/me` with a bearer token. The returned user carries `token`.
    pub async fn current_user(&self, token: &str) -> Result<User, AppError> {
        let url = format!("{}/auth/me", self.base_url);
        tracing::debug!("GET {}", url);

        let remote: RemoteUser = self
            .http_client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| AppError::Network(format!("Failed to get user data: {}", e)))?
            .json()
            .await
            .map_err(|e| AppError::Network(format!("Failed to get user data: {}", e)))?;

        Ok(User {
            token: Some(token.to_string()),
            ..User::from(remote)
        })
    }
}
