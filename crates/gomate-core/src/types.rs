// SPDX-License-Identifier: AGPL-3.0
// GoMate Core - Type definitions

use serde::{Deserialize, Serialize};

/// Kind of a transport item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportCategory {
    Bus,
    Train,
    Car,
    TukTuk,
    Destination,
}

impl TransportCategory {
    /// Whether this category describes a route (anything but a destination)
    pub fn is_route(&self) -> bool {
        !matches!(self, Self::Destination)
    }

    /// Get display label for this category
    pub fn display_label(&self) -> &'static str {
        match self {
            Self::Bus => "Bus",
            Self::Train => "Train",
            Self::Car => "Car",
            Self::TukTuk => "Tuk Tuk",
            Self::Destination => "Destination",
        }
    }
}

/// Availability badge shown next to an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportStatus {
    Active,
    Upcoming,
    Popular,
    Delayed,
}

impl std::fmt::Display for TransportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Active => "Active",
            Self::Upcoming => "Upcoming",
            Self::Popular => "Popular",
            Self::Delayed => "Delayed",
        };
        f.pad(label)
    }
}

/// A displayable destination or transit route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportItem {
    pub id: u64,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub category: TransportCategory,
    pub status: TransportStatus,
    /// Image URI
    pub image: String,
    /// Price in LKR; 0 means free
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// 0.0 to 5.0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_time: Option<String>,
}

impl TransportItem {
    /// Case-insensitive substring match against the searchable text fields.
    /// `needle` must already be lowercased.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        let optional = [&self.location, &self.route, &self.from, &self.to];

        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || optional
                .iter()
                .filter_map(|field| field.as_deref())
                .any(|field| field.to_lowercase().contains(needle))
    }
}

/// An authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Opaque session token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Entry of the locally registered users table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUser {
    pub password: String,
    pub user_data: User,
}

/// Error types for the application
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected HTTP status: {status}")]
    Http { status: u16 },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Validation failed: {}", format_field_errors(.0))]
    Validation(Vec<FieldError>),

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Unsupported: {0}")]
    Unsupported(String),
}

/// A single per-field validation failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => AppError::Http {
                status: status.as_u16(),
            },
            None if err.is_decode() => AppError::MalformedResponse(err.to_string()),
            None => AppError::Network(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}
