//! Wire types for the auth and daily specials endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Body of `POST /auth/token/`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Tokens issued at login (access + refresh)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthTokens {
    #[serde(rename = "access")]
    pub access_token: String,
    #[serde(rename = "refresh")]
    pub refresh_token: String,
}

/// Body of `POST /auth/token/refresh/`
#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Response of `POST /auth/token/refresh/`
///
/// `refresh` is only present when the backend rotates refresh tokens.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

/// A daily special as served by the backend.
///
/// Prices are decimals serialized as strings and are kept that way so no
/// precision is lost between reading and writing them back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySpecial {
    pub id: u64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    pub price: String,
    #[serde(default)]
    pub image: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Page envelope of list endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

/// Response of `GET /menu/daily-specials/active/` (not paginated)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveSpecials {
    pub results: Vec<DailySpecial>,
    pub count: u64,
}

/// Envelope returned by the toggle action
#[derive(Debug, Clone, Deserialize)]
pub struct ToggleResponse {
    pub data: DailySpecial,
}

/// Summary shown on the admin dashboard
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    /// Most recently created specials, newest first
    pub recent: Vec<DailySpecial>,
}
