//! Daily Specials Admin Client
//!
//! A Rust client library for managing a restaurant's daily specials through
//! its REST API, with bearer token authentication and transparent
//! refresh-and-retry when the access token is rejected.

/// Check HTTP response status and return the classified error if not successful
macro_rules! check_response {
    ($response:expr) => {{
        let response = $response;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err($crate::error::ClientError::from_status(status, body));
        }
        response
    }};
}

pub mod api_client;
pub mod auth_client;
pub mod config;
pub mod error;
pub mod request;
pub mod session;
pub mod specials;
pub mod storage;
pub mod token_store;
pub mod types;

pub use api_client::ApiClient;
pub use auth_client::AuthClient;
pub use config::{ClientConfig, ConfigOverride};
pub use error::{ClientError, Result, ValidationErrors};
pub use request::{ApiRequest, ImageUpload, MultipartForm, RequestBody};
pub use session::{LoginRequired, SessionHandler, SessionHandlerNoop};
pub use specials::{DailySpecialPatch, NewDailySpecial, SpecialsClient};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
pub use token_store::TokenStore;
pub use types::{ActiveSpecials, AuthTokens, DailySpecial, DashboardStats, Paginated};
