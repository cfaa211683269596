/// Extractors that reject with `ApiError`
///
/// axum's stock `Json`, `Query` and `Path` answer a malformed request with a
/// plain-text body. These wrappers run the same extraction but turn the
/// rejection into the JSON error shape every other failure uses.

use crate::error::ApiError;
use axum::extract::FromRequest;
use axum::extract::FromRequestParts;
use serde::Deserialize;

/// JSON request body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

/// URL query string
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct AppQuery<T>(pub T);

/// URL path parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct AppPath<T>(pub T);

/// Largest page a list endpoint returns
pub const MAX_PAGE_SIZE: i64 = 1000;

/// Page size when `limit` is absent
pub const DEFAULT_PAGE_SIZE: i64 = 100;

/// `?skip=&limit=` paging parameters
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,

    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// Rejects a negative offset or a limit outside `1..=MAX_PAGE_SIZE`
    pub fn validate(self) -> Result<Self, ApiError> {
        if self.skip < 0 {
            return Err(ApiError::BadRequest("skip must not be negative".to_string()));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.limit) {
            return Err(ApiError::BadRequest(format!(
                "limit must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }
        Ok(self)
    }
}

/// `?user_id=` identifying the requesting owner
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OwnerQuery {
    pub user_id: uuid::Uuid,
}
