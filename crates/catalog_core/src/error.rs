use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("product api returned status {status}{}", format_detail(.detail))]
    Status { status: u16, detail: Option<String> },
    #[error("product api request failed: {0}")]
    Transport(String),
    #[error("product api request timed out after {0:?}")]
    Timeout(Duration),
    #[error("malformed product api response: {0}")]
    MalformedResponse(String),
    #[error("unknown sort option '{0}'")]
    InvalidSortOption(String),
    #[error("invalid product api base url '{0}'")]
    InvalidBaseUrl(String),
}

fn format_detail(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|detail| format!(": {detail}"))
        .unwrap_or_default()
}

impl CatalogError {
    pub fn requires_reauth(&self) -> bool {
        matches!(self, CatalogError::Status { status: 401 | 403, .. })
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CatalogError::MalformedResponse(err.to_string())
        } else {
            CatalogError::Transport(err.to_string())
        }
    }
}
