//! Read-only bearer token lookup for the product API.

use std::{fs, path::PathBuf};

use tracing::{debug, warn};

pub trait CredentialStore: Send + Sync {
    /// Previously persisted token, if any. A missing token is not an error:
    /// the request goes out unauthenticated and the API rejects it.
    fn bearer_token(&self) -> Option<String>;
}

pub struct MissingCredentialStore;

impl CredentialStore for MissingCredentialStore {
    fn bearer_token(&self) -> Option<String> {
        None
    }
}

pub struct StaticCredentialStore {
    token: String,
}

impl StaticCredentialStore {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl CredentialStore for StaticCredentialStore {
    fn bearer_token(&self) -> Option<String> {
        normalize_token(&self.token)
    }
}

/// Token persisted in a file by a separate login flow. Re-read on every
/// lookup so a refreshed token is picked up without restarting.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialStore for FileCredentialStore {
    fn bearer_token(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => normalize_token(&raw),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no persisted token");
                None
            }
            Err(err) => {
                warn!(path = %self.path.display(), %err, "failed to read persisted token");
                None
            }
        }
    }
}

fn normalize_token(raw: &str) -> Option<String> {
    let token = raw.trim();
    let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();
    (!token.is_empty()).then(|| token.to_string())
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    #[test]
    fn static_store_trims_and_strips_scheme() {
        assert_eq!(
            StaticCredentialStore::new("  Bearer abc.def \n").bearer_token(),
            Some("abc.def".to_string())
        );
        assert_eq!(StaticCredentialStore::new("   ").bearer_token(), None);
    }

    #[test]
    fn file_store_reads_latest_contents() {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = std::env::temp_dir().join(format!("catalog_token_test_{suffix}"));
        let store = FileCredentialStore::new(&path);

        assert_eq!(store.bearer_token(), None);

        fs::write(&path, "first-token\n").expect("write token");
        assert_eq!(store.bearer_token(), Some("first-token".to_string()));

        fs::write(&path, "second-token").expect("rewrite token");
        assert_eq!(store.bearer_token(), Some("second-token".to_string()));

        fs::remove_file(path).expect("cleanup");
    }
}
