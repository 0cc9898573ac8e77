use crate::types::{CachedProfile, TokenPair};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;
use tracing::{debug, error, info};

/// Durable per-session credential state.
///
/// The store is the only shared mutable resource in the crate: it is read
/// at the start of every call and written only by the refresh procedure or
/// by explicit login/logout. Injected into [`crate::ApiClient`] so tests
/// can substitute [`MemoryTokenStore`] for the file-backed default.
pub trait TokenStore: Send + Sync {
    fn access_token(&self) -> Option<String>;
    fn refresh_token(&self) -> Option<String>;
    /// Store a fresh credential pair (login/registration success).
    fn set_tokens(&self, tokens: TokenPair);
    /// Overwrite only the access token (successful refresh).
    fn set_access_token(&self, access_token: String);
    /// Drop both tokens (logout, or refresh rejected).
    fn clear_tokens(&self);

    fn cached_profile(&self) -> Option<CachedProfile>;
    fn set_cached_profile(&self, profile: CachedProfile);
    fn clear_cached_profile(&self);
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredCredentials {
    access_token: Option<String>,
    refresh_token: Option<String>,
    profile: Option<CachedProfile>,
}

/// File-backed [`TokenStore`] persisting to the platform data directory.
#[derive(Debug)]
pub struct FileTokenStore {
    credentials: RwLock<StoredCredentials>,
    persist_path: Option<PathBuf>,
}

impl Default for FileTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FileTokenStore {
    pub fn new() -> Self {
        let persist_path =
            dirs::data_local_dir().map(|dir| dir.join("taskora").join("credentials.json"));
        Self::at_path(persist_path)
    }

    /// Build a store persisting to an explicit location (tests use a
    /// temporary directory).
    pub fn with_path(path: PathBuf) -> Self {
        Self::at_path(Some(path))
    }

    fn at_path(persist_path: Option<PathBuf>) -> Self {
        let store = Self {
            credentials: RwLock::new(StoredCredentials::default()),
            persist_path: persist_path.clone(),
        };

        // Load existing credentials if the file exists
        if let Some(path) = &persist_path {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            store.load();
        }

        store
    }

    fn load(&self) {
        if let Some(path) = &self.persist_path {
            match fs::read_to_string(path) {
                Ok(data) => {
                    if let Ok(credentials) = serde_json::from_str::<StoredCredentials>(&data) {
                        let mut store = self.credentials.write().unwrap();
                        *store = credentials;
                        info!("Loaded stored credentials from disk");
                    } else {
                        debug!("Failed to parse credentials file");
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    debug!("No existing credentials file found");
                }
                Err(e) => {
                    error!("Failed to load credentials: {}", e);
                }
            }
        }
    }

    fn save(&self) {
        if let Some(path) = &self.persist_path {
            let credentials = self.credentials.read().unwrap();
            match serde_json::to_string_pretty(&*credentials) {
                Ok(data) => {
                    if let Err(e) = fs::write(path, data) {
                        error!("Failed to save credentials: {}", e);
                    } else {
                        debug!("Saved credentials to disk");
                    }
                }
                Err(e) => {
                    error!("Failed to serialize credentials: {}", e);
                }
            }
        }
    }
}

impl TokenStore for FileTokenStore {
    fn access_token(&self) -> Option<String> {
        self.credentials.read().unwrap().access_token.clone()
    }

    fn refresh_token(&self) -> Option<String> {
        self.credentials.read().unwrap().refresh_token.clone()
    }

    fn set_tokens(&self, tokens: TokenPair) {
        let mut credentials = self.credentials.write().unwrap();
        credentials.access_token = Some(tokens.access_token);
        credentials.refresh_token = tokens.refresh_token;
        drop(credentials); // Release lock before saving
        self.save();
    }

    fn set_access_token(&self, access_token: String) {
        let mut credentials = self.credentials.write().unwrap();
        credentials.access_token = Some(access_token);
        drop(credentials);
        self.save();
    }

    fn clear_tokens(&self) {
        let mut credentials = self.credentials.write().unwrap();
        credentials.access_token = None;
        credentials.refresh_token = None;
        drop(credentials);
        self.save();
    }

    fn cached_profile(&self) -> Option<CachedProfile> {
        self.credentials.read().unwrap().profile.clone()
    }

    fn set_cached_profile(&self, profile: CachedProfile) {
        let mut credentials = self.credentials.write().unwrap();
        credentials.profile = Some(profile);
        drop(credentials);
        self.save();
    }

    fn clear_cached_profile(&self) {
        let mut credentials = self.credentials.write().unwrap();
        credentials.profile = None;
        drop(credentials);
        self.save();
    }
}

/// In-memory [`TokenStore`] for tests and short-lived tooling.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    credentials: RwLock<StoredCredentials>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor starting out authenticated.
    pub fn with_tokens(access_token: &str, refresh_token: Option<&str>) -> Self {
        let store = Self::new();
        store.set_tokens(TokenPair {
            access_token: access_token.to_string(),
            refresh_token: refresh_token.map(str::to_string),
        });
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn access_token(&self) -> Option<String> {
        self.credentials.read().unwrap().access_token.clone()
    }

    fn refresh_token(&self) -> Option<String> {
        self.credentials.read().unwrap().refresh_token.clone()
    }

    fn set_tokens(&self, tokens: TokenPair) {
        let mut credentials = self.credentials.write().unwrap();
        credentials.access_token = Some(tokens.access_token);
        credentials.refresh_token = tokens.refresh_token;
    }

    fn set_access_token(&self, access_token: String) {
        self.credentials.write().unwrap().access_token = Some(access_token);
    }

    fn clear_tokens(&self) {
        let mut credentials = self.credentials.write().unwrap();
        credentials.access_token = None;
        credentials.refresh_token = None;
    }

    fn cached_profile(&self) -> Option<CachedProfile> {
        self.credentials.read().unwrap().profile.clone()
    }

    fn set_cached_profile(&self, profile: CachedProfile) {
        self.credentials.write().unwrap().profile = Some(profile);
    }

    fn clear_cached_profile(&self) {
        self.credentials.write().unwrap().profile = None;
    }
}
