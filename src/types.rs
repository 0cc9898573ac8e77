use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The credential pair held by the token store. The access token is
/// overwritten on refresh; both are deleted at logout or when a refresh
/// is rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub mot_de_passe: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub nom: String,
    pub email: String,
    pub mot_de_passe: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub niveau: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub langue: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChangePasswordRequest {
    pub ancien_mot_de_passe: String,
    pub nouveau_mot_de_passe: String,
}

/// Login and registration both answer with a full token pair plus the
/// user's profile.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub user: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: std::collections::HashMap<String, serde_json::Value>,
}

/// The refresh endpoint only ever mints a new access token; the refresh
/// token itself is not rotated.
#[derive(Debug, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Profile blob cached next to the tokens so the dashboard can render
/// without a round-trip. Revalidated against `/auth/verify` when online.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedProfile {
    pub user: serde_json::Value,
    pub fetched_at: DateTime<Utc>,
}

impl CachedProfile {
    pub fn new(user: serde_json::Value) -> Self {
        Self {
            user,
            fetched_at: Utc::now(),
        }
    }
}
