//! Typed authentication operations built on the generic client verbs.
//!
//! These own the credential-store side effects: login/registration write
//! the token pair, logout clears it, verification invalidates the cached
//! profile when the server rejects the session.

use crate::{
    client::{unwrap_payload, ApiClient},
    endpoints,
    error::{ApiError, Result},
    types::{
        AuthResponse, CachedProfile, ChangePasswordRequest, LoginRequest, RegisterRequest,
        TokenPair,
    },
};
use serde_json::Value;
use tracing::{debug, info};

impl ApiClient {
    /// Authenticate and persist the returned credential pair. The profile
    /// included in the response is cached for render-without-network.
    pub async fn login(&self, email: &str, password: &str) -> Result<Value> {
        let request = LoginRequest {
            email: email.to_string(),
            mot_de_passe: password.to_string(),
        };
        let body = self.post(endpoints::auth::LOGIN, &request).await?;
        let auth = self.store_auth_response(body)?;
        info!("user logged in");
        Ok(auth)
    }

    /// Create an account; the backend answers with tokens like login does.
    pub async fn register(&self, request: &RegisterRequest) -> Result<Value> {
        let body = self.post(endpoints::auth::REGISTER, request).await?;
        let auth = self.store_auth_response(body)?;
        info!("user registered");
        Ok(auth)
    }

    /// Best-effort server-side logout, then drop local credentials either
    /// way. The local session ends even when the server is unreachable.
    pub async fn logout(&self) {
        if let Err(e) = self.post(endpoints::auth::LOGOUT, &Value::Null).await {
            debug!("server logout failed, clearing local session anyway: {}", e);
        }
        let store = self.token_store();
        store.clear_tokens();
        store.clear_cached_profile();
        info!("user logged out");
    }

    /// Fetch the profile from the server and refresh the cache.
    pub async fn profile(&self) -> Result<Value> {
        let body = self.get(endpoints::auth::PROFILE).await?;
        let user = unwrap_payload(body, "user");
        self.token_store()
            .set_cached_profile(CachedProfile::new(user.clone()));
        Ok(user)
    }

    pub async fn update_profile(&self, changes: &Value) -> Result<Value> {
        let body = self.put(endpoints::auth::PROFILE, changes).await?;
        let user = unwrap_payload(body, "user");
        self.token_store()
            .set_cached_profile(CachedProfile::new(user.clone()));
        Ok(user)
    }

    pub async fn change_password(&self, old_password: &str, new_password: &str) -> Result<Value> {
        let request = ChangePasswordRequest {
            ancien_mot_de_passe: old_password.to_string(),
            nouveau_mot_de_passe: new_password.to_string(),
        };
        self.put(endpoints::auth::CHANGE_PASSWORD, &request).await
    }

    /// Validate the stored session against the server. A rejection clears
    /// the stale cached profile so the UI falls back to the login screen.
    pub async fn verify(&self) -> Result<Value> {
        match self.get(endpoints::auth::VERIFY).await {
            Ok(body) => Ok(unwrap_payload(body, "user")),
            Err(e) => {
                self.token_store().clear_cached_profile();
                Err(e)
            }
        }
    }

    /// The cached profile, read without a network round-trip.
    pub fn cached_profile(&self) -> Option<CachedProfile> {
        self.token_store().cached_profile()
    }

    fn store_auth_response(&self, body: Value) -> Result<Value> {
        let auth: AuthResponse =
            serde_json::from_value(body.clone()).map_err(|_| ApiError::MalformedResponse)?;
        self.token_store().set_tokens(TokenPair {
            access_token: auth.access_token,
            refresh_token: auth.refresh_token,
        });
        if let Some(user) = auth.user {
            self.token_store().set_cached_profile(CachedProfile::new(user));
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, token_store::MemoryTokenStore, token_store::TokenStore};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str, store: Arc<MemoryTokenStore>) -> ApiClient {
        let config = Config {
            base_url: base_url.to_string(),
            timeout: Duration::from_millis(500),
        };
        ApiClient::new(&config, store).unwrap()
    }

    #[tokio::test]
    async fn login_stores_tokens_and_caches_profile() {
        let server = MockServer::start().await;
        let store = Arc::new(MemoryTokenStore::new());

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_json(json!({
                "email": "alice@example.com",
                "mot_de_passe": "Secret123"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "access-1",
                "refresh_token": "refresh-1",
                "user": {"id": 1, "nom": "Alice"}
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), store.clone());
        client.login("alice@example.com", "Secret123").await.unwrap();

        assert_eq!(store.access_token().as_deref(), Some("access-1"));
        assert_eq!(store.refresh_token().as_deref(), Some("refresh-1"));
        assert_eq!(store.cached_profile().unwrap().user["nom"], "Alice");
    }

    #[tokio::test]
    async fn failed_login_leaves_store_untouched() {
        let server = MockServer::start().await;
        let store = Arc::new(MemoryTokenStore::new());

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "message": "Email ou mot de passe incorrect"
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), store.clone());
        let err = client.login("alice@example.com", "wrong").await.unwrap_err();
        assert_eq!(err.to_string(), "Email ou mot de passe incorrect");
        assert!(store.access_token().is_none());
    }

    #[tokio::test]
    async fn logout_clears_session_even_when_server_errors() {
        let server = MockServer::start().await;
        let store = Arc::new(MemoryTokenStore::with_tokens("access-1", Some("refresh-1")));
        store.set_cached_profile(CachedProfile::new(json!({"id": 1})));

        Mock::given(method("POST"))
            .and(path("/auth/logout"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "message": "Erreur serveur"
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), store.clone());
        client.logout().await;

        assert!(store.access_token().is_none());
        assert!(store.refresh_token().is_none());
        assert!(store.cached_profile().is_none());
    }

    #[tokio::test]
    async fn profile_unwraps_user_envelope_and_refreshes_cache() {
        let server = MockServer::start().await;
        let store = Arc::new(MemoryTokenStore::with_tokens("access-1", Some("refresh-1")));

        Mock::given(method("GET"))
            .and(path("/auth/profile"))
            .and(header("authorization", "Bearer access-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": {"id": 1, "nom": "Alice", "niveau": "L3"}
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), store.clone());
        let user = client.profile().await.unwrap();
        assert_eq!(user["niveau"], "L3");
        assert_eq!(store.cached_profile().unwrap().user["id"], 1);
    }

    #[tokio::test]
    async fn rejected_verify_clears_cached_profile() {
        let server = MockServer::start().await;
        let store = Arc::new(MemoryTokenStore::with_tokens("access-1", None));
        store.set_cached_profile(CachedProfile::new(json!({"id": 1})));

        // 401 with no refresh token stored: verify fails and the stale
        // cache goes with it.
        Mock::given(method("GET"))
            .and(path("/auth/verify"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "message": "Token invalide"
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), store.clone());
        assert!(client.verify().await.is_err());
        assert!(store.cached_profile().is_none());
    }
}
