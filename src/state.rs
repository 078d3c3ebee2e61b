//! Cached current-user state.
//!
//! `UserState` is the session-level holder a UI binds to: `load` refreshes
//! the profile through the API client, `clear` drops it on logout. Load
//! failures never propagate; a user that cannot be fetched is simply absent.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::api::ApiClient;
use crate::models::User;

/// Holds the most recently loaded user profile.
#[derive(Clone)]
pub struct UserState {
    client: ApiClient,
    current: Arc<RwLock<Option<User>>>,
}

impl UserState {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            current: Arc::new(RwLock::new(None)),
        }
    }

    /// Refresh the cached user from the API.
    ///
    /// Skips the network entirely when no token pair is stored. Any fetch
    /// failure resets the cache to `None`.
    pub async fn load(&self) -> Option<User> {
        if !self.client.is_authenticated().await {
            *self.current.write().await = None;
            return None;
        }

        match self.client.current_user().await {
            Ok(user) => {
                *self.current.write().await = Some(user.clone());
                Some(user)
            }
            Err(err) => {
                debug!(error = %err, "Failed to load current user");
                *self.current.write().await = None;
                None
            }
        }
    }

    /// Drop the cached user (logout invalidation).
    pub async fn clear(&self) {
        *self.current.write().await = None;
    }

    /// Replace the cached user, e.g. after a profile edit.
    pub async fn update(&self, user: User) {
        *self.current.write().await = Some(user);
    }

    /// The cached user, if any.
    pub async fn user(&self) -> Option<User> {
        self.current.read().await.clone()
    }

    /// Whether a user is currently cached.
    pub async fn is_authenticated(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Whether the cached user holds the admin flag.
    pub async fn is_admin(&self) -> bool {
        self.current
            .read()
            .await
            .as_ref()
            .map(|user| user.is_admin)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::auth::TokenStore;

    struct Harness {
        server: MockServer,
        state: UserState,
        tokens: Arc<TokenStore>,
        _dir: tempfile::TempDir,
    }

    async fn harness() -> Harness {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().expect("tempdir");
        let tokens = Arc::new(TokenStore::open(dir.path()));
        let client = ApiClient::new(&server.uri(), Arc::clone(&tokens)).expect("client");
        Harness {
            server,
            state: UserState::new(client),
            tokens,
            _dir: dir,
        }
    }

    fn profile_json(is_admin: bool) -> serde_json::Value {
        serde_json::json!({
            "id": 7,
            "username": "margot",
            "email": "margot@example.net",
            "is_admin": is_admin
        })
    }

    #[tokio::test]
    async fn load_without_tokens_skips_network() {
        let h = harness().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/auth/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile_json(false)))
            .expect(0)
            .mount(&h.server)
            .await;

        assert!(h.state.load().await.is_none());
        assert!(h.state.user().await.is_none());
        assert!(!h.state.is_authenticated().await);
    }

    #[tokio::test]
    async fn load_caches_the_profile() {
        let h = harness().await;
        h.tokens.save("T1", "R1").await.expect("seed tokens");

        Mock::given(method("GET"))
            .and(path("/api/v1/auth/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile_json(true)))
            .mount(&h.server)
            .await;

        let user = h.state.load().await.expect("user loads");
        assert_eq!(user.username, "margot");
        assert!(h.state.is_authenticated().await);
        assert!(h.state.is_admin().await);
    }

    #[tokio::test]
    async fn failed_load_resets_cache() {
        let h = harness().await;
        h.tokens.save("T1", "R1").await.expect("seed tokens");

        Mock::given(method("GET"))
            .and(path("/api/v1/auth/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile_json(false)))
            .up_to_n_times(1)
            .mount(&h.server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/v1/auth/me"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&h.server)
            .await;

        assert!(h.state.load().await.is_some());
        assert!(h.state.load().await.is_none());
        assert!(h.state.user().await.is_none());
    }

    #[tokio::test]
    async fn clear_drops_cached_user() {
        let h = harness().await;
        h.tokens.save("T1", "R1").await.expect("seed tokens");

        Mock::given(method("GET"))
            .and(path("/api/v1/auth/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile_json(false)))
            .mount(&h.server)
            .await;

        h.state.load().await;
        assert!(h.state.user().await.is_some());

        h.state.clear().await;
        assert!(h.state.user().await.is_none());
        assert!(!h.state.is_admin().await);
    }
}
