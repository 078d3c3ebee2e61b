//! API client for the Ferelix media server.
//!
//! This module provides the `ApiClient` for making requests against the
//! backend's `/api/v1` surface: authentication, first-run setup, and the
//! media catalog.
//!
//! Every authenticated request attaches the stored access token. A 401
//! response triggers a token refresh shared by all concurrent callers and
//! exactly one retry of the original call; see `refresh_access_token`.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::{oneshot, Mutex};
use tracing::{debug, warn};

use crate::auth::TokenStore;
use crate::models::{
    CreateAdminRequest, LoginRequest, LoginResponse, LogoutRequest, Movie, RefreshRequest,
    RefreshResponse, SetupStatus, User,
};

use super::{ApiError, RefreshError};

// ============================================================================
// Constants
// ============================================================================

/// All endpoints live under this path on the server.
const API_BASE: &str = "/api/v1";

/// HTTP request timeout in seconds.
/// 30s allows for slow media-server responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default pagination window for movie listings.
const DEFAULT_MOVIES_LIMIT: u32 = 100;

/// Refresh coordination state shared by every clone of a client.
///
/// Invariant: `in_flight == false` implies `waiters` is empty. The flag and
/// the queue only change together under the lock; the leader drains the
/// queue in the same critical section that resets the flag.
struct RefreshState {
    in_flight: bool,
    waiters: Vec<oneshot::Sender<Result<String, RefreshError>>>,
}

/// Client for the Ferelix REST API.
/// Clone is cheap - the connection pool, token store, and refresh state are
/// all shared with the original.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    tokens: Arc<TokenStore>,
    refresh: Arc<Mutex<RefreshState>>,
}

impl ApiClient {
    /// Create a client for the given server origin, e.g.
    /// `https://media.example.net`. The `/api/v1` base path is appended here.
    pub fn new(server_url: &str, tokens: Arc<TokenStore>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: format!("{}{}", server_url.trim_end_matches('/'), API_BASE),
            tokens,
            refresh: Arc::new(Mutex::new(RefreshState {
                in_flight: false,
                waiters: Vec::new(),
            })),
        })
    }

    /// Whether a token pair is currently stored.
    pub async fn is_authenticated(&self) -> bool {
        self.tokens.is_authenticated().await
    }

    // ========================================================================
    // Request pipeline
    // ========================================================================

    /// Issue an authenticated request.
    ///
    /// `endpoint` is a path relative to `/api/v1`, starting with `/`. The
    /// stored access token is attached as a bearer header when present;
    /// absence is not an error, the backend decides. A 401 with a stored
    /// refresh token triggers one coordinated refresh and one retry; the
    /// retried call is never refresh-eligible itself.
    ///
    /// A 204 response yields `Ok(None)`; any other success status must carry
    /// a JSON body parseable as `T`.
    pub async fn request<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<Option<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        let token = self.tokens.access_token().await;

        let mut response = self
            .send(method.clone(), &url, body, token.as_deref())
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED
            && self.tokens.refresh_token().await.is_some()
        {
            debug!(endpoint, "Received 401, coordinating token refresh");
            let fresh = self.refresh_access_token().await?;
            response = self.send(method, &url, body, Some(&fresh)).await?;
        }

        Self::into_result(response).await
    }

    /// Issue a request with no credential attachment and no refresh handling,
    /// for endpoints that predate authentication (login, first-run setup).
    /// Response handling is identical to `request`.
    pub async fn public_request<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<Option<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self.send(method, &url, body, None).await?;
        Self::into_result(response).await
    }

    /// GET an endpoint through the authenticated pipeline.
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<Option<T>, ApiError> {
        self.request(Method::GET, endpoint, None::<&()>).await
    }

    /// POST a JSON body through the authenticated pipeline.
    pub async fn post<T, B>(&self, endpoint: &str, body: &B) -> Result<Option<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        self.request(Method::POST, endpoint, Some(body)).await
    }

    /// DELETE an endpoint through the authenticated pipeline, with an
    /// optional JSON body.
    pub async fn delete<T, B>(
        &self,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<Option<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        self.request(Method::DELETE, endpoint, body).await
    }

    async fn send<B: Serialize>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
        token: Option<&str>,
    ) -> Result<reqwest::Response, ApiError> {
        let mut request = self.client.request(method, url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    /// Map a settled response to the caller's result. Non-success statuses
    /// become `ApiError::Http` with a best-effort JSON body; 204 carries no
    /// body; any other success body must parse as `T`.
    async fn into_result<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<Option<T>, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_response(status, &body));
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        let text = response.text().await?;
        let value: T = serde_json::from_str(&text)?;
        Ok(Some(value))
    }

    /// Unwrap a response that must carry a body; a 204 here is a server bug.
    fn require_body<T>(endpoint: &str, value: Option<T>) -> Result<T, ApiError> {
        value.ok_or_else(|| ApiError::InvalidResponse(format!("{} returned no content", endpoint)))
    }

    // ========================================================================
    // Refresh coordination
    // ========================================================================

    /// Mint a new access token, coordinating concurrent callers so the
    /// backend sees at most one refresh round-trip.
    ///
    /// The first caller to arrive becomes the leader: it performs the
    /// network call and then settles every queued waiter with the outcome,
    /// in enqueue order, each exactly once. Callers that arrive while the
    /// refresh is in flight enqueue a waiter and suspend; they share the
    /// leader's token or its failure without issuing their own call.
    async fn refresh_access_token(&self) -> Result<String, ApiError> {
        let rx = {
            let mut state = self.refresh.lock().await;
            if state.in_flight {
                let (tx, rx) = oneshot::channel();
                state.waiters.push(tx);
                Some(rx)
            } else {
                state.in_flight = true;
                None
            }
        };

        if let Some(rx) = rx {
            return match rx.await {
                Ok(Ok(token)) => Ok(token),
                Ok(Err(err)) => Err(err.into()),
                // The leader disappeared without settling; only possible if
                // its task was dropped mid-refresh.
                Err(_) => Err(RefreshError::Transport {
                    message: "refresh was abandoned".to_string(),
                }
                .into()),
            };
        }

        let outcome = self.perform_refresh().await;

        let waiters = {
            let mut state = self.refresh.lock().await;
            state.in_flight = false;
            std::mem::take(&mut state.waiters)
        };
        debug!(
            waiters = waiters.len(),
            ok = outcome.is_ok(),
            "Refresh settled"
        );
        for waiter in waiters {
            // A waiter that gave up is allowed to miss its settlement.
            let _ = waiter.send(outcome.clone());
        }

        outcome.map_err(ApiError::from)
    }

    /// The actual refresh round-trip. Runs at most once per settlement.
    ///
    /// A non-success verdict from the server invalidates the stored pair, so
    /// both tokens are cleared before failing. A transport failure keeps
    /// them: the server never judged the credentials.
    async fn perform_refresh(&self) -> Result<String, RefreshError> {
        let Some(refresh_token) = self.tokens.refresh_token().await else {
            return Err(RefreshError::MissingRefreshToken);
        };

        let url = format!("{}/auth/refresh", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&RefreshRequest { refresh_token })
            .send()
            .await
            .map_err(|err| RefreshError::Transport {
                message: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Refresh rejected, clearing stored tokens");
            if let Err(err) = self.tokens.clear().await {
                warn!(error = %err, "Failed to clear token store");
            }
            return Err(RefreshError::Rejected {
                status: status.as_u16(),
            });
        }

        let refreshed: RefreshResponse =
            response
                .json()
                .await
                .map_err(|err| RefreshError::Transport {
                    message: err.to_string(),
                })?;

        if let Err(err) = self
            .tokens
            .save(&refreshed.access_token, &refreshed.refresh_token)
            .await
        {
            // Waiters still get a usable token; persistence catches up on
            // the next successful save.
            warn!(error = %err, "Failed to persist refreshed tokens");
        }

        Ok(refreshed.access_token)
    }

    // ===== Authentication endpoints =====

    /// Log in with username and password, storing the issued token pair.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        device_info: Option<&str>,
    ) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
            device_info: device_info.map(str::to_string),
        };
        let response: Option<LoginResponse> = self
            .public_request(Method::POST, "/auth/login", Some(&body))
            .await?;
        let data = Self::require_body("/auth/login", response)?;

        self.tokens
            .save(&data.access_token, &data.refresh_token)
            .await
            .map_err(ApiError::Store)?;

        Ok(data)
    }

    /// Log out: revoke the refresh token server-side when one is stored,
    /// then clear the local pair. A failed revocation is logged and ignored;
    /// the local pair is always cleared.
    pub async fn logout(&self) -> Result<(), ApiError> {
        if let Some(refresh_token) = self.tokens.refresh_token().await {
            let body = LogoutRequest { refresh_token };
            let result: Result<Option<serde_json::Value>, ApiError> =
                self.delete("/auth/logout", Some(&body)).await;
            if let Err(err) = result {
                warn!(error = %err, "Logout request failed");
            }
        }
        self.tokens.clear().await.map_err(ApiError::Store)
    }

    /// Fetch the profile of the currently authenticated user.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        let user = self.get("/auth/me").await?;
        Self::require_body("/auth/me", user)
    }

    // ===== Setup endpoints =====

    /// Check whether the server has completed first-run setup.
    pub async fn setup_status(&self) -> Result<SetupStatus, ApiError> {
        let status = self
            .public_request(Method::GET, "/setup/status", None::<&()>)
            .await?;
        Self::require_body("/setup/status", status)
    }

    /// Create the initial admin account during first-run setup.
    pub async fn create_admin(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, ApiError> {
        let body = CreateAdminRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let user = self
            .public_request(Method::POST, "/setup/admin", Some(&body))
            .await?;
        Self::require_body("/setup/admin", user)
    }

    // ===== Media catalog =====

    /// List movies with pagination. `skip` defaults to 0, `limit` to 100.
    pub async fn movies(
        &self,
        skip: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Vec<Movie>, ApiError> {
        let skip = skip.unwrap_or(0);
        let limit = limit.unwrap_or(DEFAULT_MOVIES_LIMIT);
        let movies = self
            .get(&format!("/media/movies?skip={}&limit={}", skip, limit))
            .await?;
        Self::require_body("/media/movies", movies)
    }

    /// Fetch a single movie by id.
    pub async fn movie(&self, id: &str) -> Result<Movie, ApiError> {
        let endpoint = format!("/media/movies/{}", id);
        let movie = self.get(&endpoint).await?;
        Self::require_body(&endpoint, movie)
    }
}
