//! Navigation decisions driven by authentication state.
//!
//! The guard owns no routing table and performs no redirect itself; it
//! returns a `NavDecision` and the embedding UI navigates. Unrecoverable
//! auth failures elsewhere surface as `ApiError::requires_login`, which the
//! UI observes the same way.

use tracing::debug;

use crate::api::ApiClient;

/// Pages reachable without authentication.
const PUBLIC_PAGES: &[&str] = &["/login", "/setup"];

/// Pages requiring an admin account.
const ADMIN_PAGES: &[&str] = &["/dashboard"];

/// Where navigation should go, decided before a page renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDecision {
    /// The requested page may render.
    Proceed,
    /// Not authenticated; show the login surface.
    RedirectLogin,
    /// Authenticated but not allowed here; back to the home surface.
    RedirectHome,
}

/// Route guard evaluating whether the session may enter a page.
#[derive(Clone)]
pub struct RouteGuard {
    client: ApiClient,
}

impl RouteGuard {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Decide whether navigation to `path` may proceed.
    ///
    /// Unauthenticated sessions may only enter public pages. Admin pages
    /// additionally require the current user to hold the admin flag; a user
    /// that cannot be fetched is treated as non-admin.
    pub async fn decide(&self, path: &str) -> NavDecision {
        if !self.client.is_authenticated().await && !Self::is_public(path) {
            debug!(path, "Unauthenticated navigation, redirecting to login");
            return NavDecision::RedirectLogin;
        }

        if Self::is_admin_page(path) {
            return match self.client.current_user().await {
                Ok(user) if user.is_admin => NavDecision::Proceed,
                Ok(_) => {
                    debug!(path, "Non-admin user, redirecting home");
                    NavDecision::RedirectHome
                }
                Err(err) => {
                    debug!(path, error = %err, "Admin check failed, redirecting home");
                    NavDecision::RedirectHome
                }
            };
        }

        NavDecision::Proceed
    }

    fn is_public(path: &str) -> bool {
        PUBLIC_PAGES.contains(&path)
    }

    fn is_admin_page(path: &str) -> bool {
        ADMIN_PAGES.contains(&path)
    }
}
