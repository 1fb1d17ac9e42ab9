//! The client auth state container.

use std::time::Duration;

use mercato_auth_types::{AccountView, ErrorBody, MessageResponse, UserResponse};
use url::Url;

use crate::error::{AuthClientError, ErrorKind};

/// How long a round trip may take before it counts as failed.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Immutable view of the container, consumed by the route gate and by
/// whatever rendering layer exists.
#[derive(Debug, Clone)]
pub struct AuthSnapshot {
    /// Redacted identity, or `None` when nobody is logged in.
    pub identity: Option<AccountView>,
    /// True iff `identity` is present.
    pub is_authenticated: bool,
    /// True only while the initial bootstrap probe is in flight.
    pub is_checking_auth: bool,
    /// True while any other operation is in flight.
    pub is_loading: bool,
    /// Classification of the most recent failure; overwritten per operation.
    pub last_error: Option<ErrorKind>,
    /// Informational result of the most recent recovery-flow step.
    pub last_message: Option<String>,
}

/// Single state container behind every auth-aware UI surface.
///
/// All mutation goes through the operation methods below; each follows
/// the same contract: flag loading and clear `last_error`, perform one
/// round trip, record the outcome, and propagate failures to the caller
/// (the UI decides how to react). There is no request de-duplication;
/// overlapping operations resolve last-write-wins on the shared flags.
///
/// The session credential lives in the internal cookie jar as an
/// http-only cookie; the store never sees or stores credential material.
pub struct AuthStore {
    http: reqwest::Client,
    base_url: Url,
    identity: Option<AccountView>,
    profile: Option<serde_json::Value>,
    is_loading: bool,
    is_checking_auth: bool,
    last_error: Option<ErrorKind>,
    last_message: Option<String>,
}

impl AuthStore {
    pub fn new(base_url: Url) -> Result<Self, AuthClientError> {
        if base_url.cannot_be_a_base() {
            return Err(AuthClientError::Config(format!(
                "base URL {base_url} cannot carry paths"
            )));
        }

        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url,
            identity: None,
            profile: None,
            is_loading: false,
            is_checking_auth: false,
            last_error: None,
            last_message: None,
        })
    }

    /// Current state, cheap to clone out on every render.
    pub fn snapshot(&self) -> AuthSnapshot {
        AuthSnapshot {
            identity: self.identity.clone(),
            is_authenticated: self.identity.is_some(),
            is_checking_auth: self.is_checking_auth,
            is_loading: self.is_loading,
            last_error: self.last_error,
            last_message: self.last_message.clone(),
        }
    }

    /// Profile fetched after login, if any. Opaque to this crate.
    pub fn profile(&self) -> Option<&serde_json::Value> {
        self.profile.as_ref()
    }

    // ========================================================================
    // Operations
    // ========================================================================

    pub async fn sign_up(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<AccountView, AuthClientError> {
        self.begin();
        let result = self
            .request_user(
                "auth/signup",
                &serde_json::json!({ "email": email, "password": password }),
            )
            .await;

        match result {
            Ok(user) => {
                self.identity = Some(user.clone());
                self.is_loading = false;
                Ok(user)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    pub async fn login(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<AccountView, AuthClientError> {
        self.begin();
        let result = self
            .request_user(
                "auth/login",
                &serde_json::json!({ "email": email, "password": password }),
            )
            .await;

        let user = match result {
            Ok(user) => user,
            Err(err) => return Err(self.fail(err)),
        };
        self.identity = Some(user.clone());

        // New users have no profile yet; that outcome is expected and
        // ignored. Anything else is a real failure.
        match self.fetch_profile().await {
            Ok(profile) => self.profile = profile,
            Err(err) => return Err(self.fail(err)),
        }

        self.is_loading = false;
        Ok(user)
    }

    /// The local snapshot clears even when the server call fails: a stale
    /// identity must not linger in the UI. The failure is still recorded
    /// and propagated.
    pub async fn logout(&mut self) -> Result<(), AuthClientError> {
        self.begin();
        let result = self.post_empty("auth/logout").await;

        self.identity = None;
        self.profile = None;
        self.is_loading = false;

        match result {
            Ok(()) => Ok(()),
            Err(err) => {
                self.last_error = Some(err.kind());
                Err(err)
            }
        }
    }

    pub async fn verify_email(&mut self, code: &str) -> Result<AccountView, AuthClientError> {
        self.begin();
        let result = self
            .request_user("auth/verify-email", &serde_json::json!({ "code": code }))
            .await;

        match result {
            Ok(user) => {
                // The now-verified view replaces the stale snapshot
                self.identity = Some(user.clone());
                self.is_loading = false;
                Ok(user)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Bootstrap probe, run once per process start. "Not logged in" is a
    /// normal outcome here, never an error: on any failure the snapshot
    /// is cleared and `last_error` stays untouched.
    pub async fn check_auth(&mut self) -> bool {
        self.is_checking_auth = true;

        let outcome = self.get_user("auth/check-auth").await;
        match outcome {
            Ok(user) => {
                self.identity = Some(user);
                self.is_checking_auth = false;
                true
            }
            Err(err) => {
                tracing::debug!(error = %err, "auth probe came back unauthenticated");
                self.identity = None;
                self.profile = None;
                self.is_checking_auth = false;
                false
            }
        }
    }

    pub async fn forgot_password(&mut self, email: &str) -> Result<String, AuthClientError> {
        self.begin();
        let result = self
            .request_message("auth/forgot-password", &serde_json::json!({ "email": email }))
            .await;

        match result {
            Ok(message) => {
                self.last_message = Some(message.clone());
                self.is_loading = false;
                Ok(message)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Does not touch the identity snapshot: a successful reset still
    /// requires a fresh login.
    pub async fn reset_password(
        &mut self,
        token: &str,
        new_password: &str,
    ) -> Result<String, AuthClientError> {
        self.begin();
        let result = self
            .request_message(
                &format!("auth/reset-password/{token}"),
                &serde_json::json!({ "password": new_password }),
            )
            .await;

        match result {
            Ok(message) => {
                self.last_message = Some(message.clone());
                self.is_loading = false;
                Ok(message)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn begin(&mut self) {
        self.is_loading = true;
        self.last_error = None;
    }

    fn fail(&mut self, err: AuthClientError) -> AuthClientError {
        self.last_error = Some(err.kind());
        self.is_loading = false;
        err
    }

    fn endpoint(&self, path: &str) -> Result<Url, AuthClientError> {
        self.base_url
            .join(path)
            .map_err(|e| AuthClientError::Config(e.to_string()))
    }

    async fn request_user(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<AccountView, AuthClientError> {
        let response = self.http.post(self.endpoint(path)?).json(body).send().await?;
        Self::parse_user(response).await
    }

    async fn get_user(&self, path: &str) -> Result<AccountView, AuthClientError> {
        let response = self.http.get(self.endpoint(path)?).send().await?;
        Self::parse_user(response).await
    }

    async fn request_message(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<String, AuthClientError> {
        let response = self.http.post(self.endpoint(path)?).json(body).send().await?;
        if response.status().is_success() {
            let body: MessageResponse = response.json().await?;
            Ok(body.message)
        } else {
            Err(Self::api_error(response).await)
        }
    }

    async fn post_empty(&self, path: &str) -> Result<(), AuthClientError> {
        let response = self.http.post(self.endpoint(path)?).send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::api_error(response).await)
        }
    }

    async fn fetch_profile(&self) -> Result<Option<serde_json::Value>, AuthClientError> {
        let response = self.http.get(self.endpoint("profile/me")?).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if response.status().is_success() {
            Ok(Some(response.json().await?))
        } else {
            Err(Self::api_error(response).await)
        }
    }

    async fn parse_user(response: reqwest::Response) -> Result<AccountView, AuthClientError> {
        if response.status().is_success() {
            let body: UserResponse = response.json().await?;
            Ok(body.user)
        } else {
            Err(Self::api_error(response).await)
        }
    }

    async fn api_error(response: reqwest::Response) -> AuthClientError {
        let status = response.status().as_u16();
        let body = response.json::<ErrorBody>().await.ok();
        AuthClientError::from_response(status, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> AuthStore {
        AuthStore::new("http://localhost:3001".parse().unwrap()).unwrap()
    }

    #[test]
    fn fresh_store_is_empty_and_idle() {
        let snapshot = store().snapshot();

        assert!(snapshot.identity.is_none());
        assert!(!snapshot.is_authenticated);
        assert!(!snapshot.is_checking_auth);
        assert!(!snapshot.is_loading);
        assert!(snapshot.last_error.is_none());
        assert!(snapshot.last_message.is_none());
    }

    #[test]
    fn rejects_a_base_url_that_cannot_carry_paths() {
        let result = AuthStore::new("mailto:ops@mercato.example".parse().unwrap());
        assert!(matches!(result, Err(AuthClientError::Config(_))));
    }

    #[test]
    fn endpoints_join_against_the_base() {
        let store = store();
        assert_eq!(
            store.endpoint("auth/login").unwrap().as_str(),
            "http://localhost:3001/auth/login"
        );
    }

    #[tokio::test]
    async fn unreachable_server_fails_operations_but_not_the_probe() {
        // Port 9 (discard) is not listening
        let mut store = AuthStore::new("http://127.0.0.1:9".parse().unwrap()).unwrap();

        let err = store.login("buyer@example.com", "secret1").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Network);
        assert_eq!(store.snapshot().last_error, Some(ErrorKind::Network));
        assert!(!store.snapshot().is_loading);

        // The bootstrap probe swallows the same failure
        let authenticated = store.check_auth().await;
        assert!(!authenticated);
        assert!(!store.snapshot().is_checking_auth);
        // last_error still reflects the login failure, not the probe
        assert_eq!(store.snapshot().last_error, Some(ErrorKind::Network));
    }
}
