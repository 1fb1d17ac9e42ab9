//! Test app state builder for HTTP-level integration testing.

use std::sync::Arc;

use axum::http::HeaderValue;
use secrecy::SecretString;
use time::Duration;
use url::Url;

use crate::{
    adapters::http::app_state::AppState,
    domain::entities::account::Account,
    infra::config::AppConfig,
    test_utils::{InMemoryAccountRepo, RecordingEmailSender},
    use_cases::account::AccountUseCases,
};

fn test_config() -> AppConfig {
    AppConfig {
        jwt_secret: SecretString::new("test-signing-secret".into()),
        session_ttl: Duration::hours(24),
        verification_code_ttl_minutes: 15,
        recovery_token_ttl_minutes: 60,
        app_origin: Url::parse("http://localhost:3000").unwrap(),
        cors_origin: HeaderValue::from_static("http://localhost:3000"),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        database_url: "postgres://unused".to_string(),
        // Tests speak plain http
        cookie_secure: false,
        resend_api_key: SecretString::new("re_test".into()),
        email_from: "mercato <no-reply@mercato.test>".to_string(),
    }
}

/// Builds an `AppState` wired to in-memory mocks.
///
/// ```rust,ignore
/// let (app_state, repo, email) = TestAppStateBuilder::new()
///     .with_account(create_test_account(|a| a.verified = true))
///     .build();
/// ```
#[derive(Default)]
pub struct TestAppStateBuilder {
    accounts: Vec<Account>,
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, account: Account) -> Self {
        self.accounts.push(account);
        self
    }

    pub fn build(self) -> (AppState, Arc<InMemoryAccountRepo>, Arc<RecordingEmailSender>) {
        let repo = Arc::new(InMemoryAccountRepo::with_accounts(self.accounts));
        let email = Arc::new(RecordingEmailSender::new());
        let config = test_config();

        let account_use_cases = AccountUseCases::new(
            repo.clone(),
            email.clone(),
            config.app_origin.to_string(),
            config.verification_code_ttl_minutes,
            config.recovery_token_ttl_minutes,
        );

        let app_state = AppState {
            config: Arc::new(config),
            account_use_cases: Arc::new(account_use_cases),
        };

        (app_state, repo, email)
    }
}
