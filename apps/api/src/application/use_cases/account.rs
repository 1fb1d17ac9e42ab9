use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use chrono::{Duration, NaiveDateTime, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use tracing::instrument;
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};
use crate::application::email_templates::{
    password_reset_email, verification_email, welcome_email,
};
use crate::application::password::{hash_password, verify_password};
use crate::application::validators::{MIN_PASSWORD_LEN, is_valid_email, is_valid_password};
use crate::domain::entities::account::Account;

// ============================================================================
// Repository Traits
// ============================================================================

/// Insert payload for a fresh account. `verified` starts false and the
/// role is always `standard`; admin accounts are provisioned out of band.
#[derive(Debug)]
pub struct NewAccount {
    pub id: Uuid,
    pub email: String,
    pub credential_hash: String,
}

#[async_trait]
pub trait AccountRepo: Send + Sync {
    /// Fails with `EmailTaken` when the (case-normalized) email exists.
    async fn insert(&self, account: NewAccount) -> AppResult<Account>;
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Account>>;
    async fn get_by_email(&self, email: &str) -> AppResult<Option<Account>>;
    async fn record_login(&self, id: Uuid) -> AppResult<()>;
    /// Overwrites any outstanding code for the account.
    async fn set_verification_code(
        &self,
        id: Uuid,
        code: &str,
        expires_at: NaiveDateTime,
    ) -> AppResult<()>;
    /// Check-and-clear in one step: marks the account verified and clears
    /// the code iff it matches and has not expired. `None` when no
    /// unexpired match exists. Two concurrent submissions of the same
    /// code must not both succeed.
    async fn consume_verification_code(
        &self,
        code: &str,
        now: NaiveDateTime,
    ) -> AppResult<Option<Account>>;
    async fn find_by_verification_code(&self, code: &str) -> AppResult<Option<Account>>;
    /// Overwrites any outstanding recovery token for the account.
    async fn set_recovery_token(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: NaiveDateTime,
    ) -> AppResult<()>;
    /// Check-and-clear in one step: swaps in the new credential hash and
    /// clears the token iff it matches and has not expired.
    async fn consume_recovery_token(
        &self,
        token_hash: &str,
        credential_hash: &str,
        now: NaiveDateTime,
    ) -> AppResult<Option<Account>>;
    async fn find_by_recovery_token(&self, token_hash: &str) -> AppResult<Option<Account>>;
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()>;
}

// ============================================================================
// Use Cases
// ============================================================================

#[derive(Clone)]
pub struct AccountUseCases {
    accounts: Arc<dyn AccountRepo>,
    email: Arc<dyn EmailSender>,
    app_origin: String,
    verification_code_ttl_minutes: i64,
    recovery_token_ttl_minutes: i64,
}

impl AccountUseCases {
    pub fn new(
        accounts: Arc<dyn AccountRepo>,
        email: Arc<dyn EmailSender>,
        app_origin: String,
        verification_code_ttl_minutes: i64,
        recovery_token_ttl_minutes: i64,
    ) -> Self {
        Self {
            accounts,
            email,
            app_origin,
            verification_code_ttl_minutes,
            recovery_token_ttl_minutes,
        }
    }

    /// Create an account and put a verification code in flight.
    ///
    /// The caller issues a session for the returned account: signup
    /// authenticates immediately, verification only gates protected
    /// views.
    #[instrument(skip(self, password))]
    pub async fn signup(&self, email: &str, password: &str) -> AppResult<Account> {
        if !is_valid_email(email) {
            return Err(AppError::InvalidInput(
                "A valid email address is required".into(),
            ));
        }
        if !is_valid_password(password) {
            return Err(AppError::InvalidInput(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let email = email.trim().to_lowercase();
        let credential_hash = hash_password(password)?;

        let account = self
            .accounts
            .insert(NewAccount {
                id: Uuid::new_v4(),
                email,
                credential_hash,
            })
            .await?;

        self.request_verification(&account).await?;

        Ok(account)
    }

    /// Issue a fresh verification code for the account, replacing any
    /// outstanding one, and dispatch it by mail.
    #[instrument(skip(self))]
    pub async fn request_verification(&self, account: &Account) -> AppResult<()> {
        let code = generate_verification_code();
        let expires_at = expiry_after_minutes(self.verification_code_ttl_minutes);
        self.accounts
            .set_verification_code(account.id, &code, expires_at)
            .await?;

        // Delivery is best-effort; the account is already live.
        let (subject, html) = verification_email(&code, self.verification_code_ttl_minutes);
        if let Err(err) = self.email.send(&account.email, &subject, &html).await {
            tracing::warn!(error = ?err, "verification email failed to send");
        }
        Ok(())
    }

    /// Unknown email and wrong password are deliberately the same outward
    /// error, so callers cannot probe which addresses have accounts.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> AppResult<Account> {
        let email = email.trim().to_lowercase();

        let Some(account) = self.accounts.get_by_email(&email).await? else {
            return Err(AppError::InvalidCredentials);
        };
        if !verify_password(password, &account.credential_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        self.accounts.record_login(account.id).await?;
        Ok(account)
    }

    /// Resolve the subject of a validated session credential.
    #[instrument(skip(self))]
    pub async fn get_account(&self, id: Uuid) -> AppResult<Option<Account>> {
        self.accounts.get_by_id(id).await
    }

    /// Consume a verification code. Single-use by construction: the
    /// success transition clears the code, so a resubmission finds no
    /// match and fails with `NotFound`.
    #[instrument(skip(self, code))]
    pub async fn verify_email(&self, code: &str) -> AppResult<Account> {
        let now = Utc::now().naive_utc();
        if let Some(account) = self.accounts.consume_verification_code(code, now).await? {
            let (subject, html) = welcome_email(&self.app_origin);
            if let Err(err) = self.email.send(&account.email, &subject, &html).await {
                tracing::warn!(error = ?err, "welcome email failed to send");
            }
            return Ok(account);
        }

        // The consume already failed; this second look only picks the
        // error and cannot race a successful consumption.
        match self.accounts.find_by_verification_code(code).await? {
            Some(_) => Err(AppError::Expired),
            None => Err(AppError::NotFound),
        }
    }

    /// Succeeds whether or not the address is registered; the caller must
    /// not be able to tell the difference.
    #[instrument(skip(self))]
    pub async fn request_password_reset(&self, email: &str) -> AppResult<()> {
        let email = email.trim().to_lowercase();

        let Some(account) = self.accounts.get_by_email(&email).await? else {
            tracing::debug!("password reset requested for unknown email");
            return Ok(());
        };

        let raw = generate_recovery_token();
        let expires_at = expiry_after_minutes(self.recovery_token_ttl_minutes);
        self.accounts
            .set_recovery_token(account.id, &hash_recovery_token(&raw), expires_at)
            .await?;

        let link = format!(
            "{}/reset-password/{}",
            self.app_origin.trim_end_matches('/'),
            raw
        );
        let (subject, html) = password_reset_email(&link, self.recovery_token_ttl_minutes);
        if let Err(err) = self.email.send(&account.email, &subject, &html).await {
            tracing::warn!(error = ?err, "password reset email failed to send");
        }
        Ok(())
    }

    /// Consume a recovery token and replace the credential. Single-use;
    /// does not log the account in.
    #[instrument(skip(self, token, new_password))]
    pub async fn reset_password(&self, token: &str, new_password: &str) -> AppResult<()> {
        if !is_valid_password(new_password) {
            return Err(AppError::InvalidInput(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let token_hash = hash_recovery_token(token);
        let credential_hash = hash_password(new_password)?;
        let now = Utc::now().naive_utc();

        if self
            .accounts
            .consume_recovery_token(&token_hash, &credential_hash, now)
            .await?
            .is_some()
        {
            return Ok(());
        }

        match self.accounts.find_by_recovery_token(&token_hash).await? {
            Some(_) => Err(AppError::Expired),
            None => Err(AppError::NotFound),
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Six decimal digits, leading zeros kept.
fn generate_verification_code() -> String {
    let n: u32 = rand::rngs::OsRng.gen_range(0..1_000_000);
    format!("{n:06}")
}

fn generate_recovery_token() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Only the digest is persisted; the raw token travels in the mailed link.
fn hash_recovery_token(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}

fn expiry_after_minutes(minutes: i64) -> NaiveDateTime {
    Utc::now().naive_utc() + Duration::minutes(minutes)
}
