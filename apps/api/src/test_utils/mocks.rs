//! In-memory mock implementations for the account repository and the
//! email sender.
//!
//! The repository mirrors the SQL adapter's semantics exactly, in
//! particular the single-critical-section check-and-clear of codes and
//! tokens.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use mercato_auth_types::Role;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    domain::entities::account::Account,
    use_cases::account::{AccountRepo, EmailSender, NewAccount},
};

// ============================================================================
// InMemoryAccountRepo
// ============================================================================

#[derive(Default)]
pub struct InMemoryAccountRepo {
    pub accounts: Mutex<HashMap<Uuid, Account>>,
}

impl InMemoryAccountRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_accounts(accounts: Vec<Account>) -> Self {
        let map: HashMap<Uuid, Account> = accounts.into_iter().map(|a| (a.id, a)).collect();
        Self {
            accounts: Mutex::new(map),
        }
    }
}

#[async_trait]
impl AccountRepo for InMemoryAccountRepo {
    async fn insert(&self, account: NewAccount) -> AppResult<Account> {
        let mut accounts = self.accounts.lock().unwrap();

        if accounts.values().any(|a| a.email == account.email) {
            return Err(AppError::EmailTaken);
        }

        let now = chrono::Utc::now().naive_utc();
        let account = Account {
            id: account.id,
            email: account.email,
            credential_hash: account.credential_hash,
            verified: false,
            role: Role::Standard,
            verification_code: None,
            verification_expires_at: None,
            recovery_token_hash: None,
            recovery_expires_at: None,
            last_login_at: None,
            created_at: Some(now),
            updated_at: Some(now),
        };

        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        Ok(self.accounts.lock().unwrap().get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .values()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn record_login(&self, id: Uuid) -> AppResult<()> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts.get_mut(&id).ok_or(AppError::NotFound)?;
        account.last_login_at = Some(chrono::Utc::now().naive_utc());
        account.updated_at = Some(chrono::Utc::now().naive_utc());
        Ok(())
    }

    async fn set_verification_code(
        &self,
        id: Uuid,
        code: &str,
        expires_at: NaiveDateTime,
    ) -> AppResult<()> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts.get_mut(&id).ok_or(AppError::NotFound)?;
        account.verification_code = Some(code.to_string());
        account.verification_expires_at = Some(expires_at);
        account.updated_at = Some(chrono::Utc::now().naive_utc());
        Ok(())
    }

    async fn consume_verification_code(
        &self,
        code: &str,
        now: NaiveDateTime,
    ) -> AppResult<Option<Account>> {
        // One critical section: match and clear cannot be separated
        let mut accounts = self.accounts.lock().unwrap();
        let matched = accounts.values_mut().find(|a| {
            a.verification_code.as_deref() == Some(code)
                && a.verification_expires_at.is_some_and(|at| at > now)
        });

        match matched {
            Some(account) => {
                account.verified = true;
                account.verification_code = None;
                account.verification_expires_at = None;
                account.updated_at = Some(chrono::Utc::now().naive_utc());
                Ok(Some(account.clone()))
            }
            None => Ok(None),
        }
    }

    async fn find_by_verification_code(&self, code: &str) -> AppResult<Option<Account>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .values()
            .find(|a| a.verification_code.as_deref() == Some(code))
            .cloned())
    }

    async fn set_recovery_token(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: NaiveDateTime,
    ) -> AppResult<()> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts.get_mut(&id).ok_or(AppError::NotFound)?;
        account.recovery_token_hash = Some(token_hash.to_string());
        account.recovery_expires_at = Some(expires_at);
        account.updated_at = Some(chrono::Utc::now().naive_utc());
        Ok(())
    }

    async fn consume_recovery_token(
        &self,
        token_hash: &str,
        credential_hash: &str,
        now: NaiveDateTime,
    ) -> AppResult<Option<Account>> {
        let mut accounts = self.accounts.lock().unwrap();
        let matched = accounts.values_mut().find(|a| {
            a.recovery_token_hash.as_deref() == Some(token_hash)
                && a.recovery_expires_at.is_some_and(|at| at > now)
        });

        match matched {
            Some(account) => {
                account.credential_hash = credential_hash.to_string();
                account.recovery_token_hash = None;
                account.recovery_expires_at = None;
                account.updated_at = Some(chrono::Utc::now().naive_utc());
                Ok(Some(account.clone()))
            }
            None => Ok(None),
        }
    }

    async fn find_by_recovery_token(&self, token_hash: &str) -> AppResult<Option<Account>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .values()
            .find(|a| a.recovery_token_hash.as_deref() == Some(token_hash))
            .cloned())
    }
}

// ============================================================================
// Email senders
// ============================================================================

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Records every send so tests can inspect codes and links.
#[derive(Default)]
pub struct RecordingEmailSender {
    pub sent: Mutex<Vec<SentEmail>>,
}

impl RecordingEmailSender {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()> {
        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            html: html.to_string(),
        });
        Ok(())
    }
}

/// Always fails, for asserting that delivery problems stay non-fatal.
pub struct FailingEmailSender;

#[async_trait]
impl EmailSender for FailingEmailSender {
    async fn send(&self, _to: &str, _subject: &str, _html: &str) -> AppResult<()> {
        Err(AppError::Internal("smtp unreachable".into()))
    }
}

// ============================================================================
// Test Factories
// ============================================================================

/// Create a test account with sensible defaults.
pub fn create_test_account(overrides: impl FnOnce(&mut Account)) -> Account {
    let now = chrono::Utc::now().naive_utc();
    let mut account = Account {
        id: Uuid::new_v4(),
        email: "test@example.com".to_string(),
        // hash of "secret1"; tests that log in set their own
        credential_hash: crate::application::password::hash_password("secret1").unwrap(),
        verified: false,
        role: Role::Standard,
        verification_code: None,
        verification_expires_at: None,
        recovery_token_hash: None,
        recovery_expires_at: None,
        last_login_at: None,
        created_at: Some(now),
        updated_at: Some(now),
    };
    overrides(&mut account);
    account
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn insert_rejects_duplicate_email() {
        let repo = InMemoryAccountRepo::new();
        repo.insert(NewAccount {
            id: Uuid::new_v4(),
            email: "a@example.com".to_string(),
            credential_hash: "hash".to_string(),
        })
        .await
        .unwrap();

        let result = repo
            .insert(NewAccount {
                id: Uuid::new_v4(),
                email: "a@example.com".to_string(),
                credential_hash: "hash".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::EmailTaken)));
    }

    #[tokio::test]
    async fn consume_verification_code_is_check_and_clear() {
        let now = Utc::now().naive_utc();
        let account = create_test_account(|a| {
            a.verification_code = Some("654321".to_string());
            a.verification_expires_at = Some(now + Duration::minutes(5));
        });
        let repo = InMemoryAccountRepo::with_accounts(vec![account]);

        let consumed = repo.consume_verification_code("654321", now).await.unwrap();
        assert!(consumed.is_some_and(|a| a.verified));

        // Cleared by the first consume
        let replay = repo.consume_verification_code("654321", now).await.unwrap();
        assert!(replay.is_none());
    }

    #[tokio::test]
    async fn consume_verification_code_skips_expired_codes() {
        let now = Utc::now().naive_utc();
        let account = create_test_account(|a| {
            a.verification_code = Some("654321".to_string());
            a.verification_expires_at = Some(now - Duration::minutes(5));
        });
        let repo = InMemoryAccountRepo::with_accounts(vec![account]);

        let consumed = repo.consume_verification_code("654321", now).await.unwrap();
        assert!(consumed.is_none());

        // Still findable for the error-path lookup
        let found = repo.find_by_verification_code("654321").await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn consume_recovery_token_swaps_the_credential() {
        let now = Utc::now().naive_utc();
        let account = create_test_account(|a| {
            a.recovery_token_hash = Some("digest".to_string());
            a.recovery_expires_at = Some(now + Duration::minutes(5));
        });
        let id = account.id;
        let repo = InMemoryAccountRepo::with_accounts(vec![account]);

        let consumed = repo
            .consume_recovery_token("digest", "new-hash", now)
            .await
            .unwrap();
        assert!(consumed.is_some());

        let stored = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.credential_hash, "new-hash");
        assert!(stored.recovery_token_hash.is_none());
    }
}
