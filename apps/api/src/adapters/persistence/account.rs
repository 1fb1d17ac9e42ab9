use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    domain::entities::account::Account,
    use_cases::account::{AccountRepo, NewAccount},
};

fn row_to_account(row: PgRow) -> AppResult<Account> {
    let role: String = row.get("role");
    Ok(Account {
        id: row.get("id"),
        email: row.get("email"),
        credential_hash: row.get("credential_hash"),
        verified: row.get("verified"),
        role: role
            .parse()
            .map_err(|_| AppError::Database(format!("unknown role {role:?}")))?,
        verification_code: row.get("verification_code"),
        verification_expires_at: row.get("verification_expires_at"),
        recovery_token_hash: row.get("recovery_token_hash"),
        recovery_expires_at: row.get("recovery_expires_at"),
        last_login_at: row.get("last_login_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[async_trait]
impl AccountRepo for PostgresPersistence {
    async fn insert(&self, account: NewAccount) -> AppResult<Account> {
        let row = sqlx::query(
            r#"
            INSERT INTO accounts (id, email, credential_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, credential_hash, verified, role, verification_code, verification_expires_at, recovery_token_hash, recovery_expires_at, last_login_at, created_at, updated_at
            "#,
        )
        .bind(account.id)
        .bind(&account.email)
        .bind(&account.credential_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                AppError::EmailTaken
            } else {
                AppError::from(e)
            }
        })?;
        row_to_account(row)
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        let row = sqlx::query(
            "SELECT id, email, credential_hash, verified, role, verification_code, verification_expires_at, recovery_token_hash, recovery_expires_at, last_login_at, created_at, updated_at FROM accounts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        row.map(row_to_account).transpose()
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let row = sqlx::query(
            "SELECT id, email, credential_hash, verified, role, verification_code, verification_expires_at, recovery_token_hash, recovery_expires_at, last_login_at, created_at, updated_at FROM accounts WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        row.map(row_to_account).transpose()
    }

    async fn record_login(&self, id: Uuid) -> AppResult<()> {
        sqlx::query(
            "UPDATE accounts SET last_login_at = CURRENT_TIMESTAMP, updated_at = CURRENT_TIMESTAMP WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(())
    }

    async fn set_verification_code(
        &self,
        id: Uuid,
        code: &str,
        expires_at: NaiveDateTime,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE accounts
            SET verification_code = $2,
                verification_expires_at = $3,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(code)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(())
    }

    async fn consume_verification_code(
        &self,
        code: &str,
        now: NaiveDateTime,
    ) -> AppResult<Option<Account>> {
        // Check-and-clear in one statement; two racing submissions cannot
        // both match.
        let row = sqlx::query(
            r#"
            UPDATE accounts
            SET verified = TRUE,
                verification_code = NULL,
                verification_expires_at = NULL,
                updated_at = CURRENT_TIMESTAMP
            WHERE verification_code = $1 AND verification_expires_at > $2
            RETURNING id, email, credential_hash, verified, role, verification_code, verification_expires_at, recovery_token_hash, recovery_expires_at, last_login_at, created_at, updated_at
            "#,
        )
        .bind(code)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        row.map(row_to_account).transpose()
    }

    async fn find_by_verification_code(&self, code: &str) -> AppResult<Option<Account>> {
        let row = sqlx::query(
            "SELECT id, email, credential_hash, verified, role, verification_code, verification_expires_at, recovery_token_hash, recovery_expires_at, last_login_at, created_at, updated_at FROM accounts WHERE verification_code = $1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        row.map(row_to_account).transpose()
    }

    async fn set_recovery_token(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: NaiveDateTime,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE accounts
            SET recovery_token_hash = $2,
                recovery_expires_at = $3,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(())
    }

    async fn consume_recovery_token(
        &self,
        token_hash: &str,
        credential_hash: &str,
        now: NaiveDateTime,
    ) -> AppResult<Option<Account>> {
        let row = sqlx::query(
            r#"
            UPDATE accounts
            SET credential_hash = $2,
                recovery_token_hash = NULL,
                recovery_expires_at = NULL,
                updated_at = CURRENT_TIMESTAMP
            WHERE recovery_token_hash = $1 AND recovery_expires_at > $3
            RETURNING id, email, credential_hash, verified, role, verification_code, verification_expires_at, recovery_token_hash, recovery_expires_at, last_login_at, created_at, updated_at
            "#,
        )
        .bind(token_hash)
        .bind(credential_hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        row.map(row_to_account).transpose()
    }

    async fn find_by_recovery_token(&self, token_hash: &str) -> AppResult<Option<Account>> {
        let row = sqlx::query(
            "SELECT id, email, credential_hash, verified, role, verification_code, verification_expires_at, recovery_token_hash, recovery_expires_at, last_login_at, created_at, updated_at FROM accounts WHERE recovery_token_hash = $1",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        row.map(row_to_account).transpose()
    }
}
