use chrono::NaiveDateTime;
use mercato_auth_types::{AccountView, Role};
use uuid::Uuid;

/// Persisted account record.
///
/// `credential_hash` is an Argon2id PHC string and never leaves the
/// server. `verified` flips false→true exactly once and never reverts.
/// At most one verification code and one recovery token are outstanding
/// at any time; issuing a new one overwrites the previous.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub credential_hash: String,
    pub verified: bool,
    pub role: Role,
    pub verification_code: Option<String>,
    pub verification_expires_at: Option<NaiveDateTime>,
    pub recovery_token_hash: Option<String>,
    pub recovery_expires_at: Option<NaiveDateTime>,
    pub last_login_at: Option<NaiveDateTime>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl Account {
    /// The redacted projection handed to clients.
    pub fn view(&self) -> AccountView {
        AccountView {
            id: self.id,
            email: self.email.clone(),
            verified: self.verified,
            role: self.role,
        }
    }
}
