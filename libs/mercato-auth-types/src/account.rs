use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account role. Assigned at creation and never changed afterwards.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Standard,
    Admin,
}

/// Redacted account projection returned to clients.
///
/// Carries only what a UI needs to render "who is logged in"; never
/// credential material, verification codes, or recovery tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountView {
    pub id: Uuid,
    pub email: String,
    pub verified: bool,
    pub role: Role,
}
