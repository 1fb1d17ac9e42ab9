use serde::{Deserialize, Serialize};

use crate::account::AccountView;

/// Success envelope for operations that return the account projection.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: AccountView,
}

/// Success envelope for informational outcomes (the recovery flow).
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Failure envelope emitted by the API for every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}
