use std::sync::Arc;

use crate::{application::use_cases::account::AccountUseCases, infra::config::AppConfig};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub account_use_cases: Arc<AccountUseCases>,
}
