use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    adapters::{
        email::resend::ResendEmailSender, http::app_state::AppState,
        persistence::postgres_persistence,
    },
    infra::config::AppConfig,
    use_cases::account::{AccountRepo, AccountUseCases},
};

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let config = AppConfig::from_env();

    let postgres = Arc::new(postgres_persistence(&config.database_url).await?);
    let accounts = postgres as Arc<dyn AccountRepo>;

    let email = Arc::new(ResendEmailSender::new(
        config.resend_api_key.clone(),
        config.email_from.clone(),
    ));

    let account_use_cases = AccountUseCases::new(
        accounts,
        email,
        config.app_origin.to_string(),
        config.verification_code_ttl_minutes,
        config.recovery_token_ttl_minutes,
    );

    Ok(AppState {
        config: Arc::new(config),
        account_use_cases: Arc::new(account_use_cases),
    })
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "mercato_api=debug,tower_http=debug".into());

    let console_layer = fmt::layer()
        .with_target(false) // don't show target (module path)
        .with_level(true)
        .pretty();

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init()
        .ok();
}
