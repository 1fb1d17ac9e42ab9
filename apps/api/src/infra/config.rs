use std::net::SocketAddr;

use axum::http::HeaderValue;
use env_helpers::{get_env, get_env_default};
use secrecy::SecretString;
use time::Duration;
use url::Url;

pub struct AppConfig {
    pub jwt_secret: SecretString,
    /// Fixed lifetime of a session credential. There is no sliding
    /// expiry: a credential lives exactly this long from issuance.
    pub session_ttl: Duration,
    pub verification_code_ttl_minutes: i64,
    pub recovery_token_ttl_minutes: i64,
    /// Public origin of the web client; password reset links are built
    /// against it.
    pub app_origin: Url,
    pub cors_origin: HeaderValue,
    pub bind_addr: SocketAddr,
    pub database_url: String,
    /// Cleared only for plain-http local development.
    pub cookie_secure: bool,
    pub resend_api_key: SecretString,
    pub email_from: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let jwt_secret: SecretString = SecretString::new(get_env::<String>("JWT_SECRET").into());

        let session_ttl_secs: i64 = get_env_default("SESSION_TTL_SECS", 86_400);
        let verification_code_ttl_minutes: i64 =
            get_env_default("VERIFICATION_CODE_TTL_MINUTES", 15);
        let recovery_token_ttl_minutes: i64 = get_env_default("RECOVERY_TOKEN_TTL_MINUTES", 60);

        let app_origin: Url = get_env("APP_ORIGIN");
        let cors_origin: HeaderValue =
            get_env_default("CORS_ORIGIN", String::from("http://localhost:3000"))
                .parse()
                .expect("CORS_ORIGIN must be a valid header value");

        let bind_addr: SocketAddr = get_env_default("BIND_ADDR", "127.0.0.1:3001".parse().unwrap());
        let database_url: String = get_env("DATABASE_URL");
        // Default to secure; only local plain-http development turns this off
        let cookie_secure: bool = get_env_default("COOKIE_SECURE", true);

        let resend_api_key: SecretString =
            SecretString::new(get_env::<String>("RESEND_API_KEY").into());
        let email_from: String = get_env("EMAIL_FROM");

        Self {
            jwt_secret,
            session_ttl: Duration::seconds(session_ttl_secs),
            verification_code_ttl_minutes,
            recovery_token_ttl_minutes,
            app_origin,
            cors_origin,
            bind_addr,
            database_url,
            cookie_secure,
            resend_api_key,
            email_from,
        }
    }
}
