//! Identity endpoints: signup, login, logout, email verification, the
//! session probe, and the password recovery flow.
//!
//! The session credential rides in an http-only, same-site-strict cookie.
//! Signup logs the new account in immediately; verification only gates
//! what clients choose to protect.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use mercato_auth_types::{MessageResponse, UserResponse};
use serde::Deserialize;

use crate::{
    adapters::http::app_state::AppState,
    app_error::{AppError, AppResult},
    application::session,
};

pub const SESSION_COOKIE: &str = "session_token";

#[derive(Deserialize)]
struct CredentialsPayload {
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct VerifyEmailPayload {
    code: String,
}

#[derive(Deserialize)]
struct ForgotPasswordPayload {
    email: String,
}

#[derive(Deserialize)]
struct ResetPasswordPayload {
    password: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/verify-email", post(verify_email))
        .route("/check-auth", get(check_auth))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password/{token}", post(reset_password))
}

async fn signup(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<CredentialsPayload>,
) -> AppResult<impl IntoResponse> {
    let account = app_state
        .account_use_cases
        .signup(&payload.email, &payload.password)
        .await?;

    let token = session::issue(
        account.id,
        account.role,
        &app_state.config.jwt_secret,
        app_state.config.session_ttl,
    )?;
    let jar = jar.add(session_cookie(token, &app_state));

    Ok((jar, Json(UserResponse { user: account.view() })))
}

async fn login(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<CredentialsPayload>,
) -> AppResult<impl IntoResponse> {
    let account = app_state
        .account_use_cases
        .login(&payload.email, &payload.password)
        .await?;

    let token = session::issue(
        account.id,
        account.role,
        &app_state.config.jwt_secret,
        app_state.config.session_ttl,
    )?;
    let jar = jar.add(session_cookie(token, &app_state));

    Ok((jar, Json(UserResponse { user: account.view() })))
}

/// Deleting the cookie is all a stateless session allows: a credential
/// that was copied elsewhere stays valid until it expires.
async fn logout(State(app_state): State<AppState>, jar: CookieJar) -> AppResult<impl IntoResponse> {
    let jar = jar.add(clear_session_cookie(&app_state));
    Ok((jar, Json(serde_json::json!({}))))
}

async fn verify_email(
    State(app_state): State<AppState>,
    Json(payload): Json<VerifyEmailPayload>,
) -> AppResult<Json<UserResponse>> {
    let account = app_state
        .account_use_cases
        .verify_email(&payload.code)
        .await?;
    Ok(Json(UserResponse {
        user: account.view(),
    }))
}

async fn check_auth(
    State(app_state): State<AppState>,
    jar: CookieJar,
) -> AppResult<Json<UserResponse>> {
    let cookie = jar.get(SESSION_COOKIE).ok_or(AppError::InvalidCredentials)?;
    let claims = session::verify(cookie.value(), &app_state.config.jwt_secret)?;

    let account = app_state
        .account_use_cases
        .get_account(claims.account_id()?)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    Ok(Json(UserResponse {
        user: account.view(),
    }))
}

async fn forgot_password(
    State(app_state): State<AppState>,
    Json(payload): Json<ForgotPasswordPayload>,
) -> AppResult<Json<MessageResponse>> {
    app_state
        .account_use_cases
        .request_password_reset(&payload.email)
        .await?;
    Ok(Json(MessageResponse {
        message: "If that address is registered, a reset link is on its way".to_string(),
    }))
}

async fn reset_password(
    State(app_state): State<AppState>,
    Path(token): Path<String>,
    Json(payload): Json<ResetPasswordPayload>,
) -> AppResult<Json<MessageResponse>> {
    app_state
        .account_use_cases
        .reset_password(&token, &payload.password)
        .await?;
    Ok(Json(MessageResponse {
        message: "Password updated. You can now log in with the new password".to_string(),
    }))
}

fn session_cookie(token: String, app_state: &AppState) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .secure(app_state.config.cookie_secure)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(app_state.config.session_ttl)
        .build()
}

fn clear_session_cookie(app_state: &AppState) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .http_only(true)
        .secure(app_state.config.cookie_secure)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(time::Duration::ZERO)
        .build()
}
