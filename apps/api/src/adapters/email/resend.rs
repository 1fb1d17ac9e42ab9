use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Serialize;

use crate::{
    app_error::{AppError, AppResult},
    use_cases::account::EmailSender,
};

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

/// Delivers transactional mail through the Resend API.
#[derive(Clone)]
pub struct ResendEmailSender {
    client: Client,
    api_key: secrecy::SecretString,
    from: String,
}

impl ResendEmailSender {
    pub fn new(api_key: secrecy::SecretString, from: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            from,
        }
    }
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[async_trait]
impl EmailSender for ResendEmailSender {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()> {
        let request = SendEmailRequest {
            from: &self.from,
            to: [to],
            subject,
            html,
        };

        let response = self
            .client
            .post(RESEND_ENDPOINT)
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("resend request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Internal(format!(
                "resend rejected the email with status {status}"
            )));
        }

        tracing::debug!(%status, "email accepted for delivery");
        Ok(())
    }
}
