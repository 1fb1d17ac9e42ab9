//! HTML bodies for the transactional mail the identity flows send.
//!
//! Each template returns `(subject, html)`; delivery is the adapter's
//! concern.

fn wrap_email(headline: &str, body: &str, footer_note: &str) -> String {
    format!(
        "<div style=\"max-width:480px;margin:0 auto;font-family:sans-serif;color:#111827;\">\
         <h2 style=\"margin:24px 0 8px;\">{headline}</h2>\
         {body}\
         <p style=\"margin:24px 0 0;font-size:12px;color:#6b7280;\">{footer_note}</p>\
         </div>"
    )
}

pub fn verification_email(code: &str, ttl_minutes: i64) -> (String, String) {
    let subject = "Confirm your email".to_string();
    let body = format!(
        "<p>Enter this code to confirm your email address. It expires in {ttl_minutes} minutes.</p>\
         <p style=\"font-size:28px;letter-spacing:6px;font-weight:bold;\">{code}</p>"
    );
    let html = wrap_email(
        "Confirm your email",
        &body,
        "If you did not create a mercato account, you can ignore this email.",
    );
    (subject, html)
}

pub fn password_reset_email(link: &str, ttl_minutes: i64) -> (String, String) {
    let subject = "Reset your password".to_string();
    let body = format!(
        "<p>Use this link to choose a new password. It expires in {ttl_minutes} minutes and works once.</p>\
         <p><a href=\"{link}\" style=\"color:#2563eb;\">Reset password</a></p>\
         <p style=\"font-size:14px;color:#4b5563;\">If the link does not work, copy and paste this URL:<br>\
         <span style=\"word-break:break-all;color:#111827;\">{link}</span></p>"
    );
    let html = wrap_email(
        "Reset your password",
        &body,
        "If you did not request a reset, delete this email; your password is unchanged.",
    );
    (subject, html)
}

pub fn welcome_email(app_origin: &str) -> (String, String) {
    let subject = "Welcome to mercato".to_string();
    let body = format!(
        "<p>Your email is confirmed and your account is ready.</p>\
         <p><a href=\"{app_origin}\" style=\"color:#2563eb;\">Start browsing</a></p>"
    );
    let html = wrap_email("You're all set", &body, "Happy trading.");
    (subject, html)
}
