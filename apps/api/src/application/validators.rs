use validator::ValidateEmail;

/// Minimum password length accepted at signup and reset.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Validates that the input looks like a valid email address
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && email.validate_email()
}

/// Validates the password length policy.
pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}
