use crate::error::{AppError, Result};
use crate::models::admin::{LoginRequest, RegisterRequest};

/// Validates a username.
///
/// # Arguments
///
/// * `username` - The username to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the username is valid.
pub fn validate_username(username: &str) -> Result<()> {
    if username.trim().is_empty() {
        return Err(AppError::Validation("Username cannot be empty".to_string()));
    }

    if username.len() > 255 {
        return Err(AppError::Validation(
            "Username must be at most 255 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validates a password.
///
/// # Arguments
///
/// * `password` - The password to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the password is valid.
pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters long".to_string(),
        ));
    }

    if password.len() > 128 {
        return Err(AppError::Validation(
            "Password must be at most 128 characters".to_string(),
        ));
    }

    Ok(())
}

/// Checks that an email has the `local@domain.tld` shape: no whitespace,
/// exactly one `@`, and a dot somewhere inside the domain.
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    if local.is_empty() {
        return false;
    }

    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Lists every strength rule a new password breaks. Empty means acceptable.
pub fn validate_password_strength(password: &str) -> Vec<&'static str> {
    let mut errors = Vec::new();

    if password.chars().count() < 8 {
        errors.push("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one number");
    }

    errors
}

/// Turns a validation report into one user-facing sentence.
///
/// Only a password below the minimum length gets the fixed form wording;
/// every other failure names its field and garde's message.
pub fn report_message(report: &garde::Report) -> String {
    report
        .iter()
        .next()
        .map(|(path, error)| match path.to_string().as_str() {
            "password" if error.message().starts_with("length is lower") => {
                "Password must be at least 8 characters long".to_string()
            }
            field => format!("{}: {}", field, error.message()),
        })
        .unwrap_or_else(|| "Invalid input".to_string())
}

/// Server-side checks for a registration payload, in the order the admin
/// panel reports them.
pub fn validate_register(payload: &RegisterRequest) -> Result<()> {
    if payload.username.trim().is_empty()
        || payload.email.trim().is_empty()
        || payload.password.is_empty()
    {
        return Err(AppError::Validation("All fields are required".to_string()));
    }

    if !is_valid_email(&payload.email) {
        return Err(AppError::Validation("Invalid email format".to_string()));
    }

    validate_password(&payload.password)?;
    validate_username(&payload.username)
}

/// Server-side checks for a login payload.
pub fn validate_login(payload: &LoginRequest) -> Result<()> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::Validation("All fields are required".to_string()));
    }

    if !is_valid_email(&payload.email) {
        return Err(AppError::Validation("Invalid email format".to_string()));
    }

    Ok(())
}
