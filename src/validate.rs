use thiserror::Error;

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 20;
const PASSWORD_MIN: usize = 6;
const PASSWORD_MAX: usize = 50;
const MESSAGE_MAX: usize = 5000;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub String);

fn reject(message: &str) -> Result<(), ValidationError> {
    Err(ValidationError(message.to_string()))
}

/// Input contracts enforced before any network call is issued. These mirror
/// the acceptance rules of the service's registration and chat forms.

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return reject("Email is required");
    }
    let mut parts = email.split('@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    if local.is_empty() || domain.is_empty() || !domain.contains('.') || parts.next().is_some() {
        return reject("Invalid email address");
    }
    Ok(())
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return reject("Username is required");
    }
    let length = username.chars().count();
    if length < USERNAME_MIN {
        return reject("Username must be at least 3 characters");
    }
    if length > USERNAME_MAX {
        return reject("Username must not exceed 20 characters");
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return reject("Username can only contain letters, numbers and underscores");
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return reject("Password is required");
    }
    let length = password.chars().count();
    if length < PASSWORD_MIN {
        return reject("Password must be at least 6 characters");
    }
    if length > PASSWORD_MAX {
        return reject("Password must not exceed 50 characters");
    }
    Ok(())
}

pub fn validate_message(content: &str) -> Result<(), ValidationError> {
    if content.trim().is_empty() {
        return reject("Message cannot be empty");
    }
    if content.chars().count() > MESSAGE_MAX {
        return reject("Message must not exceed 5000 characters");
    }
    Ok(())
}
