//! Input checks done before a credential ever leaves the process.

use ask_types::api::{LoginRequest, RegisterRequest};

use crate::error::SessionError;

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginRequest, SessionError> {
        let username = required("Username", &self.username)?;
        required("Password", &self.password)?;
        Ok(LoginRequest {
            username,
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub email: String,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<RegisterRequest, SessionError> {
        let email = required("Email", &self.email)?;
        let username = required("Username", &self.username)?;
        required("Password", &self.password)?;
        if self.password != self.confirm_password {
            return Err(SessionError::validation("Passwords do not match"));
        }
        Ok(RegisterRequest {
            email,
            username,
            password: self.password.clone(),
        })
    }
}

/// Trimmed value of a field that must not be blank. Passwords are checked
/// with this but sent untrimmed.
fn required(field: &str, value: &str) -> Result<String, SessionError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SessionError::validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}
