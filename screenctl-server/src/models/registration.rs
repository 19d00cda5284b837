//! Account registration form validation
//!
//! Rules are checked in a fixed order and the first violation is reported,
//! so the form can show a single message. Uniqueness is checked later by the
//! account service.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use super::ValidationError;

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 50;
const EMAIL_MAX: usize = 254;
const CONTACT_MIN: usize = 10;
const CONTACT_MAX: usize = 15;
const PASSWORD_MIN: usize = 6;
const PASSWORD_MAX: usize = 128;

/// `local@domain.tld`, no whitespace
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid email regex")
});

/// Raw registration form as submitted
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub contact_number: String,
    pub password: String,
    pub confirm_password: String,
}

/// Registration that passed every format rule
#[derive(Debug, Clone)]
pub struct ValidRegistration {
    pub username: String,
    pub email: Option<String>,
    pub contact_number: Option<String>,
    pub password: String,
}

impl Registration {
    /// Check the form, returning the first violated rule.
    pub fn validate(self) -> Result<ValidRegistration, ValidationError> {
        let username = validate_username(&self.username)?;
        let email = validate_email(&self.email)?;
        let contact_number = validate_contact(&self.contact_number)?;
        validate_password(&self.password)?;

        if self.password != self.confirm_password {
            return Err(ValidationError::Mismatch {
                field: "password confirmation",
            });
        }

        Ok(ValidRegistration {
            username,
            email,
            contact_number,
            password: self.password,
        })
    }
}

fn validate_username(raw: &str) -> Result<String, ValidationError> {
    let username = raw.trim();
    let len = username.chars().count();

    if len == 0 {
        return Err(ValidationError::Empty { field: "username" });
    }
    if len < USERNAME_MIN {
        return Err(ValidationError::TooShort {
            field: "username",
            min: USERNAME_MIN,
        });
    }
    if len > USERNAME_MAX {
        return Err(ValidationError::TooLong {
            field: "username",
            max: USERNAME_MAX,
        });
    }
    if username.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "username",
            reason: "must not contain spaces",
        });
    }

    Ok(username.to_owned())
}

fn validate_email(raw: &str) -> Result<Option<String>, ValidationError> {
    let email = raw.trim();
    if email.is_empty() {
        return Ok(None);
    }

    if email.len() > EMAIL_MAX {
        return Err(ValidationError::TooLong {
            field: "email",
            max: EMAIL_MAX,
        });
    }
    if !EMAIL_RE.is_match(email) {
        return Err(ValidationError::InvalidFormat {
            field: "email",
            reason: "must look like name@example.com",
        });
    }

    Ok(Some(email.to_owned()))
}

fn validate_contact(raw: &str) -> Result<Option<String>, ValidationError> {
    let contact = raw.trim();
    if contact.is_empty() {
        return Ok(None);
    }

    if !contact.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "contact number",
            reason: "must contain digits only",
        });
    }
    if !(CONTACT_MIN..=CONTACT_MAX).contains(&contact.len()) {
        return Err(ValidationError::InvalidFormat {
            field: "contact number",
            reason: "must be 10 to 15 digits",
        });
    }

    Ok(Some(contact.to_owned()))
}

fn validate_password(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();

    if len < PASSWORD_MIN {
        return Err(ValidationError::TooShort {
            field: "password",
            min: PASSWORD_MIN,
        });
    }
    if len > PASSWORD_MAX {
        return Err(ValidationError::TooLong {
            field: "password",
            max: PASSWORD_MAX,
        });
    }
    if !password.chars().any(char::is_alphabetic) {
        return Err(ValidationError::InvalidFormat {
            field: "password",
            reason: "must contain a letter",
        });
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "password",
            reason: "must contain a digit",
        });
    }
    if password.chars().all(char::is_alphanumeric) {
        return Err(ValidationError::InvalidFormat {
            field: "password",
            reason: "must contain a special character",
        });
    }

    Ok(())
}
