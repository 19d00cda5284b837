//! Application and screen names
//!
//! Names are trimmed and must be non-empty. Uniqueness is scoped (per owner,
//! per application) and enforced by the schema, not here.

use super::ValidationError;

/// Maximum length for application and screen names
const MAX_NAME_LEN: usize = 100;

fn validated(field: &'static str, raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }

    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_NAME_LEN,
        });
    }

    Ok(trimmed.to_owned())
}

/// Validated application name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApplicationName(String);

impl ApplicationName {
    /// Create an application name.
    ///
    /// # Example
    /// ```
    /// use screenctl_server::models::ApplicationName;
    ///
    /// assert_eq!(ApplicationName::new("  My App ").unwrap().as_str(), "My App");
    /// assert!(ApplicationName::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        validated("application name", s).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ApplicationName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validated screen name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScreenName(String);

impl ScreenName {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        validated("screen name", s).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ScreenName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
