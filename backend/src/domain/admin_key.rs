//! Static shared secret guarding catalogue mutations.
//!
//! The admin key is an operator credential, independent of user sessions.

use std::fmt;

use constant_time_eq::constant_time_eq;
use zeroize::Zeroizing;

use super::Error;

/// Errors raised when constructing an [`AdminApiKey`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdminApiKeyError {
    #[error("admin API key must not be blank")]
    Blank,
}

/// Operator API key compared in constant time.
#[derive(Clone)]
pub struct AdminApiKey(Zeroizing<String>);

impl AdminApiKey {
    pub fn new(value: impl Into<String>) -> Result<Self, AdminApiKeyError> {
        let value = Zeroizing::new(value.into());
        if value.trim().is_empty() {
            return Err(AdminApiKeyError::Blank);
        }
        Ok(Self(value))
    }

    /// Check a presented key without leaking timing information.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        constant_time_eq(self.0.as_bytes(), candidate.as_bytes())
    }

    /// Authorise a catalogue mutation from the presented header value.
    ///
    /// A missing key is unauthenticated; a wrong key is forbidden.
    pub fn authorize(&self, presented: Option<&str>) -> Result<(), Error> {
        match presented {
            None => Err(Error::unauthorized("Admin API key required")),
            Some(candidate) if self.matches(candidate) => Ok(()),
            Some(_) => Err(Error::forbidden("Invalid admin API key")),
        }
    }
}

impl fmt::Debug for AdminApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdminApiKey(**redacted**)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(None, Some(ErrorCode::Unauthorized))]
    #[case(Some("wrong"), Some(ErrorCode::Forbidden))]
    #[case(Some("operator-key "), Some(ErrorCode::Forbidden))]
    #[case(Some("operator-key"), None)]
    fn authorize_maps_presented_keys(
        #[case] presented: Option<&str>,
        #[case] expected: Option<ErrorCode>,
    ) {
        let key = AdminApiKey::new("operator-key").expect("valid key");
        let outcome = key.authorize(presented).err().map(|err| err.code());
        assert_eq!(outcome, expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_keys_are_rejected(#[case] raw: &str) {
        assert!(matches!(AdminApiKey::new(raw), Err(AdminApiKeyError::Blank)));
    }

    #[rstest]
    fn debug_output_is_redacted() {
        let key = AdminApiKey::new("operator-key").expect("valid key");
        assert!(!format!("{key:?}").contains("operator-key"));
    }
}
