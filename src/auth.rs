//! Credentials for authorised trading and watchlist calls.
//!
//! The login flow lives outside the SDK. A collaborator obtains a token and
//! hands it in as a [`Credential`]; every authorised call takes it as an
//! explicit `Option<&Credential>` argument. The SDK never reads ambient
//! storage and never persists the token.

use crate::error::AuthError;
use std::fmt;

/// Opaque session token, sent verbatim in the `Authorization` header.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub(crate) fn header_value(&self) -> &str {
        &self.0
    }

    /// Resolve an optional credential, rejecting absent or blank tokens.
    pub fn require(credential: Option<&Credential>) -> Result<&Credential, AuthError> {
        match credential {
            Some(c) if !c.0.trim().is_empty() => Ok(c),
            _ => Err(AuthError::NotAuthenticated),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl From<&str> for Credential {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Credential {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_rejects_missing() {
        assert_eq!(Credential::require(None), Err(AuthError::NotAuthenticated));
    }

    #[test]
    fn test_require_rejects_blank() {
        let blank = Credential::new("   ");
        assert_eq!(
            Credential::require(Some(&blank)),
            Err(AuthError::NotAuthenticated)
        );
    }

    #[test]
    fn test_require_accepts_token() {
        let c = Credential::new("tok_123");
        assert_eq!(Credential::require(Some(&c)).unwrap().header_value(), "tok_123");
    }

    #[test]
    fn test_debug_hides_token() {
        let c = Credential::new("secret");
        assert_eq!(format!("{:?}", c), "Credential(***)");
    }
}
