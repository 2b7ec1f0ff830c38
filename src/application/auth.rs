//! Admin principal checks guarding the post editor.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdminAuthError {
    #[error("admin access is not configured")]
    NotConfigured,
    #[error("missing admin credentials")]
    Missing,
    #[error("invalid admin credentials")]
    Invalid,
}

/// How the current request proved it belongs to the administrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    BearerToken,
    SessionCookie,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminPrincipal {
    pub source: CredentialSource,
}

/// Holds the digest of the configured admin token.
///
/// Session cookies carry the hex digest rather than the token itself.
#[derive(Clone)]
pub struct AdminGate {
    token_digest: Option<Vec<u8>>,
}

impl AdminGate {
    pub fn new(token: Option<&str>) -> Self {
        Self {
            token_digest: token.map(hash_token),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.token_digest.is_some()
    }

    /// Check a raw token, as typed into the login form or sent as a bearer token.
    pub fn verify_token(&self, token: Option<&str>) -> Result<(), AdminAuthError> {
        let expected = self.expected()?;
        let token = token.ok_or(AdminAuthError::Missing)?;
        if expected.ct_eq(&hash_token(token)).unwrap_u8() == 0 {
            return Err(AdminAuthError::Invalid);
        }
        Ok(())
    }

    /// Check the value of an admin session cookie.
    pub fn verify_session(&self, session: Option<&str>) -> Result<(), AdminAuthError> {
        let expected = self.expected()?;
        let session = session.ok_or(AdminAuthError::Missing)?;
        let presented = hex::decode(session).map_err(|_| AdminAuthError::Invalid)?;
        if expected.ct_eq(&presented).unwrap_u8() == 0 {
            return Err(AdminAuthError::Invalid);
        }
        Ok(())
    }

    /// Resolve the principal from whichever credential the request carried.
    ///
    /// A bearer token takes precedence over the session cookie.
    pub fn authenticate(
        &self,
        bearer: Option<&str>,
        session: Option<&str>,
    ) -> Result<AdminPrincipal, AdminAuthError> {
        self.expected()?;
        match (bearer, session) {
            (Some(token), _) => self.verify_token(Some(token)).map(|()| AdminPrincipal {
                source: CredentialSource::BearerToken,
            }),
            (None, Some(session)) => self.verify_session(Some(session)).map(|()| AdminPrincipal {
                source: CredentialSource::SessionCookie,
            }),
            (None, None) => Err(AdminAuthError::Missing),
        }
    }

    /// Cookie value to hand out after a successful login.
    pub fn session_value(&self) -> Result<String, AdminAuthError> {
        self.expected().map(hex::encode)
    }

    fn expected(&self) -> Result<&[u8], AdminAuthError> {
        self.token_digest
            .as_deref()
            .ok_or(AdminAuthError::NotConfigured)
    }
}

fn hash_token(token: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().to_vec()
}
