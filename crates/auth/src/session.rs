//! Signed session tokens (HS256).

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::{Role, SessionClaims, TokenValidationError, validate_claims};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed or tampered session token")]
    Invalid,

    #[error(transparent)]
    Window(#[from] TokenValidationError),

    #[error("failed to sign session: {0}")]
    Signing(String),

    #[error("session lifetime out of range")]
    Lifetime,
}

/// Verifies a session token and returns its claims.
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError>;
}

/// What a successful upstream login hands to the session layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionGrant {
    pub sub: String,
    pub name: String,
    pub role: Role,
    pub access_token: String,
}

/// HS256 session codec with a fixed session lifetime.
pub struct Hs256SessionCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: Duration,
}

impl core::fmt::Debug for Hs256SessionCodec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256SessionCodec")
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl Hs256SessionCodec {
    pub fn new(secret: &[u8], lifetime: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            lifetime,
        }
    }

    /// Sign a new session for `grant`, valid from `now` for the configured lifetime.
    pub fn issue(&self, grant: SessionGrant, now: DateTime<Utc>) -> Result<(String, SessionClaims), TokenError> {
        let expires_at = TimeDelta::from_std(self.lifetime)
            .ok()
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or(TokenError::Lifetime)?;
        let claims = SessionClaims {
            sub: grant.sub,
            name: grant.name,
            role: grant.role,
            access_token: grant.access_token,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;
        Ok((token, claims))
    }
}

impl JwtValidator for Hs256SessionCodec {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError> {
        // Time window is checked against the caller's clock below.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.decoding, &validation)
            .map_err(|_| TokenError::Invalid)?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    fn grant() -> SessionGrant {
        SessionGrant {
            sub: "7".to_string(),
            name: "Carlos Rodríguez".to_string(),
            role: Role::SUPERVISOR,
            access_token: "nest-token".to_string(),
        }
    }

    #[test]
    fn issued_tokens_validate_and_carry_the_upstream_token() {
        let codec = Hs256SessionCodec::new(b"secret", HOUR * 24 * 30);
        let now = Utc::now();
        let (token, issued) = codec.issue(grant(), now).unwrap();

        let claims = codec.validate(&token, now + TimeDelta::days(29)).unwrap();
        assert_eq!(claims, issued);
        assert_eq!(claims.access_token, "nest-token");
        assert_eq!(claims.role, Role::SUPERVISOR);
    }

    #[test]
    fn rejects_after_lifetime() {
        let codec = Hs256SessionCodec::new(b"secret", HOUR);
        let now = Utc::now();
        let (token, _) = codec.issue(grant(), now).unwrap();

        let err = codec.validate(&token, now + TimeDelta::hours(2)).unwrap_err();
        assert_eq!(err, TokenError::Window(TokenValidationError::Expired));
    }

    #[test]
    fn lifetime_past_the_calendar_is_an_error() {
        let codec = Hs256SessionCodec::new(b"secret", Duration::from_secs(u64::MAX / 2));
        assert_eq!(codec.issue(grant(), Utc::now()).unwrap_err(), TokenError::Lifetime);
    }

    #[test]
    fn rejects_tokens_signed_with_another_secret() {
        let a = Hs256SessionCodec::new(b"secret-a", HOUR);
        let b = Hs256SessionCodec::new(b"secret-b", HOUR);
        let now = Utc::now();
        let (token, _) = a.issue(grant(), now).unwrap();

        assert_eq!(b.validate(&token, now).unwrap_err(), TokenError::Invalid);
        assert_eq!(a.validate("not-a-jwt", now).unwrap_err(), TokenError::Invalid);
    }
}
