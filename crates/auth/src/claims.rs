use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Principal, Role};

/// Claims carried by the signed session cookie.
///
/// `access_token` is the upstream backend's bearer token; it is forwarded on
/// every view call and never inspected locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: upstream user identity.
    pub sub: String,

    /// Display name (`fullName`, else `name`, else `username`).
    pub name: String,

    pub role: Role,

    #[serde(rename = "accessToken")]
    pub access_token: String,

    /// Issued-at (unix seconds).
    pub iat: i64,

    /// Expiration (unix seconds).
    pub exp: i64,
}

impl SessionClaims {
    pub fn principal(&self) -> Principal {
        Principal::new(self.sub.clone(), self.name.clone(), self.role.clone())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("session has expired")]
    Expired,

    #[error("session not yet valid (issued in the future)")]
    NotYetValid,

    #[error("invalid session time window (exp <= iat)")]
    InvalidTimeWindow,
}

/// Deterministically validate the session time window.
///
/// Signature verification happens in the codec; this only checks claims.
pub fn validate_claims(claims: &SessionClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    let now = now.timestamp();
    if claims.exp <= claims.iat {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.iat {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.exp {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn claims(iat: DateTime<Utc>, exp: DateTime<Utc>) -> SessionClaims {
        SessionClaims {
            sub: "12345678".to_string(),
            name: "Ana Pérez".to_string(),
            role: Role::VENDEDOR,
            access_token: "upstream".to_string(),
            iat: iat.timestamp(),
            exp: exp.timestamp(),
        }
    }

    #[test]
    fn accepts_inside_window() {
        let now = Utc::now();
        let c = claims(now - Duration::minutes(1), now + Duration::minutes(1));
        assert_eq!(validate_claims(&c, now), Ok(()));
    }

    #[test]
    fn rejects_expired_and_future_sessions() {
        let now = Utc::now();
        let expired = claims(now - Duration::days(31), now - Duration::days(1));
        assert_eq!(validate_claims(&expired, now), Err(TokenValidationError::Expired));

        let future = claims(now + Duration::minutes(5), now + Duration::days(1));
        assert_eq!(validate_claims(&future, now), Err(TokenValidationError::NotYetValid));
    }

    #[test]
    fn rejects_inverted_window() {
        let now = Utc::now();
        let c = claims(now, now);
        assert_eq!(validate_claims(&c, now), Err(TokenValidationError::InvalidTimeWindow));
    }

    #[test]
    fn access_token_uses_camel_case_on_the_wire() {
        let now = Utc::now();
        let json = serde_json::to_value(claims(now, now + Duration::hours(1))).unwrap();
        assert_eq!(json["accessToken"], "upstream");
        assert_eq!(json["role"], "VENDEDOR");
    }
}
