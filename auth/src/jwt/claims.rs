use std::fmt;
use std::time::Duration;

use rand::rngs::OsRng;
use rand::RngCore;
use serde::Deserialize;
use serde::Serialize;

/// Kind of session token carried in the `token_type` claim.
///
/// Tokens minted by an older or foreign issuer may carry a kind this service
/// does not know about (or none at all); those decode to `Unknown` rather than
/// failing, so callers can tell "bad signature" apart from "unsupported kind".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
    #[default]
    #[serde(other)]
    Unknown,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
            TokenKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims of a signed session token.
///
/// `iat` and `exp` are Unix timestamps in seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// Subject (account identifier)
    pub sub: String,

    pub email: String,

    #[serde(default)]
    pub token_type: TokenKind,

    /// Issued at
    pub iat: i64,

    /// Expiration time
    pub exp: i64,

    /// Token ID; tokens minted in the same second for the same subject still differ
    #[serde(default)]
    pub jti: String,
}

impl SessionClaims {
    /// Build claims valid from `issued_at` for `ttl`.
    ///
    /// # Arguments
    /// * `subject` - Account identifier
    /// * `email` - Account email at mint time
    /// * `kind` - Access or refresh
    /// * `issued_at` - Unix timestamp (seconds)
    /// * `ttl` - Lifetime of the token
    pub fn new(
        subject: impl ToString,
        email: impl ToString,
        kind: TokenKind,
        issued_at: i64,
        ttl: Duration,
    ) -> Self {
        // Lifetimes beyond i64 seconds saturate rather than wrap into the past.
        let lifetime = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);

        Self {
            sub: subject.to_string(),
            email: email.to_string(),
            token_type: kind,
            iat: issued_at,
            exp: issued_at.saturating_add(lifetime),
            jti: token_id(),
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.token_type
    }

    /// Check if the token is expired at `current_timestamp`.
    ///
    /// A token is valid strictly before `exp`.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }

    /// Time left until expiry, zero once expired.
    pub fn remaining(&self, current_timestamp: i64) -> Duration {
        let left = self.exp.saturating_sub(current_timestamp);
        Duration::from_secs(left.max(0) as u64)
    }
}

fn token_id() -> String {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_claims_window() {
        let claims = SessionClaims::new(
            "user123",
            "a@x.com",
            TokenKind::Access,
            1_000,
            Duration::from_secs(3600),
        );

        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.kind(), TokenKind::Access);
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(claims.jti.len(), 32);
    }

    #[test]
    fn test_same_second_claims_differ() {
        let first = SessionClaims::new("u", "e@x.com", TokenKind::Refresh, 0, Duration::from_secs(60));
        let second = SessionClaims::new("u", "e@x.com", TokenKind::Refresh, 0, Duration::from_secs(60));

        assert_ne!(first, second);
    }

    #[test]
    fn test_huge_ttl_saturates_instead_of_wrapping() {
        let claims = SessionClaims::new("u", "e@x.com", TokenKind::Access, 1_000, Duration::MAX);

        assert_eq!(claims.exp, i64::MAX);
        assert!(!claims.is_expired(1_000));
    }

    #[test]
    fn test_is_expired() {
        let claims =
            SessionClaims::new("u", "e@x.com", TokenKind::Refresh, 0, Duration::from_secs(1000));

        assert!(!claims.is_expired(999));
        assert!(claims.is_expired(1000)); // exp itself is no longer valid
        assert!(claims.is_expired(1001));
    }

    #[test]
    fn test_remaining() {
        let claims =
            SessionClaims::new("u", "e@x.com", TokenKind::Access, 0, Duration::from_secs(60));

        assert_eq!(claims.remaining(20), Duration::from_secs(40));
        assert_eq!(claims.remaining(90), Duration::ZERO);
    }

    #[test]
    fn test_token_kind_serialization() {
        let json = serde_json::to_string(&TokenKind::Refresh).unwrap();
        assert_eq!(json, "\"refresh\"");

        let kind: TokenKind = serde_json::from_str("\"access\"").unwrap();
        assert_eq!(kind, TokenKind::Access);
    }

    #[test]
    fn test_unrecognized_kind_decodes_as_unknown() {
        let claims: SessionClaims = serde_json::from_str(
            r#"{"sub":"u","email":"e@x.com","token_type":"id","iat":0,"exp":10}"#,
        )
        .unwrap();
        assert_eq!(claims.kind(), TokenKind::Unknown);

        let claims: SessionClaims =
            serde_json::from_str(r#"{"sub":"u","email":"e@x.com","iat":0,"exp":10}"#).unwrap();
        assert_eq!(claims.kind(), TokenKind::Unknown);
    }
}
