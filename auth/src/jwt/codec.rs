use std::time::Duration;

use chrono::Utc;

use super::claims::SessionClaims;
use super::claims::TokenKind;
use super::errors::JwtError;
use super::handler::JwtHandler;

/// A freshly signed session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintedToken {
    pub token: String,
    /// Lifetime the token was minted with
    pub expires_in: Duration,
}

/// Session token codec.
///
/// Turns `(subject, email, kind, ttl)` into an opaque signed string and back.
/// Verification is stateless: no store is consulted, so any instance holding
/// the secret can validate a token.
pub struct TokenCodec {
    handler: JwtHandler,
}

impl TokenCodec {
    /// Create a codec owning the service-wide signing secret.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            handler: JwtHandler::new(secret),
        }
    }

    /// Mint a signed token valid for `ttl` from now.
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing failed
    pub fn mint(
        &self,
        subject: &str,
        email: &str,
        kind: TokenKind,
        ttl: Duration,
    ) -> Result<MintedToken, JwtError> {
        let claims = SessionClaims::new(subject, email, kind, Utc::now().timestamp(), ttl);
        let token = self.handler.encode(&claims)?;

        Ok(MintedToken {
            token,
            expires_in: ttl,
        })
    }

    /// Verify signature and expiry, then decode the claims.
    ///
    /// The token kind is not checked here.
    ///
    /// # Errors
    /// * `TokenExpired` - Current time is at or past `exp`
    /// * `InvalidSignature` / `InvalidAlgorithm` / `DecodingFailed` - Token is not ours
    pub fn parse(&self, token: &str) -> Result<SessionClaims, JwtError> {
        let claims: SessionClaims = self.handler.decode(token)?;

        if claims.is_expired(Utc::now().timestamp()) {
            return Err(JwtError::TokenExpired);
        }

        Ok(claims)
    }
}
