//! Authentication utilities library
//!
//! Building blocks for the credential and session service:
//! - Session token codec (HS256 JWT with access/refresh kinds)
//! - Single-use secret tokens for email verification and password reset
//! - Password hashing (Argon2id)
//!
//! The service defines its own ports and business rules on top of these.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## Session Tokens
//! ```
//! use std::time::Duration;
//!
//! use auth::{TokenCodec, TokenKind};
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!");
//! let minted = codec
//!     .mint("user123", "alice@example.com", TokenKind::Access, Duration::from_secs(3600))
//!     .unwrap();
//! let claims = codec.parse(&minted.token).unwrap();
//! assert_eq!(claims.sub, "user123");
//! assert_eq!(claims.kind(), TokenKind::Access);
//! ```
//!
//! ## Secret Tokens
//! ```
//! use auth::SecretToken;
//!
//! let token = SecretToken::generate();
//! assert_eq!(token.as_str().len(), 64);
//! ```

pub mod jwt;
pub mod password;
pub mod secret_token;

pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::MintedToken;
pub use jwt::SessionClaims;
pub use jwt::TokenCodec;
pub use jwt::TokenKind;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use secret_token::SecretToken;
