pub mod claims;
pub mod codec;
pub mod errors;
pub mod handler;

pub use claims::SessionClaims;
pub use claims::TokenKind;
pub use codec::MintedToken;
pub use codec::TokenCodec;
pub use errors::JwtError;
pub use handler::JwtHandler;
