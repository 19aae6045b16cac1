use serde::{Deserialize, Serialize};

/// Purpose of a signed token, so a flash cookie can never pass as a session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Session,
    Flash,
}

/// Payload of the `session` cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: i64,        // user ID
    pub iat: usize,      // issued at (unix timestamp)
    pub exp: usize,      // expires at (unix timestamp)
    pub iss: String,     // issuer
    pub kind: TokenKind, // always Session
}

/// Payload of the `flash` cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlashClaims {
    pub msg: String,
    pub iat: usize,
    pub exp: usize,
    pub iss: String,
    pub kind: TokenKind,
}
