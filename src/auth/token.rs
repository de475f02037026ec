//! Signed, time-limited session tokens.
//!
//! A token carries the public identity of an account (never its password
//! hash) and expires a fixed hour after issuance. Nothing is stored
//! server-side: a token stays valid until it expires, even after logout.

use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::db::{AccountProfile, AccountType};

/// Lifetime of every session token, in seconds.
pub const TOKEN_TTL_SECS: i64 = 3600;

/// Decoded token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: AccountType,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    pub fn for_profile(profile: &AccountProfile, issued_at: i64) -> Self {
        Self {
            id: profile.account_id,
            first_name: profile.account_firstname.clone(),
            last_name: profile.account_lastname.clone(),
            email: profile.account_email.clone(),
            role: profile.account_type,
            iat: issued_at,
            exp: issued_at + TOKEN_TTL_SECS,
        }
    }
}

/// Why a presented token was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    Expired,
    Malformed,
    BadSignature,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::Expired => f.write_str("expired"),
            InvalidReason::Malformed => f.write_str("malformed"),
            InvalidReason::BadSignature => f.write_str("bad-signature"),
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token signing secret is not configured")]
    MissingSecret,
    #[error("failed to sign token: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),
    #[error("invalid token: {reason}")]
    Invalid { reason: InvalidReason },
}

impl TokenError {
    fn invalid(reason: InvalidReason) -> Self {
        TokenError::Invalid { reason }
    }
}

/// HS256 token issuer and verifier over a server-held secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService").finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &str) -> Result<Self, TokenError> {
        if secret.trim().is_empty() {
            return Err(TokenError::MissingSecret);
        }
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    pub fn from_secret(secret: Option<&str>) -> Result<Self, TokenError> {
        Self::new(secret.ok_or(TokenError::MissingSecret)?)
    }

    /// Sign a token for `profile`, valid for `TOKEN_TTL_SECS` from now.
    pub fn issue(&self, profile: &AccountProfile) -> Result<String, TokenError> {
        self.issue_at(profile, Utc::now().timestamp())
    }

    pub fn issue_at(&self, profile: &AccountProfile, issued_at: i64) -> Result<String, TokenError> {
        let claims = Claims::for_profile(profile, issued_at);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(TokenError::Encode)
    }

    /// Check signature and expiry. Failures come back as
    /// `TokenError::Invalid` so the caller chooses the response.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                let reason = match e.kind() {
                    ErrorKind::ExpiredSignature => InvalidReason::Expired,
                    ErrorKind::InvalidSignature => InvalidReason::BadSignature,
                    _ => InvalidReason::Malformed,
                };
                TokenError::invalid(reason)
            })
    }
}
