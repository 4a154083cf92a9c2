//! Password hashing, bearer tokens and the authenticated-account extractor.
//!
//! # Design
//! Passwords are stored as bcrypt hashes with a configurable cost. A token is
//! `payload.signature`, both base64url without padding, where the payload is
//! the JSON [`Claims`] and the signature is the HMAC-SHA256 of the encoded
//! payload under the server secret. The email inside the claims is the
//! account key.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Utc;
use hmac::{digest::InvalidLength, Hmac, Mac};
use lists_core::{Account, AccountError, PasswordHasher};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use crate::{error::AppError, state::AppState, store::StoreError};

type HmacSha256 = Hmac<Sha256>;

fn mac(key: &[u8], data: &[u8]) -> Result<HmacSha256, InvalidLength> {
    let mut mac = HmacSha256::new_from_slice(key)?;
    mac.update(data);
    Ok(mac)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authorization Header not provided")]
    MissingHeader,

    #[error("Incorrect Token Type, must be Bearer")]
    WrongScheme,

    #[error("Token is invalid")]
    InvalidToken,

    #[error("Token has expired")]
    Expired,

    #[error("Account not Found")]
    AccountNotFound,
}

/// bcrypt password hashing. The salt and cost are embedded in the hash.
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, raw: &str) -> Result<String, AccountError> {
        bcrypt::hash(raw, self.cost).map_err(|e| AccountError::Hashing(e.to_string()))
    }

    fn verify(&self, raw: &str, hash: &str) -> bool {
        bcrypt::verify(raw, hash).unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    /// Epoch milliseconds.
    pub expires_at: i64,
}

/// Response body of login and registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: i64,
}

#[derive(Clone)]
pub struct TokenSigner {
    secret: Vec<u8>,
    ttl_ms: i64,
}

impl TokenSigner {
    pub fn new(secret: &str, ttl_ms: i64) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
            ttl_ms,
        }
    }

    pub fn issue(&self, email: &str) -> Result<IssuedToken, AppError> {
        self.issue_at(email, Utc::now().timestamp_millis())
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, Utc::now().timestamp_millis())
    }

    fn issue_at(&self, email: &str, now: i64) -> Result<IssuedToken, AppError> {
        let claims = Claims {
            email: email.to_string(),
            expires_at: now.saturating_add(self.ttl_ms),
        };
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);
        let signature = mac(&self.secret, payload.as_bytes())
            .map_err(|e| AppError::Internal(e.to_string()))?
            .finalize()
            .into_bytes();
        Ok(IssuedToken {
            token: format!("{payload}.{}", URL_SAFE_NO_PAD.encode(signature)),
            expires_at: claims.expires_at,
        })
    }

    fn verify_at(&self, token: &str, now: i64) -> Result<Claims, AuthError> {
        let (payload, signature) = token.split_once('.').ok_or(AuthError::InvalidToken)?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| AuthError::InvalidToken)?;
        mac(&self.secret, payload.as_bytes())
            .map_err(|_| AuthError::InvalidToken)?
            .verify_slice(&signature)
            .map_err(|_| AuthError::InvalidToken)?;

        let payload = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| AuthError::InvalidToken)?;
        let claims: Claims =
            serde_json::from_slice(&payload).map_err(|_| AuthError::InvalidToken)?;
        if claims.expires_at <= now {
            return Err(AuthError::Expired);
        }
        Ok(claims)
    }
}

/// The account named by the request's bearer token, freshly loaded.
pub struct CurrentAccount(pub Account);

impl FromRequestParts<AppState> for CurrentAccount {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidToken)?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::WrongScheme)?;
        let claims = state.signer.verify(token.trim())?;

        match state.store.load(&claims.email).await {
            Ok(account) => Ok(Self(account)),
            Err(StoreError::NotFound(_)) => Err(AuthError::AccountNotFound.into()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimum bcrypt cost keeps the tests fast.
    const FAST: BcryptHasher = BcryptHasher { cost: 4 };

    #[test]
    fn hash_verifies_only_the_same_password() {
        let hash = FAST.hash("password123").unwrap();
        assert!(FAST.verify("password123", &hash));
        assert!(!FAST.verify("password124", &hash));
        assert!(!FAST.verify("password123", "garbage"));
    }

    #[test]
    fn hashes_are_salted() {
        assert_ne!(FAST.hash("password123").unwrap(), FAST.hash("password123").unwrap());
    }

    #[test]
    fn hash_is_bcrypt_with_configured_cost() {
        let hash = BcryptHasher::new(5).hash("password123").unwrap();
        assert!(hash.starts_with("$2b$05$"), "{hash}");
        assert!(!hash.contains("password123"));
    }

    #[test]
    fn invalid_cost_is_an_error() {
        assert!(matches!(
            BcryptHasher::new(1).hash("password123"),
            Err(AccountError::Hashing(_))
        ));
    }

    #[test]
    fn token_round_trip() {
        let signer = TokenSigner::new("secret", 1000);
        let issued = signer.issue_at("a@b.c", 5000).unwrap();
        assert_eq!(issued.expires_at, 6000);
        let claims = signer.verify_at(&issued.token, 5500).unwrap();
        assert_eq!(
            claims,
            Claims {
                email: "a@b.c".into(),
                expires_at: 6000,
            }
        );
    }

    #[test]
    fn expired_token_is_rejected() {
        let signer = TokenSigner::new("secret", 1000);
        let issued = signer.issue_at("a@b.c", 5000).unwrap();
        assert_eq!(
            signer.verify_at(&issued.token, 6000).unwrap_err(),
            AuthError::Expired
        );
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let issued = TokenSigner::new("one", 1000).issue_at("a@b.c", 0).unwrap();
        let other = TokenSigner::new("two", 1000);
        assert_eq!(
            other.verify_at(&issued.token, 10).unwrap_err(),
            AuthError::InvalidToken
        );
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let signer = TokenSigner::new("secret", 1000);
        let issued = signer.issue_at("a@b.c", 0).unwrap();
        let (_, signature) = issued.token.split_once('.').unwrap();
        let forged = URL_SAFE_NO_PAD.encode(br#"{"email":"x@y.z","expires_at":99999}"#);
        assert_eq!(
            signer
                .verify_at(&format!("{forged}.{signature}"), 10)
                .unwrap_err(),
            AuthError::InvalidToken
        );
        assert_eq!(signer.verify_at("no-dot", 10).unwrap_err(), AuthError::InvalidToken);
    }
}
