pub mod hasher;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use hasher::PasswordHasher;

/// Claims written into every issued token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i32,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: i32, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            user_id,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }
}

// Decoded side keeps the identifier untyped so a non-numeric claim can be told
// apart from a token that failed verification.
#[derive(Debug, Deserialize)]
struct RawClaims {
    user_id: Value,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token claims are not of the expected type")]
    WrongClaimType,
}

/// Issues and validates stateless HS256 bearer tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub const ALGORITHM: Algorithm = Algorithm::HS256;

    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn issue(&self, user_id: i32) -> Result<String, TokenError> {
        let claims = Claims::new(user_id, self.ttl);

        encode(&Header::new(Self::ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::InvalidToken(e.to_string()))
    }

    /// Verify signature, algorithm and expiry, then return the user id claim.
    pub fn validate(&self, token: &str) -> Result<i32, TokenError> {
        let mut validation = Validation::new(Self::ALGORITHM);
        validation.leeway = 0;

        let token_data = decode::<RawClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| TokenError::InvalidToken(e.to_string()))?;

        token_data
            .claims
            .user_id
            .as_i64()
            .and_then(|id| i32::try_from(id).ok())
            .ok_or(TokenError::WrongClaimType)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn service() -> TokenService {
        TokenService::new("unit-test-secret", Duration::hours(12))
    }

    #[test]
    fn issued_token_round_trips() {
        let tokens = service();
        for user_id in [1, 42, i32::MAX] {
            let token = tokens.issue(user_id).unwrap();
            assert_eq!(tokens.validate(&token).unwrap(), user_id);
        }
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = TokenService::new("unit-test-secret", Duration::hours(-1));
        let token = tokens.issue(7).unwrap();
        assert!(matches!(tokens.validate(&token), Err(TokenError::InvalidToken(_))));
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let token = TokenService::new("other-secret", Duration::hours(1)).issue(7).unwrap();
        assert!(matches!(service().validate(&token), Err(TokenError::InvalidToken(_))));
    }

    #[test]
    fn swapped_payload_is_rejected() {
        let tokens = service();
        let first = tokens.issue(1).unwrap();
        let second = tokens.issue(2).unwrap();

        let first_parts: Vec<&str> = first.split('.').collect();
        let second_parts: Vec<&str> = second.split('.').collect();
        let forged = format!("{}.{}.{}", first_parts[0], second_parts[1], first_parts[2]);

        assert!(matches!(tokens.validate(&forged), Err(TokenError::InvalidToken(_))));
    }

    #[test]
    fn malformed_token_is_rejected() {
        assert!(matches!(service().validate("not-a-token"), Err(TokenError::InvalidToken(_))));
        assert!(matches!(service().validate(""), Err(TokenError::InvalidToken(_))));
    }

    #[test]
    fn unsupported_algorithm_is_rejected() {
        let claims = Claims::new(3, Duration::hours(1));
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(b"unit-test-secret"),
        )
        .unwrap();

        assert!(matches!(service().validate(&token), Err(TokenError::InvalidToken(_))));
    }

    #[test]
    fn non_numeric_user_claim_is_wrong_type() {
        let exp = (Utc::now() + Duration::hours(1)).timestamp();
        let token = encode(
            &Header::new(Algorithm::HS256),
            &json!({ "user_id": "1", "exp": exp }),
            &EncodingKey::from_secret(b"unit-test-secret"),
        )
        .unwrap();

        assert!(matches!(service().validate(&token), Err(TokenError::WrongClaimType)));
    }

    #[test]
    fn out_of_range_user_claim_is_wrong_type() {
        let exp = (Utc::now() + Duration::hours(1)).timestamp();
        let token = encode(
            &Header::new(Algorithm::HS256),
            &json!({ "user_id": i64::MAX, "exp": exp }),
            &EncodingKey::from_secret(b"unit-test-secret"),
        )
        .unwrap();

        assert!(matches!(service().validate(&token), Err(TokenError::WrongClaimType)));
    }
}
