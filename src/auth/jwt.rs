//! JWT verification
//!
//! Tokens are issued by the hosted auth layer (HS256, `aud = authenticated`).
//! This service only verifies them.

use crate::error::AppError;
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: Uuid,
    /// User email
    #[serde(default)]
    pub email: Option<String>,
    /// Auth-layer role, e.g. `authenticated`
    #[serde(default)]
    pub role: Option<String>,
    /// Audience
    #[serde(default)]
    pub aud: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: Option<i64>,
}

/// Verifies bearer tokens against the shared secret
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str, audience: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[audience]);

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Decode and validate a JWT token
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AppError::Unauthorized("Token expired".to_string()),
                ErrorKind::InvalidToken => AppError::Unauthorized("Invalid token".to_string()),
                ErrorKind::InvalidAudience => {
                    AppError::Unauthorized("Invalid token audience".to_string())
                }
                _ => AppError::Unauthorized(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
pub(crate) mod test_tokens {
    use super::Claims;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use uuid::Uuid;

    pub const SECRET: &str = "test-secret";
    pub const AUDIENCE: &str = "authenticated";

    pub fn token_for(user_id: Uuid, audience: &str, expires_in: Duration, secret: &str) -> String {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            email: Some("freelancer@example.com".to_string()),
            role: Some("authenticated".to_string()),
            aud: Some(audience.to_string()),
            exp: (now + expires_in).timestamp(),
            iat: Some(now.timestamp()),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    pub fn valid_token(user_id: Uuid) -> String {
        token_for(user_id, AUDIENCE, Duration::minutes(15), SECRET)
    }
}

#[cfg(test)]
mod tests {
    use super::test_tokens::*;
    use super::*;
    use chrono::Duration;

    fn verifier() -> TokenVerifier {
        TokenVerifier::new(SECRET, AUDIENCE)
    }

    #[test]
    fn test_decode_valid_token() {
        let user_id = Uuid::new_v4();
        let claims = verifier().decode(&valid_token(user_id)).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role.as_deref(), Some("authenticated"));
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = token_for(Uuid::new_v4(), AUDIENCE, Duration::hours(-2), SECRET);
        let err = verifier().decode(&token).unwrap_err();

        assert!(matches!(err, AppError::Unauthorized(msg) if msg == "Token expired"));
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let token = token_for(Uuid::new_v4(), "anon", Duration::minutes(5), SECRET);
        assert!(verifier().decode(&token).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = token_for(Uuid::new_v4(), AUDIENCE, Duration::minutes(5), "other-secret");
        assert!(verifier().decode(&token).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(verifier().decode("not.a.jwt").is_err());
    }
}
