use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Bearer token claims. The user id is carried under both `id` and `userId`;
/// older dashboard builds read one, newer ones the other, so both are kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// The user id carried by the token, whichever field it came in under.
    pub fn subject(&self) -> Option<&str> {
        self.user_id.as_deref().or(self.id.as_deref())
    }
}

/// Issues and verifies signed, time-limited bearer tokens (HS256).
pub struct TokenService {
    secret: Option<String>,
    ttl_seconds: i64,
}

impl TokenService {
    pub fn new(secret: Option<String>, ttl_seconds: i64) -> Self {
        Self {
            secret,
            ttl_seconds,
        }
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    fn secret(&self) -> Result<&str> {
        self.secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Config("token signing secret is not configured".to_string()))
    }

    pub fn issue(&self, user_id: &str) -> Result<String> {
        let secret = self.secret()?;
        let now = Utc::now().timestamp();
        let claims = Claims {
            id: Some(user_id.to_string()),
            user_id: Some(user_id.to_string()),
            iat: now,
            exp: now + self.ttl_seconds,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Failed to sign token: {e}")))
    }

    pub fn verify(&self, token: &str) -> Result<Claims> {
        let secret = self.secret()?;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => {
                AppError::Unauthorized("Token has expired. Please login again.".to_string())
            }
            _ => AppError::Unauthorized("Invalid token format.".to_string()),
        })?;

        if data.claims.subject().is_none() {
            return Err(AppError::Unauthorized("Invalid token payload.".to_string()));
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(Some("test-secret".to_string()), 3600)
    }

    #[test]
    fn issue_and_verify_round_trip() -> anyhow::Result<()> {
        let tokens = service();
        let token = tokens.issue("507f1f77bcf86cd799439011")?;
        let claims = tokens.verify(&token)?;

        assert_eq!(claims.subject(), Some("507f1f77bcf86cd799439011"));
        assert_eq!(claims.id.as_deref(), Some("507f1f77bcf86cd799439011"));
        assert_eq!(claims.user_id.as_deref(), Some("507f1f77bcf86cd799439011"));
        assert_eq!(claims.exp - claims.iat, 3600);
        Ok(())
    }

    #[test]
    fn expiry_matches_configured_ttl() -> anyhow::Result<()> {
        let tokens = TokenService::new(Some("test-secret".to_string()), 7200);
        let claims = tokens.verify(&tokens.issue("abc123abc123abc123abc123")?)?;
        assert_eq!(claims.exp - claims.iat, 7200);
        Ok(())
    }

    #[test]
    fn rejects_expired_token() {
        let tokens = service();
        // Hand-craft a token whose exp is well past the decoder's leeway.
        let now = Utc::now().timestamp();
        let claims = Claims {
            id: Some("507f1f77bcf86cd799439011".to_string()),
            user_id: Some("507f1f77bcf86cd799439011".to_string()),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        match tokens.verify(&token) {
            Err(AppError::Unauthorized(msg)) => assert!(msg.contains("expired")),
            other => panic!("expected expiry rejection, got {other:?}"),
        }
    }

    #[test]
    fn rejects_garbage_token() {
        match service().verify("not-a-token") {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Invalid token format."),
            other => panic!("expected format rejection, got {other:?}"),
        }
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let issuer = TokenService::new(Some("other-secret".to_string()), 3600);
        let token = issuer.issue("507f1f77bcf86cd799439011").unwrap();

        match service().verify(&token) {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Invalid token format."),
            other => panic!("expected signature rejection, got {other:?}"),
        }
    }

    #[test]
    fn rejects_token_without_identity_claim() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            id: None,
            user_id: None,
            iat: now,
            exp: now + 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        match service().verify(&token) {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Invalid token payload."),
            other => panic!("expected payload rejection, got {other:?}"),
        }
    }

    #[test]
    fn missing_secret_is_a_config_error() {
        let tokens = TokenService::new(None, 3600);
        assert!(matches!(
            tokens.issue("507f1f77bcf86cd799439011"),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            tokens.verify("whatever"),
            Err(AppError::Config(_))
        ));
    }
}
