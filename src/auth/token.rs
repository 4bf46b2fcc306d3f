//! Access token issuance and verification.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::services::ServiceError;

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// Issuer
    pub iss: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// JWT ID
    pub jti: String,
}

/// HS256 token issuer keyed by the configured secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    expires_in_secs: u64,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("issuer", &self.issuer)
            .field("expires_in_secs", &self.expires_in_secs)
            .finish_non_exhaustive()
    }
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

impl TokenIssuer {
    pub fn new(secret: &str, issuer: impl Into<String>, expires_in_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.into(),
            expires_in_secs,
        }
    }

    /// Issue a token for `subject`.
    pub fn issue(&self, subject: &str) -> Result<String, ServiceError> {
        let iat = now();
        let claims = Claims {
            sub: subject.to_string(),
            iss: self.issuer.clone(),
            exp: iat.saturating_add(self.expires_in_secs),
            iat,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::General(format!("Failed to issue token: {e}")))
    }

    /// Verify signature, issuer and expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, ServiceError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| ServiceError::NotAuthenticated(format!("Invalid token: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify() {
        let issuer = TokenIssuer::new("secret", "acter", 60);
        let token = issuer.issue("user-1").unwrap();
        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.iss, "acter");
        assert_eq!(claims.exp, claims.iat + 60);
    }

    #[test]
    fn test_huge_lifetime_saturates() {
        let issuer = TokenIssuer::new("secret", "acter", u64::MAX);
        let token = issuer.issue("user-1").unwrap();
        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.exp, u64::MAX);
    }

    #[test]
    fn test_wrong_secret_or_issuer() {
        let token = TokenIssuer::new("secret", "acter", 60).issue("u").unwrap();
        assert!(TokenIssuer::new("other", "acter", 60).verify(&token).is_err());
        assert!(TokenIssuer::new("secret", "someone", 60).verify(&token).is_err());
    }

    #[test]
    fn test_garbage_token() {
        let issuer = TokenIssuer::new("secret", "acter", 60);
        assert!(matches!(
            issuer.verify("not-a-token"),
            Err(ServiceError::NotAuthenticated(_))
        ));
    }
}
