//! JWT issuing and verification.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tasknote_common::config::AuthConfig;
use tasknote_common::{AppError, AppResult, IdGenerator};
use tracing::debug;

/// Which half of a token pair a token is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
    pub token_type: TokenType,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Signs and checks HS256 tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
    id_gen: IdGenerator,
}

impl TokenService {
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.as_bytes();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            access_ttl_secs: config.access_token_ttl_secs,
            refresh_ttl_secs: config.refresh_token_ttl_secs,
            id_gen: IdGenerator::new(),
        }
    }

    /// Issue a fresh access/refresh pair for a user.
    pub fn issue_pair(&self, user_id: &str) -> AppResult<TokenPair> {
        Ok(TokenPair {
            access: self.issue(user_id, TokenType::Access)?,
            refresh: self.issue(user_id, TokenType::Refresh)?,
        })
    }

    /// Exchange a refresh token for a new access token.
    pub fn refresh(&self, refresh_token: &str) -> AppResult<String> {
        let claims = self.verify(refresh_token)?;
        if claims.token_type != TokenType::Refresh {
            return Err(AppError::Unauthorized);
        }
        self.issue(&claims.sub, TokenType::Access)
    }

    /// Verify a bearer token. Refresh tokens are refused.
    pub fn verify_access(&self, token: &str) -> AppResult<Claims> {
        let claims = self.verify(token)?;
        if claims.token_type != TokenType::Access {
            return Err(AppError::Unauthorized);
        }
        Ok(claims)
    }

    /// Verify signature and expiry of any token this service issued.
    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "Token rejected");
                AppError::Unauthorized
            })
    }

    fn issue(&self, user_id: &str, token_type: TokenType) -> AppResult<String> {
        let ttl = match token_type {
            TokenType::Access => self.access_ttl_secs,
            TokenType::Refresh => self.refresh_ttl_secs,
        };
        let iat = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: iat + ttl,
            iat,
            jti: self.id_gen.generate_token(),
            token_type,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            access_token_ttl_secs: 300,
            refresh_token_ttl_secs: 86_400,
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let tokens = TokenService::new(&config("secret"));
        let pair = tokens.issue_pair("u1").unwrap();

        let claims = tokens.verify_access(&pair.access).unwrap();
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.token_type, TokenType::Access);
        assert_eq!(claims.exp - claims.iat, 300);
    }

    #[test]
    fn test_refresh_token_is_not_a_bearer_token() {
        let tokens = TokenService::new(&config("secret"));
        let pair = tokens.issue_pair("u1").unwrap();

        assert!(matches!(
            tokens.verify_access(&pair.refresh),
            Err(AppError::Unauthorized)
        ));
        assert!(tokens.verify(&pair.refresh).is_ok());
    }

    #[test]
    fn test_refresh() {
        let tokens = TokenService::new(&config("secret"));
        let pair = tokens.issue_pair("u1").unwrap();

        let access = tokens.refresh(&pair.refresh).unwrap();
        assert_eq!(tokens.verify_access(&access).unwrap().sub, "u1");

        // An access token can't be used to refresh.
        assert!(tokens.refresh(&pair.access).is_err());
    }

    #[test]
    fn test_foreign_signature() {
        let ours = TokenService::new(&config("secret"));
        let theirs = TokenService::new(&config("other"));
        let pair = theirs.issue_pair("u1").unwrap();

        assert!(ours.verify(&pair.access).is_err());
        assert!(ours.verify("garbage").is_err());
    }

    #[test]
    fn test_expired() {
        let tokens = TokenService::new(&AuthConfig {
            access_token_ttl_secs: -10,
            ..config("secret")
        });
        let pair = tokens.issue_pair("u1").unwrap();
        assert!(tokens.verify_access(&pair.access).is_err());
    }
}
