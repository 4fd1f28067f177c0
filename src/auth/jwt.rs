use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use super::{Claims, Role};
use crate::{config::AuthConfig, error::AppError};

const INVALID_TOKEN: &str = "Invalid or expired token";

/// HS256 signing keys plus the lifetime given to every issued token.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: u64,
}

impl JwtKeys {
    pub fn new(secret: &[u8], ttl_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl_secs,
        }
    }

    pub fn from_config(cfg: &AuthConfig) -> Self {
        Self::new(cfg.jwt_secret.as_bytes(), cfg.token_ttl_secs)
    }

    /// A signed token for `user_id` holding `roles`, valid for the
    /// configured lifetime.
    pub fn issue(&self, user_id: Uuid, roles: Vec<Role>) -> Result<String, AppError> {
        self.sign(&Claims::for_user(user_id, roles, self.ttl_secs))
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, AppError> {
        let header = Header {
            typ: Some("JWT".to_string()),
            ..Header::new(Algorithm::HS256)
        };
        encode(&header, claims, &self.encoding)
            .map_err(|err| AppError::internal_with_source("Token encoding failed", err))
    }

    /// Claims of a token signed with these keys. Expired, foreign and
    /// malformed tokens are all reported the same way.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|err| {
                tracing::debug!(error = %err, "token rejected");
                AppError::unauthorized(INVALID_TOKEN)
            })
    }
}

impl Claims {
    pub fn for_user(user_id: Uuid, roles: Vec<Role>, ttl_secs: u64) -> Self {
        let iat = Utc::now().timestamp();
        Self {
            sub: user_id,
            iat,
            exp: iat.saturating_add(i64::try_from(ttl_secs).unwrap_or(i64::MAX)),
            roles,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::{JwtKeys, Role};
    use crate::auth::Claims;
    use crate::error::AppError;

    #[test]
    fn claims_carry_subject_roles_and_ttl() {
        let user_id = Uuid::new_v4();
        let claims = Claims::for_user(user_id, vec![Role::User], 60);

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.roles, vec![Role::User]);
        assert_eq!(claims.exp - claims.iat, 60);
    }

    #[test]
    fn issued_token_verifies_with_same_keys() {
        let keys = JwtKeys::new(b"unit-test-secret", 600);
        let user_id = Uuid::new_v4();
        let token = keys
            .issue(user_id, vec![Role::Admin, Role::User])
            .expect("token should encode");

        let claims = keys.verify(&token).expect("token should decode");
        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.roles, vec![Role::Admin, Role::User]);
        assert_eq!(claims.exp - claims.iat, 600);
    }

    #[test]
    fn rejects_expired_foreign_and_garbage_tokens() {
        let keys = JwtKeys::new(b"unit-test-secret", 60);
        let now = Utc::now().timestamp();
        let expired = Claims {
            sub: Uuid::new_v4(),
            iat: now - 7200,
            exp: now - 3600,
            roles: vec![Role::User],
        };
        let token = keys.sign(&expired).expect("token should encode");
        let err = keys.verify(&token).expect_err("expired token");
        assert!(matches!(err, AppError::Unauthorized(_)));

        let other = JwtKeys::new(b"another-secret", 60);
        let token = other
            .issue(Uuid::new_v4(), vec![Role::User])
            .expect("token should encode");
        let err = keys.verify(&token).expect_err("wrong secret");
        assert_eq!(err.message(), "Invalid or expired token");

        assert!(keys.verify("not.a.jwt").is_err());
    }
}
