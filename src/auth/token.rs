// JWT token generation and validation service

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::auth::{error::AuthError, models::Role};

/// Session tokens live for 8 hours
pub const TOKEN_TTL_SECONDS: i64 = 8 * 60 * 60;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,        // user_id
    pub role: Role,
    pub iat: i64,        // issued at timestamp
    pub exp: i64,        // expiration timestamp
}

/// Token service for JWT operations
///
/// Verification is stateless: nothing is stored per token and nothing can
/// revoke one before `exp`.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: i64,
}

impl TokenService {
    /// Create a new TokenService issuing 8-hour tokens
    pub fn new(secret: &str) -> Self {
        Self::with_ttl(secret, TOKEN_TTL_SECONDS)
    }

    /// Create a TokenService with a custom lifetime in seconds
    pub fn with_ttl(secret: &str, ttl_seconds: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_seconds,
        }
    }

    /// Issue a signed token asserting `user_id` and `role`
    pub fn issue(&self, user_id: i32, role: Role) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            role,
            iat: now,
            exp: now + self.ttl_seconds,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenGenerationError(e.to_string()))
    }

    /// Verify a token and return its claims
    ///
    /// Fails on malformed input, a bad signature, or expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => AuthError::InvalidToken,
            })
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TEST_SECRET: &str = "test_secret_key_for_testing_purposes";

    // Helper to create a test token service
    fn test_token_service() -> TokenService {
        TokenService::new(TEST_SECRET)
    }

    fn any_role() -> impl Strategy<Value = Role> {
        prop::sample::select(Role::ANY.to_vec())
    }

    #[test]
    fn test_token_expiration_is_8_hours() {
        let service = test_token_service();
        let token = service.issue(1, Role::User).unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, 28_800, "Tokens should expire in exactly 8 hours");
    }

    #[test]
    fn test_token_claims_contain_identity_and_role() {
        let service = test_token_service();
        let token = service.issue(42, Role::ProjectManager).unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, Role::ProjectManager);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = TokenService::with_ttl(TEST_SECRET, -600);
        let token = service.issue(1, Role::Admin).unwrap();

        assert!(matches!(service.verify(&token), Err(AuthError::ExpiredToken)));
        // A fresh verifier with the same secret agrees
        assert!(matches!(test_token_service().verify(&token), Err(AuthError::ExpiredToken)));
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        let service = test_token_service();

        assert!(matches!(service.verify(""), Err(AuthError::InvalidToken)));
        assert!(matches!(service.verify("not.a.token"), Err(AuthError::InvalidToken)));
        assert!(matches!(service.verify("invalid_token_format"), Err(AuthError::InvalidToken)));
        assert!(service
            .verify("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.invalid.signature")
            .is_err());
    }

    #[test]
    fn test_token_signature_verification() {
        let service1 = TokenService::new("secret1");
        let service2 = TokenService::new("secret2");

        let token = service1.issue(1, Role::Admin).unwrap();

        assert!(service1.verify(&token).is_ok());
        assert!(matches!(service2.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_tampered_role_is_rejected() {
        let service = test_token_service();
        let token = service.issue(5, Role::User).unwrap();

        // Re-sign the same claims with a different key and splice the payload
        let forged = TokenService::new("attacker").issue(5, Role::Admin).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        let spliced = format!("{}.{}.{}", parts[0], forged_parts[1], parts[2]);

        assert!(service.verify(&spliced).is_err());
    }

    #[test]
    fn test_unknown_role_claim_is_rejected() {
        use jsonwebtoken::{encode, EncodingKey, Header};
        use serde_json::json;

        let now = Utc::now().timestamp();
        let token = encode(
            &Header::default(),
            &json!({ "sub": 1, "role": "owner", "iat": now, "exp": now + 60 }),
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(test_token_service().verify(&token), Err(AuthError::InvalidToken)));
    }

    proptest! {
        #[test]
        fn prop_verify_returns_issued_identity(user_id in 1i32..1_000_000, role in any_role()) {
            let service = test_token_service();
            let token = service.issue(user_id, role)?;
            let claims = service.verify(&token)?;

            prop_assert_eq!(claims.sub, user_id);
            prop_assert_eq!(claims.role, role);
            prop_assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECONDS);
        }

        #[test]
        fn prop_expired_tokens_fail(user_id in 1i32..1_000_000, role in any_role(), age in 1i64..100_000) {
            let issuer = TokenService::with_ttl(TEST_SECRET, -age);
            let token = issuer.issue(user_id, role)?;

            prop_assert!(test_token_service().verify(&token).is_err());
        }

        #[test]
        fn prop_malformed_tokens_rejected(malformed in "[a-zA-Z0-9]{10,50}") {
            let service = test_token_service();
            prop_assert!(service.verify(&malformed).is_err());
        }
    }
}
