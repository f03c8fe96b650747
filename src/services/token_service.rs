use crate::utils::AppError;
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Tokens expire exactly one hour after issuance
pub const TOKEN_LIFETIME_SECS: i64 = 60 * 60;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct IdentityClaim {
    pub email: String,
    pub iat: i64, // issued at
    pub exp: i64, // expiration
}

/// Stateless HS256 signer/verifier holding the process-wide secret
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn issue(&self, email: &str) -> Result<String, AppError> {
        self.issue_at(email, Utc::now().timestamp())
    }

    pub fn issue_at(&self, email: &str, issued_at: i64) -> Result<String, AppError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AppError::InvalidRequest("email is required".to_string()));
        }

        let claims = IdentityClaim {
            email: email.to_string(),
            iat: issued_at,
            exp: issued_at + TOKEN_LIFETIME_SECS,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::InvalidToken(format!("Failed to generate token: {}", e)))
    }

    /// Checks signature and expiry. Malformed input is a typed failure, never a panic.
    pub fn verify(&self, token: &str) -> Result<IdentityClaim, AppError> {
        decode::<IdentityClaim>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::Expired,
                _ => AppError::InvalidToken(e.to_string()),
            })
    }
}
