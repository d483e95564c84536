// src/services/session.rs - verifikasi access token Supabase jadi identitas sesi
use std::env;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use log::debug;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::ApiError;

/// Identitas hasil sesi yang terverifikasi: `{id, email}`.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    email: Option<String>,
    #[allow(dead_code)]
    exp: usize,
}

/// Memverifikasi JWT (HS256) yang diterbitkan Supabase Auth.
/// Secret dibaca sekali saat startup; tidak ada panggilan jaringan per request.
#[derive(Clone)]
pub struct SessionVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl SessionVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // token user Supabase selalu ber-aud "authenticated"
        validation.set_audience(&["authenticated"]);
        SessionVerifier {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn new_from_env() -> Self {
        let secret = env::var("SUPABASE_JWT_SECRET").expect("SUPABASE_JWT_SECRET is required");
        Self::new(secret.trim())
    }

    /// Token valid dan belum kedaluwarsa -> `SessionUser`, selain itu 401.
    pub fn verify(&self, token: &str) -> Result<SessionUser, ApiError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|err| {
            debug!("token rejected: {}", err);
            ApiError::Unauthorized
        })?;

        let id = Uuid::parse_str(&data.claims.sub).map_err(|_| {
            debug!("token sub is not a uuid: {}", data.claims.sub);
            ApiError::Unauthorized
        })?;

        let email = match data.claims.email {
            Some(email) if !email.trim().is_empty() => email,
            _ => {
                debug!("token has no email claim");
                return Err(ApiError::Unauthorized);
            }
        };

        Ok(SessionUser { id, email })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde::Serialize;

    const SECRET: &str = "test-jwt-secret";

    #[derive(Serialize)]
    struct TestClaims {
        sub: String,
        email: Option<String>,
        aud: String,
        exp: i64,
    }

    fn token(claims: &TestClaims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn valid_claims() -> TestClaims {
        TestClaims {
            sub: "0be06a3c-4d0e-4b1c-a3f5-9a4f9d2a1d55".to_string(),
            email: Some("admin@katering.id".to_string()),
            aud: "authenticated".to_string(),
            exp: chrono::Utc::now().timestamp() + 3600,
        }
    }

    #[test]
    fn accepts_valid_token() {
        let verifier = SessionVerifier::new(SECRET);
        let user = verifier.verify(&token(&valid_claims(), SECRET)).unwrap();
        assert_eq!(user.email, "admin@katering.id");
        assert_eq!(
            user.id.to_string(),
            "0be06a3c-4d0e-4b1c-a3f5-9a4f9d2a1d55"
        );
    }

    #[test]
    fn rejects_wrong_secret() {
        let verifier = SessionVerifier::new(SECRET);
        let result = verifier.verify(&token(&valid_claims(), "other-secret"));
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }

    #[test]
    fn rejects_expired_token() {
        let verifier = SessionVerifier::new(SECRET);
        let mut claims = valid_claims();
        claims.exp = chrono::Utc::now().timestamp() - 3600;
        let result = verifier.verify(&token(&claims, SECRET));
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }

    #[test]
    fn rejects_token_without_email() {
        let verifier = SessionVerifier::new(SECRET);
        let mut claims = valid_claims();
        claims.email = None;
        let result = verifier.verify(&token(&claims, SECRET));
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }

    #[test]
    fn rejects_non_uuid_subject() {
        let verifier = SessionVerifier::new(SECRET);
        let mut claims = valid_claims();
        claims.sub = "service-role".to_string();
        let result = verifier.verify(&token(&claims, SECRET));
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }
}
