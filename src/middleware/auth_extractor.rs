// src/middleware/auth_extractor.rs
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures::future::{Ready, ready};
use log::error;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::services::session::SessionVerifier;

/// Hasil extractor - user yang sudah terautentikasi.
/// Dipakai sebagai parameter handler; request tanpa sesi valid dijawab 401
/// sebelum handler jalan.
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<AuthenticatedUser, ApiError>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let auth_header = match req.headers().get("Authorization") {
            Some(header) => match header.to_str() {
                Ok(h) => h,
                Err(_) => return ready(Err(ApiError::Unauthorized)),
            },
            None => return ready(Err(ApiError::Unauthorized)),
        };

        if !auth_header.starts_with("Bearer ") {
            return ready(Err(ApiError::Unauthorized));
        }
        let token = auth_header.trim_start_matches("Bearer ").trim();

        let verifier = match req.app_data::<web::Data<SessionVerifier>>() {
            Some(verifier) => verifier,
            None => {
                error!("SessionVerifier missing from app_data");
                return ready(Err(ApiError::Unauthorized));
            }
        };

        ready(verifier.verify(token).map(|session| AuthenticatedUser {
            user_id: session.id,
            email: session.email,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::json;

    const SECRET: &str = "test-jwt-secret";

    fn bearer_token(sub: &str, email: &str) -> String {
        let claims = json!({
            "sub": sub,
            "email": email,
            "aud": "authenticated",
            "exp": chrono::Utc::now().timestamp() + 3600,
        });
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[actix_web::test]
    async fn extracts_user_from_valid_bearer_token() {
        let sub = "7f9c24e5-2f14-4fb3-9c37-5c3c5ab4e6d1";
        let req = TestRequest::default()
            .insert_header((
                "Authorization",
                format!("Bearer {}", bearer_token(sub, "admin@katering.id")),
            ))
            .app_data(web::Data::new(SessionVerifier::new(SECRET)))
            .to_http_request();

        let user = AuthenticatedUser::from_request(&req, &mut Payload::None)
            .await
            .unwrap();
        assert_eq!(user.user_id.to_string(), sub);
        assert_eq!(user.email, "admin@katering.id");
    }

    #[actix_web::test]
    async fn missing_header_is_unauthorized() {
        let req = TestRequest::default()
            .app_data(web::Data::new(SessionVerifier::new(SECRET)))
            .to_http_request();
        let result = AuthenticatedUser::from_request(&req, &mut Payload::None).await;
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }

    #[actix_web::test]
    async fn non_bearer_header_is_unauthorized() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
            .app_data(web::Data::new(SessionVerifier::new(SECRET)))
            .to_http_request();
        let result = AuthenticatedUser::from_request(&req, &mut Payload::None).await;
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }

    #[actix_web::test]
    async fn garbage_token_is_unauthorized() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer not.a.jwt"))
            .app_data(web::Data::new(SessionVerifier::new(SECRET)))
            .to_http_request();
        let result = AuthenticatedUser::from_request(&req, &mut Payload::None).await;
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }
}
