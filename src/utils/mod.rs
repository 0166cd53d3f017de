use crate::models::{Claims, ServiceError, User};
use actix_web::http::header;
use actix_web::{HttpMessage, HttpRequest};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use lazy_static::lazy_static;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::env;

// JWT utility functions
pub mod jwt {
    use super::*;

    // Get JWT secret from environment or use default
    fn get_jwt_secret() -> String {
        env::var("JWT_SECRET").unwrap_or_else(|_| "zentic_super_secret_key".to_string())
    }

    // Generate a new JWT token for a user
    pub fn generate_token(user: &User) -> Result<String, ServiceError> {
        let secret = get_jwt_secret();
        let expiration = Utc::now()
            .checked_add_signed(Duration::days(7))
            .ok_or(ServiceError::Internal)?
            .timestamp() as usize;

        let claims = Claims {
            sub: user.id.clone(),
            name: user.name.clone(),
            exp: expiration,
            iat: Utc::now().timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
        .map_err(|_| ServiceError::Internal)
    }

    // Validate and decode a JWT token
    pub fn decode_token(token: &str) -> Result<Claims, ServiceError> {
        let secret = get_jwt_secret();

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_ref()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| ServiceError::SessionAbsent)
    }

    // Extract JWT from Authorization header
    pub fn extract_token_from_header(auth_header: &str) -> Result<String, ServiceError> {
        if !auth_header.starts_with("Bearer ") {
            return Err(ServiceError::SessionAbsent);
        }

        Ok(auth_header.trim_start_matches("Bearer ").to_string())
    }
}

// Password utility functions
pub mod password {
    use super::*;

    // Hash a password using bcrypt
    pub fn hash_password(password: &str) -> Result<String, ServiceError> {
        hash(password, DEFAULT_COST).map_err(|_| ServiceError::Internal)
    }

    // Verify a password against a hash
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, ServiceError> {
        verify(password, hash).map_err(|_| ServiceError::Internal)
    }
}

// Input validation helpers
pub mod validation {
    use super::*;

    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email pattern");
    }

    pub const MIN_PASSWORD_LEN: usize = 6;

    pub fn check_email(email: &str) -> Result<(), ServiceError> {
        if !EMAIL_RE.is_match(email) {
            return Err(ServiceError::InvalidInput("malformed email".to_string()));
        }
        Ok(())
    }

    pub fn check_password(password: &str) -> Result<(), ServiceError> {
        if password.len() < MIN_PASSWORD_LEN {
            return Err(ServiceError::InvalidInput(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        Ok(())
    }
}

// Deterministic avatar reference derived from the registered name, so the
// same name always maps to the same picture.
pub mod avatar {
    use super::*;

    pub fn avatar_ref(name: &str) -> String {
        let digest = Sha256::digest(name.to_lowercase().as_bytes());
        let seed: String = digest
            .iter()
            .take(6)
            .map(|b| format!("{:02x}", b))
            .collect();

        format!("https://api.dicebear.com/7.x/avataaars/svg?seed={}", seed)
    }
}

// Resolve the calling user id: claims inserted by the auth middleware win,
// otherwise fall back to decoding the Authorization header directly so
// handlers also work without the middleware wrapping them.
pub fn get_user_id_from_request(req: &HttpRequest) -> Result<String, ServiceError> {
    if let Some(claims) = req.extensions().get::<Claims>() {
        return Ok(claims.sub.clone());
    }

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(ServiceError::SessionAbsent)?;

    let token = jwt::extract_token_from_header(auth_header)?;
    let claims = jwt::decode_token(&token)?;

    Ok(claims.sub)
}

// Middleware for JWT authentication
pub mod auth_middleware {
    use super::*;
    use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
    use actix_web::{error::ErrorUnauthorized, Error};
    use futures::future::{ok, Ready};
    use std::future::Future;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    pub struct Authentication;

    impl<S, B> Transform<S, ServiceRequest> for Authentication
    where
        S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
        S::Future: 'static,
        B: 'static,
    {
        type Response = ServiceResponse<B>;
        type Error = Error;
        type Transform = AuthenticationMiddleware<S>;
        type InitError = ();
        type Future = Ready<Result<Self::Transform, Self::InitError>>;

        fn new_transform(&self, service: S) -> Self::Future {
            ok(AuthenticationMiddleware { service })
        }
    }

    pub struct AuthenticationMiddleware<S> {
        service: S,
    }

    impl<S, B> Service<ServiceRequest> for AuthenticationMiddleware<S>
    where
        S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
        S::Future: 'static,
        B: 'static,
    {
        type Response = ServiceResponse<B>;
        type Error = Error;
        type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

        forward_ready!(service);

        fn call(&self, req: ServiceRequest) -> Self::Future {
            // Get Authorization header
            let auth_header = req.headers().get(header::AUTHORIZATION);

            if let Some(auth_header) = auth_header {
                if let Ok(auth_str) = auth_header.to_str() {
                    if let Ok(token) = jwt::extract_token_from_header(auth_str) {
                        if let Ok(claims) = jwt::decode_token(&token) {
                            // Add the claims to the request extensions
                            req.extensions_mut().insert(claims);
                            let fut = self.service.call(req);
                            return Box::pin(async move { fut.await });
                        }
                    }
                }
            }

            Box::pin(async move { Err(ErrorUnauthorized("Unauthorized")) })
        }
    }
}
