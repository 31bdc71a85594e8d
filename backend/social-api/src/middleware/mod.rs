/// HTTP middleware for the social API.
///
/// Validates the bearer token issued by the auth service and injects the
/// acting user into request extensions. Token issuance and refresh live in
/// the auth service; this layer only validates and trusts the claims.
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{
    error::{ErrorInternalServerError, ErrorUnauthorized},
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::LocalBoxFuture;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use std::rc::Rc;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::AuthUser;

/// Claims carried by tokens from the auth service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub full_name: String,
    #[serde(default)]
    pub profile_pic: Option<String>,
    /// Expiration time (unix timestamp)
    pub exp: i64,
}

/// Validates bearer tokens and resolves the acting user
#[derive(Clone)]
pub struct TokenAuth {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenAuth {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn decode(&self, token: &str) -> Result<AuthUser, AppError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| AppError::Unauthorized)?;

        let id = Uuid::parse_str(&data.claims.sub).map_err(|_| AppError::Unauthorized)?;

        Ok(AuthUser {
            id,
            full_name: data.claims.full_name,
            profile_pic: data.claims.profile_pic,
        })
    }
}

/// Actix middleware that validates a Bearer token and stores the acting
/// user in request extensions.
pub struct JwtAuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct JwtAuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            let token_auth = req
                .app_data::<actix_web::web::Data<TokenAuth>>()
                .cloned()
                .ok_or_else(|| ErrorInternalServerError("Authentication not configured"))?;

            let auth_header = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .ok_or_else(|| ErrorUnauthorized("Missing Authorization header"))?;

            let token = auth_header
                .strip_prefix("Bearer ")
                .ok_or_else(|| ErrorUnauthorized("Invalid Authorization scheme"))?;

            let user = token_auth
                .decode(token)
                .map_err(|_| ErrorUnauthorized("Invalid or expired token"))?;

            req.extensions_mut().insert(user);

            service.call(req).await
        })
    }
}

impl FromRequest for AuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthUser>()
                .cloned()
                .ok_or_else(|| ErrorUnauthorized("User missing from request")),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn issue(secret: &str, claims: &Claims) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_decode_round_trip() {
        let auth = TokenAuth::new("test-secret");
        let user_id = Uuid::new_v4();

        let token = issue(
            "test-secret",
            &Claims {
                sub: user_id.to_string(),
                full_name: "Grace Hopper".to_string(),
                profile_pic: Some("https://cdn.example/pic.png".to_string()),
                exp: (chrono::Utc::now().timestamp()) + 3600,
            },
        );

        let user = auth.decode(&token).unwrap();
        assert_eq!(user.id, user_id);
        assert_eq!(user.full_name, "Grace Hopper");
        assert_eq!(
            user.profile_pic.as_deref(),
            Some("https://cdn.example/pic.png")
        );
    }

    #[test]
    fn test_rejects_wrong_secret() {
        let auth = TokenAuth::new("right-secret");
        let token = issue(
            "wrong-secret",
            &Claims {
                sub: Uuid::new_v4().to_string(),
                full_name: "Mallory".to_string(),
                profile_pic: None,
                exp: (chrono::Utc::now().timestamp()) + 3600,
            },
        );

        assert!(matches!(
            auth.decode(&token),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_rejects_expired_token() {
        let auth = TokenAuth::new("test-secret");
        let token = issue(
            "test-secret",
            &Claims {
                sub: Uuid::new_v4().to_string(),
                full_name: "Late".to_string(),
                profile_pic: None,
                exp: (chrono::Utc::now().timestamp()) - 3600,
            },
        );

        assert!(matches!(auth.decode(&token), Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_rejects_non_uuid_subject() {
        let auth = TokenAuth::new("test-secret");
        let token = issue(
            "test-secret",
            &Claims {
                sub: "not-a-uuid".to_string(),
                full_name: "Odd".to_string(),
                profile_pic: None,
                exp: (chrono::Utc::now().timestamp()) + 3600,
            },
        );

        assert!(matches!(auth.decode(&token), Err(AppError::Unauthorized)));
    }
}
