use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    HttpMessage,
};
use futures_util::future::LocalBoxFuture;
use log::warn;

use self::jwt::JwtKeys;

/// Resolves a `Bearer` token into an [`OwnerIdentity`](super::session::OwnerIdentity)
/// stored in the request extensions.
///
/// Requests without an `Authorization` header pass through untouched, which
/// is how guests reach the read and reserve routes. A header that is present
/// but malformed, forged or expired is refused outright.
pub struct AuthMiddleware {
    keys: Rc<JwtKeys>,
}

impl AuthMiddleware {
    pub fn new(keys: JwtKeys) -> Self {
        Self { keys: Rc::new(keys) }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            keys: self.keys.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    keys: Rc<JwtKeys>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match jwt::parse_request(&req, "Bearer ") {
            Ok(None) => {}
            Ok(Some(token)) => match self.keys.decode(&token) {
                Ok(identity) => {
                    req.extensions_mut().insert(identity);
                }
                Err(err) => {
                    warn!("rejected token on {} {}", req.method(), req.uri());
                    return Box::pin(async move { Err(actix_web::Error::from(err)) });
                }
            },
            Err(err) => {
                return Box::pin(async move { Err(actix_web::Error::from(err)) });
            }
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res)
        })
    }
}

pub mod jwt {
    use actix_web::dev::ServiceRequest;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
    use log::debug;
    use uuid::Uuid;

    use crate::{dto::Claims, errors::AppError, service::session::OwnerIdentity};

    /// Signing material for identity tokens.
    #[derive(Clone)]
    pub struct JwtKeys {
        encoding: EncodingKey,
        decoding: DecodingKey,
    }

    impl JwtKeys {
        pub fn from_secret(secret: &str) -> Self {
            Self {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
            }
        }

        /// Issues a token for `owner_id` valid for `ttl`.
        pub fn create(&self, owner_id: &Uuid, ttl: Duration) -> Result<String, AppError> {
            let exp = (Utc::now() + ttl).timestamp().max(0) as usize;
            let claims = Claims::new(owner_id, exp);
            encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|err| {
                debug!("token encoding failed: {:?}", err);
                AppError::InvalidToken
            })
        }

        /// Checks signature and expiry and yields the identity in `sub`.
        pub fn decode(&self, token: &str) -> Result<OwnerIdentity, AppError> {
            let validation = Validation::new(Algorithm::HS256);
            match decode::<Claims>(token, &self.decoding, &validation) {
                Ok(data) => Ok(OwnerIdentity::new(data.claims.sub)),
                Err(err) => {
                    debug!("token decoding failed: {:?}", err);
                    Err(AppError::InvalidToken)
                }
            }
        }
    }

    /// `Ok(None)` when there is no `Authorization` header at all.
    pub fn parse_request(req: &ServiceRequest, prefix: &str) -> Result<Option<String>, AppError> {
        let Some(auth_header) = req.headers().get("Authorization") else {
            return Ok(None);
        };
        let token = auth_header
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix(prefix))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AppError::InvalidToken)?;
        Ok(Some(token.to_string()))
    }

}
