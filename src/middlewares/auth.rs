use crate::error::{AppError, AppResult};
use crate::utils::{JwtService, Role};
use actix_web::http::Method;
use actix_web::{
    Error, HttpMessage, HttpRequest,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};

/// Caller identity resolved once per request from the bearer token.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: i64,
    pub role: Role,
}

impl AuthUser {
    pub fn require_member(self) -> AppResult<i64> {
        if self.role == Role::Member {
            Ok(self.id)
        } else {
            Err(AppError::Forbidden(
                "Only members can perform this action".to_string(),
            ))
        }
    }

    pub fn require_admin(self) -> AppResult<i64> {
        if self.role == Role::Admin {
            Ok(self.id)
        } else {
            Err(AppError::Forbidden(
                "Only admin users can perform this action".to_string(),
            ))
        }
    }

    pub fn require_staff(self) -> AppResult<i64> {
        if self.role.is_staff() {
            Ok(self.id)
        } else {
            Err(AppError::Forbidden(
                "Only staff can perform this action".to_string(),
            ))
        }
    }
}

/// Pulls the identity the middleware stored in request extensions.
pub fn auth_user(req: &HttpRequest) -> AppResult<AuthUser> {
    req.extensions()
        .get::<AuthUser>()
        .copied()
        .ok_or_else(|| AppError::AuthError("Missing access token".to_string()))
}

struct PublicPaths {
    exact_paths: Vec<&'static str>,
    prefix_paths: Vec<&'static str>,
    excluded_paths: Vec<&'static str>,
    // read-only catalog and review endpoints stay public
    public_get_prefixes: Vec<&'static str>,
}

impl PublicPaths {
    fn new() -> Self {
        Self {
            exact_paths: vec!["/swagger-ui", "/swagger-ui/", "/api-docs/openapi.json"],
            prefix_paths: vec!["/swagger-ui/", "/api-docs/", "/api/account/", "/images/"],
            // authenticated even though they live under a public prefix
            excluded_paths: vec!["/api/account/profile", "/api/account/refresh"],
            public_get_prefixes: vec!["/api/books", "/api/reviews/"],
        }
    }

    fn is_public(&self, method: &Method, path: &str) -> bool {
        if self
            .excluded_paths
            .iter()
            .any(|&excluded| path.starts_with(excluded))
        {
            return false;
        }

        if self.exact_paths.contains(&path) {
            return true;
        }

        if self
            .prefix_paths
            .iter()
            .any(|&prefix| path.starts_with(prefix))
        {
            return true;
        }

        method == Method::GET
            && self
                .public_get_prefixes
                .iter()
                .any(|&prefix| path.starts_with(prefix))
    }
}

pub struct AuthMiddleware {
    jwt_service: JwtService,
}

impl AuthMiddleware {
    pub fn new(jwt_service: JwtService) -> Self {
        Self { jwt_service }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            jwt_service: self.jwt_service.clone(),
            public_paths: PublicPaths::new(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    jwt_service: JwtService,
    public_paths: PublicPaths,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // let CORS preflights through
        if req.method() == Method::OPTIONS {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let is_public = self.public_paths.is_public(req.method(), req.path());

        let token = req
            .headers()
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::to_owned);

        if let Some(token) = token {
            match self.jwt_service.verify_access_token(&token) {
                Ok(claims) => {
                    let Ok(id) = claims.sub.parse::<i64>() else {
                        let error = AppError::AuthError("Invalid token subject".to_string());
                        return Box::pin(async move { Err(error.into()) });
                    };
                    req.extensions_mut().insert(AuthUser {
                        id,
                        role: claims.role,
                    });
                    let fut = self.service.call(req);
                    Box::pin(fut)
                }
                // a bad token on a public path falls back to anonymous access
                Err(_) if is_public => {
                    let fut = self.service.call(req);
                    Box::pin(fut)
                }
                Err(_) => {
                    let error = AppError::AuthError("Invalid access token".to_string());
                    Box::pin(async move { Err(error.into()) })
                }
            }
        } else if is_public {
            let fut = self.service.call(req);
            Box::pin(fut)
        } else {
            let error = AppError::AuthError("Missing access token".to_string());
            Box::pin(async move { Err(error.into()) })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_reads_are_public() {
        let paths = PublicPaths::new();
        assert!(paths.is_public(&Method::GET, "/api/books"));
        assert!(paths.is_public(&Method::GET, "/api/books/7"));
        assert!(paths.is_public(&Method::GET, "/api/books/filter"));
        assert!(paths.is_public(&Method::GET, "/api/reviews/book/7"));
        assert!(paths.is_public(&Method::GET, "/api/reviews/3"));
    }

    #[test]
    fn test_catalog_writes_are_not_public() {
        let paths = PublicPaths::new();
        assert!(!paths.is_public(&Method::POST, "/api/books"));
        assert!(!paths.is_public(&Method::DELETE, "/api/books/7"));
        assert!(!paths.is_public(&Method::PUT, "/api/books/genres/1"));
        assert!(!paths.is_public(&Method::POST, "/api/reviews"));
    }

    #[test]
    fn test_account_routes_public_except_profile_and_refresh() {
        let paths = PublicPaths::new();
        assert!(paths.is_public(&Method::POST, "/api/account/login"));
        assert!(paths.is_public(&Method::POST, "/api/account/signup"));
        assert!(!paths.is_public(&Method::GET, "/api/account/profile"));
        assert!(!paths.is_public(&Method::POST, "/api/account/refresh"));
    }

    #[test]
    fn test_member_routes_require_auth() {
        let paths = PublicPaths::new();
        assert!(!paths.is_public(&Method::GET, "/api/cart"));
        assert!(!paths.is_public(&Method::POST, "/api/orders"));
        assert!(!paths.is_public(&Method::GET, "/api/announcements/my"));
    }
}
