// Authorization gate for protected routes

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::auth::{error::AuthError, models::Role, token::TokenService};

/// Identity established by a verified token
///
/// Inserted into request extensions by [`require_roles`] and available to
/// handlers as an extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub role: Role,
}

/// Pull the bearer token out of the Authorization header
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::InvalidToken)
}

/// Run the gate: token present, token valid, role allowed
pub fn authorize(
    headers: &HeaderMap,
    tokens: &TokenService,
    allowed: &[Role],
) -> Result<AuthenticatedUser, AuthError> {
    let token = bearer_token(headers)?;
    let claims = tokens.verify(token)?;

    if !allowed.contains(&claims.role) {
        return Err(AuthError::InsufficientPermissions {
            allowed: allowed.to_vec(),
            actual: claims.role,
        });
    }

    Ok(AuthenticatedUser {
        user_id: claims.sub,
        role: claims.role,
    })
}

/// Gate configuration for one group of routes
#[derive(Clone)]
pub struct RoleGate {
    tokens: Arc<TokenService>,
    allowed: &'static [Role],
}

impl RoleGate {
    pub fn new(tokens: Arc<TokenService>, allowed: &'static [Role]) -> Self {
        Self { tokens, allowed }
    }
}

/// Middleware that admits only tokens whose role is in the gate's allow-list
///
/// ```ignore
/// Router::new()
///     .route("/api/admin/users", get(list_users))
///     .route_layer(middleware::from_fn_with_state(
///         RoleGate::new(tokens, Role::ADMIN),
///         require_roles,
///     ));
/// ```
pub async fn require_roles(
    State(gate): State<RoleGate>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let endpoint = request.uri().path().to_string();

    let user = authorize(request.headers(), &gate.tokens, gate.allowed).map_err(|e| {
        warn!("Gate rejected request to {}: {}", endpoint, e);
        e
    })?;

    debug!(
        "Authorization successful: user_id={}, role={}, endpoint={}",
        user.user_id, user.role, endpoint
    );

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    Arc<TokenService>: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(user.clone());
        }

        let tokens = Arc::<TokenService>::from_ref(state);
        authorize(&parts.headers, &tokens, Role::ANY)
    }
}
