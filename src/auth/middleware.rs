//! Authentication middleware
//!
//! Extracts and validates JWT tokens from requests.

use crate::auth::Claims;
use crate::error::AppError;
use crate::state::SharedState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    typed_header::TypedHeaderRejection,
    TypedHeader,
};
use tracing::debug;
use uuid::Uuid;

/// Validate the bearer token and expose its claims to handlers
pub async fn auth_middleware(
    State(state): State<SharedState>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.map_err(|e| {
        if e.is_missing() {
            AppError::Unauthorized("Missing authorization header".to_string())
        } else {
            AppError::Unauthorized("Invalid authorization format".to_string())
        }
    })?;

    let claims = state.tokens.decode(bearer.token())?;
    debug!("Authenticated user {}", claims.sub);

    // Insert claims into request extensions for handlers to use
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

/// Require the caller to be a configured administrator
pub fn require_admin(claims: &Claims, admin_user_ids: &[Uuid]) -> Result<(), AppError> {
    if admin_user_ids.contains(&claims.sub) {
        Ok(())
    } else {
        Err(AppError::Forbidden("Requires admin access".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_for(sub: Uuid) -> Claims {
        Claims {
            sub,
            email: None,
            role: Some("authenticated".to_string()),
            aud: Some("authenticated".to_string()),
            exp: 0,
            iat: None,
        }
    }

    #[test]
    fn test_require_admin() {
        let admin = Uuid::new_v4();
        let admins = vec![admin];

        assert!(require_admin(&claims_for(admin), &admins).is_ok());
        assert!(matches!(
            require_admin(&claims_for(Uuid::new_v4()), &admins),
            Err(AppError::Forbidden(_))
        ));
        assert!(require_admin(&claims_for(admin), &[]).is_err());
    }
}
