use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::{debug, warn};

use super::{
    jwt::TokenError,
    services::AuthError,
    repo_types::{Role, User},
};
use crate::{error::ApiError, state::AppState};

/// Authenticated account loaded from the store for the bearer token.
///
/// The loaded user is also put into the request extensions so later extractors
/// in the same request reuse it.
pub struct AuthUser(pub User);

/// An authenticated user whose role is `admin` or `super_admin`.
pub struct AdminUser(pub User);

fn bearer_token(parts: &Parts) -> Option<&str> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))?
        .trim();
    (!token.is_empty()).then_some(token)
}

async fn authenticate(parts: &mut Parts, state: &AppState) -> Result<User, ApiError> {
    if let Some(user) = parts.extensions.get::<User>() {
        return Ok(user.clone());
    }

    let token = bearer_token(parts).ok_or_else(|| ApiError::unauthorized("No token provided"))?;

    let user_id = state.jwt.verify_access(token).map_err(|e| {
        debug!(reason = %e, "access token rejected");
        match e {
            TokenError::Expired => ApiError::unauthorized("Token expired"),
            TokenError::Invalid => ApiError::unauthorized("Invalid token"),
        }
    })?;

    let user = state
        .users
        .find_by_id(user_id)
        .await
        .map_err(|e| ApiError::from(AuthError::from(e)))?;
    let Some(user) = user else {
        warn!(%user_id, "token for deleted user");
        return Err(ApiError::unauthorized("User not found"));
    };

    parts.extensions.insert(user.clone());
    Ok(user)
}

/// Admits the request only if the identity holds one of `allowed`.
pub fn authorize(user: Option<&User>, allowed: &[Role]) -> Result<(), ApiError> {
    let user = user.ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;
    if allowed.iter().any(|role| user.role.satisfies(*role)) {
        Ok(())
    } else {
        warn!(user_id = %user.id, role = %user.role, "insufficient permissions");
        Err(ApiError::Forbidden(
            "Access denied. Insufficient permissions.".into(),
        ))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, state).await.map(AuthUser)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = authenticate(parts, state).await?;
        authorize(Some(&user), &[Role::Admin, Role::SuperAdmin])?;
        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{Request, StatusCode};

    use super::*;
    use crate::auth::password::PasswordDigest;

    fn user(role: Role) -> User {
        let now = time::OffsetDateTime::now_utc();
        User {
            id: uuid::Uuid::new_v4(),
            email: "someone@codingcouncil.com".into(),
            name: "Someone".into(),
            role,
            avatar: None,
            password_hash: PasswordDigest::from_stored("$argon2id$stub".into()),
            refresh_token: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn parts(auth: Option<&str>) -> Parts {
        let mut req = Request::builder().uri("/api/v1/auth/me");
        if let Some(value) = auth {
            req = req.header(AUTHORIZATION, value);
        }
        req.body(()).unwrap().into_parts().0
    }

    #[test]
    fn bearer_token_requires_scheme_and_value() {
        assert_eq!(bearer_token(&parts(Some("Bearer abc"))), Some("abc"));
        assert_eq!(bearer_token(&parts(Some("bearer abc"))), Some("abc"));
        assert_eq!(bearer_token(&parts(Some("Basic abc"))), None);
        assert_eq!(bearer_token(&parts(Some("Bearer "))), None);
        assert_eq!(bearer_token(&parts(None)), None);
    }

    #[test]
    fn missing_identity_is_unauthenticated() {
        let err = authorize(None, &[Role::Admin]).unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "Not authenticated");
    }

    #[test]
    fn super_admin_passes_admin_gate() {
        assert!(authorize(Some(&user(Role::SuperAdmin)), &[Role::Admin]).is_ok());
        assert!(authorize(Some(&user(Role::Admin)), &[Role::Admin]).is_ok());
    }

    #[test]
    fn admin_fails_super_admin_gate() {
        let err = authorize(Some(&user(Role::Admin)), &[Role::SuperAdmin]).unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert_eq!(err.to_string(), "Access denied. Insufficient permissions.");
    }

    #[test]
    fn empty_allow_list_admits_nobody() {
        let err = authorize(Some(&user(Role::SuperAdmin)), &[]).unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }
}
