use thiserror::Error;
use time::OffsetDateTime;
use tracing::{info, warn};

use super::{
    dto::{LoginResponse, PublicUser},
    jwt::JwtKeys,
    password::{spawn_hash, spawn_verify},
    repo::UserStore,
    repo_types::{NewUser, Role, User},
};
use crate::{
    config::AdminConfig,
    db::StoreError,
    error::ApiError,
    validation::normalize_email,
};

#[derive(Debug, Error)]
pub enum AuthError {
    /// Same message for unknown email and wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Invalid refresh token")]
    InvalidRefreshToken,
    #[error("Invalid current password")]
    InvalidCurrentPassword,
    #[error("Email already in use")]
    EmailInUse,
    #[error("User not found")]
    UserNotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate => AuthError::EmailInUse,
            StoreError::Backend(e) => AuthError::Internal(e),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials
            | AuthError::InvalidRefreshToken
            | AuthError::InvalidCurrentPassword
            | AuthError::UserNotFound => ApiError::Unauthorized(e.to_string()),
            AuthError::EmailInUse => ApiError::Conflict(e.to_string()),
            AuthError::Internal(e) => ApiError::Internal(e),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Created,
    AlreadyPresent,
}

/// Creates the bootstrap super admin unless an account with that email exists.
pub async fn seed_admin(
    users: &dyn UserStore,
    admin: &AdminConfig,
) -> Result<SeedOutcome, AuthError> {
    let email = normalize_email(&admin.email);
    if users.find_by_email(&email).await?.is_some() {
        info!(email = %email, "admin user already exists");
        return Ok(SeedOutcome::AlreadyPresent);
    }

    let password_hash = spawn_hash(admin.password.clone()).await?;
    let new_user = NewUser {
        email: email.clone(),
        name: "Admin".into(),
        role: Role::SuperAdmin,
        password_hash,
    };
    match users.insert(new_user).await {
        Ok(user) => {
            info!(user_id = %user.id, email = %email, "admin user created");
            Ok(SeedOutcome::Created)
        }
        // another instance won the race
        Err(StoreError::Duplicate) => Ok(SeedOutcome::AlreadyPresent),
        Err(e) => Err(e.into()),
    }
}

pub async fn login(
    users: &dyn UserStore,
    keys: &JwtKeys,
    email: &str,
    password: &str,
) -> Result<LoginResponse, AuthError> {
    let email = normalize_email(email);
    let Some(mut user) = users.find_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(AuthError::InvalidCredentials);
    };

    if !spawn_verify(password.to_string(), user.password_hash.clone()).await? {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(AuthError::InvalidCredentials);
    }

    let access_token = keys.issue_access_token(user.id)?;
    let refresh_token = keys.issue_refresh_token(user.id)?;
    let now = OffsetDateTime::now_utc();
    users.record_login(user.id, now, &refresh_token).await?;
    user.last_login = Some(now);

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(LoginResponse {
        user: PublicUser::from(&user),
        access_token,
        refresh_token,
    })
}

/// Mints a new access token for a refresh token that is still the stored one.
pub async fn refresh(
    users: &dyn UserStore,
    keys: &JwtKeys,
    refresh_token: &str,
) -> Result<String, AuthError> {
    let user_id = keys.verify_refresh(refresh_token).map_err(|e| {
        warn!(reason = %e, "refresh token rejected");
        AuthError::InvalidRefreshToken
    })?;

    let user = users
        .find_by_id(user_id)
        .await?
        .ok_or(AuthError::InvalidRefreshToken)?;

    if user.refresh_token.as_deref() != Some(refresh_token) {
        warn!(user_id = %user.id, "refresh token superseded or revoked");
        return Err(AuthError::InvalidRefreshToken);
    }

    Ok(keys.issue_access_token(user.id)?)
}

pub async fn logout(users: &dyn UserStore, user: &User) -> Result<(), AuthError> {
    users.clear_refresh_token(user.id).await?;
    info!(user_id = %user.id, "user logged out");
    Ok(())
}

/// Expects already validated input; `email` must be normalized.
pub async fn update_profile(
    users: &dyn UserStore,
    user: &User,
    name: Option<&str>,
    email: Option<&str>,
) -> Result<User, AuthError> {
    if let Some(email) = email {
        if let Some(existing) = users.find_by_email(email).await? {
            if existing.id != user.id {
                warn!(user_id = %user.id, "profile email already taken");
                return Err(AuthError::EmailInUse);
            }
        }
    }
    let updated = users
        .update_profile(user.id, name, email)
        .await?
        .ok_or(AuthError::UserNotFound)?;
    info!(user_id = %updated.id, "profile updated");
    Ok(updated)
}

/// On success every outstanding refresh token of the user stops working.
pub async fn change_password(
    users: &dyn UserStore,
    user: &User,
    current_password: &str,
    new_password: &str,
) -> Result<(), AuthError> {
    if !spawn_verify(current_password.to_string(), user.password_hash.clone()).await? {
        warn!(user_id = %user.id, "password change with wrong current password");
        return Err(AuthError::InvalidCurrentPassword);
    }
    let hash = spawn_hash(new_password.to_string()).await?;
    users.update_password(user.id, &hash).await?;
    info!(user_id = %user.id, "password changed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::password::verify_password, testing::MemoryStore};
    use std::time::Duration;

    fn admin_config() -> AdminConfig {
        AdminConfig {
            email: "admin@codingcouncil.com".into(),
            password: "admin123".into(),
        }
    }

    fn keys() -> JwtKeys {
        JwtKeys::new(&crate::config::JwtConfig {
            secret: "test-secret".into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
            access_ttl: Duration::from_secs(15 * 60),
            refresh_ttl: Duration::from_secs(7 * 24 * 3600),
        })
    }

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::default();
        seed_admin(&store, &admin_config()).await.unwrap();
        store
    }

    async fn stored_admin(store: &MemoryStore) -> User {
        store
            .find_by_email("admin@codingcouncil.com")
            .await
            .unwrap()
            .expect("seeded admin")
    }

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let store = MemoryStore::default();
        assert_eq!(seed_admin(&store, &admin_config()).await.unwrap(), SeedOutcome::Created);
        assert_eq!(
            seed_admin(&store, &admin_config()).await.unwrap(),
            SeedOutcome::AlreadyPresent
        );
        assert_eq!(store.user_count().await, 1);

        let admin = stored_admin(&store).await;
        assert_eq!(admin.role, Role::SuperAdmin);
        assert_ne!(admin.password_hash.as_str(), "admin123");
        assert!(verify_password("admin123", &admin.password_hash).unwrap());
    }

    #[tokio::test]
    async fn login_returns_token_pair_and_stores_refresh_token() {
        let store = seeded().await;
        let keys = keys();
        let res = login(&store, &keys, "Admin@CodingCouncil.com ", "admin123")
            .await
            .unwrap();
        assert_eq!(res.user.email, "admin@codingcouncil.com");
        assert_eq!(res.user.role, Role::SuperAdmin);
        assert!(res.user.last_login.is_some());

        let admin = stored_admin(&store).await;
        assert_eq!(keys.verify_access(&res.access_token), Ok(admin.id));
        assert_eq!(admin.refresh_token.as_deref(), Some(res.refresh_token.as_str()));
        assert!(admin.last_login.is_some());
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let store = seeded().await;
        let keys = keys();
        let wrong = login(&store, &keys, "admin@codingcouncil.com", "nope")
            .await
            .unwrap_err();
        let unknown = login(&store, &keys, "ghost@codingcouncil.com", "admin123")
            .await
            .unwrap_err();
        assert_eq!(wrong.to_string(), unknown.to_string());

        let (wrong, unknown) = (ApiError::from(wrong), ApiError::from(unknown));
        assert_eq!(wrong.status(), unknown.status());
        assert_eq!(wrong.to_string(), "Invalid credentials");
    }

    #[tokio::test]
    async fn refresh_mints_access_token_only() {
        let store = seeded().await;
        let keys = keys();
        let session = login(&store, &keys, "admin@codingcouncil.com", "admin123")
            .await
            .unwrap();
        let access = refresh(&store, &keys, &session.refresh_token).await.unwrap();
        let admin = stored_admin(&store).await;
        assert_eq!(keys.verify_access(&access), Ok(admin.id));
        assert_eq!(admin.refresh_token.as_deref(), Some(session.refresh_token.as_str()));
    }

    #[tokio::test]
    async fn second_login_supersedes_first_refresh_token() {
        let store = seeded().await;
        let keys = keys();
        let first = login(&store, &keys, "admin@codingcouncil.com", "admin123")
            .await
            .unwrap();
        let second = login(&store, &keys, "admin@codingcouncil.com", "admin123")
            .await
            .unwrap();

        let err = refresh(&store, &keys, &first.refresh_token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidRefreshToken));
        assert!(refresh(&store, &keys, &second.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn logout_revokes_refresh_token() {
        let store = seeded().await;
        let keys = keys();
        let session = login(&store, &keys, "admin@codingcouncil.com", "admin123")
            .await
            .unwrap();
        logout(&store, &stored_admin(&store).await).await.unwrap();

        let err = refresh(&store, &keys, &session.refresh_token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidRefreshToken));
    }

    #[tokio::test]
    async fn access_token_cannot_be_used_to_refresh() {
        let store = seeded().await;
        let keys = keys();
        let session = login(&store, &keys, "admin@codingcouncil.com", "admin123")
            .await
            .unwrap();
        let err = refresh(&store, &keys, &session.access_token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidRefreshToken));
    }

    #[tokio::test]
    async fn wrong_current_password_changes_nothing() {
        let store = seeded().await;
        let keys = keys();
        let session = login(&store, &keys, "admin@codingcouncil.com", "admin123")
            .await
            .unwrap();
        let before = stored_admin(&store).await;

        let err = change_password(&store, &before, "not-it", "brand-new-pass")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCurrentPassword));

        let after = stored_admin(&store).await;
        assert_eq!(after.password_hash, before.password_hash);
        assert_eq!(after.refresh_token.as_deref(), Some(session.refresh_token.as_str()));
    }

    #[tokio::test]
    async fn password_change_rehashes_and_forces_relogin() {
        let store = seeded().await;
        let keys = keys();
        let session = login(&store, &keys, "admin@codingcouncil.com", "admin123")
            .await
            .unwrap();
        let admin = stored_admin(&store).await;

        change_password(&store, &admin, "admin123", "brand-new-pass")
            .await
            .unwrap();

        let after = stored_admin(&store).await;
        assert!(after.refresh_token.is_none());
        assert!(verify_password("brand-new-pass", &after.password_hash).unwrap());
        assert!(refresh(&store, &keys, &session.refresh_token).await.is_err());
        assert!(login(&store, &keys, "admin@codingcouncil.com", "admin123")
            .await
            .is_err());
        assert!(login(&store, &keys, "admin@codingcouncil.com", "brand-new-pass")
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn profile_update_keeps_password_hash() {
        let store = seeded().await;
        let admin = stored_admin(&store).await;
        let updated = update_profile(&store, &admin, Some("Council Admin"), None)
            .await
            .unwrap();
        assert_eq!(updated.name, "Council Admin");
        assert_eq!(updated.password_hash, admin.password_hash);
    }

    #[tokio::test]
    async fn profile_email_collision_is_conflict() {
        let store = seeded().await;
        let other = store
            .insert(NewUser {
                email: "editor@codingcouncil.com".into(),
                name: "Editor".into(),
                role: Role::Admin,
                password_hash: crate::auth::password::hash_password("editor-pass").unwrap(),
            })
            .await
            .unwrap();

        let err = update_profile(&store, &other, None, Some("admin@codingcouncil.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailInUse));
        assert_eq!(ApiError::from(err).status(), axum::http::StatusCode::CONFLICT);
    }
}
