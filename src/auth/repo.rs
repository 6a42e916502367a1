use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{
    password::PasswordDigest,
    repo_types::{NewUser, User, UserRow},
};
use crate::db::{PgStore, StoreError};

/// Persistence of administrative accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Case-insensitive lookup; callers pass the normalized address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Fails with `StoreError::Duplicate` when the email is taken.
    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;

    /// Stamps `last_login` and replaces the stored refresh token.
    async fn record_login(
        &self,
        id: Uuid,
        at: OffsetDateTime,
        refresh_token: &str,
    ) -> Result<(), StoreError>;

    async fn clear_refresh_token(&self, id: Uuid) -> Result<(), StoreError>;

    /// Returns `None` when the user is gone.
    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, StoreError>;

    /// Replaces the hash and clears the refresh token in one write.
    async fn update_password(&self, id: Uuid, hash: &PasswordDigest) -> Result<(), StoreError>;
}

const USER_COLUMNS: &str = "id, email, name, role, avatar, password_hash, refresh_token, \
                            last_login, created_at, updated_at";

fn into_user(row: Option<UserRow>) -> Result<Option<User>, StoreError> {
    row.map(User::try_from).transpose().map_err(StoreError::from)
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        into_user(row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1)"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        into_user(row)
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (email, name, role, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.email)
        .bind(&user.name)
        .bind(user.role.as_str())
        .bind(user.password_hash.as_str())
        .fetch_one(&self.db)
        .await?;
        Ok(User::try_from(row)?)
    }

    async fn record_login(
        &self,
        id: Uuid,
        at: OffsetDateTime,
        refresh_token: &str,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE users
               SET last_login = $2, refresh_token = $3, updated_at = now()
             WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(at)
        .bind(refresh_token)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn clear_refresh_token(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("UPDATE users SET refresh_token = NULL, updated_at = now() WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
               SET name = COALESCE($2, name),
                   email = COALESCE($3, email),
                   updated_at = now()
             WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        into_user(row)
    }

    async fn update_password(&self, id: Uuid, hash: &PasswordDigest) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE users
               SET password_hash = $2, refresh_token = NULL, updated_at = now()
             WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(hash.as_str())
        .execute(&self.db)
        .await?;
        Ok(())
    }
}
