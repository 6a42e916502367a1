use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use super::password::PasswordDigest;

/// Administrative role. `SuperAdmin` holds every permission of `Admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }

    /// Whether a holder of `self` may act where `required` is asked for.
    pub fn satisfies(self, required: Role) -> bool {
        match (self, required) {
            (Role::SuperAdmin, _) => true,
            (Role::Admin, Role::Admin) => true,
            (Role::Admin, Role::SuperAdmin) => false,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "super_admin" => Ok(Role::SuperAdmin),
            other => anyhow::bail!("unknown role {other:?}"),
        }
    }
}

/// Administrative account. Not serializable: outward views go through `PublicUser`.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub avatar: Option<String>,
    pub password_hash: PasswordDigest,
    pub refresh_token: Option<String>,
    pub last_login: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub role: Role,
    pub password_hash: PasswordDigest,
}

/// Row shape of the `users` table.
#[derive(Debug, FromRow)]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub avatar: Option<String>,
    pub password_hash: String,
    pub refresh_token: Option<String>,
    pub last_login: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl TryFrom<UserRow> for User {
    type Error = anyhow::Error;

    fn try_from(r: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            email: r.email,
            name: r.name,
            role: r.role.parse()?,
            avatar: r.avatar,
            password_hash: PasswordDigest::from_stored(r.password_hash),
            refresh_token: r.refresh_token,
            last_login: r.last_login,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn super_admin_implies_admin() {
        assert!(Role::SuperAdmin.satisfies(Role::Admin));
        assert!(Role::SuperAdmin.satisfies(Role::SuperAdmin));
        assert!(Role::Admin.satisfies(Role::Admin));
        assert!(!Role::Admin.satisfies(Role::SuperAdmin));
    }

    #[test]
    fn role_wire_names() {
        assert_eq!(serde_json::to_string(&Role::SuperAdmin).unwrap(), "\"super_admin\"");
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert!("root".parse::<Role>().is_err());
    }
}
