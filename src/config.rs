use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

/// Credentials of the bootstrap account created on first start.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt: JwtConfig,
    pub admin: AdminConfig,
    pub frontend_url: String,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "codingcouncil".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "codingcouncil-admin".into()),
            access_ttl: duration_var("JWT_EXPIRES_IN", "15m")?,
            refresh_ttl: duration_var("JWT_REFRESH_EXPIRES_IN", "7d")?,
        };
        let admin = AdminConfig {
            email: std::env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@codingcouncil.com".into()),
            password: std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".into()),
        };
        Ok(Self {
            database_url,
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(10),
            jwt,
            admin,
            frontend_url: std::env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".into()),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: std::env::var("APP_PORT")
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(5000),
        })
    }
}

/// Reads a duration such as `15m` or `7d`; a bare number is taken as seconds.
fn duration_var(name: &str, default: &str) -> anyhow::Result<Duration> {
    let raw = std::env::var(name).unwrap_or_else(|_| default.to_string());
    parse_duration(&raw).with_context(|| format!("{name} is not a valid duration: {raw}"))
}

pub(crate) fn parse_duration(raw: &str) -> anyhow::Result<Duration> {
    let raw = raw.trim();
    if let Ok(secs) = raw.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }
    Ok(humantime::parse_duration(raw)?)
}
