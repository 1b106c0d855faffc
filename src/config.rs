use std::str::FromStr;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_minutes: i64,
}

/// Attributes of the credential cookie.
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
}

#[derive(Debug, Clone)]
pub enum StoreConfig {
    Postgres {
        database_url: String,
        max_connections: u32,
    },
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub jwt: JwtConfig,
    pub cookie: CookieConfig,
    pub cors_origin: String,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let store = match std::env::var("CRAFT_STORE").as_deref() {
            Ok("memory") => StoreConfig::Memory,
            _ => StoreConfig::Postgres {
                database_url: std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?,
                max_connections: env_or("DB_MAX_CONNECTIONS", 10),
            },
        };
        let jwt = JwtConfig {
            secret: std::env::var("ACCESS_TOKEN_SECRET")
                .context("ACCESS_TOKEN_SECRET is not set")?,
            ttl_minutes: env_or("JWT_TTL_MINUTES", 60),
        };
        let cookie = CookieConfig {
            name: std::env::var("COOKIE_NAME").unwrap_or_else(|_| "token".into()),
            secure: env_or("COOKIE_SECURE", true),
        };
        Ok(Self {
            store,
            jwt,
            cookie,
            cors_origin: std::env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".into()),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_or("PORT", 5000),
        })
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}
