use crate::error::{AppError, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub admin: AdminConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// Seed credential for the admin account. The account is stored as a regular
/// user row with role `admin`; nothing downstream reads these values.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub email: String,
    pub password: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()
                    .map_err(|_| AppError::ConfigError("Invalid PORT value".to_string()))?,
                max_body_size: env::var("MAX_BODY_SIZE")
                    .unwrap_or_else(|_| "1048576".to_string())
                    .parse()
                    .map_err(|_| AppError::ConfigError("Invalid MAX_BODY_SIZE value".to_string()))?,
            },
            database: DatabaseConfig {
                url: env::var("DB_URL")?,
                max_connections: env::var("DB_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "20".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::ConfigError("Invalid DB_MAX_CONNECTIONS value".to_string())
                    })?,
            },
            cors: CorsConfig {
                allowed_origins: env::var("FRONTEND_URL")?
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .collect(),
            },
            admin: AdminConfig {
                email: env::var("ADMIN_EMAIL")?,
                password: env::var("ADMIN_PASSWORD")?,
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env vars are process-global, so everything runs in one test function.
    #[test]
    fn from_env_applies_defaults_and_rejects_bad_values() {
        unsafe {
            env::set_var("DB_URL", "postgres://localhost/harvest");
            env::set_var("FRONTEND_URL", "http://localhost:5173, http://localhost:4173");
            env::set_var("ADMIN_EMAIL", "admin@example.com");
            env::set_var("ADMIN_PASSWORD", "changeme");
            env::remove_var("HOST");
            env::remove_var("PORT");
            env::remove_var("MAX_BODY_SIZE");
            env::remove_var("DB_MAX_CONNECTIONS");
        }

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.server_address(), "0.0.0.0:3000");
        assert_eq!(config.server.max_body_size, 1048576);
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(
            config.cors.allowed_origins,
            vec!["http://localhost:5173", "http://localhost:4173"]
        );
        assert_eq!(config.admin.email, "admin@example.com");

        unsafe {
            env::set_var("PORT", "not-a-port");
        }
        assert!(matches!(
            AppConfig::from_env(),
            Err(AppError::ConfigError(_))
        ));

        unsafe {
            env::set_var("PORT", "8080");
            env::remove_var("DB_URL");
        }
        assert!(AppConfig::from_env().is_err());

        unsafe {
            env::remove_var("PORT");
        }
    }
}
