//! Authentication configuration

use anyhow::Result;

use crate::password::HashCost;

/// Default minimum password length
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 6;

/// Configuration for the authentication core
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Process-wide HMAC secret used to sign every token
    pub jwt_secret: String,
    /// Access token expiration time in seconds (default: 15 minutes)
    pub access_token_expiry: u64,
    /// Refresh token expiration time in seconds (default: 7 days)
    pub refresh_token_expiry: u64,
    /// Minimum accepted password length
    pub min_password_length: usize,
    /// Argon2 cost parameters for new password digests
    pub hash_cost: HashCost,
}

impl AuthConfig {
    /// Create a new AuthConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: Token signing secret (required)
    /// - `JWT_ACCESS_TOKEN_EXPIRY`: Access token expiry in seconds (default: 900)
    /// - `JWT_REFRESH_TOKEN_EXPIRY`: Refresh token expiry in seconds (default: 604800)
    /// - `PASSWORD_MIN_LENGTH`: Minimum password length (default: 6)
    /// - `PASSWORD_HASH_MEMORY_KIB`, `PASSWORD_HASH_ITERATIONS`,
    ///   `PASSWORD_HASH_PARALLELISM`: Argon2 cost (default: argon2 defaults)
    pub fn from_env() -> Result<Self> {
        let jwt_secret = std::env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable not set"))?;

        if jwt_secret.trim().is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }

        let access_token_expiry = env_or("JWT_ACCESS_TOKEN_EXPIRY", 900);
        let refresh_token_expiry = env_or("JWT_REFRESH_TOKEN_EXPIRY", 604_800);
        let min_password_length = env_or("PASSWORD_MIN_LENGTH", DEFAULT_MIN_PASSWORD_LENGTH);

        let defaults = HashCost::default();
        let hash_cost = HashCost {
            memory_kib: env_or("PASSWORD_HASH_MEMORY_KIB", defaults.memory_kib),
            iterations: env_or("PASSWORD_HASH_ITERATIONS", defaults.iterations),
            parallelism: env_or("PASSWORD_HASH_PARALLELISM", defaults.parallelism),
        };

        Ok(AuthConfig {
            jwt_secret,
            access_token_expiry,
            refresh_token_expiry,
            min_password_length,
            hash_cost,
        })
    }

    /// Configuration with defaults around the given secret
    pub fn with_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            access_token_expiry: 900,
            refresh_token_expiry: 604_800,
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
            hash_cost: HashCost::default(),
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        unsafe {
            for key in [
                "JWT_SECRET",
                "JWT_ACCESS_TOKEN_EXPIRY",
                "JWT_REFRESH_TOKEN_EXPIRY",
                "PASSWORD_MIN_LENGTH",
                "PASSWORD_HASH_MEMORY_KIB",
                "PASSWORD_HASH_ITERATIONS",
                "PASSWORD_HASH_PARALLELISM",
            ] {
                std::env::remove_var(key);
            }
        }
    }

    #[test]
    #[serial]
    fn test_auth_config_from_env_defaults() {
        clear_env();
        unsafe {
            std::env::set_var("JWT_SECRET", "super-secret");
        }

        let config = AuthConfig::from_env().unwrap();
        assert_eq!(config.jwt_secret, "super-secret");
        assert_eq!(config.access_token_expiry, 900);
        assert_eq!(config.refresh_token_expiry, 604_800);
        assert_eq!(config.min_password_length, 6);
        assert_eq!(config.hash_cost, HashCost::default());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_auth_config_from_env_with_custom_values() {
        clear_env();
        unsafe {
            std::env::set_var("JWT_SECRET", "super-secret");
            std::env::set_var("JWT_ACCESS_TOKEN_EXPIRY", "60");
            std::env::set_var("JWT_REFRESH_TOKEN_EXPIRY", "garbage");
            std::env::set_var("PASSWORD_MIN_LENGTH", "10");
            std::env::set_var("PASSWORD_HASH_ITERATIONS", "3");
        }

        let config = AuthConfig::from_env().unwrap();
        assert_eq!(config.access_token_expiry, 60);
        assert_eq!(config.refresh_token_expiry, 604_800);
        assert_eq!(config.min_password_length, 10);
        assert_eq!(config.hash_cost.iterations, 3);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_auth_config_requires_secret() {
        clear_env();
        assert!(AuthConfig::from_env().is_err());

        unsafe {
            std::env::set_var("JWT_SECRET", "   ");
        }
        assert!(AuthConfig::from_env().is_err());

        clear_env();
    }
}
