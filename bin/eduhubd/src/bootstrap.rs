//! Bootstrap — first-start configuration checks.
//!
//! An unconfigured signing secret is a fatal startup condition, not a
//! per-request error: eduhubd refuses to start rather than issue
//! unverifiable tokens.

use crate::config::ServerConfig;

/// Longest allowed token lifetime: one day.
pub const MAX_TOKEN_TTL_SECS: u64 = 86_400;

/// Verify server configuration is ready for use.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.jwt.secret.is_empty() {
        anyhow::bail!("JWT secret is empty in configuration.");
    }
    if config.jwt.expire_secs == 0 || config.jwt.expire_secs > MAX_TOKEN_TTL_SECS {
        anyhow::bail!(
            "JWT expire_secs must be between 1 and {} (one day).",
            MAX_TOKEN_TTL_SECS
        );
    }
    if config.storage.data_dir.is_empty() {
        anyhow::bail!("Storage data_dir is empty in configuration.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CorsConfig, JwtConfig, StorageConfig};

    fn config(secret: &str, expire_secs: u64) -> ServerConfig {
        ServerConfig {
            storage: StorageConfig {
                data_dir: "/tmp".to_string(),
            },
            jwt: JwtConfig {
                secret: secret.to_string(),
                expire_secs,
            },
            cors: CorsConfig::default(),
        }
    }

    #[test]
    fn test_verify_config_empty_secret() {
        assert!(verify_config(&config("", 3600)).is_err());
    }

    #[test]
    fn test_verify_config_ttl_over_one_day() {
        assert!(verify_config(&config("s3cret", MAX_TOKEN_TTL_SECS + 1)).is_err());
        assert!(verify_config(&config("s3cret", 0)).is_err());
    }

    #[test]
    fn test_verify_config_ok() {
        assert!(verify_config(&config("s3cret", MAX_TOKEN_TTL_SECS)).is_ok());
    }
}
