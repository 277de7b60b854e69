use std::env;

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is not valid: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_name: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub bind_addr: String,
}

impl Config {
    /// Reads the process environment. Call `dotenv::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let jwt_expiration_hours = match lookup("JWT_EXPIRATION_HOURS") {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(hours) if (1..=24 * 365).contains(&hours) => hours,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "JWT_EXPIRATION_HOURS",
                        value: raw,
                    })
                }
            },
            None => 1,
        };

        Ok(Config {
            database_url: required("DATABASE_URL")?,
            database_name: lookup("DATABASE_NAME").unwrap_or_else(|| "catalog_admin".to_string()),
            jwt_secret: required("JWT_SECRET")?,
            jwt_expiration_hours,
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_to_optional_vars() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "mongodb://localhost:27017"),
            ("JWT_SECRET", "s3cret"),
        ]))
        .unwrap();

        assert_eq!(config.database_name, "catalog_admin");
        assert_eq!(config.jwt_expiration_hours, 1);
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
    }

    #[test]
    fn missing_secret_is_an_error() {
        let err = Config::from_lookup(lookup(&[("DATABASE_URL", "mongodb://localhost:27017")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_SECRET"));
    }

    #[test]
    fn bad_expiration_is_an_error() {
        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "mongodb://localhost:27017"),
            ("JWT_SECRET", "s3cret"),
            ("JWT_EXPIRATION_HOURS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "JWT_EXPIRATION_HOURS", .. }));
    }
}
