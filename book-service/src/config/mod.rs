use secrecy::Secret;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct BookConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub error_contract: ErrorContract,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: Secret<String>,
    pub database: String,
}

/// How storage outcomes are reported over HTTP.
///
/// `Legacy` answers every request with 200 and a text or `{error}` body,
/// which is what existing clients expect. `Conventional` keeps the same
/// bodies but uses 400/404/500 for validation, not-found and storage
/// failures.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorContract {
    #[default]
    Legacy,
    Conventional,
}

impl BookConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let mut common_config = core_config::Config::load()?;
        if common_config.otlp_endpoint.is_none() {
            common_config.otlp_endpoint = env::var("OTLP_ENDPOINT").ok();
        }

        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        // DB is the variable name older deployments use.
        let uri = match env::var("MONGODB_URI").or_else(|_| env::var("DB")) {
            Ok(uri) => uri,
            Err(_) => get_env("MONGODB_URI", Some("mongodb://localhost:27017"), is_prod)?,
        };

        Ok(BookConfig {
            common: common_config,
            mongodb: MongoConfig {
                uri: Secret::new(uri),
                database: get_env("MONGODB_DATABASE", Some("book_db"), is_prod)?,
            },
            error_contract: get_env("BOOKS_ERROR_CONTRACT", Some("legacy"), false)?
                .parse()
                .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?,
        })
    }
}

impl std::str::FromStr for ErrorContract {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "legacy" => Ok(ErrorContract::Legacy),
            "conventional" => Ok(ErrorContract::Conventional),
            _ => Err(format!("Invalid error contract: {}", s)),
        }
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_contract_parses_case_insensitively() {
        assert_eq!("legacy".parse::<ErrorContract>(), Ok(ErrorContract::Legacy));
        assert_eq!("Conventional".parse::<ErrorContract>(), Ok(ErrorContract::Conventional));
        assert!("strict".parse::<ErrorContract>().is_err());
    }

    #[test]
    fn error_contract_defaults_to_legacy() {
        assert_eq!(ErrorContract::default(), ErrorContract::Legacy);
    }

    #[test]
    fn get_env_falls_back_to_default_outside_prod() {
        let value = get_env("BOOK_SERVICE_TEST_UNSET_VAR", Some("fallback"), false).unwrap();
        assert_eq!(value, "fallback");
    }

    #[test]
    fn get_env_requires_value_in_prod() {
        let err = get_env("BOOK_SERVICE_TEST_UNSET_VAR", Some("fallback"), true).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }
}
