//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Listening port.
pub const ENV_PORT: &str = "PORT";
/// Static asset root directory.
pub const ENV_STATIC_FILES: &str = "STATIC_FILES";
/// Value reported by the version endpoint.
pub const ENV_VERSION: &str = "VERSION";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid environment variable {name}={value}: {reason}")]
    Env {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load a TOML file, overlay the process environment, and validate.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: GatewayConfig = toml::from_str(&content)?;
    let config = config.apply_env(|name| std::env::var(name).ok())?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

impl GatewayConfig {
    /// Defaults overlaid with the process environment, validated.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::default().apply_env(|name| std::env::var(name).ok())?;
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }

    /// Overlay environment values using `lookup` as the variable source.
    ///
    /// Recognises `PORT`, `STATIC_FILES`, `VERSION`, and each route's
    /// `upstream_env` variable. Empty values are treated as unset.
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(value) = get(ENV_PORT) {
            self.listener.port = value.parse::<u16>().map_err(|e| ConfigError::Env {
                name: ENV_PORT.to_string(),
                value: value.clone(),
                reason: e.to_string(),
            })?;
        }
        if let Some(value) = get(ENV_STATIC_FILES) {
            self.static_files.root = PathBuf::from(value);
        }
        if let Some(value) = get(ENV_VERSION) {
            self.version = value;
        }
        for route in &mut self.routes {
            if let Some(value) = route.upstream_env.as_deref().and_then(|name| get(name)) {
                route.upstream = value;
            }
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn env_overrides_defaults() {
        let config = GatewayConfig::default()
            .apply_env(env(&[
                ("PORT", "8088"),
                ("STATIC_FILES", "/srv/www"),
                ("VERSION", "2024.1"),
                ("COLOR_BACKEND", "http://127.0.0.1:3000"),
            ]))
            .unwrap();

        assert_eq!(config.listener.port, 8088);
        assert_eq!(config.static_files.root, PathBuf::from("/srv/www"));
        assert_eq!(config.version, "2024.1");
        assert_eq!(config.routes[0].upstream, "http://127.0.0.1:3000");
    }

    #[test]
    fn unset_and_empty_variables_keep_defaults() {
        let config = GatewayConfig::default()
            .apply_env(env(&[("VERSION", "")]))
            .unwrap();

        assert_eq!(config.listener.port, 3001);
        assert_eq!(config.version, "local");
        assert_eq!(config.routes[0].upstream, "http://color.service.local:3000");
    }

    #[test]
    fn bad_port_is_an_error() {
        let err = GatewayConfig::default()
            .apply_env(env(&[("PORT", "eighty")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Env { ref name, .. } if name == "PORT"));
    }

    #[test]
    fn load_config_reports_validation_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [[routes]]
            name = "broken"
            gateway_path = "no-slash"
            upstream = "http://broken.local"
            "#
        )
        .unwrap();

        let err = load_config(file.path()).unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "routes[0].gateway_path");
            }
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn load_config_missing_file() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
