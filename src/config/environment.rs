//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} debe ser un número válido (valor: '{value}')")]
    InvalidNumber { name: &'static str, value: String },

    #[error("{0} debe estar definido")]
    Missing(&'static str),
}

/// Credenciales del administrador inicial
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub session_ttl_hours: i64,
    pub cors_origins: Vec<String>,
    /// Zona horaria usada para "movimientos de hoy" y filtros por fecha
    pub business_timezone: String,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            session_ttl_hours: 8,
            cors_origins: Vec::new(),
            business_timezone: "America/Bogota".to_string(),
            bootstrap_admin: None,
        }
    }
}

impl EnvironmentConfig {
    /// Construir la configuración desde las variables de entorno del proceso
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Construir la configuración desde una función de búsqueda arbitraria
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidNumber { name: "PORT", value })?,
            None => defaults.port,
        };

        let session_ttl_hours = match lookup("SESSION_TTL_HOURS") {
            Some(value) => match value.trim().parse::<i64>() {
                Ok(hours) if hours > 0 => hours,
                _ => return Err(ConfigError::InvalidNumber { name: "SESSION_TTL_HOURS", value }),
            },
            None => defaults.session_ttl_hours,
        };

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let bootstrap_admin = match (lookup("BOOTSTRAP_ADMIN_USER"), lookup("BOOTSTRAP_ADMIN_PASSWORD")) {
            (Some(username), Some(password)) if !username.trim().is_empty() => Some(BootstrapAdmin {
                username: username.trim().to_string(),
                password,
            }),
            (Some(_), None) => return Err(ConfigError::Missing("BOOTSTRAP_ADMIN_PASSWORD")),
            _ => None,
        };

        Ok(Self {
            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),
            port,
            host: lookup("HOST").unwrap_or(defaults.host),
            session_ttl_hours,
            cors_origins,
            business_timezone: lookup("BUSINESS_TIMEZONE").unwrap_or(defaults.business_timezone),
            bootstrap_admin,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = EnvironmentConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.session_ttl_hours, 8);
        assert!(config.is_development());
        assert!(config.bootstrap_admin.is_none());
    }

    #[test]
    fn test_reads_values() {
        let config = EnvironmentConfig::from_lookup(lookup_from(&[
            ("ENVIRONMENT", "production"),
            ("PORT", "8080"),
            ("HOST", "127.0.0.1"),
            ("CORS_ORIGINS", "http://a.test, http://b.test,"),
            ("SESSION_TTL_HOURS", "12"),
        ]))
        .unwrap();
        assert!(config.is_production());
        assert_eq!(config.server_url(), "127.0.0.1:8080");
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.session_ttl_hours, 12);
    }

    #[test]
    fn test_invalid_port() {
        let err = EnvironmentConfig::from_lookup(lookup_from(&[("PORT", "abc")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber { name: "PORT", value: "abc".to_string() }
        );
    }

    #[test]
    fn test_session_ttl_must_be_positive() {
        assert!(EnvironmentConfig::from_lookup(lookup_from(&[("SESSION_TTL_HOURS", "0")])).is_err());
    }

    #[test]
    fn test_bootstrap_admin_requires_password() {
        let err = EnvironmentConfig::from_lookup(lookup_from(&[("BOOTSTRAP_ADMIN_USER", "admin")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("BOOTSTRAP_ADMIN_PASSWORD"));

        let config = EnvironmentConfig::from_lookup(lookup_from(&[
            ("BOOTSTRAP_ADMIN_USER", "admin"),
            ("BOOTSTRAP_ADMIN_PASSWORD", "secreto"),
        ]))
        .unwrap();
        assert_eq!(config.bootstrap_admin.unwrap().username, "admin");
    }
}
