//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración del servidor HTTP con soporte para argumentos CLI y
//! variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./http11_server --port 8080 --workers 100 --queue-capacity 0
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=8080 HTTP_HOST=0.0.0.0 HTTP_WORKERS=16 ./http11_server
//! ```

use crate::http::decoder::DEFAULT_MAX_HEADER_BYTES;
use crate::server::Backlog;
use clap::Parser;
use tracing::info;

/// Configuración del servidor HTTP/1.1
#[derive(Debug, Clone, Parser)]
#[command(name = "http11_server")]
#[command(about = "Servidor HTTP/1.1 mínimo con pool acotado de workers")]
#[command(version)]
pub struct Config {
    /// Puerto en el que escucha el servidor (0 = efímero)
    #[arg(short, long, default_value = "8080", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "HTTP_HOST")]
    pub host: String,

    /// Número de workers (intercambios simultáneos)
    #[arg(long, default_value = "100", env = "HTTP_WORKERS")]
    pub workers: usize,

    /// Conexiones que pueden esperar worker (0 = sin límite)
    ///
    /// Con límite, las conexiones que no caben reciben 503 desde el acceptor.
    #[arg(long = "queue-capacity", default_value = "0", env = "HTTP_QUEUE_CAPACITY")]
    pub queue_capacity: usize,

    /// Máximo de bytes a leer antes del fin de los headers
    #[arg(long = "max-header-bytes", default_value = "8192", env = "HTTP_MAX_HEADER_BYTES")]
    pub max_header_bytes: usize,
}

/// Valores de configuración inválidos
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("workers must be >= 1")]
    NoWorkers,

    #[error("max header bytes must be >= 1")]
    ZeroHeaderLimit,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI y entorno
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use http11_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:8080");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Política de backlog derivada de `queue_capacity`
    pub fn backlog(&self) -> Backlog {
        Backlog::from_capacity(self.queue_capacity)
    }

    /// Valida la configuración
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.max_header_bytes == 0 {
            return Err(ConfigError::ZeroHeaderLimit);
        }
        Ok(())
    }

    /// Registra un resumen de la configuración
    pub fn log_summary(&self) {
        info!(
            address = %self.address(),
            workers = self.workers,
            backlog = ?self.backlog(),
            max_header_bytes = self.max_header_bytes,
            "configuration"
        );
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            workers: 100,
            queue_capacity: 0,
            max_header_bytes: DEFAULT_MAX_HEADER_BYTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.workers, 100);
        assert_eq!(config.backlog(), Backlog::Unbounded);
        assert_eq!(config.max_header_bytes, 8192);
    }

    #[test]
    fn test_address_custom() {
        let mut config = Config::default();
        config.host = "0.0.0.0".to_string();
        config.port = 3000;
        assert_eq!(config.address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_validate_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_workers() {
        let mut config = Config::default();
        config.workers = 0;
        assert_eq!(config.validate(), Err(ConfigError::NoWorkers));
    }

    #[test]
    fn test_validate_invalid_header_limit() {
        let mut config = Config::default();
        config.max_header_bytes = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroHeaderLimit));
    }

    #[test]
    fn test_bounded_backlog() {
        let mut config = Config::default();
        config.queue_capacity = 64;
        assert_eq!(config.backlog(), Backlog::Bounded(64));
    }

    #[test]
    fn test_parse_cli_args() {
        let config = Config::try_parse_from([
            "http11_server",
            "--port",
            "9000",
            "--workers",
            "8",
            "--queue-capacity",
            "16",
        ])
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.workers, 8);
        assert_eq!(config.queue_capacity, 16);
    }

    #[test]
    fn test_defaults_match_cli_defaults() {
        let parsed = Config::try_parse_from(["http11_server"]).unwrap();
        let default = Config::default();

        assert_eq!(parsed.workers, default.workers);
        assert_eq!(parsed.queue_capacity, default.queue_capacity);
        assert_eq!(parsed.max_header_bytes, default.max_header_bytes);
    }
}
