//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Este módulo implementa el servidor TCP que:
//! 1. Escucha en un puerto
//! 2. Acepta conexiones en un único loop secuencial
//! 3. Entrega cada conexión a un pool acotado de workers
//! 4. En cada worker: decodifica, enruta, codifica la respuesta y cierra

pub mod connection;
pub mod pool;
pub mod tcp;

use crate::config::ConfigError;

// Re-exportar para facilitar el uso
pub use connection::Outcome;
pub use pool::{Backlog, WorkerPool};
pub use tcp::Server;

/// Errores fatales al arrancar o correr el servidor
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
