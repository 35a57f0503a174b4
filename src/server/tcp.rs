//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Un único acceptor secuencial y un pool fijo de workers. El acceptor solo
//! espera conexiones y las entrega al pool; el trabajo de cada request ocurre
//! en los workers, así que el throughput del accept depende del hand-off.
//!
//! El loop de accept no termina: el servidor se detiene matando el proceso.

use super::connection::{handle_connection, reject_connection};
use super::pool::{Rejected, WorkerPool};
use super::ServerError;
use crate::config::Config;
use crate::router::Router;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Servidor HTTP/1.1 concurrente
pub struct Server {
    listener: TcpListener,
    pool: WorkerPool<TcpStream>,
}

impl Server {
    /// Valida la configuración, abre el socket y arranca los workers
    ///
    /// Las rutas ya tienen que estar registradas: el `Router` es de solo
    /// lectura desde aquí.
    pub fn bind(config: Config, router: Router) -> Result<Self, ServerError> {
        config.validate()?;

        let address = config.address();
        let listener = TcpListener::bind(&address).map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;

        let router = Arc::new(router);
        let backlog = config.backlog();
        let max_header_bytes = config.max_header_bytes;

        let pool = WorkerPool::new(config.workers, backlog, "http-worker", {
            let router = Arc::clone(&router);
            move |stream: TcpStream| {
                handle_connection(stream, &router, max_header_bytes);
            }
        })?;

        info!(
            address = %listener.local_addr()?,
            workers = pool.size(),
            ?backlog,
            routes = router.len(),
            "server bound"
        );

        Ok(Self { listener, pool })
    }

    /// Dirección real del socket (útil con puerto 0)
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Loop de accept; bloquea el thread para siempre
    pub fn run(self) -> Result<(), ServerError> {
        info!(address = %self.local_addr()?, "accepting connections");

        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => self.dispatch(stream),
                Err(e) => {
                    error!(error = %e, "failed to accept connection");
                }
            }
        }

        Ok(())
    }

    /// Entrega la conexión al pool sin procesarla
    fn dispatch(&self, stream: TcpStream) {
        if let Ok(peer) = stream.peer_addr() {
            debug!(%peer, queued = self.pool.queued(), "accepted connection");
        }

        if let Err(Rejected(stream)) = self.pool.submit(stream) {
            warn!(backlog = ?self.pool.backlog(), "connection queue full, rejecting");
            reject_connection(stream);
        }
    }
}
