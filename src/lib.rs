//! # HTTP/1.1 Server
//! src/lib.rs
//!
//! Servidor HTTP/1.1 mínimo: acepta conexiones TCP, decodifica un único
//! request por conexión, lo despacha al handler registrado, escribe la
//! respuesta y cierra la conexión.
//!
//! ## Arquitectura
//!
//! ```text
//! accept loop ──► WorkerPool ──► decode ──► Router ──► Handler ──► encode ──► close
//! ```
//!
//! - `http`: Tipos del protocolo, decoder y encoder
//! - `router`: Tabla inmutable `(método, path) → handler`
//! - `server`: Acceptor, pool de workers y pipeline por conexión
//! - `config`: Argumentos CLI y variables de entorno
//! - `commands`: Handlers de ejemplo que registra el binario
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use http11_server::config::Config;
//! use http11_server::http::{Method, Request, Response};
//! use http11_server::router::RouterBuilder;
//! use http11_server::server::Server;
//!
//! let router = RouterBuilder::new()
//!     .route(Method::GET, "/hello", |_req: &Request| {
//!         Response::builder().entity("Hello").build()
//!     })
//!     .build();
//!
//! let server = Server::bind(Config::default(), router).expect("Error al iniciar servidor");
//! server.run().expect("Error en el accept loop");
//! ```

pub mod commands;
pub mod config;
pub mod http;
pub mod router;
pub mod server;

pub use config::Config;
pub use http::{Method, Request, Response, StatusCode};
pub use router::{Handler, Router, RouterBuilder};
pub use server::Server;
