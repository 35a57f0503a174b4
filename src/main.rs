//! # HTTP Server - Entry Point
//! src/main.rs
//!
//! Lee la configuración, registra las rutas de ejemplo y sirve para siempre.

use http11_server::commands;
use http11_server::config::Config;
use http11_server::router::RouterBuilder;
use http11_server::server::Server;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "http11_server=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::new();
    config.log_summary();

    // El registro termina antes de abrir el socket
    let router = commands::register_defaults(RouterBuilder::new()).build();

    let server = match Server::bind(config, router) {
        Ok(server) => server,
        Err(e) => {
            error!(error = %e, "failed to start server");
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        error!(error = %e, "fatal error");
        std::process::exit(1);
    }
}
