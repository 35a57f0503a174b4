//! # Comandos Básicos
//! src/commands/basic.rs
//!
//! - /testOne: Página HTML fija
//! - /testTwo: Texto plano fijo
//! - /status: Estado del servidor y eco del request en JSON

use crate::http::{Headers, Request, Response, StatusCode};
use crate::server::connection::HANDLER_FAILURE_BODY;
use serde::Serialize;
use tracing::error;

/// Handler para GET /testOne
pub fn test_one_handler(_req: &Request) -> Response {
    Response::builder()
        .status(StatusCode::Ok)
        .header("Content-Type", "text/html")
        .entity("<HTML> <P> Hello There... </P> </HTML>")
        .build()
}

/// Handler para GET /testTwo
pub fn test_two_handler(_req: &Request) -> Response {
    Response::builder()
        .status(StatusCode::Ok)
        .header("Content-Type", "text/plain")
        .entity("Response for /testTwo")
        .build()
}

#[derive(Debug, Serialize)]
struct StatusBody<'a> {
    status: &'static str,
    server: &'static str,
    version: &'static str,
    request: RequestEcho<'a>,
}

#[derive(Debug, Serialize)]
struct RequestEcho<'a> {
    method: &'static str,
    path: &'a str,
    query: Option<&'a str>,
    headers: &'a Headers,
}

/// Handler para GET /status
///
/// # Ejemplo de response
/// ```json
/// {
///   "status": "running",
///   "server": "http11_server",
///   "version": "0.1.0",
///   "request": {"method": "GET", "path": "/status", "query": null, "headers": {}}
/// }
/// ```
pub fn status_handler(req: &Request) -> Response {
    let body = StatusBody {
        status: "running",
        server: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        request: RequestEcho {
            method: req.method().as_str(),
            path: req.path(),
            query: req.query(),
            headers: req.headers(),
        },
    };

    match serde_json::to_string(&body) {
        Ok(json) => Response::builder()
            .status(StatusCode::Ok)
            .header("Content-Type", "application/json")
            .entity(json)
            .build(),
        Err(e) => {
            error!(error = %e, "failed to serialize status");
            Response::text(StatusCode::InternalServerError, HANDLER_FAILURE_BODY)
        }
    }
}
