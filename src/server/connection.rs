//! # Manejo de una Conexión
//! src/server/connection.rs
//!
//! Un worker ejecuta, para exactamente una conexión:
//!
//! ```text
//! decode → resolve (o fallback 400/404) → handler → encode → cerrar
//! ```
//!
//! El socket se cierra en todos los caminos: el `TcpStream` se consume aquí y
//! se libera al salir, incluso si algo entra en pánico.

use crate::http::{decoder, encoder, DecodeError, EncodeError, Request, Response, StatusCode};
use crate::router::Router;
use crate::server::pool::panic_message;
use std::net::{Shutdown, TcpStream};
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Cuerpo fijo para requests que no se pudieron decodificar
pub const BAD_REQUEST_BODY: &str = "Bad Request...";

/// Cuerpo fijo para rutas no registradas
pub const NOT_FOUND_BODY: &str = "Route Not Found....";

/// Cuerpo fijo cuando el handler entra en pánico
pub const HANDLER_FAILURE_BODY: &str = "Internal Server Error...";

/// Cuerpo fijo cuando la cola de conexiones está llena
pub const SERVICE_UNAVAILABLE_BODY: &str = "Service Unavailable...";

/// Resultado de un intercambio request/response
#[derive(Debug)]
pub enum Outcome {
    /// El handler respondió
    Handled { route_key: String, status: u16 },

    /// Bytes ausentes o malformados (400)
    DecodeFailure(DecodeError),

    /// Sin handler para la route key (404)
    RouteNotFound { route_key: String },

    /// El handler entró en pánico (500)
    HandlerFailure { route_key: String, message: String },

    /// La respuesta no se pudo escribir completa
    EncodeFailure(EncodeError),
}

/// Elige la respuesta para un request (o para un fallo de decodificación)
///
/// No toca el socket, así que se puede probar sin red.
pub fn respond(router: &Router, decoded: Result<Request, DecodeError>) -> (Response, Outcome) {
    let request = match decoded {
        Ok(request) => request,
        Err(e) => {
            return (
                Response::text(StatusCode::BadRequest, BAD_REQUEST_BODY),
                Outcome::DecodeFailure(e),
            );
        }
    };

    let route_key = request.route_key();
    let Some(handler) = router.resolve_key(&route_key) else {
        return (
            Response::text(StatusCode::NotFound, NOT_FOUND_BODY),
            Outcome::RouteNotFound { route_key },
        );
    };

    match panic::catch_unwind(AssertUnwindSafe(|| handler.handle(&request))) {
        Ok(response) => {
            let status = response.status_code();
            (response, Outcome::Handled { route_key, status })
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref()).to_string();
            (
                Response::text(StatusCode::InternalServerError, HANDLER_FAILURE_BODY),
                Outcome::HandlerFailure { route_key, message },
            )
        }
    }
}

/// Atiende una conexión completa y la cierra
pub fn handle_connection(mut stream: TcpStream, router: &Router, max_header_bytes: usize) -> Outcome {
    let start = Instant::now();
    let peer = stream
        .peer_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    let decoded = decoder::decode(&mut stream, max_header_bytes);
    if let Ok(request) = &decoded {
        info!(%peer, method = %request.method(), target = %request.uri(), "request");
    }

    let (response, outcome) = respond(router, decoded);

    let outcome = match encoder::try_encode(&mut stream, &response) {
        Ok(()) => outcome,
        Err(e) => Outcome::EncodeFailure(e),
    };

    // Fin del intercambio: no hay keep-alive
    if let Err(e) = stream.shutdown(Shutdown::Write) {
        debug!(%peer, error = %e, "shutdown after response failed");
    }

    log_outcome(&peer, response.status_code(), &outcome, start);
    outcome
}

fn log_outcome(peer: &str, status: u16, outcome: &Outcome, start: Instant) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

    match outcome {
        Outcome::Handled { route_key, .. } => {
            info!(%peer, route = %route_key, status, latency_ms, "handled");
        }
        Outcome::DecodeFailure(e) => {
            warn!(%peer, status, error = %e, latency_ms, "bad request");
        }
        Outcome::RouteNotFound { route_key } => {
            info!(%peer, route = %route_key, status, latency_ms, "route not found");
        }
        Outcome::HandlerFailure { route_key, message } => {
            error!(%peer, route = %route_key, status, panic = %message, "handler panicked");
        }
        Outcome::EncodeFailure(e) => {
            warn!(%peer, status, error = %e, "response write failed");
        }
    }
}

/// Respuesta inmediata del acceptor cuando la cola está llena
pub fn reject_connection(mut stream: TcpStream) {
    let response = Response::text(StatusCode::ServiceUnavailable, SERVICE_UNAVAILABLE_BODY);
    encoder::encode(&mut stream, &response);
    let _ = stream.shutdown(Shutdown::Write);
}
