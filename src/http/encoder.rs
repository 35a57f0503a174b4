//! # Encoder de Respuestas HTTP/1.1
//! src/http/encoder.rs
//!
//! Serializa una `Response` al socket.
//!
//! ## Formato
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/plain;\r\n
//! Content-Length: 5\r\n
//! \r\n
//! Hello
//! ```
//!
//! Cada header se escribe como `Nombre: v1v2...;`: los valores de un mismo
//! nombre van concatenados sin separador y con un `;` final. El orden de los
//! headers es el de iteración del mapa.
//!
//! Solo las entidades de texto generan body y `Content-Length`; con cualquier
//! otra entidad (o sin entidad) se escribe únicamente la línea vacía.

use super::{status, Response};
use std::io::{self, BufWriter, Write};
use tracing::{debug, warn};

/// Errores de escritura de la respuesta
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("failed to write response: {0}")]
    Io(#[from] io::Error),
}

/// Escribe la respuesta completa, sin propagar errores
///
/// Si la escritura falla, se registra en el log y se detiene; la conexión queda
/// en el estado parcial que haya alcanzado.
pub fn encode<W: Write>(output: &mut W, response: &Response) {
    if let Err(e) = try_encode(output, response) {
        warn!(status = response.status_code(), error = %e, "response write aborted");
    }
}

/// Escribe la respuesta completa reportando el primer error
pub fn try_encode<W: Write>(output: &mut W, response: &Response) -> Result<(), EncodeError> {
    let mut writer = BufWriter::new(output);
    let code = response.status_code();

    // 1. Status line
    let reason = status::reason_phrase(code).unwrap_or_else(|| {
        debug!(status = code, "status code has no reason phrase");
        ""
    });
    write!(writer, "HTTP/1.1 {} {}\r\n", code, reason)?;

    // 2. Headers
    for (name, values) in response.headers() {
        write!(writer, "{}: {};\r\n", name, values.concat())?;
    }

    // 3. Body (si la entidad es texto)
    match response.entity_text() {
        Some(text) => {
            let bytes = text.as_bytes();
            write!(writer, "Content-Length: {}\r\n\r\n", bytes.len())?;
            writer.write_all(bytes)?;
        }
        None => writer.write_all(b"\r\n")?,
    }

    writer.flush()?;
    Ok(())
}
