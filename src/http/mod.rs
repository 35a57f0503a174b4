//! # Módulo HTTP
//!
//! Este módulo implementa a mano el framing de HTTP/1.1 (request line,
//! headers, status line); el request-target se parsea con `http::Uri` y luego
//! se valida contra RFC 3986. Incluye:
//!
//! - Tipos del request y del response
//! - Decodificación de requests desde el socket
//! - Serialización de responses al socket
//! - Tabla de status codes
//!
//! Solo se intercambia un request por conexión: no hay keep-alive, ni
//! pipelining, ni lectura de body.
//!
//! ### Formato de Request
//!
//! ```text
//! GET /path?query=value HTTP/1.1\r\n
//! Header-Name:Header-Value\r\n
//! \r\n
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/plain;\r\n
//! Content-Length: 5\r\n
//! \r\n
//! Hello
//! ```

pub mod decoder;   // Bytes del socket → Request
pub mod encoder;   // Response → bytes del socket
pub mod request;   // Method, Request, route key
pub mod response;  // Response y su builder
pub mod status;    // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
pub use decoder::DecodeError;
pub use encoder::EncodeError;
pub use request::{route_key, Headers, Method, Request};
pub use response::{Response, ResponseBuilder};
pub use status::StatusCode;
