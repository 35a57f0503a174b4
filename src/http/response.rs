//! # Construcción de Respuestas HTTP
//! src/http/response.rs
//!
//! Una `Response` es inmutable: se arma con `ResponseBuilder`, que acumula el
//! código de estado, los headers y la entidad antes de `build()`.
//!
//! La entidad puede ser de cualquier tipo, pero el encoder solo sabe escribir
//! texto (`String` o `&'static str`). Cualquier otra entidad se trata como
//! ausente al serializar.
//!
//! ## Ejemplo de uso
//!
//! ```
//! use http11_server::http::{Response, StatusCode};
//!
//! let response = Response::builder()
//!     .status(StatusCode::Ok)
//!     .header("Content-Type", "text/plain")
//!     .entity("Hello")
//!     .build();
//!
//! assert_eq!(response.status_code(), 200);
//! assert_eq!(response.entity_text(), Some("Hello"));
//! ```

use super::request::Headers;
use super::StatusCode;
use std::any::Any;

/// Entidad de tipo arbitrario
pub type Entity = Box<dyn Any + Send>;

/// Representa una respuesta HTTP/1.1 completa
#[derive(Debug)]
pub struct Response {
    /// Código de estado numérico (debe existir en la tabla de status)
    status_code: u16,

    /// Headers multi-valor
    headers: Headers,

    /// Cuerpo opcional
    entity: Option<Entity>,
}

impl Response {
    /// Inicia un builder con status 200 y sin headers ni entidad
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder::new()
    }

    /// Respuesta con solo status y cuerpo de texto
    ///
    /// Es la forma de las respuestas sintetizadas por el servidor (400, 404, 500, 503).
    pub fn text(status: StatusCode, body: &'static str) -> Self {
        Self::builder().status(status).entity(body).build()
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Obtiene una referencia a los headers
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Entidad como texto, si es de un tipo serializable
    pub fn entity_text(&self) -> Option<&str> {
        let entity = self.entity.as_deref()?;

        if let Some(text) = entity.downcast_ref::<String>() {
            return Some(text.as_str());
        }
        entity.downcast_ref::<&'static str>().copied()
    }
}

/// Builder de `Response`
#[derive(Debug)]
pub struct ResponseBuilder {
    status_code: u16,
    headers: Headers,
    entity: Option<Entity>,
}

impl ResponseBuilder {
    pub fn new() -> Self {
        Self {
            status_code: StatusCode::Ok.as_u16(),
            headers: Headers::new(),
            entity: None,
        }
    }

    /// Establece el código de estado
    pub fn status(mut self, status: StatusCode) -> Self {
        self.status_code = status.as_u16();
        self
    }

    /// Establece un código numérico arbitrario
    ///
    /// Si el código no está en la tabla de status, la reason phrase sale vacía.
    pub fn status_code(mut self, code: u16) -> Self {
        self.status_code = code;
        self
    }

    /// Agrega un valor al header (no reemplaza los anteriores)
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .entry(name.to_string())
            .or_default()
            .push(value.to_string());
        self
    }

    /// Establece la entidad
    pub fn entity<T: Any + Send>(mut self, entity: T) -> Self {
        self.entity = Some(Box::new(entity));
        self
    }

    /// Finaliza la respuesta
    pub fn build(self) -> Response {
        Response {
            status_code: self.status_code,
            headers: self.headers,
            entity: self.entity,
        }
    }
}

impl Default for ResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_builder() {
        let response = Response::builder().build();
        assert_eq!(response.status_code(), 200);
        assert!(response.headers().is_empty());
        assert_eq!(response.entity_text(), None);
    }

    #[test]
    fn test_header_accumulates_values() {
        let response = Response::builder()
            .header("Set-Cookie", "a=1")
            .header("Set-Cookie", "b=2")
            .header("Content-Type", "text/plain")
            .build();

        assert_eq!(
            response.headers().get("Set-Cookie"),
            Some(&vec!["a=1".to_string(), "b=2".to_string()])
        );
        assert_eq!(response.headers().len(), 2);
    }

    #[test]
    fn test_string_entity_is_text() {
        let response = Response::builder().entity(String::from("hola")).build();
        assert_eq!(response.entity_text(), Some("hola"));
    }

    #[test]
    fn test_static_str_entity_is_text() {
        let response = Response::text(StatusCode::NotFound, "Route Not Found....");
        assert_eq!(response.status_code(), 404);
        assert_eq!(response.entity_text(), Some("Route Not Found...."));
    }

    #[test]
    fn test_non_string_entity_is_not_text() {
        let response = Response::builder().entity(vec![1u8, 2, 3]).build();
        assert_eq!(response.entity_text(), None);
    }

    #[test]
    fn test_arbitrary_status_code() {
        let response = Response::builder().status_code(299).build();
        assert_eq!(response.status_code(), 299);
    }
}
