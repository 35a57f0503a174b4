//! # Requests HTTP/1.1
//! src/http/request.rs
//!
//! Tipos del request ya decodificado. El parsing vive en `decoder.rs`;
//! aquí solo están el método, el request y la construcción de la route key.
//!
//! Un `Request` siempre tiene un método válido y un target parseado como URI:
//! el decoder nunca produce un request a medias.

use http::Uri;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Métodos HTTP soportados (conjunto cerrado)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET - Obtener un recurso
    GET,

    /// PUT - Reemplazar un recurso
    PUT,

    /// POST - Enviar datos a un recurso
    POST,

    /// PATCH - Modificar parcialmente un recurso
    PATCH,

    /// DELETE - Eliminar un recurso
    DELETE,
}

/// El token no es uno de los métodos soportados
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported HTTP method: {0}")]
pub struct UnknownMethod(pub String);

impl Method {
    pub const ALL: [Method; 5] = [
        Method::GET,
        Method::PUT,
        Method::POST,
        Method::PATCH,
        Method::DELETE,
    ];

    /// Convierte el método a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::PUT => "PUT",
            Method::POST => "POST",
            Method::PATCH => "PATCH",
            Method::DELETE => "DELETE",
        }
    }
}

impl FromStr for Method {
    type Err = UnknownMethod;

    /// Parsea un método HTTP exacto (sensible a mayúsculas)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::GET),
            "PUT" => Ok(Method::PUT),
            "POST" => Ok(Method::POST),
            "PATCH" => Ok(Method::PATCH),
            "DELETE" => Ok(Method::DELETE),
            _ => Err(UnknownMethod(s.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Construye la route key: nombre del método concatenado con el path
///
/// No hay normalización: `"/users"` y `"/users/"` son rutas distintas.
///
/// # Ejemplo
/// ```
/// use http11_server::http::{route_key, Method};
///
/// assert_eq!(route_key(Method::GET, "/users"), "GET/users");
/// ```
pub fn route_key(method: Method, path: &str) -> String {
    let mut key = String::with_capacity(method.as_str().len() + path.len());
    key.push_str(method.as_str());
    key.push_str(path);
    key
}

/// Headers multi-valor: nombre → valores en orden de llegada
pub type Headers = HashMap<String, Vec<String>>;

/// Representa un request HTTP/1.1 decodificado
#[derive(Debug, Clone)]
pub struct Request {
    /// Método HTTP
    method: Method,

    /// Request-target tal como llegó (path + query opcional, o forma absoluta)
    uri: Uri,

    /// Path crudo del target (vacío si la forma absoluta no trae path)
    path: String,

    /// Headers sin normalizar el nombre
    headers: Headers,
}

impl Request {
    /// Crea un request a partir de sus partes ya validadas
    pub fn new(method: Method, uri: Uri, headers: Headers) -> Self {
        let path = uri.path().to_string();
        Self::with_path(method, uri, path, headers)
    }

    /// Igual que `new`, pero con el path crudo extraído por el decoder
    pub(crate) fn with_path(method: Method, uri: Uri, path: String, headers: Headers) -> Self {
        Self {
            method,
            uri,
            path,
            headers,
        }
    }

    // === Métodos públicos para acceder a los campos ===

    /// Obtiene el método HTTP del request
    pub fn method(&self) -> Method {
        self.method
    }

    /// Obtiene el URI completo del request-target
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Path crudo (sin decodificar porcentajes y sin query)
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query string cruda, si existe
    pub fn query(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Route key de este request (ej: `"GET/testOne"`)
    pub fn route_key(&self) -> String {
        route_key(self.method, self.path())
    }

    /// Obtiene todos los headers
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Todos los valores de un header, en orden de llegada
    ///
    /// El nombre se compara exactamente: `Host` y `host` son headers distintos.
    pub fn header_values(&self, name: &str) -> Option<&[String]> {
        self.headers.get(name).map(|values| values.as_slice())
    }

    /// Primer valor de un header
    pub fn header(&self, name: &str) -> Option<&str> {
        self.header_values(name)
            .and_then(|values| values.first())
            .map(|value| value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_from_str() {
        for method in Method::ALL {
            assert_eq!(method.as_str().parse::<Method>(), Ok(method));
        }
    }

    #[test]
    fn test_method_is_case_sensitive() {
        assert_eq!("get".parse::<Method>(), Err(UnknownMethod("get".to_string())));
        assert!("HEAD".parse::<Method>().is_err());
        assert!("OPTIONS".parse::<Method>().is_err());
    }

    #[test]
    fn test_route_key() {
        assert_eq!(route_key(Method::GET, "/users"), "GET/users");
        assert_eq!(route_key(Method::DELETE, "/users/"), "DELETE/users/");
    }

    #[test]
    fn test_request_accessors() {
        let mut headers = Headers::new();
        headers.insert("Accept".to_string(), vec!["a".to_string(), "b".to_string()]);

        let uri: Uri = "/search?q=rust".parse().unwrap();
        let request = Request::new(Method::POST, uri, headers);

        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.path(), "/search");
        assert_eq!(request.query(), Some("q=rust"));
        assert_eq!(request.route_key(), "POST/search");
        assert_eq!(request.header("Accept"), Some("a"));
        assert_eq!(request.header_values("Accept").map(|v| v.len()), Some(2));
        assert_eq!(request.header("accept"), None);
    }

    #[test]
    fn test_absolute_form_target() {
        let uri: Uri = "http://localhost:8080/testOne".parse().unwrap();
        let request = Request::new(Method::GET, uri, Headers::new());

        assert_eq!(request.route_key(), "GET/testOne");
    }
}
