//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Mapea route keys (`METHOD` + path) a handlers.
//!
//! ## Arquitectura
//!
//! ```text
//! RouterBuilder (registro) → build() → Router (solo lectura) → Handler → Response
//! ```
//!
//! El registro ocurre completo antes de servir. `Router` no expone ninguna
//! forma de mutarse, así que los workers lo comparten vía `Arc` sin locks.
//! No hay parámetros de path, ni comodines, ni normalización de `/` final.

use crate::http::{route_key, Method, Request, Response};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Capacidad de atender un request
///
/// Un handler recibe el request ya decodificado y retorna la respuesta. No
/// tiene acceso al socket. Corre en el worker de la conexión, así que no debe
/// bloquear indefinidamente.
///
/// Cualquier `Fn(&Request) -> Response` sirve como handler.
pub trait Handler: Send + Sync + 'static {
    fn handle(&self, request: &Request) -> Response;
}

impl<F> Handler for F
where
    F: Fn(&Request) -> Response + Send + Sync + 'static,
{
    fn handle(&self, request: &Request) -> Response {
        self(request)
    }
}

/// Registro de rutas previo al arranque del servidor
#[derive(Default)]
pub struct RouterBuilder {
    routes: HashMap<String, Arc<dyn Handler>>,
}

impl RouterBuilder {
    /// Crea un registro vacío
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra una ruta con su handler
    ///
    /// Si la route key ya existía, gana el último registro.
    ///
    /// # Ejemplo
    /// ```
    /// use http11_server::http::{Method, Request, Response};
    /// use http11_server::router::RouterBuilder;
    ///
    /// fn hello_handler(_req: &Request) -> Response {
    ///     Response::builder().entity("Hello").build()
    /// }
    ///
    /// let router = RouterBuilder::new()
    ///     .route(Method::GET, "/hello", hello_handler)
    ///     .build();
    ///
    /// assert!(router.resolve(Method::GET, "/hello").is_some());
    /// ```
    pub fn route<H: Handler>(mut self, method: Method, path: &str, handler: H) -> Self {
        self.add_route(method, path, handler);
        self
    }

    /// Versión mutable de `route`
    pub fn add_route<H: Handler>(&mut self, method: Method, path: &str, handler: H) {
        self.routes.insert(route_key(method, path), Arc::new(handler));
    }

    /// Congela el registro
    pub fn build(self) -> Router {
        Router {
            routes: self.routes,
        }
    }
}

/// Tabla de rutas inmutable
pub struct Router {
    /// Mapa de route key → handler
    routes: HashMap<String, Arc<dyn Handler>>,
}

impl Router {
    /// Busca el handler de `(method, path)`
    pub fn resolve(&self, method: Method, path: &str) -> Option<&Arc<dyn Handler>> {
        self.resolve_key(&route_key(method, path))
    }

    /// Busca el handler por route key ya construida
    pub fn resolve_key(&self, key: &str) -> Option<&Arc<dyn Handler>> {
        self.routes.get(key)
    }

    /// Cantidad de rutas registradas
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Route keys registradas, ordenadas
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.routes.keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        keys
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router").field("routes", &self.keys()).finish()
    }
}
