//! # Handlers de Ejemplo
//!
//! Rutas que registra el binario antes de arrancar el servidor. La lógica de
//! negocio de los handlers es externa al servidor; estas solo sirven para
//! probarlo con `curl`.
//!
//! Cada handler recibe un `&Request` y retorna una `Response`.

pub mod basic;

// Re-exportar funciones útiles
pub use basic::*;

use crate::http::Method;
use crate::router::RouterBuilder;

/// Registra todas las rutas de ejemplo
pub fn register_defaults(builder: RouterBuilder) -> RouterBuilder {
    builder
        .route(Method::GET, "/testOne", test_one_handler)
        .route(Method::GET, "/testTwo", test_two_handler)
        .route(Method::GET, "/status", status_handler)
}
