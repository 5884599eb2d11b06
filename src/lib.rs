//! # Client Thread Server
//! src/lib.rs
//!
//! Servidor TCP que atiende cada conexión en su propio hilo y responde un
//! subconjunto mínimo de HTTP/1.1. Lo interesante es la concurrencia:
//! bucle de aceptación bloqueante, un hilo por cliente y una parada sin
//! carreras que desbloquea el `accept` en curso.
//!
//! ## Arquitectura
//!
//! - `config`: Configuración por CLI y variables de entorno
//! - `error`: Errores del servidor y de cada conexión
//! - `logging`: Inicialización de `tracing`
//! - `http`: Primera línea del request y construcción de responses
//! - `server`: Listener, bucle de aceptación, handlers y parada
//! - `metrics`: Estadísticas de conexiones
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use client_thread_server::config::Config;
//! use client_thread_server::server::Server;
//!
//! let server = Server::new(Config::with_port(9001));
//! server.start().expect("Error al iniciar servidor");
//! // ...
//! server.stop();
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod metrics;
pub mod server;

pub use error::{ConnectionError, ServerError};
pub use server::Server;
