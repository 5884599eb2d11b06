//! # Errores del Servidor
//! src/error.rs
//!
//! Dos familias de errores con propagación distinta:
//!
//! - [`ServerError`]: afectan al servidor completo. `Bind` es fatal al
//!   arrancar y `Accept` (con el flag de parada sin activar) termina el
//!   bucle de aceptación.
//! - [`ConnectionError`]: aislados a un único handler. Se registran en el
//!   log y nunca llegan al bucle de aceptación ni a otras conexiones.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errores a nivel de servidor
#[derive(Debug, Error)]
pub enum ServerError {
    /// No se pudo abrir el puerto (ocupado, sin privilegios, ...)
    #[error("Cannot open {addr}: {source}")]
    Bind {
        /// Dirección que se intentó abrir
        addr: String,
        #[source]
        source: io::Error,
    },

    /// `accept` falló sin que nadie hubiera llamado a `stop`
    #[error("Error accepting client connection: {0}")]
    Accept(#[source] io::Error),

    /// `start` se llamó dos veces
    #[error("Server already started")]
    AlreadyStarted,

    /// `start` se llamó después de `stop`
    #[error("Server has been stopped")]
    Stopped,

    /// No se pudo crear el hilo del bucle de aceptación
    #[error("Cannot spawn accept loop thread: {0}")]
    Spawn(#[source] io::Error),

    #[error("Accept loop thread panicked")]
    AcceptLoopPanicked,
}

/// Errores aislados a una conexión
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Read failed: {0}")]
    Read(#[source] io::Error),

    #[error("Write failed: {0}")]
    Write(#[source] io::Error),

    /// El recurso estático existe pero no se pudo leer
    #[error("Cannot read static resource {path:?}: {source}")]
    Resource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_error_message() {
        let err = ServerError::Bind {
            addr: "127.0.0.1:80".to_string(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("127.0.0.1:80"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_accept_error_keeps_source() {
        let err = ServerError::Accept(io::Error::new(io::ErrorKind::Other, "broken"));
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("broken"));
    }

    #[test]
    fn test_resource_error_message() {
        let err = ConnectionError::Resource {
            path: PathBuf::from("static/favicon.ico"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("static/favicon.ico"));
    }
}
