//! # Recursos Estáticos
//! src/server/static_files.rs
//!
//! El único recurso estático es el icono. Se lee entero a memoria en cada
//! petición.

use crate::error::ConnectionError;
use crate::http::{Response, StatusCode};
use std::fs;
use std::io;
use std::path::Path;

/// Path reservado que se sirve desde disco en vez de generar la página
pub const FAVICON_PATH: &str = "/favicon.ico";

/// Nombre del fichero dentro del directorio estático
const FAVICON_FILE: &str = "favicon.ico";

pub const FAVICON_CONTENT_TYPE: &str = "image/x-icon";

/// Respuesta para el icono
///
/// - 200 con `Content-Type: image/x-icon` si el fichero existe
/// - 404 sin body (con `Content-Type` de texto) si no existe
///
/// # Errores
///
/// Cualquier otro fallo al leer el fichero (permisos, es un directorio...)
/// se devuelve como `ConnectionError::Resource`.
pub fn favicon_response(static_dir: &Path) -> Result<Response, ConnectionError> {
    let path = static_dir.join(FAVICON_FILE);

    match fs::read(&path) {
        Ok(bytes) => Ok(Response::new(StatusCode::Ok)
            .with_header("Content-Type", FAVICON_CONTENT_TYPE)
            .with_body_bytes(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Response::not_found()),
        Err(source) => Err(ConnectionError::Resource { path, source }),
    }
}
