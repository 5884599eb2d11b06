//! # Construcción de Respuestas HTTP
//! src/http/response.rs
//!
//! API para construir respuestas y convertirlas a bytes. Toda respuesta
//! cierra la conexión: no hay keep-alive.
//!
//! ## Formato
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/html; charset=UTF-8\r\n
//! Content-Length: 13\r\n
//! Connection: close\r\n
//! \r\n
//! <html>...</html>
//! ```
//!
//! ## Ejemplo de uso
//!
//! ```
//! use client_thread_server::http::{Response, StatusCode};
//!
//! let response = Response::new(StatusCode::Ok)
//!     .with_header("Content-Type", "text/plain")
//!     .with_body("Hello");
//!
//! let text = String::from_utf8(response.to_bytes()).unwrap();
//! assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
//! ```

use super::StatusCode;

/// Content-Type de la página generada
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=UTF-8";

/// Content-Type de las respuestas de error sin body
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=UTF-8";

/// Representa una respuesta HTTP completa
#[derive(Debug, Clone)]
pub struct Response {
    /// Código de estado HTTP
    status: StatusCode,

    /// Headers en orden de inserción. Un nombre repetido sobrescribe el valor.
    /// `Content-Length` y `Connection` no se guardan aquí: se generan al serializar.
    headers: Vec<(String, String)>,

    /// Cuerpo de la respuesta (puede ser vacío)
    body: Vec<u8>,
}

impl Response {
    /// Crea una nueva respuesta con el código de estado especificado
    ///
    /// Por defecto no tiene headers ni body.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Página HTML 200 OK
    pub fn html(body: &str) -> Self {
        Self::new(StatusCode::Ok)
            .with_header("Content-Type", HTML_CONTENT_TYPE)
            .with_body(body)
    }

    /// 404 sin body
    pub fn not_found() -> Self {
        Self::new(StatusCode::NotFound).with_header("Content-Type", TEXT_CONTENT_TYPE)
    }

    /// Agrega un header a la respuesta
    ///
    /// Si el header ya existe (sin distinguir mayúsculas), se sobrescribe.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.add_header(name, value);
        self
    }

    /// Agrega un header a una respuesta existente (versión mutable)
    pub fn add_header(&mut self, name: &str, value: &str) {
        match self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    /// Establece el cuerpo desde un string
    pub fn with_body(self, body: &str) -> Self {
        self.with_body_bytes(body.as_bytes().to_vec())
    }

    /// Establece el cuerpo desde bytes (recursos binarios como el icono)
    pub fn with_body_bytes(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Longitud en bytes del body (los bytes UTF-8, no los chars)
    pub fn content_length(&self) -> usize {
        self.body.len()
    }

    /// Convierte la respuesta a bytes listos para enviar por el socket
    ///
    /// Después de los headers propios van siempre `Content-Length` y
    /// `Connection: close`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(128 + self.body.len());

        // 1. Status line
        result.extend_from_slice(format!("HTTP/1.1 {}\r\n", self.status).as_bytes());

        // 2. Headers
        for (name, value) in &self.headers {
            result.extend_from_slice(format!("{}: {}\r\n", name, value).as_bytes());
        }
        let length = format!("Content-Length: {}\r\n", self.content_length());
        result.extend_from_slice(length.as_bytes());
        result.extend_from_slice(b"Connection: close\r\n");

        // 3. Línea vacía que separa headers del body
        result.extend_from_slice(b"\r\n");

        // 4. Body
        result.extend_from_slice(&self.body);

        result
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Busca un header por nombre (sin distinguir mayúsculas)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Obtiene una referencia al body
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}
