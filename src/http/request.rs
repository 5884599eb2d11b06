//! # Request Line
//! src/http/request.rs
//!
//! El servidor no parsea HTTP completo: solo lee la primera línea del
//! request y extrae el método y el path. Los headers se ignoran.
//!
//! ```text
//! GET /path HTTP/1.1\r\n
//! ```

/// Path usado cuando la línea no trae uno válido
pub const DEFAULT_PATH: &str = "/";

/// Primera línea de un request, ya interpretada
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    /// Primer token de la línea (`GET`, `POST`, ...)
    method: String,

    /// Path pedido, o `/` si no se pudo extraer
    path: String,

    /// Línea original sin el `\r\n`
    raw: String,
}

impl RequestLine {
    /// Interpreta la primera línea de un request
    ///
    /// Retorna `None` si la línea está vacía: en ese caso no hay nada que
    /// responder y la conexión se cierra sin escribir.
    ///
    /// El path solo se extrae cuando la línea empieza por `GET ` y hay un
    /// espacio después del path. En cualquier otro caso se usa `/`.
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use client_thread_server::http::RequestLine;
    ///
    /// let line = RequestLine::parse("GET /hola HTTP/1.1\r\n").unwrap();
    /// assert_eq!(line.method(), "GET");
    /// assert_eq!(line.path(), "/hola");
    ///
    /// let line = RequestLine::parse("POST /hola HTTP/1.1").unwrap();
    /// assert_eq!(line.path(), "/");
    ///
    /// assert!(RequestLine::parse("\r\n").is_none());
    /// ```
    pub fn parse(line: &str) -> Option<Self> {
        let raw = line.trim_end_matches(['\r', '\n']);

        if raw.trim().is_empty() {
            return None;
        }

        let method = raw.split_whitespace().next().unwrap_or_default().to_string();

        let path = raw
            .strip_prefix("GET ")
            .and_then(|rest| rest.find(' ').map(|end| &rest[..end]))
            .filter(|path| !path.is_empty())
            .unwrap_or(DEFAULT_PATH)
            .to_string();

        Some(RequestLine {
            method,
            path,
            raw: raw.to_string(),
        })
    }

    /// Obtiene el método
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Obtiene el path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Obtiene la línea tal como llegó (sin fin de línea)
    pub fn raw(&self) -> &str {
        &self.raw
    }
}
