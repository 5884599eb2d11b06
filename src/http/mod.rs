//! # Módulo HTTP
//! src/http/mod.rs
//!
//! Subconjunto mínimo (y no conforme) de HTTP/1.1:
//!
//! - Del request solo se lee la primera línea (método y path)
//! - Las respuestas siempre llevan `Content-Type`, `Content-Length` y
//!   `Connection: close`
//! - No hay keep-alive: una respuesta por conexión
//!
//! ### Formato de Request
//!
//! ```text
//! GET /path HTTP/1.1\r\n
//! (líneas ignoradas)
//! ```

pub mod request;   // Primera línea del request
pub mod response;  // Construcción de responses
pub mod status;    // Códigos de estado

// Re-exportamos los tipos principales para facilitar su uso
pub use request::RequestLine;
pub use response::Response;
pub use status::StatusCode;
