//! # Módulo del Servidor
//! src/server/mod.rs
//!
//! - `listener`: socket de escucha y flag de parada
//! - `tcp`: bucle de aceptación y coordinación de la parada
//! - `handler`: atención de una conexión
//! - `page` y `static_files`: contenido de las respuestas

pub mod handler;
pub mod listener;
pub mod page;
pub mod static_files;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use tcp::Server;
