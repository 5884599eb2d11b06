//! # Página Generada
//! src/server/page.rs
//!
//! Body HTML de la respuesta normal: path pedido, fecha del servidor,
//! hilo que atendió y dirección del cliente.

use chrono::{DateTime, Local};
use std::net::SocketAddr;

/// Formato de la fecha: día/mes/año hora:minuto:segundo
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%y %H:%M:%S";

/// Datos que se incrustan en la página
#[derive(Debug, Clone)]
pub struct PageInfo<'a> {
    pub path: &'a str,
    pub served_at: DateTime<Local>,
    pub thread_name: &'a str,
    pub peer: SocketAddr,
}

/// Fecha formateada como aparece en la página
pub fn format_timestamp(at: &DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Genera el body HTML
///
/// # Ejemplo
///
/// ```
/// use client_thread_server::server::page::{render, PageInfo};
///
/// let html = render(&PageInfo {
///     path: "/hola",
///     served_at: chrono::Local::now(),
///     thread_name: "client-5000",
///     peer: "127.0.0.1:5000".parse().unwrap(),
/// });
///
/// assert!(html.contains("<p>Path: /hola</p>"));
/// assert!(html.contains("Server: "));
/// ```
pub fn render(info: &PageInfo<'_>) -> String {
    format!(
        "<html><body style='background-color: coral;'>\
         <h3>Servidor OK</h3>\
         <p>Path: {}</p>\
         <p>Server: {}</p>\
         <p>Thread: {}</p>\
         <p>Client: {}</p>\
         </body></html>",
        escape_html(info.path),
        format_timestamp(&info.served_at),
        escape_html(info.thread_name),
        info.peer,
    )
}

/// Escapa los caracteres con significado en HTML
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
