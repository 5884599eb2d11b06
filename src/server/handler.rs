//! # Handler de Conexión
//! src/server/handler.rs
//!
//! Atiende una única conexión en su propio hilo:
//!
//! 1. Lee la primera línea del request
//! 2. Si está vacía, cierra sin escribir nada
//! 3. `/favicon.ico` se sirve desde disco, el resto con la página generada
//! 4. Escribe la respuesta y cierra
//!
//! El `TcpStream` es del handler: se cierra al salir de [`serve`] por
//! cualquier camino, incluidos los errores. Un error aquí no afecta al
//! bucle de aceptación ni a otras conexiones.

use crate::error::ConnectionError;
use crate::http::{RequestLine, Response, StatusCode};
use crate::metrics::ConnectionStats;
use crate::server::page::{self, PageInfo};
use crate::server::static_files::{self, FAVICON_PATH};
use chrono::Local;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Máximo de bytes que se leen buscando el fin de la primera línea
const MAX_REQUEST_LINE: u64 = 8192;

/// Lo que necesita un handler, compartido entre todos los hilos
#[derive(Clone)]
pub struct HandlerContext {
    pub static_dir: PathBuf,
    pub read_timeout: Option<Duration>,
    pub stats: ConnectionStats,
}

/// Cómo terminó una conexión que no falló
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Se escribió una respuesta con este código
    Responded(StatusCode),

    /// Línea vacía o fin de stream: se cerró sin escribir
    Empty,
}

/// Punto de entrada del hilo de cada cliente
///
/// Nunca propaga errores: los registra y actualiza las estadísticas.
pub fn serve(stream: TcpStream, peer: SocketAddr, ctx: &HandlerContext) {
    match handle_connection(stream, peer, ctx) {
        Ok(Outcome::Responded(status)) => ctx.stats.record_response(status.as_u16()),
        Ok(Outcome::Empty) => {
            debug!(%peer, "empty request, connection closed");
            ctx.stats.record_empty_request();
        }
        Err(e) => {
            warn!(%peer, error = %e, "connection failed");
            ctx.stats.record_failure();
        }
    }
    ctx.stats.handler_finished();
}

/// Procesa la conexión de un cliente
///
/// El stream se consume y se cierra al retornar.
pub fn handle_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    ctx: &HandlerContext,
) -> Result<Outcome, ConnectionError> {
    stream
        .set_read_timeout(ctx.read_timeout)
        .map_err(ConnectionError::Read)?;

    // 1) Leer la primera línea: "GET /ruta HTTP/1.1"
    let line = read_request_line(&stream)?;
    let Some(request) = RequestLine::parse(&line) else {
        return Ok(Outcome::Empty);
    };

    // 2) Construir la respuesta
    let is_favicon = request.path() == FAVICON_PATH;
    let response = if is_favicon {
        static_files::favicon_response(&ctx.static_dir)?
    } else {
        page_response(&request, peer)
    };

    // 3) Escribir
    stream
        .write_all(&response.to_bytes())
        .and_then(|_| stream.flush())
        .map_err(ConnectionError::Write)?;

    // El icono no se registra como petición para no duplicar el log
    if is_favicon {
        trace!(%peer, status = %response.status(), "favicon served");
    } else {
        debug!(
            %peer,
            request = request.raw(),
            status = %response.status(),
            "request served"
        );
    }

    Ok(Outcome::Responded(response.status()))
}

/// Lee hasta el primer `\n` (o el límite), tolerando bytes no UTF-8
fn read_request_line(stream: &TcpStream) -> Result<String, ConnectionError> {
    let mut reader = BufReader::new(stream.take(MAX_REQUEST_LINE));
    let mut buf = Vec::new();

    reader
        .read_until(b'\n', &mut buf)
        .map_err(ConnectionError::Read)?;

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Página generada para cualquier path que no sea el icono
fn page_response(request: &RequestLine, peer: SocketAddr) -> Response {
    let current = thread::current();
    let body = page::render(&PageInfo {
        path: request.path(),
        served_at: Local::now(),
        thread_name: current.name().unwrap_or("unnamed"),
        peer,
    });

    Response::html(&body)
}
