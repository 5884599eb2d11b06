//! # Ciclo de Vida del Listener
//! src/server/listener.rs
//!
//! El socket de escucha y el flag de parada viven bajo el mismo `Mutex`,
//! así que quien ve `stopped == true` ya ve el socket liberado.
//!
//! Cerrar un `TcpListener` desde otro hilo no desbloquea un `accept` en
//! curso en todas las plataformas. Por eso `close` hace además una conexión
//! breve a la dirección local: el `accept` bloqueado retorna, el bucle ve el
//! flag activado y sale. El socket se cierra de verdad cuando el bucle
//! suelta su última referencia.

use crate::error::ServerError;
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, trace};

/// Tiempo máximo para la conexión que despierta al `accept`
const WAKE_TIMEOUT: Duration = Duration::from_millis(200);

/// Estado protegido por el mutex
#[derive(Default)]
struct ListenerState {
    /// Socket de escucha, `None` antes de `open` y después de `close`
    socket: Option<Arc<TcpListener>>,

    /// Dirección real (importa cuando se pidió el puerto 0)
    local_addr: Option<SocketAddr>,

    stopped: bool,
}

/// Socket de escucha con flag de parada
#[derive(Default)]
pub struct Listener {
    state: Mutex<ListenerState>,
}

/// Resultado de pedir el siguiente cliente
#[derive(Debug)]
pub enum Accepted {
    /// Conexión lista para un handler
    Connection(TcpStream, SocketAddr),

    /// `accept` retornó (bien o mal) con el flag ya activado
    Stopped,
}

impl Listener {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ListenerState> {
        // El estado es un flag y un handle: siempre consistente
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Abre el socket en `addr` y empieza a escuchar
    ///
    /// # Errores
    ///
    /// - `Stopped` si ya se llamó a `close`
    /// - `AlreadyStarted` si ya se abrió antes (aunque luego se liberara)
    /// - `Bind` si el puerto está ocupado o no hay permisos
    pub fn open(&self, addr: &str) -> Result<SocketAddr, ServerError> {
        let mut state = self.lock();

        if state.stopped {
            return Err(ServerError::Stopped);
        }
        if state.local_addr.is_some() {
            return Err(ServerError::AlreadyStarted);
        }

        let bind_error = |source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        };
        let socket = TcpListener::bind(addr).map_err(bind_error)?;
        let local_addr = socket.local_addr().map_err(bind_error)?;

        state.socket = Some(Arc::new(socket));
        state.local_addr = Some(local_addr);

        Ok(local_addr)
    }

    /// Handle del socket para el bucle de aceptación
    ///
    /// `None` si no está abierto o ya se cerró.
    pub fn handle(&self) -> Option<AcceptHandle<'_>> {
        let state = self.lock();
        if state.stopped {
            return None;
        }

        state.socket.as_ref().map(|socket| AcceptHandle {
            socket: Arc::clone(socket),
            listener: self,
        })
    }

    /// Marca el flag y libera el socket, en ese orden
    ///
    /// Idempotente: la segunda llamada no hace nada. Retorna `true` solo en
    /// la llamada que realmente cerró.
    pub fn close(&self) -> bool {
        let (socket, local_addr) = {
            let mut state = self.lock();
            if state.stopped {
                return false;
            }
            state.stopped = true;
            (state.socket.take(), state.local_addr)
        };

        // Despertar al accept bloqueado, si lo hay
        if let (Some(_), Some(addr)) = (&socket, local_addr) {
            let target = SocketAddr::new(wake_ip(addr.ip()), addr.port());
            match TcpStream::connect_timeout(&target, WAKE_TIMEOUT) {
                Ok(_) => trace!(%target, "accept woken up"),
                Err(e) => debug!(%target, error = %e, "wake-up connection failed"),
            }
        }

        drop(socket);
        true
    }

    /// Suelta el socket sin activar el flag
    ///
    /// Para cuando el bucle de aceptación termina por un error fatal: el
    /// puerto se cierra al soltar el bucle su handle, pero `is_stopped`
    /// sigue en `false` porque nadie llamó a `close`.
    pub fn release(&self) {
        let socket = self.lock().socket.take();
        if socket.is_some() {
            debug!("listening socket released");
        }
    }

    /// ¿Se llamó a `close`?
    pub fn is_stopped(&self) -> bool {
        self.lock().stopped
    }

    /// Dirección en la que se escucha (o se escuchó)
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.lock().local_addr
    }
}

/// Fuente de conexiones del bucle de aceptación
pub trait Acceptor {
    /// Bloquea hasta el siguiente cliente o hasta que el listener se cierra
    fn accept_next(&self) -> io::Result<Accepted>;
}

/// Referencia del bucle de aceptación al socket
///
/// Mantiene el socket vivo aunque `close` ya lo haya soltado del estado.
pub struct AcceptHandle<'a> {
    socket: Arc<TcpListener>,
    listener: &'a Listener,
}

impl Acceptor for AcceptHandle<'_> {
    /// Bloquea hasta que llega un cliente
    ///
    /// Si `accept` retorna con el flag activado (la conexión de despertar o
    /// un error por el cierre) el resultado es `Accepted::Stopped`. Un error
    /// con el flag sin activar es un `AcceptError` real.
    fn accept_next(&self) -> io::Result<Accepted> {
        let result = self.socket.accept();

        if self.listener.is_stopped() {
            // La conexión, si la hay, se descarta sin atender
            return Ok(Accepted::Stopped);
        }

        let (stream, peer) = result?;
        Ok(Accepted::Connection(stream, peer))
    }
}

/// IP a la que conectar para despertar al accept
fn wake_ip(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V4(v4) if v4.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V6(v6) if v6.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_open_ephemeral_port() {
        let listener = Listener::new();
        let addr = listener.open("127.0.0.1:0").unwrap();

        assert_ne!(addr.port(), 0);
        assert_eq!(listener.local_addr(), Some(addr));
        assert!(!listener.is_stopped());
    }

    #[test]
    fn test_open_port_in_use_is_bind_error() {
        let taken = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = taken.local_addr().unwrap();

        let listener = Listener::new();
        let err = listener.open(&addr.to_string()).unwrap_err();

        assert!(matches!(err, ServerError::Bind { .. }));
    }

    #[test]
    fn test_open_twice() {
        let listener = Listener::new();
        listener.open("127.0.0.1:0").unwrap();

        assert!(matches!(
            listener.open("127.0.0.1:0"),
            Err(ServerError::AlreadyStarted)
        ));
    }

    #[test]
    fn test_open_after_close() {
        let listener = Listener::new();
        listener.close();

        assert!(matches!(
            listener.open("127.0.0.1:0"),
            Err(ServerError::Stopped)
        ));
    }

    #[test]
    fn test_close_is_idempotent() {
        let listener = Listener::new();
        listener.open("127.0.0.1:0").unwrap();

        assert!(listener.close());
        assert!(!listener.close());
        assert!(listener.is_stopped());
        assert!(listener.handle().is_none());
    }

    #[test]
    fn test_accept_returns_connection() {
        let listener = Listener::new();
        let addr = listener.open("127.0.0.1:0").unwrap();

        let client = TcpStream::connect(addr).unwrap();
        let handle = listener.handle().unwrap();

        match handle.accept_next().unwrap() {
            Accepted::Connection(_, peer) => {
                assert_eq!(peer, client.local_addr().unwrap());
            }
            Accepted::Stopped => panic!("expected a connection"),
        }
    }

    #[test]
    fn test_close_unblocks_accept() {
        let listener = Arc::new(Listener::new());
        listener.open("127.0.0.1:0").unwrap();

        let acceptor = thread::spawn({
            let listener = Arc::clone(&listener);
            move || {
                let handle = listener.handle().unwrap();
                matches!(handle.accept_next(), Ok(Accepted::Stopped))
            }
        });

        thread::sleep(Duration::from_millis(100));
        listener.close();

        assert!(acceptor.join().unwrap());
    }

    #[test]
    fn test_port_refused_after_close() {
        let listener = Listener::new();
        let addr = listener.open("127.0.0.1:0").unwrap();

        listener.close();

        assert!(TcpStream::connect_timeout(&addr, Duration::from_millis(200)).is_err());
    }

    #[test]
    fn test_release_closes_port_without_stopping() {
        let listener = Listener::new();
        let addr = listener.open("127.0.0.1:0").unwrap();

        let handle = listener.handle().unwrap();
        listener.release();

        // El handle del bucle todavía mantiene el socket
        assert!(listener.handle().is_none());
        drop(handle);

        assert!(TcpStream::connect_timeout(&addr, Duration::from_millis(200)).is_err());
        assert!(!listener.is_stopped());
        assert!(matches!(
            listener.open("127.0.0.1:0"),
            Err(ServerError::AlreadyStarted)
        ));

        // close después de release sigue activando el flag
        assert!(listener.close());
        assert!(listener.is_stopped());
    }

    #[test]
    fn test_wake_ip_unspecified() {
        assert_eq!(
            wake_ip(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        );
        assert_eq!(
            wake_ip(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1))),
            IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1))
        );
    }
}
