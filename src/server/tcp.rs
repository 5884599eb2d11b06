//! # Servidor TCP con un Hilo por Cliente
//! src/server/tcp.rs
//!
//! Un hilo dedicado ejecuta el bucle de aceptación. Cada conexión aceptada
//! se entrega a un hilo nuevo (sin pool, sin cola, sin límite) y el bucle
//! vuelve enseguida a `accept`, así que un cliente lento no retrasa a los
//! siguientes.
//!
//! ## Máquina de estados del bucle
//!
//! ```text
//! RUNNING --accept ok--------------------> RUNNING (spawn handler)
//! RUNNING --accept retorna, flag activo--> STOPPED (salida limpia)
//! RUNNING --accept falla, flag inactivo--> error fatal (ServerError::Accept)
//! ```
//!
//! En el error fatal el socket se suelta igual que en la parada, así que el
//! puerto deja de aceptar conexiones aunque nadie llame a `stop`.
//!
//! `stop` puede llamarse desde cualquier hilo, en cualquier momento y más
//! de una vez. Solo impide aceptar conexiones nuevas: los handlers ya
//! lanzados terminan solos.

use crate::config::Config;
use crate::error::ServerError;
use crate::metrics::{ConnectionStats, StatsSnapshot};
use crate::server::handler::{self, HandlerContext};
use crate::server::listener::{Accepted, Acceptor, Listener};
use std::net::{SocketAddr, TcpStream};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle, ThreadId};
use tracing::{debug, error, info, warn};

/// Nombre del hilo que ejecuta el bucle de aceptación
pub const ACCEPT_THREAD_NAME: &str = "accept-loop";

type AcceptThread = JoinHandle<Result<(), ServerError>>;

/// Servidor con un hilo por conexión y parada ordenada
///
/// # Ejemplo
///
/// ```no_run
/// use client_thread_server::config::Config;
/// use client_thread_server::server::Server;
/// use std::time::Duration;
///
/// let server = Server::new(Config::with_port(9001));
/// server.start().expect("no se pudo abrir el puerto");
///
/// std::thread::sleep(Duration::from_secs(60));
///
/// server.stop();
/// server.join().expect("el bucle de aceptación falló");
/// ```
pub struct Server {
    config: Config,
    listener: Arc<Listener>,
    stats: ConnectionStats,
    /// Hilo del bucle de aceptación (diagnóstico y `join`)
    accept_thread: Mutex<Option<AcceptThread>>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            listener: Arc::new(Listener::new()),
            stats: ConnectionStats::new(),
            accept_thread: Mutex::new(None),
        }
    }

    /// Abre el puerto y lanza el bucle de aceptación en su propio hilo
    ///
    /// Retorna cuando el socket ya está escuchando, así que un cliente puede
    /// conectar inmediatamente después.
    ///
    /// # Errores
    ///
    /// - `Bind` si no se puede abrir el puerto (fatal, no se reintenta)
    /// - `AlreadyStarted` / `Stopped` si el servidor no está recién creado
    /// - `Spawn` si no se pudo crear el hilo
    pub fn start(&self) -> Result<SocketAddr, ServerError> {
        let address = self.config.address();
        info!(%address, "starting server");

        let local_addr = self.listener.open(&address)?;
        info!(%local_addr, "listening, one thread per connection");

        let listener = Arc::clone(&self.listener);
        let ctx = HandlerContext {
            static_dir: self.config.static_dir.clone(),
            read_timeout: self.config.read_timeout(),
            stats: self.stats.clone(),
        };

        let spawned = thread::Builder::new()
            .name(ACCEPT_THREAD_NAME.to_string())
            .spawn(move || Self::run_accept_loop(&listener, &ctx));

        match spawned {
            Ok(handle) => {
                debug!(thread_id = ?handle.thread().id(), "accept loop spawned");
                *self.lock_thread() = Some(handle);
                Ok(local_addr)
            }
            Err(e) => {
                // Sin bucle no tiene sentido dejar el puerto abierto
                self.listener.close();
                Err(ServerError::Spawn(e))
            }
        }
    }

    /// Cuerpo del hilo de aceptación
    fn run_accept_loop(listener: &Listener, ctx: &HandlerContext) -> Result<(), ServerError> {
        let Some(handle) = listener.handle() else {
            info!("server stopped before accepting");
            return Ok(());
        };

        Self::accept_loop(listener, &handle, ctx)
    }

    /// Bucle de aceptación
    ///
    /// Su salida es la única forma de terminar el ciclo de aceptación. Si
    /// sale por error, el socket se suelta antes de retornar: el puerto se
    /// cierra cuando quien llamó suelta el `acceptor`.
    fn accept_loop<A: Acceptor>(
        listener: &Listener,
        acceptor: &A,
        ctx: &HandlerContext,
    ) -> Result<(), ServerError> {
        loop {
            match acceptor.accept_next() {
                Ok(Accepted::Connection(stream, peer)) => Self::dispatch(stream, peer, ctx),
                Ok(Accepted::Stopped) => {
                    info!("server stopped");
                    return Ok(());
                }
                Err(e) => {
                    error!(error = %e, "error accepting client connection");
                    listener.release();
                    return Err(ServerError::Accept(e));
                }
            }
        }
    }

    /// Lanza el handler de una conexión en un hilo nuevo
    fn dispatch(stream: TcpStream, peer: SocketAddr, ctx: &HandlerContext) {
        debug!(%peer, "new connection (spawning thread)");
        ctx.stats.connection_accepted();

        let thread_ctx = ctx.clone();
        let spawned = thread::Builder::new()
            .name(format!("client-{}", peer.port()))
            .spawn(move || handler::serve(stream, peer, &thread_ctx));

        // Si no hay hilo, la conexión ya se cerró al soltar el closure
        if let Err(e) = spawned {
            warn!(%peer, error = %e, "cannot spawn handler thread, connection dropped");
            ctx.stats.record_failure();
            ctx.stats.handler_finished();
        }
    }

    /// Para el servidor
    ///
    /// Activa el flag y cierra el socket de escucha, en ese orden y bajo el
    /// mismo mutex. El `accept` bloqueado retorna y el bucle sale limpio.
    /// Llamarlo otra vez no hace nada.
    pub fn stop(&self) {
        if self.listener.close() {
            info!("stopping server");
        } else {
            debug!("stop called on an already stopped server");
        }
    }

    /// Espera a que termine el bucle de aceptación y retorna su resultado
    ///
    /// Así quien arrancó el servidor observa un `AcceptError` fatal. Si el
    /// servidor nunca arrancó, o ya se hizo `join`, retorna `Ok(())`.
    pub fn join(&self) -> Result<(), ServerError> {
        let handle = self.lock_thread().take();

        match handle {
            Some(handle) => handle.join().map_err(|_| ServerError::AcceptLoopPanicked)?,
            None => Ok(()),
        }
    }

    fn lock_thread(&self) -> MutexGuard<'_, Option<AcceptThread>> {
        self.accept_thread.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// ¿Se llamó a `stop`?
    pub fn is_stopped(&self) -> bool {
        self.listener.is_stopped()
    }

    /// Puerto configurado (puede ser 0)
    pub fn port(&self) -> u16 {
        self.config.port
    }

    /// Dirección real en la que escucha, una vez arrancado
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.local_addr()
    }

    /// Id del hilo del bucle de aceptación, mientras no se haya hecho `join`
    pub fn accept_thread_id(&self) -> Option<ThreadId> {
        self.lock_thread().as_ref().map(|handle| handle.thread().id())
    }

    /// Estadísticas de conexiones
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        // Un servidor soltado no debe dejar el hilo de aceptación bloqueado
        self.listener.close();
    }
}
