//! # Configuración del Servidor
//! src/config.rs
//!
//! Este módulo define la configuración del servidor con soporte para
//! argumentos CLI y variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./client_thread_server --port 9001 \
//!   --static-dir ./static \
//!   --run-secs 60
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=9001 RUN_SECS=0 ./client_thread_server
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Niveles aceptados por `--log-level`
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuración del servidor
#[derive(Debug, Clone, Parser)]
#[command(name = "client_thread_server")]
#[command(about = "Servidor TCP/HTTP con un hilo por cliente y parada ordenada")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor (0 = puerto efímero)
    #[arg(short, long, default_value = "9001", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "HTTP_HOST")]
    pub host: String,

    /// Directorio donde se busca el icono (favicon.ico)
    #[arg(long = "static-dir", default_value = "./static", env = "STATIC_DIR")]
    pub static_dir: PathBuf,

    /// Segundos que el servidor atiende antes de pararse (0 = hasta que termine el bucle)
    #[arg(long = "run-secs", default_value = "260", env = "RUN_SECS")]
    pub run_secs: u64,

    /// Timeout de lectura por conexión en milisegundos (0 = sin timeout)
    #[arg(long = "read-timeout-ms", default_value = "0", env = "READ_TIMEOUT_MS")]
    pub read_timeout_ms: u64,

    /// Nivel de log por defecto si RUST_LOG no está definido
    #[arg(long = "log-level", default_value = "info", env = "LOG_LEVEL")]
    pub log_level: String,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Configuración por defecto escuchando en `port`
    ///
    /// # Ejemplo
    /// ```
    /// use client_thread_server::config::Config;
    ///
    /// let config = Config::with_port(0);
    /// assert_eq!(config.address(), "127.0.0.1:0");
    /// ```
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Self::default()
        }
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```
    /// use client_thread_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:9001");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Timeout de lectura por conexión, si está configurado
    pub fn read_timeout(&self) -> Option<Duration> {
        (self.read_timeout_ms > 0).then(|| Duration::from_millis(self.read_timeout_ms))
    }

    /// Tiempo que el entry point mantiene el servidor atendiendo
    pub fn run_duration(&self) -> Option<Duration> {
        (self.run_secs > 0).then(|| Duration::from_secs(self.run_secs))
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("Host must not be empty".to_string());
        }

        if self.static_dir.as_os_str().is_empty() {
            return Err("Static dir must not be empty".to_string());
        }

        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(format!(
                "Log level must be one of {}",
                LOG_LEVELS.join(", ")
            ));
        }

        Ok(())
    }

    /// Registra un resumen de la configuración
    pub fn print_summary(&self) {
        info!(address = %self.address(), "🌐 network");
        info!(static_dir = %self.static_dir.display(), "📁 static resources");

        match self.run_duration() {
            Some(d) => info!(seconds = d.as_secs(), "⏱️  server will stop automatically"),
            None => info!("⏱️  server runs until the accept loop ends"),
        }

        match self.read_timeout() {
            Some(t) => info!(millis = t.as_millis() as u64, "read timeout per connection"),
            None => info!("read timeout per connection: disabled"),
        }
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 9001,
            host: "127.0.0.1".to_string(),
            static_dir: PathBuf::from("./static"),
            run_secs: 260,
            read_timeout_ms: 0,
            log_level: "info".to_string(),
        }
    }
}
