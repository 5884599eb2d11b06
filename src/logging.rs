//! # Logging
//! src/logging.rs
//!
//! Inicialización de `tracing-subscriber`. `RUST_LOG` tiene prioridad sobre
//! el nivel que llega por configuración.

use tracing_subscriber::EnvFilter;

/// Instala el subscriber global del binario
///
/// Si ya había uno instalado no hace nada.
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.to_ascii_lowercase()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(true)
        .try_init();
}

/// Inicializa logging para tests con salida capturada por el harness
///
/// Se puede llamar varias veces; solo la primera tiene efecto.
pub fn init_test_logging() {
    use std::sync::Once;

    static INIT_LOGGING: Once = Once::new();

    INIT_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .with_thread_names(true)
            .with_ansi(false)
            .try_init();
    });
}
