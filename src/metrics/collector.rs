//! # Estadísticas de Conexiones
//! src/metrics/collector.rs
//!
//! Contadores compartidos entre el bucle de aceptación y los handlers.
//! No se exponen por la red: el entry point los registra al parar.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

/// Collector de estadísticas thread-safe
#[derive(Clone)]
pub struct ConnectionStats {
    inner: Arc<Mutex<StatsData>>,
    start_time: Instant,
}

/// Datos internos
#[derive(Default)]
struct StatsData {
    /// Conexiones aceptadas por el bucle
    accepted: u64,

    /// Handlers ejecutándose ahora mismo
    active_handlers: u64,

    /// Respuestas escritas por código de estado
    status_codes: BTreeMap<u16, u64>,

    /// Conexiones cerradas sin respuesta por línea vacía o fin de stream
    empty_requests: u64,

    /// Conexiones que terminaron con error de E/S
    failures: u64,
}

impl ConnectionStats {
    /// Crea un collector vacío
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(StatsData::default())),
            start_time: Instant::now(),
        }
    }

    fn with_data<T>(&self, f: impl FnOnce(&mut StatsData) -> T) -> T {
        // Los contadores siguen siendo válidos aunque un hilo haya hecho panic
        let mut data = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut data)
    }

    /// Registra una conexión aceptada y su handler recién lanzado
    pub fn connection_accepted(&self) {
        self.with_data(|data| {
            data.accepted += 1;
            data.active_handlers += 1;
        });
    }

    /// Registra el fin de un handler, haya ido bien o mal
    pub fn handler_finished(&self) {
        self.with_data(|data| {
            data.active_handlers = data.active_handlers.saturating_sub(1);
        });
    }

    /// Registra una respuesta enviada
    pub fn record_response(&self, status_code: u16) {
        self.with_data(|data| {
            *data.status_codes.entry(status_code).or_insert(0) += 1;
        });
    }

    pub fn record_empty_request(&self) {
        self.with_data(|data| data.empty_requests += 1);
    }

    pub fn record_failure(&self) {
        self.with_data(|data| data.failures += 1);
    }

    /// Obtiene el número de handlers activos
    pub fn active_handlers(&self) -> u64 {
        self.with_data(|data| data.active_handlers)
    }

    /// Obtiene un snapshot de las estadísticas
    pub fn snapshot(&self) -> StatsSnapshot {
        let uptime_secs = self.start_time.elapsed().as_secs();

        self.with_data(|data| StatsSnapshot {
            uptime_secs,
            accepted: data.accepted,
            active_handlers: data.active_handlers,
            responses: data.status_codes.values().sum(),
            status_codes: data.status_codes.clone(),
            empty_requests: data.empty_requests,
            failures: data.failures,
        })
    }
}

impl Default for ConnectionStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot de estadísticas (para uso externo)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub uptime_secs: u64,
    pub accepted: u64,
    pub active_handlers: u64,
    pub responses: u64,
    pub status_codes: BTreeMap<u16, u64>,
    pub empty_requests: u64,
    pub failures: u64,
}

impl StatsSnapshot {
    /// Renderiza el snapshot como JSON
    pub fn to_json(&self) -> String {
        // Serializar structs de enteros y mapas con claves enteras no falla
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_counters() {
        let stats = ConnectionStats::new();

        stats.connection_accepted();
        stats.connection_accepted();
        stats.record_response(200);
        stats.handler_finished();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.accepted, 2);
        assert_eq!(snapshot.active_handlers, 1);
        assert_eq!(snapshot.responses, 1);
    }

    #[test]
    fn test_multiple_status_codes() {
        let stats = ConnectionStats::new();

        stats.record_response(200);
        stats.record_response(200);
        stats.record_response(404);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.responses, 3);
        assert_eq!(snapshot.status_codes.get(&200), Some(&2));
        assert_eq!(snapshot.status_codes.get(&404), Some(&1));
    }

    #[test]
    fn test_active_handlers_no_negative() {
        let stats = ConnectionStats::new();

        stats.handler_finished();
        stats.handler_finished();

        assert_eq!(stats.active_handlers(), 0);
    }

    #[test]
    fn test_empty_and_failures() {
        let stats = ConnectionStats::new();

        stats.record_empty_request();
        stats.record_failure();
        stats.record_failure();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.empty_requests, 1);
        assert_eq!(snapshot.failures, 2);
        assert_eq!(snapshot.responses, 0);
    }

    #[test]
    fn test_concurrent_updates() {
        let stats = ConnectionStats::new();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let stats = stats.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        stats.connection_accepted();
                        stats.record_response(200);
                        stats.handler_finished();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.accepted, 800);
        assert_eq!(snapshot.responses, 800);
        assert_eq!(snapshot.active_handlers, 0);
    }

    #[test]
    fn test_json_format() {
        let stats = ConnectionStats::new();
        stats.connection_accepted();
        stats.record_response(404);

        let json = stats.snapshot().to_json();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["accepted"], 1);
        assert_eq!(value["status_codes"]["404"], 1);
    }
}
