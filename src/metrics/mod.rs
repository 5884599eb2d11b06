//! # Estadísticas
//! src/metrics/mod.rs
//!
//! Contadores de conexiones aceptadas, handlers activos, respuestas por
//! código y fallos aislados.

pub mod collector;

pub use collector::{ConnectionStats, StatsSnapshot};
