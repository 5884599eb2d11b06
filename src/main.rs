//! # Client Thread Server - Entry Point
//! src/main.rs
//!
//! Crea el servidor, lo arranca, lo deja atender durante `--run-secs`
//! segundos y lo para.

use client_thread_server::config::Config;
use client_thread_server::logging;
use client_thread_server::server::Server;
use std::thread;
use tracing::{error, info};

fn main() {
    let config = Config::new();
    logging::init(&config.log_level);

    if let Err(e) = config.validate() {
        error!("💥 Configuración inválida: {}", e);
        std::process::exit(2);
    }
    config.print_summary();

    let run_duration = config.run_duration();
    let server = Server::new(config);

    let local_addr = match server.start() {
        Ok(addr) => addr,
        Err(e) => {
            error!("💥 Error fatal: {}", e);
            std::process::exit(1);
        }
    };

    match run_duration {
        Some(duration) => {
            info!(
                "Servidor en http://{} durante {} segundos",
                local_addr,
                duration.as_secs()
            );
            thread::sleep(duration);
            info!("Stopping server");
            server.stop();
        }
        None => info!("Servidor en http://{} hasta que termine el bucle", local_addr),
    }

    let result = server.join();
    info!(stats = %server.stats().to_json(), "connection stats");

    if let Err(e) = result {
        error!("💥 Error fatal: {}", e);
        std::process::exit(1);
    }
}
