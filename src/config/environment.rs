//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno para los
//! colaboradores externos (solver y servicio de direcciones) y los
//! valores por defecto del tour.

use std::env;

/// gid del punto de partida canónico del tour (Kings County, NY)
pub const DEFAULT_START_REGION_ID: i64 = 6941775;

/// Longitud de tramo por defecto para el servicio de direcciones
pub const DEFAULT_SLICE_LEN: usize = 10;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct TourConfig {
    pub solver_url: String,
    pub directions_url: String,
    pub directions_api_key: Option<String>,
    pub start_region_id: i64,
    pub slice_len: usize,
    pub http_timeout_secs: u64,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            solver_url: env::var("TOUR_SOLVER_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            directions_url: env::var("DIRECTIONS_URL")
                .unwrap_or_else(|_| "https://maps.googleapis.com/maps/api".to_string()),
            directions_api_key: env::var("DIRECTIONS_API_KEY").ok(),
            start_region_id: env::var("TOUR_START_REGION_ID")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_START_REGION_ID),
            slice_len: env::var("TOUR_SLICE_LEN")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SLICE_LEN),
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
        }
    }
}

impl TourConfig {
    /// Cargar configuración leyendo primero el fichero .env si existe
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::default()
    }
}
