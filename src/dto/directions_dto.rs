//! DTOs para el servicio externo de direcciones
//!
//! Este módulo define las estructuras para extraer distancia y duración
//! por tramo de un servicio de direcciones de conducción. Sólo se extraen
//! legs y polilíneas; el resto de la respuesta no se modela.

use serde::{Deserialize, Serialize};

/// Response del servicio de direcciones (estilo Google Directions)
#[derive(Debug, Deserialize)]
pub struct DirectionsResponse {
    pub status: String,
    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
pub struct DirectionsRoute {
    #[serde(default)]
    pub legs: Vec<DirectionsLeg>,
    #[serde(default)]
    pub overview_polyline: Option<DirectionsPolyline>,
}

#[derive(Debug, Deserialize)]
pub struct DirectionsLeg {
    pub distance: LegValue,
    pub duration: LegValue,
}

/// Valor con texto y magnitud; sólo interesa la magnitud
#[derive(Debug, Deserialize)]
pub struct LegValue {
    pub value: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsPolyline {
    pub points: String,
}

/// Distancia y duración agregadas de un tramo de la ruta
#[derive(Debug, Clone, Default, Serialize)]
pub struct SliceDistDur {
    /// Índice del tramo dentro del tour (los resultados se escriben en
    /// orden de tour, no de finalización)
    pub slice_index: usize,
    pub distance_m: u64,
    pub duration_s: u64,
    pub polyline_segments: Vec<String>,
}

/// Totales de conducción de la ruta completa
#[derive(Debug, Clone, Default, Serialize)]
pub struct RouteDistDur {
    pub distance_m: u64,
    pub duration_s: u64,
    pub slices: Vec<SliceDistDur>,
}
