//! DTOs para el solver externo de tours
//!
//! Este módulo define las estructuras de datos para interactuar con la
//! capacidad externa de optimización de tours, y los tipos internos con
//! los que trabaja el orquestador.

use serde::{Deserialize, Serialize};

/// Métrica de distancia que debe usar el solver
pub const GREAT_CIRCLE_METRIC: &str = "great-circle";

/// Sentinel de tiempo ilimitado en el protocolo del solver
const UNBOUNDED_SENTINEL: f64 = -1.0;

/// Cota de tiempo para el solver
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeBound {
    /// Sin límite: el solver corre hasta encontrar un tour
    Unbounded,
    /// Límite en segundos (no negativo)
    Seconds(f64),
}

impl TimeBound {
    /// Representación de protocolo: los solvers clásicos usan -1 como
    /// sentinel de "sin límite"
    pub fn as_wire(&self) -> f64 {
        match self {
            TimeBound::Unbounded => UNBOUNDED_SENTINEL,
            TimeBound::Seconds(s) => *s,
        }
    }
}

/// Petición interna de resolución de tour
#[derive(Debug, Clone)]
pub struct SolveRequest {
    /// Coordenadas `(lat, lon)` en el orden actual de la ruta
    pub points: Vec<(f64, f64)>,
    pub time_bound: TimeBound,
    pub seed: i64,
}

/// Resultado reportado por el solver
#[derive(Debug, Clone, Deserialize)]
pub struct SolveOutcome {
    pub success: bool,
    /// Permutación de posiciones de entrada que describe el tour cerrado
    pub tour: Vec<usize>,
}

/// Request para enviar al endpoint del solver
#[derive(Debug, Serialize)]
pub struct SolverSubmitRequest {
    pub version: u32,
    pub metric: String,
    pub time_bound: f64,
    pub seed: i64,
    pub points: Vec<SolverPoint>,
}

/// Punto en el protocolo del solver
#[derive(Debug, Clone, Serialize)]
pub struct SolverPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Response de submit (cuando se envía el problema)
#[derive(Debug, Deserialize)]
pub struct SolverSubmitResponse {
    pub id: String,
    pub status: String,
}

/// Response con la solución (o el fallo) del solver
#[derive(Debug, Deserialize)]
pub struct SolverSolutionResponse {
    pub status: String,
    pub success: bool,
    #[serde(default)]
    pub tour: Option<Vec<usize>>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_bound_wire_sentinel() {
        assert_eq!(TimeBound::Unbounded.as_wire(), -1.0);
        assert_eq!(TimeBound::Seconds(30.0).as_wire(), 30.0);
    }
}
