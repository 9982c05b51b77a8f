//! Modelo de TourSlice
//!
//! Un tramo contiguo de la ruta: origen, destino y waypoints interiores.
//! Sólo lo produce `TourRoute::slices` y es inmutable una vez construido.

use serde::Serialize;

/// Tramo de ruta acotado, apto para una petición al servicio de direcciones
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TourSlice {
    origin: (f64, f64),
    destination: (f64, f64),
    waypoints: Vec<(f64, f64)>,
}

impl TourSlice {
    pub(crate) fn new(
        origin: (f64, f64),
        destination: (f64, f64),
        waypoints: Vec<(f64, f64)>,
    ) -> Self {
        Self {
            origin,
            destination,
            waypoints,
        }
    }

    pub fn origin(&self) -> (f64, f64) {
        self.origin
    }

    pub fn destination(&self) -> (f64, f64) {
        self.destination
    }

    /// Puntos estrictamente interiores, posiblemente vacíos
    pub fn waypoints(&self) -> &[(f64, f64)] {
        &self.waypoints
    }

    /// Número total de puntos del tramo, extremos incluidos
    pub fn point_count(&self) -> usize {
        self.waypoints.len() + 2
    }
}
