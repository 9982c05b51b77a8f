//! Modelo de rutas de tour y orquestación de su optimización
//!
//! Mantiene una colección ordenada de puntos geográficos (regiones
//! administrativas y sus seats opcionales) y produce un tour cerrado
//! casi óptimo que visita cada punto exactamente una vez, volviendo a un
//! punto de partida canónico.
//!
//! La adquisición de datos, el renderizado de mapas y el cableado de CLI
//! quedan fuera: son colaboradores externos de esta biblioteca.

pub mod config;
pub mod dto;
pub mod models;
pub mod services;
pub mod utils;

pub use config::TourConfig;
pub use dto::solver_dto::{SolveOutcome, SolveRequest, TimeBound};
pub use models::{Column, Locator, RecordUpdate, RegionRecord, SeatCandidate, TourRoute, TourSlice, VisitRecord};
pub use services::{DirectionsService, HttpSolverClient, OptimizerService, SolverState, TourSolver};
pub use utils::errors::{RouteError, RouteResult};
