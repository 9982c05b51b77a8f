pub mod directions_service;
pub mod optimizer_service;
pub mod route_store;
pub mod solver_client;

pub use directions_service::DirectionsService;
pub use optimizer_service::{OptimizerService, SolverState};
pub use solver_client::{HttpSolverClient, TourSolver};
