//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema de rutas
//! y los helpers para construirlos.

use thiserror::Error;

/// Errores principales del modelo de ruta y su orquestación
#[derive(Error, Debug)]
pub enum RouteError {
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Length mismatch: {0}")]
    LengthMismatch(String),

    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Solver failure: {0}")]
    SolverFailure(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Resultado tipado para operaciones que pueden fallar
pub type RouteResult<T> = Result<T, RouteError>;

/// Función helper para crear errores de clave duplicada
pub fn duplicate_key_error(resource: &str, id: i64) -> RouteError {
    RouteError::DuplicateKey(format!("{} with id '{}' already exists", resource, id))
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: i64) -> RouteError {
    RouteError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de longitud
pub fn length_mismatch_error(expected: usize, actual: usize) -> RouteError {
    RouteError::LengthMismatch(format!(
        "permutation of length {} applied to route of length {}",
        actual, expected
    ))
}

/// Función helper para crear errores de integridad de datos
pub fn data_integrity_error(message: &str) -> RouteError {
    RouteError::DataIntegrity(message.to_string())
}

/// Función helper para crear errores de argumento inválido
pub fn invalid_argument_error(message: &str) -> RouteError {
    RouteError::InvalidArgument(message.to_string())
}

/// Función helper para crear errores del solver externo
pub fn solver_failure_error(message: &str) -> RouteError {
    RouteError::SolverFailure(message.to_string())
}
