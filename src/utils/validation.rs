//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de coordenadas
//! y códigos de clasificación.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    // Formato Geonames: CC.SS.AAA (país, estado, número de condado)
    static ref CATEGORY_CODE_REGEX: Regex =
        Regex::new(r"^[A-Z]{2}\.[A-Z]{2}\.\d{3}$").unwrap();
}

/// Validar que una latitud esté en el rango [-90, 90]
pub fn validate_latitude(value: f64) -> Result<(), ValidationError> {
    if !(-90.0..=90.0).contains(&value) || value.is_nan() {
        let mut error = ValidationError::new("latitude");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que una longitud esté en el rango [-180, 180]
pub fn validate_longitude(value: f64) -> Result<(), ValidationError> {
    if !(-180.0..=180.0).contains(&value) || value.is_nan() {
        let mut error = ValidationError::new("longitude");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Comprobar el formato `CC.SS.AAA` de un código de categoría.
///
/// Los datos de origen son conocidamente sucios, así que esto es una
/// comprobación blanda: el llamador decide si registra un warning o
/// rechaza el registro.
pub fn is_valid_category_code(value: &str) -> bool {
    CATEGORY_CODE_REGEX.is_match(value)
}
