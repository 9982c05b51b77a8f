//! Persistencia tabular de rutas
//!
//! Este módulo lee y escribe la ruta en forma tabular (un registro por
//! fila). Al leer se reconstruyen los invariantes del modelo: los campos
//! de visita se re-derivan y, si el fichero trae valores explícitos que
//! no cuadran, se registra un warning y ganan los derivados.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::models::tour_route::TourRoute;
use crate::models::visit_record::{RegionRecord, SeatCandidate, VisitRecord};
use crate::utils::errors::RouteResult;

const VISIT_FIELD_TOLERANCE: f64 = 1e-9;

/// Fila cruda del fichero; acepta tanto los nombres de columna propios
/// como los del dataset de origen (gid_county, name_county, ...)
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(alias = "gid_county")]
    region_id: i64,
    #[serde(alias = "name_county")]
    region_name: String,
    state: String,
    #[serde(alias = "cat_code")]
    category_code: String,
    #[serde(alias = "fips_code")]
    external_code: i64,
    #[serde(alias = "lat_county")]
    region_lat: f64,
    #[serde(alias = "lon_county")]
    region_lon: f64,

    #[serde(default, alias = "gid_seat")]
    seat_id: Option<i64>,
    #[serde(default, alias = "name_seat")]
    seat_name: Option<String>,
    #[serde(default, alias = "lat_seat")]
    seat_lat: Option<f64>,
    #[serde(default, alias = "lon_seat")]
    seat_lon: Option<f64>,

    #[serde(default, alias = "name_visit")]
    visit_name: Option<String>,
    #[serde(default, alias = "lat_visit")]
    visit_lat: Option<f64>,
    #[serde(default, alias = "lon_visit")]
    visit_lon: Option<f64>,
}

/// Escribir la ruta a un fichero CSV, creando el directorio si hace falta
pub fn write_csv(route: &TourRoute, path: &Path) -> RouteResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    for record in route.records() {
        writer.serialize(record)?;
    }
    writer.flush()?;

    log::info!("💾 Ruta de {} puntos escrita en {}", route.len(), path.display());
    Ok(())
}

/// Leer una ruta desde un fichero CSV, reconstruyendo los invariantes
pub fn read_csv(path: &Path) -> RouteResult<TourRoute> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();

    for row in reader.deserialize() {
        let raw: RawRow = row?;
        records.push(record_from_row(raw)?);
    }

    let route = TourRoute::from_records(records)?;
    log::info!("📖 Ruta de {} puntos leída de {}", route.len(), path.display());
    Ok(route)
}

fn record_from_row(raw: RawRow) -> RouteResult<VisitRecord> {
    let region = RegionRecord {
        region_id: raw.region_id,
        region_name: raw.region_name,
        state: raw.state,
        category_code: raw.category_code,
        external_code: raw.external_code,
        region_lat: raw.region_lat,
        region_lon: raw.region_lon,
    };
    let candidate = SeatCandidate {
        seat_id: raw.seat_id,
        seat_name: raw.seat_name,
        seat_lat: raw.seat_lat,
        seat_lon: raw.seat_lon,
    };
    let seat = if candidate.is_empty() {
        None
    } else {
        Some(candidate)
    };

    let record = VisitRecord::resolve(region, seat)?;

    // Validar los campos de visita explícitos del fichero contra la
    // re-derivación; en caso de discrepancia ganan los derivados
    let name_mismatch = raw
        .visit_name
        .as_ref()
        .is_some_and(|name| name != &record.visit_name);
    let lat_mismatch = raw
        .visit_lat
        .is_some_and(|lat| (lat - record.visit_lat).abs() > VISIT_FIELD_TOLERANCE);
    let lon_mismatch = raw
        .visit_lon
        .is_some_and(|lon| (lon - record.visit_lon).abs() > VISIT_FIELD_TOLERANCE);

    if name_mismatch || lat_mismatch || lon_mismatch {
        log::warn!(
            "⚠️ Campos de visita del fichero no cuadran con la derivación para región {}; se usan los derivados",
            record.region_id
        );
    }

    Ok(record)
}
