//! Modelo de VisitRecord
//!
//! Este módulo contiene el punto atómico de la ruta: una región
//! administrativa con su seat opcional, resuelta a un único punto de
//! visita. El punto de visita es el seat si está disponible, si no la
//! región, resuelto campo a campo.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::errors::{data_integrity_error, RouteResult};
use crate::utils::validation::{is_valid_category_code, validate_latitude, validate_longitude};

/// Región administrativa — datos obligatorios de entrada
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegionRecord {
    pub region_id: i64,

    #[validate(length(min = 1))]
    pub region_name: String,

    pub state: String,

    /// Código de categoría estilo Geonames, formato CC.SS.AAA
    pub category_code: String,

    /// Código numérico estandarizado (p. ej. FIPS) para referencias cruzadas
    pub external_code: i64,

    #[validate(range(min = -90.0, max = 90.0))]
    pub region_lat: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub region_lon: f64,
}

/// Datos de seat tal como llegan del join de origen.
///
/// Todos los campos son opcionales: en los datos reales existen seats
/// administrativos sin coordenadas registradas.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeatCandidate {
    pub seat_id: Option<i64>,
    pub seat_name: Option<String>,
    pub seat_lat: Option<f64>,
    pub seat_lon: Option<f64>,
}

impl SeatCandidate {
    /// Un candidato está completo cuando tiene nombre y ambas coordenadas
    pub fn is_complete(&self) -> bool {
        self.seat_name.is_some() && self.seat_lat.is_some() && self.seat_lon.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.seat_id.is_none()
            && self.seat_name.is_none()
            && self.seat_lat.is_none()
            && self.seat_lon.is_none()
    }
}

/// Punto de visita de la ruta: región + seat opcional + campos derivados.
///
/// Invariantes:
/// * los campos `seat_name`/`seat_lat`/`seat_lon` están todos presentes o
///   todos ausentes (el triple se guarda sólo si está completo);
/// * `visit_name`/`visit_lat`/`visit_lon` siempre están derivados.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitRecord {
    pub region_id: i64,
    pub region_name: String,
    pub state: String,
    pub category_code: String,
    pub external_code: i64,
    pub region_lat: f64,
    pub region_lon: f64,

    pub seat_id: Option<i64>,
    pub seat_name: Option<String>,
    pub seat_lat: Option<f64>,
    pub seat_lon: Option<f64>,

    pub visit_name: String,
    pub visit_lat: f64,
    pub visit_lon: f64,
}

impl VisitRecord {
    /// Resolver una región y su seat opcional a un punto de visita.
    ///
    /// La preferencia seat-sobre-región se aplica campo a campo: un seat
    /// con nombre pero sin coordenadas aporta su nombre al punto de visita
    /// y hereda las coordenadas de la región.
    pub fn resolve(region: RegionRecord, seat: Option<SeatCandidate>) -> RouteResult<Self> {
        region.validate()?;

        if !is_valid_category_code(&region.category_code) {
            log::warn!(
                "⚠️ Código de categoría con formato inesperado para región {}: '{}'",
                region.region_id,
                region.category_code
            );
        }

        let candidate = seat.unwrap_or_default();

        if let Some(lat) = candidate.seat_lat {
            validate_latitude(lat).map_err(single_field_error("seat_lat"))?;
        }
        if let Some(lon) = candidate.seat_lon {
            validate_longitude(lon).map_err(single_field_error("seat_lon"))?;
        }

        let visit_name = candidate
            .seat_name
            .clone()
            .unwrap_or_else(|| region.region_name.clone());
        let visit_lat = candidate.seat_lat.unwrap_or(region.region_lat);
        let visit_lon = candidate.seat_lon.unwrap_or(region.region_lon);

        // El triple de seat sólo se guarda completo
        let (seat_id, seat_name, seat_lat, seat_lon) = if candidate.is_complete() {
            (
                candidate.seat_id,
                candidate.seat_name,
                candidate.seat_lat,
                candidate.seat_lon,
            )
        } else {
            if !candidate.is_empty() {
                log::warn!(
                    "⚠️ Seat incompleto para región {}: se usa campo a campo pero no se almacena",
                    region.region_id
                );
            }
            (None, None, None, None)
        };

        Ok(Self {
            region_id: region.region_id,
            region_name: region.region_name,
            state: region.state,
            category_code: region.category_code,
            external_code: region.external_code,
            region_lat: region.region_lat,
            region_lon: region.region_lon,
            seat_id,
            seat_name,
            seat_lat,
            seat_lon,
            visit_name,
            visit_lat,
            visit_lon,
        })
    }

    /// Resolver una región contra los candidatos de seat que devolvió el
    /// join de origen. El join debe ser uno a uno: más de un candidato es
    /// un error de integridad de datos, no se arbitra aquí.
    pub fn resolve_one_to_one(
        region: RegionRecord,
        mut candidates: Vec<SeatCandidate>,
    ) -> RouteResult<Self> {
        if candidates.len() > 1 {
            return Err(data_integrity_error(&format!(
                "{} seats map to region {}; expected at most one",
                candidates.len(),
                region.region_id
            )));
        }
        Self::resolve(region, candidates.pop())
    }

    /// Coordenada de visita `(lat, lon)`
    pub fn visit_coords(&self) -> (f64, f64) {
        (self.visit_lat, self.visit_lon)
    }

    /// Re-derivar los campos de visita tras una mutación de región o seat
    pub(crate) fn rederive_visit_fields(&mut self) {
        self.visit_name = self
            .seat_name
            .clone()
            .unwrap_or_else(|| self.region_name.clone());
        self.visit_lat = self.seat_lat.unwrap_or(self.region_lat);
        self.visit_lon = self.seat_lon.unwrap_or(self.region_lon);
    }

    /// Comprobar el invariante todo-o-nada del triple de seat
    pub(crate) fn seat_triple_is_consistent(&self) -> bool {
        let present = [
            self.seat_name.is_some(),
            self.seat_lat.is_some(),
            self.seat_lon.is_some(),
        ];
        present.iter().all(|p| *p) || present.iter().all(|p| !*p)
    }
}

fn single_field_error(
    field: &'static str,
) -> impl FnOnce(validator::ValidationError) -> validator::ValidationErrors {
    move |error| {
        let mut errors = validator::ValidationErrors::new();
        errors.add(field, error);
        errors
    }
}

/// Mutación parcial de un VisitRecord; los campos ausentes no se tocan
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordUpdate {
    pub region_name: Option<String>,
    pub state: Option<String>,
    pub category_code: Option<String>,
    pub external_code: Option<i64>,
    pub region_lat: Option<f64>,
    pub region_lon: Option<f64>,
    pub seat_id: Option<i64>,
    pub seat_name: Option<String>,
    pub seat_lat: Option<f64>,
    pub seat_lon: Option<f64>,
    /// Eliminar el seat por completo (tiene prioridad sobre los campos seat)
    #[serde(default)]
    pub clear_seat: bool,
}

impl RecordUpdate {
    /// Aplicar la mutación sobre un registro, re-derivando los campos de
    /// visita. Falla con DataIntegrity si el resultado rompe el invariante
    /// del triple de seat; en ese caso el registro queda sin tocar.
    pub(crate) fn apply(&self, record: &mut VisitRecord) -> RouteResult<()> {
        let mut updated = record.clone();

        if let Some(v) = &self.region_name {
            updated.region_name = v.clone();
        }
        if let Some(v) = &self.state {
            updated.state = v.clone();
        }
        if let Some(v) = &self.category_code {
            updated.category_code = v.clone();
        }
        if let Some(v) = self.external_code {
            updated.external_code = v;
        }
        if let Some(v) = self.region_lat {
            validate_latitude(v).map_err(single_field_error("region_lat"))?;
            updated.region_lat = v;
        }
        if let Some(v) = self.region_lon {
            validate_longitude(v).map_err(single_field_error("region_lon"))?;
            updated.region_lon = v;
        }

        if self.clear_seat {
            updated.seat_id = None;
            updated.seat_name = None;
            updated.seat_lat = None;
            updated.seat_lon = None;
        } else {
            if let Some(v) = self.seat_id {
                updated.seat_id = Some(v);
            }
            if let Some(v) = &self.seat_name {
                updated.seat_name = Some(v.clone());
            }
            if let Some(v) = self.seat_lat {
                validate_latitude(v).map_err(single_field_error("seat_lat"))?;
                updated.seat_lat = Some(v);
            }
            if let Some(v) = self.seat_lon {
                validate_longitude(v).map_err(single_field_error("seat_lon"))?;
                updated.seat_lon = Some(v);
            }
        }

        if !updated.seat_triple_is_consistent() {
            return Err(data_integrity_error(&format!(
                "partial seat data for region {} after update",
                updated.region_id
            )));
        }

        updated.rederive_visit_fields();
        *record = updated;
        Ok(())
    }
}
