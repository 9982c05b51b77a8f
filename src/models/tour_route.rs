//! Modelo de TourRoute
//!
//! Este módulo contiene la colección ordenada de puntos de visita y sus
//! operaciones de mutación: altas, bajas, actualizaciones, permutación y
//! rotación. El orden de los registros es el orden del tour.
//!
//! A diferencia del origen tabular (filtrado por etiquetas y máscaras
//! booleanas con realineado implícito de índices), aquí la colección es
//! explícita y las operaciones posicionales trabajan contra un snapshot
//! fijo de posiciones.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::tour_slice::TourSlice;
use crate::models::visit_record::{RecordUpdate, VisitRecord};
use crate::utils::distance::consecutive_distances;
use crate::utils::errors::{
    duplicate_key_error, invalid_argument_error, length_mismatch_error, not_found_error,
    RouteResult,
};

/// Longitud mínima de un tramo (origen y destino)
pub const MIN_SLICE_LEN: usize = 2;

/// Selector de registros: por id externo de región o por posición
#[derive(Debug, Clone)]
pub enum Locator {
    RegionIds(Vec<i64>),
    Positions(Vec<usize>),
}

/// Columnas proyectables de un VisitRecord
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    RegionId,
    RegionName,
    State,
    CategoryCode,
    ExternalCode,
    RegionLat,
    RegionLon,
    SeatId,
    SeatName,
    SeatLat,
    SeatLon,
    VisitName,
    VisitLat,
    VisitLon,
}

impl Column {
    fn value_of(&self, record: &VisitRecord) -> Option<String> {
        match self {
            Column::RegionId => Some(record.region_id.to_string()),
            Column::RegionName => Some(record.region_name.clone()),
            Column::State => Some(record.state.clone()),
            Column::CategoryCode => Some(record.category_code.clone()),
            Column::ExternalCode => Some(record.external_code.to_string()),
            Column::RegionLat => Some(record.region_lat.to_string()),
            Column::RegionLon => Some(record.region_lon.to_string()),
            Column::SeatId => record.seat_id.map(|v| v.to_string()),
            Column::SeatName => record.seat_name.clone(),
            Column::SeatLat => record.seat_lat.map(|v| v.to_string()),
            Column::SeatLon => record.seat_lon.map(|v| v.to_string()),
            Column::VisitName => Some(record.visit_name.clone()),
            Column::VisitLat => Some(record.visit_lat.to_string()),
            Column::VisitLon => Some(record.visit_lon.to_string()),
        }
    }
}

/// Colección ordenada de puntos de visita; el orden es el orden del tour
#[derive(Debug, Clone, Default, Serialize)]
pub struct TourRoute {
    records: Vec<VisitRecord>,
}

impl TourRoute {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construir desde una carga masiva, validando unicidad de ids
    pub fn from_records(records: Vec<VisitRecord>) -> RouteResult<Self> {
        let mut route = Self::new();
        route.add(records)?;
        Ok(route)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[VisitRecord] {
        &self.records
    }

    /// Posición actual del registro con el id dado
    pub fn position_of(&self, region_id: i64) -> Option<usize> {
        self.records.iter().position(|r| r.region_id == region_id)
    }

    pub fn contains(&self, region_id: i64) -> bool {
        self.position_of(region_id).is_some()
    }

    /// Coordenadas de visita en el orden actual del tour
    pub fn visit_coords(&self) -> Vec<(f64, f64)> {
        self.records.iter().map(|r| r.visit_coords()).collect()
    }

    /// Añadir uno o más registros al final de la ruta.
    ///
    /// Falla con DuplicateKey si algún id entrante ya existe (o se repite
    /// dentro del lote); en ese caso no se inserta nada.
    pub fn add(&mut self, records: Vec<VisitRecord>) -> RouteResult<()> {
        let mut seen: HashSet<i64> = self.records.iter().map(|r| r.region_id).collect();
        for record in &records {
            if !seen.insert(record.region_id) {
                return Err(duplicate_key_error("VisitRecord", record.region_id));
            }
        }

        log::debug!("📍 Añadiendo {} registros a la ruta", records.len());
        self.records.extend(records);
        Ok(())
    }

    /// Obtener los registros señalados por el locator, en el orden actual.
    ///
    /// Ids desconocidos y posiciones fuera de rango se omiten en silencio;
    /// el llamador comprueba la cardinalidad si le importa.
    pub fn get(&self, locator: &Locator) -> Vec<VisitRecord> {
        match locator {
            Locator::RegionIds(ids) => {
                let wanted: HashSet<i64> = ids.iter().copied().collect();
                self.records
                    .iter()
                    .filter(|r| wanted.contains(&r.region_id))
                    .cloned()
                    .collect()
            }
            Locator::Positions(positions) => {
                let wanted: HashSet<usize> = positions.iter().copied().collect();
                self.records
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| wanted.contains(i))
                    .map(|(_, r)| r.clone())
                    .collect()
            }
        }
    }

    /// Mutar campos de un registro existente; NotFound si el id no existe
    pub fn update(&mut self, region_id: i64, update: &RecordUpdate) -> RouteResult<()> {
        let position = self
            .position_of(region_id)
            .ok_or_else(|| not_found_error("VisitRecord", region_id))?;
        update.apply(&mut self.records[position])
    }

    /// Eliminar los registros señalados por el locator.
    ///
    /// Las posiciones se evalúan contra un snapshot fijo del orden previo a
    /// cualquier borrado del lote, nunca contra la secuencia ya mutada.
    /// Devuelve cuántos registros se eliminaron.
    pub fn delete(&mut self, locator: &Locator) -> usize {
        let before = self.records.len();
        match locator {
            Locator::RegionIds(ids) => {
                let doomed: HashSet<i64> = ids.iter().copied().collect();
                self.records.retain(|r| !doomed.contains(&r.region_id));
            }
            Locator::Positions(positions) => {
                let doomed: HashSet<usize> = positions.iter().copied().collect();
                let mut index = 0;
                self.records.retain(|_| {
                    let keep = !doomed.contains(&index);
                    index += 1;
                    keep
                });
            }
        }
        before - self.records.len()
    }

    /// Reordenar la ruta según una permutación de posiciones: el resultado
    /// es `[old[perm[0]], old[perm[1]], ...]`.
    ///
    /// Falla con LengthMismatch si la permutación no tiene la longitud de
    /// la ruta y con InvalidArgument si alguna posición queda fuera de
    /// rango. Índices duplicados o ausentes se aceptan tal cual (así se
    /// consume la salida cruda del solver).
    pub fn reorder(&mut self, permutation: &[usize]) -> RouteResult<()> {
        if permutation.len() != self.records.len() {
            return Err(length_mismatch_error(self.records.len(), permutation.len()));
        }
        if let Some(bad) = permutation.iter().find(|&&p| p >= self.records.len()) {
            return Err(invalid_argument_error(&format!(
                "permutation position {} out of range for route of length {}",
                bad,
                self.records.len()
            )));
        }

        let reordered: Vec<VisitRecord> = permutation
            .iter()
            .map(|&p| self.records[p].clone())
            .collect();
        self.records = reordered;
        Ok(())
    }

    /// Rotar cíclicamente la ruta hasta que el registro con el id dado sea
    /// el primero. Si el id no existe, se registra un warning y la ruta no
    /// cambia; devuelve si hubo rotación.
    pub fn rotate(&mut self, region_id: i64) -> bool {
        match self.position_of(region_id) {
            Some(position) => {
                self.records.rotate_left(position);
                true
            }
            None => {
                log::warn!(
                    "⚠️ No se puede rotar: región {} no está en la ruta, se deja sin cambios",
                    region_id
                );
                false
            }
        }
    }

    /// Valores únicos por columna, en orden de primera aparición.
    ///
    /// Con `include_missing` los valores ausentes aparecen una vez como
    /// `None`; si no, se descartan. Pensado para informes de calidad de
    /// datos (p. ej. categorías administrativas únicas).
    pub fn distinct(
        &self,
        columns: &[Column],
        include_missing: bool,
    ) -> Vec<(Column, Vec<Option<String>>)> {
        columns
            .iter()
            .map(|column| {
                let mut seen = HashSet::new();
                let mut values = Vec::new();
                for record in &self.records {
                    let value = column.value_of(record);
                    if value.is_none() && !include_missing {
                        continue;
                    }
                    if seen.insert(value.clone()) {
                        values.push(value);
                    }
                }
                (*column, values)
            })
            .collect()
    }

    /// Distancia total de círculo máximo entre puntos de visita
    /// consecutivos en el orden actual, en kilómetros. O(n).
    pub fn total_great_circle_distance(&self) -> f64 {
        consecutive_distances(&self.visit_coords()).iter().sum()
    }

    /// Partir la ruta en tramos consecutivos de hasta `max_len` puntos.
    ///
    /// El origen de cada tramo es el destino del anterior, de modo que el
    /// camino sigue siendo continuo a través de las fronteras de tramo
    /// para cualquier consulta posterior de direcciones. Cada tramo lleva
    /// hasta `max_len - 2` waypoints interiores; el último puede ser más
    /// corto. Falla con InvalidArgument si `max_len < 2`.
    pub fn slices(&self, max_len: usize) -> RouteResult<Vec<TourSlice>> {
        if max_len < MIN_SLICE_LEN {
            return Err(invalid_argument_error(&format!(
                "slice length {} below minimum of {}",
                max_len, MIN_SLICE_LEN
            )));
        }

        let points = self.visit_coords();
        if points.len() < MIN_SLICE_LEN {
            return Ok(Vec::new());
        }

        let stride = max_len - 1;
        let last = points.len() - 1;
        let mut slices = Vec::new();
        let mut start = 0;

        while start < last {
            let end = (start + stride).min(last);
            slices.push(TourSlice::new(
                points[start],
                points[end],
                points[start + 1..end].to_vec(),
            ));
            start = end;
        }

        Ok(slices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::visit_record::{RegionRecord, SeatCandidate};
    use crate::utils::errors::RouteError;

    fn record(id: i64, lat: f64, lon: f64) -> VisitRecord {
        VisitRecord::resolve(
            RegionRecord {
                region_id: id,
                region_name: format!("County {}", id),
                state: "NY".to_string(),
                category_code: "US.NY.047".to_string(),
                external_code: 36000 + id,
                region_lat: lat,
                region_lon: lon,
            },
            None,
        )
        .unwrap()
    }

    fn route_of(ids: &[i64]) -> TourRoute {
        let records = ids
            .iter()
            .enumerate()
            .map(|(i, &id)| record(id, 40.0 + i as f64 * 0.1, -73.0 - i as f64 * 0.1))
            .collect();
        TourRoute::from_records(records).unwrap()
    }

    fn ids_of(route: &TourRoute) -> Vec<i64> {
        route.records().iter().map(|r| r.region_id).collect()
    }

    #[test]
    fn test_add_rejects_duplicates_atomically() {
        let mut route = route_of(&[1, 2, 3]);
        let result = route.add(vec![record(4, 41.0, -74.0), record(2, 42.0, -75.0)]);
        assert!(matches!(result, Err(RouteError::DuplicateKey(_))));
        // Nada del lote se insertó
        assert_eq!(route.len(), 3);
        assert!(!route.contains(4));
    }

    #[test]
    fn test_add_rejects_duplicates_within_batch() {
        let mut route = TourRoute::new();
        let result = route.add(vec![record(7, 40.0, -73.0), record(7, 41.0, -74.0)]);
        assert!(matches!(result, Err(RouteError::DuplicateKey(_))));
        assert!(route.is_empty());
    }

    #[test]
    fn test_get_by_ids_preserves_order_and_omits_unknown() {
        let route = route_of(&[10, 20, 30]);
        let got = route.get(&Locator::RegionIds(vec![30, 99, 10]));
        let got_ids: Vec<i64> = got.iter().map(|r| r.region_id).collect();
        assert_eq!(got_ids, vec![10, 30]);
    }

    #[test]
    fn test_get_by_positions_omits_out_of_range() {
        let route = route_of(&[10, 20, 30]);
        let got = route.get(&Locator::Positions(vec![2, 0, 17]));
        let got_ids: Vec<i64> = got.iter().map(|r| r.region_id).collect();
        assert_eq!(got_ids, vec![10, 30]);
    }

    #[test]
    fn test_delete_positions_against_fixed_snapshot() {
        let mut route = route_of(&[1, 2, 3, 4, 5]);
        // Las posiciones 1 y 3 se refieren al orden previo al borrado:
        // deben caer los ids 2 y 4, no 2 y 5
        let removed = route.delete(&Locator::Positions(vec![1, 3]));
        assert_eq!(removed, 2);
        assert_eq!(ids_of(&route), vec![1, 3, 5]);
    }

    #[test]
    fn test_delete_by_ids_ignores_unknown() {
        let mut route = route_of(&[1, 2, 3]);
        let removed = route.delete(&Locator::RegionIds(vec![2, 99]));
        assert_eq!(removed, 1);
        assert_eq!(ids_of(&route), vec![1, 3]);
    }

    #[test]
    fn test_update_not_found_is_hard() {
        let mut route = route_of(&[1]);
        let result = route.update(99, &RecordUpdate::default());
        assert!(matches!(result, Err(RouteError::NotFound(_))));
    }

    #[test]
    fn test_reorder_applies_permutation() {
        let mut route = route_of(&[1, 2, 3, 4, 5]);
        route.reorder(&[2, 4, 0, 1, 3]).unwrap();
        assert_eq!(ids_of(&route), vec![3, 5, 1, 2, 4]);
    }

    #[test]
    fn test_reorder_length_preserved() {
        let mut route = route_of(&[1, 2, 3, 4]);
        route.reorder(&[3, 2, 1, 0]).unwrap();
        assert_eq!(route.len(), 4);
    }

    #[test]
    fn test_reorder_length_mismatch() {
        let mut route = route_of(&[1, 2, 3]);
        let result = route.reorder(&[0, 1]);
        assert!(matches!(result, Err(RouteError::LengthMismatch(_))));
        assert_eq!(ids_of(&route), vec![1, 2, 3]);
    }

    #[test]
    fn test_reorder_allows_duplicate_positions() {
        // La salida cruda de un solver se consume sin validación extra
        let mut route = route_of(&[1, 2, 3]);
        route.reorder(&[0, 0, 2]).unwrap();
        assert_eq!(ids_of(&route), vec![1, 1, 3]);
    }

    #[test]
    fn test_reorder_rejects_out_of_range() {
        let mut route = route_of(&[1, 2, 3]);
        let result = route.reorder(&[0, 1, 7]);
        assert!(matches!(result, Err(RouteError::InvalidArgument(_))));
        assert_eq!(ids_of(&route), vec![1, 2, 3]);
    }

    #[test]
    fn test_rotate_is_idempotent() {
        let mut route = route_of(&[1, 2, 3, 4]);
        assert!(route.rotate(3));
        assert_eq!(ids_of(&route), vec![3, 4, 1, 2]);
        assert!(route.rotate(3));
        assert_eq!(ids_of(&route), vec![3, 4, 1, 2]);
    }

    #[test]
    fn test_rotate_missing_id_is_noop() {
        let mut route = route_of(&[1, 2, 3]);
        assert!(!route.rotate(99));
        assert_eq!(ids_of(&route), vec![1, 2, 3]);
    }

    #[test]
    fn test_distinct_with_and_without_missing() {
        let mut route = route_of(&[1, 2]);
        let seat = SeatCandidate {
            seat_id: Some(100),
            seat_name: Some("Seatville".to_string()),
            seat_lat: Some(41.0),
            seat_lon: Some(-74.0),
        };
        route
            .add(vec![VisitRecord::resolve(
                RegionRecord {
                    region_id: 3,
                    region_name: "County 3".to_string(),
                    state: "NJ".to_string(),
                    category_code: "US.NJ.001".to_string(),
                    external_code: 34001,
                    region_lat: 40.0,
                    region_lon: -74.5,
                },
                Some(seat),
            )
            .unwrap()])
            .unwrap();

        let result = route.distinct(&[Column::State, Column::SeatName], false);
        assert_eq!(
            result[0].1,
            vec![Some("NY".to_string()), Some("NJ".to_string())]
        );
        assert_eq!(result[1].1, vec![Some("Seatville".to_string())]);

        let with_missing = route.distinct(&[Column::SeatName], true);
        assert_eq!(
            with_missing[0].1,
            vec![None, Some("Seatville".to_string())]
        );
    }

    #[test]
    fn test_total_distance_degenerate_cases() {
        let empty = TourRoute::new();
        assert_eq!(empty.total_great_circle_distance(), 0.0);

        let single = route_of(&[1]);
        assert_eq!(single.total_great_circle_distance(), 0.0);

        let mut twin = TourRoute::new();
        twin.add(vec![record(1, 40.0, -73.0), record(2, 40.0, -73.0)])
            .unwrap();
        assert_eq!(twin.total_great_circle_distance(), 0.0);
    }

    #[test]
    fn test_slices_share_boundary_points() {
        let ids: Vec<i64> = (1..=25).collect();
        let route = route_of(&ids);
        let slices = route.slices(10).unwrap();

        assert_eq!(slices.len(), 3);
        assert_eq!(slices[0].point_count(), 10);
        assert_eq!(slices[1].point_count(), 10);
        // 25 puntos con paso de 9: el último tramo cubre 19..25
        assert_eq!(slices[2].point_count(), 7);

        for pair in slices.windows(2) {
            assert_eq!(pair[0].destination(), pair[1].origin());
        }
    }

    #[test]
    fn test_slices_minimum_length() {
        let route = route_of(&[1, 2, 3]);
        assert!(matches!(
            route.slices(1),
            Err(RouteError::InvalidArgument(_))
        ));

        let pairs = route.slices(2).unwrap();
        assert_eq!(pairs.len(), 2);
        assert!(pairs.iter().all(|s| s.waypoints().is_empty()));
    }

    #[test]
    fn test_slices_short_route() {
        assert!(TourRoute::new().slices(10).unwrap().is_empty());
        assert!(route_of(&[1]).slices(10).unwrap().is_empty());
    }
}
