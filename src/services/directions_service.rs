//! Servicio de direcciones por tramo
//!
//! Este módulo consulta un servicio externo de direcciones de conducción
//! por cada tramo de la ruta y agrega distancia y duración totales. Es
//! sólo para informes: nunca decide el orden del tour.

use anyhow::{anyhow, Result};
use reqwest::Client;
use std::time::Duration;

use crate::dto::directions_dto::{DirectionsResponse, RouteDistDur, SliceDistDur};
use crate::models::tour_slice::TourSlice;

const DIRECTIONS_OK: &str = "OK";

pub struct DirectionsService {
    base_url: String,
    api_key: String,
    client: Client,
}

impl DirectionsService {
    pub fn new(base_url: String, api_key: String, http_timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(http_timeout_secs))
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }

    fn format_point(point: (f64, f64)) -> String {
        format!("{},{}", point.0, point.1)
    }

    /// Distancia y duración de conducción de un tramo
    pub async fn slice_distdur(&self, slice_index: usize, slice: &TourSlice) -> Result<SliceDistDur> {
        let mut url = format!(
            "{}/directions/json?origin={}&destination={}&mode=driving&units=metric&key={}",
            self.base_url,
            Self::format_point(slice.origin()),
            Self::format_point(slice.destination()),
            self.api_key
        );

        if !slice.waypoints().is_empty() {
            let waypoints = slice
                .waypoints()
                .iter()
                .map(|&p| Self::format_point(p))
                .collect::<Vec<_>>()
                .join("|");
            url.push_str(&format!("&waypoints={}", urlencoding::encode(&waypoints)));
        }

        let response = self
            .client
            .get(&url)
            .header("User-Agent", "TourRouting/1.0")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Directions API error {}: {}", status, error_text));
        }

        let directions: DirectionsResponse = response.json().await?;

        if directions.status != DIRECTIONS_OK || directions.routes.is_empty() {
            log::warn!(
                "⚠️ Sin resultado de direcciones para el tramo {} (origen {:?}, destino {:?})",
                slice_index,
                slice.origin(),
                slice.destination()
            );
            return Ok(SliceDistDur {
                slice_index,
                ..Default::default()
            });
        }

        let mut result = SliceDistDur {
            slice_index,
            ..Default::default()
        };
        for route in &directions.routes {
            for leg in &route.legs {
                result.distance_m += leg.distance.value;
                result.duration_s += leg.duration.value;
            }
            if let Some(polyline) = &route.overview_polyline {
                result.polyline_segments.push(polyline.points.clone());
            }
        }

        Ok(result)
    }

    /// Distancia y duración totales de la ruta, tramo a tramo.
    ///
    /// Las peticiones por tramo son independientes y se ejecutan en
    /// paralelo por lotes; la agregación se hace en un único punto tras
    /// recoger todos los resultados, que conservan el orden de tramo (no
    /// el de finalización), así que una escritura por tramo aguas abajo
    /// sale ya en orden de tour.
    pub async fn route_distdur(&self, slices: &[TourSlice]) -> Result<RouteDistDur> {
        log::info!("🧭 Consultando direcciones para {} tramos", slices.len());

        let mut per_slice = Vec::with_capacity(slices.len());

        // Lotes de 10 para no sobrecargar la API
        for (chunk_index, chunk) in slices.chunks(10).enumerate() {
            let base = chunk_index * 10;
            let futures = chunk
                .iter()
                .enumerate()
                .map(|(offset, slice)| self.slice_distdur(base + offset, slice));

            let chunk_results = futures::future::join_all(futures).await;
            for result in chunk_results {
                per_slice.push(result?);
            }

            // Pequeña pausa entre lotes para respetar rate limits
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        let mut totals = RouteDistDur::default();
        for slice_result in &per_slice {
            totals.distance_m += slice_result.distance_m;
            totals.duration_s += slice_result.duration_s;
        }
        totals.slices = per_slice;

        log::info!(
            "✅ Direcciones completadas: {} m, {} s",
            totals.distance_m,
            totals.duration_s
        );
        Ok(totals)
    }
}
