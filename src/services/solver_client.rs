//! Cliente HTTP para el solver externo de tours
//!
//! Este módulo define la frontera con la capacidad externa de
//! optimización (trait `TourSolver`) y una implementación HTTP con el
//! protocolo de submit y polling.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::dto::solver_dto::{
    SolveOutcome, SolveRequest, SolverPoint, SolverSolutionResponse, SolverSubmitRequest,
    SolverSubmitResponse, GREAT_CIRCLE_METRIC,
};

/// Capacidad externa de resolución de tours.
///
/// El solver recibe los puntos de visita con semántica de distancia de
/// círculo máximo y devuelve una permutación de las posiciones de entrada
/// que representa un tour cerrado. La cota de tiempo la respeta el propio
/// solver; aquí no hay timeout ni cancelación local.
#[async_trait]
pub trait TourSolver: Send + Sync {
    async fn solve(&self, request: &SolveRequest) -> Result<SolveOutcome>;
}

pub struct HttpSolverClient {
    base_url: String,
    client: Client,
}

impl HttpSolverClient {
    pub fn new(base_url: String, http_timeout_secs: u64) -> Result<Self> {
        // El timeout HTTP cubre transporte, no el tiempo de resolución:
        // ese lo gobierna time_bound dentro del propio solver
        let client = Client::builder()
            .timeout(Duration::from_secs(http_timeout_secs))
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self { base_url, client })
    }

    /// Enviar el problema al solver
    async fn submit_problem(&self, request: &SolverSubmitRequest) -> Result<SolverSubmitResponse> {
        let url = format!("{}/tours", self.base_url);

        log::info!("📤 Enviando problema de {} puntos a {}", request.points.len(), url);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("User-Agent", "TourRouting/1.0")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        log::info!("📡 Solver response status: {}", status);

        if !status.is_success() {
            return Err(anyhow!("Solver API error {}: {}", status, response_text));
        }

        let submit_response: SolverSubmitResponse = serde_json::from_str(&response_text)
            .map_err(|e| anyhow!("Error parsing solver submit response: {}", e))?;

        Ok(submit_response)
    }

    /// Esperar por la solución del solver
    async fn wait_for_solution(&self, job_id: &str) -> Result<SolverSolutionResponse> {
        let url = format!("{}/tours/{}", self.base_url, job_id);

        let mut attempts = 0;
        let max_attempts = 120;
        let delay = Duration::from_secs(5);

        loop {
            attempts += 1;
            log::debug!("⏳ Esperando solución del solver (intento {}/{})", attempts, max_attempts);

            let response = self
                .client
                .get(&url)
                .header("User-Agent", "TourRouting/1.0")
                .send()
                .await?;

            let status = response.status();
            let response_text = response.text().await?;

            if status == 202 {
                // Aún procesando
                if attempts >= max_attempts {
                    return Err(anyhow!(
                        "Timeout esperando solución del solver después de {} intentos",
                        max_attempts
                    ));
                }
                tokio::time::sleep(delay).await;
                continue;
            }

            if status == 200 {
                let solution: SolverSolutionResponse = serde_json::from_str(&response_text)
                    .map_err(|e| anyhow!("Error parsing solver solution: {}", e))?;
                return Ok(solution);
            }

            return Err(anyhow!("Solver API error {}: {}", status, response_text));
        }
    }
}

#[async_trait]
impl TourSolver for HttpSolverClient {
    async fn solve(&self, request: &SolveRequest) -> Result<SolveOutcome> {
        let submit_request = SolverSubmitRequest {
            version: 1,
            metric: GREAT_CIRCLE_METRIC.to_string(),
            time_bound: request.time_bound.as_wire(),
            seed: request.seed,
            points: request
                .points
                .iter()
                .map(|&(lat, lon)| SolverPoint { lat, lon })
                .collect(),
        };

        let submit_response = self.submit_problem(&submit_request).await?;

        log::info!("✅ Problema enviado al solver con ID: {}", submit_response.id);

        let solution = self.wait_for_solution(&submit_response.id).await?;

        if !solution.success {
            log::error!(
                "❌ Solver no tuvo éxito: {}",
                solution.message.as_deref().unwrap_or("sin detalle")
            );
            return Ok(SolveOutcome {
                success: false,
                tour: Vec::new(),
            });
        }

        let tour = solution
            .tour
            .ok_or_else(|| anyhow!("Solver reported success without a tour"))?;

        Ok(SolveOutcome {
            success: true,
            tour,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::solver_dto::TimeBound;

    #[tokio::test]
    async fn test_http_solver_client() {
        // Este test requiere un solver externo accesible
        let base_url = std::env::var("TOUR_SOLVER_URL").unwrap_or_default();
        if base_url.is_empty() {
            println!("⚠️ Skipping test: TOUR_SOLVER_URL not set");
            return;
        }

        let client = HttpSolverClient::new(base_url, 30).unwrap();
        let request = SolveRequest {
            points: vec![(40.65, -73.95), (40.71, -74.00), (40.73, -73.99)],
            time_bound: TimeBound::Seconds(5.0),
            seed: 42,
        };

        match client.solve(&request).await {
            Ok(outcome) => {
                println!("✅ Solver outcome: {:?}", outcome);
                if outcome.success {
                    assert_eq!(outcome.tour.len(), 3);
                }
            }
            Err(e) => {
                println!("❌ Solver error: {}", e);
            }
        }
    }
}
