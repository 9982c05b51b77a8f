//! Orquestador de optimización de tours
//!
//! Este módulo invoca la capacidad externa de resolución con las
//! coordenadas de visita de la ruta, valida el resultado y canonicaliza
//! el tour: reordena según la permutación del solver y rota hasta el
//! punto de partida designado.
//!
//! El tour es invariante a rotación cíclica y a sentido de recorrido; el
//! orquestador sólo elige un representante canónico (inicio fijo, sentido
//! tal cual lo devolvió el solver).

use chrono::Utc;
use rand::Rng;

use crate::dto::solver_dto::{SolveRequest, TimeBound};
use crate::models::tour_route::TourRoute;
use crate::services::solver_client::TourSolver;
use crate::utils::errors::{invalid_argument_error, solver_failure_error, RouteResult};

/// Estados del orquestador: Idle → Solving → {Solved, Failed}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverState {
    Idle,
    Solving,
    Solved,
    Failed,
}

pub struct OptimizerService {
    solver: Box<dyn TourSolver>,
    state: SolverState,
}

impl OptimizerService {
    pub fn new(solver: Box<dyn TourSolver>) -> Self {
        Self {
            solver,
            state: SolverState::Idle,
        }
    }

    pub fn state(&self) -> SolverState {
        self.state
    }

    /// Encontrar el tour óptimo y canonicalizarlo sobre la ruta.
    ///
    /// Con éxito, la ruta queda reordenada según el solver y rotada para
    /// empezar en `start_region_id`. Si el solver reporta fallo (p. ej.
    /// cota de tiempo agotada sin tour factible), la ruta queda en su
    /// orden previo, de modo que reintentar es idempotente.
    ///
    /// Sin `seed` explícita se genera una aleatoria; con la misma seed y
    /// la misma entrada, la corrida del solver es reproducible.
    pub async fn find_tour(
        &mut self,
        route: &mut TourRoute,
        time_bound: TimeBound,
        seed: Option<i64>,
        start_region_id: i64,
    ) -> RouteResult<()> {
        if let TimeBound::Seconds(s) = time_bound {
            if s < 0.0 || s.is_nan() {
                return Err(invalid_argument_error(&format!(
                    "time bound must be non-negative seconds, got {}",
                    s
                )));
            }
        }
        if route.is_empty() {
            return Err(invalid_argument_error("cannot solve an empty route"));
        }

        let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
        let request = SolveRequest {
            points: route.visit_coords(),
            time_bound,
            seed,
        };

        log::info!(
            "🚀 Buscando tour para {} puntos (seed {})",
            route.len(),
            seed
        );

        self.state = SolverState::Solving;
        let started_at = Utc::now();

        let outcome = match self.solver.solve(&request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.state = SolverState::Failed;
                return Err(solver_failure_error(&e.to_string()));
            }
        };

        let elapsed = Utc::now() - started_at;
        log::info!("⏱️ Solver terminó en {} ms", elapsed.num_milliseconds());

        if !outcome.success {
            log::error!("❌ Solver NO tuvo éxito; la ruta queda sin cambios");
            self.state = SolverState::Failed;
            return Err(solver_failure_error(
                "solver reported no feasible tour within the time bound",
            ));
        }

        // Reordenar es todo-o-nada: una permutación inválida del solver
        // deja la ruta intacta
        if let Err(e) = route.reorder(&outcome.tour) {
            self.state = SolverState::Failed;
            return Err(e);
        }
        route.rotate(start_region_id);

        log::info!(
            "✅ Tour encontrado; distancia de círculo máximo total {:.1} km",
            route.total_great_circle_distance()
        );
        self.state = SolverState::Solved;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::solver_dto::SolveOutcome;
    use crate::models::visit_record::{RegionRecord, VisitRecord};
    use crate::utils::errors::RouteError;
    use anyhow::Result;
    use async_trait::async_trait;

    /// Solver de guion para tests: devuelve siempre el mismo resultado
    struct ScriptedSolver {
        success: bool,
        tour: Vec<usize>,
    }

    #[async_trait]
    impl TourSolver for ScriptedSolver {
        async fn solve(&self, _request: &SolveRequest) -> Result<SolveOutcome> {
            Ok(SolveOutcome {
                success: self.success,
                tour: self.tour.clone(),
            })
        }
    }

    fn route_of(ids: &[i64]) -> TourRoute {
        let records = ids
            .iter()
            .enumerate()
            .map(|(i, &id)| {
                VisitRecord::resolve(
                    RegionRecord {
                        region_id: id,
                        region_name: format!("County {}", id),
                        state: "NY".to_string(),
                        category_code: "US.NY.047".to_string(),
                        external_code: 36000 + id,
                        region_lat: 40.0 + i as f64 * 0.1,
                        region_lon: -73.0 - i as f64 * 0.1,
                    },
                    None,
                )
                .unwrap()
            })
            .collect();
        TourRoute::from_records(records).unwrap()
    }

    fn ids_of(route: &TourRoute) -> Vec<i64> {
        route.records().iter().map(|r| r.region_id).collect()
    }

    #[tokio::test]
    async fn test_find_tour_reorders_and_rotates() {
        let mut route = route_of(&[1, 2, 3, 4, 5]);
        let mut optimizer = OptimizerService::new(Box::new(ScriptedSolver {
            success: true,
            tour: vec![2, 4, 0, 1, 3],
        }));

        optimizer
            .find_tour(&mut route, TimeBound::Unbounded, Some(42), 3)
            .await
            .unwrap();

        assert_eq!(optimizer.state(), SolverState::Solved);
        // [old[2], old[4], old[0], old[1], old[3]] rotado hasta el id 3
        assert_eq!(ids_of(&route), vec![3, 5, 1, 2, 4]);
        assert_eq!(route.records()[0].region_id, 3);
        assert_eq!(route.len(), 5);
    }

    #[tokio::test]
    async fn test_solver_failure_leaves_route_untouched() {
        let mut route = route_of(&[1, 2, 3]);
        let mut optimizer = OptimizerService::new(Box::new(ScriptedSolver {
            success: false,
            tour: Vec::new(),
        }));

        let result = optimizer
            .find_tour(&mut route, TimeBound::Seconds(1.0), Some(7), 2)
            .await;

        assert!(matches!(result, Err(RouteError::SolverFailure(_))));
        assert_eq!(optimizer.state(), SolverState::Failed);
        assert_eq!(ids_of(&route), vec![1, 2, 3]);

        // Reintentar está bien definido: misma entrada, mismo resultado
        let retry = optimizer
            .find_tour(&mut route, TimeBound::Seconds(1.0), Some(7), 2)
            .await;
        assert!(retry.is_err());
        assert_eq!(ids_of(&route), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_bad_permutation_leaves_route_untouched() {
        let mut route = route_of(&[1, 2, 3]);
        let mut optimizer = OptimizerService::new(Box::new(ScriptedSolver {
            success: true,
            tour: vec![0, 1],
        }));

        let result = optimizer
            .find_tour(&mut route, TimeBound::Unbounded, Some(1), 1)
            .await;

        assert!(matches!(result, Err(RouteError::LengthMismatch(_))));
        assert_eq!(optimizer.state(), SolverState::Failed);
        assert_eq!(ids_of(&route), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_missing_start_id_still_solves() {
        // rotate con id ausente es un warning, no un fallo duro
        let mut route = route_of(&[1, 2, 3]);
        let mut optimizer = OptimizerService::new(Box::new(ScriptedSolver {
            success: true,
            tour: vec![2, 0, 1],
        }));

        optimizer
            .find_tour(&mut route, TimeBound::Unbounded, Some(1), 99)
            .await
            .unwrap();

        assert_eq!(optimizer.state(), SolverState::Solved);
        assert_eq!(ids_of(&route), vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn test_negative_time_bound_rejected() {
        let mut route = route_of(&[1, 2]);
        let mut optimizer = OptimizerService::new(Box::new(ScriptedSolver {
            success: true,
            tour: vec![0, 1],
        }));

        let result = optimizer
            .find_tour(&mut route, TimeBound::Seconds(-5.0), Some(1), 1)
            .await;
        assert!(matches!(result, Err(RouteError::InvalidArgument(_))));
        assert_eq!(optimizer.state(), SolverState::Idle);
    }
}
