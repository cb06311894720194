use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use route_opt_derive::New;

use crate::{
    DistanceMatrix, Route,
    algo::{
        construction::nearest_neighbor,
        two_opt::{MIN_ROUTE_SIZE_FOR_2OPT, two_opt_sweep},
    },
};

/// Refinement budget used when none is configured.
pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_secs(30);

/// Knobs for a single solve. `time_budget = None` means refinement runs until
/// a sweep finds no improving move.
#[derive(Clone, Debug, New)]
pub struct SolverConfig {
    pub time_budget: Option<Duration>,
    /// Checked at sweep boundaries; once set, refinement stops and the best
    /// complete route so far is returned.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::new().with_time_budget(DEFAULT_TIME_BUDGET)
    }
}

impl SolverConfig {
    pub fn unbounded() -> Self {
        Self::new()
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SolverPhase {
    Idle,
    Constructing,
    Refining,
    Done,
}

/// Why refinement stopped.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StopReason {
    /// Too few nodes for any 2-opt move; refinement was skipped.
    Trivial,
    /// A full sweep found no improving move.
    Converged,
    TimeBudget,
    Cancelled,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Self::Trivial => "trivial",
            Self::Converged => "converged",
            Self::TimeBudget => "time_budget",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{value}")
    }
}

#[derive(Clone, Debug)]
pub struct Solution {
    pub route: Route,
    /// Path length of the nearest-neighbor route.
    pub construction_cost: f64,
    /// Path length of `route`; never above `construction_cost`.
    pub cost: f64,
    /// Refinement sweeps started.
    pub sweeps: usize,
    /// Improving reversals applied.
    pub moves: usize,
    pub stop: StopReason,
    pub elapsed: Duration,
}

/// Nearest-neighbor construction followed by time-bounded 2-opt refinement
/// over an open path anchored at index 0.
pub struct RouteSolver<'a> {
    matrix: &'a DistanceMatrix,
    config: SolverConfig,
    phase: SolverPhase,
}

impl<'a> RouteSolver<'a> {
    pub fn new(matrix: &'a DistanceMatrix, config: SolverConfig) -> Self {
        Self {
            matrix,
            config,
            phase: SolverPhase::Idle,
        }
    }

    pub fn phase(&self) -> SolverPhase {
        self.phase
    }

    pub fn solve(&mut self) -> Solution {
        let now = Instant::now();
        let deadline = self
            .config
            .time_budget
            .and_then(|budget| now.checked_add(budget));
        let n = self.matrix.len();

        self.transition(SolverPhase::Constructing);
        let constructed = nearest_neighbor(self.matrix);
        let construction_cost = self.matrix.path_length(&constructed);
        log::info!("solver.construct: n={n} cost_km={construction_cost:.3}");

        if n < MIN_ROUTE_SIZE_FOR_2OPT {
            self.transition(SolverPhase::Done);
            return Solution {
                route: Route::from_solver(constructed),
                construction_cost,
                cost: construction_cost,
                sweeps: 0,
                moves: 0,
                stop: StopReason::Trivial,
                elapsed: now.elapsed(),
            };
        }

        self.transition(SolverPhase::Refining);
        let mut order = constructed.clone();
        let mut sweeps = 0usize;
        let mut moves = 0usize;
        let stop = loop {
            if self.config.is_cancelled() {
                break StopReason::Cancelled;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                break StopReason::TimeBudget;
            }

            sweeps += 1;
            let sweep_moves = two_opt_sweep(self.matrix, &mut order);
            moves += sweep_moves;
            log::debug!("solver.refine: sweep={sweeps} moves={sweep_moves}");

            if sweep_moves == 0 {
                break StopReason::Converged;
            }
        };

        let mut cost = self.matrix.path_length(&order);
        if cost > construction_cost {
            // Rounding across many accepted moves can leave the recomputed
            // total a hair above the start; the constructed path wins then.
            log::debug!("solver.refine: keep construction cost_km={cost:.3}");
            order = constructed;
            cost = construction_cost;
        }

        self.transition(SolverPhase::Done);
        let elapsed = now.elapsed();
        log::info!(
            "solver.refine: complete n={n} sweeps={sweeps} moves={moves} stop={stop} cost_km={cost:.3} secs={:.2}",
            elapsed.as_secs_f32()
        );

        Solution {
            route: Route::from_solver(order),
            construction_cost,
            cost,
            sweeps,
            moves,
            stop,
            elapsed,
        }
    }

    fn transition(&mut self, next: SolverPhase) {
        log::debug!("solver.phase: {:?} -> {next:?}", self.phase);
        self.phase = next;
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Arc, atomic::AtomicBool},
        time::Duration,
    };

    use rand::{Rng, SeedableRng, rngs::StdRng};

    use super::{RouteSolver, SolverConfig, SolverPhase, StopReason};
    use crate::{Coordinate, DistanceMatrix};

    fn random_matrix(seed: u64, n: usize) -> DistanceMatrix {
        let mut rng = StdRng::seed_from_u64(seed);
        let coords: Vec<Coordinate> = (0..n)
            .map(|_| Coordinate::new(rng.random_range(47.0..48.0), rng.random_range(8.0..9.5)))
            .collect();
        DistanceMatrix::from_coordinates(&coords).expect("matrix")
    }

    #[test]
    fn phase_moves_from_idle_to_done() {
        let matrix = random_matrix(7, 12);
        let mut solver = RouteSolver::new(&matrix, SolverConfig::unbounded());
        assert_eq!(solver.phase(), SolverPhase::Idle);
        solver.solve();
        assert_eq!(solver.phase(), SolverPhase::Done);
    }

    #[test]
    fn single_node_is_trivial() {
        let matrix = DistanceMatrix::from_rows(vec![vec![0.0]]).expect("matrix");
        let solution = RouteSolver::new(&matrix, SolverConfig::default()).solve();

        assert_eq!(solution.route.as_slice(), &[0]);
        assert_eq!(solution.cost, 0.0);
        assert_eq!(solution.sweeps, 0);
        assert_eq!(solution.stop, StopReason::Trivial);
    }

    #[test]
    fn unbounded_solve_converges_and_never_worsens() {
        for seed in 0..20 {
            let matrix = random_matrix(seed, 25);
            let solution = RouteSolver::new(&matrix, SolverConfig::unbounded()).solve();

            assert_eq!(solution.stop, StopReason::Converged);
            assert!(solution.cost <= solution.construction_cost);
            assert_eq!(solution.cost, matrix.path_length(solution.route.as_slice()));
        }
    }

    #[test]
    fn zero_budget_returns_the_constructed_route() {
        let matrix = random_matrix(3, 30);
        let config = SolverConfig::new().with_time_budget(Duration::ZERO);
        let solution = RouteSolver::new(&matrix, config).solve();

        assert_eq!(solution.stop, StopReason::TimeBudget);
        assert_eq!(solution.sweeps, 0);
        assert_eq!(solution.cost, solution.construction_cost);
        assert_eq!(solution.route.len(), 30);
    }

    #[test]
    fn preset_cancel_flag_stops_before_the_first_sweep() {
        let matrix = random_matrix(11, 15);
        let config = SolverConfig::unbounded().with_cancel(Arc::new(AtomicBool::new(true)));
        let solution = RouteSolver::new(&matrix, config).solve();

        assert_eq!(solution.stop, StopReason::Cancelled);
        assert_eq!(solution.moves, 0);
        assert_eq!(solution.route.as_slice()[0], 0);
    }

    #[test]
    fn repeated_unbounded_solves_are_identical() {
        let matrix = random_matrix(42, 40);
        let first = RouteSolver::new(&matrix, SolverConfig::unbounded()).solve();
        let second = RouteSolver::new(&matrix, SolverConfig::unbounded()).solve();
        assert_eq!(first.route, second.route);
        assert_eq!(first.cost, second.cost);
    }
}
