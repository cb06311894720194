use std::time::Duration;

use crate::{
    DistanceMatrix, Leg, Location, Result, Route, RouteSummary,
    algo::solver::{RouteSolver, SolverConfig, StopReason},
};

/// The outcome of one optimization request: the input locations, the solved
/// visiting order and its summary, plus solver statistics.
#[derive(Clone, Debug)]
pub struct PlannedRoute {
    locations: Vec<Location>,
    route: Route,
    summary: RouteSummary,
    construction_cost: f64,
    sweeps: usize,
    moves: usize,
    stop: StopReason,
    elapsed: Duration,
}

/// A route position resolved against the input locations.
#[derive(Clone, Copy, Debug)]
pub struct Stop<'a> {
    /// Position in the route, 0 for the depot.
    pub position: usize,
    /// Index into the caller's location sequence.
    pub index: usize,
    pub location: &'a Location,
    /// Leg arriving at this stop; `None` for the depot.
    pub leg: Option<&'a Leg>,
    /// Distance travelled up to and including `leg`.
    pub cumulative: f64,
}

/// Builds the distance matrix, solves and summarizes in one call.
///
/// `locations[0]` is the depot. Each call owns all of its state, so separate
/// requests can run concurrently without sharing anything.
pub fn plan_route(locations: Vec<Location>, config: &SolverConfig) -> Result<PlannedRoute> {
    let coords: Vec<_> = locations.iter().map(|l| l.coordinate).collect();
    let matrix = DistanceMatrix::from_coordinates(&coords)?;

    let solution = RouteSolver::new(&matrix, config.clone()).solve();
    let summary = RouteSummary::from_route(&solution.route, &matrix)?;

    log::info!(
        "plan: stops={} total_km={:.2} construction_km={:.2} stop={}",
        locations.len(),
        summary.total(),
        solution.construction_cost,
        solution.stop
    );

    Ok(PlannedRoute {
        locations,
        route: solution.route,
        summary,
        construction_cost: solution.construction_cost,
        sweeps: solution.sweeps,
        moves: solution.moves,
        stop: solution.stop,
        elapsed: solution.elapsed,
    })
}

impl PlannedRoute {
    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn summary(&self) -> &RouteSummary {
        &self.summary
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn total(&self) -> f64 {
        self.summary.total()
    }

    pub fn construction_cost(&self) -> f64 {
        self.construction_cost
    }

    pub fn sweeps(&self) -> usize {
        self.sweeps
    }

    pub fn moves(&self) -> usize {
        self.moves
    }

    pub fn stop_reason(&self) -> StopReason {
        self.stop
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Stops in visiting order. Labels, markers and segments should all be
    /// derived from this so they agree on which address sits where.
    pub fn stops(&self) -> impl Iterator<Item = Stop<'_>> + '_ {
        let legs = self.summary.legs();
        let mut cumulative = 0.0;
        self.route
            .as_slice()
            .iter()
            .enumerate()
            .map(move |(position, &index)| {
                let leg = position.checked_sub(1).map(|p| &legs[p]);
                if let Some(leg) = leg {
                    cumulative += leg.distance;
                }
                Stop {
                    position,
                    index,
                    location: &self.locations[index],
                    leg,
                    cumulative,
                }
            })
    }
}
