//! Open-path route optimization over geographic coordinates.
//!
//! Great-circle distances feed a nearest-neighbor construction that is then
//! refined with time-bounded 2-opt, always starting from location 0 and never
//! returning to it.

mod algo;
mod error;
mod geo;
pub mod geocode;
pub mod interrupt;
mod io;
pub mod logging;
mod plan;
mod route;

pub(crate) use io::options;

pub use algo::construction::{DEPOT, nearest_neighbor};
pub use algo::solver::{
    DEFAULT_TIME_BUDGET, RouteSolver, Solution, SolverConfig, SolverPhase, StopReason,
};
pub use algo::two_opt::two_opt_sweep;
pub use error::{Error, Result};
pub use geo::coordinate::{Coordinate, EARTH_RADIUS_KM, Location};
pub use geo::matrix::DistanceMatrix;
pub use io::input::RouteInput;
pub use io::options::{LogFormat, LogLevel, OutputFormat, SolverOptions};
pub use plan::{PlannedRoute, Stop, plan_route};
pub use route::{Leg, Route, RouteSummary};
