use std::fmt;

use route_opt_derive::New;

use crate::{DistanceMatrix, Error, Result, algo::construction::DEPOT};

/// Visiting order over `0..n`, starting at the depot, with no return leg.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route(Vec<usize>);

impl Route {
    /// Validates a caller-supplied order against a problem of `n` nodes.
    pub fn new(order: Vec<usize>, n: usize) -> Result<Self> {
        if order.len() != n {
            return Err(Error::invalid_input(format!(
                "route has {} stops, expected {n}",
                order.len()
            )));
        }
        if order.first() != Some(&DEPOT) {
            return Err(Error::invalid_input("route must start at index 0"));
        }

        let mut seen = vec![false; n];
        for &idx in &order {
            match seen.get_mut(idx) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => {
                    return Err(Error::invalid_input(format!("index {idx} visited twice")));
                }
                None => {
                    return Err(Error::invalid_input(format!(
                        "index {idx} out of range for {n} stops"
                    )));
                }
            }
        }
        Ok(Self(order))
    }

    /// The solver only ever permutes a complete order, so no re-validation.
    pub(crate) fn from_solver(order: Vec<usize>) -> Self {
        debug_assert_eq!(order.first(), Some(&DEPOT));
        Self(order)
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<usize> {
        self.0
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pos, idx) in self.0.iter().enumerate() {
            if pos > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{idx}")?;
        }
        Ok(())
    }
}

/// One hop of a route: original indices and the distance between them in km.
#[derive(Clone, Copy, Debug, PartialEq, New)]
pub struct Leg {
    pub from: usize,
    pub to: usize,
    pub distance: f64,
}

/// Per-leg breakdown of a route. Always derived, never stored on its own.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RouteSummary {
    legs: Vec<Leg>,
    total: f64,
}

impl RouteSummary {
    pub fn from_route(route: &Route, matrix: &DistanceMatrix) -> Result<Self> {
        if route.len() != matrix.len() {
            return Err(Error::invalid_input(format!(
                "route has {} stops but the distance matrix has {}",
                route.len(),
                matrix.len()
            )));
        }

        let legs: Vec<Leg> = route
            .as_slice()
            .windows(2)
            .map(|w| Leg::new(w[0], w[1], matrix.get(w[0], w[1])))
            .collect();
        let total = legs.iter().fold(0.0, |acc, leg| acc + leg.distance);

        Ok(Self { legs, total })
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn longest(&self) -> Option<&Leg> {
        self.legs
            .iter()
            .max_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Distance travelled on arrival at each route position; starts at 0.
    pub fn cumulative(&self) -> Vec<f64> {
        let mut running = 0.0;
        let mut out = Vec::with_capacity(self.legs.len() + 1);
        out.push(running);
        for leg in &self.legs {
            running += leg.distance;
            out.push(running);
        }
        out
    }
}
