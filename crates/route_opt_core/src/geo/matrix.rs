use crate::{Coordinate, Error, Result};

/// Square, symmetric matrix of great-circle distances in kilometers.
///
/// Built once per request and never mutated afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    /// Builds the pairwise haversine matrix for `coords`.
    ///
    /// The diagonal is written as zero directly, and each pair is evaluated
    /// once and mirrored so the matrix is exactly symmetric.
    pub fn from_coordinates(coords: &[Coordinate]) -> Result<Self> {
        if coords.is_empty() {
            return Err(Error::invalid_input("at least one coordinate is required"));
        }
        if let Some((idx, c)) = coords.iter().enumerate().find(|(_, c)| !c.is_valid()) {
            return Err(Error::invalid_input(format!(
                "coordinate {idx} is out of range: {c}"
            )));
        }

        let n = coords.len();
        let mut values = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = coords[i].haversine_km(&coords[j]);
                values[i * n + j] = d;
                values[j * n + i] = d;
            }
        }

        log::debug!("matrix: built n={n} entries={}", n * n);
        Ok(Self { n, values })
    }

    /// Wraps precomputed distances. Rows must form a non-empty square,
    /// symmetric matrix of finite, non-negative values with a zero diagonal.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n = rows.len();
        if n == 0 {
            return Err(Error::invalid_input("distance matrix must not be empty"));
        }

        let mut values = Vec::with_capacity(n * n);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(Error::invalid_input(format!(
                    "row {i} has {} entries, expected {n}",
                    row.len()
                )));
            }
            values.extend(row);
        }

        let matrix = Self { n, values };
        for i in 0..n {
            if matrix.get(i, i) != 0.0 {
                return Err(Error::invalid_input(format!("diagonal entry {i} is not zero")));
            }
            for j in (i + 1)..n {
                let d = matrix.get(i, j);
                if !d.is_finite() || d < 0.0 {
                    return Err(Error::invalid_input(format!(
                        "entry ({i},{j}) must be finite and non-negative, got {d}"
                    )));
                }
                if d != matrix.get(j, i) {
                    return Err(Error::invalid_input(format!(
                        "matrix is not symmetric at ({i},{j})"
                    )));
                }
            }
        }
        Ok(matrix)
    }

    pub fn len(&self) -> usize {
        self.n
    }

    /// Always `false` for a constructed matrix; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.values[from * self.n + to]
    }

    pub fn row(&self, from: usize) -> &[f64] {
        &self.values[from * self.n..(from + 1) * self.n]
    }

    /// Length of the open path visiting `order` left to right. A single stop
    /// has length `+0.0`.
    pub fn path_length(&self, order: &[usize]) -> f64 {
        order
            .windows(2)
            .fold(0.0, |acc, w| acc + self.get(w[0], w[1]))
    }
}
