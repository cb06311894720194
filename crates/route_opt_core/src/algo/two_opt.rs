use crate::DistanceMatrix;

/// Fewer nodes than this leave no segment that can be reversed without
/// moving the depot.
pub const MIN_ROUTE_SIZE_FOR_2OPT: usize = 3;
const TWO_OPT_IMPROVEMENT_EPSILON: f64 = 1e-9;

/// Change in open-path length from reversing `order[i..=j]`.
///
/// Requires `1 <= i < j < order.len()`. The edge into the segment always
/// changes; the edge out of it only exists when `j` is not the last position.
#[inline]
fn reversal_delta(matrix: &DistanceMatrix, order: &[usize], i: usize, j: usize) -> f64 {
    let prev = order[i - 1];
    let first = order[i];
    let last = order[j];

    let mut delta = matrix.get(prev, last) - matrix.get(prev, first);
    if let Some(&next) = order.get(j + 1) {
        delta += matrix.get(first, next) - matrix.get(last, next);
    }
    delta
}

/// One first-improvement 2-opt sweep over an open path.
///
/// Every improving reversal found while scanning is applied immediately and
/// the scan continues on the updated order, so one sweep may apply several
/// moves; callers repeat sweeps until one applies none. Position 0 is never part of a
/// reversed segment. Returns the number of applied moves.
pub fn two_opt_sweep(matrix: &DistanceMatrix, order: &mut [usize]) -> usize {
    let n = order.len();
    if n < MIN_ROUTE_SIZE_FOR_2OPT {
        return 0;
    }

    let mut moves = 0usize;
    for i in 1..(n - 1) {
        for j in (i + 1)..n {
            if reversal_delta(matrix, order, i, j) < -TWO_OPT_IMPROVEMENT_EPSILON {
                order[i..=j].reverse();
                moves += 1;
            }
        }
    }
    moves
}

#[cfg(test)]
mod tests {
    use super::{reversal_delta, two_opt_sweep};
    use crate::{Coordinate, DistanceMatrix};

    fn line_matrix(positions: &[f64]) -> DistanceMatrix {
        let rows = positions
            .iter()
            .map(|a| positions.iter().map(|b| (a - b).abs()).collect())
            .collect();
        DistanceMatrix::from_rows(rows).expect("matrix")
    }

    #[test]
    fn reversal_delta_matches_recomputed_length() {
        let matrix = line_matrix(&[0.0, 3.0, 1.0, 4.0, 2.0]);
        let order = [0, 1, 2, 3, 4];
        for i in 1..4 {
            for j in (i + 1)..5 {
                let mut reversed = order;
                reversed[i..=j].reverse();
                let expected = matrix.path_length(&reversed) - matrix.path_length(&order);
                assert!((reversal_delta(&matrix, &order, i, j) - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn sweep_uncrosses_interior_edges() {
        let coords = [
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 1.0),
            Coordinate::new(1.0, 2.0),
            Coordinate::new(0.0, 2.0),
            Coordinate::new(1.0, 3.0),
        ];
        let matrix = DistanceMatrix::from_coordinates(&coords).expect("matrix");
        let mut order = vec![0, 1, 2, 3, 4];
        let before = matrix.path_length(&order);

        let moves = two_opt_sweep(&matrix, &mut order);

        assert!(moves > 0);
        assert_eq!(order[0], 0);
        assert!(matrix.path_length(&order) < before);
    }

    #[test]
    fn sweep_can_reverse_the_tail_of_an_open_path() {
        // depot at 0, stops at 3 and 1 visited far-first.
        let matrix = line_matrix(&[0.0, 3.0, 1.0]);
        let mut order = vec![0, 1, 2];

        assert_eq!(two_opt_sweep(&matrix, &mut order), 1);
        assert_eq!(order, vec![0, 2, 1]);
    }

    #[test]
    fn sweep_never_moves_the_depot() {
        // Starting anywhere but the depot would be shorter; the depot stays put.
        let matrix = line_matrix(&[5.0, 0.0, 10.0, 1.0]);
        let mut order = vec![0, 1, 2, 3];

        two_opt_sweep(&matrix, &mut order);
        assert_eq!(order[0], 0);
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3]);
    }

    #[test]
    fn sweep_is_a_no_op_for_tiny_routes() {
        let matrix = line_matrix(&[0.0, 1.0]);
        let mut order = vec![0, 1];
        assert_eq!(two_opt_sweep(&matrix, &mut order), 0);
        assert_eq!(order, vec![0, 1]);
    }
}
