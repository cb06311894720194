use crate::DistanceMatrix;

/// Index every route starts from.
pub const DEPOT: usize = 0;

/// Greedy nearest-neighbor path from the depot.
///
/// Each step appends the closest unvisited index by matrix lookup; ties go to
/// the lowest index because candidates are scanned in order and only a
/// strictly shorter distance replaces the current best.
pub fn nearest_neighbor(matrix: &DistanceMatrix) -> Vec<usize> {
    let n = matrix.len();
    let mut order = Vec::with_capacity(n);
    if n == 0 {
        return order;
    }

    let mut visited = vec![false; n];
    let mut current = DEPOT;
    visited[current] = true;
    order.push(current);

    while order.len() < n {
        let mut best: Option<(usize, f64)> = None;
        for (candidate, &d) in matrix.row(current).iter().enumerate() {
            if visited[candidate] {
                continue;
            }
            if best.is_none_or(|(_, best_d)| d < best_d) {
                best = Some((candidate, d));
            }
        }

        let Some((next, _)) = best else {
            break;
        };
        visited[next] = true;
        order.push(next);
        current = next;
    }

    order
}
