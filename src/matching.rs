//! One-to-one matchers over a `rows x cols` cost matrix.
//!
//! Cells holding a non-finite cost are infeasible and never appear in a result.
//! Both matchers return `(row, col)` pairs; at most `min(rows, cols)` of them.

use crate::config::MatchStrategy;

pub type CostMatrix = Vec<Vec<f64>>;

pub fn solve(strategy: MatchStrategy, matrix: &CostMatrix) -> Vec<(usize, usize)> {
    match strategy {
        MatchStrategy::Greedy => greedy_min_cost_match(matrix),
        MatchStrategy::Hungarian => hungarian_match(matrix),
    }
}

/// Repeatedly commits the globally cheapest remaining cell and strikes out its
/// row and column. Ties go to the earliest row, then the earliest column.
///
/// Not optimal: `[[1, 2], [2, 100]]` yields a total of 101 where 4 exists.
pub fn greedy_min_cost_match(matrix: &CostMatrix) -> Vec<(usize, usize)> {
    let rows = matrix.len();
    let cols = matrix.first().map_or(0, Vec::len);
    let budget = rows.min(cols);
    let mut used_rows = vec![false; rows];
    let mut used_cols = vec![false; cols];
    let mut out = Vec::with_capacity(budget);

    for _ in 0..budget {
        let mut best: Option<(usize, usize, f64)> = None;
        for (i, row) in matrix.iter().enumerate() {
            if used_rows[i] {
                continue;
            }
            for (j, &c) in row.iter().enumerate() {
                if used_cols[j] || !c.is_finite() {
                    continue;
                }
                if best.is_none_or(|(_, _, b)| c < b) {
                    best = Some((i, j, c));
                }
            }
        }
        let Some((i, j, _)) = best else { break };
        used_rows[i] = true;
        used_cols[j] = true;
        out.push((i, j));
    }
    out
}

/// Exact minimum-cost assignment (Kuhn-Munkres with row/column potentials),
/// O(n^2 m) for `n <= m`. Rectangular inputs are handled by transposing.
pub fn hungarian_match(matrix: &CostMatrix) -> Vec<(usize, usize)> {
    let rows = matrix.len();
    let cols = matrix.first().map_or(0, Vec::len);
    if rows == 0 || cols == 0 {
        return Vec::new();
    }

    // Infeasible cells get a finite cost larger than any feasible total.
    let finite_max = matrix
        .iter()
        .flatten()
        .copied()
        .filter(|c| c.is_finite())
        .fold(0.0_f64, |acc, c| acc.max(c.abs()));
    let blocked = (finite_max + 1.0) * (rows.max(cols) as f64 + 1.0);
    let cell = |i: usize, j: usize| -> f64 {
        let c = matrix[i][j];
        if c.is_finite() { c } else { blocked }
    };

    let transposed = rows > cols;
    let (n, m) = if transposed { (cols, rows) } else { (rows, cols) };
    let a: Vec<Vec<f64>> = (0..n)
        .map(|i| {
            (0..m)
                .map(|j| if transposed { cell(j, i) } else { cell(i, j) })
                .collect()
        })
        .collect();

    let mut u = vec![0.0; n + 1];
    let mut v = vec![0.0; m + 1];
    let mut p = vec![0usize; m + 1];
    let mut way = vec![0usize; m + 1];

    for i in 1..=n {
        p[0] = i;
        let mut j0 = 0usize;
        let mut minv = vec![f64::INFINITY; m + 1];
        let mut used = vec![false; m + 1];
        loop {
            used[j0] = true;
            let i0 = p[j0];
            let mut delta = f64::INFINITY;
            let mut j1 = 0usize;
            for j in 1..=m {
                if used[j] {
                    continue;
                }
                let cur = a[i0 - 1][j - 1] - u[i0] - v[j];
                if cur < minv[j] {
                    minv[j] = cur;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }
            for j in 0..=m {
                if used[j] {
                    u[p[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }
            j0 = j1;
            if p[j0] == 0 {
                break;
            }
        }
        loop {
            let j1 = way[j0];
            p[j0] = p[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut out: Vec<(usize, usize)> = (1..=m)
        .filter(|&j| p[j] != 0)
        .map(|j| {
            let (r, c) = (p[j] - 1, j - 1);
            if transposed { (c, r) } else { (r, c) }
        })
        .filter(|&(r, c)| matrix[r][c].is_finite())
        .collect();
    out.sort_unstable();
    out
}

pub fn total_cost(matrix: &CostMatrix, pairs: &[(usize, usize)]) -> f64 {
    pairs.iter().map(|&(i, j)| matrix[i][j]).sum()
}
