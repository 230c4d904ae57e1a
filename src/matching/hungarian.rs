//! Hungarian Algorithm for the Linear Assignment Problem
//!
//! Given a square non-negative cost matrix, find the row -> column
//! permutation of minimum total cost:
//!
//! 1. Subtract each row's minimum, then each column's minimum.
//! 2. Cover every zero with horizontal/vertical lines, greedily taking the
//!    row or column that holds the most uncovered zeros (rows win ties).
//! 3. With fewer than n lines, subtract the smallest uncovered value from
//!    every uncovered row, add it to every covered column, and repeat 2.
//! 4. With n lines, assign rows to zero columns, rows with the fewest
//!    zeros first, removing the used row and column after each choice.
//!
//! Greedy covering can overshoot the minimum number of lines, in which
//! case step 4 cannot complete. The solver then computes a maximum
//! matching over the zeros by augmenting paths; an imperfect matching
//! yields a König minimum cover that drives the next adjustment. Step 3
//! also adjusts along the König cover whenever it needs fewer lines than
//! the greedy one.

use ndarray::Array2;
use tracing::debug;

use crate::error::{Result, TdaError};

/// One-to-one mapping from row index to column index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    columns: Vec<usize>,
}

impl Assignment {
    /// Wrap a row -> column mapping, checking that it is a permutation
    pub fn from_columns(columns: Vec<usize>) -> Result<Self> {
        let n = columns.len();
        let mut seen = vec![false; n];
        for &c in &columns {
            if c >= n || seen[c] {
                return Err(TdaError::invalid(format!(
                    "{columns:?} is not a permutation of 0..{n}"
                )));
            }
            seen[c] = true;
        }
        Ok(Self { columns })
    }

    /// Column matched to `row`
    pub fn column_for(&self, row: usize) -> Option<usize> {
        self.columns.get(row).copied()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.columns
    }

    /// (row, column) pairs in row order
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.columns.iter().copied().enumerate()
    }

    /// Sum of `cost[[row, column]]` over the matched pairs
    pub fn total_cost(&self, cost: &Array2<f64>) -> f64 {
        self.pairs().map(|(r, c)| cost[[r, c]]).sum()
    }
}

/// Solve the assignment problem for a square non-negative cost matrix.
pub fn solve_assignment(cost: &Array2<f64>) -> Result<Assignment> {
    let mut solver = Hungarian::new(cost)?;
    let n = solver.n;
    let cap = iteration_cap(n);

    for iteration in 0..cap {
        let cover = solver.greedy_cover();
        if cover.lines() < n {
            let (row_match, col_match) = solver.zero_matching();
            let minimum = solver.konig_cover(&row_match, &col_match);
            solver.adjust(if minimum.lines() < cover.lines() { &minimum } else { &cover });
            continue;
        }

        if let Some(columns) = solver.greedy_extract() {
            debug!(n, iterations = iteration + 1, "assignment solved");
            return Ok(Assignment { columns });
        }

        let (row_match, col_match) = solver.zero_matching();
        if row_match.iter().all(Option::is_some) {
            debug!(n, iterations = iteration + 1, "assignment solved by augmenting paths");
            return Ok(Assignment {
                columns: row_match.into_iter().flatten().collect(),
            });
        }

        let cover = solver.konig_cover(&row_match, &col_match);
        solver.adjust(&cover);
    }

    Err(TdaError::AssignmentDidNotConverge { iterations: cap })
}

/// Run the Hungarian reduction until greedy covering needs n lines.
///
/// Returns the reduced cost matrix whose zeros encode the optimal
/// assignment.
pub fn reduce_cost_matrix(cost: &Array2<f64>) -> Result<Array2<f64>> {
    let mut solver = Hungarian::new(cost)?;
    let n = solver.n;
    let cap = iteration_cap(n);

    for _ in 0..cap {
        let cover = solver.greedy_cover();
        if cover.lines() >= n {
            return Ok(solver.d);
        }
        solver.adjust(&cover);
    }

    Err(TdaError::AssignmentDidNotConverge { iterations: cap })
}

fn iteration_cap(n: usize) -> usize {
    4 * (n + 1) * (n + 1)
}

/// Covered rows and columns
#[derive(Debug)]
struct Cover {
    rows: Vec<bool>,
    cols: Vec<bool>,
}

impl Cover {
    fn lines(&self) -> usize {
        self.rows.iter().chain(&self.cols).filter(|&&c| c).count()
    }
}

/// Working state: the cost matrix after row/column reduction
struct Hungarian {
    d: Array2<f64>,
    n: usize,
}

impl Hungarian {
    fn new(cost: &Array2<f64>) -> Result<Self> {
        let (rows, cols) = cost.dim();
        if rows != cols {
            return Err(TdaError::NoFeasibleAssignment { rows, cols });
        }
        if let Some(bad) = cost.iter().find(|v| !v.is_finite() || **v < 0.0) {
            return Err(TdaError::invalid(format!(
                "cost entries must be finite and non-negative, found {bad}"
            )));
        }

        let mut d = cost.clone();
        for mut row in d.rows_mut() {
            let min = row.iter().copied().fold(f64::INFINITY, f64::min);
            row.mapv_inplace(|v| v - min);
        }
        for mut col in d.columns_mut() {
            let min = col.iter().copied().fold(f64::INFINITY, f64::min);
            col.mapv_inplace(|v| v - min);
        }

        Ok(Self { d, n: rows })
    }

    fn is_zero(&self, r: usize, c: usize) -> bool {
        self.d[[r, c]] == 0.0
    }

    /// Cover zeros line by line, always taking the fullest row or column
    fn greedy_cover(&self) -> Cover {
        let n = self.n;
        let mut cover = Cover {
            rows: vec![false; n],
            cols: vec![false; n],
        };

        loop {
            let mut row_zeros = vec![0usize; n];
            let mut col_zeros = vec![0usize; n];
            for r in (0..n).filter(|&r| !cover.rows[r]) {
                for c in (0..n).filter(|&c| !cover.cols[c]) {
                    if self.is_zero(r, c) {
                        row_zeros[r] += 1;
                        col_zeros[c] += 1;
                    }
                }
            }

            let (best_row, row_count) = first_max(&row_zeros);
            let (best_col, col_count) = first_max(&col_zeros);
            if row_count == 0 {
                return cover;
            }

            if row_count >= col_count {
                cover.rows[best_row] = true;
            } else {
                cover.cols[best_col] = true;
            }
        }
    }

    /// Shift the smallest uncovered value from uncovered rows onto covered columns
    fn adjust(&mut self, cover: &Cover) {
        let n = self.n;
        let mut smallest = f64::INFINITY;
        for r in (0..n).filter(|&r| !cover.rows[r]) {
            for c in (0..n).filter(|&c| !cover.cols[c]) {
                smallest = smallest.min(self.d[[r, c]]);
            }
        }
        if !smallest.is_finite() {
            return;
        }

        for r in (0..n).filter(|&r| !cover.rows[r]) {
            self.d.row_mut(r).mapv_inplace(|v| v - smallest);
        }
        for c in (0..n).filter(|&c| cover.cols[c]) {
            self.d.column_mut(c).mapv_inplace(|v| v + smallest);
        }
    }

    /// Assign rows with the fewest available zeros first
    fn greedy_extract(&self) -> Option<Vec<usize>> {
        let n = self.n;
        let mut row_used = vec![false; n];
        let mut col_used = vec![false; n];
        let mut columns = vec![usize::MAX; n];

        for _ in 0..n {
            let mut pick: Option<(usize, usize)> = None;
            for r in (0..n).filter(|&r| !row_used[r]) {
                let zeros = (0..n)
                    .filter(|&c| !col_used[c] && self.is_zero(r, c))
                    .count();
                if zeros > 0 && pick.map_or(true, |(_, best)| zeros < best) {
                    pick = Some((r, zeros));
                }
            }

            let (row, _) = pick?;
            let col = (0..n).find(|&c| !col_used[c] && self.is_zero(row, c))?;
            columns[row] = col;
            row_used[row] = true;
            col_used[col] = true;
        }

        Some(columns)
    }

    /// Maximum matching over zero entries (Kuhn's augmenting paths)
    fn zero_matching(&self) -> (Vec<Option<usize>>, Vec<Option<usize>>) {
        let n = self.n;
        let mut row_match: Vec<Option<usize>> = vec![None; n];
        let mut col_match: Vec<Option<usize>> = vec![None; n];

        for r in 0..n {
            let mut visited = vec![false; n];
            self.augment(r, &mut visited, &mut row_match, &mut col_match);
        }

        (row_match, col_match)
    }

    fn augment(
        &self,
        r: usize,
        visited: &mut [bool],
        row_match: &mut [Option<usize>],
        col_match: &mut [Option<usize>],
    ) -> bool {
        for c in 0..self.n {
            if visited[c] || !self.is_zero(r, c) {
                continue;
            }
            visited[c] = true;
            let free = match col_match[c] {
                None => true,
                Some(other) => self.augment(other, visited, row_match, col_match),
            };
            if free {
                row_match[r] = Some(c);
                col_match[c] = Some(r);
                return true;
            }
        }
        false
    }

    /// Minimum line cover from a maximum matching (König)
    fn konig_cover(&self, row_match: &[Option<usize>], col_match: &[Option<usize>]) -> Cover {
        let n = self.n;
        let mut row_seen = vec![false; n];
        let mut col_seen = vec![false; n];
        let mut stack: Vec<usize> = (0..n).filter(|&r| row_match[r].is_none()).collect();
        for &r in &stack {
            row_seen[r] = true;
        }

        while let Some(r) = stack.pop() {
            for c in 0..n {
                if col_seen[c] || !self.is_zero(r, c) {
                    continue;
                }
                col_seen[c] = true;
                if let Some(next) = col_match[c] {
                    if !row_seen[next] {
                        row_seen[next] = true;
                        stack.push(next);
                    }
                }
            }
        }

        Cover {
            rows: row_seen.iter().map(|&seen| !seen).collect(),
            cols: col_seen,
        }
    }
}

/// Index and value of the first maximum
fn first_max(values: &[usize]) -> (usize, usize) {
    values
        .iter()
        .copied()
        .enumerate()
        .fold((0, 0), |best, (i, v)| if v > best.1 { (i, v) } else { best })
}
