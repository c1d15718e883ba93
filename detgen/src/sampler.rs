//! Enumeration of the bounded solutions.
//!
//! Some parameters are fixed to random values from their intervals first,
//! which makes the result more random and the enumeration faster. Only
//! parameters whose pivot row is not a control row are fixed this way, so
//! fixing them never rules out every solution on its own. The remaining
//! parameters are enumerated exhaustively and every parameter vector that
//! puts all control rows into range is kept.

use rand::Rng;
use rand::seq::index;
use tracing::debug;

use crate::bounds::ParameterBounds;
use crate::matrix::Matrix;
use crate::system::ParametricSolution;

/// All the solutions found by [`sample`]. Each row is one assignment of the
/// unknowns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolutionPool {
    solutions: Matrix<i64>,
}

impl SolutionPool {
    pub fn new(unknowns: usize) -> Self {
        Self { solutions: Matrix::zero(0, unknowns) }
    }

    pub fn len(&self) -> usize {
        self.solutions.num_rows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn push(&mut self, solution: &[i64]) {
        self.solutions.push_row(solution);
    }

    pub fn iter(&self) -> impl Iterator<Item = &[i64]> + '_ {
        self.solutions.rows()
    }

    /// Picks one of the solutions uniformly at random.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&[i64]> {
        if self.is_empty() {
            return None;
        }
        Some(self.solutions.row(rng.random_range(0..self.len())))
    }
}

/// Collects the solutions of `sol` with all unknowns in `[lower, upper)`
/// after fixing up to `randomized` parameters to random values.
pub fn sample<R: Rng + ?Sized>(
    sol: &ParametricSolution,
    bounds: &ParameterBounds,
    randomized: usize,
    lower: i64,
    upper: i64,
    rng: &mut R,
) -> SolutionPool {
    let params = sol.num_params();
    assert_eq!(bounds.intervals.len(), params);

    let candidates = (0..params)
        .filter(|&l| !bounds.control[sol.pivot_rows()[l]])
        .collect::<Vec<_>>();
    let amount = randomized.min(candidates.len());

    let mut fixed = vec![false; params];
    for i in index::sample(rng, candidates.len(), amount) {
        fixed[candidates[i]] = true;
    }

    let mut p = bounds.intervals
        .iter()
        .zip(&fixed)
        .map(|(&(lo, hi), &f)| if f { rng.random_range(lo..=hi) } else { lo })
        .collect::<Vec<_>>();

    let free = (0..params).filter(|&l| !fixed[l]).collect::<Vec<_>>();
    debug!(
        "enumerating {} parameters with {} fixed, box volume {}",
        free.len(),
        params - free.len(),
        bounds.volume(),
    );

    let control = bounds.control_rows().collect::<Vec<_>>();
    let in_range = |x: i64| lower <= x && x < upper;

    let mut pool = SolutionPool::new(sol.num_unknowns());
    let mut visited = 0u64;
    loop {
        visited += 1;
        if control.iter().all(|&row| sol.evaluate(row, &p).is_some_and(in_range)) {
            if let Some(x) = sol.evaluate_all(&p) {
                pool.push(&x);
            }
        }

        if !advance(&mut p, &free, &bounds.intervals) {
            break;
        }
    }

    debug!("visited {visited} parameter vectors, found {} solutions", pool.len());
    pool
}

/// Moves to the next parameter vector, changing the last free parameter
/// fastest. Returns false once all of them have been visited.
fn advance(p: &mut [i64], free: &[usize], intervals: &[(i64, i64)]) -> bool {
    for &l in free.iter().rev() {
        let (lo, hi) = intervals[l];
        if p[l] < hi {
            p[l] += 1;
            return true;
        }
        p[l] = lo;
    }
    false
}
