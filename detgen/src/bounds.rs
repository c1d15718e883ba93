//! Intervals for the parameters of a triangularized solution such that the
//! unknowns stay within `[lower, upper)`.
//!
//! Parameter `l` is bounded by its pivot row, which only depends on the
//! parameters `0..=l`. Given intervals for the earlier parameters, the
//! contribution of the earlier parameters to the pivot row lies within
//! `[s_min, s_max]`, so every value of parameter `l` for which the row can
//! still be in range for some choice of the earlier parameters is kept.
//!
//! A row whose value is not pinned down by a single parameter is only
//! approximated by this. Those are the control rows, which have to be
//! checked again once all parameters are chosen.

use tracing::trace;

use crate::arith::{div_ceil, div_floor};
use crate::system::ParametricSolution;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParameterBounds {
    /// Inclusive interval for every parameter.
    pub intervals: Vec<(i64, i64)>,

    /// For every unknown, whether it has to be checked after all
    /// parameters are chosen.
    pub control: Vec<bool>,
}

impl ParameterBounds {
    /// The rows that have to be checked, in ascending order.
    pub fn control_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.control.iter()
            .enumerate()
            .filter_map(|(row, &c)| c.then_some(row))
    }

    /// The number of parameter vectors within the bounds, saturating.
    pub fn volume(&self) -> u64 {
        self.intervals
            .iter()
            .map(|&(lo, hi)| {
                let len = i128::from(hi) - i128::from(lo) + 1;
                u64::try_from(len).unwrap_or(u64::MAX)
            })
            .fold(1, u64::saturating_mul)
    }
}

/// Computes the parameter intervals for `sol`, which has to be triangularized.
///
/// Returns `None` if some interval is empty, i.e. no unknown vector of the
/// solution set lies within `[lower, upper)`.
pub fn propagate(
    sol: &ParametricSolution,
    lower: i64,
    upper: i64,
) -> Option<ParameterBounds> {
    let basis = sol.basis();
    let pivot_rows = sol.pivot_rows();
    assert_eq!(pivot_rows.len(), sol.num_params(), "Solution is not triangularized.");

    let mut intervals: Vec<(i64, i64)> = Vec::with_capacity(pivot_rows.len());
    let mut control = vec![true; sol.num_unknowns()];

    // The sums are taken in i128 so that wide bounds cannot overflow them.
    for (l, &row) in pivot_rows.iter().enumerate() {
        let (mut s_min, mut s_max) = (0i128, 0i128);
        let mut dependent = false;
        for (&b, &(lo, hi)) in basis.row(row).iter().zip(&intervals) {
            let (b, lo, hi) = (i128::from(b), i128::from(lo), i128::from(hi));
            if b > 0 {
                s_min += b * lo;
                s_max += b * hi;
            } else if b < 0 {
                s_min += b * hi;
                s_max += b * lo;
            }
            dependent |= b != 0;
        }
        control[row] = dependent;

        // lower <= o + s + a p <= upper - 1
        let o = i128::from(sol.offset()[row]);
        let a = i128::from(basis[(row, l)]);
        let from = i128::from(lower) - o - s_max;
        let to = i128::from(upper) - 1 - o - s_min;
        let (lo, hi) = if a > 0 {
            (div_ceil(from, a), div_floor(to, a))
        } else {
            (div_ceil(to, a), div_floor(from, a))
        };

        trace!("parameter {l} from row {row}: [{lo}, {hi}]");
        if lo > hi {
            return None;
        }
        intervals.push((clamp(lo), clamp(hi)));
    }

    Some(ParameterBounds { intervals, control })
}

/// Parameters beyond `i64` cannot be evaluated anyway.
fn clamp(x: i128) -> i64 {
    x.clamp(i64::MIN.into(), i64::MAX.into()) as i64
}

#[cfg(test)]
mod test {
    use rand::{Rng as _, SeedableRng as _, rngs::StdRng};

    use super::*;
    use crate::matrix::Matrix;

    #[test]
    fn diagonal() {
        // x0 = 1 + 2 p0, x1 = -p1
        let basis = Matrix::from_rows(&[[2, 0], [0, -1]]);
        let mut sol = ParametricSolution::new(vec![1, 0], basis);
        sol.triangularize();

        let bounds = propagate(&sol, -9, 10).unwrap();
        assert_eq!(bounds.control_rows().count(), 0);

        // The column order after triangularization is not fixed, so look
        // the intervals up by their rows.
        for (l, &row) in sol.pivot_rows().iter().enumerate() {
            let expected = if row == 0 { (-5, 4) } else { (-9, 9) };
            assert_eq!(bounds.intervals[l], expected);
        }
        assert_eq!(bounds.volume(), 10 * 19);
    }

    #[test]
    fn dependent_row() {
        // x0 = p0, x1 = p0 + 2 p1, x2 = 3 - p0
        let basis = Matrix::from_rows(&[[1, 0], [1, 2], [-1, 0]]);
        let mut sol = ParametricSolution::new(vec![0, 0, 3], basis);
        sol.triangularize();
        assert_eq!(sol.pivot_rows(), [0, 1]);

        let bounds = propagate(&sol, 0, 3).unwrap();
        assert_eq!(bounds.intervals, [(0, 2), (-1, 1)]);
        assert_eq!(bounds.control, [false, true, true]);
        assert_eq!(bounds.control_rows().collect::<Vec<_>>(), [1, 2]);
    }

    #[test]
    fn empty() {
        // x0 = 11 + 4 p0 can't be in [0, 3).
        let basis = Matrix::from_rows(&[[4]]);
        let mut sol = ParametricSolution::new(vec![11], basis);
        sol.triangularize();
        assert_eq!(propagate(&sol, 0, 3), None);
    }

    #[test]
    fn widest_bounds() {
        // x0 = p0, x1 = p0 + 2 p1
        let basis = Matrix::from_rows(&[[1, 0], [1, 2]]);
        let mut sol = ParametricSolution::new(vec![0, 0], basis);
        sol.triangularize();
        assert_eq!(sol.pivot_rows(), [0, 1]);

        let bounds = propagate(&sol, i64::MIN, i64::MAX).unwrap();
        assert_eq!(bounds.intervals, [(i64::MIN, i64::MAX - 1), (i64::MIN + 1, i64::MAX)]);
        assert_eq!(bounds.control, [false, true]);
        assert_eq!(bounds.volume(), u64::MAX);

        // Clamped to what fits.
        let mut sol = ParametricSolution::new(vec![i64::MAX], Matrix::from_rows(&[[1]]));
        sol.triangularize();
        let bounds = propagate(&sol, i64::MIN, 0).unwrap();
        assert_eq!(bounds.intervals, [(i64::MIN, i64::MIN)]);
    }

    #[test]
    fn contains_every_solution() {
        let rng = &mut StdRng::seed_from_u64(0);
        for _ in 0..200 {
            let rows = rng.random_range(1..5);
            let cols = rng.random_range(1..=rows.min(3));
            let basis = Matrix::random(rows, cols, -3, 4, rng);
            let offset = (0..rows).map(|_| rng.random_range(-3..4)).collect();
            let mut sol = ParametricSolution::new(offset, basis);
            sol.triangularize();

            let Some(bounds) = propagate(&sol, -4, 5) else {
                continue;
            };

            // Brute force over a box that is larger than the bounds.
            let params = sol.num_params();
            let mut p = vec![-12; params];
            'outer: loop {
                let x = sol.evaluate_all(&p).unwrap();
                if x.iter().all(|x| (-4..5).contains(x)) {
                    for (l, &(lo, hi)) in bounds.intervals.iter().enumerate() {
                        assert!((lo..=hi).contains(&p[l]), "{p:?} not within {bounds:?}");
                    }
                }

                for i in (0..params).rev() {
                    if p[i] < 12 {
                        p[i] += 1;
                        continue 'outer;
                    }
                    p[i] = -12;
                }
                break;
            }
        }
    }
}
