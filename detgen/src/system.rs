//! Linear systems of equations over the integers.
//!
//! An [`AugmentedSystem`] has one column per variable and a final column for
//! the constant term, so each row `[a_0, ..., a_m, c]` is the relation
//! `a_0 x_0 + ... + a_m x_m + c = 0`. The first variables are the unknowns we
//! actually care about and the remaining ones are parameters introduced along
//! the way.
//!
//! [`AugmentedSystem::solve`] turns the system into a [`ParametricSolution`],
//! i.e. writes every unknown as an integer-affine function of free integer
//! parameters. Every integer assignment of the parameters gives a solution
//! and every solution arises this way.

use std::cmp::Reverse;

use itertools::Itertools as _;
use tracing::trace;

use crate::arith::balanced_divmod;
use crate::matrix::Matrix;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AugmentedSystem {
    relations: Matrix<i64>,
    unknowns: usize,
}

impl AugmentedSystem {
    /// A system without relations in `unknowns` unknowns.
    pub fn new(unknowns: usize) -> Self {
        Self { relations: Matrix::zero(0, unknowns + 1), unknowns }
    }

    pub fn num_unknowns(&self) -> usize {
        self.unknowns
    }

    /// The number of unknowns plus the number of parameters.
    pub fn num_variables(&self) -> usize {
        self.relations.num_cols() - 1
    }

    /// The relations as rows of coefficients followed by the constant.
    pub fn relations(&self) -> &Matrix<i64> {
        &self.relations
    }

    /// Adds a parameter and returns its column.
    pub fn add_parameter(&mut self) -> usize {
        let col = self.num_variables();
        self.relations.insert_zero_col(col);
        col
    }

    /// Adds the relation `sum(a * x_v for (v, a) in terms) + constant = 0`.
    pub fn push_relation(&mut self, terms: &[(usize, i64)], constant: i64) {
        let vars = self.num_variables();
        let mut row = vec![0; vars + 1];
        for &(v, a) in terms {
            assert!(v < vars, "Variable {v} does not exist.");
            row[v] += a;
        }
        row[vars] = constant;
        self.relations.push_row(&row);
    }

    /// Solves the system by Gauss-Jordan elimination over the integers.
    ///
    /// Only entries of absolute value 1 are used as pivots, so no division
    /// ever happens. If a row has no such entry, a new parameter is
    /// introduced to split the row into one that has a unit entry and
    /// a remainder with smaller coefficients.
    ///
    /// Returns `None` if the system has no integer solution.
    pub fn solve(mut self) -> Option<ParametricSolution> {
        let mut pivots = Vec::new();

        let mut r = 0;
        while r < self.relations.num_rows() {
            let vars = self.num_variables();

            // Pivot columns are zero in this row by now.
            let support = (0..vars)
                .filter(|&c| self.relations[(r, c)] != 0)
                .collect::<Vec<_>>();

            let unit = support
                .iter()
                .copied()
                .find(|&c| self.relations[(r, c)].abs() == 1);

            let pivot = match (unit, support.as_slice()) {
                (Some(c), _) => c,

                // 0 = c
                (None, []) => {
                    if self.relations[(r, vars)] != 0 {
                        return None;
                    }
                    self.relations.remove_row(r);
                    continue;
                }

                // g * x + c = 0
                (None, &[c]) => {
                    let g = self.relations[(r, c)];
                    let constant = self.relations[(r, vars)];
                    if constant % g != 0 {
                        return None;
                    }
                    self.relations[(r, c)] = 1;
                    self.relations[(r, vars)] = constant / g;
                    c
                }

                (None, support) => self.split_row(r, support),
            };

            if self.relations[(r, pivot)] < 0 {
                self.relations.negate_row(r);
            }

            for other in 0..self.relations.num_rows() {
                let a = self.relations[(other, pivot)];
                if other != r && a != 0 {
                    self.relations.row_multiply_add(other, r, -a);
                }
            }

            pivots.push(pivot);
            r += 1;
        }

        Some(self.into_solution(&pivots))
    }

    /// Given a row without unit entries, introduces a parameter `t` and
    /// inserts the relation `x_j + q x_i - t = 0` before row `r`, where `x_i`
    /// and `x_j` have the largest and second largest coefficients in row `r`
    /// and `q` is their balanced quotient. Returns `j`, which is the pivot
    /// for the new row.
    ///
    /// Eliminating `x_j` from row `r` leaves the balanced remainder as the
    /// coefficient of `x_i`, so the coefficients shrink.
    fn split_row(&mut self, r: usize, support: &[usize]) -> usize {
        let order = support
            .iter()
            .copied()
            .sorted_by_key(|&c| Reverse(self.relations[(r, c)].abs()))
            .collect::<Vec<_>>();
        let (i, j) = (order[0], order[1]);

        let (q, _) = balanced_divmod(self.relations[(r, i)], self.relations[(r, j)]);
        let t = self.add_parameter();
        trace!("splitting row {r}: x{j} + {q} x{i} = x{t}");

        self.relations.insert_zero_row(r);
        self.relations[(r, j)] = 1;
        self.relations[(r, i)] = q;
        self.relations[(r, t)] = -1;
        j
    }

    /// Reads off the solution once the system is in reduced form, where
    /// `pivots[r]` is the column whose only non-zero entry is a 1 in row `r`.
    fn into_solution(self, pivots: &[usize]) -> ParametricSolution {
        let vars = self.num_variables();

        let mut pivot_row = vec![None; vars];
        for (r, &c) in pivots.iter().enumerate() {
            pivot_row[c] = Some(r);
        }

        let free = (0..vars)
            .filter(|&c| pivot_row[c].is_none())
            .collect::<Vec<_>>();

        let mut offset = vec![0; self.unknowns];
        let mut basis = Matrix::zero(self.unknowns, free.len());
        for u in 0..self.unknowns {
            match pivot_row[u] {
                // x_u + sum(a_f x_f) + c = 0
                Some(r) => {
                    offset[u] = -self.relations[(r, vars)];
                    for (l, &f) in free.iter().enumerate() {
                        basis[(u, l)] = -self.relations[(r, f)];
                    }
                }

                // The unknown is a parameter itself.
                None => {
                    let l = free.partition_point(|&f| f < u);
                    basis[(u, l)] = 1;
                }
            }
        }

        ParametricSolution::new(offset, basis)
    }
}

/// The solutions `x = offset + basis * p` for integer parameter vectors `p`.
///
/// After [`ParametricSolution::triangularize`], the basis has full column
/// rank and is in column echelon form with respect to some ordering of the
/// rows: the row `pivot_rows()[l]` only depends on the parameters `0..=l`,
/// and its coefficient of parameter `l` is non-zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParametricSolution {
    offset: Vec<i64>,
    basis: Matrix<i64>,
    pivot_rows: Vec<usize>,
}

impl ParametricSolution {
    pub fn new(offset: Vec<i64>, basis: Matrix<i64>) -> Self {
        assert_eq!(offset.len(), basis.num_rows());
        Self { offset, basis, pivot_rows: Vec::new() }
    }

    pub fn offset(&self) -> &[i64] {
        &self.offset
    }

    pub fn basis(&self) -> &Matrix<i64> {
        &self.basis
    }

    pub fn num_unknowns(&self) -> usize {
        self.offset.len()
    }

    pub fn num_params(&self) -> usize {
        self.basis.num_cols()
    }

    /// The row introducing each parameter. Empty before
    /// [`ParametricSolution::triangularize`].
    pub fn pivot_rows(&self) -> &[usize] {
        &self.pivot_rows
    }

    /// The value of unknown `row` for the given parameters, or `None` if it
    /// does not fit into an `i64`.
    pub fn evaluate(&self, row: usize, params: &[i64]) -> Option<i64> {
        let value = self.basis.row(row)
            .iter()
            .zip(params)
            .try_fold(i128::from(self.offset[row]), |acc, (&b, &p)| {
                acc.checked_add(i128::from(b) * i128::from(p))
            })?;
        i64::try_from(value).ok()
    }

    /// The values of all unknowns for the given parameters.
    pub fn evaluate_all(&self, params: &[i64]) -> Option<Vec<i64>> {
        (0..self.num_unknowns())
            .map(|row| self.evaluate(row, params))
            .collect()
    }

    /// Brings the basis into column echelon form using unimodular column
    /// operations, which only reparametrize the solution set. Redundant
    /// parameters are dropped.
    ///
    /// Rows are visited from the sparsest to the densest. Each row gets its
    /// entries in the not yet used columns combined into a single one with
    /// the Euclidean algorithm, which then becomes the next pivot column.
    /// The entries to the left of the pivot are reduced by it afterwards.
    pub fn triangularize(&mut self) {
        let params = self.num_params();
        let basis = &mut self.basis;

        let order = (0..basis.num_rows())
            .sorted_by_key(|&r| basis.row(r).iter().filter(|e| **e != 0).count())
            .collect::<Vec<_>>();

        self.pivot_rows.clear();
        let mut l = 0;
        for row in order {
            if l == params {
                break;
            }

            loop {
                let support = (l..params)
                    .filter(|&c| basis[(row, c)] != 0)
                    .sorted_by_key(|&c| Reverse(basis[(row, c)].abs()))
                    .collect::<Vec<_>>();

                let &[big, second, ..] = support.as_slice() else {
                    break;
                };

                let (q, _) = balanced_divmod(basis[(row, big)], basis[(row, second)]);
                basis.col_multiply_add(big, second, -q);
            }

            // This row is determined by the previous parameters.
            let Some(pivot) = (l..params).find(|&c| basis[(row, c)] != 0) else {
                continue;
            };

            basis.swap_columns(l, pivot);

            let p = basis[(row, l)];
            for c in 0..l {
                let (q, _) = balanced_divmod(basis[(row, c)], p);
                if q != 0 {
                    basis.col_multiply_add(c, l, -q);
                }
            }

            self.pivot_rows.push(row);
            l += 1;
        }

        basis.truncate_cols(l);
    }
}

#[cfg(test)]
mod test {
    use rand::{Rng as _, SeedableRng as _, rngs::StdRng};

    use super::*;

    /// Random system in `unknowns` unknowns that has the given solution.
    fn random_system(
        unknowns: usize,
        relations: usize,
        solution: &[i64],
        rng: &mut StdRng,
    ) -> AugmentedSystem {
        let mut sys = AugmentedSystem::new(unknowns);
        for _ in 0..relations {
            let terms = (0..unknowns)
                .map(|v| (v, rng.random_range(-6..7)))
                .collect::<Vec<_>>();
            let value: i64 = terms.iter().map(|&(v, a)| a * solution[v]).sum();
            sys.push_relation(&terms, -value);
        }
        sys
    }

    /// Checks that every parametrized point solves the system.
    fn assert_solves(sys: &AugmentedSystem, sol: &ParametricSolution, rng: &mut StdRng) {
        let n = sys.num_unknowns();
        for _ in 0..20 {
            let params = (0..sol.num_params())
                .map(|_| rng.random_range(-5..6))
                .collect::<Vec<_>>();
            let x = sol.evaluate_all(&params).unwrap();

            // The original system only involves the unknowns.
            for row in sys.relations().rows() {
                let value: i64 = row[..n].iter().zip(&x).map(|(a, x)| a * x).sum();
                assert_eq!(value + row[row.len() - 1], 0, "{x:?} does not solve {sys:?}");
            }
        }
    }

    #[test]
    fn single_equation() {
        // 2x + 3y = 1
        let mut sys = AugmentedSystem::new(2);
        sys.push_relation(&[(0, 2), (1, 3)], -1);
        let sol = sys.clone().solve().unwrap();
        assert_eq!(sol.num_params(), 1);
        assert_solves(&sys, &sol, &mut StdRng::seed_from_u64(0));
    }

    #[test]
    fn inconsistent() {
        // 2x + 4y = 1
        let mut sys = AugmentedSystem::new(2);
        sys.push_relation(&[(0, 2), (1, 4)], -1);
        assert_eq!(sys.solve(), None);

        // x + y = 1, x + y = 2
        let mut sys = AugmentedSystem::new(2);
        sys.push_relation(&[(0, 1), (1, 1)], -1);
        sys.push_relation(&[(0, 1), (1, 1)], -2);
        assert_eq!(sys.solve(), None);

        // 3x = 2
        let mut sys = AugmentedSystem::new(1);
        sys.push_relation(&[(0, 3)], -2);
        assert_eq!(sys.solve(), None);
    }

    #[test]
    fn redundant_relations() {
        // x - y = 0 twice and 3x = 6.
        let mut sys = AugmentedSystem::new(2);
        sys.push_relation(&[(0, 1), (1, -1)], 0);
        sys.push_relation(&[(0, 2), (1, -2)], 0);
        sys.push_relation(&[(0, 3)], -6);
        let sol = sys.solve().unwrap();
        assert_eq!(sol.num_params(), 0);
        assert_eq!(sol.evaluate_all(&[]), Some(vec![2, 2]));
    }

    #[test]
    fn parameters() {
        let mut sys = AugmentedSystem::new(2);
        assert_eq!(sys.num_variables(), 2);
        sys.push_relation(&[(0, 1)], 0);
        let t = sys.add_parameter();
        assert_eq!(t, 2);
        assert_eq!(sys.num_variables(), 3);
        assert_eq!(sys.relations().row(0), [1, 0, 0, 0]);

        sys.push_relation(&[(1, 1), (t, -1), (1, 2)], 4);
        assert_eq!(sys.relations().row(1), [0, 3, -1, 4]);
    }

    #[test]
    fn random_systems() {
        let rng = &mut StdRng::seed_from_u64(0);
        for _ in 0..200 {
            let unknowns = rng.random_range(1..6);
            let relations = rng.random_range(1..=unknowns);
            let solution = (0..unknowns)
                .map(|_| rng.random_range(-9..10))
                .collect::<Vec<_>>();
            let sys = random_system(unknowns, relations, &solution, rng);

            let Some(mut sol) = sys.clone().solve() else {
                panic!("{sys:?} has the solution {solution:?}");
            };
            assert_solves(&sys, &sol, rng);

            sol.triangularize();
            assert_solves(&sys, &sol, rng);
        }
    }

    #[test]
    fn triangularize_echelon_form() {
        let rng = &mut StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let rows = rng.random_range(1..6);
            let cols = rng.random_range(1..5);
            let basis = Matrix::random(rows, cols, -5, 6, rng);
            let offset = (0..rows).map(|_| rng.random_range(-5..6)).collect();
            let mut sol = ParametricSolution::new(offset, basis);
            let before = sol.clone();
            sol.triangularize();

            assert_eq!(sol.pivot_rows().len(), sol.num_params());
            for (l, &row) in sol.pivot_rows().iter().enumerate() {
                assert_ne!(sol.basis()[(row, l)], 0);
                assert!(sol.basis().row(row)[l + 1..].iter().all(|e| *e == 0));
            }

            // Column operations leave the offset alone.
            assert_eq!(sol.offset(), before.offset());
            assert!(sol.num_params() <= before.num_params());
        }
    }

    #[test]
    fn evaluate_large_values() {
        let big = 4_000_000_000_000_000_000;
        let sol = ParametricSolution::new(vec![big, -big], Matrix::from_rows(&[[3, 1], [-1, 2]]));
        assert_eq!(sol.evaluate(0, &[0, 0]), Some(big));
        assert_eq!(sol.evaluate(0, &[2, -1]), Some(big + 5));
        assert_eq!(sol.evaluate(0, &[big, 0]), None);
        assert_eq!(sol.evaluate(1, &[big, -big]), None);
        assert_eq!(sol.evaluate(1, &[-big, big]), Some(-big + big + 2 * big));
        assert_eq!(sol.evaluate_all(&[2, -1]), Some(vec![big + 5, -big - 4]));
        assert_eq!(sol.evaluate_all(&[big, 0]), None);
    }

    #[test]
    fn triangularize_example() {
        // x0 = p0 + 2 p1, x1 = 2 p0 + 4 p1, x2 = p1
        let basis = Matrix::from_rows(&[[1, 2], [2, 4], [0, 1]]);
        let mut sol = ParametricSolution::new(vec![0, 0, 0], basis);
        sol.triangularize();
        assert_eq!(sol.num_params(), 2);
        assert_eq!(sol.pivot_rows(), [2, 0]);
        assert_eq!(sol.basis().row(2), [1, 0]);
        assert_eq!(sol.basis().row(0), [0, 1]);
        assert_eq!(sol.basis().row(1), [0, 2]);

        // Dependent columns collapse into one.
        let basis = Matrix::from_rows(&[[2, 4], [3, 6]]);
        let mut sol = ParametricSolution::new(vec![1, 1], basis);
        sol.triangularize();
        assert_eq!(sol.num_params(), 1);
        assert_eq!(sol.pivot_rows(), [0]);
    }
}
