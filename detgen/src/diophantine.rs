//! Reduction of a single linear Diophantine equation
//! `c_0 u_0 + ... + c_{k-1} u_{k-1} = value`.
//!
//! The coefficients are shrunk Euclid-style by substitution: if `c_i` has the
//! largest and `c_j` the second largest absolute value and
//! `c_i = q c_j + r` (balanced), then
//! `c_i u_i + c_j u_j = r u_i + c_j (u_j + q u_i)`,
//! so introducing the parameter `t = u_j + q u_i` replaces `c_i` by `r`.
//! This repeats until at most two non-zero coefficients remain, at most one
//! of which is larger than 1 in absolute value.

use std::cmp::Reverse;

use itertools::Itertools as _;
use tracing::trace;

use crate::arith::{balanced_divmod, gcd};
use crate::system::AugmentedSystem;

/// Reduces the equation and returns the system of all substitutions made
/// together with the reduced equation, divided by its GCD. The system has
/// the `k` original unknowns in its first columns.
///
/// Returns `None` if the GCD of the coefficients does not divide the value,
/// in which case there are no integer solutions.
pub fn reduce(coefficients: &[i64], value: i64) -> Option<AugmentedSystem> {
    let k = coefficients.len();
    let mut system = AugmentedSystem::new(k);
    let mut coeffs = coefficients.to_vec();

    // The variable (column in `system`) that each coefficient belongs to.
    let mut vars = (0..k).collect::<Vec<_>>();

    while !is_reduced(&coeffs) {
        let order = (0..k)
            .sorted_by_key(|&s| Reverse(coeffs[s].abs()))
            .collect::<Vec<_>>();
        let (i, j) = (order[0], order[1]);

        let (q, r) = balanced_divmod(coeffs[i], coeffs[j]);
        let t = system.add_parameter();
        trace!("{} = {q} * {} + {r}, x{t} = x{} + {q} x{}", coeffs[i], coeffs[j], vars[j], vars[i]);

        // t = u_j + q u_i
        system.push_relation(&[(vars[j], 1), (vars[i], q), (t, -1)], 0);
        coeffs[i] = r;
        vars[j] = t;
    }

    let g = gcd(&coeffs);
    if g == 0 {
        return (value == 0).then_some(system);
    }
    if value % g != 0 {
        return None;
    }

    let terms = vars.iter()
        .zip(&coeffs)
        .filter(|(_, c)| **c != 0)
        .map(|(&v, &c)| (v, c / g))
        .collect::<Vec<_>>();
    system.push_relation(&terms, -value / g);

    Some(system)
}

/// At most two non-zero coefficients, at most one of which is not a unit.
fn is_reduced(coeffs: &[i64]) -> bool {
    let non_zero = coeffs.iter().filter(|c| **c != 0).count();
    let non_unit = coeffs.iter().filter(|c| c.abs() > 1).count();
    non_zero <= 2 && non_unit <= 1
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;
    use rand::{Rng as _, SeedableRng as _, rngs::StdRng};

    use super::*;

    /// Every point of the solved system solves the equation.
    fn check(coefficients: &[i64], value: i64, rng: &mut StdRng) {
        let system = reduce(coefficients, value)
            .unwrap_or_else(|| panic!("{coefficients:?} = {value} is solvable"));
        let sol = system.solve()
            .unwrap_or_else(|| panic!("{coefficients:?} = {value} is solvable"));

        for _ in 0..10 {
            let params = (0..sol.num_params())
                .map(|_| rng.random_range(-10..11))
                .collect::<Vec<_>>();
            let x = sol.evaluate_all(&params).unwrap();
            let lhs: i64 = coefficients.iter().zip(&x).map(|(c, x)| c * x).sum();
            assert_eq!(lhs, value, "{coefficients:?} * {x:?}");
        }
    }

    #[test]
    fn example() {
        // 8 = 1 * 7 + 1, t3 = u1 + u2, and so on.
        let system = reduce(&[5, 7, 8], 1).unwrap();
        assert_eq!(system.num_unknowns(), 3);
        assert!(system.num_variables() > 3);

        // The final relation only involves units and the value.
        let last = system.relations().rows().last().unwrap();
        let (constant, coeffs) = last.split_last().unwrap();
        assert_eq!(*constant, -1);
        assert!(coeffs.iter().all(|c| c.abs() <= 1));

        check(&[5, 7, 8], 1, &mut StdRng::seed_from_u64(0));
    }

    #[test]
    fn already_reduced() {
        let system = reduce(&[1, -1], 3).unwrap();
        assert_eq!(system.num_variables(), 2);
        assert_eq!(system.relations().num_rows(), 1);
        assert_eq!(system.relations().row(0), [1, -1, -3]);

        let system = reduce(&[6, 1], 3).unwrap();
        assert_eq!(system.relations().row(0), [6, 1, -3]);
    }

    #[test]
    fn normalizes_by_gcd() {
        let system = reduce(&[4, 6], 10).unwrap();
        let last = system.relations().rows().last().unwrap();
        assert_eq!(gcd(last), 1);
        check(&[4, 6], 10, &mut StdRng::seed_from_u64(0));
    }

    #[test]
    fn unsolvable() {
        assert_eq!(reduce(&[4, 6], 3), None);
        assert_eq!(reduce(&[-9, 12, 15], 1), None);
        assert_eq!(reduce(&[2], 1), None);
    }

    #[test]
    fn degenerate() {
        assert!(reduce(&[], 0).is_some());
        assert_eq!(reduce(&[], 1), None);
        check(&[3], -6, &mut StdRng::seed_from_u64(0));
    }

    #[test]
    fn random_equations() {
        let rng = &mut StdRng::seed_from_u64(0);
        for _ in 0..300 {
            let k = rng.random_range(1..7);
            let coefficients = (0..k)
                .map(|_| loop {
                    let c = rng.random_range(-5000..5000);
                    if c != 0 {
                        break c;
                    }
                })
                .collect::<Vec<_>>();
            let value = gcd(&coefficients) * rng.random_range(-5..6);
            check(&coefficients, value, rng);
        }
    }

    proptest! {
        #[test]
        fn solvable_iff_gcd_divides(
            coefficients in prop::collection::vec(
                prop_oneof![-200i64..-1, 1i64..200], 1..5),
            value in -50i64..50,
        ) {
            let g = gcd(&coefficients);
            prop_assert_eq!(reduce(&coefficients, value).is_some(), value % g == 0);
        }
    }
}
