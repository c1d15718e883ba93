//! The matrix generator.
//!
//! Rows `1..n` are random. Expanding the determinant along row 0 gives
//! `det = sum(a_j * c_j)` where the `c_j` are the cofactors of row 0, so the
//! first row is a solution of a linear Diophantine equation with entries in
//! the bounds. Any such solution works and one of them is chosen at random.
//!
//! Always solving for row 0 would make that row look different from the
//! others, so the solved row is swapped into a random position afterwards,
//! which is compensated for by solving for `-det` in that case.

use rand::Rng;
use tracing::{debug, instrument, trace};

use crate::bounds::propagate;
use crate::det::first_row_cofactors;
use crate::diophantine::reduce;
use crate::error::Error;
use crate::matrix::Matrix;
use crate::sampler::sample;

const DEFAULT_ATTEMPTS: i64 = 200;

/// How often new random rows are drawn when all cofactors are zero.
const ZERO_COFACTOR_RETRIES: usize = 10;

/// Largest allowed Hadamard bound and determinant, `2^53`. This leaves 10
/// bits of `i64` for the products and sums of the search.
const MAX_MAGNITUDE: f64 = 9_007_199_254_740_992.0;

/// The parameters of the generator, in the order the command line takes them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorParams {
    /// The matrix is `dimension x dimension`. Non-positive values result
    /// in the empty matrix.
    pub dimension: i64,

    /// The determinant of the matrix.
    pub det_value: i64,

    /// All entries are at least `lower_bound`.
    pub lower_bound: i64,

    /// All entries are less than `upper_bound`.
    pub upper_bound: i64,

    /// The number of parameters of the solution set that are fixed randomly
    /// instead of being enumerated. This speeds up large dimensions at the
    /// cost of less random results. Negative values count as 0.
    pub randomized_params: i64,

    /// How often new rows are tried before giving up. Non-positive values
    /// count as the default.
    pub attempts: i64,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            dimension: 2,
            det_value: 1,
            lower_bound: -9,
            upper_bound: 10,
            randomized_params: 0,
            attempts: DEFAULT_ATTEMPTS,
        }
    }
}

impl GeneratorParams {
    pub fn with_dimension(mut self, dimension: i64) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn with_det_value(mut self, det_value: i64) -> Self {
        self.det_value = det_value;
        self
    }

    pub fn with_bounds(mut self, lower_bound: i64, upper_bound: i64) -> Self {
        self.lower_bound = lower_bound;
        self.upper_bound = upper_bound;
        self
    }

    pub fn with_randomized_params(mut self, randomized_params: i64) -> Self {
        self.randomized_params = randomized_params;
        self
    }

    pub fn with_attempts(mut self, attempts: i64) -> Self {
        self.attempts = attempts;
        self
    }

    /// Parses the positional parameters
    /// `[dimension, det_value, lower_bound, upper_bound, rdn_prm, attempts]`.
    /// Missing ones keep their default.
    ///
    /// The first four have to be integers. Invalid values for the last two
    /// are replaced by their defaults.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self, Error> {
        if args.len() > 6 {
            return Err(Error::TooManyParameters { given: args.len() });
        }

        let mut params = Self::default();
        for (i, arg) in args.iter().enumerate() {
            let arg = arg.as_ref().trim();
            match i {
                0 => params.dimension = parse_int("dimension", arg)?,
                1 => params.det_value = parse_int("det_value", arg)?,
                2 => params.lower_bound = parse_int("lower_bound", arg)?,
                3 => params.upper_bound = parse_int("upper_bound", arg)?,
                4 => params.randomized_params = arg.parse().unwrap_or(0),
                _ => params.attempts = arg.parse().unwrap_or(DEFAULT_ATTEMPTS),
            }
        }

        Ok(params)
    }

    /// Checks the parameters. This never depends on randomness.
    fn plan(&self) -> Result<Plan, Error> {
        let &Self {
            dimension,
            det_value,
            lower_bound,
            upper_bound,
            randomized_params,
            attempts,
        } = self;

        if dimension <= 0 {
            return Ok(Plan::Empty);
        }

        if dimension == 1 {
            return if (lower_bound..upper_bound).contains(&det_value) {
                Ok(Plan::Single(det_value))
            } else {
                Err(Error::OutOfBounds { det_value, lower_bound, upper_bound })
            };
        }

        // Small matrices with two consecutive values as entries do not
        // always have a solution, unless -1, 0 and 1 are all allowed.
        let width = i128::from(upper_bound) - i128::from(lower_bound);
        let narrow = width < 2
            || (dimension <= 3 && width < 3 && !(lower_bound <= -1 && upper_bound >= 1));
        if narrow {
            return Err(Error::NarrowBounds { dimension, lower_bound, upper_bound });
        }

        // Hadamard's bound limits the determinant and every cofactor.
        let entry = (lower_bound as f64).abs().max((upper_bound as f64 - 1.0).abs());
        let n = dimension as f64;
        let hadamard = (n * entry * entry).powf(n / 2.0);
        if hadamard > MAX_MAGNITUDE || (det_value as f64).abs() > MAX_MAGNITUDE {
            debug!(hadamard, "entries too large");
            return Err(Error::TooLarge { dimension, det_value, lower_bound, upper_bound });
        }

        let attempts = if attempts > 0 { attempts } else { DEFAULT_ATTEMPTS };
        Ok(Plan::Search {
            dimension: dimension as usize,
            randomized: randomized_params.max(0) as usize,
            attempts: u32::try_from(attempts).unwrap_or(u32::MAX),
        })
    }
}

fn parse_int(parameter: &'static str, value: &str) -> Result<i64, Error> {
    value.parse().map_err(|_| Error::NotAnInteger {
        parameter,
        value: value.to_owned(),
    })
}

enum Plan {
    Empty,
    Single(i64),
    Search {
        dimension: usize,
        randomized: usize,
        attempts: u32,
    },
}

/// Generates a random matrix with the given determinant and all entries in
/// `[lower_bound, upper_bound)`.
#[instrument(level = "debug", skip(rng))]
pub fn generate_matrix<R: Rng + ?Sized>(
    params: &GeneratorParams,
    rng: &mut R,
) -> Result<Matrix<i64>, Error> {
    let (n, randomized, attempts) = match params.plan()? {
        Plan::Empty => return Ok(Matrix::empty()),
        Plan::Single(det) => return Ok(Matrix::from_rows(&[[det]])),
        Plan::Search { dimension, randomized, attempts } => {
            (dimension, randomized, attempts)
        },
    };

    let lower = params.lower_bound;
    let upper = params.upper_bound;

    // Swapping the solved row into place negates the determinant.
    let solved_row = rng.random_range(0..n);
    let target = if solved_row == 0 { params.det_value } else { -params.det_value };

    for attempt in 1..=attempts {
        let (rest, cofactors) = random_rows(n, lower, upper, target, rng)?;

        let Some(first) = solve_first_row(&cofactors, target, lower, upper, randomized, rng)? else {
            debug!(attempt, "no first row for these rows");
            continue;
        };

        let det: i128 = first.iter()
            .zip(&cofactors)
            .map(|(&a, &c)| i128::from(a) * i128::from(c))
            .sum();
        if det != i128::from(target) {
            return Err(Error::InvariantViolation(format!(
                "first row {first:?} gives determinant {det} instead of {target}"
            )));
        }
        if !first.iter().all(|e| (lower..upper).contains(e)) {
            return Err(Error::InvariantViolation(format!(
                "first row {first:?} is not within [{lower}, {upper})"
            )));
        }

        let mut m = Matrix::from_rows(&[first.as_slice()]);
        m.stack(&rest);
        m.swap_rows(0, solved_row);

        debug!(attempt, solved_row, "found matrix");
        return Ok(m);
    }

    Err(Error::AttemptsExhausted { attempts })
}

/// [`generate_matrix`] with the thread-local random number generator.
pub fn generate(params: &GeneratorParams) -> Result<Matrix<i64>, Error> {
    generate_matrix(params, &mut rand::rng())
}

/// Random rows `1..n` and the cofactors of row 0. If the target is not zero
/// then some cofactor has to be non-zero.
fn random_rows<R: Rng + ?Sized>(
    n: usize,
    lower: i64,
    upper: i64,
    target: i64,
    rng: &mut R,
) -> Result<(Matrix<i64>, Vec<i64>), Error> {
    for _ in 0..ZERO_COFACTOR_RETRIES {
        let rest = Matrix::random(n - 1, n, lower, upper, rng);
        let cofactors = first_row_cofactors(&rest)?;
        if target == 0 || cofactors.iter().any(|c| *c != 0) {
            trace!(?cofactors);
            return Ok((rest, cofactors));
        }
    }

    Err(Error::UnluckyGeneration)
}

/// Finds a row `a` with `sum(a_j * c_j) == target` and entries in
/// `[lower, upper)`, or `None` if there is no such row.
fn solve_first_row<R: Rng + ?Sized>(
    cofactors: &[i64],
    target: i64,
    lower: i64,
    upper: i64,
    randomized: usize,
    rng: &mut R,
) -> Result<Option<Vec<i64>>, Error> {
    let support = (0..cofactors.len())
        .filter(|&j| cofactors[j] != 0)
        .collect::<Vec<_>>();
    let coefficients = support.iter().map(|&j| cofactors[j]).collect::<Vec<_>>();

    let values = match coefficients.as_slice() {
        [] => {
            if target != 0 {
                return Ok(None);
            }
            Vec::new()
        }

        &[c] => {
            if target % c != 0 {
                return Ok(None);
            }
            let a = target / c;
            if !(lower..upper).contains(&a) {
                return Ok(None);
            }
            vec![a]
        }

        _ => {
            let Some(system) = reduce(&coefficients, target) else {
                return Ok(None);
            };

            // The reduced equation is solvable, so this can't fail.
            let Some(mut sol) = system.solve() else {
                return Err(Error::InvariantViolation(format!(
                    "no solution for {coefficients:?} = {target} after reduction"
                )));
            };

            sol.triangularize();
            let Some(bounds) = propagate(&sol, lower, upper) else {
                return Ok(None);
            };

            let pool = sample(&sol, &bounds, randomized, lower, upper, rng);
            trace!(solutions = pool.len());
            let Some(choice) = pool.choose(rng) else {
                return Ok(None);
            };
            choice.to_vec()
        }
    };

    // Entries with a zero cofactor don't matter for the determinant.
    let mut row = cofactors.iter()
        .map(|&c| if c == 0 { rng.random_range(lower..upper) } else { 0 })
        .collect::<Vec<_>>();
    for (&j, a) in support.iter().zip(values) {
        row[j] = a;
    }

    Ok(Some(row))
}
