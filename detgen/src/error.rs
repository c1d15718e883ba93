//! The errors a caller can see.

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// The determinant was requested for a matrix that is not square.
    #[error("not a square matrix ({rows}x{cols})")]
    Shape { rows: usize, cols: usize },

    /// A parameter could not be parsed as an integer.
    #[error("only integers are allowed for {parameter}, got `{value}`")]
    NotAnInteger { parameter: &'static str, value: String },

    /// More positional parameters than the generator takes.
    #[error("expected at most 6 parameters, got {given}")]
    TooManyParameters { given: usize },

    /// A 1x1 matrix can only contain the determinant itself.
    #[error("det_value {det_value} is outside the bounds [{lower_bound}, {upper_bound})")]
    OutOfBounds {
        det_value: i64,
        lower_bound: i64,
        upper_bound: i64,
    },

    /// The range of the entries is too small to guarantee a solution.
    #[error(
        "the bounds [{lower_bound}, {upper_bound}) are too narrowly chosen \
         for a matrix of dimension {dimension}"
    )]
    NarrowBounds {
        dimension: i64,
        lower_bound: i64,
        upper_bound: i64,
    },

    /// The entries or the determinant are so large that the intermediate
    /// values of the search may not fit into 64 bits.
    #[error(
        "a matrix of dimension {dimension} with entries in [{lower_bound}, {upper_bound}) \
         and determinant {det_value} is too large for 64-bit arithmetic"
    )]
    TooLarge {
        dimension: i64,
        det_value: i64,
        lower_bound: i64,
        upper_bound: i64,
    },

    /// The determinant of a matrix does not fit into 64 bits.
    #[error("integer overflow while computing a determinant")]
    Overflow,

    /// Every randomized set of rows had only zero cofactors even though a
    /// non-zero determinant was requested.
    #[error("you were extremely unlucky, try again")]
    UnluckyGeneration,

    /// No matrix was found within the given number of attempts.
    #[error("no matrix found within {attempts} attempts")]
    AttemptsExhausted { attempts: u32 },

    /// The generator produced something that does not satisfy the request.
    /// This is a bug.
    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),
}
