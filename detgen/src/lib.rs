//! Random integer matrices with a prescribed determinant.
//!
//! The rows `1..n` of the matrix are randomized and the first row is then
//! found by solving the linear Diophantine equation given by the cofactor
//! expansion along it. The solution set of that equation is written as an
//! integer-affine function of a few parameters, the parameters are bounded
//! so that the entries stay in range, and one of the bounded solutions is
//! picked at random.
//!
//! The main entry point is [`generate::generate_matrix`].

pub mod arith;
pub mod bounds;
pub mod det;
pub mod diophantine;
pub mod error;
pub mod generate;
pub mod matrix;
pub mod sampler;
pub mod system;
pub mod tex;

pub use error::Error;
pub use generate::{GeneratorParams, generate, generate_matrix};
pub use matrix::Matrix;
