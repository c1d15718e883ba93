//! Generates LaTeX code for matrices.
//!
//! The default output is just the body of a matrix, e.g.
//! ```text
//! 4 & -3 \\
//! 5 & 2
//! ```
//! which can be pasted into a `pmatrix` or `array` environment.

use std::fmt::{self, Display};

use itertools::Itertools as _;

use crate::matrix::Matrix;

/// How the entries of a matrix are joined.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatrixFormat {
    /// Put between the entries of a row.
    pub column_separator: String,

    /// Put between the rows.
    pub row_separator: String,

    /// Whether the last row is followed by the row separator as well.
    pub trailing_separator: bool,

    /// Wrap the body in `\begin{..}` and `\end{..}` of this environment.
    pub environment: Option<String>,
}

impl Default for MatrixFormat {
    fn default() -> Self {
        Self {
            column_separator: " & ".to_owned(),
            row_separator: " \\\\\n".to_owned(),
            trailing_separator: false,
            environment: None,
        }
    }
}

impl MatrixFormat {
    pub fn with_column_separator(mut self, sep: impl Into<String>) -> Self {
        self.column_separator = sep.into();
        self
    }

    pub fn with_row_separator(mut self, sep: impl Into<String>) -> Self {
        self.row_separator = sep.into();
        self
    }

    pub fn with_trailing_separator(mut self, trailing: bool) -> Self {
        self.trailing_separator = trailing;
        self
    }

    pub fn with_environment(mut self, env: impl Into<String>) -> Self {
        self.environment = Some(env.into());
        self
    }
}

impl<T: Display> Matrix<T> {
    pub fn to_tex(&self) -> TexMatrix<'_, T> {
        self.to_tex_with(&DEFAULT_FORMAT)
    }

    pub fn to_tex_with<'a>(&'a self, format: &'a MatrixFormat) -> TexMatrix<'a, T> {
        TexMatrix { matrix: self, format }
    }
}

lazy_static::lazy_static! {
    static ref DEFAULT_FORMAT: MatrixFormat = MatrixFormat::default();
}

pub struct TexMatrix<'a, T> {
    matrix: &'a Matrix<T>,
    format: &'a MatrixFormat,
}

impl<T: Display> Display for TexMatrix<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let format = self.format;
        if let Some(env) = &format.environment {
            writeln!(f, "\\begin{{{env}}}")?;
        }

        let rows = self.matrix.num_rows();
        for (i, row) in self.matrix.rows().enumerate() {
            write!(f, "{}", row.iter().join(&format.column_separator))?;
            if i + 1 < rows || format.trailing_separator {
                f.write_str(&format.row_separator)?;
            }
        }

        if let Some(env) = &format.environment {
            write!(f, "\n\\end{{{env}}}")?;
        }

        Ok(())
    }
}
