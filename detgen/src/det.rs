//! Exact determinants of integer matrices by cofactor expansion.
//!
//! The matrices we deal with are small but may contain many zeros (in
//! particular the minors of partially randomized matrices), so the expansion
//! always happens along the line with the fewest non-zero entries and zero
//! entries are skipped entirely. Without this the recursion is factorial in
//! the dimension for every single term.

use crate::error::Error;
use crate::matrix::Matrix;

/// Computes the determinant of a square integer matrix.
///
/// The determinant of the empty matrix is 1. Fails with [`Error::Overflow`]
/// if the determinant or one of the minors along the way does not fit.
pub fn determinant(m: &Matrix<i64>) -> Result<i64, Error> {
    if !m.is_square() {
        return Err(Error::Shape { rows: m.num_rows(), cols: m.num_cols() });
    }

    if m.num_rows() == 0 {
        return Ok(1);
    }

    det_impl(m).ok_or(Error::Overflow)
}

/// Which line of the matrix to expand along.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Line {
    Row(usize),
    Col(usize),
}

/// Finds the sparsest line. Rows are scanned first and a column only
/// replaces the current choice if it has strictly fewer non-zero entries.
/// Also returns the number of non-zero entries in that line.
fn sparsest_line(m: &Matrix<i64>) -> (Line, usize) {
    let mut best = (Line::Row(0), usize::MAX);

    for (i, row) in m.rows().enumerate() {
        let count = row.iter().filter(|e| **e != 0).count();
        if count < best.1 {
            best = (Line::Row(i), count);
        }
    }

    for j in 0..m.num_cols() {
        let count = m.col(j).filter(|e| **e != 0).count();
        if count < best.1 {
            best = (Line::Col(j), count);
        }
    }

    best
}

/// `None` on overflow.
fn det_impl(m: &Matrix<i64>) -> Option<i64> {
    let n = m.num_rows();
    if n == 1 {
        return Some(m[(0, 0)]);
    }

    let (line, count) = sparsest_line(m);
    if count == 0 {
        return Some(0);
    }

    let mut det: i64 = 0;
    for k in 0..n {
        let (i, j) = match line {
            Line::Row(i) => (i, k),
            Line::Col(j) => (k, j),
        };

        let e = m[(i, j)];
        if e == 0 {
            continue;
        }

        let term = det_impl(&m.minor(i, j))?.checked_mul(e)?;
        det = if (i + j) % 2 == 0 {
            det.checked_add(term)?
        } else {
            det.checked_sub(term)?
        };
    }

    Some(det)
}

/// Computes the cofactors of the (missing) first row of a matrix whose other
/// rows are the rows of `rest`, which must have one column more than rows.
///
/// The determinant of the full matrix with first row `a` is then the dot
/// product of `a` and the returned vector.
pub fn first_row_cofactors(rest: &Matrix<i64>) -> Result<Vec<i64>, Error> {
    assert_eq!(
        rest.num_rows() + 1,
        rest.num_cols(),
        "Expected one more column than rows."
    );

    (0..rest.num_cols())
        .map(|j| {
            let minor = rest.without_col(j);
            let det = if minor.num_rows() == 0 { Some(1) } else { det_impl(&minor) };
            let det = det.ok_or(Error::Overflow)?;
            if j % 2 == 0 { Ok(det) } else { det.checked_neg().ok_or(Error::Overflow) }
        })
        .collect()
}
