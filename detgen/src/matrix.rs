//! Dense matrices.
//!
//! The entries are stored in row-major order in a single [`Vec`]. The matrix
//! can grow on demand: rows can be appended or inserted anywhere and zero
//! columns can be inserted, which is what the integer system solver needs
//! when it introduces new parameters.
//!
//! The elementary transformations (swapping rows/columns, negating a row,
//! adding a multiple of a row/column to another one) are exposed as named
//! methods so that the elimination code reads as a sequence of them.

use std::{
    fmt::Debug,
    ops::{Index, IndexMut},
};

use num_traits::{Signed, Zero};
use rand::Rng;

/// A matrix.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    entries: Vec<T>,
}

impl<T> Matrix<T> {
    /// Returns an empty (0x0) matrix.
    pub fn empty() -> Self {
        Self { rows: 0, cols: 0, entries: Vec::new() }
    }

    /// Creates a matrix from an iterator over the entries in row-major order.
    /// Panics if the iterator does not yield exactly `rows * cols` entries.
    pub fn from_iter<I: IntoIterator<Item = T>>(
        rows: usize,
        cols: usize,
        iter: I,
    ) -> Self {
        let entries: Vec<_> = iter.into_iter().collect();
        assert_eq!(
            entries.len(),
            rows * cols,
            "Iterator yielded the wrong number of entries."
        );
        Self { rows, cols, entries }
    }

    /// The number of rows of the matrix.
    pub fn num_rows(&self) -> usize {
        self.rows
    }

    /// The number of columns of the matrix.
    pub fn num_cols(&self) -> usize {
        self.cols
    }

    /// Is the matrix empty, i.e. has it zero rows or columns?
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Returns the row `r`.
    pub fn row(&self, r: usize) -> &[T] {
        assert!(r < self.rows, "Row {r} out of range.");
        &self.entries[r * self.cols..(r + 1) * self.cols]
    }

    /// Returns the row `r` mutably.
    pub fn row_mut(&mut self, r: usize) -> &mut [T] {
        assert!(r < self.rows, "Row {r} out of range.");
        &mut self.entries[r * self.cols..(r + 1) * self.cols]
    }

    /// Returns an iterator over the rows.
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &[T]> + '_ {
        (0..self.rows).map(move |r| self.row(r))
    }

    /// Returns an iterator over the entries of column `c`.
    pub fn col(&self, c: usize) -> impl DoubleEndedIterator<Item = &T> + '_ {
        assert!(c < self.cols, "Column {c} out of range.");
        (0..self.rows).map(move |r| &self.entries[r * self.cols + c])
    }

    /// Swap two rows.
    pub fn swap_rows(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }

        let (i, j) = (i.min(j), i.max(j));
        let (head, tail) = self.entries.split_at_mut(j * self.cols);
        head[i * self.cols..(i + 1) * self.cols]
            .swap_with_slice(&mut tail[..self.cols]);
    }

    /// Swap two columns.
    pub fn swap_columns(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }

        for r in 0..self.rows {
            self.entries.swap(r * self.cols + i, r * self.cols + j);
        }
    }

    /// Removes the row `r` and returns its entries.
    pub fn remove_row(&mut self, r: usize) -> Vec<T> {
        assert!(r < self.rows, "Row {r} out of range.");
        let removed = self.entries
            .drain(r * self.cols..(r + 1) * self.cols)
            .collect();
        self.rows -= 1;
        removed
    }
}

impl<T: Clone> Matrix<T> {
    /// Creates a matrix from a slice of rows.
    /// Panics if the rows have different lengths.
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Self {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut entries = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            let row = row.as_ref();
            assert_eq!(row.len(), cols, "Rows have different lengths.");
            entries.extend_from_slice(row);
        }
        Self { rows: rows.len(), cols, entries }
    }

    /// Appends a row at the bottom. If the matrix has no rows yet, the row
    /// determines the number of columns.
    pub fn push_row(&mut self, row: &[T]) {
        if self.rows == 0 {
            self.cols = row.len();
        }
        assert_eq!(row.len(), self.cols, "Row has the wrong length.");
        self.entries.extend_from_slice(row);
        self.rows += 1;
    }

    /// Returns the matrix without row `r` and column `c`.
    pub fn minor(&self, r: usize, c: usize) -> Self {
        assert!(r < self.rows && c < self.cols);
        let entries = self.rows()
            .enumerate()
            .filter(|(i, _)| *i != r)
            .flat_map(|(_, row)| {
                row.iter()
                    .enumerate()
                    .filter(|(j, _)| *j != c)
                    .map(|(_, e)| e.clone())
            })
            .collect();
        Self { rows: self.rows - 1, cols: self.cols - 1, entries }
    }

    /// Returns the matrix without column `c`.
    pub fn without_col(&self, c: usize) -> Self {
        assert!(c < self.cols, "Column {c} out of range.");
        let entries = self.rows()
            .flat_map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|(j, _)| *j != c)
                    .map(|(_, e)| e.clone())
            })
            .collect();
        Self { rows: self.rows, cols: self.cols - 1, entries }
    }

    /// Stacks the rows of `other` below this matrix.
    pub fn stack(&mut self, other: &Matrix<T>) {
        for row in other.rows() {
            self.push_row(row);
        }
    }

    /// Keeps only the first `cols` columns.
    pub fn truncate_cols(&mut self, cols: usize) {
        if cols >= self.cols {
            return;
        }

        let old = self.cols;
        let mut i = 0;
        self.entries.retain(|_| {
            let keep = i % old < cols;
            i += 1;
            keep
        });
        self.cols = cols;
    }
}

impl<T: Clone + Zero> Matrix<T> {
    /// Returns a matrix of zeros.
    pub fn zero(rows: usize, cols: usize) -> Self {
        Self { rows, cols, entries: vec![T::zero(); rows * cols] }
    }

    /// Inserts a zero row so that it becomes row `r`.
    pub fn insert_zero_row(&mut self, r: usize) {
        assert!(r <= self.rows, "Row {r} out of range.");
        let at = r * self.cols;
        self.entries.splice(
            at..at,
            std::iter::repeat_n(T::zero(), self.cols),
        );
        self.rows += 1;
    }

    /// Inserts a zero column so that it becomes column `c`.
    pub fn insert_zero_col(&mut self, c: usize) {
        assert!(c <= self.cols, "Column {c} out of range.");
        let mut entries = Vec::with_capacity(self.rows * (self.cols + 1));
        for row in self.rows() {
            entries.extend_from_slice(&row[..c]);
            entries.push(T::zero());
            entries.extend_from_slice(&row[c..]);
        }
        self.entries = entries;
        self.cols += 1;
    }
}

impl<T: Copy + Signed> Matrix<T> {
    /// Negates all elements of a row.
    pub fn negate_row(&mut self, row: usize) {
        for e in self.row_mut(row) {
            *e = -*e;
        }
    }

    /// Add a scaled row to another row. N += M * c.
    /// `m` and `n` can not be equal.
    pub fn row_multiply_add(&mut self, n: usize, m: usize, c: T) {
        assert_ne!(m, n);
        assert!(n < self.rows && m < self.rows);
        for i in 0..self.cols {
            let e = self.entries[m * self.cols + i];
            self.entries[n * self.cols + i] = self.entries[n * self.cols + i] + e * c;
        }
    }

    /// Add a scaled column to another column. N += M * c.
    /// `m` and `n` can not be equal.
    pub fn col_multiply_add(&mut self, n: usize, m: usize, c: T) {
        assert_ne!(m, n);
        assert!(n < self.cols && m < self.cols);
        for r in 0..self.rows {
            let e = self.entries[r * self.cols + m];
            self.entries[r * self.cols + n] = self.entries[r * self.cols + n] + e * c;
        }
    }
}

impl Matrix<i64> {
    /// Returns a matrix with entries drawn uniformly from `[lo, hi)`.
    pub fn random<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        lo: i64,
        hi: i64,
        rng: &mut R,
    ) -> Self {
        Self::from_iter(
            rows,
            cols,
            (0..rows * cols).map(|_| rng.random_range(lo..hi)),
        )
    }

    /// Are all entries in `[lo, hi)`?
    pub fn entries_within(&self, lo: i64, hi: i64) -> bool {
        self.entries.iter().all(|e| (lo..hi).contains(e))
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, (r, c): (usize, usize)) -> &Self::Output {
        assert!(r < self.rows && c < self.cols, "Index ({r}, {c}) out of range.");
        &self.entries[r * self.cols + c]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, (r, c): (usize, usize)) -> &mut Self::Output {
        assert!(r < self.rows && c < self.cols, "Index ({r}, {c}) out of range.");
        &mut self.entries[r * self.cols + c]
    }
}

impl<T: Debug> Debug for Matrix<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.rows()).finish()
    }
}
