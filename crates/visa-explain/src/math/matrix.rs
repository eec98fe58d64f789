use std::error::Error;
use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::math::vector::Array1;

/// Row-major feature matrix. Rows are samples, columns are features in a
/// fixed order addressed by a 0-based index.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Array2<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T> Array2<T> {
    pub fn from_shape_vec(shape: (usize, usize), data: Vec<T>) -> Result<Self, ShapeError> {
        let (rows, cols) = shape;
        if data.len() != rows * cols {
            return Err(ShapeError {
                rows,
                cols,
                len: data.len(),
            });
        }
        Ok(Self { data, rows, cols })
    }

    /// Build a matrix from a list of rows. All rows must have the same width.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, ShapeError> {
        let nrows = rows.len();
        let ncols = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut data = Vec::with_capacity(nrows * ncols);
        for row in rows {
            if row.len() != ncols {
                return Err(ShapeError {
                    rows: nrows,
                    cols: ncols,
                    len: row.len(),
                });
            }
            data.extend(row);
        }
        Ok(Self {
            data,
            rows: nrows,
            cols: ncols,
        })
    }

    pub fn nrows(&self) -> usize {
        self.rows
    }

    pub fn ncols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    pub fn row_slice(&self, row: usize) -> &[T] {
        let start = self.offset(row, 0);
        &self.data[start..start + self.cols]
    }

    pub fn column(&self, col: usize) -> Array1<T>
    where
        T: Clone,
    {
        assert!(col < self.cols, "column index out of bounds");
        (0..self.rows).map(|row| self[(row, col)].clone()).collect()
    }

    /// Overwrite every row of `col` with `value`.
    pub fn fill_column(&mut self, col: usize, value: T)
    where
        T: Clone,
    {
        assert!(col < self.cols, "column index out of bounds");
        for row in 0..self.rows {
            let offset = self.offset(row, col);
            self.data[offset] = value.clone();
        }
    }

    /// Rewrite `col` in place. The closure receives the full row and
    /// returns the new value for that row's cell.
    pub fn map_column<F>(&mut self, col: usize, mut f: F)
    where
        F: FnMut(&[T]) -> T,
    {
        assert!(col < self.cols, "column index out of bounds");
        for row in 0..self.rows {
            let value = f(self.row_slice(row));
            let offset = self.offset(row, col);
            self.data[offset] = value;
        }
    }

    /// Stack `other` below `self`. Both matrices must have the same width.
    pub fn vstack(&self, other: &Array2<T>) -> Result<Array2<T>, ShapeError>
    where
        T: Clone,
    {
        if self.cols != other.cols {
            return Err(ShapeError {
                rows: self.rows + other.rows,
                cols: self.cols,
                len: self.data.len() + other.data.len(),
            });
        }
        let mut data = Vec::with_capacity(self.data.len() + other.data.len());
        data.extend_from_slice(&self.data);
        data.extend_from_slice(&other.data);
        Ok(Array2 {
            data,
            rows: self.rows + other.rows,
            cols: self.cols,
        })
    }

    pub fn mapv<U, F>(&self, mut f: F) -> Array2<U>
    where
        F: FnMut(&T) -> U,
    {
        Array2 {
            data: self.data.iter().map(|v| f(v)).collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }
}

impl<T> Array2<T>
where
    T: Clone,
{
    pub fn from_elem(shape: (usize, usize), value: T) -> Self {
        let (rows, cols) = shape;
        Array2 {
            data: vec![value; rows * cols],
            rows,
            cols,
        }
    }
}

impl<T> Index<(usize, usize)> for Array2<T> {
    type Output = T;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        let offset = self.offset(index.0, index.1);
        &self.data[offset]
    }
}

impl<T> IndexMut<(usize, usize)> for Array2<T> {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        let offset = self.offset(index.0, index.1);
        &mut self.data[offset]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapeError {
    rows: usize,
    cols: usize,
    len: usize,
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid shape ({}, {}) for buffer of length {}",
            self.rows, self.cols, self.len
        )
    }
}

impl Error for ShapeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_column_sees_whole_row() {
        let mut x = Array2::from_rows(vec![vec![1.0, 10.0], vec![2.0, 20.0]]).unwrap();
        x.map_column(1, |row| row[0] + row[1]);
        assert_eq!(x.column(1).to_vec(), vec![11.0, 22.0]);
        assert_eq!(x.column(0).to_vec(), vec![1.0, 2.0]);
    }

    #[test]
    fn vstack_rejects_width_mismatch() {
        let a = Array2::from_elem((2, 3), 0.0);
        let b = Array2::from_elem((2, 2), 0.0);
        assert!(a.vstack(&b).is_err());

        let c = a.vstack(&Array2::from_elem((1, 3), 1.0)).unwrap();
        assert_eq!(c.shape(), (3, 3));
        assert_eq!(c.row_slice(2), &[1.0, 1.0, 1.0]);
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let err = Array2::from_rows(vec![vec![1, 2], vec![3]]).unwrap_err();
        assert!(err.to_string().contains("invalid shape"));
    }
}
