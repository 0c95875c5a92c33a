use std::ops::{Index, IndexMut};

/// Dense row-major 2D buffer addressed by `(n, m)`.
///
/// Sized once when a calculator prepares its tables and never resized afterwards; out of range
/// accesses panic like slice indexing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grid {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Grid {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Grid {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Build a `rows × cols` grid where `f(n, m)` fills the lower triangle `m ≤ n`.
    pub fn lower_from_fn(rows: usize, cols: usize, f: impl Fn(usize, usize) -> f64) -> Self {
        let mut grid = Grid::zeros(rows, cols);
        for n in 0..rows {
            for m in 0..cols.min(n + 1) {
                grid[(n, m)] = f(n, m);
            }
        }
        grid
    }
}

impl Index<(usize, usize)> for Grid {
    type Output = f64;

    #[inline]
    fn index(&self, (n, m): (usize, usize)) -> &f64 {
        debug_assert!(n < self.rows && m < self.cols);
        &self.data[n * self.cols + m]
    }
}

impl IndexMut<(usize, usize)> for Grid {
    #[inline]
    fn index_mut(&mut self, (n, m): (usize, usize)) -> &mut f64 {
        debug_assert!(n < self.rows && m < self.cols);
        &mut self.data[n * self.cols + m]
    }
}
