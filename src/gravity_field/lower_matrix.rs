//! Lower-triangular storage for degree/order indexed coefficients.
//!
//! Row `n` holds the entries `(n, 0) ..= (n, n)` and rows are laid out back to back in a
//! single contiguous buffer, so `(n, m)` maps to `n(n+1)/2 + m`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LowerMatrix {
    dim: usize,
    data: Vec<f64>,
}

impl LowerMatrix {
    /// Create a zero-filled triangle holding rows `0..dim`.
    pub fn zeros(dim: usize) -> Self {
        LowerMatrix {
            dim,
            data: vec![0.0; dim * (dim + 1) / 2],
        }
    }

    /// Number of rows (maximum degree + 1).
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    fn offset(n: usize, m: usize) -> usize {
        n * (n + 1) / 2 + m
    }

    /// Checked read, `None` for indices outside the triangle.
    #[inline]
    pub fn get(&self, n: usize, m: usize) -> Option<f64> {
        if n < self.dim && m <= n {
            Some(self.data[Self::offset(n, m)])
        } else {
            None
        }
    }

    /// Iterate over `(n, m, value)` in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (0..self.dim).flat_map(move |n| (0..=n).map(move |m| (n, m, self[(n, m)])))
    }
}

impl Index<(usize, usize)> for LowerMatrix {
    type Output = f64;

    #[inline]
    fn index(&self, (n, m): (usize, usize)) -> &f64 {
        debug_assert!(m <= n && n < self.dim, "({n}, {m}) outside triangle");
        &self.data[Self::offset(n, m)]
    }
}

impl IndexMut<(usize, usize)> for LowerMatrix {
    #[inline]
    fn index_mut(&mut self, (n, m): (usize, usize)) -> &mut f64 {
        debug_assert!(m <= n && n < self.dim, "({n}, {m}) outside triangle");
        &mut self.data[Self::offset(n, m)]
    }
}
