//! Raw strided descriptors over shared complex buffers.

use crate::{KernelError, Result};
use num_complex::Complex64;
use std::cell::Cell;

/// Number of buffer elements touched by a row-major `rows x cols` block with
/// the given row stride.
#[inline]
pub(crate) fn footprint(rows: usize, cols: usize, stride: usize) -> usize {
    if rows == 0 || cols == 0 {
        0
    } else {
        (rows - 1) * stride + cols
    }
}

/// A row-major general matrix.
///
/// Element `(r, c)` lives at `data[r * stride + c]`. `data` starts at element
/// `(0, 0)`; it may extend past the last element.
#[derive(Debug, Clone, Copy)]
pub struct General<'a> {
    pub rows: usize,
    pub cols: usize,
    pub stride: usize,
    pub data: &'a [Cell<Complex64>],
}

impl<'a> General<'a> {
    /// Create a descriptor, checking that `stride >= max(1, cols)` and that
    /// `data` covers every addressed element.
    pub fn new(
        rows: usize,
        cols: usize,
        stride: usize,
        data: &'a [Cell<Complex64>],
    ) -> Result<Self> {
        if stride < cols.max(1) {
            return Err(KernelError::InvalidStride {
                stride,
                extent: cols,
            });
        }
        let needed = footprint(rows, cols, stride);
        if data.len() < needed {
            return Err(KernelError::ShortBuffer {
                needed,
                len: data.len(),
            });
        }
        Ok(Self {
            rows,
            cols,
            stride,
            data,
        })
    }

    #[inline]
    pub fn get(&self, r: usize, c: usize) -> Complex64 {
        self.data[r * self.stride + c].get()
    }

    #[inline]
    pub fn set(&self, r: usize, c: usize, v: Complex64) {
        self.data[r * self.stride + c].set(v);
    }

    /// Number of buffer elements the descriptor addresses.
    #[inline]
    pub fn footprint(&self) -> usize {
        footprint(self.rows, self.cols, self.stride)
    }
}

/// A strided vector: element `i` lives at `data[i * inc]`.
#[derive(Debug, Clone, Copy)]
pub struct Vector<'a> {
    pub n: usize,
    pub inc: usize,
    pub data: &'a [Cell<Complex64>],
}

impl<'a> Vector<'a> {
    /// Create a descriptor. A zero increment is only valid for an empty vector.
    pub fn new(n: usize, inc: usize, data: &'a [Cell<Complex64>]) -> Result<Self> {
        if n > 0 && inc == 0 {
            return Err(KernelError::InvalidStride {
                stride: inc,
                extent: n,
            });
        }
        let needed = footprint(n, 1, inc);
        if data.len() < needed {
            return Err(KernelError::ShortBuffer {
                needed,
                len: data.len(),
            });
        }
        Ok(Self { n, inc, data })
    }

    #[inline]
    pub fn get(&self, i: usize) -> Complex64 {
        self.data[i * self.inc].get()
    }

    #[inline]
    pub fn set(&self, i: usize, v: Complex64) {
        self.data[i * self.inc].set(v);
    }

    #[inline]
    pub fn footprint(&self) -> usize {
        footprint(self.n, 1, self.inc)
    }
}

/// A band matrix with `kl` sub-diagonals and `ku` super-diagonals.
///
/// Row `r` of the band is stored at `data[r * stride ..]`, with the diagonal
/// element at column offset `kl`.
#[derive(Debug, Clone, Copy)]
pub struct Band<'a> {
    pub rows: usize,
    pub cols: usize,
    pub kl: usize,
    pub ku: usize,
    pub stride: usize,
    pub data: &'a [Cell<Complex64>],
}

impl Band<'_> {
    /// Element `(r, c)` of the full matrix; zero outside the band.
    pub fn at(&self, r: usize, c: usize) -> Complex64 {
        assert!(r < self.rows && c < self.cols, "index out of bounds");
        if c + self.kl < r || c > r + self.ku {
            return Complex64::new(0.0, 0.0);
        }
        self.data[r * self.stride + self.kl + c - r].get()
    }
}

/// CBLAS interop: view cells as a plain slice.
///
/// # Safety
/// No other handle may write to the first `len` cells while the slice lives.
#[cfg(feature = "blas")]
pub(crate) unsafe fn raw_slice(cells: &[Cell<Complex64>], len: usize) -> &[Complex64] {
    std::slice::from_raw_parts(cells.as_ptr() as *const Complex64, len)
}

/// CBLAS interop: view cells as a mutable plain slice.
///
/// # Safety
/// No other handle may read or write the first `len` cells while the slice lives.
#[cfg(feature = "blas")]
#[allow(clippy::mut_from_ref)]
pub(crate) unsafe fn raw_slice_mut(cells: &[Cell<Complex64>], len: usize) -> &mut [Complex64] {
    std::slice::from_raw_parts_mut(cells.as_ptr() as *mut Complex64, len)
}

/// Whether the first `x_len` cells of `x` and the first `y_len` cells of `y`
/// share any address.
#[cfg(feature = "blas")]
pub(crate) fn spans_intersect(
    x: &[Cell<Complex64>],
    x_len: usize,
    y: &[Cell<Complex64>],
    y_len: usize,
) -> bool {
    if x_len == 0 || y_len == 0 {
        return false;
    }
    let (x0, y0) = (x.as_ptr(), y.as_ptr());
    let (x1, y1) = (x0.wrapping_add(x_len), y0.wrapping_add(y_len));
    x0 < y1 && y0 < x1
}

/// Convert a dimension to the CBLAS index type.
#[cfg(feature = "blas")]
pub(crate) fn blas_int(n: usize) -> Result<i32> {
    i32::try_from(n).map_err(|_| KernelError::IndexOverflow(n))
}
