//! The capability interface shared by every matrix-like value.

use crate::dense::CDense;
use crate::diagonal::DiagCDense;
use crate::op::MatOp;
use crate::view::{untranspose, MatView};
use crate::{CMatError, Result};
use num_complex::Complex64;

/// Raw storage capability of a matrix.
///
/// Operations query this to pick a fast path; anything reporting
/// [`Storage::Opaque`] is handled through [`CMatrix::at`] alone.
#[derive(Debug, Clone, Copy)]
pub enum Storage<'a> {
    Dense(&'a CDense),
    Diagonal(&'a DiagCDense),
    Opaque,
}

/// Allocation state of a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixState {
    /// No storage; the matrix adopts the shape of the next operation result.
    Unallocated,
    /// Fixed shape with a zero dimension. Not resizable.
    ZeroSized,
    /// Fixed shape with positive dimensions.
    Populated,
}

/// A complex matrix readable element by element.
pub trait CMatrix {
    /// Returns `(rows, cols)`.
    fn dims(&self) -> (usize, usize);

    /// Element at row `r`, column `c`.
    ///
    /// # Panics
    /// Panics if the index is out of bounds.
    fn at(&self, r: usize, c: usize) -> Complex64;

    fn storage(&self) -> Storage<'_> {
        Storage::Opaque
    }

    /// For wrapper views: the applied operation and the wrapped matrix.
    fn view_parts(&self) -> Option<(MatOp, &dyn CMatrix)> {
        None
    }

    /// Transpose view. No data is copied.
    fn t(&self) -> MatView<'_>
    where
        Self: Sized,
    {
        MatView::new(self, MatOp::Transpose)
    }

    /// Conjugate transpose view. No data is copied.
    fn h(&self) -> MatView<'_>
    where
        Self: Sized,
    {
        MatView::new(self, MatOp::Adjoint)
    }
}

/// A complex matrix whose elements can be set.
pub trait CMatrixMut: CMatrix {
    /// # Panics
    /// Panics if the index is out of bounds.
    fn set(&mut self, r: usize, c: usize, v: Complex64);
}

/// Dimensions of an operand, rejecting dense or diagonal storage that has been
/// reset.
pub(crate) fn checked_dims(m: &dyn CMatrix) -> Result<(usize, usize)> {
    let (inner, _) = untranspose(m);
    let unallocated = match inner.storage() {
        Storage::Dense(d) => d.is_empty(),
        Storage::Diagonal(d) => d.is_empty(),
        Storage::Opaque => false,
    };
    if unallocated {
        return Err(CMatError::ZeroLength);
    }
    Ok(m.dims())
}
