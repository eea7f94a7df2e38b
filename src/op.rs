//! Matrix operations applied lazily by views.
//!
//! The four view operations form a group under composition:
//! ```text
//!   ∘    | Id   | Conj | Trans | Adj
//! -------|------|------|-------|------
//!   Id   | Id   | Conj | Trans | Adj
//!   Conj | Conj | Id   | Adj   | Trans
//!   Trans| Trans| Adj  | Id    | Conj
//!   Adj  | Adj  | Trans| Conj  | Id
//! ```
//! `Transpose` and `Adjoint` act on the matrix as a whole: they swap the row
//! and column roles of the wrapped matrix.

use cmat_kernel::Transpose as KernelTranspose;
use num_complex::Complex64;

/// Operation a view applies to the matrix it wraps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MatOp {
    /// No transformation.
    #[default]
    Identity,
    /// Element-wise complex conjugate.
    Conj,
    /// Matrix transpose.
    Transpose,
    /// Conjugate transpose.
    Adjoint,
}

impl MatOp {
    /// Compose two operations. The group is abelian, so order does not matter.
    pub fn then(self, other: MatOp) -> MatOp {
        use MatOp::*;
        match (self, other) {
            (Identity, op) | (op, Identity) => op,
            (Conj, Conj) | (Transpose, Transpose) | (Adjoint, Adjoint) => Identity,
            (Conj, Transpose) | (Transpose, Conj) => Adjoint,
            (Conj, Adjoint) | (Adjoint, Conj) => Transpose,
            (Transpose, Adjoint) | (Adjoint, Transpose) => Conj,
        }
    }

    /// Whether rows and columns of the wrapped matrix are swapped.
    #[inline(always)]
    pub fn swaps_dims(self) -> bool {
        matches!(self, MatOp::Transpose | MatOp::Adjoint)
    }

    /// Whether elements are conjugated.
    #[inline(always)]
    pub fn conjugates(self) -> bool {
        matches!(self, MatOp::Conj | MatOp::Adjoint)
    }

    /// Apply the element part of the operation.
    #[inline(always)]
    pub fn apply(self, v: Complex64) -> Complex64 {
        if self.conjugates() {
            v.conj()
        } else {
            v
        }
    }

    /// Dimensions seen through the operation for a `rows x cols` matrix.
    #[inline]
    pub fn apply_dims(self, rows: usize, cols: usize) -> (usize, usize) {
        if self.swaps_dims() {
            (cols, rows)
        } else {
            (rows, cols)
        }
    }

    /// The GEMM flag expressing this operation, if any.
    ///
    /// A pure conjugate has no GEMM flag.
    pub fn gemm_flag(self) -> Option<KernelTranspose> {
        match self {
            MatOp::Identity => Some(KernelTranspose::NoTrans),
            MatOp::Transpose => Some(KernelTranspose::Trans),
            MatOp::Adjoint => Some(KernelTranspose::ConjTrans),
            MatOp::Conj => None,
        }
    }
}
