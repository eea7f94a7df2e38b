//! Complex dense and diagonal matrices with alias-aware arithmetic.
//!
//! # Core Types
//!
//! - [`CDense`]: row-major, strided dense matrix of `Complex64`
//! - [`DiagCDense`]: diagonal matrix stored as a single strided vector
//! - [`MatView`] / [`MatViewMut`]: zero-copy transposed, conjugated and
//!   conjugate-transposed views
//! - [`CMatrix`] / [`CMatrixMut`]: the capability traits every matrix implements
//!
//! # Operations
//!
//! - [`CDense::add`], [`CDense::sub`]: element-wise arithmetic
//! - [`CDense::mul`]: matrix product, dispatched to the GEMM kernel when both
//!   operands are dense
//! - [`CDense::scale`]: scalar multiple
//! - [`DiagCDense::diag_from`]: diagonal extraction
//!
//! An empty ([`CDense::empty`]) receiver adopts the shape of the result. A
//! receiver with a shape must match the result exactly.
//!
//! # Aliasing
//!
//! Storage is shared between handles: [`CDense::share`], [`CDense::slice`] and
//! [`CDense::diag_view`] return matrices backed by the same buffer. Any
//! operation may be given a destination that aliases its operands; the
//! [`overlap::resolve`] step decides between writing in place and computing
//! into an isolated workspace.
//!
//! ```rust
//! use cmat_rs::{CDense, CMatrix};
//! use num_complex::Complex64;
//!
//! let mut a = CDense::new(2, 2, Some(vec![Complex64::new(0.0, 1.0); 4])).unwrap();
//! let alias = a.share();
//! a.scale(Complex64::new(0.0, 1.0), &alias).unwrap();
//! assert_eq!(a.at(1, 0), Complex64::new(-1.0, 0.0));
//! ```
//!
//! Matrices are single-threaded values (`!Send`, `!Sync`). Callers that need
//! to share them across threads must provide their own synchronization.

mod arith;
mod dense;
mod diagonal;
mod matrix;
mod op;
pub mod overlap;
pub mod view;

pub use dense::CDense;
pub use diagonal::DiagCDense;
pub use matrix::{CMatrix, CMatrixMut, MatrixState, Storage};
pub use op::MatOp;
pub use overlap::{Access, Resolution};
pub use view::{untranspose, MatView, MatViewMut};

pub use cmat_kernel::{Band, General, KernelError, Vector};
pub use num_complex::Complex64;

/// Errors that can occur during matrix construction and arithmetic.
#[derive(Debug, thiserror::Error)]
pub enum CMatError {
    /// Operand shapes are incompatible for the operation.
    #[error("shape mismatch: {0:?} vs {1:?}")]
    ShapeMismatch(Vec<usize>, Vec<usize>),

    /// A fixed-size matrix was requested with a non-positive dimension.
    #[error("invalid dimension: {rows}x{cols}")]
    InvalidDimension { rows: usize, cols: usize },

    /// The operation needs a matrix with positive size but got an empty one.
    #[error("zero length in matrix dimension")]
    ZeroLength,

    /// Slice bounds fall outside the matrix.
    #[error("slice [{row_start}..{row_end}, {col_start}..{col_end}] out of range for {rows}x{cols}")]
    SliceOutOfRange {
        row_start: usize,
        row_end: usize,
        col_start: usize,
        col_end: usize,
        rows: usize,
        cols: usize,
    },

    /// Error reported by the kernel layer.
    #[error(transparent)]
    Kernel(#[from] KernelError),
}

/// Result type for matrix operations.
pub type Result<T> = std::result::Result<T, CMatError>;
