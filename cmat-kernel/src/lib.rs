//! Strided complex double-precision kernels.
//!
//! This crate is the BLAS-equivalent layer underneath `cmat-rs`. It works on
//! raw, strided descriptors over `Cell<Complex64>` buffers so that callers can
//! hand it storage that is shared between several matrix handles.
//!
//! # Core Types
//!
//! - [`General`]: row-major matrix descriptor (`rows`, `cols`, `stride`)
//! - [`Vector`]: strided vector descriptor (`n`, `inc`)
//! - [`Band`]: band matrix descriptor, used for raw export of diagonal matrices
//! - [`Transpose`]: operation flag applied to GEMM operands
//!
//! # Operations
//!
//! - [`gemm`]: `C := alpha * op(A) * op(B) + beta * C`
//! - [`copy`]: `y := x` over strided vectors
//!
//! The kernels do not check for aliasing between their arguments. Callers must
//! make sure that the destination does not overlap any operand.
//!
//! With the `blas` feature enabled, [`gemm`] and [`copy`] forward to CBLAS
//! `zgemm` and `zcopy`.

mod layout;
mod level1;
mod level3;
mod transpose;

pub use layout::{Band, General, Vector};
pub use level1::copy;
pub use level3::gemm;
pub use transpose::Transpose;

pub use num_complex::Complex64;

/// Errors raised by the kernel layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KernelError {
    /// Operand shapes are incompatible for the operation.
    #[error("shape mismatch: {0:?} vs {1:?}")]
    ShapeMismatch(Vec<usize>, Vec<usize>),

    /// Stride (or increment) is too small for the described extent.
    #[error("invalid stride {stride} for extent {extent}")]
    InvalidStride { stride: usize, extent: usize },

    /// Backing buffer is shorter than the descriptor requires.
    #[error("buffer too short: need {needed} elements, have {len}")]
    ShortBuffer { needed: usize, len: usize },

    /// A dimension does not fit the 32-bit index type used by CBLAS.
    #[error("dimension {0} exceeds the CBLAS index range")]
    IndexOverflow(usize),
}

/// Result type for kernel operations.
pub type Result<T> = std::result::Result<T, KernelError>;
