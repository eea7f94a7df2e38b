use num_complex::Complex64;

/// Operation applied to a GEMM operand.
///
/// Mirrors the CBLAS_TRANSPOSE enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transpose {
    NoTrans,
    Trans,
    ConjTrans,
}

impl Transpose {
    /// Whether the operand is read with rows and columns swapped.
    #[inline]
    pub fn is_transpose(self) -> bool {
        !matches!(self, Transpose::NoTrans)
    }

    /// Dimensions of `op(M)` for a stored `rows x cols` matrix.
    #[inline]
    pub fn apply_dims(self, rows: usize, cols: usize) -> (usize, usize) {
        if self.is_transpose() {
            (cols, rows)
        } else {
            (rows, cols)
        }
    }

    /// Apply the element part of the operation (conjugation for `ConjTrans`).
    #[inline(always)]
    pub fn apply(self, v: Complex64) -> Complex64 {
        match self {
            Transpose::ConjTrans => v.conj(),
            _ => v,
        }
    }
}
