//! Level-3 matrix kernels.

use crate::layout::General;
use crate::transpose::Transpose;
use crate::{KernelError, Result};
use num_complex::Complex64;
use num_traits::{One, Zero};

/// General matrix multiplication: `C := alpha * op(A) * op(B) + beta * C`.
///
/// `op(A)` must be `m x k`, `op(B)` must be `k x n` and `C` must be `m x n`.
/// When `beta` is zero, `C` is overwritten without being read.
///
/// `C` should not share elements with `A` or `B`. With the `blas` feature, a
/// `C` whose span meets either operand's span is computed by the native loop.
pub fn gemm(
    trans_a: Transpose,
    trans_b: Transpose,
    alpha: Complex64,
    a: &General<'_>,
    b: &General<'_>,
    beta: Complex64,
    c: &General<'_>,
) -> Result<()> {
    let (m, k) = trans_a.apply_dims(a.rows, a.cols);
    let (kb, n) = trans_b.apply_dims(b.rows, b.cols);
    if kb != k {
        return Err(KernelError::ShapeMismatch(vec![m, k], vec![kb, n]));
    }
    if c.rows != m || c.cols != n {
        return Err(KernelError::ShapeMismatch(
            vec![m, n],
            vec![c.rows, c.cols],
        ));
    }
    if m == 0 || n == 0 {
        return Ok(());
    }

    #[cfg(feature = "blas")]
    {
        use crate::layout::spans_intersect;

        let c_len = c.footprint();
        if spans_intersect(c.data, c_len, a.data, a.footprint())
            || spans_intersect(c.data, c_len, b.data, b.footprint())
        {
            native_gemm(trans_a, trans_b, alpha, a, b, beta, c, k);
            return Ok(());
        }
        blas_gemm(trans_a, trans_b, alpha, a, b, beta, c, (m, n, k))
    }
    #[cfg(not(feature = "blas"))]
    {
        native_gemm(trans_a, trans_b, alpha, a, b, beta, c, k);
        Ok(())
    }
}

#[inline(always)]
fn op_get(trans: Transpose, m: &General<'_>, r: usize, c: usize) -> Complex64 {
    if trans.is_transpose() {
        trans.apply(m.get(c, r))
    } else {
        m.get(r, c)
    }
}

/// Reference row-oriented loop: each row of C is scaled by `beta`, then
/// accumulated as a linear combination of rows of `op(B)`.
#[allow(clippy::too_many_arguments)]
fn native_gemm(
    trans_a: Transpose,
    trans_b: Transpose,
    alpha: Complex64,
    a: &General<'_>,
    b: &General<'_>,
    beta: Complex64,
    c: &General<'_>,
    k: usize,
) {
    let (m, n) = (c.rows, c.cols);
    for i in 0..m {
        if beta.is_zero() {
            for j in 0..n {
                c.set(i, j, Complex64::zero());
            }
        } else if !beta.is_one() {
            for j in 0..n {
                c.set(i, j, beta * c.get(i, j));
            }
        }
        if alpha.is_zero() {
            continue;
        }
        for l in 0..k {
            let ail = alpha * op_get(trans_a, a, i, l);
            if ail.is_zero() {
                continue;
            }
            for j in 0..n {
                c.set(i, j, c.get(i, j) + ail * op_get(trans_b, b, l, j));
            }
        }
    }
}

#[cfg(feature = "blas")]
#[allow(clippy::too_many_arguments)]
fn blas_gemm(
    trans_a: Transpose,
    trans_b: Transpose,
    alpha: Complex64,
    a: &General<'_>,
    b: &General<'_>,
    beta: Complex64,
    c: &General<'_>,
    (m, n, k): (usize, usize, usize),
) -> Result<()> {
    use crate::layout::{blas_int, raw_slice, raw_slice_mut};
    use cblas::Layout;

    let to_cblas = |t: Transpose| match t {
        Transpose::NoTrans => cblas::Transpose::None,
        Transpose::Trans => cblas::Transpose::Ordinary,
        Transpose::ConjTrans => cblas::Transpose::Conjugate,
    };

    let (m, n, k) = (blas_int(m)?, blas_int(n)?, blas_int(k)?);
    let (lda, ldb, ldc) = (
        blas_int(a.stride)?,
        blas_int(b.stride)?,
        blas_int(c.stride)?,
    );
    unsafe {
        let a_slice = raw_slice(a.data, a.footprint());
        let b_slice = raw_slice(b.data, b.footprint());
        let c_slice = raw_slice_mut(c.data, c.footprint());
        cblas::zgemm(
            Layout::RowMajor,
            to_cblas(trans_a),
            to_cblas(trans_b),
            m,
            n,
            k,
            alpha,
            a_slice,
            lda,
            b_slice,
            ldb,
            beta,
            c_slice,
            ldc,
        );
    }
    Ok(())
}
