//! Arithmetic on dense receivers: add, sub, mul, scale.
//!
//! Every operation validates shapes, prepares the receiver, resolves aliasing
//! and only then writes. Each picks a fast path from the operands' storage
//! capability and falls back to element access for anything else.

use crate::dense::{with_workspace, CDense, DenseLayout};
use crate::matrix::{checked_dims, CMatrix, Storage};
use crate::overlap::{resolve, Access};
use crate::view::untranspose;
use crate::{CMatError, Result};
use num_complex::Complex64;
use num_traits::{One, Zero};
use tracing::trace;

impl CDense {
    /// `self = a + b`.
    pub fn add(&mut self, a: &dyn CMatrix, b: &dyn CMatrix) -> Result<()> {
        self.elementwise("add", a, b, |x, y| x + y)
    }

    /// `self = a - b`.
    pub fn sub(&mut self, a: &dyn CMatrix, b: &dyn CMatrix) -> Result<()> {
        self.elementwise("sub", a, b, |x, y| x - y)
    }

    fn elementwise(
        &mut self,
        name: &'static str,
        a: &dyn CMatrix,
        b: &dyn CMatrix,
        f: fn(Complex64, Complex64) -> Complex64,
    ) -> Result<()> {
        let (ar, ac) = checked_dims(a)?;
        let (br, bc) = checked_dims(b)?;
        if (ar, ac) != (br, bc) {
            return Err(CMatError::ShapeMismatch(vec![ar, ac], vec![br, bc]));
        }
        self.reuse_as(ar, ac)?;
        let resolution = resolve(
            &*self,
            &[(a, Access::Elementwise), (b, Access::Elementwise)],
        );
        let dst = self.layout()?;

        if let (Storage::Dense(am), Storage::Dense(bm)) = (a.storage(), b.storage()) {
            let (al, bl) = (am.layout()?, bm.layout()?);
            trace!(op = name, path = "strided", ?resolution);
            return with_workspace(dst, resolution, |out| {
                for r in 0..ar {
                    let rows = out.row(r).iter().zip(al.row(r)).zip(bl.row(r));
                    for ((m, x), y) in rows {
                        m.set(f(x.get(), y.get()));
                    }
                }
                Ok(())
            });
        }

        trace!(op = name, path = "generic", ?resolution);
        with_workspace(dst, resolution, |out| {
            for r in 0..ar {
                for c in 0..ac {
                    out.set(r, c, f(a.at(r, c), b.at(r, c)));
                }
            }
            Ok(())
        })
    }

    /// `self = a * b`.
    ///
    /// Dense operands, including transposed and conjugate-transposed views of
    /// dense matrices, go through the GEMM kernel. A zero inner dimension
    /// yields a zero matrix.
    pub fn mul(&mut self, a: &dyn CMatrix, b: &dyn CMatrix) -> Result<()> {
        let (ar, ac) = checked_dims(a)?;
        let (br, bc) = checked_dims(b)?;
        if ac != br {
            return Err(CMatError::ShapeMismatch(vec![ar, ac], vec![br, bc]));
        }
        self.reuse_as(ar, bc)?;
        let resolution = resolve(&*self, &[(a, Access::Reduction), (b, Access::Reduction)]);
        let dst = self.layout()?;

        let (au, aop) = untranspose(a);
        let (bu, bop) = untranspose(b);
        if let (Storage::Dense(am), Storage::Dense(bm), Some(ta), Some(tb)) =
            (au.storage(), bu.storage(), aop.gemm_flag(), bop.gemm_flag())
        {
            let (ag, bg) = (am.layout()?.general(), bm.layout()?.general());
            trace!(op = "mul", path = "gemm", ?ta, ?tb, ?resolution);
            return with_workspace(dst, resolution, |out| {
                cmat_kernel::gemm(
                    ta,
                    tb,
                    Complex64::one(),
                    &ag,
                    &bg,
                    Complex64::zero(),
                    &out.general(),
                )?;
                Ok(())
            });
        }

        if let Storage::Diagonal(_) = au.storage() {
            trace!(op = "mul", path = "diagonal-left", ?resolution);
            return with_workspace(dst, resolution, |out| {
                scale_rows(out, a, b);
                Ok(())
            });
        }

        trace!(op = "mul", path = "generic", ?resolution);
        with_workspace(dst, resolution, |out| {
            for r in 0..ar {
                for c in 0..bc {
                    let mut sum = Complex64::zero();
                    for k in 0..ac {
                        sum += a.at(r, k) * b.at(k, c);
                    }
                    out.set(r, c, sum);
                }
            }
            Ok(())
        })
    }

    /// `self = f * a`.
    ///
    /// `a` may be `self` itself, seen through a handle from [`share`](Self::share).
    pub fn scale(&mut self, f: Complex64, a: &dyn CMatrix) -> Result<()> {
        let (ar, ac) = checked_dims(a)?;
        self.reuse_as(ar, ac)?;
        let resolution = resolve(&*self, &[(a, Access::Elementwise)]);
        let dst = self.layout()?;

        let (inner, op) = untranspose(a);
        if let Storage::Dense(am) = inner.storage() {
            let al = am.layout()?;
            trace!(op = "scale", path = "strided", view = ?op, ?resolution);
            return with_workspace(dst, resolution, |out| {
                if op.swaps_dims() {
                    // stored row j becomes column j of the result
                    for j in 0..ac {
                        for (i, x) in al.row(j).iter().enumerate() {
                            out.set(i, j, f * op.apply(x.get()));
                        }
                    }
                } else {
                    for r in 0..ar {
                        for (m, x) in out.row(r).iter().zip(al.row(r)) {
                            m.set(f * op.apply(x.get()));
                        }
                    }
                }
                Ok(())
            });
        }

        trace!(op = "scale", path = "generic", ?resolution);
        with_workspace(dst, resolution, |out| {
            for r in 0..ar {
                for c in 0..ac {
                    out.set(r, c, f * a.at(r, c));
                }
            }
            Ok(())
        })
    }
}

/// `out = d * b` for a diagonal `d`: row `r` of `b` scaled by `d[r, r]`.
fn scale_rows(out: &DenseLayout, d: &dyn CMatrix, b: &dyn CMatrix) {
    let (_, cols) = b.dims();
    for r in 0..out.rows {
        let s = d.at(r, r);
        for c in 0..cols {
            out.set(r, c, s * b.at(r, c));
        }
    }
}
