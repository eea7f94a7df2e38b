//! Level-1 vector kernels.

use crate::layout::Vector;
use crate::{KernelError, Result};

/// Strided copy: `y := x`.
///
/// Both vectors must have the same length. Elements are copied in increasing
/// index order.
pub fn copy(x: &Vector<'_>, y: &Vector<'_>) -> Result<()> {
    if x.n != y.n {
        return Err(KernelError::ShapeMismatch(vec![x.n], vec![y.n]));
    }
    if x.n == 0 {
        return Ok(());
    }

    #[cfg(feature = "blas")]
    {
        use crate::layout::spans_intersect;

        if spans_intersect(x.data, x.footprint(), y.data, y.footprint()) {
            native_copy(x, y);
            return Ok(());
        }
        blas_copy(x, y)
    }
    #[cfg(not(feature = "blas"))]
    {
        native_copy(x, y);
        Ok(())
    }
}

fn native_copy(x: &Vector<'_>, y: &Vector<'_>) {
    if x.inc == 1 && y.inc == 1 {
        for (dst, src) in y.data[..y.n].iter().zip(&x.data[..x.n]) {
            dst.set(src.get());
        }
        return;
    }
    for i in 0..x.n {
        y.set(i, x.get(i));
    }
}

#[cfg(feature = "blas")]
fn blas_copy(x: &Vector<'_>, y: &Vector<'_>) -> Result<()> {
    use crate::layout::{blas_int, raw_slice, raw_slice_mut};

    let n = blas_int(x.n)?;
    let incx = blas_int(x.inc)?;
    let incy = blas_int(y.inc)?;
    unsafe {
        let xs = raw_slice(x.data, x.footprint());
        let ys = raw_slice_mut(y.data, y.footprint());
        cblas::zcopy(n, xs, incx, ys, incy);
    }
    Ok(())
}
