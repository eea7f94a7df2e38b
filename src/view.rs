//! Transposed and conjugated views.
//!
//! A view holds a back-reference to the matrix it wraps together with a
//! [`MatOp`] tag. Every access is redirected through the tag, so taking a view
//! never materializes data. Views of views collapse into a single view of the
//! innermost matrix.

use crate::matrix::{CMatrix, CMatrixMut};
use crate::op::MatOp;
use num_complex::Complex64;

/// Read-only view of a matrix through a [`MatOp`].
#[derive(Clone, Copy)]
pub struct MatView<'a> {
    op: MatOp,
    inner: &'a dyn CMatrix,
}

impl<'a> MatView<'a> {
    /// Wrap `m` with `op`. If `m` is itself a view, the operations are composed.
    pub fn new(m: &'a dyn CMatrix, op: MatOp) -> Self {
        let (inner, inner_op) = untranspose(m);
        MatView {
            op: inner_op.then(op),
            inner,
        }
    }

    #[inline]
    pub fn op(&self) -> MatOp {
        self.op
    }
}

impl std::fmt::Debug for MatView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatView")
            .field("op", &self.op)
            .field("dims", &self.dims())
            .finish()
    }
}

impl CMatrix for MatView<'_> {
    #[inline]
    fn dims(&self) -> (usize, usize) {
        let (r, c) = self.inner.dims();
        self.op.apply_dims(r, c)
    }

    #[inline]
    fn at(&self, r: usize, c: usize) -> Complex64 {
        let v = if self.op.swaps_dims() {
            self.inner.at(c, r)
        } else {
            self.inner.at(r, c)
        };
        self.op.apply(v)
    }

    fn view_parts(&self) -> Option<(MatOp, &dyn CMatrix)> {
        Some((self.op, self.inner))
    }
}

/// Writable view of a matrix through a [`MatOp`].
///
/// Writes are redirected the same way as reads: a transposed view writes the
/// mirrored element, a conjugating view stores the conjugate. A writable view
/// of another view keeps the chain; [`untranspose`] composes it on reads.
pub struct MatViewMut<'a> {
    op: MatOp,
    inner: &'a mut dyn CMatrixMut,
}

impl<'a> MatViewMut<'a> {
    pub fn new(m: &'a mut dyn CMatrixMut, op: MatOp) -> Self {
        MatViewMut { op, inner: m }
    }

    #[inline]
    pub fn op(&self) -> MatOp {
        self.op
    }
}

impl std::fmt::Debug for MatViewMut<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatViewMut")
            .field("op", &self.op)
            .field("dims", &self.dims())
            .finish()
    }
}

impl CMatrix for MatViewMut<'_> {
    #[inline]
    fn dims(&self) -> (usize, usize) {
        let (r, c) = self.inner.dims();
        self.op.apply_dims(r, c)
    }

    #[inline]
    fn at(&self, r: usize, c: usize) -> Complex64 {
        let v = if self.op.swaps_dims() {
            self.inner.at(c, r)
        } else {
            self.inner.at(r, c)
        };
        self.op.apply(v)
    }

    fn view_parts(&self) -> Option<(MatOp, &dyn CMatrix)> {
        let inner: &dyn CMatrix = &*self.inner;
        Some((self.op, inner))
    }
}

impl CMatrixMut for MatViewMut<'_> {
    #[inline]
    fn set(&mut self, r: usize, c: usize, v: Complex64) {
        // every op is its own inverse
        let v = self.op.apply(v);
        if self.op.swaps_dims() {
            self.inner.set(c, r, v);
        } else {
            self.inner.set(r, c, v);
        }
    }
}

/// Split a matrix into the matrix holding the data and the operation applied
/// to it, looking through any number of nested views.
pub fn untranspose(m: &dyn CMatrix) -> (&dyn CMatrix, MatOp) {
    let mut inner = m;
    let mut op = MatOp::Identity;
    while let Some((outer, next)) = inner.view_parts() {
        op = outer.then(op);
        inner = next;
    }
    (inner, op)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CDense;

    fn seq(rows: usize, cols: usize) -> CDense {
        CDense::from_fn(rows, cols, |r, c| Complex64::new((r * cols + c) as f64, r as f64))
            .unwrap()
    }

    #[test]
    fn test_view_of_view_composes() {
        let m = seq(2, 3);
        let t = MatView::new(&m, MatOp::Transpose);
        let h = MatView::new(&t, MatOp::Conj);
        assert_eq!(h.op(), MatOp::Adjoint);
        assert_eq!(h.dims(), (3, 2));
        assert_eq!(h.at(2, 1), m.at(1, 2).conj());
    }

    #[test]
    fn test_untranspose_nested_mut_views() {
        let mut m = seq(2, 3);
        let mut t = MatViewMut::new(&mut m, MatOp::Transpose);
        let outer = MatViewMut::new(&mut t, MatOp::Conj);

        let (inner, op) = untranspose(&outer);
        assert_eq!(op, MatOp::Adjoint);
        assert!(matches!(inner.storage(), crate::Storage::Dense(_)));

        let view = MatView::new(&outer, MatOp::Identity);
        assert_eq!(view.op(), MatOp::Adjoint);
        assert_eq!(view.at(2, 1), Complex64::new(5.0, -1.0));
    }

    #[test]
    fn test_nested_mut_view_writes_through() {
        let mut m = seq(2, 2);
        {
            let mut t = MatViewMut::new(&mut m, MatOp::Transpose);
            let mut outer = MatViewMut::new(&mut t, MatOp::Conj);
            outer.set(0, 1, Complex64::new(7.0, 1.0));
        }
        assert_eq!(m.at(1, 0), Complex64::new(7.0, -1.0));
    }
}
