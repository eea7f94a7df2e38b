//! Diagonal complex matrix backed by a strided vector.

use crate::matrix::{checked_dims, CMatrix, MatrixState, Storage};
use crate::op::MatOp;
use crate::overlap::{self, alloc, from_vec, Access, Buffer, Footprint, Resolution};
use crate::view::{untranspose, MatView};
use crate::{CMatError, Result};
use cmat_kernel::{Band, Vector};
use num_complex::Complex64;
use num_traits::Zero;

/// Diagonal element `i` lives at `data[offset + i * inc]`.
#[derive(Debug, Clone)]
struct DiagLayout {
    data: Buffer,
    offset: usize,
    n: usize,
    inc: usize,
}

impl DiagLayout {
    fn alloc(n: usize) -> Self {
        Self {
            data: alloc(n),
            offset: 0,
            n,
            inc: 1,
        }
    }

    fn vector(&self) -> Vector<'_> {
        let len = if self.n == 0 {
            0
        } else {
            (self.n - 1) * self.inc + 1
        };
        Vector {
            n: self.n,
            inc: self.inc,
            data: &self.data[self.offset..self.offset + len],
        }
    }

    #[inline]
    fn get(&self, i: usize) -> Complex64 {
        assert!(i < self.n, "index {i} out of bounds for diagonal of length {}", self.n);
        self.data[self.offset + i * self.inc].get()
    }

    #[inline]
    fn set(&self, i: usize, v: Complex64) {
        assert!(i < self.n, "index {i} out of bounds for diagonal of length {}", self.n);
        self.data[self.offset + i * self.inc].set(v);
    }

    fn assign(&self, src: &DiagLayout) {
        for i in 0..self.n {
            self.set(i, src.get(i));
        }
    }
}

/// An `n x n` diagonal matrix.
///
/// Only the diagonal is stored. Off-diagonal elements read as zero and cannot
/// be written. A diagonal obtained from [`CDense::diag_view`] walks the dense
/// buffer with increment `stride + 1`.
///
/// [`CDense::diag_view`]: crate::CDense::diag_view
#[derive(Debug, Default)]
pub struct DiagCDense {
    mat: Option<DiagLayout>,
}

impl DiagCDense {
    /// Create an `n x n` diagonal matrix, optionally from the diagonal values.
    pub fn new(n: usize, data: Option<Vec<Complex64>>) -> Result<Self> {
        if n == 0 {
            return Err(CMatError::InvalidDimension { rows: n, cols: n });
        }
        let data = match data {
            Some(d) if d.len() != n => {
                return Err(CMatError::ShapeMismatch(vec![n], vec![d.len()]));
            }
            Some(d) => from_vec(d),
            None => alloc(n),
        };
        Ok(Self::from_parts(data, 0, n, 1))
    }

    /// An unallocated diagonal, ready to receive [`diag_from`](Self::diag_from).
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(data: Buffer, offset: usize, n: usize, inc: usize) -> Self {
        Self {
            mat: Some(DiagLayout {
                data,
                offset,
                n,
                inc,
            }),
        }
    }

    /// Length of the diagonal. Zero when unallocated.
    pub fn diag(&self) -> usize {
        self.mat.as_ref().map_or(0, |l| l.n)
    }

    pub fn state(&self) -> MatrixState {
        match &self.mat {
            None => MatrixState::Unallocated,
            Some(l) if l.n == 0 => MatrixState::ZeroSized,
            Some(_) => MatrixState::Populated,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.mat.is_none()
    }

    pub fn reset(&mut self) {
        self.mat = None;
    }

    /// Set every diagonal element to zero. Only the diagonal's own elements are
    /// touched, so a diagonal view leaves the rest of its dense matrix intact.
    pub fn zero(&mut self) {
        if let Some(l) = &self.mat {
            for i in 0..l.n {
                l.set(i, Complex64::zero());
            }
        }
    }

    /// Set diagonal element `i`.
    ///
    /// # Panics
    /// Panics if `i` is out of bounds.
    pub fn set_diag(&mut self, i: usize, v: Complex64) {
        match &self.mat {
            Some(l) => l.set(i, v),
            None => panic!("index {i} out of bounds for unallocated diagonal"),
        }
    }

    /// Lower and upper bandwidth: always `(0, 0)`.
    pub fn bandwidth(&self) -> (usize, usize) {
        (0, 0)
    }

    pub fn share(&self) -> DiagCDense {
        DiagCDense {
            mat: self.mat.clone(),
        }
    }

    /// Sum of the diagonal elements.
    pub fn trace(&self) -> Result<Complex64> {
        match &self.mat {
            Some(l) if l.n > 0 => Ok((0..l.n).map(|i| l.get(i)).sum()),
            _ => Err(CMatError::ZeroLength),
        }
    }

    /// Copy the main diagonal of `m` into `self`.
    ///
    /// An unallocated receiver takes length `min(rows, cols)`; otherwise the
    /// lengths must agree. A diagonal source is copied with the vector kernel.
    pub fn diag_from(&mut self, m: &dyn CMatrix) -> Result<()> {
        let (r, c) = checked_dims(m)?;
        let n = r.min(c);
        self.reuse_as(n)?;

        let (inner, op) = untranspose(m);
        if !op.conjugates() && overlap::same_storage(&*self, inner) {
            return Ok(());
        }
        let resolution = overlap::resolve(&*self, &[(m, Access::Elementwise)]);
        self.write_with(resolution, |out| {
            match inner.storage() {
                Storage::Diagonal(src) if !op.conjugates() => {
                    tracing::trace!(n, ?resolution, "diagonal vector copy");
                    let src = src.layout()?;
                    cmat_kernel::copy(&src.vector(), &out.vector())?;
                }
                _ => {
                    tracing::trace!(n, ?op, ?resolution, "element diagonal copy");
                    for i in 0..n {
                        out.set(i, m.at(i, i));
                    }
                }
            }
            Ok(())
        })
    }

    /// `self = f * a`.
    ///
    /// `a` may share storage with `self`.
    pub fn scale(&mut self, f: Complex64, a: &DiagCDense) -> Result<()> {
        let (n, _) = checked_dims(a)?;
        self.reuse_as(n)?;
        let resolution = overlap::resolve(&*self, &[(a, Access::Elementwise)]);
        let src = a.layout()?;
        self.write_with(resolution, |out| {
            for i in 0..n {
                out.set(i, f * src.get(i));
            }
            Ok(())
        })
    }

    /// The matrix as a band descriptor with zero bandwidth.
    ///
    /// The band stride is the diagonal increment. An unallocated diagonal
    /// exports an empty band.
    pub fn raw_band(&self) -> Band<'_> {
        match &self.mat {
            Some(l) => {
                let v = l.vector();
                Band {
                    rows: l.n,
                    cols: l.n,
                    kl: 0,
                    ku: 0,
                    stride: l.inc,
                    data: v.data,
                }
            }
            None => Band {
                rows: 0,
                cols: 0,
                kl: 0,
                ku: 0,
                stride: 0,
                data: &[],
            },
        }
    }

    /// The diagonal as a strided vector. An unallocated diagonal exports
    /// `n = 0`, `inc = 0`.
    pub fn raw_vector(&self) -> Vector<'_> {
        match &self.mat {
            Some(l) => l.vector(),
            None => Vector {
                n: 0,
                inc: 0,
                data: &[],
            },
        }
    }

    pub(crate) fn footprint(&self) -> Option<Footprint<'_>> {
        self.mat.as_ref().map(|l| Footprint {
            buf: &l.data,
            offset: l.offset,
            rows: l.n,
            cols: 1,
            stride: l.inc,
        })
    }

    fn layout(&self) -> Result<&DiagLayout> {
        self.mat.as_ref().ok_or(CMatError::ZeroLength)
    }

    /// Run `f` against the receiver directly, or against a scratch diagonal that
    /// is copied into the receiver once `f` succeeds.
    fn write_with<F>(&self, resolution: Resolution, f: F) -> Result<()>
    where
        F: FnOnce(&DiagLayout) -> Result<()>,
    {
        let dst = self.layout()?;
        match resolution {
            Resolution::Direct => f(dst),
            Resolution::Isolated => {
                tracing::debug!(n = dst.n, "computing diagonal into isolated workspace");
                let work = DiagLayout::alloc(dst.n);
                f(&work)?;
                dst.assign(&work);
                Ok(())
            }
        }
    }

    fn reuse_as(&mut self, n: usize) -> Result<()> {
        if n == 0 {
            return Err(CMatError::ZeroLength);
        }
        match &self.mat {
            Some(l) if l.n != n => Err(CMatError::ShapeMismatch(vec![l.n], vec![n])),
            Some(_) => Ok(()),
            None => {
                tracing::debug!(n, "allocating diagonal receiver");
                self.mat = Some(DiagLayout::alloc(n));
                Ok(())
            }
        }
    }
}

impl CMatrix for DiagCDense {
    #[inline]
    fn dims(&self) -> (usize, usize) {
        let n = self.diag();
        (n, n)
    }

    #[inline]
    fn at(&self, r: usize, c: usize) -> Complex64 {
        let n = self.diag();
        assert!(
            r < n && c < n,
            "index ({r}, {c}) out of bounds for {n}x{n} diagonal"
        );
        match &self.mat {
            Some(l) if r == c => l.get(r),
            _ => Complex64::zero(),
        }
    }

    fn storage(&self) -> Storage<'_> {
        Storage::Diagonal(self)
    }

    /// A diagonal is symmetric, so its transpose is itself.
    fn t(&self) -> MatView<'_> {
        MatView::new(self, MatOp::Identity)
    }

    /// The conjugate transpose only conjugates the diagonal.
    fn h(&self) -> MatView<'_> {
        MatView::new(self, MatOp::Conj)
    }
}
