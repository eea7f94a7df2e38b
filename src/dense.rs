//! Row-major, strided dense complex matrix.

use crate::diagonal::DiagCDense;
use crate::matrix::{checked_dims, CMatrix, CMatrixMut, MatrixState, Storage};
use crate::op::MatOp;
use crate::overlap::{self, alloc, from_vec, Access, Buffer, Footprint, Resolution};
use crate::view::untranspose;
use crate::{CMatError, Result};
use cmat_kernel::{General, Vector};
use num_complex::Complex64;
use num_traits::Zero;
use std::cell::Cell;
use std::ops::Range;

/// Shape and placement of a dense matrix inside its buffer.
///
/// Element `(r, c)` lives at `data[offset + r * stride + c]`.
#[derive(Debug, Clone)]
pub(crate) struct DenseLayout {
    pub(crate) data: Buffer,
    pub(crate) offset: usize,
    pub(crate) rows: usize,
    pub(crate) cols: usize,
    pub(crate) stride: usize,
}

impl DenseLayout {
    /// Fresh contiguous zeroed storage.
    pub(crate) fn alloc(rows: usize, cols: usize) -> Self {
        Self {
            data: alloc(rows * cols),
            offset: 0,
            rows,
            cols,
            stride: cols.max(1),
        }
    }

    #[inline]
    fn index(&self, r: usize, c: usize) -> usize {
        assert!(
            r < self.rows && c < self.cols,
            "index ({r}, {c}) out of bounds for {}x{} matrix",
            self.rows,
            self.cols
        );
        self.offset + r * self.stride + c
    }

    #[inline]
    pub(crate) fn get(&self, r: usize, c: usize) -> Complex64 {
        self.data[self.index(r, c)].get()
    }

    #[inline]
    pub(crate) fn set(&self, r: usize, c: usize, v: Complex64) {
        self.data[self.index(r, c)].set(v);
    }

    /// The cells of row `r`.
    #[inline]
    pub(crate) fn row(&self, r: usize) -> &[Cell<Complex64>] {
        if self.cols == 0 {
            return &[];
        }
        let start = self.offset + r * self.stride;
        &self.data[start..start + self.cols]
    }

    pub(crate) fn general(&self) -> General<'_> {
        let len = if self.rows == 0 || self.cols == 0 {
            0
        } else {
            (self.rows - 1) * self.stride + self.cols
        };
        General {
            rows: self.rows,
            cols: self.cols,
            stride: self.stride,
            data: &self.data[self.offset..self.offset + len],
        }
    }

    /// Row `r` as a kernel vector.
    fn row_vector(&self, r: usize) -> Vector<'_> {
        Vector {
            n: self.cols,
            inc: 1,
            data: self.row(r),
        }
    }

    fn footprint(&self) -> Footprint<'_> {
        Footprint {
            buf: &self.data,
            offset: self.offset,
            rows: self.rows,
            cols: self.cols,
            stride: self.stride,
        }
    }

    /// Overwrite every element with the same-position element of `src`.
    pub(crate) fn assign(&self, src: &DenseLayout) {
        for r in 0..self.rows {
            for (dst, x) in self.row(r).iter().zip(src.row(r)) {
                dst.set(x.get());
            }
        }
    }

    fn fill(&self, v: Complex64) {
        for r in 0..self.rows {
            for cell in self.row(r) {
                cell.set(v);
            }
        }
    }
}

/// Run `f` against `dst` directly, or against a zeroed workspace of the same
/// shape that is copied into `dst` once `f` succeeds.
pub(crate) fn with_workspace<F>(dst: &DenseLayout, resolution: Resolution, f: F) -> Result<()>
where
    F: FnOnce(&DenseLayout) -> Result<()>,
{
    match resolution {
        Resolution::Direct => f(dst),
        Resolution::Isolated => {
            tracing::debug!(rows = dst.rows, cols = dst.cols, "computing into isolated workspace");
            let work = DenseLayout::alloc(dst.rows, dst.cols);
            f(&work)?;
            dst.assign(&work);
            Ok(())
        }
    }
}

/// A dense complex matrix.
///
/// Elements are stored row-major with a row stride that may exceed the column
/// count, so a slice of a larger matrix is itself a `CDense`. Storage is
/// reference-counted: [`share`](Self::share), [`slice`](Self::slice) and
/// [`diag_view`](Self::diag_view) hand out matrices that read and write the same
/// buffer.
///
/// A `CDense` is in one of three states (see [`MatrixState`]). An
/// [unallocated](Self::empty) matrix takes the shape of the first result
/// written into it.
#[derive(Debug, Default)]
pub struct CDense {
    mat: Option<DenseLayout>,
}

impl CDense {
    /// Create a `rows x cols` matrix, optionally from row-major `data`.
    ///
    /// Without `data` the matrix is zero-filled. Both dimensions must be
    /// positive; use [`zero_sized`](Self::zero_sized) for a matrix with a zero
    /// dimension.
    pub fn new(rows: usize, cols: usize, data: Option<Vec<Complex64>>) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(CMatError::InvalidDimension { rows, cols });
        }
        let len = rows
            .checked_mul(cols)
            .ok_or(CMatError::InvalidDimension { rows, cols })?;
        let data = match data {
            Some(d) if d.len() != len => {
                return Err(CMatError::ShapeMismatch(vec![len], vec![d.len()]));
            }
            Some(d) => from_vec(d),
            None => alloc(len),
        };
        Ok(Self {
            mat: Some(DenseLayout {
                data,
                offset: 0,
                rows,
                cols,
                stride: cols,
            }),
        })
    }

    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        Self::new(rows, cols, None)
    }

    /// Create a matrix with element `(r, c)` set to `f(r, c)`.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> Complex64,
    {
        let m = Self::zeros(rows, cols)?;
        if let Some(l) = &m.mat {
            for r in 0..rows {
                for (c, cell) in l.row(r).iter().enumerate() {
                    cell.set(f(r, c));
                }
            }
        }
        Ok(m)
    }

    /// An unallocated matrix, ready to receive any result.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A fixed-shape matrix with at least one zero dimension.
    pub fn zero_sized(rows: usize, cols: usize) -> Result<Self> {
        if rows != 0 && cols != 0 {
            return Err(CMatError::InvalidDimension { rows, cols });
        }
        Ok(Self {
            mat: Some(DenseLayout::alloc(rows, cols)),
        })
    }

    pub fn state(&self) -> MatrixState {
        match &self.mat {
            None => MatrixState::Unallocated,
            Some(l) if l.rows == 0 || l.cols == 0 => MatrixState::ZeroSized,
            Some(_) => MatrixState::Populated,
        }
    }

    /// Whether the matrix is unallocated and will take the shape of the next
    /// result. A zero-sized matrix is not empty.
    pub fn is_empty(&self) -> bool {
        self.mat.is_none()
    }

    /// Release this handle's storage and return to the unallocated state.
    ///
    /// Other handles sharing the buffer keep it alive.
    pub fn reset(&mut self) {
        self.mat = None;
    }

    /// Set every element to zero, keeping the shape.
    pub fn zero(&mut self) {
        if let Some(l) = &self.mat {
            l.fill(Complex64::zero());
        }
    }

    /// A new handle on the same storage.
    pub fn share(&self) -> CDense {
        CDense {
            mat: self.mat.clone(),
        }
    }

    /// Submatrix of rows `rows` and columns `cols`, sharing storage with `self`.
    pub fn slice(&self, rows: Range<usize>, cols: Range<usize>) -> Result<CDense> {
        let (mr, mc) = self.dims();
        let out_of_range = rows.start >= mr
            || rows.end > mr
            || rows.start > rows.end
            || cols.start >= mc
            || cols.end > mc
            || cols.start > cols.end;
        let l = match &self.mat {
            Some(l) if !out_of_range => l,
            _ => {
                return Err(CMatError::SliceOutOfRange {
                    row_start: rows.start,
                    row_end: rows.end,
                    col_start: cols.start,
                    col_end: cols.end,
                    rows: mr,
                    cols: mc,
                });
            }
        };
        Ok(CDense {
            mat: Some(DenseLayout {
                data: l.data.clone(),
                offset: l.offset + rows.start * l.stride + cols.start,
                rows: rows.len(),
                cols: cols.len(),
                stride: l.stride,
            }),
        })
    }

    /// The main diagonal as a [`DiagCDense`] sharing storage with `self`.
    pub fn diag_view(&self) -> Result<DiagCDense> {
        let l = self.mat.as_ref().ok_or(CMatError::ZeroLength)?;
        let n = l.rows.min(l.cols);
        if n == 0 {
            return Err(CMatError::ZeroLength);
        }
        Ok(DiagCDense::from_parts(l.data.clone(), l.offset, n, l.stride + 1))
    }

    /// Copy the overlapping top-left region of `a` into `self`.
    ///
    /// An unallocated receiver first takes the shape of `a`. Returns the number
    /// of rows and columns copied.
    pub fn copy_from(&mut self, a: &dyn CMatrix) -> Result<(usize, usize)> {
        let (ar, ac) = checked_dims(a)?;
        if self.is_empty() {
            self.reuse_as(ar, ac)?;
        }
        let (mr, mc) = self.dims();
        let (rows, cols) = (mr.min(ar), mc.min(ac));
        if rows == 0 || cols == 0 {
            return Ok((rows, cols));
        }

        let (inner, op) = untranspose(a);
        if op == MatOp::Identity && overlap::same_storage(&*self, inner) {
            return Ok((rows, cols));
        }
        let resolution = overlap::resolve(&*self, &[(a, Access::Elementwise)]);
        let dst = self.layout()?;
        // Only the copied region of the destination is written.
        let region = DenseLayout {
            data: dst.data.clone(),
            offset: dst.offset,
            rows,
            cols,
            stride: dst.stride,
        };

        match (inner.storage(), op) {
            (Storage::Dense(src), MatOp::Identity) => {
                tracing::trace!(rows, cols, ?resolution, "dense row copy");
                let src = src.layout()?;
                with_workspace(&region, resolution, |out| {
                    for r in 0..rows {
                        let x = Vector {
                            n: cols,
                            inc: 1,
                            data: &src.row(r)[..cols],
                        };
                        cmat_kernel::copy(&x, &out.row_vector(r))?;
                    }
                    Ok(())
                })?;
            }
            _ => {
                tracing::trace!(rows, cols, ?op, ?resolution, "element copy");
                with_workspace(&region, resolution, |out| {
                    for r in 0..rows {
                        for c in 0..cols {
                            out.set(r, c, a.at(r, c));
                        }
                    }
                    Ok(())
                })?;
            }
        }
        Ok((rows, cols))
    }

    /// Raw descriptor of the storage, or `None` when unallocated.
    pub fn raw_matrix(&self) -> Option<General<'_>> {
        self.mat.as_ref().map(DenseLayout::general)
    }

    /// Elements in row-major order.
    pub fn to_vec(&self) -> Vec<Complex64> {
        match &self.mat {
            None => Vec::new(),
            Some(l) => (0..l.rows)
                .flat_map(|r| l.row(r).iter().map(|cell| cell.get()))
                .collect(),
        }
    }

    pub(crate) fn layout(&self) -> Result<&DenseLayout> {
        self.mat.as_ref().ok_or(CMatError::ZeroLength)
    }

    pub(crate) fn footprint(&self) -> Option<Footprint<'_>> {
        self.mat.as_ref().map(DenseLayout::footprint)
    }

    /// Prepare `self` to receive a `rows x cols` result.
    ///
    /// An unallocated matrix allocates fresh storage; any other matrix must
    /// already have exactly that shape.
    pub(crate) fn reuse_as(&mut self, rows: usize, cols: usize) -> Result<()> {
        match &self.mat {
            Some(l) => {
                if l.rows != rows || l.cols != cols {
                    return Err(CMatError::ShapeMismatch(
                        vec![l.rows, l.cols],
                        vec![rows, cols],
                    ));
                }
            }
            None => {
                tracing::debug!(rows, cols, "allocating receiver");
                self.mat = Some(DenseLayout::alloc(rows, cols));
            }
        }
        Ok(())
    }
}

impl CMatrix for CDense {
    #[inline]
    fn dims(&self) -> (usize, usize) {
        self.mat.as_ref().map_or((0, 0), |l| (l.rows, l.cols))
    }

    #[inline]
    fn at(&self, r: usize, c: usize) -> Complex64 {
        match &self.mat {
            Some(l) => l.get(r, c),
            None => panic!("index ({r}, {c}) out of bounds for unallocated matrix"),
        }
    }

    fn storage(&self) -> Storage<'_> {
        Storage::Dense(self)
    }
}

impl CMatrixMut for CDense {
    #[inline]
    fn set(&mut self, r: usize, c: usize, v: Complex64) {
        match &self.mat {
            Some(l) => l.set(r, c, v),
            None => panic!("index ({r}, {c}) out of bounds for unallocated matrix"),
        }
    }
}
