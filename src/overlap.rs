//! Aliasing and overlap resolution.
//!
//! A destination may share backing storage with an operand. Before writing,
//! every operation asks [`resolve`] whether it can write the destination
//! directly or must compute into an isolated workspace and copy back.
//!
//! Storage identity is the allocation (`Rc::ptr_eq`) plus the exact element
//! window. Overlap is decided with offset/stride arithmetic: exact rectangle
//! intersection when row strides agree, conservative index-range intersection
//! otherwise. With the `blas` feature the kernels receive whole slices over
//! each operand's span, so any span intersection forces isolation.

use crate::matrix::{CMatrix, Storage};
use crate::view::untranspose;
use num_complex::Complex64;
use num_traits::Zero;
use std::cell::Cell;
use std::rc::Rc;

/// Shared backing storage of dense and diagonal matrices.
pub(crate) type Buffer = Rc<[Cell<Complex64>]>;

pub(crate) fn alloc(len: usize) -> Buffer {
    (0..len).map(|_| Cell::new(Complex64::zero())).collect()
}

pub(crate) fn from_vec(data: Vec<Complex64>) -> Buffer {
    data.into_iter().map(Cell::new).collect()
}

/// The set of buffer elements a matrix (or strided vector) addresses:
/// `offset + r * stride + c` for `r < rows`, `c < cols`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Footprint<'a> {
    pub(crate) buf: &'a Buffer,
    pub(crate) offset: usize,
    pub(crate) rows: usize,
    pub(crate) cols: usize,
    pub(crate) stride: usize,
}

impl Footprint<'_> {
    fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Half-open range of buffer indices spanned.
    fn span(&self) -> (usize, usize) {
        let len = if self.is_empty() {
            0
        } else {
            (self.rows - 1) * self.stride + self.cols
        };
        (self.offset, self.offset + len)
    }

    fn same_buffer(&self, other: &Footprint<'_>) -> bool {
        Rc::ptr_eq(self.buf, other.buf)
    }

    pub(crate) fn identical(&self, other: &Footprint<'_>) -> bool {
        self.same_buffer(other)
            && self.offset == other.offset
            && self.rows == other.rows
            && self.cols == other.cols
            && (self.rows <= 1 || self.stride == other.stride)
    }

    /// Whether the index ranges spanned intersect, gaps between rows included.
    pub(crate) fn spans_meet(&self, other: &Footprint<'_>) -> bool {
        if !self.same_buffer(other) || self.is_empty() || other.is_empty() {
            return false;
        }
        let (a0, a1) = self.span();
        let (b0, b1) = other.span();
        a0 < b1 && b0 < a1
    }

    pub(crate) fn overlaps(&self, other: &Footprint<'_>) -> bool {
        if !self.spans_meet(other) {
            return false;
        }
        if self.stride != other.stride {
            return true;
        }
        let s = self.stride;
        let (ar, ac) = (self.offset / s, self.offset % s);
        let (br, bc) = (other.offset / s, other.offset % s);
        if ac + self.cols > s || bc + other.cols > s {
            // rows wrap around the stride; fall back to the range test
            return true;
        }
        let rows_meet = ar < br + other.rows && br < ar + self.rows;
        let cols_meet = ac < bc + other.cols && bc < ac + self.cols;
        rows_meet && cols_meet
    }
}

/// Footprint of the storage behind `m`, looking through views.
pub(crate) fn footprint_of(m: &dyn CMatrix) -> Option<Footprint<'_>> {
    let (inner, _) = untranspose(m);
    match inner.storage() {
        Storage::Dense(d) => d.footprint(),
        Storage::Diagonal(d) => d.footprint(),
        Storage::Opaque => None,
    }
}

/// How an operation reads an operand relative to the destination index it is
/// writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Element `(r, c)` of the operand is read only to produce `(r, c)`.
    Elementwise,
    /// Element `(c, r)` is read to produce `(r, c)`.
    Transposed,
    /// Whole rows or columns are read to produce one element.
    Reduction,
}

/// Outcome of alias resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Write the destination in place.
    Direct,
    /// Compute into a temporary of the destination's shape, then copy back.
    Isolated,
}

/// Decide whether `dest` can be written directly while `operands` are read.
///
/// `Access::Elementwise` is upgraded to `Access::Transposed` for operands seen
/// through a transposing view. A destination identical to an operand is safe
/// only for element-wise access; any partial overlap requires isolation.
/// Operands without raw storage are assumed not to alias.
pub fn resolve(dest: &dyn CMatrix, operands: &[(&dyn CMatrix, Access)]) -> Resolution {
    let Some(dest_fp) = footprint_of(dest) else {
        return Resolution::Direct;
    };
    for &(operand, access) in operands {
        let Some(fp) = footprint_of(operand) else {
            continue;
        };
        let (_, op) = untranspose(operand);
        let access = match access {
            Access::Elementwise if op.swaps_dims() => Access::Transposed,
            other => other,
        };
        if dest_fp.identical(&fp) {
            if access != Access::Elementwise {
                return Resolution::Isolated;
            }
        } else if conflicts(&dest_fp, &fp) {
            return Resolution::Isolated;
        }
    }
    Resolution::Direct
}

#[cfg(not(feature = "blas"))]
fn conflicts(dest: &Footprint<'_>, operand: &Footprint<'_>) -> bool {
    dest.overlaps(operand)
}

#[cfg(feature = "blas")]
fn conflicts(dest: &Footprint<'_>, operand: &Footprint<'_>) -> bool {
    dest.spans_meet(operand)
}

/// Whether `a` and `b` are backed by exactly the same storage window.
pub fn same_storage(a: &dyn CMatrix, b: &dyn CMatrix) -> bool {
    match (footprint_of(a), footprint_of(b)) {
        (Some(fa), Some(fb)) => fa.identical(&fb),
        _ => false,
    }
}
