mod common;

use approx::assert_relative_eq;
use cmat_rs::{
    CDense, CMatError, CMatrix, CMatrixMut, Complex64, DiagCDense, MatOp, MatViewMut, MatrixState,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::StandardNormal;

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

fn random(rng: &mut StdRng, rows: usize, cols: usize) -> CDense {
    CDense::from_fn(rows, cols, |_, _| {
        c(rng.sample(StandardNormal), rng.sample(StandardNormal))
    })
    .unwrap()
}

fn assert_matrix_eq(got: &dyn CMatrix, want: &dyn CMatrix) {
    assert_eq!(got.dims(), want.dims());
    let (rows, cols) = want.dims();
    for r in 0..rows {
        for col in 0..cols {
            let (g, w) = (got.at(r, col), want.at(r, col));
            assert_relative_eq!(g.re, w.re, epsilon = 1e-10);
            assert_relative_eq!(g.im, w.im, epsilon = 1e-10);
        }
    }
}

fn scenario_operands() -> (CDense, CDense) {
    let a = CDense::new(
        2,
        2,
        Some(vec![c(1.0, 1.0), c(0.0, 0.0), c(1.0, 0.0), c(0.0, 2.0)]),
    )
    .unwrap();
    let b = CDense::new(
        2,
        2,
        Some(vec![c(0.0, 0.0), c(0.0, 1.0), c(0.0, 0.0), c(3.0, 2.0)]),
    )
    .unwrap();
    (a, b)
}

#[test]
fn test_add_scenario() {
    let _guard = common::init_test_subscriber();
    let (a, b) = scenario_operands();
    let mut m = CDense::empty();
    m.add(&a, &b).unwrap();
    assert_eq!(
        m.to_vec(),
        vec![c(1.0, 1.0), c(0.0, 1.0), c(1.0, 0.0), c(3.0, 4.0)]
    );
}

#[test]
fn test_sub_into_first_operand() {
    let (mut a, b) = scenario_operands();
    let alias = a.share();
    a.sub(&alias, &b).unwrap();
    assert_eq!(
        a.to_vec(),
        vec![c(1.0, 1.0), c(0.0, -1.0), c(1.0, 0.0), c(-3.0, 0.0)]
    );
}

#[test]
fn test_mul_scenario() {
    let a = CDense::new(
        2,
        2,
        Some(vec![c(4.0, 1.0), c(0.0, 0.0), c(0.0, 0.0), c(0.0, 1.0)]),
    )
    .unwrap();
    let b = CDense::new(
        2,
        3,
        Some(vec![
            c(0.0, 4.0),
            c(0.0, 0.0),
            c(0.0, 0.0),
            c(0.0, 0.0),
            c(0.0, 0.0),
            c(4.0, 0.0),
        ]),
    )
    .unwrap();
    let mut m = CDense::empty();
    m.mul(&a, &b).unwrap();
    assert_eq!(m.dims(), (2, 3));
    assert_eq!(
        m.to_vec(),
        vec![
            c(-4.0, 16.0),
            c(0.0, 0.0),
            c(0.0, 0.0),
            c(0.0, 0.0),
            c(0.0, 0.0),
            c(0.0, 4.0)
        ]
    );
}

#[test]
fn test_scale_scenario() {
    let a = CDense::new(2, 2, Some(vec![c(0.0, 1.0); 4])).unwrap();
    let mut m = CDense::empty();
    m.scale(c(0.0, 1.0), &a).unwrap();
    assert_eq!(m.to_vec(), vec![c(-1.0, 0.0); 4]);
}

#[test]
fn test_add_is_commutative() {
    let mut rng = StdRng::seed_from_u64(42);
    let a = random(&mut rng, 5, 7);
    let b = random(&mut rng, 5, 7);
    let (mut ab, mut ba) = (CDense::empty(), CDense::empty());
    ab.add(&a, &b).unwrap();
    ba.add(&b, &a).unwrap();
    assert_eq!(ab.to_vec(), ba.to_vec());
}

#[test]
fn test_shape_invariant_and_mismatch() {
    let mut rng = StdRng::seed_from_u64(7);
    let a = random(&mut rng, 3, 4);
    let b = random(&mut rng, 3, 4);
    let mut m = CDense::empty();
    m.sub(&a, &b).unwrap();
    assert_eq!(m.dims(), a.dims());
    assert_eq!(m.dims(), b.dims());

    let wrong = random(&mut rng, 4, 3);
    assert!(matches!(
        m.add(&a, &wrong),
        Err(CMatError::ShapeMismatch(..))
    ));
    // a transposed view fixes the shape
    m.add(&a, &wrong.t()).unwrap();

    let mut fixed = CDense::zeros(2, 2).unwrap();
    assert!(matches!(
        fixed.add(&a, &b),
        Err(CMatError::ShapeMismatch(..))
    ));
    assert_eq!(fixed.dims(), (2, 2));
}

#[test]
fn test_scale_in_place_matches_copy() {
    let mut rng = StdRng::seed_from_u64(3);
    let k = c(rng.sample(StandardNormal), rng.sample(StandardNormal));
    let mut a = random(&mut rng, 4, 6);

    let mut tmp = CDense::empty();
    tmp.scale(k, &a).unwrap();
    let mut expected = CDense::empty();
    expected.copy_from(&tmp).unwrap();

    let alias = a.share();
    a.scale(k, &alias).unwrap();
    assert_matrix_eq(&a, &expected);
}

#[test]
fn test_scale_square_into_own_transpose() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut a = random(&mut rng, 5, 5);
    let mut snapshot = CDense::empty();
    snapshot.copy_from(&a).unwrap();

    let alias = a.share();
    a.scale(c(2.0, 0.0), &alias.h()).unwrap();
    for r in 0..5 {
        for col in 0..5 {
            assert_eq!(a.at(r, col), c(2.0, 0.0) * snapshot.at(col, r).conj());
        }
    }
}

#[test]
fn test_mul_transpose_without_materializing() {
    let mut rng = StdRng::seed_from_u64(42);
    let a = random(&mut rng, 6, 4);
    let b = random(&mut rng, 6, 3);

    let mut at = CDense::zeros(4, 6).unwrap();
    for r in 0..6 {
        for col in 0..4 {
            at.set(col, r, a.at(r, col));
        }
    }

    let (mut lazy, mut eager) = (CDense::empty(), CDense::empty());
    lazy.mul(&a.t(), &b).unwrap();
    eager.mul(&at, &b).unwrap();
    assert_matrix_eq(&lazy, &eager);

    let bh = CDense::from_fn(3, 6, |r, col| b.at(col, r).conj()).unwrap();
    let (mut lazy, mut eager) = (CDense::empty(), CDense::empty());
    lazy.mul(&b.h(), &a).unwrap();
    eager.mul(&bh, &a).unwrap();
    assert_eq!(lazy.dims(), (3, 4));
    assert_matrix_eq(&lazy, &eager);
}

#[test]
fn test_mul_into_overlapping_slice() {
    let mut rng = StdRng::seed_from_u64(5);
    let big = random(&mut rng, 4, 4);
    let a = big.slice(0..2, 0..2).unwrap();
    let b = big.slice(1..3, 1..3).unwrap();

    let mut expected = CDense::empty();
    expected.mul(&a, &b).unwrap();

    let mut dest = big.slice(0..2, 1..3).unwrap();
    dest.mul(&a, &b).unwrap();
    assert_matrix_eq(&dest, &expected);
}

#[test]
fn test_mul_diagonal_matches_dense() {
    let mut rng = StdRng::seed_from_u64(9);
    let a = random(&mut rng, 3, 5);
    let b = random(&mut rng, 5, 2);
    let d = DiagCDense::new(3, Some(vec![c(1.0, 0.0), c(0.0, 1.0), c(2.0, -1.0)])).unwrap();

    // a diagonal operand never reaches the GEMM kernel
    let mut dense_d = CDense::zeros(3, 3).unwrap();
    dense_d.copy_from(&d).unwrap();

    let mut via_gemm = CDense::empty();
    let mut tmp = CDense::empty();
    tmp.mul(&dense_d, &a).unwrap();
    via_gemm.mul(&tmp, &b).unwrap();

    let mut via_diag = CDense::empty();
    let mut tmp = CDense::empty();
    tmp.mul(&d, &a).unwrap();
    via_diag.mul(&tmp, &b).unwrap();

    assert_matrix_eq(&via_diag, &via_gemm);
}

#[test]
fn test_auto_resize() {
    let mut rng = StdRng::seed_from_u64(1);
    let a = random(&mut rng, 2, 3);
    let b = random(&mut rng, 3, 4);

    let mut m = CDense::empty();
    assert_eq!(m.state(), MatrixState::Unallocated);
    m.mul(&a, &b).unwrap();
    assert_eq!(m.dims(), (2, 4));
    assert_eq!(m.state(), MatrixState::Populated);

    // once sized, the receiver keeps its shape
    assert!(matches!(m.mul(&b, &b.t()), Err(CMatError::ShapeMismatch(..))));

    m.reset();
    m.mul(&b, &b.t()).unwrap();
    assert_eq!(m.dims(), (3, 3));
}

#[test]
fn test_zero_sized_receiver() {
    let a = CDense::zero_sized(0, 3).unwrap();
    let b = CDense::zero_sized(0, 3).unwrap();
    let mut m = CDense::zero_sized(0, 3).unwrap();
    m.add(&a, &b).unwrap();
    assert_eq!(m.state(), MatrixState::ZeroSized);
    assert_eq!(m.dims(), (0, 3));

    let mut other = CDense::zero_sized(3, 0).unwrap();
    assert!(other.add(&a, &b).is_err());
}

#[test]
fn test_reset_operand_is_rejected() {
    let a = CDense::empty();
    let b = CDense::zeros(1, 1).unwrap();
    let mut m = CDense::empty();
    assert!(matches!(m.add(&a, &b), Err(CMatError::ZeroLength)));
    assert!(matches!(m.mul(&b, &a.t()), Err(CMatError::ZeroLength)));
    assert!(m.is_empty());
}

#[test]
fn test_add_through_nested_mut_views_of_self() {
    // a = a^T + 0, with a^T reached through two stacked writable views
    let mut a = CDense::new(
        2,
        2,
        Some(vec![c(1.0, 0.0), c(2.0, 0.0), c(3.0, 0.0), c(4.0, 0.0)]),
    )
    .unwrap();
    let zeros = CDense::zeros(2, 2).unwrap();
    let mut alias = a.share();
    let mut t = MatViewMut::new(&mut alias, MatOp::Transpose);
    let outer = MatViewMut::new(&mut t, MatOp::Identity);

    a.add(&outer, &zeros).unwrap();
    assert_eq!(
        a.to_vec(),
        vec![c(1.0, 0.0), c(3.0, 0.0), c(2.0, 0.0), c(4.0, 0.0)]
    );
}

#[test]
fn test_mul_into_interleaved_column_block() {
    // left and right column blocks share rows of one buffer but no element
    let mut rng = StdRng::seed_from_u64(13);
    let big = random(&mut rng, 4, 4);
    let a = big.slice(0..4, 0..2).unwrap();
    let b = random(&mut rng, 2, 2);

    let mut expected = CDense::empty();
    expected.mul(&a, &b).unwrap();

    let mut dest = big.slice(0..4, 2..4).unwrap();
    dest.mul(&a, &b).unwrap();
    assert_matrix_eq(&dest, &expected);
}
