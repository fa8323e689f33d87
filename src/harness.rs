#![allow(non_snake_case)]
use std::time::{Duration, Instant};

use num_traits::Float;

use crate::Matrix;

/// A value together with the wall-clock time it took to produce.
#[derive(Debug, derive_new::new)]
pub struct Timed<T> {
    pub value: T,
    pub elapsed: Duration,
}

impl<T> Timed<T> {
    pub fn millis(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1e3
    }
}

pub fn time<T>(f: impl FnOnce() -> T) -> Timed<T> {
    let start = Instant::now();
    let value = f();
    Timed::new(value, start.elapsed())
}

///Naive reference: `C[i][j] = sum_k A[i][k] * B[k][j]`, computed from scratch.
pub fn mm_ref<F: Float>(A: &Matrix<F>, B: &Matrix<F>) -> Matrix<F> {
    let n = A.dim();
    Matrix::from_fn(n, |i, j| {
        let mut res = F::zero();
        for k in 0..n {
            res = res + A.get(i, k) * B.get(k, j);
        }
        res
    })
}

///Independent reference product computed by `matrixmultiply`.
pub fn reference_multiply(A: &Matrix<f64>, B: &Matrix<f64>) -> Matrix<f64> {
    let n = A.dim();
    let mut C = Matrix::zeros(n);
    if n == 0 {
        return C;
    }
    let rs = n as isize;
    // SAFETY: all three buffers hold n*n elements laid out row-major with row stride n.
    unsafe {
        matrixmultiply::dgemm(
            n,
            n,
            n,
            1.0,
            A.as_slice().as_ptr(),
            rs,
            1,
            B.as_slice().as_ptr(),
            rs,
            1,
            0.0,
            C.as_mut_slice().as_mut_ptr(),
            rs,
            1,
        );
    }
    C
}

///Largest `|got - want| / |want|` over the two buffers; exact zeros compare absolutely.
pub fn max_relative_error<F: Float>(got: &[F], want: &[F]) -> F {
    assert_eq!(got.len(), want.len());
    let mut mre = F::zero();
    for (&g, &w) in got.iter().zip(want) {
        let diff = (g - w).abs();
        let err = if w == F::zero() { diff } else { diff / w.abs() };
        if err > mre {
            mre = err;
        }
    }
    mre
}

///Compares a kernel result against the `matrixmultiply` product and logs the error.
pub fn verify(A: &Matrix<f64>, B: &Matrix<f64>, C: &Matrix<f64>) -> f64 {
    let expected = reference_multiply(A, B);
    let mre = max_relative_error(C.as_slice(), expected.as_slice());
    log::debug!("Max Relative Error: {}", mre);
    mre
}

pub fn gflops(n: usize, elapsed: Duration) -> f64 {
    let flops = 2.0 * (n as f64).powi(3);
    (flops / 1e9) / elapsed.as_secs_f64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_references_agree() {
        let _ = env_logger::builder().is_test(true).try_init();
        let A = Matrix::<f64>::from_fn(17, |i, j| (i as f64 - j as f64) * 0.25);
        let B = Matrix::<f64>::operand(17);
        let naive = mm_ref(&A, &B);
        let fast = reference_multiply(&A, &B);
        assert!(max_relative_error(naive.as_slice(), fast.as_slice()) < 1e-12);
        assert!(verify(&A, &B, &naive) < 1e-12);
    }

    #[test]
    fn test_relative_error() {
        assert_eq!(max_relative_error(&[1.0f64, 0.0], &[1.0, 0.0]), 0.0);
        let err = max_relative_error(&[101.0f64, 0.5], &[100.0, 0.0]);
        assert!((err - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_gflops() {
        let g = gflops(1000, Duration::from_secs(2));
        assert!((g - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_time_returns_value() {
        let t = time(|| 6 * 7);
        assert_eq!(t.value, 42);
        assert!(t.millis() >= 0.0);
    }
}
