use num_traits::Float;
use rayon::prelude::*;

use crate::{ArgError, Matrix, Workload};

/// The four multiply kernels of the lab, numbered as on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Version {
    /// i-j-k order, one thread.
    Ijk = 1,
    /// i-k-j order, one thread.
    Ikj = 2,
    /// i-j-k order, rows of C spread over the pool.
    ParIjk = 3,
    /// i-k-j order, rows of C spread over the pool.
    ParIkj = 4,
}

impl Version {
    pub const ALL: [Version; 4] = [Self::Ijk, Self::Ikj, Self::ParIjk, Self::ParIkj];

    pub fn is_parallel(self) -> bool {
        matches!(self, Self::ParIjk | Self::ParIkj)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Ijk => "sequential ijk",
            Self::Ikj => "sequential ikj",
            Self::ParIjk => "parallel ijk",
            Self::ParIkj => "parallel ikj",
        }
    }
}

impl TryFrom<i64> for Version {
    type Error = ArgError;

    fn try_from(v: i64) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(Self::Ijk),
            2 => Ok(Self::Ikj),
            3 => Ok(Self::ParIjk),
            4 => Ok(Self::ParIkj),
            other => Err(ArgError::UnknownVersion(other)),
        }
    }
}

///Largest dimension for which the matrices are printed.
pub const PRINT_LIMIT: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_new::new)]
pub struct MatmulConfig {
    pub n: usize,
    pub version: Version,
    ///Already combined with the size limit.
    pub print: bool,
}

//C_row[j] += sum_k A_row[k] * B[k][j], k innermost.
#[inline]
fn ijk_row<F: Float>(A_row: &[F], B: &[F], C_row: &mut [F], n: usize) {
    for j in 0..n {
        let mut acc = C_row[j];
        for k in 0..n {
            acc = acc + A_row[k] * B[k * n + j];
        }
        C_row[j] = acc;
    }
}

//Same sum, j innermost: walks B and C rows contiguously.
#[inline]
fn ikj_row<F: Float>(A_row: &[F], B: &[F], C_row: &mut [F], n: usize) {
    for k in 0..n {
        let a = A_row[k];
        let B_row = &B[k * n..(k + 1) * n];
        for j in 0..n {
            C_row[j] = C_row[j] + a * B_row[j];
        }
    }
}

fn check_dims<F: Float>(A: &Matrix<F>, B: &Matrix<F>, C: &Matrix<F>) -> usize {
    let n = A.dim();
    assert_eq!(B.dim(), n, "B must be {n}x{n}");
    assert_eq!(C.dim(), n, "C must be {n}x{n}");
    n
}

fn sequential<F: Float>(
    A: &Matrix<F>,
    B: &Matrix<F>,
    C: &mut Matrix<F>,
    row_kernel: fn(&[F], &[F], &mut [F], usize),
) {
    let n = check_dims(A, B, C);
    if n == 0 {
        return;
    }
    let B = B.as_slice();
    for (i, C_row) in C.as_mut_slice().chunks_mut(n).enumerate() {
        row_kernel(A.row(i), B, C_row, n);
    }
}

fn parallel<F: Float + Send + Sync>(
    A: &Matrix<F>,
    B: &Matrix<F>,
    C: &mut Matrix<F>,
    workload: &Workload,
    row_kernel: fn(&[F], &[F], &mut [F], usize),
) {
    let n = check_dims(A, B, C);
    if n == 0 {
        return;
    }
    let B = B.as_slice();
    let band_rows = workload.size().0;
    C.as_mut_slice()
        .par_chunks_mut(workload.band_len(n))
        .enumerate()
        .for_each(|(band, C_band)| {
            let row0 = band * band_rows;
            for (r, C_row) in C_band.chunks_mut(n).enumerate() {
                row_kernel(A.row(row0 + r), B, C_row, n);
            }
        });
}

///Version 1: `C += A * B`, i-j-k loop order.
pub fn gemm_1<F: Float>(A: &Matrix<F>, B: &Matrix<F>, C: &mut Matrix<F>) {
    sequential(A, B, C, ijk_row);
}

///Version 2: `C += A * B`, i-k-j loop order.
pub fn gemm_2<F: Float>(A: &Matrix<F>, B: &Matrix<F>, C: &mut Matrix<F>) {
    sequential(A, B, C, ikj_row);
}

///Version 3: i-j-k order with the rows of C split into bands per `workload`.
pub fn gemm_3<F: Float + Send + Sync>(
    A: &Matrix<F>,
    B: &Matrix<F>,
    C: &mut Matrix<F>,
    workload: &Workload,
) {
    parallel(A, B, C, workload, ijk_row);
}

///Version 4: i-k-j order with the rows of C split into bands per `workload`.
pub fn gemm_4<F: Float + Send + Sync>(
    A: &Matrix<F>,
    B: &Matrix<F>,
    C: &mut Matrix<F>,
    workload: &Workload,
) {
    parallel(A, B, C, workload, ikj_row);
}

///Runs one kernel. Parallel versions partition over `threads` workers of the rayon pool.
pub fn multiply<F: Float + Send + Sync>(
    version: Version,
    A: &Matrix<F>,
    B: &Matrix<F>,
    C: &mut Matrix<F>,
    threads: usize,
) {
    match version {
        Version::Ijk => gemm_1(A, B, C),
        Version::Ikj => gemm_2(A, B, C),
        Version::ParIjk | Version::ParIkj => {
            let workload = Workload::for_rows(A.dim(), threads);
            log::info!("workload: {:?}", workload);
            if version == Version::ParIjk {
                gemm_3(A, B, C, &workload)
            } else {
                gemm_4(A, B, C, &workload)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{max_relative_error, reference_multiply};

    fn run(version: Version, n: usize, threads: usize) -> Matrix<f64> {
        let A = Matrix::<f64>::operand(n);
        let B = Matrix::<f64>::operand(n);
        let mut C = Matrix::zeros(n);
        multiply(version, &A, &B, &mut C, threads);
        C
    }

    #[test]
    fn test_version_parse() {
        assert_eq!(Version::try_from(1i64), Ok(Version::Ijk));
        assert_eq!(Version::try_from(4i64), Ok(Version::ParIkj));
        assert_eq!(Version::try_from(5i64), Err(ArgError::UnknownVersion(5)));
        assert_eq!(Version::try_from(0i64), Err(ArgError::UnknownVersion(0)));
        assert!(!Version::Ikj.is_parallel());
        assert!(Version::ParIjk.is_parallel());
    }

    #[test]
    fn test_two_by_two_by_hand() {
        // A = B = [[10, 11], [11, 12]]
        let C = run(Version::Ijk, 2, 1);
        assert_eq!(C.as_slice(), &[221.0, 242.0, 242.0, 265.0]);
    }

    #[test]
    fn test_all_versions_match_reference() {
        let _ = env_logger::builder().is_test(true).try_init();
        for n in [1, 3, 16, 33, 100] {
            let A = Matrix::<f64>::operand(n);
            let B = Matrix::<f64>::operand(n);
            let expected = reference_multiply(&A, &B);
            for version in Version::ALL {
                for threads in [1, 3, 8] {
                    let C = run(version, n, threads);
                    let err = max_relative_error(C.as_slice(), expected.as_slice());
                    assert!(err < 1e-9, "{:?} n={n} threads={threads}: {err}", version);
                }
            }
        }
    }

    #[test]
    fn test_kernels_accumulate_into_c() {
        let n = 4;
        let A = Matrix::<f64>::operand(n);
        let B = Matrix::<f64>::operand(n);
        let once = run(Version::Ikj, n, 1);
        let mut C = once.clone();
        gemm_4(&A, &B, &mut C, &Workload::for_rows(n, 2));
        for (twice, single) in C.as_slice().iter().zip(once.as_slice()) {
            assert_eq!(*twice, 2.0 * single);
        }
    }

    #[test]
    fn test_more_threads_than_rows() {
        let C = run(Version::ParIjk, 3, 64);
        let expected = run(Version::Ijk, 3, 1);
        assert_eq!(C, expected);
    }

    #[test]
    fn test_empty_matrix() {
        for version in Version::ALL {
            let C = run(version, 0, 4);
            assert!(C.as_slice().is_empty());
        }
    }
}
