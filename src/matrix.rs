use std::fmt;

use num_traits::Float;

/// Square `n x n` matrix stored row-major in one contiguous buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<F: Float> {
    n: usize,
    data: Vec<F>,
}

impl<F: Float> Matrix<F> {
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![F::zero(); n * n],
        }
    }

    pub fn from_fn(n: usize, f: impl Fn(usize, usize) -> F) -> Self {
        let mut data = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                data.push(f(i, j));
            }
        }
        Self { n, data }
    }

    ///Operand fill used by the lab: `A[i][j] = (i + 2) + (j + 3) + 5`.
    ///Deterministic, so every version multiplies the same inputs.
    pub fn operand(n: usize) -> Self {
        Self::from_fn(n, |i, j| cast((i + 2) + (j + 3) + 5))
    }

    pub fn dim(&self) -> usize {
        self.n
    }

    pub fn get(&self, i: usize, j: usize) -> F {
        self.data[i * self.n + j]
    }

    pub fn row(&self, i: usize) -> &[F] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[F]> {
        self.data.chunks(self.n.max(1))
    }

    pub fn as_slice(&self) -> &[F] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [F] {
        &mut self.data
    }
}

// usize -> float never fails for f32/f64; it only loses precision.
pub(crate) fn cast<F: Float>(v: usize) -> F {
    F::from(v).unwrap_or_else(F::nan)
}

/// Rows labelled from 1, values to two decimals, tab separated.
impl<F: Float + fmt::Display> fmt::Display for Matrix<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().enumerate() {
            write!(f, "Row {}:\t", i + 1)?;
            for v in row {
                write!(f, "{:.2}\t", v)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
