#![allow(non_snake_case)]
pub mod cli;
mod error;
pub mod gemm;
mod harness;
mod matrix;
pub mod probe;
pub mod reduce;
mod workload;

pub use error::*;
pub use gemm::{multiply, MatmulConfig, Version, PRINT_LIMIT};
pub use harness::*;
pub use matrix::*;
pub use reduce::SumConfig;
pub use workload::*;
