//! `matmul <N> <version> [<print>]`: time one of the four multiply kernels.
#![allow(non_snake_case)]
use std::process::ExitCode;

use archlab::cli::{parse_matmul, MATMUL_USAGE};
use archlab::{gflops, multiply, time, verify, MatmulConfig, Matrix};

fn run(config: MatmulConfig) {
    let n = config.n;
    let A = Matrix::<f64>::operand(n);
    let B = Matrix::<f64>::operand(n);
    let mut C = Matrix::<f64>::zeros(n);

    if config.print {
        println!("Matrix a[n][n]:");
        print!("{}", A);
        println!("Matrix b[n][n]:");
        print!("{}", B);
    }

    let cores = std::thread::available_parallelism()
        .map(|c| c.get())
        .unwrap_or(1);
    let threads = rayon::current_num_threads();
    println!("I have {} logical cores.", cores);
    println!("Running with {} threads", threads);

    log::info!("version {:?} ({}) n={}", config.version, config.version.name(), n);
    let runtime = time(|| multiply(config.version, &A, &B, &mut C, threads));

    if config.print {
        println!("Output matrix:");
        print!("{}", C);
    }
    println!(
        "Program runs in {:.2} seconds",
        runtime.elapsed.as_secs_f64()
    );
    log::info!("{:.3} GFLOPS", gflops(n, runtime.elapsed));

    if log::log_enabled!(log::Level::Debug) && n <= 512 {
        verify(&A, &B, &C);
    }
}

fn main() -> ExitCode {
    let _ = env_logger::builder().try_init();

    match parse_matmul(std::env::args_os()) {
        Ok(config) => {
            run(config);
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("{}", MATMUL_USAGE);
            println!("{}", e);
            ExitCode::from(1)
        }
    }
}
