//! `array_sum <array_size> <seed>`: sequential sum of a seeded random array.
use std::process::ExitCode;

use archlab::cli::{parse_sum, ARRAY_SUM_USAGE};
use archlab::reduce;

fn main() -> ExitCode {
    let _ = env_logger::builder().try_init();

    match parse_sum(std::env::args_os()) {
        Ok(config) => {
            print!("{}", reduce::run(config));
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("{}", ARRAY_SUM_USAGE);
            println!("{}", e);
            ExitCode::from(1)
        }
    }
}
