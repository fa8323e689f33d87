//! Prints the load-latency grid (working-set size x stride) as CSV.
use std::io;
use std::process::ExitCode;

use archlab::probe::{self, ProbeConfig};

fn main() -> ExitCode {
    let _ = env_logger::builder().try_init();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match probe::run(&ProbeConfig::default(), &mut out) {
        Ok(grid) => {
            log::info!("measured {} working sets", grid.rows.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("cache_probe: {e}");
            ExitCode::FAILURE
        }
    }
}
