//! Memory-hierarchy latency probe.
//!
//! An array of `u32` is laid out as a singly linked cycle: entry `i` holds the
//! index of the next entry, `stride` elements further on, and the last entry of
//! the working set points back to 0. Chasing that chain makes every load depend
//! on the previous one, so the time per hop approximates the load latency of
//! whichever cache level the working set fits in.

use std::fmt;
use std::hint::black_box;
use std::io::{self, Write};
use std::mem::size_of;
use std::time::{Duration, Instant};

/// Smallest working set, in elements.
pub const ARRAY_MIN: usize = 4 * 1024;
/// Array capacity, in elements. Working sets stay strictly below it.
pub const ARRAY_MAX: usize = 30 * 1024 * 1024;
/// Wall-clock time spent chasing the chain for every (size, stride) cell.
pub const BUDGET: Duration = Duration::from_secs(20);
/// Reported latencies never drop below this many nanoseconds.
pub const FLOOR_NS: f64 = 0.1;
pub const ELEMENT_BYTES: usize = size_of::<u32>();

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    pub min_elements: usize,
    pub max_elements: usize,
    pub budget: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            min_elements: ARRAY_MIN,
            max_elements: ARRAY_MAX,
            budget: BUDGET,
        }
    }
}

impl ProbeConfig {
    /// `min_elements` must be a power of two no smaller than 2.
    pub fn new(min_elements: usize, max_elements: usize, budget: Duration) -> Self {
        assert!(
            min_elements >= 2 && min_elements.is_power_of_two(),
            "working sets must be powers of two, got {min_elements}"
        );
        Self {
            min_elements,
            max_elements,
            budget,
        }
    }

    /// `min, 2*min, 4*min, ...` while below `max_elements`.
    pub fn working_sets(&self) -> impl Iterator<Item = usize> {
        let max = self.max_elements;
        std::iter::successors(Some(self.min_elements), |&s| s.checked_mul(2))
            .take_while(move |&s| s < max)
    }

    /// Column labels span every stride up to half the array capacity.
    pub fn header_strides(&self) -> Vec<usize> {
        strides(self.max_elements)
    }
}

/// Power-of-two strides `1, 2, 4, ... <= size / 2`.
pub fn strides(size: usize) -> Vec<usize> {
    std::iter::successors(Some(1usize), |&s| s.checked_mul(2))
        .take_while(|&s| s <= size / 2)
        .collect()
}

/// Byte count rendered with the lab's B/K/M/G units.
pub fn label(bytes: usize) -> String {
    if bytes < 1_000 {
        format!("{bytes}B")
    } else if bytes < 1_000_000 {
        format!("{}K", bytes / 1024)
    } else if bytes < 1_000_000_000 {
        format!("{}M", bytes / 1_048_576)
    } else {
        format!("{}G", bytes / 1_073_741_824)
    }
}

/// The probe array, reused for every (size, stride) layout.
pub struct Chain {
    x: Vec<u32>,
}

impl Chain {
    pub fn with_capacity(elements: usize) -> Self {
        Self {
            x: vec![0; elements],
        }
    }

    pub fn capacity(&self) -> usize {
        self.x.len()
    }

    /// Lays out the cycle `0 -> stride -> 2*stride -> ... -> size - stride -> 0`.
    pub fn lay_out(&mut self, size: usize, stride: usize) {
        let mut index = 0;
        while index < size {
            self.x[index] = (index + stride) as u32;
            index += stride;
        }
        self.x[index - stride] = 0;
    }

    /// One measured step: walk the whole cycle `stride` times, `size` loads in total.
    #[inline(never)]
    pub fn step(&self, stride: usize) -> u32 {
        let x = &self.x;
        let mut next = 0u32;
        for _ in 0..stride {
            next = 0;
            loop {
                next = x[next as usize];
                if next == 0 {
                    break;
                }
            }
        }
        next
    }
}

/// The same loop shape as [`Chain::step`] without the loads.
#[inline(never)]
fn empty_step(size: usize, stride: usize) -> usize {
    let mut index = 0;
    for _ in 0..stride {
        index = 0;
        loop {
            index = black_box(index + stride);
            if index >= size {
                break;
            }
        }
    }
    index
}

/// Average nanoseconds per load for one cell, loop overhead subtracted, floored at [`FLOOR_NS`].
pub fn measure(chain: &Chain, size: usize, stride: usize, budget: Duration) -> f64 {
    let mut steps = 0u64;
    let start = Instant::now();
    let measured = loop {
        black_box(chain.step(stride));
        steps += 1;
        let elapsed = start.elapsed();
        if elapsed >= budget {
            break elapsed;
        }
    };

    let mut tsteps = 0u64;
    let start = Instant::now();
    let overhead = loop {
        black_box(empty_step(size, stride));
        tsteps += 1;
        let elapsed = start.elapsed();
        if tsteps >= steps {
            break elapsed;
        }
    };

    let sec = measured.as_secs_f64() - overhead.as_secs_f64();
    let loadtime = (sec * 1e9) / (steps as f64 * size as f64);
    log::debug!(
        "size={} stride={} steps={} measured={:?} overhead={:?} -> {:.3} ns",
        size,
        stride,
        steps,
        measured,
        overhead,
        loadtime
    );
    floor(loadtime)
}

fn floor(loadtime: f64) -> f64 {
    if loadtime < FLOOR_NS || loadtime.is_nan() {
        FLOOR_NS
    } else {
        loadtime
    }
}

/// Measured latencies: one row per working set, one value per stride.
#[derive(Debug, Clone, PartialEq)]
pub struct LatencyGrid {
    pub strides: Vec<usize>,
    pub rows: Vec<(usize, Vec<f64>)>,
}

impl LatencyGrid {
    fn new(strides: Vec<usize>) -> Self {
        Self {
            strides,
            rows: Vec::new(),
        }
    }

    fn header(&self) -> String {
        let mut line = String::from(" ,");
        for &stride in &self.strides {
            line.push_str(&label(stride * ELEMENT_BYTES));
            line.push(',');
        }
        line
    }

    fn row(size: usize, values: &[f64]) -> String {
        let mut line = label(size * ELEMENT_BYTES);
        line.push(',');
        for v in values {
            line.push_str(&format!("{v:.1},"));
        }
        line
    }
}

impl fmt::Display for LatencyGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header())?;
        for (size, values) in &self.rows {
            writeln!(f, "{}", Self::row(*size, values))?;
        }
        Ok(())
    }
}

/// Runs the full sweep, writing each CSV row to `out` as soon as it is measured.
pub fn run<W: Write>(config: &ProbeConfig, out: &mut W) -> io::Result<LatencyGrid> {
    log::info!(
        "probing working sets {}..{} elements, {:?} per cell",
        config.min_elements,
        config.max_elements,
        config.budget
    );
    let mut chain = Chain::with_capacity(config.max_elements);
    let mut grid = LatencyGrid::new(config.header_strides());
    writeln!(out, "{}", grid.header())?;
    out.flush()?;

    for size in config.working_sets() {
        let values: Vec<f64> = strides(size)
            .into_iter()
            .map(|stride| {
                chain.lay_out(size, stride);
                measure(&chain, size, stride, config.budget)
            })
            .collect();
        writeln!(out, "{}", LatencyGrid::row(size, &values))?;
        out.flush()?;
        log::info!("finished working set {}", label(size * ELEMENT_BYTES));
        grid.rows.push((size, values));
    }
    Ok(grid)
}
