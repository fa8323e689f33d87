#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandCount(pub usize); //Number of row bands handed to the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandSize(pub usize); //Rows of C owned by one band

///The Workload represents the entire multiply, split into disjoint row bands of C.
///Each band is written by exactly one worker, so no synchronisation is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Workload {
    count: BandCount,
    size: BandSize,
}

impl Workload {
    pub fn new(count: BandCount, size: BandSize) -> Self {
        Self { count, size }
    }

    pub fn count(&self) -> &BandCount {
        &self.count
    }

    pub fn size(&self) -> &BandSize {
        &self.size
    }

    pub fn ceil(num: usize, div: usize) -> usize {
        (num + div - 1) / div
    }

    ///Given a number of rows and a number of workers,
    ///give each worker one contiguous band of at most ceil(rows / threads) rows.
    pub fn for_rows(rows: usize, threads: usize) -> Self {
        let threads = threads.max(1);
        let band = Self::ceil(rows, threads).max(1);
        Self::new(BandCount(Self::ceil(rows, band)), BandSize(band))
    }

    ///Number of matrix elements in one band of an `n`-wide matrix.
    pub fn band_len(&self, n: usize) -> usize {
        self.size.0 * n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_cover_all_rows() {
        for rows in [1, 2, 7, 15, 64, 1000] {
            for threads in [1, 2, 3, 8, 64] {
                let w = Workload::for_rows(rows, threads);
                assert!(w.count().0 * w.size().0 >= rows);
                assert!((w.count().0 - 1) * w.size().0 < rows);
                assert!(w.count().0 <= threads);
            }
        }
    }

    #[test]
    fn zero_rows_has_no_bands() {
        let w = Workload::for_rows(0, 4);
        assert_eq!(w.count().0, 0);
        assert_eq!(w.size().0, 1);
    }

    #[test]
    fn band_len_scales_with_width() {
        let w = Workload::for_rows(10, 4);
        assert_eq!(w.size().0, 3);
        assert_eq!(w.band_len(10), 30);
    }
}
