//! Scrolling spectrum history.
//!
//! Keeps a fixed grid of bar heights where row 0 is the most recent time
//! slice and the last row the oldest. Every update shifts the grid back by
//! one row and writes a fresh row computed from the host's frequency data.

/// Number of bars along each axis of the grid (time rows and frequency columns).
pub const NUM_BARS: usize = 16;

/// Height written to every column of the new row when the frequency data is unusable.
pub const SENTINEL_HEIGHT: f32 = -1.0;

/// Errors reported by [`SpectrumHistory::update`].
///
/// These are non-fatal: the grid is still shifted and filled with sentinel
/// heights, so rendering carries on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    #[error("received {got} frequency samples but at least {needed} are required")]
    InsufficientFrequencyData { got: usize, needed: usize },
}

/// Flat row-major grid of bar heights with an explicit row stride.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightGrid {
    rows: usize,
    cols: usize,
    cells: Vec<f32>,
}

impl Default for HeightGrid {
    fn default() -> Self {
        Self::new(NUM_BARS, NUM_BARS)
    }
}

impl HeightGrid {
    /// Create a zero-filled grid.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn new(rows: usize, cols: usize) -> Self {
        assert!(rows > 0 && cols > 0, "grid dimensions must be non-zero");
        Self {
            rows,
            cols,
            cells: vec![0.0; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Height at `(row, col)`, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        self.index(row, col).map(|i| self.cells[i])
    }

    /// Mutable access to the height at `(row, col)`.
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut f32> {
        let i = self.index(row, col)?;
        Some(&mut self.cells[i])
    }

    /// One time slice.
    pub fn row(&self, row: usize) -> Option<&[f32]> {
        (row < self.rows).then(|| &self.cells[row * self.cols..(row + 1) * self.cols])
    }

    fn row_mut(&mut self, row: usize) -> &mut [f32] {
        &mut self.cells[row * self.cols..(row + 1) * self.cols]
    }

    /// Iterate `(row, col, height)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, f32)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &h)| (i / cols, i % cols, h))
    }

    /// Reset every cell to zero.
    pub fn clear(&mut self) {
        self.cells.fill(0.0);
    }

    /// Move every row one slot older, discarding the oldest.
    ///
    /// Row 0 keeps its previous contents until the caller overwrites it.
    pub fn shift_rows(&mut self) {
        let stride = self.cols;
        let len = self.cells.len();
        self.cells.copy_within(0..len - stride, stride);
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then_some(row * self.cols + col)
    }
}

/// Height grid updated once per audio callback.
#[derive(Debug, Clone, Default)]
pub struct SpectrumHistory {
    grid: HeightGrid,
}

impl SpectrumHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// History with custom grid dimensions.
    pub fn with_dimensions(rows: usize, cols: usize) -> Self {
        Self {
            grid: HeightGrid::new(rows, cols),
        }
    }

    pub fn grid(&self) -> &HeightGrid {
        &self.grid
    }

    /// Zero the whole grid.
    pub fn reset(&mut self) {
        self.grid.clear();
    }

    /// Number of frequency samples summed into each column for an input of `freq_len`.
    pub fn bucket_size(&self, freq_len: usize) -> usize {
        freq_len / self.grid.cols()
    }

    /// Shift the history and insert a row built from `magnitudes`.
    ///
    /// The magnitudes are split into one contiguous bucket per column and each
    /// bucket is summed (not averaged). Trailing samples that do not fill a
    /// whole bucket are ignored. With fewer samples than columns the new row
    /// is filled with [`SENTINEL_HEIGHT`] and an error is returned.
    pub fn update(&mut self, magnitudes: &[f32]) -> Result<(), HistoryError> {
        self.grid.shift_rows();

        let cols = self.grid.cols();
        if magnitudes.len() < cols {
            self.grid.row_mut(0).fill(SENTINEL_HEIGHT);
            return Err(HistoryError::InsufficientFrequencyData {
                got: magnitudes.len(),
                needed: cols,
            });
        }

        let bucket = self.bucket_size(magnitudes.len());
        let newest = self.grid.row_mut(0);
        for (cell, chunk) in newest.iter_mut().zip(magnitudes.chunks_exact(bucket)) {
            *cell = chunk.iter().fold(0.0, |acc, &m| acc + m);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_moves_rows_back() {
        let mut grid = HeightGrid::new(3, 2);
        *grid.get_mut(0, 0).unwrap() = 1.0;
        *grid.get_mut(1, 1).unwrap() = 2.0;
        grid.shift_rows();

        assert_eq!(grid.get(1, 0), Some(1.0));
        assert_eq!(grid.get(2, 1), Some(2.0));
        // Row 0 keeps its old contents until overwritten
        assert_eq!(grid.get(0, 0), Some(1.0));
    }

    #[test]
    fn test_out_of_bounds_access() {
        let grid = HeightGrid::default();
        assert_eq!(grid.get(NUM_BARS, 0), None);
        assert_eq!(grid.get(0, NUM_BARS), None);
        assert!(grid.row(NUM_BARS).is_none());
    }

    #[test]
    fn test_sums_buckets_without_averaging() {
        let mut history = SpectrumHistory::new();
        history.update(&vec![1.0; 256]).unwrap();

        assert_eq!(history.grid().row(0).unwrap(), &[16.0; NUM_BARS]);
        for row in 1..NUM_BARS {
            assert_eq!(history.grid().row(row).unwrap(), &[0.0; NUM_BARS]);
        }
    }

    #[test]
    fn test_remainder_samples_ignored() {
        let mut history = SpectrumHistory::new();
        // 2 samples per bucket, 3 trailing samples dropped
        let mut input = vec![1.0; 32];
        input.extend_from_slice(&[100.0; 3]);
        history.update(&input).unwrap();

        assert_eq!(history.grid().row(0).unwrap(), &[2.0; NUM_BARS]);
    }

    #[test]
    fn test_short_input_writes_sentinel() {
        let mut history = SpectrumHistory::new();
        history.update(&vec![1.0; 256]).unwrap();

        let err = history.update(&[1.0; 4]).unwrap_err();
        assert_eq!(err, HistoryError::InsufficientFrequencyData { got: 4, needed: NUM_BARS });
        assert_eq!(history.grid().row(0).unwrap(), &[SENTINEL_HEIGHT; NUM_BARS]);
        assert_eq!(history.grid().row(1).unwrap(), &[16.0; NUM_BARS]);
    }

    #[test]
    fn test_reset_zeroes_grid() {
        let mut history = SpectrumHistory::new();
        history.update(&[3.0; 64]).unwrap();
        history.reset();
        assert!(history.grid().cells().all(|(_, _, h)| h == 0.0));
    }
}
