//! Traceback direction storage for the dynamic-programming matrix.
//!
//! Two layouts behind one interface: `Compact` packs four cells per byte
//! (two bits per direction), keeping memory at a quarter byte per cell for
//! long alignments at the cost of shift/mask work on every access; `Fast`
//! spends a full byte per cell. Same traceback semantics either way.

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TracebackDir {
    /// Consume one character of each sequence (match or mismatch).
    Diag = 0,
    /// Consume a character of sequence 1, pad sequence 2.
    Down = 1,
    /// Consume a character of sequence 2, pad sequence 1.
    Across = 2,
}

#[inline(always)]
fn dir_from_bits(bits: u8) -> TracebackDir {
    match bits & 0x03 {
        0 => TracebackDir::Diag,
        1 => TracebackDir::Down,
        _ => TracebackDir::Across,
    }
}

/// Memory/speed tradeoff for the traceback matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TracebackStorage {
    /// Four cells per byte.
    Compact,
    /// One byte per cell.
    #[default]
    Fast,
}

enum Cells {
    Compact(Vec<u8>),
    Fast(Vec<u8>),
}

pub struct TracebackMatrix {
    cells: Cells,
    cols: usize,
}

impl TracebackMatrix {
    /// Allocate a `rows x cols` matrix. The backing store is quadratic in
    /// the sequence lengths, so allocation failure is reported rather than
    /// aborting.
    pub fn new(rows: usize, cols: usize, storage: TracebackStorage) -> Result<Self> {
        let cell_count = rows
            .checked_mul(cols)
            .ok_or(Error::AllocationFailure { bytes: usize::MAX })?;
        let bytes = match storage {
            TracebackStorage::Compact => cell_count.div_ceil(4),
            TracebackStorage::Fast => cell_count,
        };

        let mut data: Vec<u8> = Vec::new();
        data.try_reserve_exact(bytes)
            .map_err(|_| Error::AllocationFailure { bytes })?;
        data.resize(bytes, 0);

        let cells = match storage {
            TracebackStorage::Compact => Cells::Compact(data),
            TracebackStorage::Fast => Cells::Fast(data),
        };
        Ok(TracebackMatrix { cells, cols })
    }

    #[inline(always)]
    pub fn set(&mut self, row: usize, col: usize, dir: TracebackDir) {
        let idx = row * self.cols + col;
        match &mut self.cells {
            Cells::Compact(data) => {
                let shift = 2 * (idx & 3);
                let byte = &mut data[idx >> 2];
                *byte = (*byte & !(0x03 << shift)) | ((dir as u8) << shift);
            }
            Cells::Fast(data) => data[idx] = dir as u8,
        }
    }

    #[inline(always)]
    pub fn get(&self, row: usize, col: usize) -> TracebackDir {
        let idx = row * self.cols + col;
        match &self.cells {
            Cells::Compact(data) => dir_from_bits(data[idx >> 2] >> (2 * (idx & 3))),
            Cells::Fast(data) => dir_from_bits(data[idx]),
        }
    }
}
