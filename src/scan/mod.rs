//! Diagonal scanning of a query against an indexed subject.

pub mod context;
pub mod diagonal;

pub use context::{CancelToken, ScanContext, Strand};
pub use diagonal::{
    diagonal_count, diagonal_index, diagonal_length, diagonal_start, DiagonalHit, Match,
    ScanConfig, ScanHits, ScanPolicy,
};
