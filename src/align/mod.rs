//! Global (local-ending) alignment with selectable traceback storage.

pub mod nw;
pub mod traceback;

pub use nw::{align, score_alignment, AlignConfig, Alignment, RegionScore, ScoreRegion};
pub use traceback::{TracebackDir, TracebackMatrix, TracebackStorage};
