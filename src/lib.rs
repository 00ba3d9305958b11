//! Approximate sequence matching for read processing: hashed diagonal
//! scanning with a Poisson significance gate, global alignment with packed
//! traceback, and drivers for vector clipping, contamination screening, and
//! restriction-site search.

pub mod align;
pub mod alphabet;
pub mod engine;
pub mod error;
pub mod hash;
pub mod scan;
pub mod stats;

pub use error::{Error, Result};
