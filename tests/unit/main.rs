//! Integration tests, organized by module:
//! - `scan` - hashed diagonal scanning against naive references
//! - `stats` - Poisson gating behavior on random sequences
//! - `align` - alignment and region scoring
//! - `engine` - restriction-site search on realistic sequences

mod align;
mod engine;
mod helpers;
mod scan;
mod stats;
