//! Reader/writer adapters over the pure codecs.
//!
//! `blocking` works with `std::io`, `nonblocking` with tokio's async traits.
//! Both leave the source positioned right after the value they read.

pub mod blocking;
pub mod nonblocking;

pub use blocking::*;
