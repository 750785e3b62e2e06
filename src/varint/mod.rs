//! LEB128 variable-length integers.
//!
//! Values are arbitrary precision (`BigInt`); `u64`/`i64` helpers are layered
//! on top and fail with `Overflow` past 64 bits. See
//! <https://en.wikipedia.org/wiki/LEB128> for the format.

pub mod decoder;
pub mod encoder;

pub use decoder::*;
pub use encoder::*;
