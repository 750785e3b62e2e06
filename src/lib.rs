//! byteme: compact binary encodings.
//!
//! * [`varint`]: LEB128 for signed and unsigned integers of any width.
//! * [`datetime`]: the 5-byte packed DATETIME of the MySQL client protocol.
//! * [`io`]: read/write adapters over `std::io` and tokio streams.

pub mod constants;
pub mod datetime;
pub mod error;
pub mod io;
pub mod varint;

pub use error::CodecError;

pub use chrono::NaiveDateTime;
pub use num_bigint::BigInt;
