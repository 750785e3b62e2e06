//! Bit layout constants for the LEB128 and packed DATETIME formats

/// High bit of every LEB128 byte: set when more bytes follow
pub const CONTINUATION_BIT: u8 = 0x80;

/// Low 7 payload bits of a LEB128 byte
pub const PAYLOAD_MASK: u8 = 0x7F;

/// Bit 6 of the terminating byte carries the sign in signed mode
pub const SIGN_BIT: u8 = 0x40;

pub const PAYLOAD_BITS: u32 = 7;

/// Longest encodings of the fixed-width fast paths
pub const MAX_U64_LEN: usize = 10;
pub const MAX_I64_LEN: usize = 10;

/// Packed DATETIME is always 40 bits
pub const PACKED_DATETIME_LEN: usize = 5;

//  1 bit  sign           (1 = non-negative)
// 17 bits year*13+month
//  5 bits day
//  5 bits hour
//  6 bits minute
//  6 bits second
pub const DATETIME_SIGN_SHIFT: u32 = 39;
pub const DATETIME_YEAR_MONTH_SHIFT: u32 = 22;
pub const DATETIME_DAY_SHIFT: u32 = 17;
pub const DATETIME_HOUR_SHIFT: u32 = 12;
pub const DATETIME_MINUTE_SHIFT: u32 = 6;

pub const DATETIME_YEAR_MONTH_MASK: u64 = 0x1FFFF;
pub const DATETIME_DAY_MASK: u64 = 0x1F;
pub const DATETIME_HOUR_MASK: u64 = 0x1F;
pub const DATETIME_MINUTE_MASK: u64 = 0x3F;
pub const DATETIME_SECOND_MASK: u64 = 0x3F;

/// Months per year in the `year*13+month` field; month 0 is a valid slot
pub const MONTHS_PER_YEAR_SLOT: u64 = 13;
