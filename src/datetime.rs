//! MySQL packed DATETIME: calendar fields squeezed into 40 big-endian bits.
//!
//! The layout has no room for validation. Fields wider than their bit budget
//! (day > 31, second > 63, ...) spill into their neighbours on encode instead
//! of failing; that is how the wire format behaves and it is preserved here.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, trace};

use crate::constants::*;
use crate::error::CodecError;

/// Raw calendar fields as stored on the wire.
///
/// Unlike `NaiveDateTime` this accepts zero and partial dates such as
/// `0000-00-00 00:00:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PackedFields {
    pub year: u32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl PackedFields {
    pub fn to_datetime(&self) -> Result<NaiveDateTime, CodecError> {
        NaiveDate::from_ymd_opt(self.year as i32, self.month, self.day)
            .and_then(|date| date.and_hms_opt(self.hour, self.minute, self.second))
            .ok_or_else(|| {
                error!("Fields {:?} do not form a calendar value", self);
                CodecError::InvalidCalendarValue {
                    year: self.year,
                    month: self.month,
                    day: self.day,
                    hour: self.hour,
                    minute: self.minute,
                    second: self.second,
                }
            })
    }
}

impl From<&NaiveDateTime> for PackedFields {
    /// Sub-second precision is dropped. Years before 0 wrap and corrupt the
    /// packed value like any other out-of-range field.
    fn from(dt: &NaiveDateTime) -> Self {
        Self {
            year: dt.year() as u32,
            month: dt.month(),
            day: dt.day(),
            hour: dt.hour(),
            minute: dt.minute(),
            second: dt.second(),
        }
    }
}

/// Pack a calendar value into 5 bytes.
///
/// Out-of-range fields are not rejected; see the module docs.
pub fn encode(dt: &NaiveDateTime) -> [u8; PACKED_DATETIME_LEN] {
    encode_fields(&PackedFields::from(dt))
}

pub fn encode_fields(fields: &PackedFields) -> [u8; PACKED_DATETIME_LEN] {
    let year_month = fields.year as u64 * MONTHS_PER_YEAR_SLOT + fields.month as u64;

    let n = (1u64 << DATETIME_SIGN_SHIFT)
        | (year_month << DATETIME_YEAR_MONTH_SHIFT)
        | ((fields.day as u64) << DATETIME_DAY_SHIFT)
        | ((fields.hour as u64) << DATETIME_HOUR_SHIFT)
        | ((fields.minute as u64) << DATETIME_MINUTE_SHIFT)
        | fields.second as u64;

    let mut buf = [0u8; PACKED_DATETIME_LEN];
    buf.copy_from_slice(&n.to_be_bytes()[8 - PACKED_DATETIME_LEN..]);

    debug!("Encoded packed datetime {:?}", fields);
    trace!("Packed datetime bytes: {:?}", buf);
    buf
}

/// Unpack 5 bytes into a calendar value.
///
/// Zero and partial dates fail with `InvalidCalendarValue`; use
/// [`decode_fields`] to read them.
pub fn decode(buf: &[u8]) -> Result<NaiveDateTime, CodecError> {
    decode_fields(buf)?.to_datetime()
}

pub fn decode_fields(buf: &[u8]) -> Result<PackedFields, CodecError> {
    if buf.len() != PACKED_DATETIME_LEN {
        error!("Packed datetime must be {} bytes, got {}", PACKED_DATETIME_LEN, buf.len());
        return Err(CodecError::InvalidLength {
            expected: PACKED_DATETIME_LEN,
            actual: buf.len(),
        });
    }

    let mut wide = [0u8; 8];
    wide[8 - PACKED_DATETIME_LEN..].copy_from_slice(buf);
    // The sign bit rides along in `n` but is never interpreted.
    let n = u64::from_be_bytes(wide);

    let year_month = (n >> DATETIME_YEAR_MONTH_SHIFT) & DATETIME_YEAR_MONTH_MASK;
    let fields = PackedFields {
        year: (year_month / MONTHS_PER_YEAR_SLOT) as u32,
        month: (year_month % MONTHS_PER_YEAR_SLOT) as u32,
        day: ((n >> DATETIME_DAY_SHIFT) & DATETIME_DAY_MASK) as u32,
        hour: ((n >> DATETIME_HOUR_SHIFT) & DATETIME_HOUR_MASK) as u32,
        minute: ((n >> DATETIME_MINUTE_SHIFT) & DATETIME_MINUTE_MASK) as u32,
        second: (n & DATETIME_SECOND_MASK) as u32,
    };

    debug!("Decoded packed datetime {:?}", fields);
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d).unwrap().and_hms_opt(h, mi, s).unwrap()
    }

    #[test]
    fn known_value() {
        // SYYYYYYY YYYYYYYY YYDDDDDH HHHHMMMM MMSSSSSS
        let expected = [0b1001_1001, 0b1001_0100, 0b0000_1010, 0b0001_0000, 0b1000_0011];
        let value = dt(2014, 10, 5, 1, 2, 3);
        assert_eq!(encode(&value), expected);
        assert_eq!(decode(&expected).unwrap(), value);
    }

    #[test]
    fn sign_bit_always_set() {
        let bytes = encode_fields(&PackedFields::default());
        assert_eq!(bytes, [0x80, 0x00, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn zero_date_only_via_fields() {
        let bytes = encode_fields(&PackedFields::default());
        assert_eq!(decode_fields(&bytes).unwrap(), PackedFields::default());
        assert!(matches!(
            decode(&bytes),
            Err(CodecError::InvalidCalendarValue { month: 0, day: 0, .. })
        ));
    }

    #[test]
    fn subseconds_are_dropped() {
        let value = NaiveDate::from_ymd_opt(2020, 2, 29)
            .unwrap()
            .and_hms_milli_opt(23, 59, 59, 999)
            .unwrap();
        assert_eq!(decode(&encode(&value)).unwrap(), dt(2020, 2, 29, 23, 59, 59));
    }

    #[test]
    fn rejects_wrong_lengths() {
        for len in [0usize, 4, 6, 8] {
            let buf = vec![0x80; len];
            assert!(matches!(
                decode_fields(&buf),
                Err(CodecError::InvalidLength { expected: 5, actual }) if actual == len
            ));
        }
    }

    #[test]
    fn oversized_second_spills_into_minute() {
        let fields = PackedFields { year: 2000, month: 1, day: 1, hour: 0, minute: 0, second: 64 };
        let back = decode_fields(&encode_fields(&fields)).unwrap();
        assert_eq!(back.minute, 1);
        assert_eq!(back.second, 0);
    }

    #[test]
    fn hour_field_reads_five_bits() {
        // Hours above 23 survive the 5-bit field but not the calendar.
        let fields = PackedFields { year: 1999, month: 12, day: 31, hour: 31, minute: 0, second: 0 };
        let bytes = encode_fields(&fields);
        assert_eq!(decode_fields(&bytes).unwrap(), fields);
        assert!(matches!(decode(&bytes), Err(CodecError::InvalidCalendarValue { hour: 31, .. })));
    }
}
