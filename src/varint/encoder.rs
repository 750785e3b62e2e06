use num_bigint::{BigInt, Sign};
use num_traits::{One, Signed, Zero};
use tracing::{debug, error, trace};

use crate::constants::{
    CONTINUATION_BIT, MAX_I64_LEN, MAX_U64_LEN, PAYLOAD_BITS, PAYLOAD_MASK, SIGN_BIT,
};
use crate::error::CodecError;

/// Encode `value` as LEB128 into a fresh buffer.
///
/// Unsigned mode rejects negative values. Signed mode uses two's-complement
/// sign extension, so the sign is recoverable from bit 6 of the last byte.
pub fn encode<V: Into<BigInt>>(value: V, signed: bool) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    encode_into(value, signed, &mut out)?;
    Ok(out)
}

/// Append the LEB128 encoding of `value` to `out`, returning the number of
/// bytes written. Nothing is appended on error.
pub fn encode_into<V: Into<BigInt>>(
    value: V,
    signed: bool,
    out: &mut Vec<u8>,
) -> Result<usize, CodecError> {
    let mut value = value.into();

    if !signed && value.is_negative() {
        error!("Refusing unsigned encoding of {}", value);
        return Err(CodecError::InvalidArgument(
            "value cannot be negative for unsigned encoding".to_string(),
        ));
    }

    let start = out.len();
    loop {
        let byte = low_bits(&value);
        value >>= PAYLOAD_BITS;

        let last = if signed {
            is_signed_terminal(&value, byte)
        } else {
            value.is_zero()
        };

        trace!("Emitting byte {:#04x} (last={})", byte, last);
        if last {
            out.push(byte);
            break;
        }
        out.push(byte | CONTINUATION_BIT);
    }

    let written = out.len() - start;
    debug!("Encoded varint (signed={}) into {} bytes", signed, written);
    Ok(written)
}

/// Encoded length of `value` without producing the bytes.
pub fn encoded_len<V: Into<BigInt>>(value: V, signed: bool) -> Result<usize, CodecError> {
    let value = value.into();

    let payload_bits = match (signed, value.sign()) {
        (false, Sign::Minus) => {
            return Err(CodecError::InvalidArgument(
                "value cannot be negative for unsigned encoding".to_string(),
            ));
        }
        (false, _) => value.bits(),
        // One extra bit so bit 6 of the final byte reads as the sign.
        (true, Sign::Minus) => (-value - BigInt::one()).bits() + 1,
        (true, _) => value.bits() + 1,
    };

    let groups = payload_bits.div_ceil(PAYLOAD_BITS as u64).max(1);
    Ok(groups as usize)
}

/// Unsigned fast path; output is identical to `encode(value, false)`.
pub fn encode_u64(mut value: u64, out: &mut Vec<u8>) {
    out.reserve(MAX_U64_LEN);
    while value >= CONTINUATION_BIT as u64 {
        out.push((value as u8 & PAYLOAD_MASK) | CONTINUATION_BIT);
        value >>= PAYLOAD_BITS;
    }
    out.push(value as u8);
}

/// Signed fast path; output is identical to `encode(value, true)`.
pub fn encode_i64(mut value: i64, out: &mut Vec<u8>) {
    out.reserve(MAX_I64_LEN);
    loop {
        let byte = value as u8 & PAYLOAD_MASK;
        value >>= PAYLOAD_BITS;

        let last = match value {
            0 => byte & SIGN_BIT == 0,
            -1 => byte & SIGN_BIT != 0,
            _ => false,
        };

        if last {
            out.push(byte);
            return;
        }
        out.push(byte | CONTINUATION_BIT);
    }
}

// Low 7 bits in two's complement, which is what `value & 0x7F` means for a
// negative integer.
fn low_bits(value: &BigInt) -> u8 {
    value.to_signed_bytes_le().first().copied().unwrap_or(0) & PAYLOAD_MASK
}

// `rest` is the value left after shifting out `byte`. Positive values stop at
// 0 with a clear sign bit, negative ones at -1 with the sign bit set;
// arithmetic shift keeps -1 at -1 forever, so both branches are needed.
fn is_signed_terminal(rest: &BigInt, byte: u8) -> bool {
    let sign_bit_set = byte & SIGN_BIT != 0;
    match rest.sign() {
        Sign::NoSign => !sign_bit_set,
        Sign::Minus => sign_bit_set && rest.magnitude().is_one(),
        Sign::Plus => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_a_single_byte() {
        assert_eq!(encode(0, false).unwrap(), vec![0x00]);
        assert_eq!(encode(0, true).unwrap(), vec![0x00]);
    }

    #[test]
    fn rejects_negative_unsigned() {
        let err = encode(-1, false).unwrap_err();
        assert!(matches!(err, CodecError::InvalidArgument(_)));
        assert!(matches!(encoded_len(-5, false), Err(CodecError::InvalidArgument(_))));
    }

    #[test]
    fn failed_encode_appends_nothing() {
        let mut out = vec![0xAA];
        assert!(encode_into(-7, false, &mut out).is_err());
        assert_eq!(out, vec![0xAA]);
    }

    #[test]
    fn encode_into_appends() {
        let mut out = vec![0xFF];
        let n = encode_into(624485, false, &mut out).unwrap();
        assert_eq!(n, 3);
        assert_eq!(out, vec![0xFF, 0xE5, 0x8E, 0x26]);
    }

    #[test]
    fn sign_bit_forces_extra_byte() {
        // 64 has bit 6 set, so a positive encoding needs a second byte.
        assert_eq!(encode(64, true).unwrap(), vec![0xC0, 0x00]);
        assert_eq!(encode(-64, true).unwrap(), vec![0x40]);
        assert_eq!(encode(-65, true).unwrap(), vec![0xBF, 0x7F]);
    }

    #[test]
    fn encoded_len_matches_encode() {
        for v in [0i64, 1, 63, 64, 127, 128, -1, -64, -65, -128, -129, 624485, -624485] {
            assert_eq!(encoded_len(v, true).unwrap(), encode(v, true).unwrap().len(), "signed {}", v);
            if v >= 0 {
                assert_eq!(encoded_len(v, false).unwrap(), encode(v, false).unwrap().len(), "unsigned {}", v);
            }
        }
    }

    #[test]
    fn fast_paths_agree_at_extremes() {
        for v in [0u64, 1, 127, 128, u64::MAX] {
            let mut out = Vec::new();
            encode_u64(v, &mut out);
            assert_eq!(out, encode(v, false).unwrap());
        }
        for v in [0i64, -1, 63, 64, -64, -65, i64::MAX, i64::MIN] {
            let mut out = Vec::new();
            encode_i64(v, &mut out);
            assert_eq!(out, encode(v, true).unwrap());
        }
    }

    #[test]
    fn u64_max_takes_ten_bytes() {
        let mut out = Vec::new();
        encode_u64(u64::MAX, &mut out);
        assert_eq!(out.len(), MAX_U64_LEN);
        assert_eq!(out[9], 0x01);
    }

    #[test]
    fn i64_extremes_fill_the_reserved_length() {
        for v in [i64::MIN, i64::MAX] {
            let mut out = Vec::new();
            encode_i64(v, &mut out);
            assert_eq!(out.len(), MAX_I64_LEN);
            assert!(out.capacity() >= MAX_I64_LEN);
        }
    }
}
