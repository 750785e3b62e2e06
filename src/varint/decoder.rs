use num_bigint::{BigInt, BigUint};
use num_traits::{One, ToPrimitive, Zero};
use tracing::{debug, error, trace};

use crate::constants::{CONTINUATION_BIT, PAYLOAD_BITS, PAYLOAD_MASK, SIGN_BIT};
use crate::error::CodecError;

/// Byte-at-a-time LEB128 decoder.
///
/// Every decode path in the crate (slices, `Read`, `AsyncRead`) feeds bytes
/// through this one state machine. After yielding a value or an error the
/// decoder is reset and can start on the next one.
#[derive(Debug, Clone)]
pub struct Decoder {
    signed: bool,
    max_bytes: Option<usize>,
    acc: BigUint,
    size: usize,
}

impl Decoder {
    pub fn new(signed: bool, max_bytes: Option<usize>) -> Self {
        Self {
            signed,
            max_bytes,
            acc: BigUint::zero(),
            size: 0,
        }
    }

    /// Bytes consumed towards the value in progress.
    pub fn consumed(&self) -> usize {
        self.size
    }

    /// Fails with `LimitExceeded { size: 0 }` when the byte budget is zero,
    /// so callers can reject it before pulling anything from their source.
    pub fn check_budget(&self) -> Result<(), CodecError> {
        if self.max_bytes == Some(0) {
            error!("Varint decode called with a zero byte budget");
            return Err(CodecError::LimitExceeded { size: 0 });
        }
        Ok(())
    }

    /// Feed one byte. Returns `Some((value, size))` once the terminating
    /// byte has been seen.
    pub fn push(&mut self, byte: u8) -> Result<Option<(BigInt, usize)>, CodecError> {
        self.check_budget()?;

        let shift = self.size as u64 * PAYLOAD_BITS as u64;
        self.size += 1;
        self.acc |= BigUint::from(byte & PAYLOAD_MASK) << shift;
        trace!("Varint byte {} = {:#04x}", self.size, byte);

        if byte & CONTINUATION_BIT == 0 {
            return Ok(Some(self.finish(byte)));
        }

        if self.max_bytes == Some(self.size) {
            error!("Encoded varint seems to be >{} bytes", self.size);
            let size = self.size;
            self.reset();
            return Err(CodecError::LimitExceeded { size });
        }

        Ok(None)
    }

    /// Error to report when the source ends mid-value.
    pub fn truncated(&self) -> CodecError {
        error!("Varint input exhausted after {} bytes", self.size);
        CodecError::Truncated { consumed: self.size }
    }

    fn reset(&mut self) {
        self.size = 0;
        self.acc = BigUint::zero();
    }

    fn finish(&mut self, last: u8) -> (BigInt, usize) {
        let size = std::mem::take(&mut self.size);
        let mut value = BigInt::from(std::mem::take(&mut self.acc));

        // Negative numbers carry their sign in bit 6 of the last byte.
        if self.signed && last & SIGN_BIT != 0 {
            value -= BigInt::one() << (size as u64 * PAYLOAD_BITS as u64);
        }

        debug!("Decoded varint {} from {} bytes", value, size);
        (value, size)
    }
}

/// Decode one LEB128 value from the front of `bytes`.
///
/// Bytes after the terminator are left alone; the returned size tells the
/// caller where the next value starts.
pub fn decode(
    bytes: &[u8],
    signed: bool,
    max_bytes: Option<usize>,
) -> Result<(BigInt, usize), CodecError> {
    decode_stream(bytes.iter().copied().map(Ok), signed, max_bytes)
}

/// Decode one LEB128 value from a pull source such as `Read::bytes()`.
///
/// The source is advanced only up to and including the terminating byte.
pub fn decode_stream<I>(
    source: I,
    signed: bool,
    max_bytes: Option<usize>,
) -> Result<(BigInt, usize), CodecError>
where
    I: IntoIterator<Item = std::io::Result<u8>>,
{
    let mut decoder = Decoder::new(signed, max_bytes);
    decoder.check_budget()?;
    for byte in source {
        if let Some(done) = decoder.push(byte?)? {
            return Ok(done);
        }
    }
    Err(decoder.truncated())
}

pub fn decode_u64(bytes: &[u8], max_bytes: Option<usize>) -> Result<(u64, usize), CodecError> {
    let (value, size) = decode(bytes, false, max_bytes)?;
    let value = value.to_u64().ok_or_else(|| {
        error!("Decoded varint {} overflows u64", value);
        CodecError::Overflow { bits: 64 }
    })?;
    Ok((value, size))
}

pub fn decode_i64(bytes: &[u8], max_bytes: Option<usize>) -> Result<(i64, usize), CodecError> {
    let (value, size) = decode(bytes, true, max_bytes)?;
    let value = value.to_i64().ok_or_else(|| {
        error!("Decoded varint {} overflows i64", value);
        CodecError::Overflow { bits: 64 }
    })?;
    Ok((value, size))
}
