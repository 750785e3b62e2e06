use std::io::{ErrorKind, Read, Write};

use chrono::NaiveDateTime;
use num_bigint::BigInt;
use tracing::error;

use crate::constants::PACKED_DATETIME_LEN;
use crate::error::CodecError;
use crate::{datetime, varint};

/// Write one LEB128 value, returning the number of bytes written.
pub fn write_varint<W, V>(writer: &mut W, value: V, signed: bool) -> Result<usize, CodecError>
where
    W: Write,
    V: Into<BigInt>,
{
    let buf = varint::encode(value, signed)?;
    writer.write_all(&buf)?;
    Ok(buf.len())
}

/// Read one LEB128 value a byte at a time. The reader is left positioned
/// right after the terminating byte.
pub fn read_varint<R: Read>(
    reader: &mut R,
    signed: bool,
    max_bytes: Option<usize>,
) -> Result<(BigInt, usize), CodecError> {
    varint::decode_stream(Read::bytes(reader), signed, max_bytes)
}

pub fn write_datetime<W: Write>(writer: &mut W, dt: &NaiveDateTime) -> Result<(), CodecError> {
    writer.write_all(&datetime::encode(dt))?;
    Ok(())
}

/// Read exactly 5 bytes and unpack them. A short read is `Truncated`.
pub fn read_datetime<R: Read>(reader: &mut R) -> Result<NaiveDateTime, CodecError> {
    let mut buf = [0u8; PACKED_DATETIME_LEN];
    let mut filled = 0;

    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                error!("Packed datetime truncated after {} bytes", filled);
                return Err(CodecError::Truncated { consumed: filled });
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    datetime::decode(&buf)
}
