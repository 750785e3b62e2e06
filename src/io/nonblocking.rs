use std::io::ErrorKind;

use chrono::NaiveDateTime;
use num_bigint::BigInt;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::error;

use crate::constants::PACKED_DATETIME_LEN;
use crate::error::CodecError;
use crate::varint::Decoder;
use crate::{datetime, varint};

/// Write one LEB128 value and flush.
pub async fn write_varint<W, V>(writer: &mut W, value: V, signed: bool) -> Result<usize, CodecError>
where
    W: AsyncWrite + Unpin,
    V: Into<BigInt>,
{
    let buf = varint::encode(value, signed)?;
    writer.write_all(&buf).await?;
    writer.flush().await?;
    Ok(buf.len())
}

/// Read one LEB128 value, pulling a single byte per read so nothing past the
/// terminator is taken from `reader`.
pub async fn read_varint<R: AsyncRead + Unpin>(
    reader: &mut R,
    signed: bool,
    max_bytes: Option<usize>,
) -> Result<(BigInt, usize), CodecError> {
    let mut decoder = Decoder::new(signed, max_bytes);
    decoder.check_budget()?;
    loop {
        let byte = match reader.read_u8().await {
            Ok(byte) => byte,
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Err(decoder.truncated()),
            Err(e) => return Err(e.into()),
        };
        if let Some(done) = decoder.push(byte)? {
            return Ok(done);
        }
    }
}

pub async fn write_datetime<W: AsyncWrite + Unpin>(
    writer: &mut W,
    dt: &NaiveDateTime,
) -> Result<(), CodecError> {
    writer.write_all(&datetime::encode(dt)).await?;
    writer.flush().await?;
    Ok(())
}

pub async fn read_datetime<R: AsyncRead + Unpin>(reader: &mut R) -> Result<NaiveDateTime, CodecError> {
    let mut buf = [0u8; PACKED_DATETIME_LEN];
    let mut filled = 0;

    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..]).await?;
        if n == 0 {
            error!("Packed datetime truncated after {} bytes", filled);
            return Err(CodecError::Truncated { consumed: filled });
        }
        filled += n;
    }

    datetime::decode(&buf)
}
