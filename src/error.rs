use std::fmt;

#[derive(Debug)]
pub enum CodecError {
    /// Unsigned encoding was asked for a negative value.
    InvalidArgument(String),
    /// `max_bytes` was reached without seeing a terminating byte.
    LimitExceeded { size: usize },
    /// The source ran dry before a value was complete.
    Truncated { consumed: usize },
    InvalidLength { expected: usize, actual: usize },
    InvalidCalendarValue {
        year: u32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    },
    /// Decoded value does not fit the requested fixed-width integer.
    Overflow { bits: u32 },
    Io(std::io::Error),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::InvalidArgument(msg) =>
                write!(f, "invalid argument: {}", msg),
            CodecError::LimitExceeded { size } =>
                write!(f, "encoded value seems to be >{} bytes", size),
            CodecError::Truncated { consumed } =>
                write!(f, "input truncated after {} bytes", consumed),
            CodecError::InvalidLength { expected, actual } =>
                write!(f, "invalid length: expected {} bytes, got {}", expected, actual),
            CodecError::InvalidCalendarValue { year, month, day, hour, minute, second } =>
                write!(
                    f,
                    "invalid calendar value {:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                    year, month, day, hour, minute, second
                ),
            CodecError::Overflow { bits } =>
                write!(f, "decoded value does not fit in {} bits", bits),
            CodecError::Io(e) =>
                write!(f, "i/o error: {}", e),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CodecError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CodecError {
    fn from(e: std::io::Error) -> Self {
        CodecError::Io(e)
    }
}
