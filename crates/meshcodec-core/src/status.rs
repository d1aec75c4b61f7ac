use thiserror::Error;

/// Errors reported by the codecs and filters.
///
/// Variants fall into two classes, see [`ErrorKind`]: malformed input
/// (format errors) and caller bugs (precondition violations). Neither is
/// recoverable; a failed decode leaves the destination contents unspecified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Invalid header: expected {expected:#04x}, found {found:#04x}")]
    InvalidHeader { expected: u8, found: u8 },
    #[error("Unexpected end of buffer: {0}")]
    UnexpectedEof(String),
    #[error("Trailing data: {0} bytes left after decoding")]
    TrailingData(usize),
    #[error("Varint exceeds 32 bits")]
    VarintOverflow,
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Coarse classification of a [`CodecError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The encoded stream is corrupt, truncated or of the wrong kind.
    Format,
    /// The caller passed a bad count, stride, width or buffer size.
    Precondition,
}

impl CodecError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::InvalidParameter(_) => ErrorKind::Precondition,
            CodecError::InvalidHeader { .. }
            | CodecError::UnexpectedEof(_)
            | CodecError::TrailingData(_)
            | CodecError::VarintOverflow => ErrorKind::Format,
        }
    }

    pub fn is_format_error(&self) -> bool {
        self.kind() == ErrorKind::Format
    }

    pub fn is_precondition_violation(&self) -> bool {
        self.kind() == ErrorKind::Precondition
    }
}

pub type Status = Result<(), CodecError>;

pub type StatusResult<T> = Result<T, CodecError>;

pub fn invalid_parameter(msg: impl Into<String>) -> CodecError {
    CodecError::InvalidParameter(msg.into())
}

/// Checks that a caller-provided buffer holds exactly `count * size` bytes.
pub(crate) fn check_buffer_size(what: &str, len: usize, count: usize, size: usize) -> Status {
    let expected = count.checked_mul(size).ok_or_else(|| {
        invalid_parameter(format!("{} size overflows: {} x {}", what, count, size))
    })?;
    if len != expected {
        return Err(invalid_parameter(format!(
            "{} holds {} bytes, expected {} ({} x {})",
            what, len, expected, count, size
        )));
    }
    Ok(())
}
