use thiserror::Error;

/// Longest filter name accepted on the wire, in bytes.
pub const MAX_FILTER_NAME_LEN: u32 = 64;

/// Largest image payload accepted in either direction (200 MiB).
pub const MAX_IMAGE_LEN: u64 = 200 * 1024 * 1024;

/// Largest error message a client will read (64 KiB).
pub const MAX_MESSAGE_LEN: u32 = 64 * 1024;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("invalid filter name length {0} (expected 1..={max})", max = MAX_FILTER_NAME_LEN)]
    NameLength(u64),
    #[error("invalid image length {0} bytes (expected 1..={max})", max = MAX_IMAGE_LEN)]
    ImageLength(u64),
    #[error("invalid error message length {0} (expected at most {max})", max = MAX_MESSAGE_LEN)]
    MessageLength(u64),
    #[error("unknown response status {0}")]
    UnknownStatus(u32),
    #[error("stream ended while reading {field}")]
    Truncated { field: &'static str },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProtocolError {
    /// True when the stream itself failed, so no reply can be sent.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
