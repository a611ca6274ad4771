pub const STATUS_OK: u32 = 0;
pub const STATUS_ERROR: u32 = 1;

/// Whether an OK response carries the elapsed-time field.
///
/// The frame itself does not say, so both ends must be configured the same
/// way.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResponseLayout {
    /// `u32 status | u64 image_len | image`
    #[default]
    Plain,
    /// `u32 status | u64 elapsed_ns | u64 image_len | image`
    Timed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Response {
    Ok {
        /// Filter computation time, present only in the timed layout.
        elapsed_ns: Option<u64>,
        image: Vec<u8>,
    },
    Error {
        message: String,
    },
}

impl Response {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn status(&self) -> u32 {
        match self {
            Self::Ok { .. } => STATUS_OK,
            Self::Error { .. } => STATUS_ERROR,
        }
    }
}
