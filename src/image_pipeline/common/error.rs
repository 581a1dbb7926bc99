use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode EXR image: {0}")]
    DecodeError(String),

    #[error("Failed to encode EXR image: {0}")]
    EncodeError(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Unknown compression kind: {0} (expected one of NONE, RLE, ZIPS, ZIP, PIZ, PXR24, B44, B44A, DWAA, DWAB)")]
    UnknownCompressionKind(String),

    #[error("Failed to read blacklist {path}: {source}")]
    BlacklistReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Channel {name} has {actual} samples, expected {expected}")]
    ChannelSizeMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ProcessingError {
    /// Configuration errors abort the whole run; everything else is scoped to one file.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ProcessingError::UnknownCompressionKind(_) | ProcessingError::BlacklistReadError { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ProcessingError>;
