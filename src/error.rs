use thiserror::Error;

/// A descriptor chain that cannot be walked any further without reading past the buffer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("descriptor at offset {offset} has no room for its type byte ({max} bytes received)")]
    TruncatedHeader { offset: usize, max: usize },
    #[error(
        "byte {field} of descriptor at offset {offset} (length {length}) is beyond the {max} bytes received"
    )]
    FieldOutOfBounds {
        offset: usize,
        length: u8,
        field: usize,
        max: usize,
    },
}

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure reported by the USB backend while talking to a device
#[derive(Debug, Error)]
#[error("{operation} failed: {source}")]
pub struct TransferError {
    pub operation: &'static str,
    #[source]
    pub source: BoxError,
}

impl TransferError {
    pub fn new(operation: &'static str, source: impl Into<BoxError>) -> Self {
        Self {
            operation,
            source: source.into(),
        }
    }
}
