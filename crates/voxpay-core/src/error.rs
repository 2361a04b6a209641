use thiserror::Error;

/// Top-level error type for voxpay.
///
/// Covers the failures that happen outside a single command's pipeline:
/// loading configuration, reading input, wiring the provider. Failures inside
/// a command are reported through the status sink instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VoxpayError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// The wallet provider could not be constructed.
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for VoxpayError {
    fn from(err: toml::de::Error) -> Self {
        VoxpayError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for VoxpayError {
    fn from(err: toml::ser::Error) -> Self {
        VoxpayError::Config(err.to_string())
    }
}

/// A specialized `Result` type for voxpay operations.
pub type Result<T> = std::result::Result<T, VoxpayError>;
