use thiserror::Error;

/// Why a file was not taken in. The previous preview survives every variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntakeError {
    #[error("Please select a valid image file (JPEG, PNG, GIF, or WebP), got {0}")]
    UnsupportedType(String),

    #[error("File size must be less than {}MB ({size} bytes given)", .max / (1024 * 1024))]
    TooLarge { size: u64, max: u64 },

    #[error("Error loading image: {0}")]
    Decode(String),

    #[error("Error encoding image: {0}")]
    Encode(String),

    /// A later `accept` or `clear` replaced this one while it was decoding.
    #[error("Superseded by a newer selection")]
    Superseded,
}
