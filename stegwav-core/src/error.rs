use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unsupported carrier format: {0}")]
    UnsupportedCarrierFormat(String),

    #[error("message too long for carrier: need {needed} samples, have {available}")]
    Capacity { needed: usize, available: usize },

    #[error("carrier too short for embedded frame: need {needed} samples, have {available}")]
    FrameTruncated { needed: usize, available: usize },

    #[error("invalid bit depth {bit_depth}: must be between 1 and {max}")]
    InvalidBitDepth { bit_depth: u32, max: u32 },

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("invalid ciphertext: {0}")]
    InvalidCiphertext(String),

    #[error("attempt log {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
