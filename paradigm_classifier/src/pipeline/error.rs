use crate::file_processor::FileProcessorError;
use crate::lexical::ScanError;
use crate::logging::{codes, Code};
use crate::tokens::TokenFormatError;

/// Pipeline processing errors
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("File processing failed: {0}")]
    FileProcessing(#[from] FileProcessorError),

    #[error("Lexical analysis failed: {0}")]
    Scan(#[from] ScanError),

    #[error("Token text is invalid: {0}")]
    TokenFormat(#[from] TokenFormatError),

    #[error("Token text records a failed scan")]
    ScanFailureRecorded,

    #[error("Cannot write token text to {path}: {message}")]
    TokenOutput { path: String, message: String },
}

impl PipelineError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::FileProcessing(e) => e.error_code(),
            Self::Scan(e) => e.error_code(),
            Self::TokenFormat(e) => e.error_code(),
            Self::ScanFailureRecorded => codes::token_format::SCAN_FAILURE_RECORDED,
            Self::TokenOutput { .. } => codes::file_processing::IO_ERROR,
        }
    }
}
