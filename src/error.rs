//! Error types for ytgrab

use thiserror::Error;

/// Main error type for ytgrab operations
#[derive(Debug, Error)]
pub enum GrabError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Could not fetch video information: {0}")]
    MetadataFetchFailed(String),

    #[error("Unsupported format type: {0}")]
    UnsupportedFormat(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),

    #[error("Cancelled by user")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl GrabError {
    /// Check if the error came from the site throttling or hiding the video
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, GrabError::RateLimited(_))
    }

    /// Check if the user aborted the run
    pub fn is_cancelled(&self) -> bool {
        match self {
            GrabError::Cancelled => true,
            GrabError::Io(e) => e.kind() == std::io::ErrorKind::Interrupted,
            GrabError::Prompt(dialoguer::Error::IO(e)) => {
                e.kind() == std::io::ErrorKind::Interrupted
            }
            _ => false,
        }
    }
}

/// Errors reported by the external extraction tool
#[derive(Debug, Error)]
pub enum ExtractorError {
    /// The tool ran and reported an extraction or download error
    #[error("{0}")]
    Extraction(String),

    #[error("failed to launch {binary}: {source}")]
    Launch {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed metadata: {0}")]
    Metadata(#[from] serde_json::Error),
}

impl ExtractorError {
    /// Whether this is the tool's own extraction/download error rather than
    /// a failure to run it or read its output
    pub fn is_extraction(&self) -> bool {
        matches!(self, ExtractorError::Extraction(_))
    }
}
