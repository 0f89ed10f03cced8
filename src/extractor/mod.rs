//! The external extraction tool, seen from ytgrab

pub mod ytdlp;

use crate::core::{DownloadOptions, ExtractorSettings, ProgressEvent, VideoMetadata};
use crate::error::ExtractorError;
use async_trait::async_trait;
use std::path::PathBuf;

pub use ytdlp::YtDlp;

/// Result of a finished download
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    /// Final file on disk, after post-processing
    pub output_path: Option<PathBuf>,
}

/// Resolves video pages into metadata and media files.
///
/// `download` calls `on_progress` inline, once per progress report, before it
/// returns.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Fetch metadata only; writes nothing to disk
    async fn extract_info(
        &self,
        url: &str,
        settings: &ExtractorSettings,
    ) -> Result<VideoMetadata, ExtractorError>;

    /// Download and post-process the media at `url`
    async fn download(
        &self,
        url: &str,
        options: &DownloadOptions,
        on_progress: &mut (dyn FnMut(ProgressEvent) + Send),
    ) -> Result<DownloadReport, ExtractorError>;
}
