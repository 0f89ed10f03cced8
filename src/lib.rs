//! # ytgrab - video and audio downloads through yt-dlp
//!
//! Validates a video URL, fetches its metadata and downloads it in one of four
//! formats, leaving stream resolution and transcoding to `yt-dlp` and `ffmpeg`.
//!
//! ## Formats
//!
//! - `mp4`: best video and audio, converted to MP4
//! - `source`: best video and audio in their original container
//! - `mp3`: audio only, MP3 at 320 kbps
//! - `aac`: audio only, AAC at 256 kbps
//!
//! ## Example
//!
//! ```rust,no_run
//! use ytgrab::{Downloader, FormatType, YtDlp};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut downloader = Downloader::new(
//!         YtDlp::new(),
//!         "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
//!         "./downloads",
//!     );
//!
//!     if downloader.validate_url() && downloader.get_video_info().await.is_some() {
//!         downloader.download(FormatType::Mp3).await;
//!     }
//! }
//! ```

pub mod cli;
pub mod core;
pub mod error;
pub mod extractor;
pub mod utils;

// Re-export main types
pub use self::core::{
    build_options, AuthOptions, Browser, DownloadOptions, Downloader, ExtractorSettings,
    FormatType, LogReporter, ProgressEvent, Reporter, RetryConfig, VideoMetadata,
};
pub use error::{ExtractorError, GrabError};
pub use extractor::{DownloadReport, Extractor, YtDlp};

/// Result type alias for ytgrab operations
pub type Result<T> = std::result::Result<T, GrabError>;
