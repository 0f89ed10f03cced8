//! Download orchestration for a single video

use crate::core::options::{build_options, ExtractorSettings, FormatType};
use crate::core::progress::{format_duration, ProgressEvent, ProgressRenderer};
use crate::core::report::{LogReporter, Reporter};
use crate::core::video_info::{VideoMetadata, UNKNOWN_TITLE};
use crate::error::{ExtractorError, GrabError};
use crate::extractor::{Extractor, YtDlp};
use crate::utils::url::{extract_video_id, is_video_url};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Message shown when the site throttles or hides the video
pub const RATE_LIMIT_WARNING: &str =
    "YouTube rate limit detected. Please wait a few minutes and try again.";

/// Downloads one video through an [`Extractor`].
///
/// Metadata is fetched at most once; a failed fetch is not remembered, so a
/// later call tries again.
pub struct Downloader<E = YtDlp> {
    extractor: E,
    url: String,
    output_path: PathBuf,
    settings: ExtractorSettings,
    reporter: Arc<dyn Reporter>,
    video_info: Option<VideoMetadata>,
    last_output: Option<PathBuf>,
}

impl<E: Extractor> Downloader<E> {
    /// Create a downloader for `url`, saving under `output_path`
    pub fn new(extractor: E, url: impl Into<String>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            extractor,
            url: url.into(),
            output_path: output_path.into(),
            settings: ExtractorSettings::default(),
            reporter: Arc::new(LogReporter),
            video_info: None,
            last_output: None,
        }
    }

    /// Set extraction settings (cookies, retries)
    pub fn with_settings(mut self, settings: ExtractorSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Set where user-facing messages go
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn settings(&self) -> &ExtractorSettings {
        &self.settings
    }

    /// File written by the last successful download, when the tool reported it
    pub fn last_output(&self) -> Option<&Path> {
        self.last_output.as_deref()
    }

    /// Check the held URL against the known video URL shapes
    pub fn validate_url(&self) -> bool {
        is_video_url(&self.url)
    }

    /// Like [`validate_url`](Self::validate_url), as a typed error
    pub fn ensure_valid_url(&self) -> Result<(), GrabError> {
        if self.validate_url() {
            Ok(())
        } else {
            Err(GrabError::InvalidUrl(self.url.clone()))
        }
    }

    /// Video ID of the held URL
    pub fn video_id(&self) -> Option<String> {
        extract_video_id(&self.url)
    }

    /// Fetch metadata, or return the cached copy.
    ///
    /// Failures are classified into [`GrabError::RateLimited`] and
    /// [`GrabError::MetadataFetchFailed`] and are not cached.
    pub async fn fetch_video_info(&mut self) -> Result<&VideoMetadata, GrabError> {
        if self.video_info.is_none() {
            debug!("Fetching metadata for {}", self.url);
            let info = self
                .extractor
                .extract_info(&self.url, &self.settings)
                .await
                .map_err(classify_fetch_error)?;
            info!("Fetched metadata: {}", info.title);
            self.video_info = Some(info);
        }

        self.video_info
            .as_ref()
            .ok_or_else(|| GrabError::Unexpected("metadata cache is empty".to_string()))
    }

    /// Fetch metadata, reporting any failure to the user
    pub async fn get_video_info(&mut self) -> Option<&VideoMetadata> {
        let fetched = self.fetch_video_info().await.map(|_| ());
        if let Err(err) = fetched {
            if err.is_rate_limited() {
                self.reporter.warning(RATE_LIMIT_WARNING);
            } else {
                self.reporter
                    .error(&format!("Error fetching video info: {}", error_detail(&err)));
            }
            return None;
        }
        self.video_info.as_ref()
    }

    /// Video title, or "Unknown"
    pub async fn get_video_title(&mut self) -> String {
        self.get_video_info()
            .await
            .map(|info| info.title.clone())
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string())
    }

    /// Formatted video duration, or "Unknown"
    pub async fn get_video_duration(&mut self) -> String {
        format_duration(self.get_video_info().await.and_then(|info| info.duration))
    }

    /// Download in the requested format.
    ///
    /// Every failure is reported to the user and turned into `false`.
    pub async fn download(&mut self, format_type: FormatType) -> bool {
        match self.try_download(format_type).await {
            Ok(()) => true,
            Err(GrabError::DownloadFailed(message)) => {
                self.reporter.error(&format!("Download failed: {}", message));
                false
            }
            Err(err) => {
                self.reporter
                    .error(&format!("Unexpected error: {}", error_detail(&err)));
                false
            }
        }
    }

    /// Download in the requested format, returning a typed error
    pub async fn try_download(&mut self, format_type: FormatType) -> Result<(), GrabError> {
        let options = build_options(format_type, &self.output_path, &self.settings);

        tokio::fs::create_dir_all(&options.output_dir).await?;
        debug!("Output folder ready: {}", options.output_dir.display());

        let mut renderer = ProgressRenderer::new(self.reporter.shows_progress());
        let mut on_progress = |event: ProgressEvent| renderer.handle(&event);

        info!("Downloading {} as {}", self.url, format_type);
        let report = self
            .extractor
            .download(&self.url, &options, &mut on_progress)
            .await
            .map_err(|err| match err {
                ExtractorError::Extraction(message) => GrabError::DownloadFailed(message),
                other => GrabError::Unexpected(other.to_string()),
            })?;

        if let Some(path) = &report.output_path {
            info!("Saved {}", path.display());
        }
        self.last_output = report.output_path;
        Ok(())
    }
}

/// Sort a metadata failure into rate limiting or a generic failure.
///
/// Matches on the tool's message text, so it only steers what the user is told.
pub fn classify_fetch_error(err: ExtractorError) -> GrabError {
    match err {
        ExtractorError::Extraction(message) => {
            let lower = message.to_lowercase();
            if lower.contains("rate-limited") || lower.contains("isn't available") {
                warn!("Rate limiting detected: {}", message);
                GrabError::RateLimited(message)
            } else {
                GrabError::MetadataFetchFailed(message)
            }
        }
        other => GrabError::MetadataFetchFailed(other.to_string()),
    }
}

fn error_detail(err: &GrabError) -> String {
    match err {
        GrabError::RateLimited(message)
        | GrabError::MetadataFetchFailed(message)
        | GrabError::DownloadFailed(message)
        | GrabError::Unexpected(message) => message.clone(),
        other => other.to_string(),
    }
}
