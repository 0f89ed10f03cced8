//! Output formats and the extraction options derived from them

use crate::error::GrabError;
use clap::ValueEnum;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Requested output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum FormatType {
    /// Video, converted to MP4 (best quality)
    Mp4,
    /// Video, original container and codecs
    Source,
    /// Audio, MP3 at 320 kbps
    Mp3,
    /// Audio, AAC at 256 kbps
    Aac,
}

impl FormatType {
    /// Every supported format, in menu order
    pub const ALL: [FormatType; 4] = [
        FormatType::Mp4,
        FormatType::Source,
        FormatType::Mp3,
        FormatType::Aac,
    ];

    /// Tag used on the command line and as the output subfolder name
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatType::Mp4 => "mp4",
            FormatType::Source => "source",
            FormatType::Mp3 => "mp3",
            FormatType::Aac => "aac",
        }
    }

    /// Whether the format keeps only the audio track
    pub fn is_audio(&self) -> bool {
        matches!(self, FormatType::Mp3 | FormatType::Aac)
    }

    /// Menu line shown by the interactive prompt
    pub fn description(&self) -> &'static str {
        match self {
            FormatType::Mp4 => "MP4    - Video (converted, best quality)",
            FormatType::Source => "Source - Video (original format)",
            FormatType::Mp3 => "MP3    - Audio (320kbps)",
            FormatType::Aac => "AAC    - Audio (256kbps)",
        }
    }
}

impl fmt::Display for FormatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatType {
    type Err = GrabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mp4" => Ok(FormatType::Mp4),
            "source" => Ok(FormatType::Source),
            "mp3" => Ok(FormatType::Mp3),
            "aac" => Ok(FormatType::Aac),
            _ => Err(GrabError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Browsers the extraction tool can read session cookies from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Browser {
    Chrome,
    Firefox,
    Safari,
    Edge,
    Opera,
    Brave,
    Chromium,
}

impl Browser {
    pub const ALL: [Browser; 7] = [
        Browser::Chrome,
        Browser::Firefox,
        Browser::Safari,
        Browser::Edge,
        Browser::Opera,
        Browser::Brave,
        Browser::Chromium,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Chrome => "chrome",
            Browser::Firefox => "firefox",
            Browser::Safari => "safari",
            Browser::Edge => "edge",
            Browser::Opera => "opera",
            Browser::Brave => "brave",
            Browser::Chromium => "chromium",
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where session cookies come from, if anywhere
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthOptions {
    /// No cookies
    #[default]
    Anonymous,
    /// Cookies read from a browser profile
    Browser(Browser),
    /// Cookies read from a Netscape cookie-jar file
    CookieFile(PathBuf),
}

impl AuthOptions {
    /// Pick the active cookie source. A browser wins over a cookie file; a
    /// cookie file that does not exist is ignored.
    pub fn resolve(browser: Option<Browser>, cookies_file: Option<PathBuf>) -> Self {
        if let Some(browser) = browser {
            return AuthOptions::Browser(browser);
        }
        match cookies_file {
            Some(path) if path.exists() => AuthOptions::CookieFile(path),
            Some(path) => {
                warn!("Cookie file {} not found, continuing without cookies", path.display());
                AuthOptions::Anonymous
            }
            None => AuthOptions::Anonymous,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, AuthOptions::Anonymous)
    }
}

/// Retry and pacing parameters handed to the extraction tool unchanged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Retries for the extraction step itself
    pub extractor_retries: u32,
    /// Retries for HTTP transfers
    pub retries: u32,
    /// Retries per fragment of a fragmented stream
    pub fragment_retries: u32,
    /// Minimum sleep before each download
    pub sleep_interval: Duration,
    /// Upper bound of the randomized sleep before each download
    pub max_sleep_interval: Duration,
    /// Sleep between requests during extraction
    pub sleep_requests: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            extractor_retries: 5,
            retries: 10,
            fragment_retries: 10,
            sleep_interval: Duration::from_secs(5),
            max_sleep_interval: Duration::from_secs(30),
            sleep_requests: Duration::from_secs(1),
        }
    }
}

/// Settings shared by metadata fetches and downloads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorSettings {
    /// Suppress the tool's own chatter
    pub quiet: bool,
    /// Skip TLS certificate validation
    pub no_check_certificate: bool,
    pub auth: AuthOptions,
    pub retry: RetryConfig,
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        Self {
            quiet: true,
            no_check_certificate: true,
            auth: AuthOptions::Anonymous,
            retry: RetryConfig::default(),
        }
    }
}

impl ExtractorSettings {
    /// Default settings with the given cookie source
    pub fn new(auth: AuthOptions) -> Self {
        Self {
            auth,
            ..Self::default()
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

/// Post-processing applied after the streams are on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostProcess {
    /// Convert the merged video into another container
    ConvertVideo { container: &'static str },
    /// Drop the video and re-encode the audio
    ExtractAudio {
        codec: &'static str,
        bitrate_kbps: u32,
    },
}

/// Everything the extraction tool needs for one download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
    pub format_type: FormatType,
    /// Per-format folder the file lands in
    pub output_dir: PathBuf,
    /// Output path template, with the tool's title and extension placeholders
    pub output_template: String,
    /// Stream selection expression
    pub format_selector: &'static str,
    /// Container for merged video and audio streams
    pub merge_output_format: Option<&'static str>,
    pub post_process: Option<PostProcess>,
    pub settings: ExtractorSettings,
}

/// Title and extension placeholders understood by the extraction tool
pub const OUTPUT_FILENAME_TEMPLATE: &str = "%(title)s.%(ext)s";

/// Escape literal text for an output template, where `%` starts a field
pub fn escape_template(text: &str) -> String {
    text.replace('%', "%%")
}

/// Build the download options for a format.
///
/// Files go to `<output_base_dir>/<format>/<title>.<ext>`.
pub fn build_options(
    format_type: FormatType,
    output_base_dir: &Path,
    settings: &ExtractorSettings,
) -> DownloadOptions {
    let output_dir = output_base_dir.join(format_type.as_str());
    let output_template = PathBuf::from(escape_template(&output_dir.to_string_lossy()))
        .join(OUTPUT_FILENAME_TEMPLATE)
        .to_string_lossy()
        .into_owned();

    let (format_selector, merge_output_format, post_process) = match format_type {
        FormatType::Mp4 => (
            "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best",
            Some("mp4"),
            Some(PostProcess::ConvertVideo { container: "mp4" }),
        ),
        FormatType::Source => ("bestvideo+bestaudio/best", None, None),
        FormatType::Mp3 => (
            "bestaudio/best",
            None,
            Some(PostProcess::ExtractAudio {
                codec: "mp3",
                bitrate_kbps: 320,
            }),
        ),
        FormatType::Aac => (
            "bestaudio/best",
            None,
            Some(PostProcess::ExtractAudio {
                codec: "aac",
                bitrate_kbps: 256,
            }),
        ),
    };

    DownloadOptions {
        format_type,
        output_dir,
        output_template,
        format_selector,
        merge_output_format,
        post_process,
        settings: settings.clone(),
    }
}
