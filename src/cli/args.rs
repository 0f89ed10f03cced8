//! Command line argument parsing

use crate::core::{AuthOptions, Browser, FormatType, RetryConfig};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

const EXAMPLES: &str = "\
Examples:
  ytgrab
  ytgrab --url \"https://www.youtube.com/watch?v=VIDEO_ID\"
  ytgrab --url \"https://www.youtube.com/watch?v=VIDEO_ID\" --format mp4
  ytgrab --url \"https://www.youtube.com/watch?v=VIDEO_ID\" --format mp3 --output ./downloads
  ytgrab --url \"https://youtu.be/VIDEO_ID\" --format aac --browser firefox";

/// Download YouTube videos and audio
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, after_help = EXAMPLES)]
pub struct Args {
    /// Video URL (prompted for when omitted)
    #[arg(short, long, value_name = "URL")]
    pub url: Option<String>,

    /// Output format (prompted for when omitted)
    #[arg(short, long, value_enum)]
    pub format: Option<FormatType>,

    /// Output directory
    #[arg(short, long, value_name = "DIR", default_value = "downloads")]
    pub output: PathBuf,

    /// Browser to read session cookies from
    #[arg(short, long, value_enum)]
    pub browser: Option<Browser>,

    /// Netscape cookies.txt file (ignored when --browser is set)
    #[arg(short, long, value_name = "PATH")]
    pub cookies: Option<PathBuf>,

    /// yt-dlp executable
    #[arg(long, value_name = "PATH", default_value = "yt-dlp")]
    pub yt_dlp: PathBuf,

    /// Retries for the extraction step
    #[arg(long, value_name = "N", default_value = "5")]
    pub extractor_retries: u32,

    /// Retries for HTTP transfers
    #[arg(long, value_name = "N", default_value = "10")]
    pub retries: u32,

    /// Retries per fragment
    #[arg(long, value_name = "N", default_value = "10")]
    pub fragment_retries: u32,

    /// Minimum sleep before each download (e.g. 5s)
    #[arg(long, value_name = "DURATION", default_value = "5s")]
    pub sleep_interval: humantime::Duration,

    /// Maximum sleep before each download (e.g. 30s)
    #[arg(long, value_name = "DURATION", default_value = "30s")]
    pub max_sleep_interval: humantime::Duration,

    /// Sleep between requests during extraction (e.g. 1s)
    #[arg(long, value_name = "DURATION", default_value = "1s")]
    pub sleep_requests: humantime::Duration,

    /// Disable progress output
    #[arg(long)]
    pub no_progress: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet output (only errors)
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Whether the URL has to be asked for
    pub fn is_interactive(&self) -> bool {
        self.url.is_none()
    }

    /// Whether a cookie source was given on the command line
    pub fn has_cookie_source(&self) -> bool {
        self.browser.is_some() || self.cookies.is_some()
    }

    /// Cookie source from the command line
    pub fn auth_options(&self) -> AuthOptions {
        AuthOptions::resolve(self.browser, self.cookies.clone())
    }

    /// Retry and pacing parameters for the extraction tool
    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            extractor_retries: self.extractor_retries,
            retries: self.retries,
            fragment_retries: self.fragment_retries,
            sleep_interval: self.sleep_interval.into(),
            max_sleep_interval: self.max_sleep_interval.into(),
            sleep_requests: self.sleep_requests.into(),
        }
    }

    /// Get output verbosity level
    pub fn verbosity_level(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else if self.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbosityLevel {
    /// Quiet (only errors)
    Quiet,
    /// Normal
    Normal,
    /// Verbose (debug info)
    Verbose,
}

// Implement Default for Args to make tests work
impl Default for Args {
    fn default() -> Self {
        let retry = RetryConfig::default();
        Self {
            url: None,
            format: None,
            output: PathBuf::from("downloads"),
            browser: None,
            cookies: None,
            yt_dlp: PathBuf::from("yt-dlp"),
            extractor_retries: retry.extractor_retries,
            retries: retry.retries,
            fragment_retries: retry.fragment_retries,
            sleep_interval: humantime::Duration::from(retry.sleep_interval),
            max_sleep_interval: humantime::Duration::from(retry.max_sleep_interval),
            sleep_requests: humantime::Duration::from(retry.sleep_requests),
            no_progress: false,
            verbose: false,
            quiet: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("ytgrab").chain(args.iter().copied()))
    }

    #[test]
    fn test_no_arguments_is_interactive() {
        let args = parse(&[]).unwrap();
        assert!(args.is_interactive());
        assert_eq!(args.format, None);
        assert_eq!(args.output, PathBuf::from("downloads"));
        assert_eq!(args.yt_dlp, PathBuf::from("yt-dlp"));
    }

    #[test]
    fn test_short_flags() {
        let args = parse(&[
            "-u",
            "https://youtu.be/dQw4w9WgXcQ",
            "-f",
            "mp3",
            "-o",
            "/tmp/music",
            "-b",
            "firefox",
        ])
        .unwrap();
        assert!(!args.is_interactive());
        assert_eq!(args.url.as_deref(), Some("https://youtu.be/dQw4w9WgXcQ"));
        assert_eq!(args.format, Some(FormatType::Mp3));
        assert_eq!(args.output, PathBuf::from("/tmp/music"));
        assert_eq!(args.browser, Some(Browser::Firefox));
        assert!(args.has_cookie_source());
    }

    #[test]
    fn test_long_flags() {
        let args = parse(&[
            "--url",
            "https://youtu.be/dQw4w9WgXcQ",
            "--format",
            "source",
            "--cookies",
            "cookies.txt",
        ])
        .unwrap();
        assert_eq!(args.format, Some(FormatType::Source));
        assert_eq!(args.cookies, Some(PathBuf::from("cookies.txt")));
    }

    #[test]
    fn test_every_format_value() {
        for format in FormatType::ALL {
            let args = parse(&["-f", format.as_str()]).unwrap();
            assert_eq!(args.format, Some(format));
        }
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(parse(&["--format", "flac"]).is_err());
        assert!(parse(&["--browser", "netscape"]).is_err());
        assert!(parse(&["--sleep-interval", "soon"]).is_err());
    }

    #[test]
    fn test_every_browser_value() {
        for browser in Browser::ALL {
            let args = parse(&["--browser", browser.as_str()]).unwrap();
            assert_eq!(args.browser, Some(browser));
        }
    }

    #[test]
    fn test_retry_config_defaults_match() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.retry_config(), RetryConfig::default());
        assert_eq!(Args::default().retry_config(), RetryConfig::default());
    }

    #[test]
    fn test_retry_config_overrides() {
        let args = parse(&[
            "--extractor-retries",
            "2",
            "--retries",
            "3",
            "--fragment-retries",
            "4",
            "--sleep-interval",
            "1s",
            "--max-sleep-interval",
            "1m",
            "--sleep-requests",
            "500ms",
        ])
        .unwrap();
        let retry = args.retry_config();
        assert_eq!(retry.extractor_retries, 2);
        assert_eq!(retry.retries, 3);
        assert_eq!(retry.fragment_retries, 4);
        assert_eq!(retry.sleep_interval, Duration::from_secs(1));
        assert_eq!(retry.max_sleep_interval, Duration::from_secs(60));
        assert_eq!(retry.sleep_requests, Duration::from_millis(500));
    }

    #[test]
    fn test_args_verbosity_level() {
        let args = Args::default();
        assert_eq!(args.verbosity_level(), VerbosityLevel::Normal);

        let args = Args {
            quiet: true,
            verbose: true,
            ..Default::default()
        };
        assert_eq!(args.verbosity_level(), VerbosityLevel::Quiet);

        let args = Args {
            verbose: true,
            ..Default::default()
        };
        assert_eq!(args.verbosity_level(), VerbosityLevel::Verbose);
    }

    #[test]
    fn test_auth_options() {
        assert!(Args::default().auth_options().is_anonymous());

        let args = Args {
            browser: Some(Browser::Edge),
            cookies: Some(PathBuf::from("cookies.txt")),
            ..Default::default()
        };
        assert_eq!(args.auth_options(), AuthOptions::Browser(Browser::Edge));
    }
}
