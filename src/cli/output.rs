//! User-facing output

use crate::cli::args::VerbosityLevel;
use crate::core::progress::format_duration;
use crate::core::report::Reporter;
use colored::Colorize;
use std::path::Path;

/// Kinds of one-line user message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
}

/// Output formatter for ytgrab
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    verbosity: VerbosityLevel,
    show_progress: bool,
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new(VerbosityLevel::Normal)
    }
}

impl OutputFormatter {
    /// Create a new output formatter
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            show_progress: verbosity != VerbosityLevel::Quiet,
        }
    }

    /// Turn the live progress line off
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    /// Whether download progress should be drawn
    pub fn shows_progress(&self) -> bool {
        self.show_progress
    }

    /// Whether a message of this kind is printed; quiet mode keeps only
    /// warnings and errors
    pub fn is_shown(&self, kind: MessageKind) -> bool {
        match kind {
            MessageKind::Warning | MessageKind::Error => true,
            MessageKind::Info | MessageKind::Success => self.verbosity != VerbosityLevel::Quiet,
        }
    }

    /// Print info message
    pub fn info(&self, message: &str) {
        if self.is_shown(MessageKind::Info) {
            println!("{}", message);
        }
    }

    /// Print success message
    pub fn success(&self, message: &str) {
        if self.is_shown(MessageKind::Success) {
            println!("{} {}", "✓".green(), message);
        }
    }

    /// Print warning message
    pub fn warning(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print the startup banner
    pub fn print_banner(&self) {
        if self.verbosity == VerbosityLevel::Quiet {
            return;
        }

        let rule = "=".repeat(40);
        println!();
        println!("{}", rule);
        println!(
            "   {} v{}",
            "YouTube Video Downloader".bold(),
            env!("CARGO_PKG_VERSION")
        );
        println!("{}", rule);
        println!();
    }

    /// Print video information
    pub fn print_video_info(&self, title: &str, uploader: Option<&str>, duration: Option<u64>) {
        if self.verbosity == VerbosityLevel::Quiet {
            return;
        }

        println!();
        println!("Video: {}", title.bold());
        if let Some(uploader) = uploader {
            println!("Channel: {}", uploader);
        }
        println!("Duration: {}", format_duration(duration));
    }

    /// Print download start message
    pub fn print_download_start(&self, is_audio: bool) {
        if self.verbosity == VerbosityLevel::Quiet {
            return;
        }

        let label = if is_audio { "audio" } else { "video" };
        println!();
        println!("Downloading {}...", label);
    }

    /// Print download complete message
    pub fn print_download_complete(&self, output_path: Option<&Path>) {
        if self.verbosity == VerbosityLevel::Quiet {
            return;
        }

        println!();
        println!("{} Download complete!", "✓".green());
        if let Some(path) = output_path {
            println!("Saved to: {}", path.display());
        }
    }
}

impl Reporter for OutputFormatter {
    fn warning(&self, message: &str) {
        OutputFormatter::warning(self, message);
    }

    fn error(&self, message: &str) {
        OutputFormatter::error(self, message);
    }

    fn shows_progress(&self) -> bool {
        self.show_progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_formatter_creation() {
        let formatter = OutputFormatter::new(VerbosityLevel::Normal);
        assert_eq!(formatter.verbosity(), VerbosityLevel::Normal);
        assert!(formatter.shows_progress());
    }

    #[test]
    fn test_quiet_hides_progress() {
        assert!(!OutputFormatter::new(VerbosityLevel::Quiet).shows_progress());
        assert!(OutputFormatter::new(VerbosityLevel::Verbose).shows_progress());
        assert!(!OutputFormatter::new(VerbosityLevel::Normal)
            .without_progress()
            .shows_progress());
    }

    #[test]
    fn test_verbosity_levels() {
        let formatter = OutputFormatter::new(VerbosityLevel::Quiet);
        // These should not print anything in quiet mode
        formatter.info("test");
        formatter.success("test");
        formatter.print_banner();

        // Warnings and errors always print
        formatter.warning("test");
        formatter.error("test");
    }

    #[test]
    fn test_quiet_keeps_warnings_and_errors() {
        let quiet = OutputFormatter::new(VerbosityLevel::Quiet);
        assert!(!quiet.is_shown(MessageKind::Info));
        assert!(!quiet.is_shown(MessageKind::Success));
        assert!(quiet.is_shown(MessageKind::Warning));
        assert!(quiet.is_shown(MessageKind::Error));

        let normal = OutputFormatter::new(VerbosityLevel::Normal);
        assert!(normal.is_shown(MessageKind::Info));
        assert!(normal.is_shown(MessageKind::Success));
    }

    #[test]
    fn test_reporter_follows_progress_setting() {
        let reporter: &dyn Reporter = &OutputFormatter::default().without_progress();
        assert!(!reporter.shows_progress());
        let reporter: &dyn Reporter = &OutputFormatter::new(VerbosityLevel::Quiet);
        assert!(!reporter.shows_progress());
        reporter.warning("rate limited");
    }

    #[test]
    fn test_print_video_info() {
        let formatter = OutputFormatter::new(VerbosityLevel::Normal);
        // Should not panic
        formatter.print_video_info("Test Video", Some("Test Channel"), Some(125));
        formatter.print_video_info("Test Video", None, None);
    }

    #[test]
    fn test_print_download_messages() {
        let formatter = OutputFormatter::default();
        // Should not panic
        formatter.print_download_start(true);
        formatter.print_download_start(false);
        formatter.print_download_complete(Some(Path::new("/tmp/video.mp4")));
        formatter.print_download_complete(None);
    }
}
