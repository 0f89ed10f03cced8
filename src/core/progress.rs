//! Progress events and their terminal rendering

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::fmt;
use std::str::FromStr;

/// Default width of the rendered bar, in cells
pub const PROGRESS_BAR_WIDTH: usize = 32;

const SIZE_UNITS: &[&str] = &["B", "KB", "MB", "GB"];

/// Status tag carried by a progress event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStatus {
    Downloading,
    Finished,
    Error,
}

impl FromStr for ProgressStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "downloading" => Ok(ProgressStatus::Downloading),
            "finished" => Ok(ProgressStatus::Finished),
            "error" => Ok(ProgressStatus::Error),
            other => Err(format!("unknown progress status: {other}")),
        }
    }
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProgressStatus::Downloading => "downloading",
            ProgressStatus::Finished => "finished",
            ProgressStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// A single progress report from the extraction tool
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    pub status: ProgressStatus,
    /// Bytes written so far
    pub downloaded_bytes: Option<u64>,
    /// Exact size, when the server announced one
    pub total_bytes: Option<u64>,
    /// Estimated size, for fragmented streams
    pub total_bytes_estimate: Option<u64>,
    /// Instantaneous speed as reported by the tool (e.g. "1.20MiB/s")
    pub speed: Option<String>,
    /// Time remaining as reported by the tool (e.g. "00:42")
    pub eta: Option<String>,
}

impl ProgressEvent {
    /// Create an event with no byte counts or labels
    pub fn new(status: ProgressStatus) -> Self {
        Self {
            status,
            downloaded_bytes: None,
            total_bytes: None,
            total_bytes_estimate: None,
            speed: None,
            eta: None,
        }
    }

    /// Create a downloading event with known byte counts
    pub fn downloading(downloaded_bytes: u64, total_bytes: u64) -> Self {
        Self {
            downloaded_bytes: Some(downloaded_bytes),
            total_bytes: Some(total_bytes),
            ..Self::new(ProgressStatus::Downloading)
        }
    }

    /// Total size: the exact one when non-zero, otherwise the estimate
    pub fn total(&self) -> u64 {
        self.total_bytes
            .filter(|&total| total > 0)
            .or(self.total_bytes_estimate)
            .unwrap_or(0)
    }

    /// Download progress as a percentage (0.0 to 100.0); 0 when the total is unknown
    pub fn percent(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let downloaded = self.downloaded_bytes.unwrap_or(0) as f64;
        (downloaded / total as f64 * 100.0).clamp(0.0, 100.0)
    }
}

/// Format a duration in seconds as `H:MM:SS`, or `M:SS` under an hour
pub fn format_duration(seconds: Option<u64>) -> String {
    let Some(seconds) = seconds else {
        return "Unknown".to_string();
    };

    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Format a byte count with one decimal place, in 1024-based units up to TB
pub fn format_size(bytes: Option<u64>) -> String {
    let Some(bytes) = bytes else {
        return "Unknown".to_string();
    };

    let mut size = bytes as f64;
    for unit in SIZE_UNITS {
        if size < 1024.0 {
            return format!("{:.1} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.1} TB", size)
}

/// Render a block progress bar followed by the percentage and status labels.
///
/// Empty labels are left out; the ETA label is prefixed with `ETA: `.
pub fn render_progress_bar(
    percent: f64,
    downloaded: &str,
    speed: &str,
    eta: &str,
    width: usize,
) -> String {
    let filled = ((width as f64 * percent / 100.0) as usize).min(width);
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(width - filled));

    let mut status_parts = Vec::with_capacity(3);
    if !downloaded.is_empty() {
        status_parts.push(downloaded.to_string());
    }
    if !speed.is_empty() {
        status_parts.push(speed.to_string());
    }
    if !eta.is_empty() {
        status_parts.push(format!("ETA: {}", eta));
    }

    if status_parts.is_empty() {
        format!("[{}] {:.1}%", bar, percent)
    } else {
        format!("[{}] {:.1}% {}", bar, percent, status_parts.join(" - "))
    }
}

/// Draws progress events on a single, continuously overwritten terminal line
pub struct ProgressRenderer {
    enabled: bool,
    width: usize,
    progress_bar: Option<ProgressBar>,
}

impl ProgressRenderer {
    /// Create a renderer; a disabled renderer swallows every event
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            width: PROGRESS_BAR_WIDTH,
            progress_bar: None,
        }
    }

    /// Set the bar width in cells
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Consume one event
    pub fn handle(&mut self, event: &ProgressEvent) {
        if !self.enabled {
            return;
        }

        match event.status {
            ProgressStatus::Downloading => {
                let line = Self::render(event, self.width);
                self.line().set_message(line);
            }
            ProgressStatus::Finished => {
                if let Some(progress_bar) = self.progress_bar.take() {
                    progress_bar.finish();
                }
                println!("✓ Download finished, processing...");
            }
            ProgressStatus::Error => {
                if let Some(progress_bar) = self.progress_bar.take() {
                    progress_bar.abandon();
                }
                eprintln!("✗ Error occurred during download");
            }
        }
    }

    /// Render the status line for a downloading event
    pub fn render(event: &ProgressEvent, width: usize) -> String {
        let downloaded = format_size(Some(event.downloaded_bytes.unwrap_or(0)));
        render_progress_bar(
            event.percent(),
            &downloaded,
            event.speed.as_deref().unwrap_or(""),
            event.eta.as_deref().unwrap_or(""),
            width,
        )
    }

    fn line(&mut self) -> &ProgressBar {
        self.progress_bar.get_or_insert_with(|| {
            let style = ProgressStyle::with_template("{msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            let progress_bar =
                ProgressBar::with_draw_target(Some(100), ProgressDrawTarget::stdout());
            progress_bar.set_style(style);
            progress_bar
        })
    }
}

impl Drop for ProgressRenderer {
    fn drop(&mut self) {
        if let Some(progress_bar) = self.progress_bar.take() {
            progress_bar.abandon();
        }
    }
}
