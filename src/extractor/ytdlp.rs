//! Extraction backed by the `yt-dlp` executable

use super::{DownloadReport, Extractor};
use crate::core::{
    AuthOptions, DownloadOptions, ExtractorSettings, PostProcess, ProgressEvent,
    ProgressStatus, VideoMetadata,
};
use crate::error::ExtractorError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, warn};

/// Default executable name, looked up on `PATH`
pub const DEFAULT_BINARY: &str = "yt-dlp";

const PROGRESS_MARKER: &str = "[ytgrab-progress]";
const FILEPATH_MARKER: &str = "[ytgrab-file]";
const ERROR_PREFIX: &str = "ERROR:";

/// `yt-dlp` driven as a child process
#[derive(Debug, Clone)]
pub struct YtDlp {
    binary: PathBuf,
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new()
    }
}

impl YtDlp {
    /// Use `yt-dlp` from `PATH`
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from(DEFAULT_BINARY),
        }
    }

    /// Use a specific executable
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn command(&self, args: &[String]) -> Command {
        debug!("Running {} {}", self.binary.display(), args.join(" "));
        let mut command = Command::new(&self.binary);
        command
            .args(args)
            .env("PYTHONIOENCODING", "utf-8")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }

    fn launch_error(&self, source: std::io::Error) -> ExtractorError {
        ExtractorError::Launch {
            binary: self.binary.display().to_string(),
            source,
        }
    }
}

#[async_trait]
impl Extractor for YtDlp {
    async fn extract_info(
        &self,
        url: &str,
        settings: &ExtractorSettings,
    ) -> Result<VideoMetadata, ExtractorError> {
        let args = info_args(url, settings);
        let output = self
            .command(&args)
            .output()
            .await
            .map_err(|e| self.launch_error(e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let errors: Vec<String> = stderr
                .lines()
                .filter(|line| line.starts_with(ERROR_PREFIX))
                .map(str::to_string)
                .collect();
            let last_line = stderr.lines().rev().find(|line| !line.trim().is_empty());
            let message = failure_message(&errors, last_line, output.status);
            warn!("Metadata extraction failed: {}", message);
            return Err(ExtractorError::Extraction(message));
        }

        let info = VideoMetadata::from_json(&output.stdout)?;
        debug!("Extracted metadata: {:?}", info);
        Ok(info)
    }

    async fn download(
        &self,
        url: &str,
        options: &DownloadOptions,
        on_progress: &mut (dyn FnMut(ProgressEvent) + Send),
    ) -> Result<DownloadReport, ExtractorError> {
        let args = download_args(url, options);
        let mut child = self
            .command(&args)
            .spawn()
            .map_err(|e| self.launch_error(e))?;

        let stdout = child.stdout.take().ok_or_else(|| {
            ExtractorError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "stdout was not captured",
            ))
        })?;
        let stderr = child.stderr.take().ok_or_else(|| {
            ExtractorError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "stderr was not captured",
            ))
        })?;

        // Raw byte lines: file names and messages are not always valid UTF-8
        let mut stdout = BufReader::new(stdout);
        let mut stderr = BufReader::new(stderr);
        let mut stdout_buf = Vec::new();
        let mut stderr_buf = Vec::new();
        let mut stdout_open = true;
        let mut stderr_open = true;
        let mut collector = OutputCollector::default();

        while stdout_open || stderr_open {
            tokio::select! {
                read = stdout.read_until(b'\n', &mut stdout_buf), if stdout_open => {
                    stdout_open = read? > 0;
                    if let Some(line) = take_line(&mut stdout_buf) {
                        collector.consume(&line, on_progress);
                    }
                },
                read = stderr.read_until(b'\n', &mut stderr_buf), if stderr_open => {
                    stderr_open = read? > 0;
                    if let Some(line) = take_line(&mut stderr_buf) {
                        collector.consume(&line, on_progress);
                    }
                },
            }
        }

        let status = child.wait().await?;
        if !status.success() {
            let message = failure_message(&collector.errors, collector.last_line.as_deref(), status);
            warn!("Download failed: {}", message);
            return Err(ExtractorError::Extraction(message));
        }

        Ok(DownloadReport {
            output_path: collector.output_path,
        })
    }
}

/// Sorts the tool's output lines into progress events, the final path, and errors
#[derive(Debug, Default)]
struct OutputCollector {
    errors: Vec<String>,
    last_line: Option<String>,
    output_path: Option<PathBuf>,
}

impl OutputCollector {
    fn consume(&mut self, line: &str, on_progress: &mut (dyn FnMut(ProgressEvent) + Send)) {
        let line = line.trim_end_matches(['\r', '\n']);
        if let Some(event) = parse_progress_line(line) {
            on_progress(event);
        } else if let Some(path) = line.strip_prefix(FILEPATH_MARKER) {
            self.output_path = Some(PathBuf::from(path.trim()));
        } else if line.starts_with(ERROR_PREFIX) {
            self.errors.push(line.to_string());
        } else if !line.trim().is_empty() {
            debug!("yt-dlp: {}", line);
            self.last_line = Some(line.to_string());
        }
    }
}

/// Decode a buffered line, replacing invalid UTF-8, and reset the buffer.
///
/// A read cancelled by `select!` leaves its bytes in the buffer, so the buffer
/// is only cleared here, once the line is complete or the stream has ended.
fn take_line(buf: &mut Vec<u8>) -> Option<String> {
    if buf.is_empty() {
        return None;
    }
    let line = String::from_utf8_lossy(buf).into_owned();
    buf.clear();
    Some(line)
}

/// Flags shared by metadata fetches and downloads
fn common_args(settings: &ExtractorSettings) -> Vec<String> {
    let retry = &settings.retry;
    let mut args = vec![
        "--no-playlist".to_string(),
        "--extractor-retries".to_string(),
        retry.extractor_retries.to_string(),
        "--sleep-requests".to_string(),
        seconds(retry.sleep_requests),
        "--sleep-interval".to_string(),
        seconds(retry.sleep_interval),
        "--max-sleep-interval".to_string(),
        seconds(retry.max_sleep_interval),
    ];

    if settings.quiet {
        args.push("--no-warnings".to_string());
    }
    if settings.no_check_certificate {
        args.push("--no-check-certificates".to_string());
    }

    match &settings.auth {
        AuthOptions::Anonymous => {}
        AuthOptions::Browser(browser) => {
            args.push("--cookies-from-browser".to_string());
            args.push(browser.as_str().to_string());
        }
        AuthOptions::CookieFile(path) => {
            args.push("--cookies".to_string());
            args.push(path.to_string_lossy().into_owned());
        }
    }

    args
}

/// Arguments for a metadata-only fetch that prints one JSON document
pub fn info_args(url: &str, settings: &ExtractorSettings) -> Vec<String> {
    let mut args = vec![
        "--dump-single-json".to_string(),
        "--skip-download".to_string(),
    ];
    if settings.quiet {
        args.push("--quiet".to_string());
    }
    args.extend(common_args(settings));
    args.push("--".to_string());
    args.push(url.to_string());
    args
}

/// Arguments for a download with machine-readable progress lines
pub fn download_args(url: &str, options: &DownloadOptions) -> Vec<String> {
    let settings = &options.settings;
    let mut args = common_args(settings);

    args.extend([
        "--retries".to_string(),
        settings.retry.retries.to_string(),
        "--fragment-retries".to_string(),
        settings.retry.fragment_retries.to_string(),
        "-f".to_string(),
        options.format_selector.to_string(),
        "-o".to_string(),
        options.output_template.clone(),
    ]);

    if let Some(container) = options.merge_output_format {
        args.push("--merge-output-format".to_string());
        args.push(container.to_string());
    }

    match options.post_process {
        Some(PostProcess::ConvertVideo { container }) => {
            args.push("--recode-video".to_string());
            args.push(container.to_string());
        }
        Some(PostProcess::ExtractAudio {
            codec,
            bitrate_kbps,
        }) => {
            args.push("--extract-audio".to_string());
            args.push("--audio-format".to_string());
            args.push(codec.to_string());
            args.push("--audio-quality".to_string());
            args.push(format!("{}K", bitrate_kbps));
        }
        None => {}
    }

    args.extend([
        "--newline".to_string(),
        "--progress".to_string(),
        "--progress-template".to_string(),
        format!(
            "download:{}%(progress.status)s|%(progress.downloaded_bytes)s|%(progress.total_bytes)s|%(progress.total_bytes_estimate)s|%(progress._speed_str)s|%(progress._eta_str)s",
            PROGRESS_MARKER
        ),
        "--print".to_string(),
        format!("after_move:{}%(filepath)s", FILEPATH_MARKER),
        "--no-simulate".to_string(),
        "--".to_string(),
        url.to_string(),
    ]);

    args
}

/// Parse one line printed through the progress template
pub fn parse_progress_line(line: &str) -> Option<ProgressEvent> {
    let payload = line.trim().strip_prefix(PROGRESS_MARKER)?;
    let mut fields = payload.split('|');

    let status = fields.next()?.trim().parse::<ProgressStatus>().ok()?;
    let downloaded_bytes = fields.next().and_then(parse_bytes);
    let total_bytes = fields.next().and_then(parse_bytes);
    let total_bytes_estimate = fields.next().and_then(parse_bytes);
    let speed = fields.next().and_then(parse_label);
    let eta = fields.next().and_then(parse_label);

    Some(ProgressEvent {
        status,
        downloaded_bytes,
        total_bytes,
        total_bytes_estimate,
        speed,
        eta,
    })
}

// Missing values print as "NA"; estimates may be fractional.
fn parse_bytes(field: &str) -> Option<u64> {
    let value = field.trim().parse::<f64>().ok()?;
    (value.is_finite() && value >= 0.0).then(|| value as u64)
}

fn parse_label(field: &str) -> Option<String> {
    let field = field.trim();
    match field {
        "" | "NA" | "None" | "Unknown" => None,
        _ => Some(field.to_string()),
    }
}

fn seconds(duration: Duration) -> String {
    format!("{}", duration.as_secs_f64())
}

fn failure_message(errors: &[String], last_line: Option<&str>, status: ExitStatus) -> String {
    if !errors.is_empty() {
        return errors.join("\n");
    }
    match last_line {
        Some(line) => format!("{} ({})", line.trim(), status),
        None => format!("yt-dlp {}", status),
    }
}
