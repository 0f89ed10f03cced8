//! Where the downloader sends its user-facing messages

use tracing::{error, warn};

/// Receives warnings and errors the downloader wants the user to see
pub trait Reporter: Send + Sync {
    fn warning(&self, message: &str);

    fn error(&self, message: &str);

    /// Whether the live progress line should be drawn
    fn shows_progress(&self) -> bool {
        true
    }
}

/// Sends messages to the log; used when no front end is attached
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn warning(&self, message: &str) {
        warn!("{}", message);
    }

    fn error(&self, message: &str) {
        error!("{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_log_reporter() {
        let reporter: Arc<dyn Reporter> = Arc::new(LogReporter);
        assert!(reporter.shows_progress());
        reporter.warning("slow down");
        reporter.error("failed");
    }
}
