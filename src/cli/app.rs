//! The command line flow: ask, validate, fetch, download

use crate::cli::args::Args;
use crate::cli::output::OutputFormatter;
use crate::cli::prompt::Prompter;
use crate::core::{AuthOptions, Downloader, ExtractorSettings, FormatType};
use crate::error::GrabError;
use crate::extractor::Extractor;
use std::sync::Arc;
use tracing::{debug, error};

/// Exit status for success or a declined download
pub const EXIT_SUCCESS: u8 = 0;
/// Exit status for a validation, fetch or download failure
pub const EXIT_FAILURE: u8 = 1;
/// Exit status after a user interrupt
pub const EXIT_INTERRUPTED: u8 = 130;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The file was downloaded
    Completed,
    /// The user answered "no" at the confirmation
    Declined,
    /// Invalid URL, metadata fetch failure or download failure
    Failed,
    /// The user interrupted a prompt
    Interrupted,
}

impl Outcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Completed | Outcome::Declined => EXIT_SUCCESS,
            Outcome::Failed => EXIT_FAILURE,
            Outcome::Interrupted => EXIT_INTERRUPTED,
        }
    }
}

/// One invocation of the command line tool
pub struct App<E, P> {
    args: Args,
    extractor: E,
    prompter: P,
    formatter: Arc<OutputFormatter>,
}

impl<E: Extractor, P: Prompter> App<E, P> {
    pub fn new(args: Args, extractor: E, prompter: P) -> Self {
        let mut formatter = OutputFormatter::new(args.verbosity_level());
        if args.no_progress {
            formatter = formatter.without_progress();
        }
        Self {
            args,
            extractor,
            prompter,
            formatter: Arc::new(formatter),
        }
    }

    /// Replace the output formatter
    pub fn with_formatter(mut self, formatter: Arc<OutputFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    /// Run to completion; never fails, every error ends up in the outcome
    pub async fn run(self) -> Outcome {
        let formatter = self.formatter.clone();
        match self.execute().await {
            Ok(outcome) => outcome,
            Err(err) if err.is_cancelled() => {
                formatter.info("\nDownload cancelled by user.");
                Outcome::Interrupted
            }
            Err(err) => {
                error!("Run failed: {}", err);
                formatter.error(&err.to_string());
                Outcome::Failed
            }
        }
    }

    async fn execute(self) -> Result<Outcome, GrabError> {
        let App {
            args,
            extractor,
            mut prompter,
            formatter,
        } = self;

        formatter.print_banner();

        let url = match &args.url {
            Some(url) => url.trim().to_string(),
            None => prompter.url()?,
        };

        let mut auth = args.auth_options();
        if args.is_interactive() && !args.has_cookie_source() {
            if let Some(browser) = prompter.browser()? {
                auth = AuthOptions::Browser(browser);
            }
        }
        debug!("Cookie source: {:?}", auth);

        let settings = ExtractorSettings::new(auth).with_retry(args.retry_config());
        let mut downloader = Downloader::new(extractor, url, args.output.clone())
            .with_settings(settings)
            .with_reporter(formatter.clone());

        if let Err(err) = downloader.ensure_valid_url() {
            debug!("{}", err);
            formatter.error("Invalid YouTube URL. Please check and try again.");
            return Ok(Outcome::Failed);
        }

        formatter.info("\nFetching video info...");
        let Some(info) = downloader.get_video_info().await else {
            formatter.error("Could not fetch video information.");
            return Ok(Outcome::Failed);
        };
        formatter.print_video_info(&info.title, info.uploader.as_deref(), info.duration);

        let format_type = match args.format {
            Some(format_type) => format_type,
            None => match choose_format(&mut prompter)? {
                Some(format_type) => format_type,
                None => {
                    formatter.info("\nDownload cancelled.");
                    return Ok(Outcome::Declined);
                }
            },
        };

        formatter.print_download_start(format_type.is_audio());
        if downloader.download(format_type).await {
            formatter.print_download_complete(downloader.last_output());
            Ok(Outcome::Completed)
        } else {
            Ok(Outcome::Failed)
        }
    }
}

/// Ask for a format and a confirmation; `None` when the user declines
fn choose_format<P: Prompter>(prompter: &mut P) -> Result<Option<FormatType>, GrabError> {
    let format_type = prompter.format()?;
    if prompter.confirm()? {
        Ok(Some(format_type))
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(Outcome::Completed.exit_code(), 0);
        assert_eq!(Outcome::Declined.exit_code(), 0);
        assert_eq!(Outcome::Failed.exit_code(), 1);
        assert_eq!(Outcome::Interrupted.exit_code(), 130);
    }
}
