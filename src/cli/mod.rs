//! Command line front end

pub mod app;
pub mod args;
pub mod output;
pub mod prompt;

pub use app::{App, Outcome};
pub use args::Args;
pub use output::OutputFormatter;
pub use prompt::{DialoguerPrompter, Prompter};
