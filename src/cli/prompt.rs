//! Interactive prompts

use crate::core::{Browser, FormatType};
use crate::error::GrabError;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};

/// Questions asked when the command line leaves something open
pub trait Prompter {
    /// Ask for the video URL; never returns an empty string
    fn url(&mut self) -> Result<String, GrabError>;

    /// Offer a browser to read cookies from; `None` means skip
    fn browser(&mut self) -> Result<Option<Browser>, GrabError>;

    /// Ask for the output format
    fn format(&mut self) -> Result<FormatType, GrabError>;

    /// Ask whether to go ahead with the download
    fn confirm(&mut self) -> Result<bool, GrabError>;
}

/// Terminal prompts
pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Prompter for DialoguerPrompter {
    fn url(&mut self) -> Result<String, GrabError> {
        let url: String = Input::with_theme(&self.theme)
            .with_prompt("Enter YouTube URL")
            .validate_with(|input: &String| -> Result<(), &str> {
                if input.trim().is_empty() {
                    Err("URL cannot be empty. Please try again.")
                } else {
                    Ok(())
                }
            })
            .interact_text()?;
        Ok(url.trim().to_string())
    }

    fn browser(&mut self) -> Result<Option<Browser>, GrabError> {
        let mut items = vec!["Skip (no cookies)"];
        items.extend(Browser::ALL.iter().map(Browser::as_str));

        let choice = Select::with_theme(&self.theme)
            .with_prompt("Use cookies from a browser?")
            .items(&items)
            .default(0)
            .interact()?;

        Ok(choice.checked_sub(1).and_then(|i| Browser::ALL.get(i).copied()))
    }

    fn format(&mut self) -> Result<FormatType, GrabError> {
        let items: Vec<String> = FormatType::ALL
            .iter()
            .enumerate()
            .map(|(i, format)| format!("[{}] {}", i + 1, format.description()))
            .collect();

        let choice = Select::with_theme(&self.theme)
            .with_prompt("Select format")
            .items(&items)
            .default(0)
            .interact()?;

        FormatType::ALL
            .get(choice)
            .copied()
            .ok_or_else(|| GrabError::UnsupportedFormat(choice.to_string()))
    }

    fn confirm(&mut self) -> Result<bool, GrabError> {
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt("Proceed with download?")
            .default(true)
            .interact()?)
    }
}
