//! Utility functions for ytgrab

pub mod url;

pub use url::*;
