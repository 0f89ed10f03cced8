//! Core functionality for ytgrab

pub mod downloader;
pub mod options;
pub mod progress;
pub mod report;
pub mod video_info;

pub use downloader::*;
pub use options::*;
pub use progress::*;
pub use report::*;
pub use video_info::*;
