//! Input discovery module
//!
//! Finds candidate EXR files under a root directory and decides which of them
//! are excluded by the blacklist.

mod blacklist;
mod directory_scanner;

pub use blacklist::Blacklist;
pub use directory_scanner::{DirectoryScanner, EXR_EXTENSION};
