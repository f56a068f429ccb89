//! CLI library components for the language database editor.

pub mod logging;
pub mod report;
