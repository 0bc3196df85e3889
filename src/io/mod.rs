/// Command-line parsing and batch file processing
pub mod cli;
/// Generation defaults and output settings
pub mod configuration;
/// Error types shared across the crate
pub mod error;
/// Image decoding and PNG encoding
pub mod image;
/// Directory-backed template collection
pub mod library;
/// Tracing subscriber setup
pub mod logging;
/// Terminal progress display
pub mod progress;
