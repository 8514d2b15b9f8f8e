//! Logger module
//!
//! Provides logging utilities for response formatting including:
//! - Delivery logging with multiple formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::DeliveryLogEntry;

use crate::config::LoggingConfig;

/// Initialize the logger with configuration
///
/// Should be called once at application startup. Until then every line goes
/// to stdout/stderr.
pub fn init(config: &LoggingConfig) -> std::io::Result<()> {
    writer::init(
        config.access_log_file.as_deref(),
        config.error_log_file.as_deref(),
    )
}

/// Write to info log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_info(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Log formatted delivery entry
pub fn log_delivery(entry: &DeliveryLogEntry, format: &str) {
    write_info(&entry.format(format));
}
