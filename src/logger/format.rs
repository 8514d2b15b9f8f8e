//! Delivery log format module
//!
//! Supports multiple log formats:
//! - `common` (single text line)
//! - `json` (JSON structured logging)
//! - Custom patterns with variables

use chrono::Local;

/// One finished file delivery
#[derive(Debug, Clone)]
pub struct DeliveryLogEntry {
    /// Completion timestamp
    pub time: chrono::DateTime<Local>,
    /// File path that was requested
    pub path: String,
    /// Delivery mode (download or attachment)
    pub mode: &'static str,
    /// Response status code
    pub status: u16,
    /// Body bytes streamed to the channel
    pub bytes: u64,
    /// Error code for failed deliveries (e.g. `ENOENT`)
    pub error_code: Option<String>,
    /// Delivery time in microseconds
    pub duration_us: u64,
}

impl DeliveryLogEntry {
    /// Create a new entry with current timestamp
    pub fn new(path: String, mode: &'static str) -> Self {
        Self {
            time: Local::now(),
            path,
            mode,
            status: 200,
            bytes: 0,
            error_code: None,
            duration_us: 0,
        }
    }

    const fn outcome(&self) -> &'static str {
        if self.error_code.is_some() {
            "failed"
        } else {
            "done"
        }
    }

    /// Format the entry according to the specified format
    pub fn format(&self, format: &str) -> String {
        match format {
            "common" => self.format_common(),
            "json" => self.format_json(),
            custom => self.format_custom(custom),
        }
    }

    /// `[$time_local] $mode "$path" $status $bytes $outcome $request_time`
    fn format_common(&self) -> String {
        format!(
            "[{}] {} \"{}\" {} {} {}{} {:.3}s",
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.mode,
            self.path,
            self.status,
            self.bytes,
            self.outcome(),
            self.error_code
                .as_ref()
                .map(|c| format!("({c})"))
                .unwrap_or_default(),
            self.request_time_secs(),
        )
    }

    /// JSON structured log format
    fn format_json(&self) -> String {
        serde_json::json!({
            "time": self.time.to_rfc3339(),
            "mode": self.mode,
            "path": self.path,
            "status": self.status,
            "bytes": self.bytes,
            "outcome": self.outcome(),
            "error_code": self.error_code,
            "duration_us": self.duration_us,
        })
        .to_string()
    }

    /// Custom format with variable substitution
    ///
    /// Supported variables:
    /// - `$time_local` - Local time in Common Log Format
    /// - `$time_iso8601` - ISO 8601 timestamp
    /// - `$mode` - Delivery mode
    /// - `$path` - Requested file path
    /// - `$status` - Response status code
    /// - `$bytes` - Body bytes streamed
    /// - `$outcome` - `done` or `failed`
    /// - `$error_code` - Error code, `-` on success
    /// - `$request_time` - Delivery time in seconds (3 decimal places)
    fn format_custom(&self, pattern: &str) -> String {
        pattern
            .replace(
                "$time_local",
                &self.time.format("%d/%b/%Y:%H:%M:%S %z").to_string(),
            )
            .replace("$time_iso8601", &self.time.to_rfc3339())
            .replace("$mode", self.mode)
            .replace("$path", &self.path)
            .replace("$status", &self.status.to_string())
            .replace("$bytes", &self.bytes.to_string())
            .replace("$outcome", self.outcome())
            .replace("$error_code", self.error_code.as_deref().unwrap_or("-"))
            .replace("$request_time", &format!("{:.3}", self.request_time_secs()))
    }

    #[allow(clippy::cast_precision_loss)]
    fn request_time_secs(&self) -> f64 {
        self.duration_us as f64 / 1_000_000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_entry() -> DeliveryLogEntry {
        let mut entry = DeliveryLogEntry::new("/srv/files/hello.txt".to_string(), "download");
        entry.bytes = 1234;
        entry.duration_us = 12_000;
        entry
    }

    #[test]
    fn test_format_common() {
        let log = create_test_entry().format("common");
        assert!(log.contains("download \"/srv/files/hello.txt\" 200 1234 done"));
        assert!(log.ends_with("0.012s"));
    }

    #[test]
    fn test_format_common_failure() {
        let mut entry = create_test_entry();
        entry.status = 503;
        entry.bytes = 0;
        entry.error_code = Some("ENOENT".to_string());
        let log = entry.format("common");
        assert!(log.contains("503 0 failed(ENOENT)"));
    }

    #[test]
    fn test_format_json() {
        let log = create_test_entry().format("json");
        let value: serde_json::Value = serde_json::from_str(&log).unwrap();
        assert_eq!(value["path"], "/srv/files/hello.txt");
        assert_eq!(value["status"], 200);
        assert_eq!(value["bytes"], 1234);
        assert_eq!(value["outcome"], "done");
        assert!(value["error_code"].is_null());
    }

    #[test]
    fn test_format_custom() {
        let log = create_test_entry().format("$mode $path $status $error_code $request_time");
        assert_eq!(log, "download /srv/files/hello.txt 200 - 0.012");
    }
}
