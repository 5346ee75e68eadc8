//! Logging infrastructure for chart layout
//!
//! Structured logging through `tracing`. Every pipeline stage opens an INFO
//! span (`levelize`, `resolve_orientations`, `measure_boxes`,
//! `solve_positions`, `route_lines`) and emits DEBUG/TRACE events for the
//! decisions it makes: demotions, orientation propagation, weight
//! corrections, skip-line flags.
//!
//! # Usage
//!
//! ```rust
//! use tierchart::core::logging::init_logging;
//!
//! // Level and format from the environment, falling back to info/compact
//! let _ = init_logging(None, None);
//! ```
//!
//! # Environment Variables
//!
//! - `TIERCHART_LOG_LEVEL`: trace|debug|info|warn|error|off, or any `EnvFilter` directive
//! - `TIERCHART_LOG_FORMAT`: compact|pretty|json
//! - `RUST_LOG`: consulted when `TIERCHART_LOG_LEVEL` is unset
//!
//! # Filtering Logs
//!
//! ```bash
//! # Only the position solver, in detail
//! RUST_LOG="tierchart::chart::positions=trace" tierchart render -i chart.json
//! ```

use std::str::FromStr;

#[cfg(not(target_arch = "wasm32"))]
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

/// Environment variable holding the log level
pub const LOG_LEVEL_ENV: &str = "TIERCHART_LOG_LEVEL";
/// Environment variable holding the log format
pub const LOG_FORMAT_ENV: &str = "TIERCHART_LOG_FORMAT";

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Compact single-line format
    #[default]
    Compact,
    /// Pretty multi-line format with colors
    Pretty,
    /// JSON format for log aggregation
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

impl LogFormat {
    /// Get all valid format names
    pub fn variants() -> &'static [&'static str] {
        &["compact", "pretty", "json"]
    }
}

/// Level directive: explicit value, then `TIERCHART_LOG_LEVEL`, then `RUST_LOG`, then `info`
pub fn resolve_level(level: Option<&str>) -> String {
    level
        .map(str::to_string)
        .or_else(|| std::env::var(LOG_LEVEL_ENV).ok())
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string())
}

/// Format name: explicit value, then `TIERCHART_LOG_FORMAT`, then `compact`
pub fn resolve_format(format: Option<&str>) -> String {
    format
        .map(str::to_string)
        .or_else(|| std::env::var(LOG_FORMAT_ENV).ok())
        .unwrap_or_else(|| "compact".to_string())
}

/// Install the global tracing subscriber
///
/// Returns an error for an unknown format, or when a global subscriber is
/// already installed. An unparsable level directive falls back to `info`.
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(target_arch = "wasm32")]
    {
        // Browser console output; level filtering is left to the console
        let _ = (level, format);
        tracing_wasm::set_as_global_default();
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let log_format = LogFormat::from_str(&resolve_format(format))
            .map_err(|e| format!("Invalid log format: {}", e))?;

        let directive = resolve_level(level);
        let filter = if directive == "off" {
            EnvFilter::new("off")
        } else {
            EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"))
        };

        // Logs go to stderr so stdout stays clean for layouts and previews
        let registry = Registry::default().with(filter);
        match log_format {
            LogFormat::Compact => registry
                .with(
                    fmt::Layer::default()
                        .with_writer(std::io::stderr)
                        .with_target(false)
                        .with_span_events(FmtSpan::NONE)
                        .compact(),
                )
                .try_init()?,
            LogFormat::Pretty => registry
                .with(
                    fmt::Layer::default()
                        .with_writer(std::io::stderr)
                        .with_file(true)
                        .with_line_number(true)
                        .with_span_events(FmtSpan::ACTIVE)
                        .pretty(),
                )
                .try_init()?,
            LogFormat::Json => registry
                .with(
                    fmt::Layer::default()
                        .with_writer(std::io::stderr)
                        .with_span_events(FmtSpan::CLOSE)
                        .json(),
                )
                .try_init()?,
        }

        Ok(())
    }
}

/// Initialize logging with default settings (info level, compact format)
pub fn init_default_logging() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(None, None)
}
