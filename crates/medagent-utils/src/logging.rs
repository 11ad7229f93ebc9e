//! Logging and tracing utilities

use std::fmt;
use std::str::FromStr;
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt as fmt_layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset or invalid
pub const DEFAULT_FILTER: &str = "warn,medagent=info";

/// Output format of the log layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One line per event
    #[default]
    Text,
    /// Multi-line output with source locations
    Pretty,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "unknown log format '{other}', expected 'text', 'pretty' or 'json'"
            )),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Pretty => f.write_str("pretty"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Build the level filter from a directive string
///
/// Falls back to [`DEFAULT_FILTER`] when the directive is missing or invalid.
pub fn env_filter(directive: Option<&str>) -> EnvFilter {
    directive
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize the global tracing subscriber
///
/// Logs always go to stderr so that stdout carries only the agent's answer.
pub fn init_tracing(format: LogFormat, directive: Option<&str>) -> Result<(), TryInitError> {
    subscriber(format, directive, std::io::stderr).try_init()
}

fn subscriber<W>(
    format: LogFormat,
    directive: Option<&str>,
    writer: W,
) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let (text, pretty, json) = match format {
        LogFormat::Text => (Some(fmt_layer::layer().with_writer(writer)), None, None),
        LogFormat::Pretty => (
            None,
            Some(fmt_layer::layer().pretty().with_writer(writer)),
            None,
        ),
        LogFormat::Json => (
            None,
            None,
            Some(fmt_layer::layer().json().with_writer(writer)),
        ),
    };

    tracing_subscriber::registry()
        .with(env_filter(directive))
        .with(text)
        .with(pretty)
        .with(json)
}
