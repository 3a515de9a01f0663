use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Substring that marks a header or noise line.
pub const HEADER_MARKER: &str = "CPU";

/// Number of whitespace-separated fields in a data line.
pub const FIELD_COUNT: usize = 8;
pub const CORE_FIELD: usize = 1;
pub const IDLE_FIELD: usize = 7;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub input: PathBuf,
    pub format: OutputFormat,
    pub verbosity: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "plain" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow::anyhow!("Invalid format: {}. Valid options: text, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
