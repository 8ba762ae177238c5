use thiserror::Error;

/// Malformed generation rules. Fatal: a sector is never generated from rules
/// that fail validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("probability '{field}' must be within [0, 1], got {value}")]
    Probability { field: &'static str, value: f64 },

    #[error("range '{field}' is inverted or non-finite: [{min}, {max}]")]
    InvalidRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("'{field}' must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("table '{table}' must not be empty")]
    EmptyTable { table: &'static str },

    #[error("archetype '{archetype}': {reason}")]
    Archetype { archetype: String, reason: String },

    #[error("failed to read rules file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse rules: {0}")]
    Parse(#[from] serde_json::Error),
}
