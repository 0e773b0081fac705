use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad tolerance, empty path, etc.).
    ConfigValidation(String),
    /// File read error (legacy export unreadable).
    Io(String),
    /// Malformed delimited input (reader-level, not row-level).
    Csv(String),
    /// Live store error (unreachable, bad schema, query failure).
    Db(String),
    /// Legacy export is missing a required column entirely.
    MissingColumn { column: String },
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::Csv(msg) => write!(f, "CSV error: {msg}"),
            Self::Db(msg) => write!(f, "live store error: {msg}"),
            Self::MissingColumn { column } => {
                write!(f, "legacy export: missing column '{column}'")
            }
        }
    }
}

impl std::error::Error for ReconError {}
