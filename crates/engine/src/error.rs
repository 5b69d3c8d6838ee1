use std::fmt;

#[derive(Debug)]
pub enum EngineError {
    /// Rule file row is malformed (wrong field count, empty pattern or name).
    RuleParse { line: u64, message: String },
    /// Rule pattern does not compile.
    InvalidPattern { line: u64, pattern: String, message: String },
    /// Registry CSV could not be parsed.
    RegistryParse { registry: String, line: u64, message: String },
    /// A manufacturer name normalized to the empty string.
    ShortenedToNothing { name: String },
    /// A registry returned fewer rows than its configured floor.
    TooFewEntries { registry: String, got: usize, wanted: usize },
    /// All registries together returned fewer rows than the global floor.
    TooFewTotal { got: usize, wanted: usize },
    /// Canonical map serialization failed.
    Serialize(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RuleParse { line, message } => {
                write!(f, "rule file line {line}: {message}")
            }
            Self::InvalidPattern { line, pattern, message } => {
                write!(f, "rule file line {line}: invalid pattern '{pattern}': {message}")
            }
            Self::RegistryParse { registry, line, message } => {
                write!(f, "{registry} line {line}: {message}")
            }
            Self::ShortenedToNothing { name } => {
                write!(f, "manufacturer \"{name}\" shortened to nothing")
            }
            Self::TooFewEntries { registry, got, wanted } => {
                write!(f, "too few {registry} entries. Got {got}, wanted {wanted}")
            }
            Self::TooFewTotal { got, wanted } => {
                write!(f, "too few total entries. Got {got}, wanted {wanted}")
            }
            Self::Serialize(msg) => write!(f, "serialization error: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}
