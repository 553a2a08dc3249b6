use std::fmt::Display;

/// A message meant to be shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayedError {
    pub reason: String,
}

impl RelayedError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

impl Display for RelayedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.reason)
    }
}
impl std::error::Error for RelayedError {}

/// Why a single argument could not be converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// No input was left for the argument.
    ArgsExhausted,
    /// The input wasn't a value of the expected kind, with nothing more specific to say.
    InvalidValue,
    Relayed(RelayedError),
}

impl Display for ConversionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversionError::ArgsExhausted => f.write_str("an argument is required but none were found"),
            ConversionError::InvalidValue => f.write_str("the argument is not a valid value"),
            ConversionError::Relayed(err) => Display::fmt(err, f),
        }
    }
}
impl std::error::Error for ConversionError {}

impl From<RelayedError> for ConversionError {
    fn from(v: RelayedError) -> Self {
        Self::Relayed(v)
    }
}

/// The failure of a whole parse, already phrased for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentParseError {
    /// Display name of the argument that failed, if the failure belongs to one.
    pub argument: Option<String>,
    pub reason: String,
}

impl Display for ArgumentParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.reason)
    }
}
impl std::error::Error for ArgumentParseError {}

impl From<ArgumentParseError> for RelayedError {
    fn from(v: ArgumentParseError) -> Self {
        Self::new(v.reason)
    }
}

#[derive(Debug)]
pub enum ParseError {
    /// The argument set itself is invalid. Never shown to users.
    Configuration(anyhow::Error),
    Argument(ArgumentParseError),
}

impl ParseError {
    /// The user-facing failure, if this is one.
    pub fn relayed(&self) -> Option<&ArgumentParseError> {
        match self {
            ParseError::Argument(e) => Some(e),
            ParseError::Configuration(_) => None,
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Configuration(e) => write!(f, "invalid argument configuration: {e}"),
            ParseError::Argument(e) => Display::fmt(e, f),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Configuration(e) => Some(&**e),
            ParseError::Argument(e) => Some(e),
        }
    }
}

impl From<ArgumentParseError> for ParseError {
    fn from(v: ArgumentParseError) -> Self {
        Self::Argument(v)
    }
}
