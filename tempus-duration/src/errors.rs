use std::fmt::{self, Display};

/// Why a duration string is structurally malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserErrorKind {
    /// Unit runs and value runs don't pair up one to one.
    BadUnitPairs,
    /// A `-` was found by a parser that rejects negative amounts.
    NegativeUnsupported,
    /// A value run that isn't an integer, like `5-` or one that overflows.
    InvalidValue(String),
}

impl ParserErrorKind {
    pub fn translation_key(&self) -> &'static str {
        match self {
            ParserErrorKind::BadUnitPairs => "converters.duration.error.badUnitPairs",
            ParserErrorKind::NegativeUnsupported => "converters.duration.error.negativeUnsupported",
            ParserErrorKind::InvalidValue(_) => "converters.duration.error.invalidValue",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationParserError {
    pub kind: ParserErrorKind,
}

impl Display for DurationParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ParserErrorKind::BadUnitPairs => f.write_str("units and values do not pair up"),
            ParserErrorKind::NegativeUnsupported => f.write_str("negative durations are not supported"),
            ParserErrorKind::InvalidValue(value) => write!(f, "{value:?} is not a valid amount"),
        }
    }
}

impl std::error::Error for DurationParserError {}

impl From<ParserErrorKind> for DurationParserError {
    fn from(kind: ParserErrorKind) -> Self {
        DurationParserError { kind }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DurationError {
    /// An amount was followed by a unit the locale doesn't know. `unit` is empty when the amount had no unit.
    InvalidTimeUnit { unit: String },
    Parser(DurationParserError),
}

impl DurationError {
    pub fn invalid_unit(unit: impl Into<String>) -> Self {
        DurationError::InvalidTimeUnit { unit: unit.into() }
    }

    pub fn is_missing_unit(&self) -> bool {
        matches!(self, DurationError::InvalidTimeUnit { unit } if unit.is_empty())
    }
}

impl Display for DurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurationError::InvalidTimeUnit { unit } if unit.is_empty() => f.write_str("missing time unit"),
            DurationError::InvalidTimeUnit { unit } => write!(f, "invalid time unit {unit:?}"),
            DurationError::Parser(e) => Display::fmt(e, f),
        }
    }
}

impl std::error::Error for DurationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DurationError::Parser(e) => Some(e),
            DurationError::InvalidTimeUnit { .. } => None,
        }
    }
}

impl From<DurationParserError> for DurationError {
    fn from(e: DurationParserError) -> Self {
        DurationError::Parser(e)
    }
}

impl From<ParserErrorKind> for DurationError {
    fn from(kind: ParserErrorKind) -> Self {
        DurationError::Parser(kind.into())
    }
}
