//! Seq level vocabulary.
//!
//! Seq does not enforce a fixed set of levels, so [`SeqDispatcher::log`]
//! accepts any string. [`SeqLevel`] names the levels Seq renders natively and
//! backs the convenience methods on the dispatcher.
//!
//! [`SeqDispatcher::log`]: crate::SeqDispatcher::log

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum SeqLevel {
    Verbose,
    Debug,
    #[default]
    Information,
    Warning,
    Error,
    Fatal,
}

/// Returned when a string does not name a known level.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown level: {0}")]
pub struct ParseLevelError(String);

impl SeqLevel {
    /// The spelling Seq uses for this level.
    pub fn as_str(self) -> &'static str {
        match self {
            SeqLevel::Verbose => "Verbose",
            SeqLevel::Debug => "Debug",
            SeqLevel::Information => "Information",
            SeqLevel::Warning => "Warning",
            SeqLevel::Error => "Error",
            SeqLevel::Fatal => "Fatal",
        }
    }

    /// Parse `s`, falling back to [`SeqLevel::Information`].
    pub fn parse_or_information(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl fmt::Display for SeqLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeqLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "verbose" | "trace" => Ok(Self::Verbose),
            "debug" => Ok(Self::Debug),
            "information" | "info" => Ok(Self::Information),
            "warning" | "warn" => Ok(Self::Warning),
            "error" | "err" => Ok(Self::Error),
            "fatal" | "critical" => Ok(Self::Fatal),
            _ => Err(ParseLevelError(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Information", SeqLevel::Information)]
    #[case("info", SeqLevel::Information)]
    #[case("WARN", SeqLevel::Warning)]
    #[case("trace", SeqLevel::Verbose)]
    #[case(" critical ", SeqLevel::Fatal)]
    #[case("Error", SeqLevel::Error)]
    fn parses_names_and_aliases(#[case] input: &str, #[case] expected: SeqLevel) {
        assert_eq!(input.parse::<SeqLevel>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_level() {
        let err = "loud".parse::<SeqLevel>().expect_err("unknown level");
        assert_eq!(err.to_string(), "unknown level: loud");
        assert_eq!(SeqLevel::parse_or_information("loud"), SeqLevel::Information);
    }

    #[test]
    fn display_uses_seq_spelling() {
        assert_eq!(SeqLevel::Warning.to_string(), "Warning");
        assert_eq!(SeqLevel::Fatal.as_str(), "Fatal");
    }
}
