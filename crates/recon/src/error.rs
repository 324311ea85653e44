use std::fmt;

/// Analyzer-response shape errors.
///
/// `NoValidTransactions` is reported, not fatal: the submission terminates
/// as a no-op instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidateError {
    /// Top-level response is not a JSON object.
    NotAnObject,
    /// `transactions` is absent, null, or not an array.
    NoTransactions,
    /// Every transaction line was empty after filtering.
    NoValidTransactions,
}

impl fmt::Display for ValidateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "analyzer response is not a JSON object"),
            Self::NoTransactions => write!(f, "analyzer response has no transactions array"),
            Self::NoValidTransactions => {
                write!(f, "no valid transactions could be extracted from the response")
            }
        }
    }
}

impl std::error::Error for ValidateError {}

#[derive(Debug)]
pub enum ConfigError {
    /// TOML parse / deserialization error.
    Parse(String),
    /// A required field code is empty.
    EmptyFieldCode(String),
    /// Two mapping entries share the same field code.
    DuplicateFieldCode(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "mapping parse error: {msg}"),
            Self::EmptyFieldCode(which) => write!(f, "mapping entry '{which}' is empty"),
            Self::DuplicateFieldCode(code) => {
                write!(f, "field code '{code}' is mapped more than once")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
