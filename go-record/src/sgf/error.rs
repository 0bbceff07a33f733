use std::fmt;

/// Problems with record text itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SgfError {
    /// No `(` opening a game tree.
    NoGameTree,
    UnexpectedChar {
        expected: &'static str,
        found: char,
        pos: usize,
    },
    /// The text stops inside a game tree or a value.
    Truncated { pos: usize },
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
    /// Not a two-letter coordinate token.
    InvalidToken(String),
    /// Index beyond the last letter of the alphabet.
    UnencodableIndex(u8),
}

impl fmt::Display for SgfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SgfError::NoGameTree => write!(f, "no game tree in record"),
            SgfError::UnexpectedChar {
                expected,
                found,
                pos,
            } => write!(f, "expected {expected} at byte {pos}, found '{found}'"),
            SgfError::Truncated { pos } => write!(f, "record ends early at byte {pos}"),
            SgfError::InvalidValue { key, value, reason } => {
                write!(f, "{key}[{value}]: {reason}")
            }
            SgfError::InvalidToken(token) => write!(f, "'{token}' is not a coordinate token"),
            SgfError::UnencodableIndex(i) => write!(f, "no coordinate letter for index {i}"),
        }
    }
}

impl std::error::Error for SgfError {}
