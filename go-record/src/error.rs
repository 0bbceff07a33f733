use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::Point;
use crate::sgf::SgfError;

/// Refusals from the board collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoError {
    NotOnBoard,
    Uninitialized,
    UnknownNode(usize),
    EmptyBranch,
}

impl fmt::Display for GoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoError::NotOnBoard => write!(f, "not on board"),
            GoError::Uninitialized => write!(f, "history is not initialized"),
            GoError::UnknownNode(id) => write!(f, "no history node {id}"),
            GoError::EmptyBranch => write!(f, "branch has no moves"),
        }
    }
}

impl std::error::Error for GoError {}

/// Failures of load/save operations.
///
/// `Format` and `Bounds` are tolerated per node under the lenient read policy;
/// everything else aborts the operation.
#[derive(Debug)]
pub enum RecordError {
    Format(SgfError),
    Bounds { point: Point, board_size: u8 },
    Io { path: PathBuf, source: io::Error },
    State(String),
    Board(GoError),
    Config(String),
}

impl RecordError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        RecordError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors the lenient reader skips instead of aborting on.
    pub fn is_per_node(&self) -> bool {
        matches!(self, RecordError::Format(_) | RecordError::Bounds { .. })
    }
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::Format(e) => write!(f, "malformed record: {e}"),
            RecordError::Bounds { point, board_size } => write!(
                f,
                "coordinate ({}, {}) is outside a {board_size}x{board_size} board",
                point.0, point.1
            ),
            RecordError::Io { path, source } => {
                write!(f, "cannot access {}: {source}", path.display())
            }
            RecordError::State(msg) => write!(f, "invalid state: {msg}"),
            RecordError::Board(e) => write!(f, "board rejected operation: {e}"),
            RecordError::Config(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for RecordError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RecordError::Format(e) => Some(e),
            RecordError::Io { source, .. } => Some(source),
            RecordError::Board(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SgfError> for RecordError {
    fn from(e: SgfError) -> Self {
        RecordError::Format(e)
    }
}

impl From<GoError> for RecordError {
    fn from(e: GoError) -> Self {
        RecordError::Board(e)
    }
}
