pub mod board;
pub mod config;
pub mod error;
pub mod history;
pub mod replayer;
pub mod session;
pub mod sgf;
pub mod stone;

/// `(x, y)`, zero-based from the top-left corner.
pub type Point = (u8, u8);

pub use board::{Board, Goban, LiveBoard};
pub use config::{ReadPolicy, RecordConfig};
pub use error::{GoError, RecordError};
pub use history::{CandidateLine, HistoryList, HistoryNode, NodeId, NodeStats};
pub use replayer::MoveReplayer;
pub use session::Session;
pub use sgf::{LoadReport, RecordTree, SgfError};
pub use stone::Stone;
