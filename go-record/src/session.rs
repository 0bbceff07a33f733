use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::Point;
use crate::board::{Board, LiveBoard};
use crate::config::RecordConfig;
use crate::error::{GoError, RecordError};
use crate::history::{CandidateLine, HistoryList, NodeId, NodeStats};
use crate::sgf::{self, LoadReport, RecordTree};
use crate::stone::Stone;

/// A board, its history and the settings used to read and write records.
///
/// Everything a front end does to the game goes through one session. The
/// background worker owns one; tests drive it directly.
#[derive(Debug, Clone)]
pub struct Session {
    config: RecordConfig,
    komi: f64,
    board: LiveBoard,
}

impl Session {
    pub fn new(config: RecordConfig) -> Result<Self, RecordError> {
        config.validate()?;
        Ok(Self {
            komi: config.komi,
            board: LiveBoard::new(config.board_size),
            config,
        })
    }

    /// A session whose history has not been set up yet. It accepts loads and
    /// `clear`, but snapshots fail until then.
    pub fn uninitialized(config: RecordConfig) -> Result<Self, RecordError> {
        config.validate()?;
        Ok(Self {
            komi: config.komi,
            board: LiveBoard::uninitialized(config.board_size),
            config,
        })
    }

    pub fn config(&self) -> &RecordConfig {
        &self.config
    }

    pub fn komi(&self) -> f64 {
        self.komi
    }

    pub fn board(&self) -> &LiveBoard {
        &self.board
    }

    pub fn history(&self) -> &HistoryList {
        self.board.history()
    }

    pub fn load_from_path(&mut self, path: impl AsRef<Path>) -> Result<LoadReport, RecordError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| RecordError::io(path, e))?;
        self.load_from_text(&text)
    }

    pub fn load_from_text(&mut self, text: &str) -> Result<LoadReport, RecordError> {
        let tree = sgf::parse(text)?;
        self.load_tree(&tree)
    }

    /// Replace the game with the main line of `tree`, as a single board
    /// change.
    pub fn load_tree(&mut self, tree: &RecordTree) -> Result<LoadReport, RecordError> {
        let policy = self.config.read_policy;
        let report = self.board.batch(|board| {
            board.clear();
            sgf::replay_record(tree, board, policy)
        })?;

        self.komi = report.komi.unwrap_or(self.config.komi);
        debug!(
            hidden = report.hidden_move_count,
            placed = report.placed_count,
            revision = self.board.revision(),
            "loaded record"
        );
        Ok(report)
    }

    pub fn snapshot(&self) -> Result<RecordTree, RecordError> {
        sgf::snapshot(self.board.history(), &self.config, self.komi)
    }

    pub fn snapshot_to_text(&self) -> Result<String, RecordError> {
        Ok(sgf::serialize(&self.snapshot()?))
    }

    /// Write the current game to `path`. The file is replaced in one rename,
    /// so a failed save leaves any previous file untouched.
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<(), RecordError> {
        let text = self.snapshot_to_text()?;
        write_atomic(path.as_ref(), text.as_bytes())
    }

    pub fn play(&mut self, stone: Stone, point: Point) -> Result<NodeId, RecordError> {
        self.board.place(stone, point)?;
        self.current()
    }

    pub fn pass(&mut self, stone: Stone) -> Result<NodeId, RecordError> {
        self.board.pass(stone)?;
        self.current()
    }

    pub fn clear(&mut self) {
        self.board.clear();
        self.komi = self.config.komi;
    }

    pub fn set_analysis(
        &mut self,
        id: NodeId,
        stats: NodeStats,
        candidates: Vec<CandidateLine>,
    ) -> Result<(), RecordError> {
        Ok(self.board.set_analysis(id, stats, candidates)?)
    }

    pub fn add_try_play(
        &mut self,
        base: NodeId,
        moves: &[(Stone, Option<Point>)],
    ) -> Result<NodeId, RecordError> {
        Ok(self.board.add_try_play(base, moves)?)
    }

    pub fn swap_branch(&mut self, base: NodeId, index: usize) -> bool {
        self.board.swap_branch(base, index)
    }

    pub fn go_to(&mut self, id: NodeId) -> bool {
        self.board.go_to(id)
    }

    fn current(&self) -> Result<NodeId, RecordError> {
        Ok(self.board.history().current().ok_or(GoError::Uninitialized)?)
    }
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), RecordError> {
    let tmp = temp_path(path).map_err(|e| RecordError::io(path, e))?;

    let result = File::create(&tmp)
        .and_then(|mut file| {
            file.write_all(contents)?;
            file.sync_all()
        })
        .and_then(|()| fs::rename(&tmp, path));

    if let Err(e) = result {
        if let Err(cleanup) = fs::remove_file(&tmp)
            && cleanup.kind() != io::ErrorKind::NotFound
        {
            warn!(path = %tmp.display(), error = %cleanup, "could not remove temporary file");
        }
        return Err(RecordError::io(path, e));
    }
    Ok(())
}

/// `dir/.name.tmp` next to the destination, so the rename stays on one
/// filesystem.
fn temp_path(path: &Path) -> io::Result<PathBuf> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    let mut tmp_name = std::ffi::OsString::from(".");
    tmp_name.push(name);
    tmp_name.push(".tmp");
    Ok(path.with_file_name(tmp_name))
}
