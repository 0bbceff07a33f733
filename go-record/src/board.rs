use crate::Point;
use crate::error::GoError;
use crate::history::{CandidateLine, HistoryList, NodeId, NodeStats};
use crate::sgf::coord;
use crate::stone::Stone;

/// The board collaborator the replayer drives.
///
/// Legality beyond bounds (captures, ko, suicide) belongs to the engine
/// behind the implementation, not to the record codec.
pub trait Board {
    fn size(&self) -> u8;
    fn place(&mut self, stone: Stone, point: Point) -> Result<(), GoError>;
    fn pass(&mut self, stone: Stone) -> Result<(), GoError>;
    fn clear(&mut self);
}

/// Square stone grid stored as a flat array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Goban {
    board: Vec<i8>,
    size: u8,
}

impl Goban {
    pub fn new(size: u8) -> Self {
        Goban {
            board: vec![0i8; size as usize * size as usize],
            size,
        }
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn stone_at(&self, point: Point) -> Option<Stone> {
        if self.on_board(point) {
            Stone::from_int(self.board[self.idx(point)])
        } else {
            None
        }
    }

    pub fn on_board(&self, point: Point) -> bool {
        coord::on_board(point, self.size)
    }

    pub fn is_empty(&self) -> bool {
        self.board.iter().all(|&s| s == 0)
    }

    pub fn count(&self, stone: Stone) -> usize {
        self.board.iter().filter(|&&s| s == stone.to_int()).count()
    }

    pub fn set_stone(&mut self, point: Point, stone: Stone) {
        let idx = self.idx(point);
        self.board[idx] = stone.to_int();
    }

    pub fn clear(&mut self) {
        self.board.fill(0);
    }

    fn idx(&self, (col, row): Point) -> usize {
        row as usize * self.size as usize + col as usize
    }
}

/// The live board: a stone grid plus the history it was built from.
///
/// Mutations bump `revision`, the counter observers poll. Inside
/// [`LiveBoard::batch`] the bump is deferred until the outermost batch ends,
/// so a whole load shows up as a single change.
#[derive(Debug, Clone)]
pub struct LiveBoard {
    goban: Goban,
    history: HistoryList,
    revision: u64,
    batch_depth: usize,
    dirty: bool,
}

impl LiveBoard {
    pub fn new(size: u8) -> Self {
        Self::with_history(size, HistoryList::new())
    }

    pub fn uninitialized(size: u8) -> Self {
        Self::with_history(size, HistoryList::uninitialized())
    }

    fn with_history(size: u8, history: HistoryList) -> Self {
        Self {
            goban: Goban::new(size),
            history,
            revision: 0,
            batch_depth: 0,
            dirty: false,
        }
    }

    pub fn goban(&self) -> &Goban {
        &self.goban
    }

    pub fn history(&self) -> &HistoryList {
        &self.history
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn stone_at(&self, point: Point) -> Option<Stone> {
        self.goban.stone_at(point)
    }

    /// Run `f` as one observable change.
    pub fn batch<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.batch_depth += 1;
        let result = f(self);
        self.batch_depth -= 1;
        if self.batch_depth == 0 && self.dirty {
            self.dirty = false;
            self.revision += 1;
        }
        result
    }

    pub fn add_try_play(
        &mut self,
        base: NodeId,
        moves: &[(Stone, Option<Point>)],
    ) -> Result<NodeId, GoError> {
        let size = self.size();
        if moves
            .iter()
            .any(|(_, point)| point.is_some_and(|p| !coord::on_board(p, size)))
        {
            return Err(GoError::NotOnBoard);
        }
        let head = self.history.add_try_play(base, moves)?;
        self.touch();
        Ok(head)
    }

    pub fn set_analysis(
        &mut self,
        id: NodeId,
        stats: NodeStats,
        candidates: Vec<CandidateLine>,
    ) -> Result<(), GoError> {
        if !self.history.set_analysis(id, stats, candidates) {
            return Err(GoError::UnknownNode(id));
        }
        self.touch();
        Ok(())
    }

    pub fn swap_branch(&mut self, base: NodeId, index: usize) -> bool {
        let swapped = self.history.swap_branch(base, index);
        if swapped {
            self.rebuild();
        }
        swapped
    }

    pub fn go_to(&mut self, id: NodeId) -> bool {
        let moved = self.history.go_to(id);
        if moved {
            self.rebuild();
        }
        moved
    }

    /// Recompute the grid from the path to the cursor.
    fn rebuild(&mut self) {
        self.goban.clear();
        if let Some(current) = self.history.current() {
            for id in self.history.path_to(current) {
                let node = self.history.node(id);
                if let (Some(stone), Some(point)) = (node.last_color, node.last_move) {
                    self.goban.set_stone(point, stone);
                }
            }
        }
        self.touch();
    }

    fn touch(&mut self) {
        if self.batch_depth > 0 {
            self.dirty = true;
        } else {
            self.revision += 1;
        }
    }
}

impl Board for LiveBoard {
    fn size(&self) -> u8 {
        self.goban.size()
    }

    fn place(&mut self, stone: Stone, point: Point) -> Result<(), GoError> {
        if !self.goban.on_board(point) {
            return Err(GoError::NotOnBoard);
        }
        self.history.play(stone, Some(point))?;
        self.goban.set_stone(point, stone);
        self.touch();
        Ok(())
    }

    fn pass(&mut self, stone: Stone) -> Result<(), GoError> {
        self.history.play(stone, None)?;
        self.touch();
        Ok(())
    }

    fn clear(&mut self) {
        self.goban.clear();
        self.history.clear();
        self.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goban_tracks_stones() {
        let mut goban = Goban::new(9);
        assert!(goban.is_empty());
        goban.set_stone((2, 3), Stone::Black);
        goban.set_stone((8, 8), Stone::White);
        assert_eq!(goban.stone_at((2, 3)), Some(Stone::Black));
        assert_eq!(goban.stone_at((3, 2)), None);
        assert_eq!(goban.stone_at((9, 9)), None);
        assert_eq!(goban.count(Stone::Black), 1);
        assert_eq!(goban.count(Stone::White), 1);
        goban.clear();
        assert!(goban.is_empty());
    }

    #[test]
    fn place_records_history_and_stone() {
        let mut board = LiveBoard::new(19);
        board.place(Stone::Black, (15, 3)).unwrap();
        board.pass(Stone::White).unwrap();

        assert_eq!(board.stone_at((15, 3)), Some(Stone::Black));
        let line = board.history().main_line();
        assert_eq!(line.len(), 2);
        assert!(board.history().node(line[1]).is_pass());
    }

    #[test]
    fn place_rejects_off_board() {
        let mut board = LiveBoard::new(9);
        assert_eq!(board.place(Stone::Black, (9, 0)), Err(GoError::NotOnBoard));
        assert!(board.history().main_line().is_empty());
    }

    #[test]
    fn uninitialized_board_refuses_until_cleared() {
        let mut board = LiveBoard::uninitialized(19);
        assert_eq!(
            board.place(Stone::Black, (0, 0)),
            Err(GoError::Uninitialized)
        );
        board.clear();
        assert!(board.place(Stone::Black, (0, 0)).is_ok());
    }

    #[test]
    fn batch_publishes_one_revision() {
        let mut board = LiveBoard::new(19);
        let before = board.revision();
        board.batch(|b| {
            b.clear();
            b.place(Stone::Black, (3, 3)).unwrap();
            b.place(Stone::White, (15, 15)).unwrap();
            assert_eq!(b.revision(), before);
        });
        assert_eq!(board.revision(), before + 1);

        board.place(Stone::Black, (4, 4)).unwrap();
        assert_eq!(board.revision(), before + 2);
    }

    #[test]
    fn empty_batch_publishes_nothing() {
        let mut board = LiveBoard::new(19);
        board.batch(|_| ());
        assert_eq!(board.revision(), 0);
    }

    #[test]
    fn swap_branch_rebuilds_grid() {
        let mut board = LiveBoard::new(9);
        board.place(Stone::Black, (0, 0)).unwrap();
        let base = board.history().current().unwrap();
        board.place(Stone::White, (1, 1)).unwrap();
        let head = board
            .add_try_play(base, &[(Stone::White, Some((5, 5)))])
            .unwrap();

        assert!(board.swap_branch(base, 0));
        assert!(board.go_to(head));
        assert_eq!(board.stone_at((5, 5)), Some(Stone::White));
        assert_eq!(board.stone_at((1, 1)), None);
        assert_eq!(board.stone_at((0, 0)), Some(Stone::Black));
    }

    #[test]
    fn try_play_rejects_off_board_moves() {
        let mut board = LiveBoard::new(9);
        assert_eq!(
            board.add_try_play(0, &[(Stone::Black, Some((10, 0)))]),
            Err(GoError::NotOnBoard)
        );
        assert!(board.add_try_play(0, &[(Stone::Black, None)]).is_ok());
    }
}
