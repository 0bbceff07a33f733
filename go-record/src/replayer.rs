use crate::Point;
use crate::board::Board;
use crate::error::GoError;
use crate::sgf::coord;
use crate::stone::Stone;

/// Feeds colored moves to a board while keeping colors alternating.
///
/// Records may drop pass markers or list consecutive same-colored stones.
/// Rather than reject them, the replayer inserts the single pass that makes
/// the requested move legal in turn order.
#[derive(Debug, Clone)]
pub struct MoveReplayer {
    expected: Stone,
    placed_count: usize,
    inserted_passes: usize,
}

impl MoveReplayer {
    pub fn new() -> Self {
        Self {
            expected: Stone::Black,
            placed_count: 0,
            inserted_passes: 0,
        }
    }

    pub fn expected_color(&self) -> Stone {
        self.expected
    }

    /// Positions added to the board since the last reset, implicit passes included.
    pub fn placed_count(&self) -> usize {
        self.placed_count
    }

    /// How many of `placed_count` were implicit passes.
    pub fn inserted_passes(&self) -> usize {
        self.inserted_passes
    }

    pub fn reset_placed_count(&mut self) {
        self.placed_count = 0;
        self.inserted_passes = 0;
    }

    /// Apply `stone` at `point`, where the pass sentinel `(size, size)` means a
    /// pass. Out of turn, a pass for the expected color goes first.
    pub fn play_move<B: Board + ?Sized>(
        &mut self,
        board: &mut B,
        stone: Stone,
        point: Point,
    ) -> Result<(), GoError> {
        if stone != self.expected {
            board.pass(self.expected)?;
            self.expected = stone;
            self.placed_count += 1;
            self.inserted_passes += 1;
        }

        if coord::is_pass(point, board.size()) {
            board.pass(stone)?;
        } else {
            board.place(stone, point)?;
        }
        self.expected = stone.opposite();
        self.placed_count += 1;
        Ok(())
    }
}

impl Default for MoveReplayer {
    fn default() -> Self {
        Self::new()
    }
}
