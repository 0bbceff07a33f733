//! Side branches attached under a record node.

use arrayvec::ArrayVec;

use crate::config::RecordConfig;
use crate::error::RecordError;
use crate::history::{CandidateLine, HistoryList, NodeId};
use crate::stone::Stone;

use super::types::{Properties, RecordId, RecordTree};
use super::writer::{history_node_properties, move_token, winrate_comment};

/// Candidates at or below this many playouts are too shallow to keep.
pub const CANDIDATE_MIN_PLAYOUTS: u32 = 200;
pub const MAX_CANDIDATE_BRANCHES: usize = 5;

/// Where a side branch comes from.
#[derive(Debug, Clone, Copy)]
pub enum BranchSource<'a> {
    /// A recorded try-play chain, by its head node.
    TryPlay(NodeId),
    /// An engine continuation from the base position.
    Candidate(&'a CandidateLine),
}

/// Attach `sources` as children of `parent`, after whatever children it
/// already has. `base` is the history node `parent` was written from.
///
/// Try-play chains are written in full, their own try-plays included.
/// Candidates are filtered by playouts, capped at
/// [`MAX_CANDIDATE_BRANCHES`] and cut to `config.variation_limit` moves.
/// Returns the number of branches attached.
pub fn embed_branches<'a>(
    tree: &mut RecordTree,
    history: &HistoryList,
    parent: RecordId,
    base: NodeId,
    sources: impl IntoIterator<Item = BranchSource<'a>>,
    config: &RecordConfig,
) -> Result<usize, RecordError> {
    let mut try_plays = Vec::new();
    let mut candidates: ArrayVec<&CandidateLine, MAX_CANDIDATE_BRANCHES> = ArrayVec::new();

    for source in sources {
        match source {
            BranchSource::TryPlay(head) => try_plays.push(head),
            BranchSource::Candidate(line) => {
                if line.playouts <= CANDIDATE_MIN_PLAYOUTS
                    || line.moves.is_empty()
                    || config.variation_limit == 0
                    || candidates.is_full()
                {
                    continue;
                }
                candidates.push(line);
            }
        }
    }

    for &head in &try_plays {
        embed_try_play(tree, history, parent, head, config.board_size)?;
    }
    let first_color = history
        .get(base)
        .and_then(|node| node.last_color)
        .map_or(Stone::Black, Stone::opposite);
    for line in &candidates {
        embed_candidate(tree, parent, line, first_color, config)?;
    }

    Ok(try_plays.len() + candidates.len())
}

fn embed_try_play(
    tree: &mut RecordTree,
    history: &HistoryList,
    parent: RecordId,
    head: NodeId,
    board_size: u8,
) -> Result<(), RecordError> {
    let mut pending = vec![(parent, head)];

    while let Some((attach_to, head)) = pending.pop() {
        let mut previous: Option<(RecordId, NodeId)> = None;
        for id in history.chain(head) {
            let node = history.node(id);
            let record_parent = previous.map_or(attach_to, |(record, _)| record);
            let record = tree.push_node(Some(record_parent), history_node_properties(node, board_size)?);
            tree.node_mut(record).move_number = node.move_number;

            // Nested branches go after the successor just attached.
            if let Some((prev_record, prev_id)) = previous {
                for &nested in history.node(prev_id).try_plays.iter().rev() {
                    pending.push((prev_record, nested));
                }
            }
            previous = Some((record, id));
        }
    }
    Ok(())
}

fn embed_candidate(
    tree: &mut RecordTree,
    parent: RecordId,
    line: &CandidateLine,
    first_color: Stone,
    config: &RecordConfig,
) -> Result<(), RecordError> {
    let mut attach_to = parent;
    let mut color = first_color;

    for (i, &point) in line.moves.iter().take(config.variation_limit).enumerate() {
        let mut properties = Properties::new();
        properties.set(color.move_key(), move_token(point, config.board_size)?);
        // Kept candidates are all past the playout floor, so the head always
        // carries the win rate.
        if i == 0 {
            let (black, white) = match color {
                Stone::Black => (line.winrate, 100.0 - line.winrate),
                Stone::White => (100.0 - line.winrate, line.winrate),
            };
            properties.set("C", winrate_comment(black, white));
        }
        attach_to = tree.push_node(Some(attach_to), properties);
        color = color.opposite();
    }
    Ok(())
}
