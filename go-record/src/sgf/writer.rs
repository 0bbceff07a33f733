use crate::Point;
use crate::config::RecordConfig;
use crate::error::RecordError;
use crate::history::{HistoryList, HistoryNode, NodeId};

use super::coord;
use super::serialize::format_real;
use super::types::{Properties, RecordId, RecordTree};
use super::variation::{BranchSource, embed_branches};

/// Nodes analysed at most this many times carry no win-rate comment.
pub const COMMENT_MIN_CALCULATIONS: u32 = 100;

/// Build a record tree from the live history.
///
/// The main line after the initial node becomes the record's main line.
/// Each main-line node's try-plays (and, when enabled, engine candidates)
/// are attached after its continuation; the last node has none to follow
/// and its branches are left out.
pub fn snapshot(
    history: &HistoryList,
    config: &RecordConfig,
    komi: f64,
) -> Result<RecordTree, RecordError> {
    if !history.is_initialized() {
        return Err(RecordError::State("history is not initialized".into()));
    }
    let size = config.board_size;
    let mut tree = RecordTree::with_properties(document_properties(config, komi));

    let mut previous: Option<(RecordId, NodeId)> = None;
    for id in history.main_line() {
        let node = history.node(id);
        let record = tree.push_node(
            previous.map(|(record, _)| record),
            history_node_properties(node, size)?,
        );
        tree.node_mut(record).move_number = node.move_number;

        match previous {
            Some((base_record, base)) => {
                let base_node = history.node(base);
                let try_plays = base_node.try_plays.iter().map(|&head| BranchSource::TryPlay(head));
                let candidates = base_node
                    .candidates
                    .iter()
                    .filter(|_| config.embed_candidates)
                    .map(BranchSource::Candidate);
                embed_branches(
                    &mut tree,
                    history,
                    base_record,
                    base,
                    try_plays.chain(candidates),
                    config,
                )?;
            }
            None => tree.set_root(record),
        }
        previous = Some((record, id));
    }

    Ok(tree)
}

fn document_properties(config: &RecordConfig, komi: f64) -> Properties {
    let mut properties = Properties::new();
    properties.set("FF", "4");
    properties.set("KM", format_real(komi));
    properties.set("GM", "1");
    properties.set("SZ", config.board_size.to_string());
    properties.set("CA", "UTF-8");
    properties.set("AP", config.producer.as_str());
    properties
}

/// The `B`/`W` move and win-rate comment for one history node.
pub(crate) fn history_node_properties(
    node: &HistoryNode,
    board_size: u8,
) -> Result<Properties, RecordError> {
    let mut properties = Properties::new();
    if let Some(color) = node.last_color {
        properties.set(color.move_key(), move_token(node.last_move, board_size)?);
        if node.stats.calculation_count > COMMENT_MIN_CALCULATIONS {
            properties.set(
                "C",
                winrate_comment(node.stats.black_winrate, node.stats.white_winrate()),
            );
        }
    }
    Ok(properties)
}

/// Token for a move; passes and off-board points become the pass sentinel.
pub(crate) fn move_token(point: Option<Point>, board_size: u8) -> Result<String, RecordError> {
    let point = match point {
        Some(p) if coord::on_board(p, board_size) => p,
        _ => coord::pass_point(board_size),
    };
    Ok(coord::coordinate_to_token(point)?)
}

pub(crate) fn winrate_comment(black: f64, white: f64) -> String {
    format!("Black: {black:.1}; White: {white:.1}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{CandidateLine, NodeStats};
    use crate::sgf::serialize;
    use crate::stone::Stone;

    fn history_with(moves: &[(Stone, Option<Point>)]) -> HistoryList {
        let mut history = HistoryList::new();
        for &(stone, point) in moves {
            history.play(stone, point).unwrap();
        }
        history
    }

    #[test]
    fn uninitialized_history_is_a_state_error() {
        let err = snapshot(&HistoryList::uninitialized(), &RecordConfig::default(), 7.5).unwrap_err();
        assert!(matches!(err, RecordError::State(_)));
    }

    #[test]
    fn empty_history_has_document_only() {
        let tree = snapshot(&HistoryList::new(), &RecordConfig::default(), 7.5).unwrap();
        assert!(tree.root().is_none());
        assert_eq!(
            serialize(&tree),
            "(;FF[4]KM[7.5]GM[1]SZ[19]CA[UTF-8]AP[go-record])"
        );
    }

    #[test]
    fn document_property_order() {
        let config = RecordConfig {
            board_size: 9,
            producer: "tester".into(),
            ..RecordConfig::default()
        };
        let tree = snapshot(&HistoryList::new(), &config, 6.0).unwrap();
        let keys: Vec<&str> = tree.properties.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["FF", "KM", "GM", "SZ", "CA", "AP"]);
        assert_eq!(tree.properties.get("KM"), Some("6"));
        assert_eq!(tree.properties.get("SZ"), Some("9"));
        assert_eq!(tree.properties.get("AP"), Some("tester"));
    }

    #[test]
    fn main_line_nodes_carry_moves() {
        let history = history_with(&[
            (Stone::Black, Some((15, 3))),
            (Stone::White, None),
            (Stone::Black, Some((3, 3))),
        ]);
        let tree = snapshot(&history, &RecordConfig::default(), 7.5).unwrap();
        let line = tree.main_line();
        assert_eq!(line.len(), 3);
        assert_eq!(tree.node(line[0]).properties.get("B"), Some("pd"));
        assert_eq!(tree.node(line[1]).properties.get("W"), Some("tt"));
        assert_eq!(tree.node(line[2]).properties.get("B"), Some("dd"));
        assert_eq!(tree.node(line[2]).move_number, 3);
    }

    #[test]
    fn off_board_history_move_is_written_as_pass() {
        let node = HistoryNode {
            move_number: 1,
            last_color: Some(Stone::White),
            last_move: Some((25, 2)),
            stats: NodeStats::default(),
            candidates: Vec::new(),
            parent: Some(0),
            next: None,
            try_plays: Vec::new(),
        };
        let properties = history_node_properties(&node, 19).unwrap();
        assert_eq!(properties.get("W"), Some("tt"));
    }

    #[test]
    fn comment_needs_enough_calculations() {
        let mut history = history_with(&[(Stone::Black, Some((3, 3))), (Stone::White, Some((4, 4)))]);
        let line = history.main_line();
        history.set_analysis(line[0], NodeStats::new(100, 60.0), Vec::new());
        history.set_analysis(line[1], NodeStats::new(101, 48.3), Vec::new());

        let tree = snapshot(&history, &RecordConfig::default(), 7.5).unwrap();
        let record_line = tree.main_line();
        assert!(!tree.node(record_line[0]).properties.contains("C"));
        assert_eq!(
            tree.node(record_line[1]).properties.get("C"),
            Some("Black: 48.3; White: 51.7")
        );
    }

    #[test]
    fn try_play_follows_main_continuation() {
        let mut history = history_with(&[
            (Stone::Black, Some((15, 3))),
            (Stone::White, Some((3, 3))),
            (Stone::Black, Some((15, 15))),
        ]);
        let base = history.main_line()[1];
        history
            .add_try_play(base, &[(Stone::Black, Some((2, 15))), (Stone::White, Some((3, 15)))])
            .unwrap();

        let tree = snapshot(&history, &RecordConfig::default(), 7.5).unwrap();
        assert_eq!(
            serialize(&tree),
            "(;FF[4]KM[7.5]GM[1]SZ[19]CA[UTF-8]AP[go-record];B[pd](;W[dd](;B[pp])(;B[cp](;W[dp]))))"
        );
    }

    #[test]
    fn last_node_branches_are_dropped() {
        let mut history = history_with(&[(Stone::Black, Some((15, 3)))]);
        let last = history.main_line()[0];
        history.add_try_play(last, &[(Stone::White, Some((3, 3)))]).unwrap();

        let tree = snapshot(&history, &RecordConfig::default(), 7.5).unwrap();
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn candidates_only_when_enabled() {
        let mut history = history_with(&[(Stone::Black, Some((15, 3))), (Stone::White, Some((3, 3)))]);
        let first = history.main_line()[0];
        let line = CandidateLine::new(vec![Some((16, 16)), Some((2, 2))], 900, 45.0);
        history.set_analysis(first, NodeStats::new(900, 50.0), vec![line]);

        let tree = snapshot(&history, &RecordConfig::default(), 7.5).unwrap();
        assert_eq!(tree.node(tree.root().unwrap()).children.len(), 1);

        let config = RecordConfig {
            embed_candidates: true,
            ..RecordConfig::default()
        };
        let tree = snapshot(&history, &config, 7.5).unwrap();
        let children = &tree.node(tree.root().unwrap()).children;
        assert_eq!(children.len(), 2);
        assert_eq!(tree.node(children[1]).properties.get("W"), Some("qq"));
        assert_eq!(
            tree.node(children[1]).properties.get("C"),
            Some("Black: 55.0; White: 45.0")
        );
    }
}
