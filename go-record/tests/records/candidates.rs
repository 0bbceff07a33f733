use go_record::sgf::variation::{CANDIDATE_MIN_PLAYOUTS, MAX_CANDIDATE_BRANCHES};
use go_record::{CandidateLine, NodeStats, RecordConfig, RecordTree, Stone};

use crate::common::{play_all, session_with};

fn embedding_config(variation_limit: usize) -> RecordConfig {
    RecordConfig {
        embed_candidates: true,
        variation_limit,
        ..RecordConfig::default()
    }
}

fn branch_depth(tree: &RecordTree, head: usize) -> usize {
    let mut depth = 1;
    let mut next = tree.node(head).main_child();
    while let Some(id) = next {
        depth += 1;
        next = tree.node(id).main_child();
    }
    depth
}

fn parse_comment(comment: &str) -> (f64, f64) {
    let (black, white) = comment.split_once("; ").unwrap();
    let black = black.strip_prefix("Black: ").unwrap().parse().unwrap();
    let white = white.strip_prefix("White: ").unwrap().parse().unwrap();
    (black, white)
}

#[test]
fn candidate_branches_respect_limits() {
    let limit = 4;
    let mut s = session_with(embedding_config(limit));
    play_all(
        &mut s,
        &[(Stone::Black, Some((15, 3))), (Stone::White, Some((3, 3)))],
    );
    let base = s.history().main_line()[0];
    let candidates: Vec<CandidateLine> = (0..9u8)
        .map(|i| {
            let moves = (0..(i + 2)).map(|j| Some((j, i))).collect();
            let playouts = if i == 1 { CANDIDATE_MIN_PLAYOUTS } else { 1000 };
            CandidateLine::new(moves, playouts, 40.0 + f64::from(i) * 1.3)
        })
        .collect();
    s.set_analysis(base, NodeStats::new(5000, 51.0), candidates)
        .unwrap();

    let tree = s.snapshot().unwrap();
    let root = tree.root().unwrap();
    let branches = tree.node(root).variations();
    assert_eq!(branches.len(), MAX_CANDIDATE_BRANCHES);

    for &head in branches {
        assert!(branch_depth(&tree, head) <= limit);
        let (black, white) = parse_comment(tree.node(head).properties.get("C").unwrap());
        assert!((black + white - 100.0).abs() < 0.11, "{black} + {white}");
    }
}

#[test]
fn candidates_stay_out_by_default() {
    let mut s = session_with(RecordConfig::default());
    play_all(
        &mut s,
        &[(Stone::Black, Some((15, 3))), (Stone::White, Some((3, 3)))],
    );
    let base = s.history().main_line()[0];
    let line = CandidateLine::new(vec![Some((16, 16))], 5000, 50.0);
    s.set_analysis(base, NodeStats::default(), vec![line]).unwrap();

    let tree = s.snapshot().unwrap();
    assert!(tree.node(tree.root().unwrap()).variations().is_empty());
}
