use go_record::{ReadPolicy, RecordConfig, RecordError, Stone};

use crate::common::{main_line, session, session_with};

/// Two plain moves: both placed, nothing hidden.
#[test]
fn two_moves_no_hidden_stones() {
    let mut s = session();
    let report = s.load_from_text("(;FF[4]SZ[19];B[pd];W[dd])").unwrap();

    assert_eq!(report.hidden_move_count, 0);
    assert_eq!(report.placed_count, 2);
    assert_eq!(
        main_line(s.history()),
        vec![(Stone::Black, Some((15, 3))), (Stone::White, Some((3, 3)))]
    );
}

/// Setup stones only: two hidden black stones, no white stones.
#[test]
fn setup_stones_are_hidden_moves() {
    let mut s = session();
    let report = s.load_from_text("(;FF[4]SZ[19]AB[pd][dd])").unwrap();

    assert_eq!(report.hidden_move_count, 2);
    assert_eq!(s.board().goban().count(Stone::Black), 2);
    assert_eq!(s.board().goban().count(Stone::White), 0);
    assert_eq!(s.board().stone_at((15, 3)), Some(Stone::Black));
    assert_eq!(s.board().stone_at((3, 3)), Some(Stone::Black));
}

/// Whatever the record does to turn order, the loaded main line alternates.
#[test]
fn loaded_main_line_always_alternates() {
    let records = [
        "(;SZ[19];W[pd];W[dd];B[pp];B[dp])",
        "(;SZ[19]AB[aa][bb][cc]AW[dd];W[ee];W[ff])",
        "(;SZ[19];B[pd];AB[qq]AW[rr];W[zz];B[tt];B[])",
        "(;SZ[19]AW[aa:cc];W[dd])",
    ];
    for record in records {
        let mut s = session();
        s.load_from_text(record).unwrap();
        assert!(s.history().main_line_alternates(), "{record}");
    }
}

#[test]
fn handicap_game_keeps_moves_after_setup() {
    let mut s = session();
    let report = s
        .load_from_text("(;GM[1]FF[4]SZ[19]HA[2]KM[0.5]AB[dp][pd];W[dd];B[pp])")
        .unwrap();

    assert_eq!(report.hidden_move_count, 2);
    assert_eq!(report.komi, Some(0.5));
    assert_eq!(s.komi(), 0.5);
    let line = main_line(s.history());
    // Setup: B, (W pass), B. Then W[dd], B[pp].
    assert_eq!(line.len(), 5);
    assert_eq!(line[3], (Stone::White, Some((3, 3))));
    assert_eq!(line[4], (Stone::Black, Some((15, 15))));
}

#[test]
fn record_size_mismatch_is_reported() {
    let mut s = session();
    let report = s.load_from_text("(;SZ[9];B[ee])").unwrap();
    assert_eq!(report.record_board_size, Some(9));
    assert_eq!(s.board().goban().size(), 19);
    assert_eq!(s.board().stone_at((4, 4)), Some(Stone::Black));
}

#[test]
fn lenient_and_strict_disagree_on_bad_moves() {
    let record = "(;SZ[19];B[pd];W[Zz];B[dd])";

    let mut lenient = session();
    let report = lenient.load_from_text(record).unwrap();
    assert_eq!(report.skipped_moves, 1);

    let mut strict = session_with(RecordConfig {
        read_policy: ReadPolicy::Strict,
        ..RecordConfig::default()
    });
    let err = strict.load_from_text(record).unwrap_err();
    assert!(matches!(err, RecordError::Bounds { .. }));
    assert_eq!(main_line(strict.history()).len(), 1);
}

#[test]
fn malformed_document_is_an_error() {
    let mut s = session();
    for text in ["", "B[pd]", "(;B[pd]", "(;B[pd](;W[dd]);B[pp])"] {
        assert!(
            matches!(s.load_from_text(text), Err(RecordError::Format(_))),
            "{text:?}"
        );
    }
}
