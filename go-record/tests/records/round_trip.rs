use go_record::Stone;
use go_record::sgf;

use crate::common::{main_line, play_all, session};

/// Saving and reloading reproduces the main line, passes included.
#[test]
fn snapshot_reloads_to_same_main_line() {
    let mut s = session();
    play_all(
        &mut s,
        &[
            (Stone::Black, Some((15, 3))),
            (Stone::White, Some((3, 3))),
            (Stone::Black, None),
            (Stone::White, Some((16, 16))),
            (Stone::Black, Some((0, 18))),
            (Stone::White, None),
        ],
    );
    let text = s.snapshot_to_text().unwrap();

    let mut reloaded = session();
    reloaded.load_from_text(&text).unwrap();
    assert_eq!(main_line(reloaded.history()), main_line(s.history()));
}

#[test]
fn pass_is_written_as_tt_on_19() {
    let mut s = session();
    play_all(&mut s, &[(Stone::Black, Some((3, 3))), (Stone::White, None)]);
    let text = s.snapshot_to_text().unwrap();
    assert!(text.contains("W[tt]"), "{text}");
    assert!(!text.contains("[]"), "{text}");
}

#[test]
fn normalizing_is_stable() {
    let mut s = session();
    s.load_from_text("(;FF[4]GM[1]SZ[19]KM[6.5]PB[a]PW[b];B[pd];W[dd];B[pp];W[dp];B[])")
        .unwrap();
    let first = s.snapshot_to_text().unwrap();

    let mut again = session();
    again.load_from_text(&first).unwrap();
    assert_eq!(again.snapshot_to_text().unwrap(), first);
}

/// Deep games nest one level per move; reading them back must not recurse.
#[test]
fn long_game_round_trips() {
    let mut s = session();
    let mut stone = Stone::Black;
    for i in 0..2000u32 {
        let point = ((i % 19) as u8, ((i / 19) % 19) as u8);
        s.play(stone, point).unwrap();
        stone = stone.opposite();
    }
    let text = s.snapshot_to_text().unwrap();
    let tree = sgf::parse(&text).unwrap();
    assert_eq!(tree.main_line().len(), 2000);

    let mut reloaded = session();
    let report = reloaded.load_from_text(&text).unwrap();
    assert_eq!(report.placed_count, 2000);
}
