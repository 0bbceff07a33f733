use go_record::Stone;

use crate::common::{play_all, session};

/// A two-move try-play off move 2 sits right after the subtree of move 3.
#[test]
fn try_play_is_sibling_of_main_continuation() {
    let mut s = session();
    play_all(
        &mut s,
        &[
            (Stone::Black, Some((15, 3))),
            (Stone::White, Some((3, 3))),
            (Stone::Black, Some((15, 15))),
            (Stone::White, Some((3, 15))),
        ],
    );
    let move_two = s.history().main_line()[1];
    s.add_try_play(
        move_two,
        &[(Stone::Black, Some((2, 2))), (Stone::White, Some((16, 16)))],
    )
    .unwrap();

    let text = s.snapshot_to_text().unwrap();
    assert!(
        text.ends_with(";B[pd](;W[dd](;B[pp](;W[dp]))(;B[cc](;W[qq]))))"),
        "{text}"
    );
}

#[test]
fn swapped_branch_becomes_main_line() {
    let mut s = session();
    play_all(
        &mut s,
        &[(Stone::Black, Some((15, 3))), (Stone::White, Some((3, 3)))],
    );
    let base = s.history().main_line()[0];
    s.add_try_play(base, &[(Stone::White, Some((16, 16)))]).unwrap();
    assert!(s.swap_branch(base, 0));

    // The old continuation is now the try-play.
    let text = s.snapshot_to_text().unwrap();
    assert!(text.ends_with(";B[pd](;W[qq])(;W[dd]))"), "{text}");
}

#[test]
fn try_plays_are_not_replayed_on_load() {
    let mut s = session();
    play_all(
        &mut s,
        &[(Stone::Black, Some((15, 3))), (Stone::White, Some((3, 3)))],
    );
    let base = s.history().main_line()[0];
    s.add_try_play(base, &[(Stone::White, Some((16, 16)))]).unwrap();
    let text = s.snapshot_to_text().unwrap();

    let mut reloaded = session();
    reloaded.load_from_text(&text).unwrap();
    assert_eq!(reloaded.history().main_line().len(), 2);
    assert_eq!(reloaded.board().stone_at((16, 16)), None);
}
