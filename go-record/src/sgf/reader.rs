use serde::Serialize;
use tracing::{debug, warn};

use crate::Point;
use crate::board::Board;
use crate::config::ReadPolicy;
use crate::error::RecordError;
use crate::replayer::MoveReplayer;
use crate::stone::Stone;

use super::coord;
use super::error::SgfError;
use super::types::{Properties, RecordTree};

/// What a load did to the board.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadReport {
    /// Stones placed from the document-level `AB`/`AW` lists.
    pub hidden_move_count: usize,
    /// Implicit passes inserted between those setup stones.
    pub setup_passes: usize,
    /// Positions added while walking the main line, implicit passes included.
    pub placed_count: usize,
    /// Moves and setup stones dropped under the lenient policy.
    pub skipped_moves: usize,
    /// `SZ` as written in the record, when present.
    pub record_board_size: Option<u8>,
    /// `KM` as written in the record, when present and well formed.
    pub komi: Option<f64>,
}

/// Replay the main line of `tree` onto `board`.
///
/// Document setup stones go first and are reported as hidden moves; the
/// main line follows, including per-node setup stones. Variations in the
/// source record are not replayed. On an abort, whatever was applied before
/// the failure stays on the board.
pub fn replay_record<B: Board + ?Sized>(
    tree: &RecordTree,
    board: &mut B,
    policy: ReadPolicy,
) -> Result<LoadReport, RecordError> {
    let mut report = LoadReport::default();
    let mut replayer = MoveReplayer::new();
    let size = board.size();

    if let Some(value) = tree.properties.get("SZ") {
        match parse_size(value) {
            Ok(record_size) => {
                if record_size != size {
                    warn!(record_size, board_size = size, "record size differs from the board");
                }
                report.record_board_size = Some(record_size);
            }
            Err(e) => tolerate(policy, None, e.into())?,
        }
    }
    if let Some(value) = tree.properties.get("KM") {
        match parse_komi(value) {
            Ok(komi) => report.komi = Some(komi),
            Err(e) => tolerate(policy, None, e.into())?,
        }
    }

    place_setup(&tree.properties, None, &mut replayer, board, policy, &mut report)?;
    report.hidden_move_count = replayer.placed_count() - replayer.inserted_passes();
    report.setup_passes = replayer.inserted_passes();
    replayer.reset_placed_count();

    for (index, id) in tree.main_line().into_iter().enumerate() {
        let properties = &tree.node(id).properties;
        place_setup(properties, Some(index), &mut replayer, board, policy, &mut report)?;

        for stone in [Stone::Black, Stone::White] {
            let Some(value) = properties.get(stone.move_key()) else {
                continue;
            };
            match decode_move(value, size) {
                Ok(point) => replayer.play_move(board, stone, point)?,
                Err(e) => {
                    tolerate(policy, Some(index), e)?;
                    report.skipped_moves += 1;
                }
            }
        }
    }

    report.placed_count = replayer.placed_count();
    debug!(
        hidden = report.hidden_move_count,
        placed = report.placed_count,
        skipped = report.skipped_moves,
        "record replayed"
    );
    Ok(report)
}

/// Feed `AB`/`AW` stones pairwise: black, white, then the rest of the
/// longer list.
fn place_setup<B: Board + ?Sized>(
    properties: &Properties,
    node: Option<usize>,
    replayer: &mut MoveReplayer,
    board: &mut B,
    policy: ReadPolicy,
    report: &mut LoadReport,
) -> Result<(), RecordError> {
    let size = board.size();
    let mut lists: [Vec<Point>; 2] = [Vec::new(), Vec::new()];

    for (slot, stone) in [Stone::Black, Stone::White].into_iter().enumerate() {
        let Some(value) = properties.get(stone.setup_key()) else {
            continue;
        };
        for token in value.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            match decode_setup(token, size) {
                Ok(points) => lists[slot].extend(points),
                Err(e) => {
                    tolerate(policy, node, e)?;
                    report.skipped_moves += 1;
                }
            }
        }
    }

    let [black, white] = lists;
    for i in 0..black.len().max(white.len()) {
        if let Some(&point) = black.get(i) {
            replayer.play_move(board, Stone::Black, point)?;
        }
        if let Some(&point) = white.get(i) {
            replayer.play_move(board, Stone::White, point)?;
        }
    }
    Ok(())
}

/// A move value: empty and the pass sentinel both mean pass.
fn decode_move(value: &str, size: u8) -> Result<Point, RecordError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(coord::pass_point(size));
    }
    let point = coord::token_to_coordinate(value)?;
    if coord::is_pass(point, size) || coord::on_board(point, size) {
        Ok(point)
    } else {
        Err(RecordError::Bounds {
            point,
            board_size: size,
        })
    }
}

/// A setup token, possibly a compressed `aa:cc` rectangle.
fn decode_setup(token: &str, size: u8) -> Result<Vec<Point>, RecordError> {
    let on_board = |point: Point| {
        if coord::on_board(point, size) {
            Ok(point)
        } else {
            Err(RecordError::Bounds {
                point,
                board_size: size,
            })
        }
    };

    match token.split_once(':') {
        None => Ok(vec![on_board(coord::token_to_coordinate(token)?)?]),
        Some((from, to)) => {
            let (x1, y1) = on_board(coord::token_to_coordinate(from.trim())?)?;
            let (x2, y2) = on_board(coord::token_to_coordinate(to.trim())?)?;
            let mut points = Vec::new();
            for y in y1.min(y2)..=y1.max(y2) {
                for x in x1.min(x2)..=x1.max(x2) {
                    points.push((x, y));
                }
            }
            Ok(points)
        }
    }
}

fn parse_size(value: &str) -> Result<u8, SgfError> {
    // Rectangular sizes ("19:13") report their width.
    let width = value.split(':').next().unwrap_or(value).trim();
    match width.parse::<u8>() {
        Ok(n) if (1..=coord::MAX_BOARD_SIZE).contains(&n) => Ok(n),
        _ => Err(SgfError::InvalidValue {
            key: "SZ".to_string(),
            value: value.to_string(),
            reason: format!("expected a size in 1..={}", coord::MAX_BOARD_SIZE),
        }),
    }
}

fn parse_komi(value: &str) -> Result<f64, SgfError> {
    match value.trim().parse::<f64>() {
        Ok(komi) if komi.is_finite() => Ok(komi),
        _ => Err(SgfError::InvalidValue {
            key: "KM".to_string(),
            value: value.to_string(),
            reason: "expected a real number".to_string(),
        }),
    }
}

fn tolerate(policy: ReadPolicy, node: Option<usize>, err: RecordError) -> Result<(), RecordError> {
    if !err.is_per_node() || policy == ReadPolicy::Strict {
        return Err(err);
    }
    debug!(?node, reason = %err, "skipping unusable record value");
    Ok(())
}
