use go_record::{HistoryList, Point, RecordConfig, Session, Stone};

pub fn session() -> Session {
    Session::new(RecordConfig::default()).unwrap()
}

pub fn session_with(config: RecordConfig) -> Session {
    Session::new(config).unwrap()
}

/// (color, coordinate) along the main line; `None` coordinates are passes.
pub fn main_line(history: &HistoryList) -> Vec<(Stone, Option<Point>)> {
    history
        .main_line()
        .into_iter()
        .filter_map(|id| {
            let node = history.node(id);
            node.last_color.map(|c| (c, node.last_move))
        })
        .collect()
}

pub fn play_all(session: &mut Session, moves: &[(Stone, Option<Point>)]) {
    for &(stone, point) in moves {
        match point {
            Some(p) => session.play(stone, p).unwrap(),
            None => session.pass(stone).unwrap(),
        };
    }
}
