use serde::{Deserialize, Serialize};

use crate::Point;
use crate::error::GoError;
use crate::stone::Stone;

pub type NodeId = usize;

/// Engine statistics attached to a position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeStats {
    pub calculation_count: u32,
    /// Percent, 0..=100.
    pub black_winrate: f64,
}

impl NodeStats {
    pub fn new(calculation_count: u32, black_winrate: f64) -> Self {
        Self {
            calculation_count,
            black_winrate,
        }
    }

    pub fn white_winrate(&self) -> f64 {
        100.0 - self.black_winrate
    }
}

/// A ranked engine continuation. `None` entries are passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateLine {
    pub moves: Vec<Option<Point>>,
    pub playouts: u32,
    /// Percent, for the side to move at the base position.
    pub winrate: f64,
}

impl CandidateLine {
    pub fn new(moves: Vec<Option<Point>>, playouts: u32, winrate: f64) -> Self {
        Self {
            moves,
            playouts,
            winrate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryNode {
    pub move_number: u32,
    /// `None` for the initial node and setup-only positions.
    pub last_color: Option<Stone>,
    /// `None` with a color set means a pass.
    pub last_move: Option<Point>,
    #[serde(default)]
    pub stats: NodeStats,
    #[serde(default)]
    pub candidates: Vec<CandidateLine>,
    pub parent: Option<NodeId>,
    /// Main-line successor.
    pub next: Option<NodeId>,
    /// Heads of try-play branches explored from this position.
    #[serde(default)]
    pub try_plays: Vec<NodeId>,
}

impl HistoryNode {
    fn initial() -> Self {
        Self {
            move_number: 0,
            last_color: None,
            last_move: None,
            stats: NodeStats::default(),
            candidates: Vec::new(),
            parent: None,
            next: None,
            try_plays: Vec::new(),
        }
    }

    fn after(parent: NodeId, move_number: u32, stone: Stone, point: Option<Point>) -> Self {
        Self {
            move_number,
            last_color: Some(stone),
            last_move: point,
            parent: Some(parent),
            ..Self::initial()
        }
    }

    pub fn is_pass(&self) -> bool {
        self.last_color.is_some() && self.last_move.is_none()
    }

    fn same_move(&self, stone: Stone, point: Option<Point>) -> bool {
        self.last_color == Some(stone) && self.last_move == point
    }
}

/// The live game history: an arena of positions with a movable cursor.
///
/// Node 0 is the initial position once the list is initialized. Nodes are
/// never removed; re-linking a continuation orphans the old chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryList {
    nodes: Vec<HistoryNode>,
    current: NodeId,
}

impl HistoryList {
    pub fn new() -> Self {
        Self {
            nodes: vec![HistoryNode::initial()],
            current: 0,
        }
    }

    /// A list with no initial node; snapshots of it fail.
    pub fn uninitialized() -> Self {
        Self {
            nodes: Vec::new(),
            current: 0,
        }
    }

    pub fn is_initialized(&self) -> bool {
        !self.nodes.is_empty()
    }

    pub fn initial_node(&self) -> Option<NodeId> {
        self.is_initialized().then_some(0)
    }

    pub fn current(&self) -> Option<NodeId> {
        self.is_initialized().then_some(self.current)
    }

    pub fn node(&self, id: NodeId) -> &HistoryNode {
        &self.nodes[id]
    }

    pub fn get(&self, id: NodeId) -> Option<&HistoryNode> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop everything and start over from a fresh initial node.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.nodes.push(HistoryNode::initial());
        self.current = 0;
    }

    /// Color expected to move at the cursor.
    pub fn next_color(&self) -> Stone {
        self.current()
            .and_then(|id| self.nodes[id].last_color)
            .map_or(Stone::Black, Stone::opposite)
    }

    /// Play a move (or pass, with `None`) as the main continuation of the
    /// cursor and advance to it. An identical existing continuation is reused.
    pub fn play(&mut self, stone: Stone, point: Option<Point>) -> Result<NodeId, GoError> {
        let current = self.current().ok_or(GoError::Uninitialized)?;

        if let Some(next) = self.nodes[current].next
            && self.nodes[next].same_move(stone, point)
        {
            self.current = next;
            return Ok(next);
        }

        let move_number = self.nodes[current].move_number + 1;
        let id = self.push(HistoryNode::after(current, move_number, stone, point));
        self.nodes[current].next = Some(id);
        self.current = id;
        Ok(id)
    }

    /// Record a try-play branch hanging off `base`. Returns the branch head.
    pub fn add_try_play(
        &mut self,
        base: NodeId,
        moves: &[(Stone, Option<Point>)],
    ) -> Result<NodeId, GoError> {
        if base >= self.nodes.len() {
            return Err(GoError::UnknownNode(base));
        }
        let Some((&(stone, point), rest)) = moves.split_first() else {
            return Err(GoError::EmptyBranch);
        };

        let head_number = self.nodes[base].move_number + 1;
        let head = self.push(HistoryNode::after(base, head_number, stone, point));
        self.nodes[base].try_plays.push(head);

        let mut tail = head;
        for &(stone, point) in rest {
            let number = self.nodes[tail].move_number + 1;
            let id = self.push(HistoryNode::after(tail, number, stone, point));
            self.nodes[tail].next = Some(id);
            tail = id;
        }
        Ok(head)
    }

    /// Attach engine output to a position. Returns false for an unknown node.
    pub fn set_analysis(
        &mut self,
        id: NodeId,
        stats: NodeStats,
        candidates: Vec<CandidateLine>,
    ) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.stats = stats;
                node.candidates = candidates;
                true
            }
            None => false,
        }
    }

    /// Exchange the main continuation of `base` with its `index`-th try-play
    /// branch. Without a main continuation the branch is promoted.
    pub fn swap_branch(&mut self, base: NodeId, index: usize) -> bool {
        let Some(node) = self.nodes.get_mut(base) else {
            return false;
        };
        if index >= node.try_plays.len() {
            return false;
        }
        match node.next {
            Some(main) => {
                node.next = Some(std::mem::replace(&mut node.try_plays[index], main));
            }
            None => node.next = Some(node.try_plays.remove(index)),
        }
        true
    }

    /// Move the cursor. Returns false for an unknown node.
    pub fn go_to(&mut self, id: NodeId) -> bool {
        if id < self.nodes.len() {
            self.current = id;
            true
        } else {
            false
        }
    }

    pub fn previous(&mut self) -> bool {
        match self.current().and_then(|id| self.nodes[id].parent) {
            Some(parent) => self.go_to(parent),
            None => false,
        }
    }

    pub fn next(&mut self) -> bool {
        match self.current().and_then(|id| self.nodes[id].next) {
            Some(next) => self.go_to(next),
            None => false,
        }
    }

    /// Walk `next` links starting at (and including) `head`.
    pub fn chain(&self, head: NodeId) -> Chain<'_> {
        Chain {
            list: self,
            next: self.nodes.get(head).map(|_| head),
        }
    }

    /// The canonical game: the initial node's main line, excluding it.
    pub fn main_line(&self) -> Vec<NodeId> {
        match self.initial_node().and_then(|id| self.nodes[id].next) {
            Some(first) => self.chain(first).collect(),
            None => Vec::new(),
        }
    }

    /// Path from the initial node to `id`, root first.
    pub fn path_to(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = self.nodes.get(id).map(|_| id);
        while let Some(id) = current {
            path.push(id);
            current = self.nodes[id].parent;
        }
        path.reverse();
        path
    }

    /// True when every colored position on the main line has the opposite
    /// color of the colored position before it.
    pub fn main_line_alternates(&self) -> bool {
        let colors: Vec<Stone> = self
            .main_line()
            .into_iter()
            .filter_map(|id| self.nodes[id].last_color)
            .collect();
        colors.windows(2).all(|w| w[0] != w[1])
    }

    fn push(&mut self, node: HistoryNode) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(node);
        id
    }
}

impl Default for HistoryList {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Chain<'a> {
    list: &'a HistoryList,
    next: Option<NodeId>,
}

impl Iterator for Chain<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.list.nodes[id].next;
        Some(id)
    }
}
