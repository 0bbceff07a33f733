use std::path::PathBuf;

use go_record::{
    CandidateLine, LoadReport, NodeId, NodeStats, Point, RecordError, Session, Stone,
};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::error::WorkerError;

type Reply<T> = oneshot::Sender<Result<T, RecordError>>;

enum Command {
    LoadFromPath {
        path: PathBuf,
        reply: Reply<LoadReport>,
    },
    LoadFromText {
        text: String,
        reply: Reply<LoadReport>,
    },
    SaveToPath {
        path: PathBuf,
        reply: Reply<()>,
    },
    SnapshotToText {
        reply: Reply<String>,
    },
    Play {
        stone: Stone,
        point: Point,
        reply: Reply<NodeId>,
    },
    Pass {
        stone: Stone,
        reply: Reply<NodeId>,
    },
    Clear {
        reply: Reply<()>,
    },
    SetAnalysis {
        node: NodeId,
        stats: NodeStats,
        candidates: Vec<CandidateLine>,
        reply: Reply<()>,
    },
    AddTryPlay {
        base: NodeId,
        moves: Vec<(Stone, Option<Point>)>,
        reply: Reply<NodeId>,
    },
    SwapBranch {
        base: NodeId,
        index: usize,
        reply: Reply<bool>,
    },
    GoTo {
        id: NodeId,
        reply: Reply<bool>,
    },
    Shutdown,
}

/// Cheap to clone; every clone feeds the same worker.
#[derive(Debug, Clone)]
pub struct WorkerHandle {
    sender: mpsc::UnboundedSender<Command>,
}

/// Start the worker that owns `session`. Requests are applied one at a
/// time in arrival order; the join handle yields the session back after
/// shutdown.
pub fn spawn(session: Session) -> (WorkerHandle, JoinHandle<Session>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    // Loads and saves touch the filesystem, so the loop gets its own thread.
    let join = tokio::task::spawn_blocking(move || run(session, receiver));
    (WorkerHandle { sender }, join)
}

fn run(mut session: Session, mut receiver: mpsc::UnboundedReceiver<Command>) -> Session {
    while let Some(command) = receiver.blocking_recv() {
        match command {
            Command::LoadFromPath { path, reply } => {
                let result = session.load_from_path(&path);
                log_load(&path.display().to_string(), &result);
                let _ = reply.send(result);
            }
            Command::LoadFromText { text, reply } => {
                let result = session.load_from_text(&text);
                log_load("text", &result);
                let _ = reply.send(result);
            }
            Command::SaveToPath { path, reply } => {
                let result = session.save_to_path(&path);
                match &result {
                    Ok(()) => info!(path = %path.display(), "saved record"),
                    Err(e) => error!(path = %path.display(), error = %e, "save failed"),
                }
                let _ = reply.send(result);
            }
            Command::SnapshotToText { reply } => {
                let result = session.snapshot_to_text();
                if let Err(e) = &result {
                    warn!(error = %e, "snapshot failed");
                }
                let _ = reply.send(result);
            }
            Command::Play {
                stone,
                point,
                reply,
            } => {
                let _ = reply.send(session.play(stone, point));
            }
            Command::Pass { stone, reply } => {
                let _ = reply.send(session.pass(stone));
            }
            Command::Clear { reply } => {
                session.clear();
                let _ = reply.send(Ok(()));
            }
            Command::SetAnalysis {
                node,
                stats,
                candidates,
                reply,
            } => {
                let _ = reply.send(session.set_analysis(node, stats, candidates));
            }
            Command::AddTryPlay { base, moves, reply } => {
                let _ = reply.send(session.add_try_play(base, &moves));
            }
            Command::SwapBranch { base, index, reply } => {
                let _ = reply.send(Ok(session.swap_branch(base, index)));
            }
            Command::GoTo { id, reply } => {
                let _ = reply.send(Ok(session.go_to(id)));
            }
            Command::Shutdown => break,
        }
    }
    info!("record worker stopped");
    session
}

fn log_load(source: &str, result: &Result<LoadReport, RecordError>) {
    match result {
        Ok(report) => {
            info!(
                source,
                hidden = report.hidden_move_count,
                placed = report.placed_count,
                skipped = report.skipped_moves,
                "loaded record"
            );
            if report.skipped_moves > 0 {
                warn!(source, skipped = report.skipped_moves, "record had unusable moves");
            }
        }
        Err(e) => error!(source, error = %e, "load failed"),
    }
}

impl WorkerHandle {
    async fn request<T>(
        &self,
        command: impl FnOnce(Reply<T>) -> Command,
    ) -> Result<T, WorkerError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(command(reply))
            .map_err(|_| WorkerError::Closed)?;
        let result = response.await.map_err(|_| WorkerError::Closed)?;
        Ok(result?)
    }

    pub async fn load_from_path(&self, path: impl Into<PathBuf>) -> Result<LoadReport, WorkerError> {
        let path = path.into();
        self.request(|reply| Command::LoadFromPath { path, reply }).await
    }

    pub async fn load_from_text(&self, text: impl Into<String>) -> Result<LoadReport, WorkerError> {
        let text = text.into();
        self.request(|reply| Command::LoadFromText { text, reply }).await
    }

    pub async fn save_to_path(&self, path: impl Into<PathBuf>) -> Result<(), WorkerError> {
        let path = path.into();
        self.request(|reply| Command::SaveToPath { path, reply }).await
    }

    pub async fn snapshot_to_text(&self) -> Result<String, WorkerError> {
        self.request(|reply| Command::SnapshotToText { reply }).await
    }

    pub async fn play(&self, stone: Stone, point: Point) -> Result<NodeId, WorkerError> {
        self.request(|reply| Command::Play {
            stone,
            point,
            reply,
        })
        .await
    }

    pub async fn pass(&self, stone: Stone) -> Result<NodeId, WorkerError> {
        self.request(|reply| Command::Pass { stone, reply }).await
    }

    pub async fn clear(&self) -> Result<(), WorkerError> {
        self.request(|reply| Command::Clear { reply }).await
    }

    pub async fn set_analysis(
        &self,
        node: NodeId,
        stats: NodeStats,
        candidates: Vec<CandidateLine>,
    ) -> Result<(), WorkerError> {
        self.request(|reply| Command::SetAnalysis {
            node,
            stats,
            candidates,
            reply,
        })
        .await
    }

    pub async fn add_try_play(
        &self,
        base: NodeId,
        moves: Vec<(Stone, Option<Point>)>,
    ) -> Result<NodeId, WorkerError> {
        self.request(|reply| Command::AddTryPlay { base, moves, reply })
            .await
    }

    /// Promote try-play `index` of `base` to its main continuation.
    /// `false` when there is no such branch.
    pub async fn swap_branch(&self, base: NodeId, index: usize) -> Result<bool, WorkerError> {
        self.request(|reply| Command::SwapBranch { base, index, reply })
            .await
    }

    pub async fn go_to(&self, id: NodeId) -> Result<bool, WorkerError> {
        self.request(|reply| Command::GoTo { id, reply }).await
    }

    /// Ask the worker to stop after the requests already queued.
    pub fn shutdown(&self) -> Result<(), WorkerError> {
        self.sender
            .send(Command::Shutdown)
            .map_err(|_| WorkerError::Closed)
    }
}
