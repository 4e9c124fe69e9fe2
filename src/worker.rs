use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use log::{debug, info, warn};

use crate::layout::{EDGE_STRIDE, InitialLayout, LayoutParams, LayoutSession, UpdatedLayout};
use crate::shader_data::ShaderForest;

pub enum LayoutCommand {
    /// Start a new session for `forest`, replacing any previous one.
    Initialize {
        forest: Arc<ShaderForest>,
        params: LayoutParams,
    },
    /// Refine the current session's layout starting from `positions`.
    Optimize { positions: Vec<f32> },
}

pub enum LayoutResponse {
    InitialLayout(InitialLayout),
    UpdatedLayout(UpdatedLayout),
    Failed(String),
}

/// Handle to the background thread that owns the layout session.
///
/// Buffers travel through the channels by move. Dropping the handle closes
/// the command channel and joins the thread.
pub struct LayoutWorker {
    commands: Option<Sender<LayoutCommand>>,
    responses: Receiver<LayoutResponse>,
    handle: Option<JoinHandle<()>>,
}

impl LayoutWorker {
    pub fn spawn() -> Result<Self> {
        let (command_tx, command_rx) = mpsc::channel();
        let (response_tx, response_rx) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("layout-worker".to_owned())
            .spawn(move || run_worker(command_rx, response_tx))
            .context("failed to spawn layout worker thread")?;

        Ok(Self {
            commands: Some(command_tx),
            responses: response_rx,
            handle: Some(handle),
        })
    }

    pub fn send(&self, command: LayoutCommand) -> Result<()> {
        self.commands
            .as_ref()
            .ok_or_else(|| anyhow!("layout worker is shutting down"))?
            .send(command)
            .map_err(|_| anyhow!("layout worker disconnected"))
    }

    pub fn try_recv(&self) -> Result<LayoutResponse, TryRecvError> {
        self.responses.try_recv()
    }
}

impl Drop for LayoutWorker {
    fn drop(&mut self) {
        self.commands.take();
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            warn!("layout worker panicked");
        }
    }
}

fn run_worker(commands: Receiver<LayoutCommand>, responses: Sender<LayoutResponse>) {
    let mut session = None;

    while let Ok(command) = commands.recv() {
        let Some(response) = handle_command(&mut session, command) else {
            continue;
        };
        if responses.send(response).is_err() {
            break;
        }
    }

    debug!("layout worker stopped");
}

fn handle_command(
    session: &mut Option<LayoutSession>,
    command: LayoutCommand,
) -> Option<LayoutResponse> {
    match command {
        LayoutCommand::Initialize { forest, params } => {
            let started = Instant::now();
            let next = session.insert(LayoutSession::new(forest, params));

            Some(match next.initialize() {
                Ok(layout) => {
                    info!(
                        "laid out {} nodes and {} edges in {:.1?} (seed {})",
                        next.node_count(),
                        layout.edges.len() / EDGE_STRIDE,
                        started.elapsed(),
                        layout.seed
                    );
                    LayoutResponse::InitialLayout(layout)
                }
                Err(error) => {
                    warn!("initial layout failed: {error}");
                    *session = None;
                    LayoutResponse::Failed(error.to_string())
                }
            })
        }
        LayoutCommand::Optimize { positions } => {
            let Some(current) = session.as_ref() else {
                warn!("ignoring optimize request: no layout has been initialized");
                return None;
            };

            Some(match current.optimize(positions) {
                Ok(updated) => {
                    debug!("optimize request left {} nodes in place", current.node_count());
                    LayoutResponse::UpdatedLayout(updated)
                }
                Err(error) => {
                    warn!("optimize request failed: {error}");
                    LayoutResponse::Failed(error.to_string())
                }
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(10);

    fn initialize(parents: &[i64], seed: u64) -> LayoutCommand {
        LayoutCommand::Initialize {
            forest: Arc::new(ShaderForest::from_parents(parents)),
            params: LayoutParams {
                seed: Some(seed),
                ..LayoutParams::default()
            },
        }
    }

    #[test]
    fn initialize_replies_with_all_three_buffers() {
        let worker = LayoutWorker::spawn().unwrap();
        worker.send(initialize(&[-1, 0, 0, -1], 5)).unwrap();

        let Ok(LayoutResponse::InitialLayout(layout)) = worker.responses.recv_timeout(TIMEOUT)
        else {
            panic!("expected an initial layout");
        };
        assert_eq!(layout.positions.len(), 8);
        assert_eq!(layout.colors.len(), 12);
        assert_eq!(layout.edges.len(), 8);
    }

    #[test]
    fn optimize_round_trips_positions() {
        let worker = LayoutWorker::spawn().unwrap();
        worker.send(initialize(&[-1, 0, 1], 8)).unwrap();
        let Ok(LayoutResponse::InitialLayout(initial)) = worker.responses.recv_timeout(TIMEOUT)
        else {
            panic!("expected an initial layout");
        };

        worker
            .send(LayoutCommand::Optimize {
                positions: initial.positions.clone(),
            })
            .unwrap();
        let Ok(LayoutResponse::UpdatedLayout(updated)) = worker.responses.recv_timeout(TIMEOUT)
        else {
            panic!("expected an updated layout");
        };
        assert_eq!(updated.positions, initial.positions);
        assert_eq!(updated.edges, initial.edges);
    }

    #[test]
    fn optimize_without_a_session_is_ignored() {
        let mut session = None;
        let response = handle_command(
            &mut session,
            LayoutCommand::Optimize {
                positions: vec![0.0; 4],
            },
        );
        assert!(response.is_none());
        assert!(session.is_none());
    }

    #[test]
    fn failed_initialize_reports_and_drops_the_session() {
        let mut forest = ShaderForest::from_parents(&[-1, 0]);
        forest.links[1].child_indices.push(0);
        let mut session = None;

        let response = handle_command(
            &mut session,
            LayoutCommand::Initialize {
                forest: Arc::new(forest),
                params: LayoutParams::default(),
            },
        );
        assert!(matches!(response, Some(LayoutResponse::Failed(_))));
        assert!(session.is_none());
    }

    #[test]
    fn reinitialize_replaces_the_session() {
        let mut session = None;
        handle_command(&mut session, initialize(&[-1, 0], 1));
        handle_command(&mut session, initialize(&[-1, 0, 1, 1, -1], 2));

        let Some(LayoutResponse::UpdatedLayout(updated)) = handle_command(
            &mut session,
            LayoutCommand::Optimize {
                positions: vec![0.0; 10],
            },
        ) else {
            panic!("expected an updated layout");
        };
        assert_eq!(updated.edges.len(), 3 * 4);
    }

    #[test]
    fn mismatched_optimize_is_reported() {
        let mut session = None;
        handle_command(&mut session, initialize(&[-1, 0], 1));
        let response = handle_command(
            &mut session,
            LayoutCommand::Optimize {
                positions: vec![0.0; 2],
            },
        );
        assert!(matches!(response, Some(LayoutResponse::Failed(_))));
    }

    #[test]
    fn dropping_the_handle_stops_the_thread() {
        let worker = LayoutWorker::spawn().unwrap();
        worker.send(initialize(&[-1], 1)).unwrap();
        drop(worker);
    }
}
