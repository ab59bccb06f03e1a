use std::io;
use std::sync::{mpsc, Arc};
use std::thread;

use engine_logging::{engine_debug, engine_error, engine_info};

use crate::client::{AgentRunner, ReqwestAgentClient};
use crate::{AgentSettings, EngineEvent, RunError, RunId};

/// Receives engine events on whichever thread completed the run.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

enum EngineCommand {
    Run { run_id: RunId, query: String },
}

/// Handle to the background thread that executes agent runs.
///
/// Dropping the handle stops the thread after outstanding runs have reported.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(settings: AgentSettings, sink: Arc<dyn EventSink>) -> io::Result<Self> {
        Self::with_runner(Arc::new(ReqwestAgentClient::new(settings)), sink)
    }

    pub fn with_runner(runner: Arc<dyn AgentRunner>, sink: Arc<dyn EventSink>) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::Builder::new()
            .name("enricher-engine".to_string())
            .spawn(move || {
                let mut pending = Vec::new();
                while let Ok(command) = cmd_rx.recv() {
                    let runner = runner.clone();
                    let sink = sink.clone();
                    pending.retain(|task: &tokio::task::JoinHandle<()>| !task.is_finished());
                    pending.push(runtime.spawn(async move {
                        handle_command(runner, command, sink.as_ref()).await;
                    }));
                }
                engine_debug!("Engine command channel closed, {} run(s) pending", pending.len());
                // Outstanding runs still report before the runtime drops.
                runtime.block_on(async {
                    for task in pending {
                        let _ = task.await;
                    }
                });
            })?;

        Ok(Self { cmd_tx })
    }

    pub fn run(&self, run_id: RunId, query: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Run {
            run_id,
            query: query.into(),
        });
    }
}

async fn handle_command(
    runner: Arc<dyn AgentRunner>,
    command: EngineCommand,
    sink: &dyn EventSink,
) {
    match command {
        EngineCommand::Run { run_id, query } => {
            engine_info!("Run {} dispatched query_len={}", run_id, query.len());
            // A panicking runner must still settle the run.
            let task = tokio::spawn(async move { runner.run(&query).await });
            let result = match task.await {
                Ok(result) => result,
                Err(err) => {
                    engine_error!("Run {} aborted: {}", run_id, err);
                    Err(RunError::Transport(format!("agent run aborted: {err}")))
                }
            };
            sink.emit(EngineEvent::RunCompleted { run_id, result });
        }
    }
}
