use std::io;
use std::sync::{mpsc, Arc};

use engine_logging::engine_info;
use enricher_core::{EnrichmentResult, ErrorKind, Msg, RunFailure, RunId, RunOutcome};
use enricher_engine::{
    AgentOutput, AgentRunner, EngineEvent, EngineHandle, EventSink, ReqwestAgentClient, RunError,
};

/// Executes `RunAgent` effects on the engine and feeds completions back as `Msg`s.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(runner: Arc<dyn AgentRunner>, msg_tx: mpsc::Sender<Msg>) -> io::Result<Self> {
        let engine = EngineHandle::with_runner(runner, Arc::new(MsgSink { tx: msg_tx }))?;
        Ok(Self { engine })
    }

    pub fn for_client(client: ReqwestAgentClient, msg_tx: mpsc::Sender<Msg>) -> io::Result<Self> {
        engine_info!("Agent endpoint {}", client.settings().endpoint());
        Self::new(Arc::new(client), msg_tx)
    }

    pub fn run_agent(&self, run_id: RunId, query: String) {
        engine_info!("RunAgent run_id={} query_len={}", run_id, query.len());
        self.engine.run(run_id, query);
    }
}

struct MsgSink {
    tx: mpsc::Sender<Msg>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        match event {
            EngineEvent::RunCompleted { run_id, result } => {
                let outcome = map_result(result);
                let _ = self.tx.send(Msg::RunFinished { run_id, outcome });
            }
        }
    }
}

fn map_result(result: Result<AgentOutput, RunError>) -> RunOutcome {
    result
        .map(|output| EnrichmentResult::new(output.result))
        .map_err(|err| {
            let kind = match &err {
                RunError::Transport(_) => ErrorKind::Transport,
                RunError::RunFailed { .. } => ErrorKind::RunFailed,
                RunError::InvalidOutputFormat => ErrorKind::InvalidOutputFormat,
            };
            RunFailure::new(kind, err.to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_errors_map_to_failure_kinds_and_messages() {
        assert_eq!(
            map_result(Err(RunError::RunFailed {
                status: 500,
                message: "rate limited".to_string()
            })),
            Err(RunFailure::new(
                ErrorKind::RunFailed,
                "Agent run failed: rate limited"
            ))
        );
        assert_eq!(
            map_result(Err(RunError::InvalidOutputFormat)),
            Err(RunFailure::new(
                ErrorKind::InvalidOutputFormat,
                "Invalid agent output format."
            ))
        );
        assert_eq!(
            map_result(Err(RunError::Transport("connection refused".to_string()))),
            Err(RunFailure::new(ErrorKind::Transport, "connection refused"))
        );
    }

    #[test]
    fn sink_forwards_completion_as_run_finished() {
        let (tx, rx) = mpsc::channel();
        let sink = MsgSink { tx };

        sink.emit(EngineEvent::RunCompleted {
            run_id: 4,
            result: Err(RunError::InvalidOutputFormat),
        });

        assert_eq!(
            rx.try_recv().unwrap(),
            Msg::RunFinished {
                run_id: 4,
                outcome: Err(RunFailure::new(
                    ErrorKind::InvalidOutputFormat,
                    "Invalid agent output format."
                )),
            }
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn output_maps_to_enrichment_result() {
        assert_eq!(
            map_result(Ok(AgentOutput {
                result: "Acme".to_string()
            })),
            Ok(EnrichmentResult::new("Acme"))
        );
    }
}
