use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::mpsc;

use anyhow::{Context, Result};
use engine_logging::{engine_debug, engine_info};
use enricher_core::{update, Effect, FormState, FormViewModel, Msg};
use enricher_engine::ReqwestAgentClient;

use super::effects::EffectRunner;
use super::ui::render::{render, Terminal, TerminalCommand};
use crate::cli::Cli;

pub fn run_app(cli: Cli) -> Result<ExitCode> {
    let settings = cli.agent_settings()?;
    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let effects = EffectRunner::for_client(ReqwestAgentClient::new(settings), msg_tx)
        .context("failed to start the enrichment engine")?;
    let mut app = App::new(effects, msg_rx, Terminal::stdio());

    match cli.query {
        Some(query) => app.run_once(query),
        None => {
            let stdin = io::stdin();
            app.run_interactive(stdin.lock())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

struct App<W: Write, E: Write> {
    state: FormState,
    last_view: FormViewModel,
    effects: EffectRunner,
    msg_rx: mpsc::Receiver<Msg>,
    terminal: Terminal<W, E>,
}

impl<W: Write, E: Write> App<W, E> {
    fn new(effects: EffectRunner, msg_rx: mpsc::Receiver<Msg>, terminal: Terminal<W, E>) -> Self {
        let state = FormState::new();
        let last_view = state.view();
        Self {
            state,
            last_view,
            effects,
            msg_rx,
            terminal,
        }
    }

    /// Submits one query and waits for it to settle. Fails the exit code on any error.
    fn run_once(&mut self, query: String) -> Result<ExitCode> {
        self.submit(query)?;
        if self.state.error().is_some() {
            Ok(ExitCode::FAILURE)
        } else {
            Ok(ExitCode::SUCCESS)
        }
    }

    /// One lead per line until EOF. Input is not read while a run is outstanding.
    fn run_interactive(&mut self, input: impl BufRead) -> Result<()> {
        self.terminal.write_header()?;
        self.terminal.prompt()?;
        for line in input.lines() {
            let line = line.context("failed to read from stdin")?;
            self.submit(line)?;
            self.terminal.prompt()?;
        }
        engine_info!("Input closed, exiting");
        Ok(())
    }

    fn submit(&mut self, query: String) -> Result<()> {
        self.dispatch(Msg::QueryChanged(query))?;
        self.dispatch(Msg::SubmitClicked)?;
        self.settle()
    }

    /// Blocks on engine messages until no run is in flight.
    fn settle(&mut self) -> Result<()> {
        while self.state.is_loading() {
            let msg = self
                .msg_rx
                .recv()
                .context("engine stopped before the run settled")?;
            self.dispatch(msg)?;
        }
        Ok(())
    }

    fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        engine_debug!("dispatch {:?}", msg);
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);

        if state.consume_dirty() {
            let view = state.view();
            self.terminal.execute(render(&self.last_view, &view))?;
            self.last_view = view;
        }
        self.state = state;

        for effect in effects {
            match effect {
                Effect::RunAgent { run_id, query } => self.effects.run_agent(run_id, query),
                Effect::Notify(notification) => self
                    .terminal
                    .execute(vec![TerminalCommand::Notify(notification)])?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use enricher_engine::{AgentOutput, AgentRunner, RunError};
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Default)]
    struct ScriptedRunner {
        queries: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl AgentRunner for ScriptedRunner {
        async fn run(&self, query: &str) -> Result<AgentOutput, RunError> {
            self.queries.lock().unwrap().push(query.to_string());
            match query {
                "limited.com" => Err(RunError::RunFailed {
                    status: 500,
                    message: "rate limited".to_string(),
                }),
                "odd.com" => Err(RunError::InvalidOutputFormat),
                _ => Ok(AgentOutput {
                    result: "Acme Corp, 500 employees".to_string(),
                }),
            }
        }
    }

    fn app_with(runner: Arc<ScriptedRunner>) -> App<Vec<u8>, Vec<u8>> {
        let (msg_tx, msg_rx) = mpsc::channel();
        let effects = EffectRunner::new(runner, msg_tx).unwrap();
        App::new(effects, msg_rx, Terminal::new(Vec::new(), Vec::new()))
    }

    fn output(app: App<Vec<u8>, Vec<u8>>) -> (String, String) {
        let (out, notify) = app.terminal.into_parts();
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(notify).unwrap(),
        )
    }

    #[test]
    fn one_shot_success_prints_result() {
        let runner = Arc::new(ScriptedRunner::default());
        let mut app = app_with(runner.clone());

        let code = app.run_once("acme.com".to_string()).unwrap();

        assert_eq!(code, ExitCode::SUCCESS);
        assert!(!app.state.is_loading());
        let (out, notify) = output(app);
        assert_eq!(
            out,
            "Enriching...\n\nEnrichment Result:\nAcme Corp, 500 employees\n\n"
        );
        assert_eq!(notify, "[ok] Lead enrichment successful!\n");
        assert_eq!(*runner.queries.lock().unwrap(), vec!["acme.com".to_string()]);
    }

    #[test]
    fn one_shot_failure_sets_exit_code() {
        let mut app = app_with(Arc::new(ScriptedRunner::default()));

        let code = app.run_once("limited.com".to_string()).unwrap();

        assert_eq!(code, ExitCode::FAILURE);
        let (out, notify) = output(app);
        assert_eq!(out, "Enriching...\n  ! Agent run failed: rate limited\n");
        assert_eq!(
            notify,
            "[error] Lead enrichment failed: Agent run failed: rate limited\n"
        );
    }

    #[test]
    fn blank_query_never_reaches_the_agent() {
        let runner = Arc::new(ScriptedRunner::default());
        let mut app = app_with(runner.clone());

        let code = app.run_once("   ".to_string()).unwrap();

        assert_eq!(code, ExitCode::FAILURE);
        assert!(runner.queries.lock().unwrap().is_empty());
        let (out, notify) = output(app);
        assert_eq!(out, "  ! Please enter a query.\n");
        assert_eq!(notify, "[warn] Please enter a query.: Input cannot be empty.\n");
    }

    #[test]
    fn interactive_mode_runs_each_line() {
        let runner = Arc::new(ScriptedRunner::default());
        let mut app = app_with(runner.clone());

        app.run_interactive("acme.com\nodd.com\n".as_bytes()).unwrap();

        assert_eq!(
            *runner.queries.lock().unwrap(),
            vec!["acme.com".to_string(), "odd.com".to_string()]
        );
        assert!(app.state.result().is_none());
        let (out, notify) = output(app);
        assert!(out.starts_with("HubSpot Lead Enricher\n"));
        assert!(out.contains("Enrichment Result:\nAcme Corp, 500 employees"));
        assert!(out.contains("  ! Invalid agent output format.\n"));
        assert_eq!(
            notify,
            "[ok] Lead enrichment successful!\n\
             [error] Lead enrichment failed: Invalid agent output format.\n"
        );
    }
}
