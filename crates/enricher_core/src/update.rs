use engine_logging::{engine_debug, engine_info, engine_warn};

use crate::{Effect, ErrorKind, FormState, Msg, Notification, Severity};

pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a query.";
pub const EMPTY_QUERY_DESCRIPTION: &str = "Input cannot be empty.";
pub const SUCCESS_TITLE: &str = "Lead enrichment successful!";
pub const FAILURE_TITLE: &str = "Lead enrichment failed";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: FormState, msg: Msg) -> (FormState, Vec<Effect>) {
    let effects = match msg {
        Msg::QueryChanged(text) => {
            state.set_query(text);
            Vec::new()
        }
        Msg::SubmitClicked => {
            if state.query().trim().is_empty() {
                engine_debug!("Submit rejected: empty query");
                state.set_error(ErrorKind::EmptyInput, EMPTY_QUERY_MESSAGE);
                return (
                    state,
                    vec![Effect::Notify(
                        Notification::new(Severity::Warning, EMPTY_QUERY_MESSAGE)
                            .with_description(EMPTY_QUERY_DESCRIPTION),
                    )],
                );
            }
            if state.is_loading() {
                // Overlap is only prevented by the front end disabling submit.
                engine_warn!("Submit while a run is already in flight");
            }
            let run_id = state.begin_run();
            engine_info!(
                "Run {} started query_len={}",
                run_id,
                state.query().len()
            );
            vec![Effect::RunAgent {
                run_id,
                query: state.query().to_string(),
            }]
        }
        Msg::RunFinished { run_id, outcome } => {
            let notification = match outcome {
                Ok(result) => {
                    engine_info!("Run {} succeeded result_len={}", run_id, result.result.len());
                    state.set_result(result);
                    Notification::new(Severity::Success, SUCCESS_TITLE)
                }
                Err(failure) => {
                    engine_debug!("Run {} settled as {}", run_id, failure.kind);
                    let notification = Notification::new(Severity::Error, FAILURE_TITLE)
                        .with_description(failure.message.clone());
                    state.set_error(failure.kind, failure.message);
                    notification
                }
            };
            state.finish_run();
            vec![Effect::Notify(notification)]
        }
    };

    (state, effects)
}
