use std::sync::{mpsc, Arc};

use engine_logging::{engine_info, engine_warn};
use workbench_core::{ActionError, Effect, Msg};
use workbench_engine::{EngineEvent, EngineHandle, EngineSettings, EventSink, RequestError};

use super::app::Input;

/// Runs effects on the engine and counts the ones still awaiting their event.
pub struct EffectRunner {
    engine: EngineHandle,
    in_flight: usize,
}

impl EffectRunner {
    pub fn new(settings: EngineSettings, input_tx: mpsc::Sender<Input>) -> anyhow::Result<Self> {
        let sink = Arc::new(MsgSink { input_tx });
        let engine = EngineHandle::new(settings, sink)?;
        Ok(Self {
            engine,
            in_flight: 0,
        })
    }

    /// Every effect ends in exactly one engine event.
    pub fn settle(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight == 0
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        self.in_flight += effects.len();
        for effect in effects {
            match effect {
                Effect::Upload { path } => {
                    engine_info!("Upload path={:?}", path);
                    self.engine.upload(path);
                }
                Effect::ListFields { file_id } => {
                    engine_info!("ListFields file_id={}", file_id);
                    self.engine.list_fields(file_id);
                }
                Effect::Search { file_id, query } => {
                    engine_info!("Search file_id={} query_len={}", file_id, query.len());
                    self.engine.search(file_id, query);
                }
                Effect::FetchTemplate {
                    file_id,
                    section,
                    purpose,
                } => {
                    engine_info!(
                        "FetchTemplate file_id={} section={:?} purpose={:?}",
                        file_id,
                        section,
                        purpose
                    );
                    self.engine.template(file_id, section, purpose);
                }
                Effect::ReadImport { path } => {
                    engine_info!("ReadImport path={:?}", path);
                    self.engine.read_import(path);
                }
                Effect::WriteExport { filename, contents } => {
                    engine_info!("WriteExport filename={} bytes={}", filename, contents.len());
                    self.engine.write_export(filename, contents);
                }
                Effect::Mutate { file_id, request } => {
                    engine_info!("Mutate kind={} file_id={}", request.kind(), file_id);
                    self.engine.mutate(file_id, request);
                }
                Effect::Download {
                    handle,
                    destination,
                } => {
                    engine_info!("Download output_id={}", handle.output_id);
                    self.engine.download(handle.output_id, destination);
                }
            }
        }
    }
}

struct MsgSink {
    input_tx: mpsc::Sender<Input>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.input_tx.send(Input::Engine(map_event(event)));
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Uploaded(result) => Msg::UploadDone(action_result(result)),
        EngineEvent::FieldsListed { file_id, result } => Msg::FieldsLoaded {
            file_id,
            result: action_result(result),
        },
        EngineEvent::SearchFinished {
            file_id,
            query,
            result,
        } => Msg::SearchDone {
            file_id,
            query,
            result: action_result(result),
        },
        EngineEvent::TemplateFetched {
            file_id,
            purpose,
            result,
        } => Msg::TemplateLoaded {
            file_id,
            purpose,
            result: action_result(result),
        },
        EngineEvent::MutationFinished {
            file_id,
            kind,
            result,
        } => Msg::MutationDone {
            file_id,
            kind,
            result: action_result(result),
        },
        EngineEvent::ImportRead(result) => Msg::ImportLoaded(action_result(result)),
        EngineEvent::ExportWritten(result) => Msg::ExportWritten(action_result(result)),
        EngineEvent::DownloadSaved(result) => Msg::DownloadSaved(action_result(result)),
    }
}

fn action_result<T>(result: Result<T, RequestError>) -> Result<T, ActionError> {
    result.map_err(|err| {
        engine_warn!("engine request failed: {}", err);
        ActionError::from(err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use workbench_core::{ErrorClass, MutationKind, MutationOutcome};
    use workbench_engine::FailureKind;

    #[test]
    fn runner_stays_busy_until_each_effect_reports_back() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, rx) = mpsc::channel();
        let mut runner = EffectRunner::new(EngineSettings::default(), tx).unwrap();
        assert!(runner.is_idle());

        runner.enqueue(vec![Effect::ReadImport {
            path: dir.path().join("missing.json"),
        }]);
        assert!(!runner.is_idle());

        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            Input::Engine(Msg::ImportLoaded(Err(_))) => {}
            Input::Engine(other) => panic!("unexpected msg {other:?}"),
            _ => panic!("expected an engine message"),
        }
        runner.settle();
        assert!(runner.is_idle());
    }

    #[test]
    fn backend_message_reaches_the_session_unchanged() {
        let msg = map_event(EngineEvent::FieldsListed {
            file_id: "abc".to_string(),
            result: Err(RequestError {
                kind: FailureKind::Application,
                message: "File not found".to_string(),
            }),
        });
        let (file_id, err) = match msg {
            Msg::FieldsLoaded { file_id, result } => (file_id, result.unwrap_err()),
            other => panic!("unexpected msg {other:?}"),
        };
        assert_eq!(file_id, "abc");
        assert_eq!(err.class, ErrorClass::Application);
        assert_eq!(err.message, "File not found");
    }

    #[test]
    fn network_failure_is_a_transport_error() {
        let msg = map_event(EngineEvent::Uploaded(Err(RequestError {
            kind: FailureKind::Network,
            message: "connection refused".to_string(),
        })));
        let err = match msg {
            Msg::UploadDone(Err(err)) => err,
            other => panic!("unexpected msg {other:?}"),
        };
        assert_eq!(err.class, ErrorClass::Transport);
        assert!(err.message.contains("connection refused"));
    }

    #[test]
    fn mutation_outcome_passes_through() {
        let outcome = MutationOutcome {
            message: "Filled 2 fields".to_string(),
            output_id: "out-1".to_string(),
        };
        let msg = map_event(EngineEvent::MutationFinished {
            file_id: "abc".to_string(),
            kind: MutationKind::Fill,
            result: Ok(outcome.clone()),
        });
        assert_eq!(
            msg,
            Msg::MutationDone {
                file_id: "abc".to_string(),
                kind: MutationKind::Fill,
                result: Ok(outcome),
            }
        );
    }
}
