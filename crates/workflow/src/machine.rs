//! Evaluation workflow.
//!
//! `Idle → Parsing → Loading → Success | Error`, with `reset` back to `Idle`
//! from anywhere.
//!
//! The state machine does no I/O. Each expensive step is split into a
//! `begin_*` call that hands out a job tagged with a [`Ticket`], and a
//! `finish_*` call that takes the job's outcome back. A ticket is only
//! honored while its attempt is still current; selecting a file, resetting,
//! or starting a new attempt makes every outstanding ticket stale, and stale
//! outcomes are dropped. [`Workflow::run`] is the plain blocking driver.

use dss_evaluator_client::{Evaluator, EvaluatorError};
use dss_io::{is_xlsx_name, IngestError, Variant};
use dss_model::{DecisionDocument, EvaluationResult};
use thiserror::Error;

use crate::file::SelectedFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Parsing,
    Loading,
    Success,
    Error,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Idle => "idle",
            Stage::Parsing => "parsing",
            Stage::Loading => "loading",
            Stage::Success => "success",
            Stage::Error => "error",
        }
    }

    pub fn is_busy(self) -> bool {
        matches!(self, Stage::Parsing | Stage::Loading)
    }
}

/// Failure of one attempt, as shown to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error(transparent)]
    Evaluator(#[from] EvaluatorError),
}

/// Binds an outcome to the attempt that asked for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Decode + assemble work for the current attempt.
#[derive(Debug, Clone)]
pub struct ParseJob {
    pub ticket: Ticket,
    pub file: SelectedFile,
    pub variant: Variant,
}

impl ParseJob {
    pub fn run(&self) -> Result<DecisionDocument, IngestError> {
        self.file.parse(self.variant)
    }
}

/// The single evaluation request of the current attempt.
#[derive(Debug, Clone)]
pub struct RequestJob {
    pub ticket: Ticket,
    pub document: DecisionDocument,
}

impl RequestJob {
    pub fn run<E: Evaluator + ?Sized>(&self, evaluator: &E) -> Result<EvaluationResult, EvaluatorError> {
        evaluator.evaluate(&self.document)
    }
}

#[derive(Debug)]
pub struct Workflow {
    variant: Variant,
    generation: u64,
    stage: Stage,
    file: Option<SelectedFile>,
    document: Option<DecisionDocument>,
    result: Option<EvaluationResult>,
    error: Option<WorkflowError>,
}

impl Workflow {
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            generation: 0,
            stage: Stage::Idle,
            file: None,
            document: None,
            result: None,
            error: None,
        }
    }

    // ── Accessors ───────────────────────────────────────────────────

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    /// Last assembled document (debug preview).
    pub fn document(&self) -> Option<&DecisionDocument> {
        self.document.as_ref()
    }

    pub fn result(&self) -> Option<&EvaluationResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&WorkflowError> {
        self.error.as_ref()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|e| e.to_string())
    }

    pub fn is_busy(&self) -> bool {
        self.stage.is_busy()
    }

    pub fn can_evaluate(&self) -> bool {
        self.file.is_some() && !self.is_busy()
    }

    // ── Transitions ─────────────────────────────────────────────────

    /// Pick the schema for the next attempt. Ignored while busy.
    pub fn set_variant(&mut self, variant: Variant) {
        if self.is_busy() {
            tracing::debug!(stage = self.stage.as_str(), "variant change ignored while busy");
            return;
        }
        self.variant = variant;
    }

    /// Select a file. Only the extension is checked here.
    ///
    /// A non-`.xlsx` name moves to `Error` and keeps the previous file,
    /// document and result. Either way any in-flight attempt is abandoned.
    pub fn select_file(&mut self, file: SelectedFile) {
        self.generation += 1;

        if !is_xlsx_name(file.name()) {
            tracing::info!(file = file.name(), "rejected file type");
            self.error = Some(IngestError::FileType { file_name: file.name().to_string() }.into());
            self.transition(Stage::Error);
            return;
        }

        tracing::debug!(file = file.name(), "file selected");
        self.file = Some(file);
        self.document = None;
        self.result = None;
        self.error = None;
        self.transition(Stage::Idle);
    }

    /// Start an attempt. `None` when there is no file or an attempt is running.
    pub fn begin_evaluation(&mut self) -> Option<ParseJob> {
        if self.is_busy() {
            tracing::debug!(stage = self.stage.as_str(), "evaluate ignored while busy");
            return None;
        }
        let file = self.file.clone()?;

        self.generation += 1;
        self.document = None;
        self.result = None;
        self.error = None;
        self.transition(Stage::Parsing);

        Some(ParseJob {
            ticket: Ticket(self.generation),
            file,
            variant: self.variant,
        })
    }

    /// Hand back the parse outcome. Returns the request to send, if any.
    pub fn finish_parsing(
        &mut self,
        ticket: Ticket,
        outcome: Result<DecisionDocument, IngestError>,
    ) -> Option<RequestJob> {
        if !self.accepts(ticket, Stage::Parsing) {
            return None;
        }
        match outcome {
            Ok(document) => {
                self.document = Some(document.clone());
                self.transition(Stage::Loading);
                Some(RequestJob { ticket, document })
            }
            Err(e) => {
                self.fail(e.into());
                None
            }
        }
    }

    /// Hand back the evaluator's answer. `false` when it was stale.
    pub fn finish_request(
        &mut self,
        ticket: Ticket,
        outcome: Result<EvaluationResult, EvaluatorError>,
    ) -> bool {
        if !self.accepts(ticket, Stage::Loading) {
            return false;
        }
        match outcome {
            Ok(result) => {
                self.result = Some(result);
                self.transition(Stage::Success);
            }
            Err(e) => self.fail(e.into()),
        }
        true
    }

    /// Back to `Idle` with nothing selected. Outstanding tickets go stale.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.file = None;
        self.document = None;
        self.result = None;
        self.error = None;
        self.transition(Stage::Idle);
    }

    /// Run one full attempt on the calling thread.
    pub fn run<E: Evaluator + ?Sized>(&mut self, evaluator: &E) -> Stage {
        let Some(parse) = self.begin_evaluation() else {
            return self.stage;
        };
        let parsed = parse.run();
        if let Some(request) = self.finish_parsing(parse.ticket, parsed) {
            let answer = request.run(evaluator);
            self.finish_request(request.ticket, answer);
        }
        self.stage
    }

    // ── Internal helpers ────────────────────────────────────────────

    fn accepts(&self, ticket: Ticket, expected: Stage) -> bool {
        let current = ticket.0 == self.generation && self.stage == expected;
        if !current {
            tracing::debug!(
                ticket = ticket.0,
                generation = self.generation,
                stage = self.stage.as_str(),
                "stale outcome discarded"
            );
        }
        current
    }

    fn fail(&mut self, error: WorkflowError) {
        tracing::info!(error = %error, "attempt failed");
        self.error = Some(error);
        self.transition(Stage::Error);
    }

    fn transition(&mut self, to: Stage) {
        tracing::debug!(from = self.stage.as_str(), to = to.as_str(), generation = self.generation, "stage");
        self.stage = to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dss_evaluator_client::TRANSPORT_MESSAGE;
    use dss_model::RankingEntry;
    use rust_xlsxwriter::Workbook;
    use std::cell::Cell;

    fn weighted_bytes() -> Vec<u8> {
        let mut wb = Workbook::new();

        let config = wb.add_worksheet();
        config.set_name("config").unwrap();
        config.write_string(0, 0, "modo").unwrap();
        config.write_string(0, 1, "alpha").unwrap();
        config.write_string(1, 0, "ranking").unwrap();

        let criterios = wb.add_worksheet();
        criterios.set_name("criterios").unwrap();
        criterios.write_string(0, 0, "criterio").unwrap();
        criterios.write_string(0, 1, "peso").unwrap();
        criterios.write_string(0, 2, "tipo").unwrap();
        criterios.write_string(1, 0, "Costo").unwrap();
        criterios.write_number(1, 1, 1.0).unwrap();
        criterios.write_string(1, 2, "costo").unwrap();

        let alternativas = wb.add_worksheet();
        alternativas.set_name("alternativas").unwrap();
        alternativas.write_string(0, 0, "alternativa").unwrap();
        alternativas.write_string(0, 1, "Costo").unwrap();
        alternativas.write_string(1, 0, "A").unwrap();
        alternativas.write_number(1, 1, 10.0).unwrap();
        alternativas.write_string(2, 0, "B").unwrap();
        alternativas.write_number(2, 1, 5.0).unwrap();

        wb.save_to_buffer().unwrap()
    }

    fn good_file() -> SelectedFile {
        SelectedFile::from_bytes("modelo.xlsx", weighted_bytes())
    }

    fn sample_result() -> EvaluationResult {
        EvaluationResult {
            ranking: vec![RankingEntry { alternative: "B".into(), score: Some(1.0) }],
            best_alternative: Some("B".into()),
            best_score: Some(1.0),
            ..EvaluationResult::default()
        }
    }

    /// Counts requests and answers with a fixed outcome.
    struct FakeEvaluator {
        calls: Cell<usize>,
        outcome: Result<EvaluationResult, EvaluatorError>,
    }

    impl FakeEvaluator {
        fn answering(outcome: Result<EvaluationResult, EvaluatorError>) -> Self {
            Self { calls: Cell::new(0), outcome }
        }
    }

    impl Evaluator for FakeEvaluator {
        fn evaluate(&self, _: &DecisionDocument) -> Result<EvaluationResult, EvaluatorError> {
            self.calls.set(self.calls.get() + 1);
            self.outcome.clone()
        }
    }

    #[test]
    fn test_happy_path() {
        let evaluator = FakeEvaluator::answering(Ok(sample_result()));
        let mut wf = Workflow::new(Variant::Weighted);
        wf.select_file(good_file());
        assert!(wf.can_evaluate());

        assert_eq!(wf.run(&evaluator), Stage::Success);
        assert_eq!(evaluator.calls.get(), 1);
        assert_eq!(wf.result().and_then(|r| r.winner()), Some("B"));
        assert_eq!(wf.document().unwrap().alternative_names(), vec!["A", "B"]);
        assert_eq!(wf.error_message(), None);
    }

    #[test]
    fn test_evaluate_without_file_is_noop() {
        let evaluator = FakeEvaluator::answering(Ok(sample_result()));
        let mut wf = Workflow::new(Variant::Weighted);
        assert!(wf.begin_evaluation().is_none());
        assert_eq!(wf.run(&evaluator), Stage::Idle);
        assert_eq!(evaluator.calls.get(), 0);
    }

    #[test]
    fn test_second_evaluate_while_busy_sends_one_request() {
        let evaluator = FakeEvaluator::answering(Ok(sample_result()));
        let mut wf = Workflow::new(Variant::Weighted);
        wf.select_file(good_file());

        let parse = wf.begin_evaluation().unwrap();
        assert!(wf.begin_evaluation().is_none());
        assert_eq!(wf.stage(), Stage::Parsing);

        let request = wf.finish_parsing(parse.ticket, parse.run()).unwrap();
        assert!(wf.begin_evaluation().is_none());
        assert_eq!(wf.run(&evaluator), Stage::Loading);

        assert!(wf.finish_request(request.ticket, request.run(&evaluator)));
        assert_eq!(evaluator.calls.get(), 1);
        assert_eq!(wf.stage(), Stage::Success);
    }

    #[test]
    fn test_reset_during_loading_drops_late_response() {
        let mut wf = Workflow::new(Variant::Weighted);
        wf.select_file(good_file());
        let parse = wf.begin_evaluation().unwrap();
        let request = wf.finish_parsing(parse.ticket, parse.run()).unwrap();
        assert_eq!(wf.stage(), Stage::Loading);

        wf.reset();
        assert!(!wf.finish_request(request.ticket, Ok(sample_result())));
        assert_eq!(wf.stage(), Stage::Idle);
        assert!(wf.result().is_none());
        assert!(wf.file().is_none());
        assert!(!wf.can_evaluate());
    }

    #[test]
    fn test_reset_during_parsing_drops_late_document() {
        let mut wf = Workflow::new(Variant::Weighted);
        wf.select_file(good_file());
        let parse = wf.begin_evaluation().unwrap();
        wf.reset();
        assert!(wf.finish_parsing(parse.ticket, parse.run()).is_none());
        assert_eq!(wf.stage(), Stage::Idle);
        assert!(wf.document().is_none());
    }

    #[test]
    fn test_old_ticket_cannot_finish_new_attempt() {
        let mut wf = Workflow::new(Variant::Weighted);
        wf.select_file(good_file());
        let first = wf.begin_evaluation().unwrap();
        wf.select_file(good_file());
        let second = wf.begin_evaluation().unwrap();

        assert!(wf.finish_parsing(first.ticket, first.run()).is_none());
        assert_eq!(wf.stage(), Stage::Parsing);
        assert!(wf.finish_parsing(second.ticket, second.run()).is_some());
    }

    #[test]
    fn test_wrong_extension_keeps_previous_state() {
        let evaluator = FakeEvaluator::answering(Ok(sample_result()));
        let mut wf = Workflow::new(Variant::Weighted);
        wf.select_file(good_file());
        wf.run(&evaluator);

        wf.select_file(SelectedFile::from_path("/tmp/datos.csv"));
        assert_eq!(wf.stage(), Stage::Error);
        assert_eq!(
            wf.error_message().as_deref(),
            Some("only .xlsx files are accepted")
        );
        assert_eq!(wf.file().map(|f| f.name()), Some("modelo.xlsx"));
        assert!(wf.result().is_some());
        assert!(wf.document().is_some());

        // The kept file can still be evaluated
        assert_eq!(wf.run(&evaluator), Stage::Success);
    }

    #[test]
    fn test_select_clears_previous_outcome() {
        let evaluator = FakeEvaluator::answering(Ok(sample_result()));
        let mut wf = Workflow::new(Variant::Weighted);
        wf.select_file(good_file());
        wf.run(&evaluator);

        wf.select_file(SelectedFile::from_bytes("otro.XLSX", weighted_bytes()));
        assert_eq!(wf.stage(), Stage::Idle);
        assert!(wf.result().is_none());
        assert!(wf.document().is_none());
        assert!(wf.error().is_none());
    }

    #[test]
    fn test_ingest_failure_never_calls_evaluator() {
        let evaluator = FakeEvaluator::answering(Ok(sample_result()));
        let mut wf = Workflow::new(Variant::Risk);
        wf.select_file(good_file());

        assert_eq!(wf.run(&evaluator), Stage::Error);
        assert_eq!(evaluator.calls.get(), 0);
        assert!(matches!(
            wf.error(),
            Some(WorkflowError::Ingest(IngestError::MissingSheet { sheet: "estados", .. }))
        ));
        assert!(wf.document().is_none());
    }

    #[test]
    fn test_transport_failure_message_verbatim() {
        let evaluator = FakeEvaluator::answering(Err(EvaluatorError::Transport {
            detail: "connection refused".into(),
        }));
        let mut wf = Workflow::new(Variant::Weighted);
        wf.select_file(good_file());

        assert_eq!(wf.run(&evaluator), Stage::Error);
        assert_eq!(wf.error_message().as_deref(), Some(TRANSPORT_MESSAGE));
        // Preview survives a failed request
        assert!(wf.document().is_some());
    }

    #[test]
    fn test_remote_failure_message() {
        let evaluator = FakeEvaluator::answering(Err(EvaluatorError::Remote {
            status: 400,
            message: "Criterio no soportado".into(),
        }));
        let mut wf = Workflow::new(Variant::Weighted);
        wf.select_file(good_file());
        wf.run(&evaluator);
        assert_eq!(wf.error_message().as_deref(), Some("Criterio no soportado"));
    }

    #[test]
    fn test_retry_after_error_clears_it() {
        let failing = FakeEvaluator::answering(Err(EvaluatorError::Transport { detail: String::new() }));
        let working = FakeEvaluator::answering(Ok(sample_result()));
        let mut wf = Workflow::new(Variant::Weighted);
        wf.select_file(good_file());

        wf.run(&failing);
        let parse = wf.begin_evaluation().unwrap();
        assert!(wf.error().is_none());
        let request = wf.finish_parsing(parse.ticket, parse.run()).unwrap();
        wf.finish_request(request.ticket, request.run(&working));
        assert_eq!(wf.stage(), Stage::Success);
    }

    #[test]
    fn test_variant_locked_while_busy() {
        let mut wf = Workflow::new(Variant::Weighted);
        wf.select_file(good_file());
        let _parse = wf.begin_evaluation().unwrap();
        wf.set_variant(Variant::Risk);
        assert_eq!(wf.variant(), Variant::Weighted);
        wf.reset();
        wf.set_variant(Variant::Risk);
        assert_eq!(wf.variant(), Variant::Risk);
    }

    #[test]
    fn test_request_on_worker_thread() {
        let mut wf = Workflow::new(Variant::Weighted);
        wf.select_file(good_file());
        let parse = wf.begin_evaluation().unwrap();
        let request = wf.finish_parsing(parse.ticket, parse.run()).unwrap();

        let handle = std::thread::spawn(move || {
            let evaluator = FakeEvaluator::answering(Ok(sample_result()));
            (request.ticket, request.run(&evaluator))
        });
        let (ticket, answer) = handle.join().unwrap();
        assert!(wf.finish_request(ticket, answer));
        assert_eq!(wf.stage(), Stage::Success);
    }
}
