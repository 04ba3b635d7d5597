//! Bridges the event loop and the asynchronous parts of a review.
//!
//! File reads and analyzer calls run as spawned tokio tasks. Each one carries
//! the ticket the session handed out when it started, and posts its result
//! back over the event channel. Syntax highlighting of a newly loaded file
//! runs on the blocking pool and comes back as [`AppEvent::PreviewReady`].
//! [`Dispatcher::apply_intake`] and [`Dispatcher::apply_analysis`] feed those
//! results to the session, which discards any that belong to a file the user
//! has since replaced or removed.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use ratatui::text::Line;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use revue_core::samples::SampleFile;
use revue_core::session::{AnalysisTicket, Generation, IntakeTicket};
use revue_core::{
    AnalysisError, AnalysisRequest, Analyzer, Applied, FileIntake, IntakeError, ReviewOutcome,
    SessionState, UploadedFile,
};

use crate::app::{AppState, Tab};
use crate::event::AppEvent;
use crate::highlight;

pub struct Dispatcher {
    tx: UnboundedSender<AppEvent>,
    intake: Arc<FileIntake>,
    analyzer: Arc<dyn Analyzer>,
    /// The file read in flight, aborted once a newer submission or a removal
    /// makes its ticket stale.
    intake_task: Option<JoinHandle<()>>,
    /// Raised to stop the highlighter of a file that is no longer loaded.
    highlight_cancel: Arc<AtomicBool>,
}

impl Dispatcher {
    pub fn new(
        tx: UnboundedSender<AppEvent>,
        intake: FileIntake,
        analyzer: Arc<dyn Analyzer>,
    ) -> Self {
        Self {
            tx,
            intake: Arc::new(intake),
            analyzer,
            intake_task: None,
            highlight_cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Starts reading `path`. The result arrives as [`AppEvent::IntakeFinished`].
    pub fn submit_path(&mut self, state: &mut AppState, path: PathBuf) {
        self.abort_intake();
        let ticket = state.session.begin_intake();
        tracing::info!(path = %path.display(), "file submitted");
        state.set_status(format!("Processing {}…", path.display()));
        let intake = Arc::clone(&self.intake);
        let tx = self.tx.clone();
        self.intake_task = Some(tokio::spawn(async move {
            let result = intake.submit(&path).await;
            let _ = tx.send(AppEvent::IntakeFinished { ticket, result: Box::new(result) });
        }));
    }

    /// Loads a bundled sample. No I/O, so the result is applied immediately.
    pub fn submit_sample(&mut self, state: &mut AppState, sample: &SampleFile) {
        self.abort_intake();
        let ticket = state.session.begin_intake();
        tracing::info!(sample = sample.name, "sample submitted");
        let result = self.intake.from_bytes(sample.name, sample.content.as_bytes().to_vec());
        self.apply_intake(state, ticket, result);
    }

    pub fn request_analysis(&self, state: &mut AppState) {
        let ticket = match state.session.request_analysis() {
            Ok(ticket) => ticket,
            Err(e) => {
                state.set_error(e.to_string());
                return;
            }
        };
        let Some(file) = state.session.file() else {
            return;
        };
        let request = AnalysisRequest::from(file);
        tracing::info!(
            file = %request.file_name,
            analyzer = self.analyzer.name(),
            "analysis started"
        );
        state.results_scroll = 0;
        let analyzer = Arc::clone(&self.analyzer);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = analyzer.analyze(&request).await;
            let _ = tx.send(AppEvent::AnalysisFinished { ticket, result });
        });
    }

    pub fn remove(&mut self, state: &mut AppState) {
        match state.session.remove_file() {
            Ok(()) => {
                self.abort_intake();
                self.highlight_cancel.store(true, Ordering::Relaxed);
                state.on_file_changed();
                state.set_status("File removed");
            }
            Err(e) => state.set_error(e.to_string()),
        }
    }

    pub fn apply_intake(
        &mut self,
        state: &mut AppState,
        ticket: IntakeTicket,
        result: Result<UploadedFile, IntakeError>,
    ) {
        match result {
            Ok(file) => {
                let name = file.name.clone();
                let supported = state.policy.is_accepted(&name);
                if state.session.accept_file(ticket, file) == Applied::Discarded {
                    tracing::debug!(file = %name, "stale intake result discarded");
                    return;
                }
                self.intake_task = None;
                state.on_file_changed();
                self.spawn_highlight(state);
                state.tab = Tab::Review;
                if supported {
                    state.set_status(format!("Loaded {name}"));
                } else {
                    state.set_status(format!("Loaded {name} (not in the supported list)"));
                }
            }
            Err(e) => {
                if state.session.reject_file(ticket, &e) == Applied::Discarded {
                    tracing::debug!(error = %e, "stale intake error discarded");
                    return;
                }
                self.intake_task = None;
                tracing::warn!(error = %e, "file rejected");
                state.set_error(e.to_string());
            }
        }
    }

    /// Applies an analyzer result and records completed reviews in history.
    pub fn apply_analysis(
        &self,
        state: &mut AppState,
        ticket: AnalysisTicket,
        result: Result<ReviewOutcome, AnalysisError>,
    ) {
        if let Err(e) = &result {
            tracing::warn!(error = %e, "analysis failed");
        }
        if state.session.complete_analysis(ticket, result) == Applied::Discarded {
            tracing::debug!("stale analysis result discarded");
            return;
        }
        match (state.session.state(), state.session.file(), state.session.outcome()) {
            (SessionState::Completed, Some(file), Some(outcome)) => {
                state.history.record(&file.name, outcome, SystemTime::now());
                tracing::info!(
                    file = %file.name,
                    score = outcome.overall_score,
                    issues = outcome.issues.len(),
                    "analysis completed"
                );
                state.set_status("Analysis complete");
            }
            _ => state.set_error("Analysis failed, press a to retry"),
        }
    }

    /// Installs highlighted preview lines unless the file changed meanwhile.
    pub fn apply_preview(
        &self,
        state: &mut AppState,
        generation: Generation,
        lines: Vec<Line<'static>>,
    ) {
        if !state.install_highlighted(generation, lines) {
            tracing::debug!("stale preview discarded");
        }
    }

    fn abort_intake(&mut self) {
        if let Some(task) = self.intake_task.take() {
            task.abort();
        }
    }

    /// Highlights the current file on the blocking pool. Any highlighter
    /// still working on a previous file is told to stop.
    fn spawn_highlight(&mut self, state: &AppState) {
        let Some(file) = state.session.file() else {
            return;
        };
        self.highlight_cancel.store(true, Ordering::Relaxed);
        let cancel = Arc::new(AtomicBool::new(false));
        self.highlight_cancel = Arc::clone(&cancel);

        let generation = state.session.generation();
        let content = file.content.clone();
        let ext = file.extension();
        let tx = self.tx.clone();
        tokio::task::spawn_blocking(move || {
            if let Some(lines) = highlight::highlight_source(&content, ext.as_deref(), &cancel) {
                let _ = tx.send(AppEvent::PreviewReady { generation, lines });
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use revue_core::samples::SAMPLES;
    use revue_core::{IntakePolicy, MockAnalyzer};
    use tokio::sync::mpsc;

    fn setup(delay: Duration) -> (Dispatcher, mpsc::UnboundedReceiver<AppEvent>, AppState) {
        let (tx, rx) = mpsc::unbounded_channel();
        let dispatcher =
            Dispatcher::new(tx, FileIntake::default(), Arc::new(MockAnalyzer::new(delay)));
        (dispatcher, rx, AppState::new(IntakePolicy::default(), "mock"))
    }

    /// Pumps events into the state until one intake or analysis result has
    /// been applied. Preview results met on the way are applied too.
    async fn pump(
        d: &mut Dispatcher,
        rx: &mut mpsc::UnboundedReceiver<AppEvent>,
        state: &mut AppState,
    ) {
        loop {
            match rx.recv().await {
                Some(AppEvent::IntakeFinished { ticket, result }) => {
                    return d.apply_intake(state, ticket, *result);
                }
                Some(AppEvent::AnalysisFinished { ticket, result }) => {
                    return d.apply_analysis(state, ticket, result);
                }
                Some(AppEvent::PreviewReady { generation, lines }) => {
                    d.apply_preview(state, generation, lines)
                }
                other => panic!("unexpected event {other:?}"),
            }
        }
    }

    /// Collects everything sent within `window`, then gives up.
    async fn drain(rx: &mut mpsc::UnboundedReceiver<AppEvent>, window: Duration) -> Vec<AppEvent> {
        let mut events = Vec::new();
        while let Ok(Some(event)) = tokio::time::timeout(window, rx.recv()).await {
            events.push(event);
        }
        events
    }

    #[tokio::test(start_paused = true)]
    async fn sample_then_analysis_lands_in_history() {
        let (mut d, mut rx, mut state) = setup(Duration::from_secs(3));
        d.submit_sample(&mut state, &SAMPLES[2]);
        assert_eq!(state.session.state(), SessionState::FileLoaded);

        d.request_analysis(&mut state);
        assert_eq!(state.session.state(), SessionState::Analyzing);
        pump(&mut d, &mut rx, &mut state).await;

        assert_eq!(state.session.state(), SessionState::Completed);
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.history.entries()[0].file_name, "data-processor.py");
        assert_eq!(state.history.entries()[0].issue_count, 3);
    }

    #[tokio::test]
    async fn path_submission_goes_through_the_channel() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("main.go");
        std::fs::write(&path, "package main\n").unwrap();

        let (mut d, mut rx, mut state) = setup(Duration::ZERO);
        state.tab = Tab::Samples;
        d.submit_path(&mut state, path);
        assert!(state.session.intake_pending());
        pump(&mut d, &mut rx, &mut state).await;

        assert_eq!(state.session.file().unwrap().name, "main.go");
        assert_eq!(state.tab, Tab::Review);
    }

    #[tokio::test(start_paused = true)]
    async fn removal_during_analysis_discards_result() {
        let (mut d, mut rx, mut state) = setup(Duration::from_secs(3));
        d.submit_sample(&mut state, &SAMPLES[0]);
        d.request_analysis(&mut state);
        d.remove(&mut state);
        pump(&mut d, &mut rx, &mut state).await;

        assert_eq!(state.session.state(), SessionState::Empty);
        assert!(state.history.is_empty());
    }

    #[tokio::test]
    async fn analyze_without_file_reports_error() {
        let (d, _rx, mut state) = setup(Duration::ZERO);
        d.request_analysis(&mut state);
        let status = state.status.as_ref().unwrap();
        assert!(status.is_error);
        assert_eq!(state.session.state(), SessionState::Empty);
    }

    #[tokio::test]
    async fn missing_file_sets_error_status() {
        let (mut d, mut rx, mut state) = setup(Duration::ZERO);
        d.submit_path(&mut state, PathBuf::from("/definitely/not/here.rs"));
        pump(&mut d, &mut rx, &mut state).await;
        assert!(state.status.as_ref().unwrap().is_error);
        assert!(state.session.intake_error().is_some());
        assert_eq!(state.session.state(), SessionState::Empty);
    }

    #[tokio::test]
    async fn highlighted_preview_arrives_after_load() {
        let (mut d, mut rx, mut state) = setup(Duration::ZERO);
        d.submit_sample(&mut state, &SAMPLES[3]);
        assert!(!state.preview_highlighted());

        match rx.recv().await {
            Some(AppEvent::PreviewReady { generation, lines }) => {
                assert_eq!(lines.len(), state.session.file().unwrap().line_count());
                d.apply_preview(&mut state, generation, lines);
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert!(state.preview_highlighted());
    }

    #[tokio::test]
    async fn preview_for_replaced_sample_is_not_installed() {
        let (mut d, mut rx, mut state) = setup(Duration::ZERO);
        d.submit_sample(&mut state, &SAMPLES[0]);
        let first = state.session.generation();
        d.submit_sample(&mut state, &SAMPLES[1]);
        let second = state.session.generation();

        loop {
            match rx.recv().await {
                Some(AppEvent::PreviewReady { generation, lines }) => {
                    let installed = state.install_highlighted(generation, lines);
                    assert_eq!(installed, generation == second);
                    if generation == second {
                        break;
                    }
                    assert_eq!(generation, first);
                }
                other => panic!("unexpected event {other:?}"),
            }
        }
        assert_eq!(state.session.file().unwrap().name, "api-service.js");
        assert!(state.preview_highlighted());
    }

    #[tokio::test]
    async fn superseded_read_is_aborted() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("slow.rs");
        std::fs::write(&path, "fn main() {}\n").unwrap();

        let (mut d, mut rx, mut state) = setup(Duration::ZERO);
        d.submit_path(&mut state, path);
        d.submit_sample(&mut state, &SAMPLES[0]);

        let events = drain(&mut rx, Duration::from_millis(200)).await;
        assert!(!events.iter().any(|e| matches!(e, AppEvent::IntakeFinished { .. })));
        assert_eq!(state.session.file().unwrap().name, "react-component.jsx");
        assert!(!state.session.intake_pending());
    }

    #[tokio::test]
    async fn removal_aborts_pending_read() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("next.py");
        std::fs::write(&path, "x = 1\n").unwrap();

        let (mut d, mut rx, mut state) = setup(Duration::ZERO);
        d.submit_sample(&mut state, &SAMPLES[2]);
        d.submit_path(&mut state, path);
        d.remove(&mut state);

        let events = drain(&mut rx, Duration::from_millis(200)).await;
        assert!(!events.iter().any(|e| matches!(e, AppEvent::IntakeFinished { .. })));
        assert_eq!(state.session.state(), SessionState::Empty);
    }
}
