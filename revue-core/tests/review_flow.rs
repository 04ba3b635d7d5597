//! Integration tests for the intake → session → presenter flow.
//!
//! Exercises: FileIntake::submit against real files, ReviewSession tickets,
//! Analyzer implementations (mock and a failing double), presenter::render.

use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use revue_core::presenter::{self, CallToAction, ResultsView, ScoreBand};
use revue_core::{
    AnalysisError, AnalysisRequest, Analyzer, Applied, FileIntake, IntakeError, IntakePolicy,
    MockAnalyzer, ReviewOutcome, ReviewSession, SessionState,
};

fn write_temp(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(bytes).unwrap();
    path
}

fn utils_py() -> String {
    (1..=120).map(|i| format!("value_{i} = {i}\n")).collect()
}

/// Counts calls and fails every one of them.
struct FlakyAnalyzer {
    calls: AtomicUsize,
}

#[async_trait]
impl Analyzer for FlakyAnalyzer {
    async fn analyze(&self, _request: &AnalysisRequest) -> Result<ReviewOutcome, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(AnalysisError::Unavailable("connection refused".into()))
    }

    fn name(&self) -> &str {
        "flaky"
    }
}

#[tokio::test(start_paused = true)]
async fn utils_py_scenario() {
    let dir = tempfile::TempDir::new().unwrap();
    let source = utils_py();
    let path = write_temp(&dir, "utils.py", source.as_bytes());

    let intake = FileIntake::default();
    let mut session = ReviewSession::new();

    let ticket = session.begin_intake();
    let file = intake.submit(&path).await.unwrap();
    assert_eq!(file.name, "utils.py");
    assert_eq!(file.size_bytes, source.len() as u64);
    assert_eq!(file.content, source);
    assert_eq!(session.accept_file(ticket, file), Applied::Accepted);
    assert_eq!(session.state(), SessionState::FileLoaded);

    let analysis = session.request_analysis().unwrap();
    assert_eq!(session.state(), SessionState::Analyzing);
    assert!(matches!(presenter::render(&session), ResultsView::Loading { .. }));

    let analyzer = MockAnalyzer::new(Duration::from_secs(3));
    let request = AnalysisRequest::from(session.file().unwrap());
    let result = analyzer.analyze(&request).await;
    assert_eq!(session.complete_analysis(analysis, result), Applied::Accepted);
    assert_eq!(session.state(), SessionState::Completed);

    let ResultsView::Report(report) = presenter::render(&session) else {
        panic!("expected a report");
    };
    assert_eq!(report.score_label, "7.5/10");
    assert_eq!(report.score_band, ScoreBand::Warning);
    let titles: Vec<_> = report.issues.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(
        titles,
        [
            "Consider using const instead of let",
            "Inconsistent indentation",
            "Potential null reference error",
        ]
    );

    session.remove_file().unwrap();
    assert_eq!(session.state(), SessionState::Empty);
    assert_eq!(
        presenter::render(&session),
        ResultsView::CallToAction(CallToAction::UploadPrompt)
    );
}

#[tokio::test]
async fn new_file_after_completion_drops_outcome() {
    let dir = tempfile::TempDir::new().unwrap();
    let first = write_temp(&dir, "first.rs", b"fn main() {}\n");
    let second = write_temp(&dir, "second.go", b"package main\n");
    let intake = FileIntake::default();
    let mut session = ReviewSession::new();

    let t = session.begin_intake();
    let _ = session.accept_file(t, intake.submit(&first).await.unwrap());
    let a = session.request_analysis().unwrap();
    let outcome = MockAnalyzer::new(Duration::ZERO)
        .analyze(&AnalysisRequest::from(session.file().unwrap()))
        .await;
    let _ = session.complete_analysis(a, outcome);
    assert!(session.outcome().is_some());

    let t = session.begin_intake();
    let _ = session.accept_file(t, intake.submit(&second).await.unwrap());
    assert_eq!(session.state(), SessionState::FileLoaded);
    assert!(session.outcome().is_none());
    assert_eq!(
        presenter::render(&session),
        ResultsView::CallToAction(CallToAction::ReadyToAnalyze { file_name: "second.go".into() })
    );
}

#[tokio::test]
async fn oversized_file_is_reported_not_dropped() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_temp(&dir, "big.js", &vec![b'a'; 2048]);
    let intake = FileIntake::new(IntakePolicy { max_size_bytes: 1024, ..IntakePolicy::default() });
    let mut session = ReviewSession::new();

    let t = session.begin_intake();
    let err = intake.submit(&path).await.unwrap_err();
    assert!(matches!(
        err,
        IntakeError::TooLarge { size_bytes: 2048, max_bytes: 1024, .. }
    ));
    assert_eq!(session.reject_file(t, &err), Applied::Accepted);
    assert_eq!(session.state(), SessionState::Empty);
    assert!(session.intake_error().unwrap().contains("big.js"));
}

#[tokio::test]
async fn binary_missing_and_directory_inputs() {
    let dir = tempfile::TempDir::new().unwrap();
    let intake = FileIntake::default();

    let binary = write_temp(&dir, "blob.c", &[0xc3, 0x28, 0xa0, 0xa1]);
    assert!(matches!(
        intake.submit(&binary).await,
        Err(IntakeError::ReadFailure { .. })
    ));

    let missing = dir.path().join("nope.rs");
    assert!(matches!(
        intake.submit(&missing).await,
        Err(IntakeError::ReadFailure { .. })
    ));

    assert!(matches!(
        intake.submit(dir.path()).await,
        Err(IntakeError::NotAFile { .. })
    ));
}

#[tokio::test]
async fn unsupported_extension_is_still_accepted() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_temp(&dir, "notes.md", b"# hello\n");
    let file = FileIntake::default().submit(&path).await.unwrap();
    assert_eq!(file.language(), "text");
}

#[tokio::test]
async fn failed_analysis_offers_retry() {
    let analyzer = FlakyAnalyzer { calls: AtomicUsize::new(0) };
    let mut session = ReviewSession::new();
    let t = session.begin_intake();
    let _ = session.accept_file(t, revue_core::UploadedFile::new("a.ts", "let x = 1;\n"));

    let a = session.request_analysis().unwrap();
    let result = analyzer.analyze(&AnalysisRequest::from(session.file().unwrap())).await;
    let _ = session.complete_analysis(a, result);

    assert_eq!(analyzer.calls.load(Ordering::SeqCst), 1);
    assert_eq!(session.state(), SessionState::FileLoaded);
    match presenter::render(&session) {
        ResultsView::CallToAction(CallToAction::Retry { file_name, reason }) => {
            assert_eq!(file_name, "a.ts");
            assert!(reason.contains("connection refused"));
        }
        other => panic!("unexpected view {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn stale_analysis_from_spawned_task_loses_to_newer_file() {
    let analyzer: Arc<dyn Analyzer> = Arc::new(MockAnalyzer::new(Duration::from_secs(3)));
    let mut session = ReviewSession::new();

    let t = session.begin_intake();
    let _ = session.accept_file(t, revue_core::UploadedFile::new("old.py", "a = 1\n"));
    let stale_ticket = session.request_analysis().unwrap();
    let request = AnalysisRequest::from(session.file().unwrap());
    let slow = {
        let analyzer = Arc::clone(&analyzer);
        tokio::spawn(async move { analyzer.analyze(&request).await })
    };

    let t = session.begin_intake();
    let _ = session.accept_file(t, revue_core::UploadedFile::new("new.py", "b = 2\n"));
    let fresh_ticket = session.request_analysis().unwrap();
    let fresh = ReviewOutcome::new(9.0, vec![], vec!["tidy".into()]);
    assert_eq!(session.complete_analysis(fresh_ticket, Ok(fresh)), Applied::Accepted);

    let stale = slow.await.unwrap();
    assert_eq!(session.complete_analysis(stale_ticket, stale), Applied::Discarded);

    assert_eq!(session.file().unwrap().name, "new.py");
    assert_eq!(session.outcome().unwrap().overall_score, 9.0);
}
