//! The iteration & aggregation loop.
//!
//! One batch = N sequential query+extraction cycles against the same
//! document and prompt pair. Every cycle appends one row to the session's
//! result table; the last successful raw response is surfaced to the caller.

use crate::cache::ContextCache;
use crate::error::SessionError;
use crate::history::{FailedRow, VerdictRow};
use crate::pacing::PacingPolicy;
use crate::retry::RetryPolicy;
use crate::session::Session;
use extract::{ExtractError, StructuredExtractor, Verdict};
use llm::{ChatModel, CompletionOptions, LlmError, SamplingConfig};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

/// One user submission.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub document_path: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub iterations: usize,
}

/// What to do when a single iteration fails after retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Record a failed row and keep going (default)
    Continue,
    /// Stop the batch and report the failing iteration index
    Abort,
}

#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Upper bound on iterations per submission
    pub max_iterations: usize,
    pub pacing: PacingPolicy,
    pub retry: RetryPolicy,
    pub failure_policy: FailurePolicy,
    pub sampling: SamplingConfig,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            pacing: PacingPolicy::default(),
            retry: RetryPolicy::default(),
            failure_policy: FailurePolicy::Continue,
            sampling: SamplingConfig::default(),
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct BatchOutcome {
    /// Raw text of the last successful iteration
    pub last_response: Option<String>,
    pub completed: usize,
    pub failed: usize,
}

/// Drives the query+extraction pipeline for one juror backend.
pub struct BatchRunner<J: ChatModel, E: ChatModel> {
    juror: J,
    extractor: StructuredExtractor<E>,
    cache: ContextCache,
    config: RunnerConfig,
}

enum IterationFailure {
    /// Bad credential: abort the whole batch without consuming budget
    Credential(String),
    /// Anything else: this iteration produced nothing
    Recoverable(String),
}

impl IterationFailure {
    fn from_llm(e: LlmError) -> Self {
        match e {
            LlmError::Auth(msg) => IterationFailure::Credential(msg),
            other => IterationFailure::Recoverable(other.to_string()),
        }
    }

    fn from_extract(e: ExtractError) -> Self {
        match e {
            ExtractError::Llm(LlmError::Auth(msg)) => IterationFailure::Credential(msg),
            other => IterationFailure::Recoverable(other.to_string()),
        }
    }
}

impl<J: ChatModel, E: ChatModel> BatchRunner<J, E> {
    pub fn new(juror: J, extractor: StructuredExtractor<E>, config: RunnerConfig) -> Self {
        Self {
            juror,
            extractor,
            cache: ContextCache::default(),
            config,
        }
    }

    /// Run one submission to completion. The session's result table grows by
    /// exactly `request.iterations` rows unless a batch-level error aborts
    /// the run.
    pub async fn run(
        &self,
        session: &mut Session,
        request: &BatchRequest,
    ) -> Result<BatchOutcome, SessionError> {
        if request.iterations > self.config.max_iterations {
            return Err(SessionError::TooManyIterations {
                requested: request.iterations,
                max: self.config.max_iterations,
            });
        }

        session.prepare_for(&request.document_path)?;

        // Loader failures abort before any iteration budget is spent
        let context = self.load_context(&request.document_path).await?;

        let mut outcome = BatchOutcome::default();

        for iteration in 1..=request.iterations {
            if iteration > 1 {
                self.config.pacing.pause(iteration).await;
            }

            match self.run_iteration(request, &context).await {
                Ok((verdict, raw)) => {
                    session.history_mut().push_verdict(VerdictRow {
                        file_name: request.document_path.clone(),
                        likelihood: verdict.likelihood,
                        decision: verdict.decision,
                        response: raw.clone(),
                        model: self.juror.model_id(),
                    });
                    outcome.last_response = Some(raw);
                    outcome.completed += 1;
                    info!(
                        iteration,
                        total = request.iterations,
                        document = %request.document_path,
                        "iteration completed"
                    );
                }
                Err(IterationFailure::Credential(msg)) => {
                    return Err(SessionError::Credential(msg));
                }
                Err(IterationFailure::Recoverable(msg)) => {
                    warn!(iteration, error = %msg, "iteration failed");
                    session.history_mut().push_failed(FailedRow {
                        file_name: request.document_path.clone(),
                        iteration,
                        error: msg.clone(),
                        model: self.juror.model_id(),
                    });
                    outcome.failed += 1;

                    if self.config.failure_policy == FailurePolicy::Abort {
                        return Err(SessionError::IterationFailed {
                            iteration,
                            message: msg,
                        });
                    }
                }
            }
        }

        Ok(outcome)
    }

    async fn run_iteration(
        &self,
        request: &BatchRequest,
        context: &str,
    ) -> Result<(Verdict, String), IterationFailure> {
        let system = format!(
            "{}\nAnswer the question of the user on the basis of provided context.",
            request.system_prompt
        );
        let user = format!(
            "{}\nAnswer the question on the basis of following context:\n\n{}",
            request.user_prompt, context
        );
        let options = CompletionOptions {
            json_mode: false,
            sampling: self.config.sampling.clone(),
        };

        let raw = self
            .config
            .retry
            .retry("juror query", LlmError::is_transient, || {
                self.juror.complete(&system, &user, &options)
            })
            .await
            .map_err(IterationFailure::from_llm)?;

        let verdict = self
            .config
            .retry
            .retry(
                "structured extraction",
                |e: &ExtractError| matches!(e, ExtractError::Llm(l) if l.is_transient()),
                || self.extractor.extract(&raw),
            )
            .await
            .map_err(IterationFailure::from_extract)?;

        Ok((verdict, raw))
    }

    async fn load_context(&self, path: &str) -> Result<String, SessionError> {
        if let Some(context) = self.cache.get(path) {
            return Ok(context);
        }

        let chunks = ingest::load_document(Path::new(path)).await?;
        let context = ingest::combine_context(&chunks);
        self.cache.set(path, context.clone());
        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use llm::MockModel;
    use std::path::PathBuf;

    const VERDICT_JSON: &str = r#"{"Likelihood": "70", "Decision": "Guilty"}"#;

    fn test_config() -> RunnerConfig {
        RunnerConfig {
            max_iterations: 500,
            pacing: PacingPolicy::None,
            retry: RetryPolicy::new(0, 1, 1),
            failure_policy: FailurePolicy::Continue,
            sampling: SamplingConfig::default(),
        }
    }

    fn write_case(dir: &tempfile::TempDir, name: &str) -> String {
        let path = dir.path().join(name);
        std::fs::write(&path, "Exhibit A.\n\nExhibit B.").unwrap();
        path.to_string_lossy().to_string()
    }

    fn runner(
        juror: MockModel,
        extractor: MockModel,
        config: RunnerConfig,
    ) -> BatchRunner<MockModel, MockModel> {
        BatchRunner::new(juror, StructuredExtractor::new(extractor), config)
    }

    fn request(path: &str, iterations: usize) -> BatchRequest {
        BatchRequest {
            document_path: path.to_string(),
            system_prompt: "You are a juror in a legal case.".to_string(),
            user_prompt: "How likely is the defendant guilty?".to_string(),
            iterations,
        }
    }

    #[tokio::test]
    async fn test_n_iterations_append_n_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_case(&dir, "case1.txt");

        let juror = MockModel::new("Around 70% likely. Verdict: Guilty.");
        let runner = runner(juror.clone(), MockModel::new(VERDICT_JSON), test_config());
        let mut session = Session::new(dir.path().join("response.csv"));

        let outcome = runner.run(&mut session, &request(&path, 3)).await.unwrap();

        assert_eq!(outcome.completed, 3);
        assert_eq!(outcome.failed, 0);
        assert_eq!(
            outcome.last_response.as_deref(),
            Some("Around 70% likely. Verdict: Guilty.")
        );
        assert_eq!(session.history().len(), 3);
        assert_eq!(juror.call_count(), 3);

        for record in session.history().rows() {
            match record {
                crate::history::RunRecord::Completed(row) => {
                    assert_eq!(row.file_name, path);
                    assert_eq!(row.likelihood, "70");
                    assert_eq!(row.decision, "Guilty");
                }
                other => panic!("unexpected record: {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_zero_iterations() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_case(&dir, "case1.txt");

        let runner = runner(
            MockModel::new("verdict"),
            MockModel::new(VERDICT_JSON),
            test_config(),
        );
        let mut session = Session::new(dir.path().join("response.csv"));

        let outcome = runner.run(&mut session, &request(&path, 0)).await.unwrap();
        assert_eq!(outcome.completed, 0);
        assert!(outcome.last_response.is_none());
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn test_document_change_resets_table_and_export() {
        let dir = tempfile::tempdir().unwrap();
        let case1 = write_case(&dir, "case1.txt");
        let case2 = write_case(&dir, "case2.txt");
        let export = dir.path().join("response.csv");

        let runner = runner(
            MockModel::new("verdict"),
            MockModel::new(VERDICT_JSON),
            test_config(),
        );
        let mut session = Session::new(export.clone());

        runner.run(&mut session, &request(&case1, 2)).await.unwrap();
        assert_eq!(session.history().len(), 2);
        std::fs::write(&export, "stale export").unwrap();

        runner.run(&mut session, &request(&case2, 1)).await.unwrap();
        assert_eq!(session.history().len(), 1);
        assert!(!export.exists());

        match &session.history().rows()[0] {
            crate::history::RunRecord::Completed(row) => assert_eq!(row.file_name, case2),
            other => panic!("unexpected record: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failed_iteration_recorded_and_loop_continues() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_case(&dir, "case1.txt");

        let juror = MockModel::new("verdict");
        juror.push_response("first verdict");
        juror.push_error(LlmError::Network("connection reset".to_string()));

        let runner = runner(juror, MockModel::new(VERDICT_JSON), test_config());
        let mut session = Session::new(dir.path().join("response.csv"));

        let outcome = runner.run(&mut session, &request(&path, 5)).await.unwrap();

        assert_eq!(outcome.completed, 4);
        assert_eq!(outcome.failed, 1);
        assert_eq!(session.history().len(), 5);
        match &session.history().rows()[1] {
            crate::history::RunRecord::Failed(row) => {
                assert_eq!(row.iteration, 2);
                assert!(row.error.contains("connection reset"));
            }
            other => panic!("unexpected record: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_abort_policy_stops_at_first_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_case(&dir, "case1.txt");

        let juror = MockModel::new("verdict");
        juror.push_response("first verdict");
        juror.push_error(LlmError::Network("connection reset".to_string()));

        let mut config = test_config();
        config.failure_policy = FailurePolicy::Abort;
        let runner = runner(juror, MockModel::new(VERDICT_JSON), config);
        let mut session = Session::new(dir.path().join("response.csv"));

        let err = runner.run(&mut session, &request(&path, 5)).await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::IterationFailed { iteration: 2, .. }
        ));
        // Table keeps what happened before the abort
        assert_eq!(session.history().len(), 2);
    }

    #[tokio::test]
    async fn test_bad_credential_aborts_without_consuming_budget() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_case(&dir, "case1.txt");

        let juror = MockModel::new("verdict");
        juror.push_error(LlmError::Auth("invalid api key".to_string()));

        let runner = runner(juror.clone(), MockModel::new(VERDICT_JSON), test_config());
        let mut session = Session::new(dir.path().join("response.csv"));

        let err = runner.run(&mut session, &request(&path, 5)).await.unwrap_err();
        assert!(matches!(err, SessionError::Credential(_)));
        assert_eq!(juror.call_count(), 1);
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn test_parse_failure_becomes_failed_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_case(&dir, "case1.txt");

        let runner = runner(
            MockModel::new("verdict"),
            MockModel::new("this is not json"),
            test_config(),
        );
        let mut session = Session::new(dir.path().join("response.csv"));

        let outcome = runner.run(&mut session, &request(&path, 2)).await.unwrap();
        assert_eq!(outcome.completed, 0);
        assert_eq!(outcome.failed, 2);
        assert_eq!(session.history().failed_count(), 2);
    }

    #[tokio::test]
    async fn test_iteration_cap() {
        let runner = runner(
            MockModel::new("verdict"),
            MockModel::new(VERDICT_JSON),
            test_config(),
        );
        let mut session = Session::new(PathBuf::from("/tmp/never-created.csv"));

        let err = runner
            .run(&mut session, &request("case1.txt", 501))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::TooManyIterations {
                requested: 501,
                max: 500
            }
        ));
    }

    #[tokio::test]
    async fn test_missing_document_aborts_run() {
        let runner = runner(
            MockModel::new("verdict"),
            MockModel::new(VERDICT_JSON),
            test_config(),
        );
        let mut session = Session::new(PathBuf::from("/tmp/never-created.csv"));

        let err = runner
            .run(&mut session, &request("/no/such/case.txt", 2))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Loader(_)));
    }
}
