use serde::{Deserialize, Serialize};
use session::{FailurePolicy, PacingPolicy, RetryPolicy, RunnerConfig};
use std::path::PathBuf;
use std::time::Duration;

/// Default prompts the original juror study shipped with; requests may
/// override both.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a juror in a legal case. Please, read the evidence in this case and respond on a scale from 0-100 how likely you think the defendant is guilty. Also provide a dichotomous guilty/innocent decision regarding the defendant. The decision should be either 'Innocent' or 'Guilty'.";
pub const DEFAULT_USER_PROMPT: &str = "Please, read the evidence in this case and respond on a scale from 0-100 how likely you think the defendant is guilty. Also provide a dichotomous decision either the defendant is 'Innocent' or 'Guilty'.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub export_dir: PathBuf,
    pub limits: LimitsConfig,
    pub retry: RetryConfig,
    pub pacing: PacingConfig,
    pub on_iteration_failure: FailureMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Hard cap on iterations per submission
    pub max_iterations: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_retries: usize,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Constant delay between iterations, in seconds
    pub fixed_delay_secs: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    Continue, // Record the failed iteration and keep going
    Abort,    // Stop the batch at the first failed iteration
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            export_dir: PathBuf::from("data/exports"),
            limits: LimitsConfig {
                max_iterations: 500,
            },
            retry: RetryConfig {
                max_retries: 3,
                initial_backoff_ms: 1000,
                max_backoff_ms: 10000,
            },
            pacing: PacingConfig {
                fixed_delay_secs: 3,
            },
            on_iteration_failure: FailureMode::Continue,
        }
    }
}

impl AppConfig {
    /// Translate the serializable config into the loop's runtime config.
    pub fn runner_config(&self) -> RunnerConfig {
        RunnerConfig {
            max_iterations: self.limits.max_iterations,
            pacing: PacingPolicy::Fixed(Duration::from_secs(self.pacing.fixed_delay_secs)),
            retry: RetryPolicy::new(
                self.retry.max_retries,
                self.retry.initial_backoff_ms,
                self.retry.max_backoff_ms,
            ),
            failure_policy: match self.on_iteration_failure {
                FailureMode::Continue => FailurePolicy::Continue,
                FailureMode::Abort => FailurePolicy::Abort,
            },
            sampling: Default::default(),
        }
    }
}
