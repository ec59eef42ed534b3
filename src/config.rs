use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::result::DispatchReport;
use crate::errors::DispatchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultOrder {
    /// Report results as they finish.
    #[default]
    Completion,
    /// Buffer results and report them in the order targets were submitted.
    Submission,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    pub max_concurrency: Option<usize>,
    pub timeout_ms: Option<u64>,
    pub retries: u32,
    pub retry_delay_ms: u64,
    pub order: ResultOrder,
    pub fail_on_error: bool,
    pub accept_any_status: bool,
    pub connect_timeout_ms: Option<u64>,
    pub user_agent: String,
    pub deadline_ms: Option<u64>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            max_concurrency: None,
            timeout_ms: None,
            retries: 0,
            retry_delay_ms: 200,
            order: ResultOrder::Completion,
            fail_on_error: false,
            accept_any_status: false,
            connect_timeout_ms: None,
            user_agent: concat!("fetchall-rs/", env!("CARGO_PKG_VERSION")).to_string(),
            deadline_ms: None,
        }
    }
}

impl DispatcherConfig {
    pub fn from_json_str(json: &str) -> Result<Self, DispatchError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DispatchError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Whether the run as a whole should be reported as failed.
    pub fn run_failed(&self, report: &DispatchReport) -> bool {
        self.fail_on_error && report.has_failures()
    }

    pub fn validate(&self) -> Result<(), DispatchError> {
        if self.max_concurrency == Some(0) {
            return Err(DispatchError::Config(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        if self.timeout_ms == Some(0) {
            return Err(DispatchError::Config(
                "timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.deadline_ms == Some(0) {
            return Err(DispatchError::Config(
                "deadline_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Command-line values layered over a loaded config. Anything set here wins.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub max_concurrency: Option<usize>,
    pub timeout_ms: Option<u64>,
    pub deadline_ms: Option<u64>,
    pub retries: Option<u32>,
    pub retry_delay_ms: Option<u64>,
    pub ordered: bool,
    pub fail_on_error: bool,
    pub accept_any_status: bool,
}

impl ConfigOverrides {
    pub fn apply(&self, mut config: DispatcherConfig) -> Result<DispatcherConfig, DispatchError> {
        if let Some(concurrency) = self.max_concurrency {
            config.max_concurrency = Some(concurrency);
        }
        if let Some(timeout) = self.timeout_ms {
            config.timeout_ms = Some(timeout);
        }
        if let Some(deadline) = self.deadline_ms {
            config.deadline_ms = Some(deadline);
        }
        if let Some(retries) = self.retries {
            config.retries = retries;
        }
        if let Some(delay) = self.retry_delay_ms {
            config.retry_delay_ms = delay;
        }
        if self.ordered {
            config.order = ResultOrder::Submission;
        }
        if self.fail_on_error {
            config.fail_on_error = true;
        }
        if self.accept_any_status {
            config.accept_any_status = true;
        }

        config.validate()?;
        Ok(config)
    }
}
