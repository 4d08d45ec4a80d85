use async_trait::async_trait;
use machine_parts_gateway::{
    Error, Result,
    process::{ProcessResult, ProcessRunner},
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the mock pretends the generator did.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    Finished(ProcessResult),
    LaunchFailure(String),
    TimedOut(Duration),
}

/// Mock runner that records every argument vector it is asked to run
#[derive(Debug)]
pub struct MockProcessRunner {
    pub outcome: MockOutcome,
    pub calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl MockProcessRunner {
    pub fn new(outcome: MockOutcome) -> Self {
        Self {
            outcome,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn finishing(exit_code: i32, stdout: &str, stderr: &str) -> Self {
        Self::new(MockOutcome::Finished(ProcessResult::new(
            Some(exit_code),
            stdout,
            stderr,
        )))
    }

    pub fn get_calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProcessRunner for MockProcessRunner {
    async fn run(&self, args: &[String]) -> Result<ProcessResult> {
        self.calls.lock().unwrap().push(args.to_vec());

        match &self.outcome {
            MockOutcome::Finished(result) => Ok(result.clone()),
            MockOutcome::LaunchFailure(msg) => Err(Error::launch(msg.clone())),
            MockOutcome::TimedOut(timeout) => Err(Error::Timeout(*timeout)),
        }
    }
}
