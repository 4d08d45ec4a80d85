/// Everything a finished child process left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessResult {
    /// `None` when the child was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ProcessResult {
    pub fn new(
        exit_code: Option<i32>,
        stdout: impl Into<Vec<u8>>,
        stderr: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Whitespace-only stderr does not count as an error report.
    pub fn has_stderr(&self) -> bool {
        !self.stderr.trim_ascii().is_empty()
    }

    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(self.stderr.trim_ascii()).into_owned()
    }

    pub fn trimmed_stdout(&self) -> &[u8] {
        self.stdout.trim_ascii()
    }
}
