mod runner;
mod types;

pub use runner::{CommandRunner, ProcessRunner};
pub use types::ProcessResult;
