mod args;
mod types;

pub use args::{EXPORT_INFO_FLAG, build_args};
pub use types::*;
