//! CLI 명령어 구현 모듈.

pub mod query;
pub mod usage;

pub use query::{run_query, CliError};
pub use usage::usage_text;
