pub mod checker;
pub mod fallback;
pub mod providers;
pub mod reply_parser;
pub mod report;

pub use checker::{CheckFailure, PlagiarismChecker};
