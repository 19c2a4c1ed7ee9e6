pub mod check;
pub mod health;
pub mod report;

pub use check::{check_plagiarism, RESULT_SOURCE_HEADER};
pub use health::health_check;
pub use report::download_report;
