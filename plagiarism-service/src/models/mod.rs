//! Request and result types for the check endpoint.

pub mod check;

pub use check::{
    CheckInput, CheckOutcome, CheckRequest, CheckResult, FlaggedSection, ResultSource,
    MAX_SIMILARITY,
};
