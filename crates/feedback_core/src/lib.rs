//! Core domain logic for visitor feedback capture.
//! This crate is the single source of truth for submission validation and
//! the one-rating-per-email persistence invariant.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod validate;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::feedback::{FeedbackId, FeedbackRecord, RawSubmission};
pub use repo::feedback_repo::{
    FeedbackListQuery, FeedbackRepository, RepoError, RepoResult, SqliteFeedbackRepository,
    UpsertOutcome,
};
pub use service::feedback_service::{FeedbackStore, SubmitOutcome};
pub use validate::{validate, CleanSubmission, ErrorKind, ErrorSet};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
