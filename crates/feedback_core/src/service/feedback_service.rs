//! Feedback submission use-case service.
//!
//! # Responsibility
//! - Turn a raw submission into a durable upsert keyed by normalized email.
//! - Keep the two outcome channels disjoint: rejected input is a value,
//!   persistence failure is an error.
//!
//! # Invariants
//! - No persistence action happens for a submission that fails validation.
//! - Email is lower-cased before validation and before every lookup.
//! - Submitted field text is never written to log output.

use crate::model::feedback::{FeedbackRecord, RawSubmission};
use crate::repo::feedback_repo::{
    FeedbackListQuery, FeedbackRepository, RepoResult, UpsertOutcome,
};
use crate::validate::{canonical_rating, CleanSubmission, ErrorSet};
use log::{debug, error, info};

/// Stateful store deciding between insert and rating update per email.
///
/// Owns its repository explicitly; substituting an in-memory SQLite
/// repository is the intended test seam.
pub struct FeedbackStore<R: FeedbackRepository> {
    repo: R,
}

/// Result of one submission attempt, excluding operational failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Input was valid and is now durably recorded.
    Recorded(UpsertOutcome),
    /// Input failed validation; state is unchanged.
    Rejected(ErrorSet),
}

impl<R: FeedbackRepository> FeedbackStore<R> {
    /// Creates a store using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and persists one submission.
    ///
    /// # Contract
    /// - Normalizes first (email lower-cased, numeric rating text
    ///   truncated toward zero), then validates the normalized values.
    /// - Validation failure returns `Rejected` with every problem found;
    ///   nothing is persisted.
    /// - Valid input upserts by email: first submission inserts, any later
    ///   one overwrites the rating and leaves `full_name` as first stored.
    /// - Persistence failures surface as `Err`, never inside the
    ///   `ErrorSet`.
    pub fn submit(&mut self, raw: &RawSubmission) -> RepoResult<SubmitOutcome> {
        let normalized = normalize(raw);

        let clean = match CleanSubmission::parse(&normalized) {
            Ok(clean) => clean,
            Err(errors) => {
                debug!(
                    "event=submit module=service status=rejected categories={}",
                    errors.tags()
                );
                return Ok(SubmitOutcome::Rejected(errors));
            }
        };

        let outcome = self
            .repo
            .upsert_rating(clean.full_name(), clean.email(), clean.rating())
            .map_err(|err| {
                error!("event=submit module=service status=error error={err}");
                err
            })?;
        info!(
            "event=submit module=service status=ok outcome={}",
            outcome_tag(outcome)
        );

        Ok(SubmitOutcome::Recorded(outcome))
    }

    /// Fetches the record for an email, case-insensitively.
    pub fn find_by_email(&self, email: &str) -> RepoResult<Option<FeedbackRecord>> {
        self.repo.find_by_email(&email.to_lowercase())
    }

    /// Lists recorded feedback ordered by surrogate id.
    pub fn list(&self, query: &FeedbackListQuery) -> RepoResult<Vec<FeedbackRecord>> {
        self.repo.list(query)
    }
}

/// Produces the values the validator and repository actually operate on.
///
/// Non-numeric rating text is passed through untouched so the validator
/// reports the type error instead of this step guessing a value.
fn normalize(raw: &RawSubmission) -> RawSubmission {
    RawSubmission {
        name: raw.name.clone(),
        email: raw.email.as_ref().map(|email| email.to_lowercase()),
        rating: raw.rating.as_ref().map(|text| {
            canonical_rating(text).map_or_else(|| text.clone(), |value| value.to_string())
        }),
    }
}

fn outcome_tag(outcome: UpsertOutcome) -> &'static str {
    match outcome {
        UpsertOutcome::Inserted(_) => "inserted",
        UpsertOutcome::RatingUpdated => "rating_updated",
    }
}
