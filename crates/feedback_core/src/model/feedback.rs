//! Feedback domain model.
//!
//! # Responsibility
//! - Define the canonical record stored per visitor email.
//! - Define the raw, untrusted submission shape handed in by transports.
//!
//! # Invariants
//! - `id` is assigned by storage on first insert and never changes.
//! - `email` is stored lower-cased and is unique across all records.
//! - `rating` is always within `[RATING_MIN, RATING_MAX]`.

use serde::{Deserialize, Serialize};

/// Stable surrogate identifier for a feedback record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
/// Values come from the storage layer's autoincrement key.
pub type FeedbackId = i64;

/// Maximum byte length accepted for `full_name` and `email`.
///
/// Matches the storage column bound, so validation failures surface as
/// user-facing messages instead of constraint violations.
pub const FIELD_MAX_LEN: usize = 25;

/// Lowest accepted rating value.
pub const RATING_MIN: u8 = 0;

/// Highest accepted rating value.
pub const RATING_MAX: u8 = 5;

/// Canonical record for one visitor's current rating.
///
/// A visitor is keyed by normalized email: resubmission overwrites
/// `rating` in place and leaves `full_name` as first submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// Storage-assigned surrogate key.
    pub id: FeedbackId,
    /// Visitor name as first submitted. Never rewritten on resubmission.
    pub full_name: String,
    /// Lower-cased email; the natural deduplication key.
    pub email: String,
    /// Current rating in `[0, 5]`.
    pub rating: u8,
}

/// Raw form fields as delivered by a transport layer.
///
/// Every field is optional: `None` models a field that was absent or not
/// text-shaped in the incoming request. The core never assumes transports
/// deliver well-typed values; the validator decides what is acceptable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSubmission {
    /// Visitor name field, verbatim.
    pub name: Option<String>,
    /// Email field, verbatim (not yet lower-cased).
    pub email: Option<String>,
    /// Rating field as text; numeric interpretation happens in validation.
    pub rating: Option<String>,
}

impl RawSubmission {
    /// Builds a submission with all three fields present.
    ///
    /// Covers the common form-post case; partial shapes can be built
    /// directly from the public fields.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        rating: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            rating: Some(rating.into()),
        }
    }
}
