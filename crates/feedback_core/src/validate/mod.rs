//! Submission validation.
//!
//! # Responsibility
//! - Inspect raw form fields and report every applicable problem at once.
//! - Produce the clean `(full_name, email, rating)` triple consumed by
//!   persistence.
//!
//! # Invariants
//! - Validation is pure: no I/O, no side effects, deterministic.
//! - All fields are checked on every pass; a failure in one field never
//!   suppresses checks on the others.
//! - A type failure for a field short-circuits that field's remaining
//!   checks only.
//! - `ErrorSet` holds at most one message per `ErrorKind`.

use crate::model::feedback::{RawSubmission, FIELD_MAX_LEN, RATING_MAX, RATING_MIN};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Closed set of validation failure categories.
///
/// Each variant maps to exactly one form field concern, so a presentation
/// layer can exhaustively route messages to inputs. The serialized form is
/// the stable tag returned by [`ErrorKind::as_tag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Name field absent or not text.
    #[serde(rename = "name.type")]
    NameType,
    /// Name empty or over the length bound.
    #[serde(rename = "name.length")]
    NameLength,
    /// Email field absent or not text.
    #[serde(rename = "email.type")]
    EmailType,
    /// Email empty or over the length bound.
    #[serde(rename = "email.length")]
    EmailLength,
    /// Email lacks an `@` sign.
    #[serde(rename = "email.at")]
    EmailAt,
    /// Email lacks a `.` (no recognizable domain).
    #[serde(rename = "email.domain")]
    EmailDomain,
    /// Rating absent or not numeric.
    #[serde(rename = "rating.type")]
    RatingType,
    /// Rating numeric but outside the accepted range.
    #[serde(rename = "rating.range")]
    RatingRange,
}

impl ErrorKind {
    /// Stable categorical tag, e.g. `name.length`.
    pub fn as_tag(self) -> &'static str {
        match self {
            Self::NameType => "name.type",
            Self::NameLength => "name.length",
            Self::EmailType => "email.type",
            Self::EmailLength => "email.length",
            Self::EmailAt => "email.at",
            Self::EmailDomain => "email.domain",
            Self::RatingType => "rating.type",
            Self::RatingRange => "rating.range",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Ordered collection of field validation failures.
///
/// Empty means the input is acceptable for persistence. Serializes as an
/// object keyed by the stable category tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorSet {
    errors: BTreeMap<ErrorKind, String>,
}

impl ErrorSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether no check failed.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of distinct failed categories.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns whether the given category failed.
    pub fn contains(&self, kind: ErrorKind) -> bool {
        self.errors.contains_key(&kind)
    }

    /// Message recorded for the given category, if it failed.
    pub fn message(&self, kind: ErrorKind) -> Option<&str> {
        self.errors.get(&kind).map(String::as_str)
    }

    /// Iterates failures in stable category order.
    pub fn iter(&self) -> impl Iterator<Item = (ErrorKind, &str)> {
        self.errors.iter().map(|(kind, message)| (*kind, message.as_str()))
    }

    /// Comma-joined category tags, for compact log lines.
    pub fn tags(&self) -> String {
        self.errors
            .keys()
            .map(|kind| kind.as_tag())
            .collect::<Vec<_>>()
            .join(",")
    }

    fn insert(&mut self, kind: ErrorKind, message: impl Into<String>) {
        self.errors.insert(kind, message.into());
    }
}

impl Display for ErrorSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (kind, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{kind}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Validated submission values, ready for persistence.
///
/// Can only be obtained through [`CleanSubmission::parse`], so holding one
/// proves every field invariant already passed. Fields are deliberately
/// private to keep that proof honest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanSubmission {
    full_name: String,
    email: String,
    rating: u8,
}

impl CleanSubmission {
    /// Runs the full validation pass over raw fields.
    ///
    /// # Contract
    /// - Checks every field; the returned set carries all failures at once.
    /// - On success, `rating` is the numeric value truncated toward zero.
    /// - Values are taken as given: email case normalization is the
    ///   caller's concern (see the store's submit path).
    pub fn parse(raw: &RawSubmission) -> Result<Self, ErrorSet> {
        let mut errors = ErrorSet::new();

        let full_name = check_name(raw.name.as_deref(), &mut errors);
        let email = check_email(raw.email.as_deref(), &mut errors);
        let rating = check_rating(raw.rating.as_deref(), &mut errors);

        match (full_name, email, rating) {
            (Some(full_name), Some(email), Some(rating)) if errors.is_empty() => Ok(Self {
                full_name,
                email,
                rating,
            }),
            _ => Err(errors),
        }
    }

    /// Validated visitor name.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Validated email, in whatever case the caller supplied.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Validated rating in `[0, 5]`.
    pub fn rating(&self) -> u8 {
        self.rating
    }
}

/// Validates raw fields and returns every failure found.
///
/// An empty set means the input is acceptable for persistence. Equivalent
/// to [`CleanSubmission::parse`] with the clean value discarded.
pub fn validate(raw: &RawSubmission) -> ErrorSet {
    match CleanSubmission::parse(raw) {
        Ok(_) => ErrorSet::new(),
        Err(errors) => errors,
    }
}

fn check_name(value: Option<&str>, errors: &mut ErrorSet) -> Option<String> {
    let Some(name) = value else {
        errors.insert(ErrorKind::NameType, "name must be text");
        return None;
    };

    // No structural checks beyond length: requiring e.g. a space would
    // reject legitimate single-word names.
    check_length(ErrorKind::NameLength, "name", name, errors).then(|| name.to_string())
}

fn check_email(value: Option<&str>, errors: &mut ErrorSet) -> Option<String> {
    let Some(email) = value else {
        errors.insert(ErrorKind::EmailType, "email must be text");
        return None;
    };

    // Deliberately shallow format checks. Address-grammar patterns reject
    // real addresses; true verification needs a confirmation mail, which
    // is outside this core. Length, `@` and `.` fire independently.
    let mut ok = check_length(ErrorKind::EmailLength, "email", email, errors);
    if !email.contains('@') {
        errors.insert(ErrorKind::EmailAt, "email must have an @ sign");
        ok = false;
    }
    if !email.contains('.') {
        errors.insert(ErrorKind::EmailDomain, "email must have a domain like .com");
        ok = false;
    }

    ok.then(|| email.to_string())
}

fn check_rating(value: Option<&str>, errors: &mut ErrorSet) -> Option<u8> {
    let Some(text) = value else {
        errors.insert(ErrorKind::RatingType, "rating must be a number");
        return None;
    };

    let Some(number) = parse_rating(text) else {
        errors.insert(ErrorKind::RatingType, "rating must be a number");
        return None;
    };

    if number < f64::from(RATING_MIN) || number > f64::from(RATING_MAX) {
        errors.insert(
            ErrorKind::RatingRange,
            format!("rating must be between {RATING_MIN} and {RATING_MAX}"),
        );
        return None;
    }

    // In-range value, so truncation toward zero stays within u8.
    Some(number.trunc() as u8)
}

fn check_length(kind: ErrorKind, label: &str, value: &str, errors: &mut ErrorSet) -> bool {
    // Byte length, matching the storage column bound.
    let len = value.len();
    if len == 0 {
        errors.insert(kind, format!("{label} is required"));
        return false;
    }
    if len > FIELD_MAX_LEN {
        errors.insert(kind, format!("{label} must be {FIELD_MAX_LEN} characters or less"));
        return false;
    }
    true
}

/// Interprets rating text as a finite number.
///
/// Accepts integer and decimal forms with surrounding ASCII whitespace.
/// Non-finite values (`inf`, `NaN`) are rejected as non-numeric.
pub(crate) fn parse_rating(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let number = if let Ok(integer) = trimmed.parse::<i64>() {
        integer as f64
    } else {
        trimmed.parse::<f64>().ok()?
    };
    number.is_finite().then_some(number)
}

/// Canonical integer form of rating text, truncated toward zero.
///
/// Returns `None` for non-numeric text and for magnitudes outside `i64`,
/// leaving those values for the validator to report.
pub(crate) fn canonical_rating(text: &str) -> Option<i64> {
    let truncated = parse_rating(text)?.trunc();
    if truncated < i64::MIN as f64 || truncated > i64::MAX as f64 {
        return None;
    }
    Some(truncated as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, email: &str, rating: &str) -> RawSubmission {
        RawSubmission::new(name, email, rating)
    }

    #[test]
    fn valid_submission_has_no_errors() {
        let errors = validate(&raw("Ada Lovelace", "ada@calc.org", "4"));
        assert!(errors.is_empty(), "unexpected errors: {errors}");
    }

    #[test]
    fn parse_returns_clean_values_with_truncated_rating() {
        let clean = CleanSubmission::parse(&raw("Bob", "bob@example.com", "4.7")).unwrap();
        assert_eq!(clean.full_name(), "Bob");
        assert_eq!(clean.email(), "bob@example.com");
        assert_eq!(clean.rating(), 4);
    }

    #[test]
    fn empty_name_reports_required_only() {
        let errors = validate(&raw("", "x@y.com", "3"));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.message(ErrorKind::NameLength), Some("name is required"));
    }

    #[test]
    fn boundary_lengths_are_respected() {
        let name_25 = "a".repeat(25);
        let name_26 = "a".repeat(26);
        // 25 bytes total, still carrying `@` and `.`.
        let email_25 = format!("{}@b.com", "a".repeat(19));
        assert_eq!(email_25.len(), 25);

        assert!(validate(&raw(&name_25, &email_25, "5")).is_empty());

        let errors = validate(&raw(&name_26, &email_25, "5"));
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.message(ErrorKind::NameLength),
            Some("name must be 25 characters or less")
        );

        let email_26 = format!("{}@b.com", "a".repeat(20));
        let errors = validate(&raw(&name_25, &email_26, "5"));
        assert_eq!(errors.len(), 1);
        assert!(errors.contains(ErrorKind::EmailLength));
    }

    #[test]
    fn missing_fields_report_type_errors() {
        let errors = validate(&RawSubmission::default());
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(ErrorKind::NameType));
        assert!(errors.contains(ErrorKind::EmailType));
        assert!(errors.contains(ErrorKind::RatingType));
        assert!(!errors.contains(ErrorKind::NameLength));
        assert!(!errors.contains(ErrorKind::RatingRange));
    }

    #[test]
    fn email_at_and_domain_checks_fire_independently() {
        let errors = validate(&raw("Bob", "bob-at-example", "5"));
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(ErrorKind::EmailAt));
        assert!(errors.contains(ErrorKind::EmailDomain));

        let errors = validate(&raw("Bob", "bob@example", "5"));
        assert_eq!(errors.len(), 1);
        assert!(errors.contains(ErrorKind::EmailDomain));

        let errors = validate(&raw("Bob", "bob.example", "5"));
        assert_eq!(errors.len(), 1);
        assert!(errors.contains(ErrorKind::EmailAt));
    }

    #[test]
    fn non_numeric_rating_is_type_error_never_range() {
        for text in ["high", "", "  ", "five", "0x4", "NaN", "inf"] {
            let errors = validate(&raw("Bob", "bob@example.com", text));
            assert!(errors.contains(ErrorKind::RatingType), "rating {text:?}");
            assert!(!errors.contains(ErrorKind::RatingRange), "rating {text:?}");
        }
    }

    #[test]
    fn rating_range_boundaries() {
        assert!(validate(&raw("Bob", "bob@example.com", "0")).is_empty());
        assert!(validate(&raw("Bob", "bob@example.com", "5")).is_empty());

        for text in ["-1", "6", "5.9", "100"] {
            let errors = validate(&raw("Bob", "bob@example.com", text));
            assert_eq!(errors.len(), 1, "rating {text:?}");
            assert!(errors.contains(ErrorKind::RatingRange), "rating {text:?}");
        }
    }

    #[test]
    fn failures_across_fields_accumulate() {
        let errors = validate(&raw("", "bob-at-example", "9"));
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(ErrorKind::NameLength));
        assert!(errors.contains(ErrorKind::EmailAt));
        assert!(errors.contains(ErrorKind::EmailDomain));
        assert!(errors.contains(ErrorKind::RatingRange));
    }

    #[test]
    fn canonical_rating_truncates_toward_zero() {
        assert_eq!(canonical_rating("5.9"), Some(5));
        assert_eq!(canonical_rating("-0.5"), Some(0));
        assert_eq!(canonical_rating(" 4 "), Some(4));
        assert_eq!(canonical_rating("004"), Some(4));
        assert_eq!(canonical_rating("high"), None);
    }

    #[test]
    fn error_set_serializes_with_stable_tags() {
        let errors = validate(&raw("", "bob-at-example", "high"));
        let json = serde_json::to_value(&errors).unwrap();
        let object = json.as_object().unwrap();
        assert!(object.contains_key("name.length"));
        assert!(object.contains_key("email.at"));
        assert!(object.contains_key("email.domain"));
        assert!(object.contains_key("rating.type"));
    }
}
