//! Domain model for visitor feedback.
//!
//! # Responsibility
//! - Define the canonical feedback record and the raw submission shape.
//! - Keep field bounds in one place for validator and storage to share.
//!
//! # Invariants
//! - Every persisted record is identified by a stable `FeedbackId`.
//! - At most one record exists per normalized (lower-cased) email.

pub mod feedback;
