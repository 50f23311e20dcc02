//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the parameterized data access contract used by the store.
//! - Isolate SQLite query details from submission orchestration.
//!
//! # Invariants
//! - Repository APIs accept already-normalized values; untrusted text only
//!   ever reaches SQL through bound parameters.
//! - `upsert_rating` is atomic with respect to concurrent upserts for the
//!   same email.

pub mod feedback_repo;
