//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation and repository calls into the submit use-case.
//! - Keep transport/presentation layers decoupled from storage details.

pub mod feedback_service;
