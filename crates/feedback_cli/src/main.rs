//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `feedback_core` wiring.
//! - Keep output deterministic for quick local sanity checks.

use feedback_core::db::open_db_in_memory;
use feedback_core::{
    FeedbackStore, RawSubmission, SqliteFeedbackRepository, SubmitOutcome, UpsertOutcome,
};

fn main() {
    if let Err(err) = run() {
        eprintln!("feedback_core smoke failed: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = open_db_in_memory()?;
    let repo = SqliteFeedbackRepository::try_new(&mut conn)?;
    let mut store = FeedbackStore::new(repo);

    let sample = RawSubmission::new("Ada Lovelace", "ADA@calc.org", "4");
    match store.submit(&sample)? {
        SubmitOutcome::Recorded(UpsertOutcome::Inserted(id)) => {
            println!("feedback_core submit=inserted id={id}");
        }
        SubmitOutcome::Recorded(UpsertOutcome::RatingUpdated) => {
            println!("feedback_core submit=rating_updated");
        }
        SubmitOutcome::Rejected(errors) => {
            println!("feedback_core submit=rejected errors={errors}");
        }
    }
    println!("feedback_core version={}", feedback_core::core_version());

    Ok(())
}
