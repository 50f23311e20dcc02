use feedback_core::db::open_db_in_memory;
use feedback_core::{
    ErrorKind, FeedbackListQuery, FeedbackStore, RawSubmission, SqliteFeedbackRepository,
    SubmitOutcome, UpsertOutcome,
};
use rusqlite::Connection;

fn store(conn: &mut Connection) -> FeedbackStore<SqliteFeedbackRepository<'_>> {
    FeedbackStore::new(SqliteFeedbackRepository::try_new(conn).unwrap())
}

#[test]
fn first_submission_inserts_then_resubmission_updates_rating_only() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = store(&mut conn);

    let outcome = store
        .submit(&RawSubmission::new("Ada Lovelace", "ADA@calc.org", "4"))
        .unwrap();
    assert!(matches!(
        outcome,
        SubmitOutcome::Recorded(UpsertOutcome::Inserted(_))
    ));

    let record = store.find_by_email("ada@calc.org").unwrap().unwrap();
    assert_eq!(record.full_name, "Ada Lovelace");
    assert_eq!(record.email, "ada@calc.org");
    assert_eq!(record.rating, 4);

    let outcome = store
        .submit(&RawSubmission::new("Ada Lovelace", "ada@calc.org", "2"))
        .unwrap();
    assert_eq!(
        outcome,
        SubmitOutcome::Recorded(UpsertOutcome::RatingUpdated)
    );

    let record = store.find_by_email("ada@calc.org").unwrap().unwrap();
    assert_eq!(record.full_name, "Ada Lovelace");
    assert_eq!(record.rating, 2);
    assert_eq!(store.list(&FeedbackListQuery::default()).unwrap().len(), 1);
}

#[test]
fn resubmitting_identical_input_keeps_exactly_one_record() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = store(&mut conn);

    let raw = RawSubmission::new("Bob", "bob@example.com", "3");
    store.submit(&raw).unwrap();
    let outcome = store.submit(&raw).unwrap();
    assert_eq!(
        outcome,
        SubmitOutcome::Recorded(UpsertOutcome::RatingUpdated)
    );

    let all = store.list(&FeedbackListQuery::default()).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].rating, 3);
}

#[test]
fn email_deduplication_is_case_insensitive() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = store(&mut conn);

    store
        .submit(&RawSubmission::new("Bob", "A@B.com", "1"))
        .unwrap();
    let outcome = store
        .submit(&RawSubmission::new("Bob", "a@b.com", "5"))
        .unwrap();
    assert_eq!(
        outcome,
        SubmitOutcome::Recorded(UpsertOutcome::RatingUpdated)
    );

    let record = store.find_by_email("A@B.COM").unwrap().unwrap();
    assert_eq!(record.email, "a@b.com");
    assert_eq!(record.rating, 5);
    assert_eq!(store.list(&FeedbackListQuery::default()).unwrap().len(), 1);
}

#[test]
fn rejected_submission_leaves_state_unchanged() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = store(&mut conn);

    let outcome = store
        .submit(&RawSubmission::new("", "x@y.com", "3"))
        .unwrap();
    let errors = match outcome {
        SubmitOutcome::Rejected(errors) => errors,
        other => panic!("expected rejection, got {other:?}"),
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.message(ErrorKind::NameLength), Some("name is required"));

    assert!(store.list(&FeedbackListQuery::default()).unwrap().is_empty());
}

#[test]
fn non_numeric_rating_is_rejected_without_persisting() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = store(&mut conn);

    let outcome = store
        .submit(&RawSubmission::new("Bob", "bob@example.com", "high"))
        .unwrap();
    let errors = match outcome {
        SubmitOutcome::Rejected(errors) => errors,
        other => panic!("expected rejection, got {other:?}"),
    };
    assert!(errors.contains(ErrorKind::RatingType));
    assert!(!errors.contains(ErrorKind::RatingRange));

    assert!(store.find_by_email("bob@example.com").unwrap().is_none());
}

#[test]
fn fractional_rating_is_truncated_toward_zero() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = store(&mut conn);

    let outcome = store
        .submit(&RawSubmission::new("Bob", "bob@example.com", "5.9"))
        .unwrap();
    assert!(matches!(
        outcome,
        SubmitOutcome::Recorded(UpsertOutcome::Inserted(_))
    ));

    let record = store.find_by_email("bob@example.com").unwrap().unwrap();
    assert_eq!(record.rating, 5);
}

#[test]
fn missing_fields_are_rejected_with_type_errors() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = store(&mut conn);

    let outcome = store.submit(&RawSubmission::default()).unwrap();
    let errors = match outcome {
        SubmitOutcome::Rejected(errors) => errors,
        other => panic!("expected rejection, got {other:?}"),
    };
    assert!(errors.contains(ErrorKind::NameType));
    assert!(errors.contains(ErrorKind::EmailType));
    assert!(errors.contains(ErrorKind::RatingType));
    assert!(store.list(&FeedbackListQuery::default()).unwrap().is_empty());
}
