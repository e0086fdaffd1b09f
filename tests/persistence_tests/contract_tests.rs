//! Contract behaviour observed through `dyn PersistenceHandler`

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use secrecy::{ExposeSecret, SecretString};

use recruiter_persistence::{
    AccountCredentials, PersistenceError, PersistenceHandler, RemovalOutcome, UserReport,
};

use super::{seeded_db, seeded_handler};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
}

#[tokio::test]
async fn test_find_by_name_scenario() {
    let handler = seeded_handler();

    let bob = handler.find_credentials_by_name("bob").await.unwrap();
    assert_eq!(bob.account_id, "u1");
    assert_eq!(bob.roles, vec!["recruiter".to_string()]);

    let missing = handler.find_credentials_by_name("nope").await;
    assert!(matches!(missing, Err(PersistenceError::NoSuchUser(_))));
}

#[tokio::test]
async fn test_inserted_account_round_trips_until_removed() {
    let db = seeded_db();
    let account = AccountCredentials::new(
        "u2",
        "erin",
        "pw",
        vec!["employer".to_string(), "recruiter".to_string()],
    );
    db.insert_account(account.clone()).unwrap();
    let handler: &dyn PersistenceHandler = &db;

    assert_eq!(handler.find_credentials_by_id("u2").await.unwrap(), account);
    assert_eq!(
        handler.remove_account("u2").await.unwrap(),
        RemovalOutcome::Removed
    );
    assert_eq!(
        handler.find_credentials_by_id("u2").await,
        Err(PersistenceError::NoSuchUser("u2".to_string()))
    );
}

#[tokio::test]
async fn test_removing_unknown_account_changes_nothing() {
    let db = seeded_db();
    let before = db.snapshot();

    let outcome = db.remove_account("never-inserted").await.unwrap();
    assert!(!outcome.existed());
    assert_eq!(db.snapshot(), before);
}

#[tokio::test]
async fn test_set_username_is_visible_on_next_read() {
    let handler = seeded_handler();

    assert_eq!(handler.set_username("u1", "alice").await.unwrap(), "alice");
    let account = handler.find_credentials_by_id("u1").await.unwrap();
    assert_eq!(account.user_name, "alice");
    assert!(handler.find_credentials_by_name("bob").await.is_err());

    assert!(matches!(
        handler.set_username("unknown", "alice").await,
        Err(PersistenceError::NoSuchUser(_))
    ));
}

#[tokio::test]
async fn test_set_password_replaces_secret() {
    let handler = seeded_handler();
    handler
        .set_password("u1", SecretString::from("tr0ub4dor"))
        .await
        .unwrap();

    let account = handler.find_credentials_by_id("u1").await.unwrap();
    assert_eq!(account.pass_phrase.expose_secret(), "tr0ub4dor");
}

#[tokio::test]
async fn test_property_lookup() {
    let handler = seeded_handler();
    assert_eq!(handler.property("Component.Logger").unwrap(), "Simple Logger");
    assert!(matches!(
        handler.property("nonexistent_key"),
        Err(PersistenceError::NoSuchProperty(_))
    ));
}

#[tokio::test]
async fn test_roles_are_stable_and_unique() {
    let handler = seeded_handler();
    let roles = handler.find_roles().await;
    assert!(!roles.is_empty());

    let mut deduped = roles.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), roles.len());

    assert_eq!(handler.find_roles().await, roles);
}

#[tokio::test]
async fn test_list_jobs_filters_by_employer() {
    let db = seeded_db();
    db.insert_job(recruiter_persistence::JobCredentials::new(
        "j2",
        "Globex",
        "Tester",
        recruiter_persistence::JobStatus::Open,
    ))
    .unwrap();
    let handler: &dyn PersistenceHandler = &db;

    let acme = handler.list_jobs("Acme").await.unwrap();
    assert_eq!(acme.len(), 1);
    assert!(acme.iter().all(|job| job.employer == "Acme"));
    assert!(handler.list_jobs("Initech").await.unwrap().is_empty());
    assert!(handler.list_jobs("").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_remove_job_listing_scenario() {
    let handler = seeded_handler();

    assert_eq!(
        handler.get_job_listing_report("j1").await.unwrap(),
        "j1: Engineer at Acme [open]"
    );
    handler.remove_job_listing("j1").await.unwrap();

    let report = handler.get_job_listing_report("j1").await;
    assert!(matches!(report, Err(PersistenceError::NoSuchJob(_))));
    assert!(report.unwrap_err().is_not_found());
    assert!(handler.remove_job_listing("j1").await.is_err());
}

#[tokio::test]
async fn test_reports_by_date_and_account() {
    let db = seeded_db();
    db.insert_account(AccountCredentials::new("u0", "zed", "pw", vec![]))
        .unwrap();
    for (id, text, d) in [("u1", "late reply", 3), ("u0", "no show", 3), ("u1", "rude", 4)] {
        db.file_report(UserReport {
            account_id: id.to_string(),
            report: text.to_string(),
            filed_on: day(d),
        })
        .unwrap();
    }
    let handler: &dyn PersistenceHandler = &db;

    let ids: Vec<String> = handler
        .find_reported_users(day(3))
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.account_id)
        .collect();
    assert_eq!(ids, vec!["u0".to_string(), "u1".to_string()]);

    assert_eq!(
        handler.find_user_report("u1").await.unwrap(),
        "late reply\nrude"
    );
    assert!(handler.find_reported_users(day(5)).await.unwrap().is_empty());
    assert!(matches!(
        handler.find_user_report("ghost").await,
        Err(PersistenceError::NoSuchUser(_))
    ));
}
