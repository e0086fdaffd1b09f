//! Building backends from configuration files

use std::collections::BTreeMap;
use std::io::Write;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use recruiter_persistence::snapshot::{read_snapshot, write_snapshot};
use recruiter_persistence::{
    AdaptationSource, PersistenceConfig, PersistenceError, PersistenceHandler, SimpleDB,
};

use super::seeded_db;

#[tokio::test]
async fn test_backend_from_config_file() {
    let temp_dir = TempDir::new().unwrap();

    let adaptation_path = temp_dir.path().join("adaptation.json");
    std::fs::write(
        &adaptation_path,
        r#"{"Component.UI": "Web UI", "Application.Name": "Hiring"}"#,
    )
    .unwrap();

    let seed_path = temp_dir.path().join("seed.json");
    write_snapshot(&seed_path, &seeded_db().snapshot())
        .await
        .unwrap();

    let config_path = temp_dir.path().join("persistence.json");
    let mut file = std::fs::File::create(&config_path).unwrap();
    write!(
        file,
        r#"{{
            "backend": "simple_db",
            "roles": ["administrator", "recruiter"],
            "adaptation": {{"source": "json_file", "path": {:?}}},
            "seed_path": {:?}
        }}"#,
        adaptation_path, seed_path
    )
    .unwrap();

    let config = PersistenceConfig::from_file(&config_path).unwrap();
    let db = SimpleDB::from_config(&config).await.unwrap();

    assert_eq!(
        db.find_roles().await,
        vec!["administrator".to_string(), "recruiter".to_string()]
    );
    assert_eq!(db.property("Component.UI").unwrap(), "Web UI");
    assert!(db.property("Component.Persistence").is_err());
    assert_eq!(db.find_credentials_by_name("bob").await.unwrap().account_id, "u1");
    assert_eq!(db.list_jobs("Acme").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_inline_adaptation_is_returned_verbatim() {
    let mut pairs = BTreeMap::new();
    pairs.insert("Greeting".to_string(), "  Hello, World!  ".to_string());
    let config = PersistenceConfig {
        adaptation: AdaptationSource::Inline { pairs },
        ..Default::default()
    };

    let db = SimpleDB::from_config(&config).await.unwrap();
    assert_eq!(db.property("Greeting").unwrap(), "  Hello, World!  ");
}

#[tokio::test]
async fn test_missing_seed_file_fails_construction() {
    let config = PersistenceConfig {
        seed_path: Some("/nonexistent/seed.json".into()),
        ..Default::default()
    };
    let result = SimpleDB::from_config(&config).await;
    assert!(matches!(result, Err(PersistenceError::Io(_))));
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let result = PersistenceConfig::from_str(r#"{"roles": []}"#);
    assert!(matches!(result, Err(PersistenceError::Config(_))));

    let config = PersistenceConfig {
        roles: vec!["a".to_string(), "a".to_string()],
        ..Default::default()
    };
    assert!(SimpleDB::from_config(&config).await.is_err());
}

#[tokio::test]
async fn test_exported_snapshot_matches_memory() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("export.json");

    let db = seeded_db();
    db.set_username("u1", "robert").await.unwrap();
    write_snapshot(&path, &db.snapshot()).await.unwrap();

    let exported = read_snapshot(&path).await.unwrap();
    assert_eq!(exported, db.snapshot());
    assert_eq!(exported.accounts[0].user_name, "robert");
}

#[cfg(unix)]
#[tokio::test]
async fn test_environment_source_tolerates_non_utf8_variables() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    // SAFETY: no other test in this binary reads or writes these variables.
    unsafe {
        std::env::set_var("RECRUITER_ENVTEST_Component.UI", "Terminal UI");
        std::env::set_var("RECRUITER_ENVTEST_BLOB", OsStr::from_bytes(&[0x66, 0xff, 0x6f]));
    }

    let config = PersistenceConfig {
        adaptation: AdaptationSource::Environment {
            prefix: "RECRUITER_ENVTEST_".to_string(),
        },
        ..Default::default()
    };
    let result = SimpleDB::from_config(&config).await;

    unsafe {
        std::env::remove_var("RECRUITER_ENVTEST_Component.UI");
        std::env::remove_var("RECRUITER_ENVTEST_BLOB");
    }

    let db = result.unwrap();
    assert_eq!(db.property("Component.UI").unwrap(), "Terminal UI");
    assert!(db.property("BLOB").is_err());
}
