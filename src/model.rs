//! Entities manipulated through the persistence contract.
//!
//! All entities are plain values: backends hand out clones, never references
//! into their own storage.

use chrono::NaiveDate;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Read-only configuration key/value pairs supplied at backend construction.
pub type AdaptationData = BTreeMap<String, String>;

/// Identity record of a platform account.
///
/// `user_name` is not unique; `account_id` is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountCredentials {
    pub user_name: String,

    /// Pass phrase, kept out of `Debug` output and log records.
    #[serde(
        serialize_with = "serialize_secret",
        deserialize_with = "deserialize_secret"
    )]
    pub pass_phrase: SecretString,

    /// Role names, expected to be a subset of the backend's role set.
    #[serde(default)]
    pub roles: Vec<String>,

    pub account_id: String,
}

impl AccountCredentials {
    pub fn new(
        account_id: impl Into<String>,
        user_name: impl Into<String>,
        pass_phrase: impl Into<String>,
        roles: Vec<String>,
    ) -> Self {
        Self {
            user_name: user_name.into(),
            pass_phrase: SecretString::from(pass_phrase.into()),
            roles,
            account_id: account_id.into(),
        }
    }
}

impl PartialEq for AccountCredentials {
    fn eq(&self, other: &Self) -> bool {
        self.account_id == other.account_id
            && self.user_name == other.user_name
            && self.roles == other.roles
            && self.pass_phrase.expose_secret() == other.pass_phrase.expose_secret()
    }
}

impl Eq for AccountCredentials {}

fn serialize_secret<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

fn deserialize_secret<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(SecretString::from(raw))
}

/// A complaint or review filed against an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserReport {
    pub account_id: String,
    pub report: String,
    /// Calendar date the report was filed on.
    pub filed_on: NaiveDate,
}

/// Status of a job listing.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Open,
    Closed,
    Filled,
}

/// A job listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobCredentials {
    pub employer: String,
    pub position: String,
    pub job_id: String,
    #[serde(default)]
    pub status: JobStatus,
}

impl JobCredentials {
    pub fn new(
        job_id: impl Into<String>,
        employer: impl Into<String>,
        position: impl Into<String>,
        status: JobStatus,
    ) -> Self {
        Self {
            employer: employer.into(),
            position: position.into(),
            job_id: job_id.into(),
            status,
        }
    }
}

/// Result of an account removal.
///
/// Removing an absent account is a benign no-op, reported as `NotFound`
/// rather than as a `NoSuchUser` error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalOutcome {
    Removed,
    NotFound,
}

impl RemovalOutcome {
    pub fn existed(self) -> bool {
        matches!(self, RemovalOutcome::Removed)
    }
}
