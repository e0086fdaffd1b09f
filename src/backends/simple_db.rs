//! In-memory reference backend.
//!
//! `SimpleDB` satisfies the full [`PersistenceHandler`] contract using
//! process-local maps and no external I/O beyond the optional seed file read
//! at construction.

use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use secrecy::SecretString;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{
    PersistenceConfig, bundled_adaptation_data, default_roles, validate_roles,
};
use crate::error::{PersistenceError, PersistenceResult};
use crate::handler::PersistenceHandler;
use crate::logging::{LogEntry, Operation, Outcome, PersistenceLogger, TracingLogger};
use crate::model::{
    AccountCredentials, AdaptationData, JobCredentials, JobStatus, RemovalOutcome, UserReport,
};
use crate::snapshot::{StoreSnapshot, read_snapshot};

/// An account together with the reports filed against it.
///
/// Keeping both in one map entry makes account removal cascade to the
/// reports in a single atomic step.
#[derive(Debug, Clone)]
struct AccountRecord {
    credentials: AccountCredentials,
    reports: Vec<UserReport>,
}

/// In-memory persistence backend
///
/// Accounts (with their reports) and job listings are stored in separate
/// `DashMap`s keyed by id. Roles and adaptation data are fixed at
/// construction and shared read-only.
///
/// # Thread Safety
///
/// DashMap shard locks make every operation atomic for the entity it
/// touches. No method holds a map reference while touching another entry.
///
/// # Performance Characteristics
///
/// - Lookups by id, removals, and renames: O(1) average
/// - Lookups by user name, employer, or report date: O(n) scans
///
/// The name and employer scans are the first candidates for a secondary
/// index if the data set grows.
pub struct SimpleDB {
    accounts: Arc<DashMap<String, AccountRecord>>,
    jobs: Arc<DashMap<String, JobCredentials>>,
    roles: Arc<Vec<String>>,
    adaptation: Arc<AdaptationData>,
    logger: Arc<dyn PersistenceLogger>,
}

impl SimpleDB {
    /// Empty store with the default role set and the bundled adaptation data.
    pub fn new() -> Self {
        Self::build(default_roles(), bundled_adaptation_data())
    }

    /// Empty store with an explicit role set and adaptation data.
    pub fn with_data(roles: Vec<String>, adaptation: AdaptationData) -> PersistenceResult<Self> {
        validate_roles(&roles)?;
        Ok(Self::build(roles, adaptation))
    }

    /// Build a store from configuration, loading adaptation data and the
    /// optional seed snapshot.
    pub async fn from_config(config: &PersistenceConfig) -> PersistenceResult<Self> {
        config.validate()?;
        let adaptation = config.adaptation.load().await?;
        let db = Self::build(config.roles.clone(), adaptation);

        if let Some(seed_path) = &config.seed_path {
            let snapshot = read_snapshot(seed_path).await?;
            db.seed(snapshot)?;
        }

        info!(
            "{} backend ready: {} roles, {} properties, {} accounts, {} jobs",
            config.backend,
            db.roles.len(),
            db.adaptation.len(),
            db.accounts.len(),
            db.jobs.len()
        );
        Ok(db)
    }

    fn build(roles: Vec<String>, adaptation: AdaptationData) -> Self {
        Self {
            accounts: Arc::new(DashMap::new()),
            jobs: Arc::new(DashMap::new()),
            roles: Arc::new(roles),
            adaptation: Arc::new(adaptation),
            logger: Arc::new(TracingLogger),
        }
    }

    /// Replace the logging collaborator.
    pub fn with_logger(mut self, logger: Arc<dyn PersistenceLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Load every entity of `snapshot`.
    ///
    /// The whole snapshot is checked first, so a rejected snapshot leaves the
    /// store untouched (barring concurrent writers).
    pub fn seed(&self, snapshot: StoreSnapshot) -> PersistenceResult<()> {
        let mut account_ids = HashSet::new();
        for account in &snapshot.accounts {
            if self.accounts.contains_key(&account.account_id)
                || !account_ids.insert(account.account_id.as_str())
            {
                return Err(PersistenceError::DuplicateEntity(
                    "account".to_string(),
                    account.account_id.clone(),
                ));
            }
        }

        let mut job_ids = HashSet::new();
        for job in &snapshot.jobs {
            if self.jobs.contains_key(&job.job_id) || !job_ids.insert(job.job_id.as_str()) {
                return Err(PersistenceError::DuplicateEntity(
                    "job listing".to_string(),
                    job.job_id.clone(),
                ));
            }
        }

        for report in &snapshot.reports {
            if !account_ids.contains(report.account_id.as_str())
                && !self.accounts.contains_key(&report.account_id)
            {
                return Err(PersistenceError::NoSuchUser(report.account_id.clone()));
            }
        }

        let (accounts, reports, jobs) = (
            snapshot.accounts.len(),
            snapshot.reports.len(),
            snapshot.jobs.len(),
        );
        for account in snapshot.accounts {
            self.insert_account(account)?;
        }
        for job in snapshot.jobs {
            self.insert_job(job)?;
        }
        for report in snapshot.reports {
            self.file_report(report)?;
        }

        debug!(
            "Seeded {} accounts, {} reports, {} jobs",
            accounts, reports, jobs
        );
        Ok(())
    }

    /// Store a new account. The account id must not be taken.
    pub fn insert_account(&self, account: AccountCredentials) -> PersistenceResult<()> {
        for role in &account.roles {
            if !self.roles.contains(role) {
                warn!(
                    "Account {} carries unknown role {}",
                    account.account_id, role
                );
            }
        }

        match self.accounts.entry(account.account_id.clone()) {
            Entry::Occupied(_) => Err(PersistenceError::DuplicateEntity(
                "account".to_string(),
                account.account_id,
            )),
            Entry::Vacant(slot) => {
                slot.insert(AccountRecord {
                    credentials: account,
                    reports: Vec::new(),
                });
                Ok(())
            }
        }
    }

    /// Store a new account under a freshly generated id.
    pub fn create_account(
        &self,
        user_name: &str,
        pass_phrase: SecretString,
        roles: Vec<String>,
    ) -> PersistenceResult<AccountCredentials> {
        let account = AccountCredentials {
            user_name: user_name.to_string(),
            pass_phrase,
            roles,
            account_id: Uuid::new_v4().to_string(),
        };
        self.insert_account(account.clone())?;
        Ok(account)
    }

    /// Attach a report to an existing account.
    pub fn file_report(&self, report: UserReport) -> PersistenceResult<()> {
        match self.accounts.get_mut(&report.account_id) {
            Some(mut record) => {
                record.reports.push(report);
                Ok(())
            }
            None => Err(PersistenceError::NoSuchUser(report.account_id)),
        }
    }

    /// Store a new job listing. The job id must not be taken.
    pub fn insert_job(&self, job: JobCredentials) -> PersistenceResult<()> {
        match self.jobs.entry(job.job_id.clone()) {
            Entry::Occupied(_) => Err(PersistenceError::DuplicateEntity(
                "job listing".to_string(),
                job.job_id,
            )),
            Entry::Vacant(slot) => {
                slot.insert(job);
                Ok(())
            }
        }
    }

    /// Change the status of a listing, returning the previous status.
    pub fn set_job_status(&self, job_id: &str, status: JobStatus) -> PersistenceResult<JobStatus> {
        match self.jobs.get_mut(job_id) {
            Some(mut job) => Ok(std::mem::replace(&mut job.status, status)),
            None => Err(PersistenceError::NoSuchJob(job_id.to_string())),
        }
    }

    /// Copy of the current contents, sorted by id.
    pub fn snapshot(&self) -> StoreSnapshot {
        let mut records: Vec<AccountRecord> =
            self.accounts.iter().map(|entry| entry.value().clone()).collect();
        records.sort_by(|a, b| a.credentials.account_id.cmp(&b.credentials.account_id));

        let mut jobs: Vec<JobCredentials> =
            self.jobs.iter().map(|entry| entry.value().clone()).collect();
        jobs.sort_by(|a, b| a.job_id.cmp(&b.job_id));

        let mut snapshot = StoreSnapshot {
            jobs,
            ..Default::default()
        };
        for record in records {
            snapshot.reports.extend(record.reports);
            snapshot.accounts.push(record.credentials);
        }
        snapshot
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    fn log<T>(&self, operation: Operation, subject: &str, result: &PersistenceResult<T>) {
        let outcome = match result {
            Ok(_) => Outcome::Success,
            Err(e) => Outcome::Failure(e.kind()),
        };
        self.logger.record(LogEntry::new(operation, subject, outcome));
    }
}

impl Default for SimpleDB {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SimpleDB {
    fn clone(&self) -> Self {
        Self {
            accounts: Arc::clone(&self.accounts),
            jobs: Arc::clone(&self.jobs),
            roles: Arc::clone(&self.roles),
            adaptation: Arc::clone(&self.adaptation),
            logger: Arc::clone(&self.logger),
        }
    }
}

#[async_trait]
impl PersistenceHandler for SimpleDB {
    async fn find_roles(&self) -> Vec<String> {
        let roles = self.roles.as_ref().clone();
        self.logger
            .record(LogEntry::new(Operation::FindRoles, "", Outcome::Success));
        roles
    }

    async fn find_credentials_by_name(&self, name: &str) -> PersistenceResult<AccountCredentials> {
        let result = self
            .accounts
            .iter()
            .filter(|entry| entry.credentials.user_name == name)
            .map(|entry| entry.credentials.clone())
            .min_by(|a, b| a.account_id.cmp(&b.account_id))
            .ok_or_else(|| PersistenceError::NoSuchUser(name.to_string()));
        self.log(Operation::FindCredentialsByName, name, &result);
        result
    }

    async fn find_credentials_by_id(
        &self,
        account_id: &str,
    ) -> PersistenceResult<AccountCredentials> {
        let result = self
            .accounts
            .get(account_id)
            .map(|record| record.credentials.clone())
            .ok_or_else(|| PersistenceError::NoSuchUser(account_id.to_string()));
        self.log(Operation::FindCredentialsById, account_id, &result);
        result
    }

    async fn find_reported_users(
        &self,
        date: NaiveDate,
    ) -> PersistenceResult<Vec<AccountCredentials>> {
        let mut reported: Vec<AccountCredentials> = self
            .accounts
            .iter()
            .filter(|entry| entry.reports.iter().any(|r| r.filed_on == date))
            .map(|entry| entry.credentials.clone())
            .collect();
        reported.sort_by(|a, b| a.account_id.cmp(&b.account_id));

        let result: PersistenceResult<_> = Ok(reported);
        self.log(Operation::FindReportedUsers, &date.to_string(), &result);
        result
    }

    async fn remove_account(&self, account_id: &str) -> PersistenceResult<RemovalOutcome> {
        let outcome = match self.accounts.remove(account_id) {
            Some(_) => RemovalOutcome::Removed,
            None => RemovalOutcome::NotFound,
        };
        let logged = if outcome.existed() {
            Outcome::Success
        } else {
            Outcome::Absent
        };
        self.logger
            .record(LogEntry::new(Operation::RemoveAccount, account_id, logged));
        Ok(outcome)
    }

    async fn find_user_report(&self, account_id: &str) -> PersistenceResult<String> {
        let result = self
            .accounts
            .get(account_id)
            .map(|record| {
                record
                    .reports
                    .iter()
                    .map(|r| r.report.as_str())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .ok_or_else(|| PersistenceError::NoSuchUser(account_id.to_string()));
        self.log(Operation::FindUserReport, account_id, &result);
        result
    }

    async fn set_username(&self, account_id: &str, username: &str) -> PersistenceResult<String> {
        let result = match self.accounts.get_mut(account_id) {
            Some(mut record) => {
                record.credentials.user_name = username.to_string();
                Ok(username.to_string())
            }
            None => Err(PersistenceError::NoSuchUser(account_id.to_string())),
        };
        self.log(Operation::SetUsername, account_id, &result);
        result
    }

    async fn set_password(
        &self,
        account_id: &str,
        password: SecretString,
    ) -> PersistenceResult<String> {
        let result = match self.accounts.get_mut(account_id) {
            Some(mut record) => {
                record.credentials.pass_phrase = password;
                Ok(format!("Password updated for account {}", account_id))
            }
            None => Err(PersistenceError::NoSuchUser(account_id.to_string())),
        };
        self.log(Operation::SetPassword, account_id, &result);
        result
    }

    async fn list_jobs(&self, company: &str) -> PersistenceResult<Vec<JobCredentials>> {
        let mut jobs: Vec<JobCredentials> = if company.is_empty() {
            Vec::new()
        } else {
            self.jobs
                .iter()
                .filter(|entry| entry.employer == company)
                .map(|entry| entry.value().clone())
                .collect()
        };
        jobs.sort_by(|a, b| a.job_id.cmp(&b.job_id));

        let result: PersistenceResult<_> = Ok(jobs);
        self.log(Operation::ListJobs, company, &result);
        result
    }

    async fn get_job_listing_report(&self, job_id: &str) -> PersistenceResult<String> {
        let result = self
            .jobs
            .get(job_id)
            .map(|job| {
                format!(
                    "{}: {} at {} [{}]",
                    job.job_id, job.position, job.employer, job.status
                )
            })
            .ok_or_else(|| PersistenceError::NoSuchJob(job_id.to_string()));
        self.log(Operation::GetJobListingReport, job_id, &result);
        result
    }

    async fn remove_job_listing(&self, job_id: &str) -> PersistenceResult<String> {
        let result = match self.jobs.remove(job_id) {
            Some(_) => Ok(format!("Job listing {} removed", job_id)),
            None => Err(PersistenceError::NoSuchJob(job_id.to_string())),
        };
        self.log(Operation::RemoveJobListing, job_id, &result);
        result
    }

    fn property(&self, key: &str) -> PersistenceResult<&str> {
        let result = self
            .adaptation
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| PersistenceError::NoSuchProperty(key.to_string()));
        self.log(Operation::Property, key, &result);
        result
    }
}
