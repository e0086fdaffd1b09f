//! The persistence contract.
//!
//! `PersistenceHandler` is the single capability set through which the rest of
//! the application reads and writes account, job, and configuration data.
//! Concrete storage technologies implement it; callers depend only on the
//! trait object.
//!
//! # Usage Example
//!
//! ```no_run
//! use recruiter_persistence::handler::PersistenceHandler;
//!
//! # async fn example(handler: &dyn PersistenceHandler) -> Result<(), Box<dyn std::error::Error>> {
//! let account = handler.find_credentials_by_name("bob").await?;
//! println!("bob is {}", account.account_id);
//!
//! if !handler.remove_account("u42").await?.existed() {
//!     println!("u42 was already gone");
//! }
//!
//! let component = handler.property("Component.Persistence")?;
//! println!("persistence component: {}", component);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use chrono::NaiveDate;
use secrecy::SecretString;

use crate::error::PersistenceResult;
use crate::model::{AccountCredentials, JobCredentials, RemovalOutcome};

/// Storage operations available to upper application layers.
///
/// # Thread Safety
///
/// Implementations must be shareable between tasks and threads (`Send + Sync`).
/// Every operation is atomic with respect to the entity it touches: concurrent
/// callers never observe a partially updated record.
///
/// # Error Handling
///
/// Lookups by identity fail with the matching not-found variant of
/// [`PersistenceError`](crate::error::PersistenceError).
/// `remove_account` is the exception: it reports absence through
/// [`RemovalOutcome::NotFound`].
///
/// # Ownership
///
/// Returned entities are copies. Mutating them has no effect on the backend.
#[async_trait]
pub trait PersistenceHandler: Send + Sync {
    /// All legal role names, in a stable order without duplicates.
    async fn find_roles(&self) -> Vec<String>;

    /// Credentials of the account named `name`.
    ///
    /// # Returns
    /// * `Ok(AccountCredentials)` - The matching account
    /// * `Err(PersistenceError::NoSuchUser)` - If no account has that user name
    ///
    /// # Notes
    ///
    /// User names are not unique. When several accounts match, the one with
    /// the lowest account id is returned.
    async fn find_credentials_by_name(&self, name: &str) -> PersistenceResult<AccountCredentials>;

    /// Credentials of the account with id `account_id`.
    ///
    /// # Returns
    /// * `Ok(AccountCredentials)` - The account
    /// * `Err(PersistenceError::NoSuchUser)` - If the id is unknown
    async fn find_credentials_by_id(&self, account_id: &str)
    -> PersistenceResult<AccountCredentials>;

    /// Accounts with at least one report filed on exactly `date`.
    ///
    /// Each account appears once, ordered ascending by account id.
    async fn find_reported_users(&self, date: NaiveDate)
    -> PersistenceResult<Vec<AccountCredentials>>;

    /// Delete an account together with all of its reports.
    ///
    /// # Returns
    /// * `Ok(RemovalOutcome::Removed)` - The account existed and was deleted
    /// * `Ok(RemovalOutcome::NotFound)` - No such account; nothing changed
    async fn remove_account(&self, account_id: &str) -> PersistenceResult<RemovalOutcome>;

    /// All report bodies filed against the account, joined by newlines in
    /// filing order.
    ///
    /// # Returns
    /// * `Ok(String)` - The reports, or an empty string if there are none
    /// * `Err(PersistenceError::NoSuchUser)` - If the account does not exist
    async fn find_user_report(&self, account_id: &str) -> PersistenceResult<String>;

    /// Rename an account in place. Returns the new user name.
    async fn set_username(&self, account_id: &str, username: &str) -> PersistenceResult<String>;

    /// Replace an account's pass phrase. Returns a confirmation message that
    /// never contains the secret.
    async fn set_password(&self, account_id: &str, password: SecretString)
    -> PersistenceResult<String>;

    /// Listings whose employer equals `company`, ascending by job id.
    ///
    /// An unknown or empty company yields an empty vector, not an error.
    async fn list_jobs(&self, company: &str) -> PersistenceResult<Vec<JobCredentials>>;

    /// One-line textual summary of a listing.
    ///
    /// # Returns
    /// * `Err(PersistenceError::NoSuchJob)` - If the id is unknown
    async fn get_job_listing_report(&self, job_id: &str) -> PersistenceResult<String>;

    /// Delete a listing. Returns a confirmation message.
    ///
    /// # Returns
    /// * `Err(PersistenceError::NoSuchJob)` - If the id is unknown
    async fn remove_job_listing(&self, job_id: &str) -> PersistenceResult<String>;

    /// Read-only adaptation-data lookup.
    ///
    /// # Returns
    /// * `Ok(&str)` - The configured value, verbatim
    /// * `Err(PersistenceError::NoSuchProperty)` - If the key is absent
    fn property(&self, key: &str) -> PersistenceResult<&str>;
}
