//! # Recruiter Persistence
//!
//! Persistence abstraction for the recruiting platform. Every account, job,
//! and configuration read or write goes through one capability set, the
//! [`PersistenceHandler`](handler::PersistenceHandler) trait, so the rest of
//! the application never depends on a concrete storage technology.
//!
//! ## Components
//!
//! - Contract: [`handler`] defines the operations, [`error`] the failure
//!   taxonomy, [`model`] the entities.
//! - Reference backend: [`backends::SimpleDB`] keeps everything in memory.
//! - Collaborators: [`logging`] receives one diagnostic entry per operation,
//!   [`config`] supplies roles and adaptation data, [`snapshot`] seeds and
//!   exports store contents.
//! - Lifecycle: [`instance`] holds the optional process-wide handler.
//!
//! ## Example
//!
//! ```no_run
//! use recruiter_persistence::{PersistenceConfig, PersistenceHandler, SimpleDB};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PersistenceConfig::from_file("persistence.json")?;
//! let handler: Arc<dyn PersistenceHandler> = Arc::new(SimpleDB::from_config(&config).await?);
//!
//! for job in handler.list_jobs("Acme").await? {
//!     println!("{}", handler.get_job_listing_report(&job.job_id).await?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod backends;
pub mod config;
pub mod error;
pub mod handler;
pub mod instance;
pub mod logging;
pub mod model;
pub mod snapshot;

// Re-exports
pub use backends::SimpleDB;
pub use config::{AdaptationSource, BackendType, PersistenceConfig};
pub use error::{ErrorKind, PersistenceError, PersistenceResult};
pub use handler::PersistenceHandler;
pub use model::*;
