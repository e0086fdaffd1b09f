//! Process-wide persistence handler.
//!
//! Prefer passing an `Arc<dyn PersistenceHandler>` explicitly. This module
//! exists for callers that cannot: it holds at most one live handler,
//! installed with [`initialize`] or built lazily on the first [`instance`]
//! call, and released with [`shutdown`].
//!
//! Lazy construction happens under the write lock, so concurrent first calls
//! still build exactly one backend.

use lazy_static::lazy_static;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

use crate::backends::SimpleDB;
use crate::error::{PersistenceError, PersistenceResult};
use crate::handler::PersistenceHandler;

lazy_static! {
    static ref INSTANCE: RwLock<Option<Arc<dyn PersistenceHandler>>> = RwLock::new(None);
}

/// Install `handler` as the process-wide instance.
///
/// Fails if a handler is already installed; call [`shutdown`] first to
/// replace it.
pub fn initialize(handler: Arc<dyn PersistenceHandler>) -> PersistenceResult<()> {
    let mut slot = INSTANCE
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if slot.is_some() {
        return Err(PersistenceError::config(
            "Persistence handler already initialized",
        ));
    }
    *slot = Some(handler);
    info!("Persistence handler installed");
    Ok(())
}

/// The process-wide handler, building a default `SimpleDB` on first use.
pub fn instance() -> Arc<dyn PersistenceHandler> {
    if let Some(handler) = INSTANCE
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .as_ref()
    {
        return Arc::clone(handler);
    }

    let mut slot = INSTANCE
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let handler = slot.get_or_insert_with(|| {
        debug!("Building default SimpleDB persistence handler");
        Arc::new(SimpleDB::new())
    });
    Arc::clone(handler)
}

pub fn is_initialized() -> bool {
    INSTANCE
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .is_some()
}

/// Release the process-wide handler.
///
/// Storage is freed once the last outstanding `Arc` is dropped. Returns
/// whether a handler was installed.
pub fn shutdown() -> bool {
    let released = INSTANCE
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .take();
    if released.is_some() {
        info!("Persistence handler released");
    }
    released.is_some()
}
