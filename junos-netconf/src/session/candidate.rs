//! RAII guard for an exclusive lock on the candidate configuration.
//!
//! The guard holds `&mut NetconfSession`, so nothing else can be sent on the
//! session while the lock is held:
//! - `unlock()` consumes the guard and releases the lock on the device
//! - `detach()` consumes the guard and leaves the lock in place
//!
//! # Example
//!
//! ```rust,no_run
//! use junos_netconf::{ConfigFormat, LoadType, SessionBuilder};
//!
//! # async fn example() -> Result<(), junos_netconf::Error> {
//! let mut session = SessionBuilder::new("192.168.1.1")
//!     .username("admin")
//!     .password("secret")
//!     .connect()
//!     .await?;
//!
//! let mut lock = session.lock_candidate().await?;
//! lock.load("set system host-name r1", ConfigFormat::Set, LoadType::Merge)
//!     .await?;
//! if lock.validate().await? {
//!     lock.commit().await?;
//! }
//! lock.unlock().await?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use log::{debug, warn};

use super::netconf::NetconfSession;
use crate::error::{Error, ProtocolError, Result};
use crate::rpc::{ConfigFormat, Datastore, LoadType};
use crate::transport::Transport;

/// Exclusive lock on the candidate datastore.
///
/// Created by [`NetconfSession::lock_candidate`]. Dropping the guard without
/// calling [`unlock`](Self::unlock) or [`detach`](Self::detach) leaves the
/// device locked until the session closes.
pub struct CandidateLock<'a, T: Transport> {
    session: &'a mut NetconfSession<T>,
    released: bool,
}

impl<'a, T: Transport> CandidateLock<'a, T> {
    pub(crate) async fn acquire(session: &'a mut NetconfSession<T>) -> Result<Self> {
        if !session.lock().await? {
            return Err(ProtocolError::LockFailed {
                reply: session.last_rpc_reply().raw().to_string(),
            }
            .into());
        }
        debug!("candidate lock acquired");
        Ok(Self {
            session,
            released: false,
        })
    }

    /// Load a configuration payload into the candidate.
    pub async fn load<L>(&mut self, configuration: &str, format: ConfigFormat, load_type: L) -> Result<()>
    where
        L: TryInto<LoadType>,
        Error: From<L::Error>,
    {
        self.session
            .edit_config(Datastore::Candidate, configuration, load_type, format)
            .await
    }

    pub async fn validate(&mut self) -> Result<bool> {
        self.session.validate().await
    }

    /// Commit the candidate. The lock stays held.
    pub async fn commit(&mut self) -> Result<()> {
        self.session.commit().await
    }

    /// Commit with automatic rollback unless confirmed within `timeout`.
    pub async fn commit_confirmed(&mut self, timeout: Duration) -> Result<()> {
        self.session.commit_confirmed(timeout).await
    }

    /// The locked session, for operations the guard doesn't wrap.
    pub fn session(&mut self) -> &mut NetconfSession<T> {
        &mut *self.session
    }

    /// Release the lock. `Ok(false)` if the device refused the unlock.
    pub async fn unlock(mut self) -> Result<bool> {
        self.released = true;
        self.session.unlock().await
    }

    /// Try to unlock, logging instead of returning any failure.
    pub(crate) async fn unlock_best_effort(mut self) {
        self.released = true;
        match self.session.unlock().await {
            Ok(true) => debug!("candidate unlocked after failure"),
            Ok(false) => warn!("candidate unlock refused after failure"),
            Err(e) => warn!("candidate unlock failed after failure: {}", e),
        }
    }

    /// Drop the guard without unlocking; the device keeps the lock.
    pub fn detach(mut self) {
        self.released = true;
    }
}

impl<T: Transport> Drop for CandidateLock<'_, T> {
    fn drop(&mut self) {
        if !self.released {
            warn!("CandidateLock dropped without unlock or detach; candidate stays locked");
        }
    }
}
