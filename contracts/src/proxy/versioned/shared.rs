//! Shared handle to a [`VersionRegistry`] that stays consistent under
//! re-entrant calls.
//!
//! Every operation is a transaction. Transactions are serialized by a
//! re-entrant transaction lock, so a call coming back into the proxy from the
//! implementation currently being dispatched (same thread) proceeds, while
//! calls from other threads wait for the outer transaction to finish.
//!
//! Dispatch snapshots the registry before handing the call to the
//! implementation and releases the registry lock while it runs. The
//! implementation may call back into the proxy; its changes are kept if it
//! returns successfully and are rolled back, events included, if it reverts.
//!
//! The transaction lock is held for the whole dispatch. An executor that
//! calls back into the proxy from a different thread and waits for it
//! deadlocks.
use std::sync::Arc;

use alloy_primitives::{Address, LogData, B256};
use alloy_sol_types::SolEvent;
use parking_lot::{ReentrantMutex, RwLock};

use super::{delegate, Error, VersionRegistry};
use crate::{
    access::Authorizer,
    proxy::Executor,
    utils::{context::Msg, events::EventLog},
};

/// Cloneable, thread-safe handle to a [`VersionRegistry`].
///
/// Clones share the same registry.
#[derive(Debug)]
pub struct VersionedProxy<A> {
    registry: Arc<RwLock<VersionRegistry<A>>>,
    /// Serializes transactions, re-entrant for the thread running one.
    transaction: Arc<ReentrantMutex<()>>,
}

impl<A> Clone for VersionedProxy<A> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            transaction: Arc::clone(&self.transaction),
        }
    }
}

impl<A: Authorizer> From<VersionRegistry<A>> for VersionedProxy<A> {
    fn from(registry: VersionRegistry<A>) -> Self {
        Self::new(registry)
    }
}

impl<A: Authorizer> VersionedProxy<A> {
    /// Wraps `registry` in a shared handle.
    #[must_use]
    pub fn new(registry: VersionRegistry<A>) -> Self {
        Self {
            registry: Arc::new(RwLock::new(registry)),
            transaction: Arc::new(ReentrantMutex::new(())),
        }
    }

    /// See [`VersionRegistry::register_version`].
    ///
    /// # Errors
    ///
    /// Same as [`VersionRegistry::register_version`].
    pub fn register_version(
        &self,
        msg: &Msg,
        version: B256,
        implementation: Address,
    ) -> Result<(), Error> {
        let _transaction = self.transaction.lock();
        self.registry.write().register_version(msg, version, implementation)
    }

    /// See [`VersionRegistry::remove_version`].
    ///
    /// # Errors
    ///
    /// Same as [`VersionRegistry::remove_version`].
    pub fn remove_version(&self, msg: &Msg, version: B256) -> Result<(), Error> {
        let _transaction = self.transaction.lock();
        self.registry.write().remove_version(msg, version)
    }

    /// See [`VersionRegistry::set_default_version`].
    ///
    /// # Errors
    ///
    /// Same as [`VersionRegistry::set_default_version`].
    pub fn set_default_version(
        &self,
        msg: &Msg,
        version: B256,
    ) -> Result<(), Error> {
        let _transaction = self.transaction.lock();
        self.registry.write().set_default_version(msg, version)
    }

    /// See [`VersionRegistry::get_implementation`].
    ///
    /// # Errors
    ///
    /// Same as [`VersionRegistry::get_implementation`].
    pub fn get_implementation(&self, version: B256) -> Result<Address, Error> {
        self.registry.read().get_implementation(version)
    }

    /// See [`VersionRegistry::get_default_version`].
    ///
    /// # Errors
    ///
    /// Same as [`VersionRegistry::get_default_version`].
    pub fn get_default_version(&self) -> Result<B256, Error> {
        self.registry.read().get_default_version()
    }

    /// See [`VersionRegistry::get_versions`].
    #[must_use]
    pub fn get_versions(&self) -> Vec<B256> {
        self.registry.read().get_versions()
    }

    /// Runs `f` with read access to the registry.
    ///
    /// The registry lock is held while `f` runs. Calling a mutating
    /// operation of this proxy, or dispatching through it, from `f`
    /// deadlocks, and nested reads may deadlock behind a waiting writer.
    pub fn read<R>(&self, f: impl FnOnce(&VersionRegistry<A>) -> R) -> R {
        f(&self.registry.read())
    }

    /// Runs `f` with write access to the authorizer and the event log, for
    /// instance to transfer ownership.
    ///
    /// The registry lock is held exclusively while `f` runs: calling any
    /// operation of this proxy from `f`, reads included, deadlocks.
    pub fn administer<R>(
        &self,
        f: impl FnOnce(&mut A, &mut EventLog) -> R,
    ) -> R {
        let _transaction = self.transaction.lock();
        let mut registry = self.registry.write();
        let (authority, log) = registry.authority_mut();
        f(authority, log)
    }

    /// Returns a copy of every event emitted so far.
    #[must_use]
    pub fn events(&self) -> Vec<LogData> {
        self.registry.read().events().entries().to_vec()
    }

    /// Returns `true` if `expected` was emitted at any point.
    #[must_use]
    pub fn emitted<E: SolEvent>(&self, expected: &E) -> bool {
        self.registry.read().events().emitted(expected)
    }
}

impl<A: Authorizer + Clone> VersionedProxy<A> {
    /// Forwards `calldata` to the implementation of `version`.
    ///
    /// The registry is not locked while the implementation runs. Changes the
    /// implementation makes through this proxy are rolled back if it
    /// reverts.
    ///
    /// # Errors
    ///
    /// Same as [`VersionRegistry::execute_at_version`].
    pub fn execute_at_version<E: Executor + ?Sized>(
        &self,
        msg: &Msg,
        version: B256,
        calldata: &[u8],
        executor: &mut E,
    ) -> Result<Vec<u8>, Error> {
        let _transaction = self.transaction.lock();
        let (implementation, snapshot) = {
            let registry = self.registry.read();
            (registry.get_implementation(version)?, registry.clone())
        };
        self.delegate_or_rollback(
            snapshot,
            executor,
            msg,
            version,
            implementation,
            calldata,
        )
    }

    /// Forwards `calldata` to the implementation of the default version.
    ///
    /// The registry is not locked while the implementation runs. Changes the
    /// implementation makes through this proxy are rolled back if it
    /// reverts.
    ///
    /// # Errors
    ///
    /// Same as [`VersionRegistry::fallback`].
    pub fn fallback<E: Executor + ?Sized>(
        &self,
        msg: &Msg,
        calldata: &[u8],
        executor: &mut E,
    ) -> Result<Vec<u8>, Error> {
        let _transaction = self.transaction.lock();
        let (version, implementation, snapshot) = {
            let registry = self.registry.read();
            let (version, implementation) = registry.resolve_default()?;
            (version, implementation, registry.clone())
        };
        self.delegate_or_rollback(
            snapshot,
            executor,
            msg,
            version,
            implementation,
            calldata,
        )
    }

    /// Runs the implementation and restores `snapshot` if it reverted.
    ///
    /// Must be called with the transaction lock held.
    fn delegate_or_rollback<E: Executor + ?Sized>(
        &self,
        snapshot: VersionRegistry<A>,
        executor: &mut E,
        msg: &Msg,
        version: B256,
        implementation: Address,
        calldata: &[u8],
    ) -> Result<Vec<u8>, Error> {
        let result = delegate(executor, msg, version, implementation, calldata);
        if result.is_err() {
            tracing::debug!(
                %version,
                %implementation,
                "rolling back reverted dispatch"
            );
            *self.registry.write() = snapshot;
        }
        result
    }
}
