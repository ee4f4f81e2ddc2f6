//! A proxy that keeps several implementations side by side, each under its
//! own version identifier, and forwards calls to the one the caller selects.
//!
//! Callers either name a version explicitly through
//! [`VersionRegistry::execute_at_version`] or let the registry pick its
//! default version through [`VersionRegistry::fallback`].
//!
//! Registering and removing versions and changing the default version are
//! privileged operations, checked against the registry's [`Authorizer`].
//!
//! Removing the version currently used as default does not touch the default
//! pointer. The registry keeps returning it from
//! [`VersionRegistry::get_default_version`], and the fallback dispatch fails
//! with [`Error::VersionNotFound`] until a new default is set or the version
//! is registered again.
use std::collections::HashMap;

use alloy_primitives::{Address, B256};
pub use sol::*;

use crate::{
    access::Authorizer,
    config::{Config, RemovalPolicy, ZeroVersionPolicy},
    proxy::Executor,
    utils::{context::Msg, events::EventLog, structs::EnumerableSet},
};

pub mod abi;
pub mod shared;

pub use shared::VersionedProxy;

#[cfg_attr(coverage_nightly, coverage(off))]
mod sol {
    use alloy_sol_macro::sol;

    sol! {
        /// Emitted when `version` is registered or re-registered to point at
        /// `implementation`.
        ///
        /// * `version` - The version identifier.
        /// * `implementation` - Address of the implementation contract.
        #[derive(Debug, PartialEq)]
        #[allow(missing_docs)]
        event VersionRegistered(bytes32 indexed version, address indexed implementation);

        /// Emitted when `version` is removed from the registry.
        ///
        /// * `version` - The version identifier.
        #[derive(Debug, PartialEq)]
        #[allow(missing_docs)]
        event VersionRemoved(bytes32 indexed version);

        /// Emitted when the default version changes.
        ///
        /// * `previous_version` - The former default version, zero if it was
        ///   never set.
        /// * `new_version` - The new default version.
        ///
        /// When the zero version may be registered, a zero
        /// `previous_version` is ambiguous: it means either that no default
        /// was set or that the default was the zero version. Only the first
        /// `DefaultVersionChanged` ever emitted reports an unset default, so
        /// consumers tell the two apart by order, or by following
        /// `new_version` of the preceding event.
        #[derive(Debug, PartialEq)]
        #[allow(missing_docs)]
        event DefaultVersionChanged(bytes32 indexed previous_version, bytes32 indexed new_version);
    }

    sol! {
        /// The caller account is not authorized to perform an operation.
        ///
        /// * `account` - Account that was found to not be authorized.
        #[derive(Debug, PartialEq)]
        #[allow(missing_docs)]
        error VersionedProxyUnauthorizedAccount(address account);

        /// The `version` is not registered.
        ///
        /// * `version` - The unknown version identifier.
        #[derive(Debug, PartialEq)]
        #[allow(missing_docs)]
        error VersionedProxyVersionNotFound(bytes32 version);

        /// A default version was needed before one was ever set.
        #[derive(Debug, PartialEq)]
        #[allow(missing_docs)]
        error VersionedProxyDefaultVersionUnset();

        /// The `implementation` cannot be registered. (eg. `Address::ZERO`)
        ///
        /// * `implementation` - Address of the invalid implementation.
        #[derive(Debug, PartialEq)]
        #[allow(missing_docs)]
        error VersionedProxyInvalidImplementation(address implementation);

        /// The `version` identifier cannot be registered.
        ///
        /// * `version` - The rejected version identifier.
        #[derive(Debug, PartialEq)]
        #[allow(missing_docs)]
        error VersionedProxyInvalidVersion(bytes32 version);

        /// Calldata addressed to the proxy's own interface could not be
        /// decoded.
        #[derive(Debug, PartialEq)]
        #[allow(missing_docs)]
        error VersionedProxyInvalidCalldata();

        /// A non-payable function of the proxy received value that would be
        /// stuck in the proxy.
        #[derive(Debug, PartialEq)]
        #[allow(missing_docs)]
        error VersionedProxyNonPayable();
    }
}

/// An error that occurred in the implementation of a [`VersionRegistry`].
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// The caller account is not authorized to perform an operation.
    #[error("account {} is not authorized", .0.account)]
    UnauthorizedAccount(VersionedProxyUnauthorizedAccount),
    /// The version is not registered.
    #[error("version {} is not registered", .0.version)]
    VersionNotFound(VersionedProxyVersionNotFound),
    /// The default version was never set.
    #[error("default version is not set")]
    DefaultVersionUnset(VersionedProxyDefaultVersionUnset),
    /// The implementation address cannot be registered.
    #[error("implementation {} is invalid", .0.implementation)]
    InvalidImplementation(VersionedProxyInvalidImplementation),
    /// The version identifier cannot be registered.
    #[error("version {} is invalid", .0.version)]
    InvalidVersion(VersionedProxyInvalidVersion),
    /// Calldata for the proxy's interface could not be decoded.
    #[error("calldata could not be decoded")]
    InvalidCalldata(VersionedProxyInvalidCalldata),
    /// Value was sent to a non-payable function.
    #[error("function is not payable")]
    NonPayable(VersionedProxyNonPayable),
    /// The implementation reverted. Holds its revert data verbatim.
    #[error("implementation reverted with {} bytes of data", .0.len())]
    CalleeFailure(Vec<u8>),
}

impl Error {
    pub(crate) fn version_not_found(version: B256) -> Self {
        Error::VersionNotFound(VersionedProxyVersionNotFound { version })
    }
}

/// Revert data of the error: the custom error ABI encoding for registry
/// errors, and the implementation's own revert data for
/// [`Error::CalleeFailure`].
impl From<Error> for Vec<u8> {
    fn from(value: Error) -> Self {
        use alloy_sol_types::SolError;

        match value {
            Error::UnauthorizedAccount(e) => e.abi_encode(),
            Error::VersionNotFound(e) => e.abi_encode(),
            Error::DefaultVersionUnset(e) => e.abi_encode(),
            Error::InvalidImplementation(e) => e.abi_encode(),
            Error::InvalidVersion(e) => e.abi_encode(),
            Error::InvalidCalldata(e) => e.abi_encode(),
            Error::NonPayable(e) => e.abi_encode(),
            Error::CalleeFailure(data) => data,
        }
    }
}

/// State of a [`VersionRegistry`].
#[derive(Clone, Debug)]
pub struct VersionRegistry<A> {
    /// Capability check for privileged operations.
    authority: A,
    /// Behavior switches.
    config: Config,
    /// Version identifier -> implementation address.
    implementations: HashMap<B256, Address>,
    /// Registered version identifiers, in enumeration order.
    versions: EnumerableSet<B256>,
    /// The version used when a call names none.
    default_version: Option<B256>,
    /// Emitted events.
    events: EventLog,
}

impl<A: Authorizer> VersionRegistry<A> {
    /// Creates an empty registry administered by `authority`.
    #[must_use]
    pub fn new(authority: A) -> Self {
        Self::with_config(authority, Config::default())
    }

    /// Creates an empty registry administered by `authority` and behaving as
    /// described by `config`.
    #[must_use]
    pub fn with_config(authority: A, config: Config) -> Self {
        Self {
            authority,
            config,
            implementations: HashMap::new(),
            versions: EnumerableSet::default(),
            default_version: None,
            events: EventLog::new(),
        }
    }

    /// Registers `version` to point at `implementation`, replacing any
    /// previous implementation of that version.
    ///
    /// Several versions may point at the same implementation.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the registry's state.
    /// * `msg` - Context of the current call.
    /// * `version` - The version identifier.
    /// * `implementation` - Address of the implementation contract.
    ///
    /// # Errors
    ///
    /// * [`Error::UnauthorizedAccount`] - If `msg.sender` is not authorized.
    /// * [`Error::InvalidImplementation`] - If `implementation` is
    ///   [`Address::ZERO`].
    /// * [`Error::InvalidVersion`] - If `version` is zero and the registry is
    ///   configured with [`ZeroVersionPolicy::Reject`].
    ///
    /// # Events
    ///
    /// * [`VersionRegistered`].
    pub fn register_version(
        &mut self,
        msg: &Msg,
        version: B256,
        implementation: Address,
    ) -> Result<(), Error> {
        self.only_authorized(msg)?;

        if implementation.is_zero() {
            return Err(Error::InvalidImplementation(
                VersionedProxyInvalidImplementation { implementation },
            ));
        }

        if version.is_zero()
            && self.config.zero_version == ZeroVersionPolicy::Reject
        {
            return Err(Error::InvalidVersion(VersionedProxyInvalidVersion {
                version,
            }));
        }

        let previous = self.implementations.insert(version, implementation);
        self.versions.add(version);

        tracing::info!(%version, %implementation, ?previous, "version registered");
        self.events.emit(&VersionRegistered { version, implementation });

        Ok(())
    }

    /// Removes `version` from the registry.
    ///
    /// The default version is left untouched, even if it is `version`.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the registry's state.
    /// * `msg` - Context of the current call.
    /// * `version` - The version identifier.
    ///
    /// # Errors
    ///
    /// * [`Error::UnauthorizedAccount`] - If `msg.sender` is not authorized.
    /// * [`Error::VersionNotFound`] - If `version` is not registered and the
    ///   registry is configured with [`RemovalPolicy::Strict`].
    ///
    /// # Events
    ///
    /// * [`VersionRemoved`] - If `version` was registered.
    pub fn remove_version(
        &mut self,
        msg: &Msg,
        version: B256,
    ) -> Result<(), Error> {
        self.only_authorized(msg)?;

        if self.implementations.remove(&version).is_none() {
            return match self.config.removal {
                RemovalPolicy::Lenient => {
                    tracing::debug!(%version, "removal of unknown version ignored");
                    Ok(())
                }
                RemovalPolicy::Strict => Err(Error::version_not_found(version)),
            };
        }

        self.versions.remove(version);

        if self.default_version == Some(version) {
            tracing::warn!(%version, "removed version is still the default");
        }
        tracing::info!(%version, "version removed");
        self.events.emit(&VersionRemoved { version });

        Ok(())
    }

    /// Makes `version` the default version, used by
    /// [`VersionRegistry::fallback`].
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the registry's state.
    /// * `msg` - Context of the current call.
    /// * `version` - The version identifier.
    ///
    /// # Errors
    ///
    /// * [`Error::UnauthorizedAccount`] - If `msg.sender` is not authorized.
    /// * [`Error::VersionNotFound`] - If `version` is not registered.
    ///
    /// # Events
    ///
    /// * [`DefaultVersionChanged`].
    pub fn set_default_version(
        &mut self,
        msg: &Msg,
        version: B256,
    ) -> Result<(), Error> {
        self.only_authorized(msg)?;

        if !self.has_version(version) {
            return Err(Error::version_not_found(version));
        }

        let previous_version =
            self.default_version.replace(version).unwrap_or_default();

        tracing::info!(%previous_version, new_version = %version, "default version changed");
        self.events.emit(&DefaultVersionChanged {
            previous_version,
            new_version: version,
        });

        Ok(())
    }

    /// Returns the implementation registered for `version`.
    ///
    /// # Errors
    ///
    /// * [`Error::VersionNotFound`] - If `version` is not registered.
    pub fn get_implementation(&self, version: B256) -> Result<Address, Error> {
        self.implementations
            .get(&version)
            .copied()
            .ok_or_else(|| Error::version_not_found(version))
    }

    /// Returns the default version.
    ///
    /// The returned version may have been removed since it was made the
    /// default.
    ///
    /// # Errors
    ///
    /// * [`Error::DefaultVersionUnset`] - If no default version was ever set.
    pub fn get_default_version(&self) -> Result<B256, Error> {
        self.default_version.ok_or(Error::DefaultVersionUnset(
            VersionedProxyDefaultVersionUnset {},
        ))
    }

    /// Returns every registered version identifier.
    ///
    /// Versions come in registration order until one is removed, at which
    /// point the last version takes the place of the removed one. The order
    /// is stable as long as the registry is not mutated.
    #[must_use]
    pub fn get_versions(&self) -> Vec<B256> {
        self.versions.values()
    }

    /// Returns `true` if `version` is registered.
    #[must_use]
    pub fn has_version(&self, version: B256) -> bool {
        self.implementations.contains_key(&version)
    }

    /// Returns the number of registered versions.
    #[must_use]
    pub fn version_count(&self) -> usize {
        self.versions.length()
    }

    /// Returns `true` once a default version has been set.
    #[must_use]
    pub fn is_default_configured(&self) -> bool {
        self.default_version.is_some()
    }

    /// Forwards `calldata` to the implementation of `version` and returns its
    /// output unmodified.
    ///
    /// The executor is never invoked if `version` is not registered.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the registry's state.
    /// * `msg` - Context of the current call, forwarded with its value.
    /// * `version` - The version identifier.
    /// * `calldata` - The calldata to forward to the implementation.
    /// * `executor` - Environment running the implementation.
    ///
    /// # Errors
    ///
    /// * [`Error::VersionNotFound`] - If `version` is not registered.
    /// * [`Error::CalleeFailure`] - If the implementation reverted. Holds the
    ///   implementation's revert data.
    pub fn execute_at_version<E: Executor + ?Sized>(
        &self,
        msg: &Msg,
        version: B256,
        calldata: &[u8],
        executor: &mut E,
    ) -> Result<Vec<u8>, Error> {
        let implementation = self.get_implementation(version)?;
        delegate(executor, msg, version, implementation, calldata)
    }

    /// Forwards `calldata` to the implementation of the default version.
    ///
    /// Behaves as [`VersionRegistry::execute_at_version`] called with the
    /// default version.
    ///
    /// # Errors
    ///
    /// * [`Error::DefaultVersionUnset`] - If no default version was ever set.
    /// * [`Error::VersionNotFound`] - If the default version was removed.
    /// * [`Error::CalleeFailure`] - If the implementation reverted.
    pub fn fallback<E: Executor + ?Sized>(
        &self,
        msg: &Msg,
        calldata: &[u8],
        executor: &mut E,
    ) -> Result<Vec<u8>, Error> {
        let (version, implementation) = self.resolve_default()?;
        delegate(executor, msg, version, implementation, calldata)
    }

    /// Returns the registry's authorizer.
    #[must_use]
    pub fn authority(&self) -> &A {
        &self.authority
    }

    /// Gives write access to the authorizer together with the registry's
    /// event log, so authority changes are recorded next to registry events.
    pub fn authority_mut(&mut self) -> (&mut A, &mut EventLog) {
        (&mut self.authority, &mut self.events)
    }

    /// Returns the registry's configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the events emitted so far.
    #[must_use]
    pub fn events(&self) -> &EventLog {
        &self.events
    }
}

impl<A: Authorizer> VersionRegistry<A> {
    /// Checks if `msg.sender` may perform privileged operations.
    ///
    /// # Errors
    ///
    /// * [`Error::UnauthorizedAccount`] - If the authorizer rejects
    ///   `msg.sender`.
    pub fn only_authorized(&self, msg: &Msg) -> Result<(), Error> {
        let account = msg.sender;
        if !self.authority.is_authorized(account) {
            tracing::warn!(%account, "unauthorized call to privileged operation");
            return Err(Error::UnauthorizedAccount(
                VersionedProxyUnauthorizedAccount { account },
            ));
        }

        Ok(())
    }

    /// Resolves the default version and its implementation.
    ///
    /// # Errors
    ///
    /// * [`Error::DefaultVersionUnset`] - If no default version was ever set.
    /// * [`Error::VersionNotFound`] - If the default version was removed.
    pub(crate) fn resolve_default(&self) -> Result<(B256, Address), Error> {
        let version = self.get_default_version()?;
        Ok((version, self.get_implementation(version)?))
    }
}

/// Hands the call over to `executor`, translating a revert into
/// [`Error::CalleeFailure`].
pub(crate) fn delegate<E: Executor + ?Sized>(
    executor: &mut E,
    msg: &Msg,
    version: B256,
    implementation: Address,
    calldata: &[u8],
) -> Result<Vec<u8>, Error> {
    tracing::debug!(%version, %implementation, value = %msg.value, "dispatching call");
    executor.delegate(msg, implementation, calldata).map_err(|data| {
        tracing::debug!(%version, %implementation, "implementation reverted");
        Error::CalleeFailure(data)
    })
}
