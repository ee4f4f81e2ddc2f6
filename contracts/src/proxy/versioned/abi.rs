//! Solidity interface of the versioned proxy, and the entrypoint routing raw
//! calldata either to the proxy itself or to an implementation.
//!
//! Calldata starting with the selector of an [`IVersionedProxy`] function is
//! handled by the proxy and its result is ABI encoded. Anything else,
//! including calldata too short to hold a selector, takes the fallback path
//! and is forwarded to the default version.
use alloy_primitives::Bytes;
use alloy_sol_types::{SolInterface, SolValue};
pub use interface::*;

use super::{
    Error, VersionedProxy, VersionedProxyInvalidCalldata,
    VersionedProxyNonPayable,
};
use crate::{access::Authorizer, proxy::Executor, utils::context::Msg};

mod interface {
    #![allow(missing_docs)]
    #![cfg_attr(coverage_nightly, coverage(off))]

    use alloy_sol_macro::sol;

    sol! {
        /// Versioned proxy interface.
        interface IVersionedProxy {
            function registerVersion(bytes32 version, address implementation) external;
            function removeVersion(bytes32 version) external;
            function setDefaultVersion(bytes32 version) external;
            function getImplementation(bytes32 version) external view returns (address);
            function getDefaultVersion() external view returns (bytes32);
            function getVersions() external view returns (bytes32[] memory);
            function executeAtVersion(bytes32 version, bytes calldata data) external payable returns (bytes memory);
        }
    }
}

use IVersionedProxy::IVersionedProxyCalls as Call;

impl<A: Authorizer + Clone> VersionedProxy<A> {
    /// Entrypoint of the proxy: handles `calldata` addressed to the proxy's
    /// own interface, and forwards everything else to the default version.
    ///
    /// # Arguments
    ///
    /// * `&self` - Access to the shared registry.
    /// * `msg` - Context of the current call.
    /// * `calldata` - Raw calldata received by the proxy.
    /// * `executor` - Environment running implementations.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidCalldata`] - If the selector belongs to the proxy's
    ///   interface but the arguments do not decode.
    /// * [`Error::NonPayable`] - If value is attached to any function other
    ///   than `executeAtVersion`.
    /// * Any error of the operation the call resolves to.
    pub fn route<E: Executor + ?Sized>(
        &self,
        msg: &Msg,
        calldata: &[u8],
        executor: &mut E,
    ) -> Result<Vec<u8>, Error> {
        let selector = calldata
            .get(..4)
            .and_then(|selector| <[u8; 4]>::try_from(selector).ok())
            .filter(|selector| Call::valid_selector(*selector));
        if selector.is_none() {
            return self.fallback(msg, calldata, executor);
        }

        let call = Call::abi_decode(calldata).map_err(|err| {
            tracing::debug!(%err, "malformed proxy calldata");
            Error::InvalidCalldata(VersionedProxyInvalidCalldata {})
        })?;

        if !matches!(call, Call::executeAtVersion(_)) && !msg.value.is_zero() {
            return Err(Error::NonPayable(VersionedProxyNonPayable {}));
        }

        match call {
            Call::registerVersion(call) => {
                self.register_version(msg, call.version, call.implementation)?;
                Ok(Vec::new())
            }
            Call::removeVersion(call) => {
                self.remove_version(msg, call.version)?;
                Ok(Vec::new())
            }
            Call::setDefaultVersion(call) => {
                self.set_default_version(msg, call.version)?;
                Ok(Vec::new())
            }
            Call::getImplementation(call) => {
                Ok(self.get_implementation(call.version)?.abi_encode())
            }
            Call::getDefaultVersion(_) => {
                Ok(self.get_default_version()?.abi_encode())
            }
            Call::getVersions(_) => Ok(self.get_versions().abi_encode()),
            Call::executeAtVersion(call) => {
                let output = self.execute_at_version(
                    msg,
                    call.version,
                    &call.data,
                    executor,
                )?;
                Ok(Bytes::from(output).abi_encode())
            }
        }
    }
}
