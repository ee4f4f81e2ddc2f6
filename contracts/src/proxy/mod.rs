//! Proxy patterns that forward calls to implementation contracts.
//!
//! The proxies in this module never execute implementation code themselves.
//! They resolve which implementation a call belongs to and hand the call over
//! to an [`Executor`], the seam to whatever environment actually runs the
//! implementation (a VM, a test double, a remote node).
use alloy_primitives::Address;

use crate::utils::context::Msg;

pub mod versioned;

/// Outcome of a call executed by an implementation: the returned bytes on
/// success, the revert data on failure.
pub type CallResult = Result<Vec<u8>, Vec<u8>>;

/// Environment able to run a call against an implementation address.
///
/// Implementations are opaque to the proxy: the executor may run arbitrary
/// code, including code that calls back into the proxy.
pub trait Executor {
    /// Forwards `calldata` to `implementation`.
    ///
    /// The sender and value of `msg` must be preserved, so the
    /// implementation observes the call as if it was made to it directly.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the execution environment.
    /// * `msg` - Context of the call being forwarded.
    /// * `implementation` - The address of the implementation contract.
    /// * `calldata` - The calldata to forward to the implementation.
    ///
    /// # Errors
    ///
    /// Returns the implementation's revert data, unmodified, if its execution
    /// failed.
    fn delegate(
        &mut self,
        msg: &Msg,
        implementation: Address,
        calldata: &[u8],
    ) -> CallResult;
}

impl<F> Executor for F
where
    F: FnMut(&Msg, Address, &[u8]) -> CallResult,
{
    fn delegate(
        &mut self,
        msg: &Msg,
        implementation: Address,
        calldata: &[u8],
    ) -> CallResult {
        self(msg, implementation, calldata)
    }
}
