//! Access control mechanisms guarding privileged registry operations.
//!
//! The registry never hardcodes who may administer it. It asks an
//! [`Authorizer`] instead, so any capability check can be plugged in, be it
//! a single owner ([`Ownable`]) or a plain closure.
use alloy_primitives::Address;

pub mod ownable;

pub use ownable::{Error as OwnableError, Ownable};

/// Capability check consulted before every privileged operation.
pub trait Authorizer {
    /// Returns `true` if `account` may perform privileged operations.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the authorizer's state.
    /// * `account` - The account that originated the call.
    fn is_authorized(&self, account: Address) -> bool;
}

impl<F> Authorizer for F
where
    F: Fn(Address) -> bool,
{
    fn is_authorized(&self, account: Address) -> bool {
        self(account)
    }
}
