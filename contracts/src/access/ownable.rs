//! Authorizer which provides a basic access control mechanism, where there is
//! an account (an owner) that is granted exclusive access to privileged
//! operations.
//!
//! The initial owner is set when the authorizer is created. This can later be
//! changed with [`Ownable::transfer_ownership`].
use alloy_primitives::Address;
pub use sol::*;

use crate::{access::Authorizer, utils::{context::Msg, events::EventLog}};

#[cfg_attr(coverage_nightly, coverage(off))]
mod sol {
    use alloy_sol_macro::sol;

    sol! {
        /// Emitted when ownership gets transferred between accounts.
        ///
        /// * `previous_owner` - Address of the previous owner.
        /// * `new_owner` - Address of the new owner.
        #[derive(Debug, PartialEq)]
        #[allow(missing_docs)]
        event OwnershipTransferred(address indexed previous_owner, address indexed new_owner);
    }

    sol! {
        /// The caller account is not authorized to perform an operation.
        ///
        /// * `account` - Account that was found to not be authorized.
        #[derive(Debug, PartialEq)]
        #[allow(missing_docs)]
        error OwnableUnauthorizedAccount(address account);
        /// The owner is not a valid owner account. (eg. `Address::ZERO`)
        ///
        /// * `owner` - Account that's not allowed to become the owner.
        #[derive(Debug, PartialEq)]
        #[allow(missing_docs)]
        error OwnableInvalidOwner(address owner);
    }
}

/// An error that occurred in the implementation of an [`Ownable`] authorizer.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// The caller account is not authorized to perform an operation.
    #[error("account {} is not the owner", .0.account)]
    UnauthorizedAccount(OwnableUnauthorizedAccount),
    /// The owner is not a valid owner account. (eg. [`Address::ZERO`])
    #[error("account {} cannot become the owner", .0.owner)]
    InvalidOwner(OwnableInvalidOwner),
}

impl From<Error> for Vec<u8> {
    fn from(value: Error) -> Self {
        use alloy_sol_types::SolError;

        match value {
            Error::UnauthorizedAccount(e) => e.abi_encode(),
            Error::InvalidOwner(e) => e.abi_encode(),
        }
    }
}

/// State of an [`Ownable`] authorizer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Ownable {
    /// The current owner.
    owner: Address,
}

impl Ownable {
    /// Creates an authorizer owned by `initial_owner`.
    ///
    /// An [`Address::ZERO`] owner leaves the authorizer in the same state as
    /// after [`Ownable::renounce_ownership`]: no account is authorized.
    #[must_use]
    pub const fn new(initial_owner: Address) -> Self {
        Self { owner: initial_owner }
    }

    /// Returns the address of the current owner.
    #[must_use]
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Transfers ownership to a new account (`new_owner`). Can only be called
    /// by the current owner.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the authorizer's state.
    /// * `msg` - Context of the current call.
    /// * `new_owner` - The next owner.
    /// * `log` - Log the ownership event is written to.
    ///
    /// # Errors
    ///
    /// * [`Error::UnauthorizedAccount`] - If not called by the owner.
    /// * [`Error::InvalidOwner`] - If `new_owner` is the [`Address::ZERO`].
    ///
    /// # Events
    ///
    /// * [`OwnershipTransferred`].
    pub fn transfer_ownership(
        &mut self,
        msg: &Msg,
        new_owner: Address,
        log: &mut EventLog,
    ) -> Result<(), Error> {
        self.only_owner(msg)?;

        if new_owner.is_zero() {
            return Err(Error::InvalidOwner(OwnableInvalidOwner {
                owner: Address::ZERO,
            }));
        }

        self._transfer_ownership(new_owner, log);

        Ok(())
    }

    /// Leaves the registry without owner. It will not be possible to call
    /// privileged operations anymore. Can only be called by the current
    /// owner.
    ///
    /// # Errors
    ///
    /// * [`Error::UnauthorizedAccount`] - If not called by the owner.
    ///
    /// # Events
    ///
    /// * [`OwnershipTransferred`].
    pub fn renounce_ownership(
        &mut self,
        msg: &Msg,
        log: &mut EventLog,
    ) -> Result<(), Error> {
        self.only_owner(msg)?;
        self._transfer_ownership(Address::ZERO, log);
        Ok(())
    }

    /// Checks if `msg.sender` is set as the owner.
    ///
    /// # Errors
    ///
    /// * [`Error::UnauthorizedAccount`] - If called by any account other than
    ///   the owner.
    pub fn only_owner(&self, msg: &Msg) -> Result<(), Error> {
        let account = msg.sender;
        if self.owner != account || account.is_zero() {
            return Err(Error::UnauthorizedAccount(
                OwnableUnauthorizedAccount { account },
            ));
        }

        Ok(())
    }

    /// Transfers ownership to a new account (`new_owner`).
    /// Internal function without access restriction.
    ///
    /// # Events
    ///
    /// * [`OwnershipTransferred`].
    pub fn _transfer_ownership(&mut self, new_owner: Address, log: &mut EventLog) {
        let previous_owner = self.owner;
        self.owner = new_owner;
        tracing::info!(%previous_owner, %new_owner, "ownership transferred");
        log.emit(&OwnershipTransferred { previous_owner, new_owner });
    }
}

impl Authorizer for Ownable {
    fn is_authorized(&self, account: Address) -> bool {
        !account.is_zero() && self.owner == account
    }
}
