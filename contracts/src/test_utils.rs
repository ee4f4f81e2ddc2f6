//! Unit-testing utilities for the registry and its proxies.
use std::collections::HashSet;

use alloy_primitives::{address, b256, Address, B256};
use alloy_sol_types::SolValue;

use crate::{
    proxy::{CallResult, Executor},
    utils::context::Msg,
};

pub(crate) const ALICE: Address =
    address!("A11CEacF9aa32246d767FCCD72e02d6bCbcC375d");
pub(crate) const BOB: Address =
    address!("B0B0cB49ec2e96DF5F5fFB081acaE66A2cBBc2e2");

pub(crate) const IMPL_A: Address =
    address!("AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA");
pub(crate) const IMPL_B: Address =
    address!("BBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB");

pub(crate) const V1: B256 =
    b256!("0000000000000000000000000000000000000000000000000000000000000001");
pub(crate) const V2: B256 =
    b256!("0000000000000000000000000000000000000000000000000000000000000002");

/// A call observed by [`MockExecutor`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Delegation {
    pub(crate) msg: Msg,
    pub(crate) implementation: Address,
    pub(crate) calldata: Vec<u8>,
}

/// Executor whose implementations answer with their own address followed by
/// the calldata, or revert with [`revert_data`] when marked as reverting.
#[derive(Debug, Default)]
pub(crate) struct MockExecutor {
    pub(crate) delegations: Vec<Delegation>,
    reverting: HashSet<Address>,
}

impl MockExecutor {
    pub(crate) fn reverting(mut self, implementation: Address) -> Self {
        self.reverting.insert(implementation);
        self
    }
}

impl Executor for MockExecutor {
    fn delegate(
        &mut self,
        msg: &Msg,
        implementation: Address,
        calldata: &[u8],
    ) -> CallResult {
        self.delegations.push(Delegation {
            msg: *msg,
            implementation,
            calldata: calldata.to_vec(),
        });

        if self.reverting.contains(&implementation) {
            Err(revert_data(implementation))
        } else {
            Ok(echo(implementation, calldata))
        }
    }
}

/// Output of a non-reverting mock implementation.
pub(crate) fn echo(implementation: Address, calldata: &[u8]) -> Vec<u8> {
    [implementation.as_slice(), calldata].concat()
}

/// Revert data of a reverting mock implementation: `Error(string)`-like
/// payload unique to `implementation`.
pub(crate) fn revert_data(implementation: Address) -> Vec<u8> {
    format!("reverted in {implementation}").abi_encode()
}
