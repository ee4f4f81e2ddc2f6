/*!
# OpenZeppelin Versioned Proxy

A registry that maps version identifiers to implementation contracts and
dispatches calls to the implementation selected by the caller, falling back
to a default version when none is named.

The registry is independent of any particular execution environment. Calls to
implementations go through the [`proxy::Executor`] trait, and privileged
operations are checked against a pluggable [`access::Authorizer`].

## Usage

```rust
use alloy_primitives::{address, b256};
use openzeppelin_versioned_proxy::{
    access::ownable::Ownable,
    proxy::versioned::VersionRegistry,
    utils::context::Msg,
};

let owner = address!("A11CEacF9aa32246d767FCCD72e02d6bCbcC375d");
let implementation = address!("B0B0cB49ec2e96DF5F5fFB081acaE66A2cBBc2e2");
let v1 = b256!("0000000000000000000000000000000000000000000000000000000000000001");

let mut registry = VersionRegistry::new(Ownable::new(owner));
let msg = Msg::new(owner);

registry.register_version(&msg, v1, implementation)?;
registry.set_default_version(&msg, v1)?;

assert_eq!(registry.get_implementation(v1)?, implementation);
assert_eq!(registry.get_default_version()?, v1);
# Ok::<(), openzeppelin_versioned_proxy::proxy::versioned::Error>(())
```
*/

#![allow(clippy::module_name_repetitions)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod access;
pub mod config;
pub mod proxy;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;
