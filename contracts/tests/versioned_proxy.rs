use std::collections::HashMap;

use alloy_primitives::{address, b256, Address, B256};
use alloy_sol_types::SolEvent;
use openzeppelin_versioned_proxy::{
    access::Ownable,
    config::{Config, RemovalPolicy},
    proxy::{
        versioned::{
            DefaultVersionChanged, Error, VersionRegistered, VersionRegistry,
            VersionRemoved, VersionedProxy, VersionedProxyVersionNotFound,
        },
        CallResult, Executor,
    },
    utils::context::Msg,
};

const ADMIN: Address = address!("A11CEacF9aa32246d767FCCD72e02d6bCbcC375d");
const USER: Address = address!("B0B0cB49ec2e96DF5F5fFB081acaE66A2cBBc2e2");

const IMPL_A: Address = address!("AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA");
const IMPL_B: Address = address!("BBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB");

const V1: B256 =
    b256!("1111111111111111111111111111111111111111111111111111111111111111");
const V2: B256 =
    b256!("2222222222222222222222222222222222222222222222222222222222222222");

/// Deployed implementations: each answers with a fixed tag.
struct Chain {
    code: HashMap<Address, &'static [u8]>,
    calls: Vec<Address>,
}

impl Chain {
    fn new() -> Self {
        let code = HashMap::from([
            (IMPL_A, b"version one".as_slice()),
            (IMPL_B, b"version two".as_slice()),
        ]);
        Self { code, calls: Vec::new() }
    }
}

impl Executor for Chain {
    fn delegate(
        &mut self,
        _msg: &Msg,
        implementation: Address,
        _calldata: &[u8],
    ) -> CallResult {
        self.calls.push(implementation);
        self.code
            .get(&implementation)
            .map(|tag| tag.to_vec())
            .ok_or_else(|| b"no code".to_vec())
    }
}

#[test]
fn documented_scenario() {
    let proxy = VersionedProxy::new(VersionRegistry::new(Ownable::new(ADMIN)));
    let admin = Msg::new(ADMIN);
    let user = Msg::new(USER);
    let mut chain = Chain::new();

    proxy.register_version(&admin, V1, IMPL_A).expect("register V1");
    proxy.register_version(&admin, V2, IMPL_B).expect("register V2");
    proxy.set_default_version(&admin, V1).expect("default V1");

    assert_eq!(proxy.get_versions(), vec![V1, V2]);
    assert_eq!(proxy.get_versions(), proxy.get_versions());

    let output = proxy.fallback(&user, b"call", &mut chain).expect("fallback");
    assert_eq!(output, b"version one");
    assert_eq!(chain.calls, vec![IMPL_A]);

    proxy.remove_version(&admin, V1).expect("remove V1");

    // The default pointer is stale but still reported.
    assert_eq!(proxy.get_default_version(), Ok(V1));
    let err = proxy
        .fallback(&user, b"call", &mut chain)
        .expect_err("stale default should not dispatch");
    assert_eq!(
        err,
        Error::VersionNotFound(VersionedProxyVersionNotFound { version: V1 })
    );
    assert_eq!(chain.calls, vec![IMPL_A]);

    let output = proxy
        .execute_at_version(&user, V2, b"call", &mut chain)
        .expect("explicit version still works");
    assert_eq!(output, b"version two");

    let events = proxy.events();
    assert_eq!(events.len(), 4);
    assert_eq!(
        VersionRegistered::decode_log_data(&events[0]).expect("decode"),
        VersionRegistered { version: V1, implementation: IMPL_A }
    );
    assert_eq!(
        VersionRegistered::decode_log_data(&events[1]).expect("decode"),
        VersionRegistered { version: V2, implementation: IMPL_B }
    );
    assert_eq!(
        DefaultVersionChanged::decode_log_data(&events[2]).expect("decode"),
        DefaultVersionChanged { previous_version: B256::ZERO, new_version: V1 }
    );
    assert_eq!(
        VersionRemoved::decode_log_data(&events[3]).expect("decode"),
        VersionRemoved { version: V1 }
    );
}

#[test]
fn non_admins_cannot_administer() {
    let proxy = VersionedProxy::new(VersionRegistry::new(Ownable::new(ADMIN)));
    let user = Msg::new(USER);

    assert!(matches!(
        proxy.register_version(&user, V1, IMPL_A),
        Err(Error::UnauthorizedAccount(_))
    ));
    assert!(proxy.get_versions().is_empty());
    assert!(proxy.events().is_empty());
}

#[test]
fn transferred_ownership_moves_administration() {
    let proxy =
        VersionedProxy::new(VersionRegistry::new(Ownable::new(ADMIN)));
    let admin = Msg::new(ADMIN);
    let user = Msg::new(USER);

    proxy
        .administer(|authority, log| {
            authority.transfer_ownership(&admin, USER, log)
        })
        .expect("should transfer ownership");

    assert!(matches!(
        proxy.register_version(&admin, V1, IMPL_A),
        Err(Error::UnauthorizedAccount(_))
    ));
    proxy
        .register_version(&user, V1, IMPL_A)
        .expect("new owner should register");
    assert_eq!(proxy.get_implementation(V1), Ok(IMPL_A));
}

#[test]
fn reverted_upgrade_is_rolled_back() {
    let proxy =
        VersionedProxy::new(VersionRegistry::new(Ownable::new(ADMIN)));
    let admin = Msg::new(ADMIN);
    proxy.register_version(&admin, V1, IMPL_A).expect("register V1");
    proxy.set_default_version(&admin, V1).expect("default V1");

    // V1 migrates the proxy to V2 through the proxy itself, then fails.
    let callback = proxy.clone();
    let mut migrate =
        |msg: &Msg, _: Address, _: &[u8]| -> CallResult {
            callback
                .register_version(msg, V2, IMPL_B)
                .map_err(Vec::<u8>::from)?;
            callback.set_default_version(msg, V2).map_err(Vec::<u8>::from)?;
            callback.remove_version(msg, V1).map_err(Vec::<u8>::from)?;
            Err(b"migration failed".to_vec())
        };

    let err = proxy
        .fallback(&admin, b"migrate", &mut migrate)
        .expect_err("migration reverts");
    assert_eq!(err, Error::CalleeFailure(b"migration failed".to_vec()));

    assert_eq!(proxy.get_versions(), vec![V1]);
    assert_eq!(proxy.get_default_version(), Ok(V1));
    assert_eq!(proxy.events().len(), 2);

    let mut chain = Chain::new();
    let output = proxy.fallback(&admin, b"call", &mut chain).expect("fallback");
    assert_eq!(output, b"version one");
}

#[test]
fn strict_registry_reports_unknown_removals() {
    let registry = VersionRegistry::with_config(
        Ownable::new(ADMIN),
        Config::default().with_removal(RemovalPolicy::Strict),
    );
    let proxy = VersionedProxy::from(registry);

    let err = proxy
        .remove_version(&Msg::new(ADMIN), V1)
        .expect_err("should report unknown version");
    assert_eq!(
        err,
        Error::VersionNotFound(VersionedProxyVersionNotFound { version: V1 })
    );
}
