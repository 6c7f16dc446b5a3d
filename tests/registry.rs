mod common;

use std::sync::Arc;

use delegation_details::error::Error;
use delegation_details::extensions::{
    DelegationExtension, ExtensionRegistry, NominationConfig, SingleDelegateConfig,
};
use delegation_details::models::ProtocolInfo;
use delegation_details::services::ChainSnapshot;

use common::*;

fn registry(remote: Arc<CountingRemoteConfig>) -> ExtensionRegistry {
    let mut registry = ExtensionRegistry::new();
    registry.register_nomination(
        NominationConfig::new(dot()),
        Arc::new(ChainSnapshot::default()),
    );
    registry.register_nomination(
        NominationConfig::new(ProtocolInfo::new("kusama", "KSM", 12)),
        Arc::new(ChainSnapshot::default()),
    );
    registry.register_single_delegate(
        SingleDelegateConfig::new(xtz()),
        Arc::new(ChainSnapshot::default()),
        remote,
    );
    registry
}

#[tokio::test]
async fn unknown_protocol_is_rejected() {
    let registry = registry(Arc::new(CountingRemoteConfig::new(vec![])));

    let result = registry.get_or_create("cosmos").await;
    assert!(matches!(result, Err(Error::UnsupportedProtocol(id)) if id == "cosmos"));
    assert_eq!(registry.protocols(), vec!["kusama", "polkadot", "tezos"]);
}

#[tokio::test]
async fn extensions_are_built_lazily_once_per_protocol() {
    let remote = Arc::new(CountingRemoteConfig::new(vec![trusted_baker()]));
    let registry = registry(Arc::clone(&remote));
    assert_eq!(remote.calls(), 0);

    let first = registry.get_or_create("tezos").await.unwrap();
    let second = registry.get_or_create("tezos").await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(remote.calls(), 1);
    assert_eq!(first.protocol().identifier, "tezos");
    assert_eq!(first.default_delegatee(), Some(BAKER));
}

#[tokio::test]
async fn concurrent_first_use_shares_one_construction() {
    let remote = Arc::new(CountingRemoteConfig::new(vec![trusted_baker()]));
    let registry = Arc::new(registry(Arc::clone(&remote)));

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move { registry.get_or_create("tezos").await.unwrap() })
        })
        .collect();

    let extensions = futures::future::try_join_all(tasks).await.unwrap();
    assert!(extensions.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
    assert_eq!(remote.calls(), 1);
}

#[tokio::test]
async fn protocols_sharing_a_model_get_their_own_instance() {
    let registry = registry(Arc::new(CountingRemoteConfig::new(vec![])));

    let polkadot = registry.get_or_create("polkadot").await.unwrap();
    let kusama = registry.get_or_create("kusama").await.unwrap();

    assert!(!Arc::ptr_eq(&polkadot, &kusama));
    assert_eq!(kusama.protocol().symbol, "KSM");
    assert!(registry.is_registered("kusama"));
    assert!(!registry.is_registered("cosmos"));
}
