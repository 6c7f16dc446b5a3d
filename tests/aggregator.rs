mod common;

use std::sync::Arc;

use chrono::Duration;
use tokio::sync::Notify;

use delegation_details::extensions::single_delegate::{ESTIMATED_RETURN_ID, NEXT_PAYOUT_ID};
use delegation_details::extensions::{
    Aggregator, ExtensionRegistry, NominationConfig, SingleDelegateConfig,
};
use delegation_details::models::{DisplayText, StringKey};
use delegation_details::services::StaticRemoteConfig;

use common::*;

fn gated_aggregator(gate: Arc<Notify>) -> Aggregator {
    let snapshot = baker_snapshot().with_baker_rewards(
        BAKER,
        vec![reward_record(509, 500, now() + Duration::days(3))],
    );
    let mut registry = ExtensionRegistry::new();
    registry.register_single_delegate(
        SingleDelegateConfig::new(xtz()).with_clock(clock()),
        Arc::new(GatedBakerClient {
            inner: snapshot,
            gate,
        }),
        Arc::new(StaticRemoteConfig::new(vec![trusted_baker()])),
    );
    Aggregator::new(Arc::new(registry))
}

#[tokio::test]
async fn result_is_delivered_before_enrichment_and_updated_in_place() {
    let gate = Arc::new(Notify::new());
    let aggregator = gated_aggregator(Arc::clone(&gate));

    let handle = aggregator
        .fetch("tezos", DELEGATOR, &[BAKER.to_string()])
        .await
        .unwrap();

    let observer = handle.details().delegator.display_details.clone();
    let copy = handle.details().clone();
    let before = observer.snapshot();
    assert!(handle.is_enriching());
    assert_eq!(observer.find(NEXT_PAYOUT_ID).unwrap().text, DisplayText::Pending);

    gate.notify_one();
    handle.wait_for_enrichment().await;

    // readers holding an older snapshot keep it untouched
    assert!(before.iter().all(|item| item.text == DisplayText::Pending));

    let next_payout = observer.find(NEXT_PAYOUT_ID).unwrap();
    assert_eq!(next_payout.text, DisplayText::Plain("in 6 days".into()));
    assert_eq!(
        observer.find(ESTIMATED_RETURN_ID).unwrap().text,
        DisplayText::Plain("50 XTZ".into())
    );
    assert!(observer.version() > 0);
    assert!(!handle.is_enriching());

    // clones of a result share its display lists
    assert_eq!(
        copy.delegator.display_details.find(NEXT_PAYOUT_ID).unwrap().text,
        DisplayText::Plain("in 6 days".into())
    );
}

#[tokio::test]
async fn enrichment_without_a_baker_changes_nothing() {
    let aggregator = gated_aggregator(Arc::new(Notify::new()));

    let handle = aggregator.fetch("tezos", DELEGATOR, &[]).await.unwrap();
    handle.wait_for_enrichment().await;

    let display = &handle.details().delegator.display_details;
    assert!(display.is_empty());
    assert_eq!(display.version(), 0);
}

#[tokio::test]
async fn only_one_enrichment_runs_per_result() {
    let gate = Arc::new(Notify::new());
    let aggregator = gated_aggregator(Arc::clone(&gate));

    let handle = aggregator
        .fetch("tezos", DELEGATOR, &[BAKER.to_string()])
        .await
        .unwrap();
    let extension = aggregator.registry().get_or_create("tezos").await.unwrap();

    assert!(!handle.start_enrichment(Arc::clone(&extension)));

    gate.notify_one();
    handle.wait_for_enrichment().await;

    // the finished pass frees the slot
    assert!(handle.start_enrichment(extension));
    gate.notify_one();
    handle.wait_for_enrichment().await;
}

#[tokio::test]
async fn extensions_without_enrichment_deliver_final_results() {
    let mut registry = ExtensionRegistry::new();
    registry.register_nomination(
        NominationConfig::new(dot()).with_clock(clock()),
        Arc::new(nomination_snapshot(vec![])),
    );
    let aggregator = Aggregator::new(Arc::new(registry));

    let handle = aggregator
        .fetch("polkadot", NOMINATOR, &validators())
        .await
        .unwrap();
    assert!(!handle.is_enriching());

    let details = handle.into_details();
    assert_eq!(details.delegatees.len(), 2);
    assert_eq!(
        details.delegator.display_details.snapshot()[0].description,
        StringKey::new("delegation.nomination.delegated_label")
    );
}
