//! Staking-model specific logic behind one uniform contract.

pub mod aggregator;
pub mod composer;
pub mod estimator;
pub mod nomination;
pub mod registry;
pub mod rewards;
pub mod single_delegate;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::{
    DelegateeSummary, DelegationDetails, DisplayUpdate, ProtocolInfo, RewardList, StringKey,
};

pub use aggregator::{Aggregator, DelegationHandle};
pub use nomination::{NominationConfig, NominationExtension};
pub use registry::ExtensionRegistry;
pub use single_delegate::{SingleDelegateConfig, SingleDelegateExtension};

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::NominationExtension {}
    impl Sealed for super::SingleDelegateExtension {}
}

/// One implementation per staking model. New protocols reuse a model or add a new one here.
#[async_trait]
pub trait DelegationExtension: sealed::Sealed + Send + Sync {
    fn protocol(&self) -> &ProtocolInfo;

    fn delegatee_label(&self) -> StringKey;

    fn delegatee_label_plural(&self) -> StringKey;

    fn supports_multiple_delegations(&self) -> bool;

    /// Delegatee suggested to users that have not picked one yet.
    fn default_delegatee(&self) -> Option<&str> {
        None
    }

    async fn fetch_delegation_details(
        &self,
        delegator: &str,
        delegatees: &[String],
    ) -> Result<DelegationDetails>;

    /// `None` when there is no reward yet.
    async fn fetch_reward_summary(
        &self,
        delegator: &str,
        delegatees: &[String],
    ) -> Result<Option<RewardList>>;

    async fn summarize_delegatees(&self, delegatees: &[String]) -> Result<Vec<DelegateeSummary>>;

    /// Whether [`enrichment_updates`](Self::enrichment_updates) has anything to add.
    fn has_enrichment(&self) -> bool {
        false
    }

    /// Display updates computed after the initial result was handed out. Never fails: data
    /// that cannot be fetched turns into removed items.
    async fn enrichment_updates(&self, _details: &DelegationDetails) -> Vec<DisplayUpdate> {
        Vec::new()
    }
}

pub(crate) fn ensure_cardinality(
    extension: &dyn DelegationExtension,
    delegatees: &[String],
) -> Result<()> {
    if !extension.supports_multiple_delegations() && delegatees.len() > 1 {
        return Err(Error::UnsupportedCardinality {
            max: 1,
            requested: delegatees.len(),
        });
    }
    Ok(())
}
