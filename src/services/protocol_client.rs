//! Read-only queries each staking protocol implementation answers.

use async_trait::async_trait;

use crate::error::ClientQueryError;
use crate::models::{
    Amount, BakerDelegatorDetails, BakerInfo, BakerRewardRecord, DelegationInfo, ElectionStatus,
    NominatorDetails, ValidatorDetails,
};

pub type QueryResult<T> = Result<T, ClientQueryError>;

/// Nomination-model chains (many validators per nominator, era based).
#[async_trait]
pub trait NominationClient: Send + Sync {
    async fn nominator_details(
        &self,
        nominator: &str,
        validators: &[String],
    ) -> QueryResult<NominatorDetails>;

    async fn validator_details(&self, validator: &str) -> QueryResult<ValidatorDetails>;

    /// Smallest balance an account may hold.
    async fn existential_deposit(&self) -> QueryResult<Amount>;

    async fn estimate_max_delegation_value(&self, address: &str) -> QueryResult<Amount>;

    async fn election_status(&self) -> QueryResult<ElectionStatus>;
}

/// Single-delegate chains (one baker per delegator, cycle based payouts).
#[async_trait]
pub trait BakerClient: Send + Sync {
    async fn delegator_details(&self, address: &str) -> QueryResult<BakerDelegatorDetails>;

    async fn delegation_info(&self, address: &str) -> QueryResult<DelegationInfo>;

    async fn baker_info(&self, baker: &str) -> QueryResult<BakerInfo>;

    /// Reward history of `baker`, one record per cycle, as the indexer returns it.
    async fn delegation_rewards(
        &self,
        baker: &str,
        delegator: Option<&str>,
    ) -> QueryResult<Vec<BakerRewardRecord>>;
}
