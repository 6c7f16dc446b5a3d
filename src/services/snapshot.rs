//! In-memory chain state answering both client traits, loadable from a JSON file.

use std::collections::BTreeMap;

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};

use super::protocol_client::{BakerClient, NominationClient, QueryResult};
use crate::error::ClientQueryError;
use crate::models::{
    Amount, BakerConfig, BakerDelegatorDetails, BakerInfo, BakerRewardRecord, DelegationInfo,
    ElectionStatus, NominatorDetails, ValidatorDetails,
};

fn closed() -> ElectionStatus {
    ElectionStatus::Closed
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainSnapshot {
    #[serde(default)]
    pub nominators: BTreeMap<String, NominatorDetails>,
    #[serde(default)]
    pub validators: BTreeMap<String, ValidatorDetails>,
    #[serde(default)]
    pub existential_deposit: Amount,
    #[serde(default)]
    pub max_delegation_values: BTreeMap<String, Amount>,
    #[serde(default = "closed")]
    pub election_status: ElectionStatus,
    #[serde(default)]
    pub baker_delegators: BTreeMap<String, BakerDelegatorDetails>,
    #[serde(default)]
    pub delegation_infos: BTreeMap<String, DelegationInfo>,
    #[serde(default)]
    pub bakers: BTreeMap<String, BakerInfo>,
    #[serde(default)]
    pub baker_rewards: BTreeMap<String, Vec<BakerRewardRecord>>,
    #[serde(default)]
    pub trusted_bakers: Vec<BakerConfig>,
}

impl Default for ChainSnapshot {
    fn default() -> Self {
        Self {
            nominators: BTreeMap::new(),
            validators: BTreeMap::new(),
            existential_deposit: Amount::zero(),
            max_delegation_values: BTreeMap::new(),
            election_status: closed(),
            baker_delegators: BTreeMap::new(),
            delegation_infos: BTreeMap::new(),
            bakers: BTreeMap::new(),
            baker_rewards: BTreeMap::new(),
            trusted_bakers: Vec::new(),
        }
    }
}

impl ChainSnapshot {
    pub fn with_nominator(mut self, details: NominatorDetails) -> Self {
        self.nominators.insert(details.address.clone(), details);
        self
    }

    pub fn with_validator(mut self, details: ValidatorDetails) -> Self {
        self.validators.insert(details.address.clone(), details);
        self
    }

    pub fn with_max_delegation_value(mut self, address: &str, value: Amount) -> Self {
        self.max_delegation_values.insert(address.to_string(), value);
        self
    }

    pub fn with_baker_delegator(
        mut self,
        details: BakerDelegatorDetails,
        info: DelegationInfo,
    ) -> Self {
        self.delegation_infos.insert(details.address.clone(), info);
        self.baker_delegators.insert(details.address.clone(), details);
        self
    }

    pub fn with_baker(mut self, info: BakerInfo) -> Self {
        self.bakers.insert(info.address.clone(), info);
        self
    }

    pub fn with_baker_rewards(mut self, baker: &str, rewards: Vec<BakerRewardRecord>) -> Self {
        self.baker_rewards.insert(baker.to_string(), rewards);
        self
    }
}

fn missing(kind: &str, address: &str) -> ClientQueryError {
    ClientQueryError::new(format!("unknown {kind} {address}"))
}

#[async_trait]
impl NominationClient for ChainSnapshot {
    async fn nominator_details(
        &self,
        nominator: &str,
        _validators: &[String],
    ) -> QueryResult<NominatorDetails> {
        debug!("Snapshot lookup: nominator {}", nominator);
        self.nominators
            .get(nominator)
            .cloned()
            .ok_or_else(|| missing("nominator", nominator))
    }

    async fn validator_details(&self, validator: &str) -> QueryResult<ValidatorDetails> {
        debug!("Snapshot lookup: validator {}", validator);
        self.validators
            .get(validator)
            .cloned()
            .ok_or_else(|| missing("validator", validator))
    }

    async fn existential_deposit(&self) -> QueryResult<Amount> {
        Ok(self.existential_deposit.clone())
    }

    async fn estimate_max_delegation_value(&self, address: &str) -> QueryResult<Amount> {
        Ok(self
            .max_delegation_values
            .get(address)
            .cloned()
            .unwrap_or_default())
    }

    async fn election_status(&self) -> QueryResult<ElectionStatus> {
        Ok(self.election_status)
    }
}

#[async_trait]
impl BakerClient for ChainSnapshot {
    async fn delegator_details(&self, address: &str) -> QueryResult<BakerDelegatorDetails> {
        debug!("Snapshot lookup: delegator {}", address);
        self.baker_delegators
            .get(address)
            .cloned()
            .ok_or_else(|| missing("delegator", address))
    }

    async fn delegation_info(&self, address: &str) -> QueryResult<DelegationInfo> {
        Ok(self
            .delegation_infos
            .get(address)
            .cloned()
            .unwrap_or_default())
    }

    async fn baker_info(&self, baker: &str) -> QueryResult<BakerInfo> {
        debug!("Snapshot lookup: baker {}", baker);
        self.bakers
            .get(baker)
            .cloned()
            .ok_or_else(|| missing("baker", baker))
    }

    async fn delegation_rewards(
        &self,
        baker: &str,
        _delegator: Option<&str>,
    ) -> QueryResult<Vec<BakerRewardRecord>> {
        self.baker_rewards
            .get(baker)
            .cloned()
            .ok_or_else(|| ClientQueryError::new(format!("no payouts recorded for baker {baker}")))
    }
}
