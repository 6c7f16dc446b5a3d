#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use tokio::sync::Notify;

use delegation_details::error::{ClientQueryError, Result};
use delegation_details::models::datetime_utils::{fixed_clock, Clock};
use delegation_details::models::{
    Amount, AvailableAction, BakerAction, BakerConfig, BakerDelegatorDetails, BakerInfo,
    BakerRewardRecord, DelegationInfo, ElectionStatus, EraReward, LastEraReward,
    NominationAction, NominatorDetails, PayoutSchedule, ProtocolInfo, Ratio, StakingDetails,
    StakingStatus, ValidatorDetails,
};
use delegation_details::services::{
    BakerClient, ChainSnapshot, NominationClient, QueryResult, RemoteConfigProvider,
};

pub const NOMINATOR: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";
pub const VALIDATOR_A: &str = "5FHneW46xGXgs5mUiveU4sbTyGBzmstUspZC92UhjJM694ty";
pub const VALIDATOR_B: &str = "5FLSigC9HGRKVhB9FiEo4Y3koPsNmBmLJbpXg2mp1hXcS59Y";

pub const DELEGATOR: &str = "tz1VSUr8wwNhLAzempoch5d6hLRiTh8Cjcjb";
pub const BAKER: &str = "tz1aRoaRhSpRYvFdyvgWLL6TGyRoGF51wDjM";

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
}

pub fn clock() -> Clock {
    fixed_clock(now())
}

pub fn dot() -> ProtocolInfo {
    ProtocolInfo::new("polkadot", "DOT", 0)
}

pub fn xtz() -> ProtocolInfo {
    ProtocolInfo::new("tezos", "XTZ", 0)
}

pub fn ratio(value: &str) -> Ratio {
    Ratio::parse(value).unwrap()
}

pub fn staking(total: u64, active: u64, status: StakingStatus) -> StakingDetails {
    StakingDetails {
        total: Amount::from(total),
        active: Amount::from(active),
        unlocked: Amount::zero(),
        locked: vec![],
        status,
        next_era: now() + Duration::hours(6),
        rewards: vec![],
    }
}

pub fn era_rewards(count: u64) -> Vec<EraReward> {
    (0..count)
        .map(|i| EraReward {
            era_index: 100 - i,
            amount: Amount::from(10 + i),
            timestamp: (now() - Duration::days(i as i64)).timestamp_millis(),
        })
        .collect()
}

pub fn nominator(
    actions: Vec<AvailableAction<NominationAction>>,
    staking: Option<StakingDetails>,
    delegatees: &[&str],
) -> NominatorDetails {
    NominatorDetails {
        address: NOMINATOR.to_string(),
        balance: Amount::from(5000),
        delegatees: delegatees.iter().map(|d| d.to_string()).collect(),
        available_actions: actions,
        staking_details: staking,
    }
}

pub fn validator(address: &str, status: &str) -> ValidatorDetails {
    ValidatorDetails {
        address: address.to_string(),
        name: Some(format!("Validator {}", &address[..4])),
        status: Some(status.to_string()),
        own_stash: Some(Amount::from(1000)),
        total_staking_balance: Some(Amount::from(9000)),
        commission: Some(ratio("0.1")),
        last_era_reward: Some(LastEraReward {
            era_index: 99,
            amount: Amount::from(1000),
        }),
    }
}

/// A funded nominator with two active validators and room to bond more.
pub fn nomination_snapshot(actions: Vec<AvailableAction<NominationAction>>) -> ChainSnapshot {
    let mut snapshot = ChainSnapshot::default()
        .with_nominator(nominator(
            actions,
            Some(staking(1000, 1000, StakingStatus::Nominating)),
            &[VALIDATOR_A, VALIDATOR_B],
        ))
        .with_validator(validator(VALIDATOR_A, "active"))
        .with_validator(validator(VALIDATOR_B, "waiting"))
        .with_max_delegation_value(NOMINATOR, Amount::from(4000));
    snapshot.existential_deposit = Amount::from(1);
    snapshot
}

pub fn validators() -> Vec<String> {
    vec![VALIDATOR_A.to_string(), VALIDATOR_B.to_string()]
}

pub fn baker_info(capacity: u64, staking: u64) -> BakerInfo {
    BakerInfo {
        address: BAKER.to_string(),
        baker_capacity: Amount::from(capacity),
        staking_balance: Amount::from(staking),
        baking_active: true,
    }
}

pub fn trusted_baker() -> BakerConfig {
    BakerConfig {
        address: BAKER.to_string(),
        name: "Trusted Baker".to_string(),
        fee: ratio("0.1"),
        payout: Some(PayoutSchedule {
            cycles: 6,
            time: "after cycle end".to_string(),
        }),
    }
}

pub fn reward_record(cycle: u64, delegated: u64, payout: DateTime<Utc>) -> BakerRewardRecord {
    BakerRewardRecord {
        cycle,
        total_rewards: Amount::from(90),
        total_fees: Amount::from(10),
        staking_balance: Amount::from(1000),
        delegated_balance: Amount::from(delegated),
        payout,
    }
}

/// A delegator with 500 coins delegated to the trusted baker since two weeks.
pub fn baker_snapshot() -> ChainSnapshot {
    ChainSnapshot::default()
        .with_baker_delegator(
            BakerDelegatorDetails {
                address: DELEGATOR.to_string(),
                balance: Amount::from(500),
                delegatees: vec![BAKER.to_string()],
                available_actions: vec![
                    AvailableAction::new(BakerAction::Delegate),
                    AvailableAction::new(BakerAction::Undelegate),
                ],
            },
            DelegationInfo {
                is_delegated: true,
                delegate: Some(BAKER.to_string()),
                delegated_date: Some(now() - Duration::days(14)),
            },
        )
        .with_baker(baker_info(10000, 6000))
}

/// Delegates to a snapshot but can be told to fail selected queries.
pub struct FaultyNominationClient {
    pub inner: ChainSnapshot,
    pub fail_validators: bool,
    pub fail_election: bool,
    pub fail_existential_deposit: bool,
}

impl FaultyNominationClient {
    pub fn new(inner: ChainSnapshot) -> Self {
        Self {
            inner,
            fail_validators: false,
            fail_election: false,
            fail_existential_deposit: false,
        }
    }
}

#[async_trait]
impl NominationClient for FaultyNominationClient {
    async fn nominator_details(
        &self,
        nominator: &str,
        validators: &[String],
    ) -> QueryResult<NominatorDetails> {
        self.inner.nominator_details(nominator, validators).await
    }

    async fn validator_details(&self, validator: &str) -> QueryResult<ValidatorDetails> {
        if self.fail_validators && validator == VALIDATOR_B {
            return Err(ClientQueryError::new("validator endpoint timed out"));
        }
        self.inner.validator_details(validator).await
    }

    async fn existential_deposit(&self) -> QueryResult<Amount> {
        if self.fail_existential_deposit {
            return Err(ClientQueryError::new("constants unavailable"));
        }
        self.inner.existential_deposit().await
    }

    async fn estimate_max_delegation_value(&self, address: &str) -> QueryResult<Amount> {
        self.inner.estimate_max_delegation_value(address).await
    }

    async fn election_status(&self) -> QueryResult<ElectionStatus> {
        if self.fail_election {
            return Err(ClientQueryError::new("election status unavailable"));
        }
        self.inner.election_status().await
    }
}

/// Holds every reward history query until the gate is opened.
pub struct GatedBakerClient {
    pub inner: ChainSnapshot,
    pub gate: Arc<Notify>,
}

#[async_trait]
impl BakerClient for GatedBakerClient {
    async fn delegator_details(&self, address: &str) -> QueryResult<BakerDelegatorDetails> {
        self.inner.delegator_details(address).await
    }

    async fn delegation_info(&self, address: &str) -> QueryResult<DelegationInfo> {
        self.inner.delegation_info(address).await
    }

    async fn baker_info(&self, baker: &str) -> QueryResult<BakerInfo> {
        self.inner.baker_info(baker).await
    }

    async fn delegation_rewards(
        &self,
        baker: &str,
        delegator: Option<&str>,
    ) -> QueryResult<Vec<BakerRewardRecord>> {
        self.gate.notified().await;
        self.inner.delegation_rewards(baker, delegator).await
    }
}

/// Static trusted-baker list that counts how often it is read.
pub struct CountingRemoteConfig {
    pub bakers: Vec<BakerConfig>,
    pub calls: AtomicUsize,
}

impl CountingRemoteConfig {
    pub fn new(bakers: Vec<BakerConfig>) -> Self {
        Self {
            bakers,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteConfigProvider for CountingRemoteConfig {
    async fn baker_configs(&self) -> Result<Vec<BakerConfig>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        Ok(self.bakers.clone())
    }
}
