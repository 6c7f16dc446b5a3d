//! Raw on-chain state of the single-delegate (baker) model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Amount, AvailableAction, BakerAction, Ratio};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BakerDelegatorDetails {
    pub address: String,
    pub balance: Amount,
    #[serde(default)]
    pub delegatees: Vec<String>,
    #[serde(default)]
    pub available_actions: Vec<AvailableAction<BakerAction>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationInfo {
    pub is_delegated: bool,
    #[serde(default)]
    pub delegate: Option<String>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub delegated_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BakerInfo {
    pub address: String,
    pub baker_capacity: Amount,
    pub staking_balance: Amount,
    pub baking_active: bool,
}

/// Baker-wide rewards of one cycle, with the queried delegator's share of the stake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BakerRewardRecord {
    pub cycle: u64,
    pub total_rewards: Amount,
    pub total_fees: Amount,
    pub staking_balance: Amount,
    pub delegated_balance: Amount,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub payout: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutSchedule {
    pub cycles: u32,
    pub time: String,
}

/// A trusted baker published through remote configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BakerConfig {
    pub address: String,
    pub name: String,
    pub fee: Ratio,
    #[serde(default)]
    pub payout: Option<PayoutSchedule>,
}
