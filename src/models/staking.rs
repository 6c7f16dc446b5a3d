//! Raw on-chain state of the nomination model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Amount, AvailableAction, NominationAction, Ratio};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StakingStatus {
    Bonded,
    Nominating,
    NominatingInactive,
    NominatingWaiting,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockedEntry {
    pub value: Amount,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub expected_unlock: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EraReward {
    pub era_index: u64,
    pub amount: Amount,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingDetails {
    pub total: Amount,
    pub active: Amount,
    pub unlocked: Amount,
    #[serde(default)]
    pub locked: Vec<LockedEntry>,
    pub status: StakingStatus,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub next_era: DateTime<Utc>,
    #[serde(default)]
    pub rewards: Vec<EraReward>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NominatorDetails {
    pub address: String,
    pub balance: Amount,
    #[serde(default)]
    pub delegatees: Vec<String>,
    #[serde(default)]
    pub available_actions: Vec<AvailableAction<NominationAction>>,
    #[serde(default)]
    pub staking_details: Option<StakingDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastEraReward {
    pub era_index: u64,
    pub amount: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorDetails {
    pub address: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub own_stash: Option<Amount>,
    #[serde(default)]
    pub total_staking_balance: Option<Amount>,
    #[serde(default)]
    pub commission: Option<Ratio>,
    #[serde(default)]
    pub last_era_reward: Option<LastEraReward>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElectionStatus {
    Open,
    Closed,
}
