//! The protocol-agnostic result handed to the UI layer.

use serde::Serialize;

use super::{
    ActionDescriptor, Alert, Amount, BakerConfig, BakerDelegatorDetails, BakerInfo,
    DelegationInfo, DisplayList, NominatorDetails, Ratio, ValidatorDetails,
};
use crate::extensions::estimator::RewardEstimator;

/// Result of one query.
///
/// Cloning is shallow for display lists: a clone shares every `DisplayList` with the original,
/// so a running enrichment updates both.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DelegationDetails {
    pub alerts: Vec<Alert>,
    pub delegator: DelegatorDetails,
    pub delegatees: Vec<DelegateeDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum DelegatorState {
    Nominator(NominatorDetails),
    Baker {
        details: BakerDelegatorDetails,
        delegation: DelegationInfo,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DelegatorDetails {
    #[serde(flatten)]
    pub state: DelegatorState,
    pub main_actions: Vec<ActionDescriptor>,
    pub secondary_actions: Vec<ActionDescriptor>,
    pub display_details: DisplayList,
}

impl DelegatorDetails {
    pub fn address(&self) -> &str {
        match &self.state {
            DelegatorState::Nominator(nominator) => &nominator.address,
            DelegatorState::Baker { details, .. } => &details.address,
        }
    }

    pub fn balance(&self) -> &Amount {
        match &self.state {
            DelegatorState::Nominator(nominator) => &nominator.balance,
            DelegatorState::Baker { details, .. } => &details.balance,
        }
    }

    pub fn is_delegating(&self) -> bool {
        match &self.state {
            DelegatorState::Nominator(nominator) => !nominator.delegatees.is_empty(),
            DelegatorState::Baker { delegation, .. } => delegation.is_delegated,
        }
    }
}

/// `usage = current / total`; `None` when `total` is zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageDetails {
    pub usage: Option<Ratio>,
    pub current: Amount,
    pub total: Amount,
}

impl UsageDetails {
    pub fn new(current: Amount, total: Amount) -> Self {
        Self {
            usage: current.ratio_to(&total),
            current,
            total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum DelegateeState {
    Validator(ValidatorDetails),
    Baker {
        info: BakerInfo,
        config: Option<BakerConfig>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DelegateeDetails {
    pub address: String,
    pub name: String,
    pub status: String,
    pub usage_details: UsageDetails,
    pub display_details: DisplayList,
    /// Raw protocol state, nested so its own `address`, `name` and `status` never shadow the
    /// normalized fields above.
    #[serde(rename = "raw")]
    pub state: DelegateeState,
    /// Recomputes the expected-reward item when the delegate form's amount is edited.
    #[serde(skip)]
    pub reward_estimator: Option<RewardEstimator>,
}
