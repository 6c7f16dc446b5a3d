//! Nomination model: many validators per nominator, era based rewards, bonded / unbonding /
//! unlocked stake.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;
use log::{info, warn};
use serde_json::json;

use super::aggregator::assemble;
use super::composer::{compose, ActionPriorities};
use super::estimator::{RewardEstimator, RewardInputs};
use super::rewards::{truncate_history, REWARD_HISTORY_LIMIT};
use super::{ensure_cardinality, DelegationExtension};
use crate::error::Result;
use crate::models::datetime_utils::{relative_with_absolute, system_clock, Clock};
use crate::models::{
    shorten_address, ActionDescriptor, ActionKind, Alert, AlertColor, Amount, AvailableAction,
    DelegateeDetails, DelegateeState, DelegateeSummary, DelegationDetails, DelegatorDetails,
    DelegatorState, DisplayItem, DisplayList, DisplayUpdate, ElectionStatus, InputField, InputKind,
    NominationAction, NominatorDetails, ProtocolInfo, RewardList, RewardRecord, StakingDetails,
    StakingStatus, StringKey, UsageDetails, ValidatorDetails,
};
use crate::services::NominationClient;

use NominationAction::*;

pub const PRIORITIES: ActionPriorities<NominationAction> = ActionPriorities {
    delegate: &[BondNominate, Nominate, ChangeNomination, BondExtra],
    undelegate: &[CancelNomination, Unbond],
};

/// Form field names shared with the transaction builder.
pub mod arg {
    pub const TARGETS: &str = "targets";
    pub const VALUE: &str = "value";
    pub const VALUE_CONTROL: &str = "value_control";
    pub const PAYEE: &str = "payee";
}

pub const EXPECTED_REWARD_ID: &str = "expected_reward";

const STASH_PAYEE: &str = "stash";
const AMOUNT_FRACTION_DIGITS: u32 = 4;

fn key(name: &str) -> StringKey {
    StringKey::new(format!("delegation.nomination.{name}"))
}

#[derive(Clone)]
pub struct NominationConfig {
    pub protocol: ProtocolInfo,
    pub reward_history_limit: usize,
    pub clock: Clock,
}

impl NominationConfig {
    pub fn new(protocol: ProtocolInfo) -> Self {
        Self {
            protocol,
            reward_history_limit: REWARD_HISTORY_LIMIT,
            clock: system_clock(),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}

pub struct NominationExtension {
    config: NominationConfig,
    client: Arc<dyn NominationClient>,
}

impl NominationExtension {
    pub fn new(config: NominationConfig, client: Arc<dyn NominationClient>) -> Self {
        Self { config, client }
    }

    fn format(&self, amount: &Amount) -> String {
        amount.format(&self.config.protocol, AMOUNT_FRACTION_DIGITS)
    }

    async fn delegator_details(
        &self,
        nominator: NominatorDetails,
        validators: &[String],
    ) -> Result<DelegatorDetails> {
        let available = &nominator.available_actions;
        let staking = nominator.staking_details.as_ref();

        let delegate = self
            .create_delegate_action(staking, available, &nominator.address, validators)
            .await?;
        let undelegate = self.create_undelegate_action(staking, available);
        let extras = PRIORITIES
            .extras(available)
            .into_iter()
            .map(|action| self.create_extra_action(staking, action))
            .collect();

        let actions = compose(delegate, extras, undelegate);
        let display_details = self.delegator_display_items(&nominator);

        Ok(DelegatorDetails {
            state: DelegatorState::Nominator(nominator),
            main_actions: actions.main,
            secondary_actions: actions.secondary,
            display_details: DisplayList::new(display_details),
        })
    }

    async fn create_delegate_action(
        &self,
        staking: Option<&StakingDetails>,
        available: &[AvailableAction<NominationAction>],
        nominator: &str,
        validators: &[String],
    ) -> Result<Option<ActionDescriptor>> {
        let Some(action) = PRIORITIES.select_delegate(available) else {
            return Ok(None);
        };

        let (max_value, min_value) = tokio::try_join!(
            self.client.estimate_max_delegation_value(nominator),
            self.client.existential_deposit()
        )?;

        if max_value <= min_value {
            info!(
                "Delegate action omitted for {}: max {} does not exceed existential deposit {}",
                nominator, max_value, min_value
            );
            return Ok(None);
        }

        let active = staking.map(|s| s.active.clone()).unwrap_or_default();
        let accepts_value = action.accepts(arg::VALUE);
        let protocol = &self.config.protocol;

        let mut schema = vec![
            InputField::new(arg::TARGETS, InputKind::Targets, json!(validators)),
            InputField::new(
                arg::VALUE,
                InputKind::Hidden,
                if accepts_value {
                    max_value.to_base_units_string()
                } else {
                    active.to_base_units_string()
                },
            ),
        ];
        if accepts_value {
            schema.push(InputField::new(
                arg::VALUE_CONTROL,
                InputKind::Amount {
                    min: min_value.shifted_by(-(protocol.decimals as i32)),
                    max: max_value.shifted_by(-(protocol.decimals as i32)),
                    decimals: protocol.decimals,
                },
                max_value.to_coin_string(protocol, protocol.decimals),
            ));
        }
        schema.push(InputField::new(arg::PAYEE, InputKind::Hidden, STASH_PAYEE));

        let mut descriptor = ActionDescriptor::new(action.kind, key("delegate.label"));
        descriptor.description = self.delegate_description(action.kind, &active, &max_value);
        descriptor.input_schema = Some(schema);
        Ok(Some(descriptor))
    }

    fn delegate_description(
        &self,
        kind: NominationAction,
        bonded: &Amount,
        max_value: &Amount,
    ) -> Option<StringKey> {
        let bonded = self.format(bonded);
        let max_value = self.format(max_value);
        match kind {
            BondNominate => {
                Some(key("delegate.bond-nominate_text").with_param("maxDelegation", max_value))
            }
            Nominate => Some(key("delegate.nominate_text").with_param("bonded", bonded)),
            BondExtra => Some(
                key("delegate.bond-extra_text")
                    .with_param("bonded", bonded)
                    .with_param("maxDelegation", max_value),
            ),
            ChangeNomination => {
                Some(key("delegate.change-nomination_text").with_param("bonded", bonded))
            }
            _ => None,
        }
    }

    fn create_undelegate_action(
        &self,
        staking: Option<&StakingDetails>,
        available: &[AvailableAction<NominationAction>],
    ) -> Option<ActionDescriptor> {
        let action = PRIORITIES.select_undelegate(available)?;
        let staking = staking?;

        let label = match action.kind {
            CancelNomination => key("undelegate.label"),
            _ => key("unbond.label"),
        };
        let mut descriptor = ActionDescriptor::new(action.kind, label);
        descriptor.icon = Some("close-outline".to_string());
        descriptor.input_schema = Some(vec![InputField::new(
            arg::VALUE,
            InputKind::Hidden,
            staking.active.to_base_units_string(),
        )]);
        Some(descriptor)
    }

    fn create_extra_action(
        &self,
        staking: Option<&StakingDetails>,
        action: &AvailableAction<NominationAction>,
    ) -> Option<ActionDescriptor> {
        match action.kind {
            WithdrawUnbonded => {
                let mut descriptor =
                    ActionDescriptor::new(action.kind, key("withdraw-unbonded.label"));
                descriptor.confirm_label = Some(key("withdraw-unbonded.button"));
                descriptor.description = Some(match staking {
                    Some(staking) => key("withdraw-unbonded.text-full")
                        .with_param("unlocked", self.format(&staking.unlocked)),
                    None => key("withdraw-unbonded.text-short"),
                });
                Some(descriptor)
            }
            _ => None,
        }
    }

    fn delegator_display_items(&self, nominator: &NominatorDetails) -> Vec<DisplayItem> {
        let Some(staking) = &nominator.staking_details else {
            return Vec::new();
        };

        let mut items = self.bonded_items(staking);
        if !nominator.delegatees.is_empty() {
            items.push(self.nomination_status_item(staking));
        }
        items
    }

    /// At most one of: fully active stake, the next unlocking chunk, or withdrawable stake.
    fn bonded_items(&self, staking: &StakingDetails) -> Vec<DisplayItem> {
        let now = (self.config.clock)();

        if staking.total == staking.active {
            let description = if staking.status == StakingStatus::Nominating {
                key("delegated_label")
            } else {
                key("bonded_label")
            };
            return vec![DisplayItem::new(
                "people-outline",
                self.format(&staking.total),
                description,
            )];
        }

        let next_unlocking = staking.locked.iter().reduce(|soonest, entry| {
            if entry.expected_unlock < soonest.expected_unlock {
                entry
            } else {
                soonest
            }
        });
        if let Some(entry) = next_unlocking {
            return vec![
                DisplayItem::new("people-outline", self.format(&entry.value), key("locked_label")),
                DisplayItem::new(
                    "alarm-outline",
                    relative_with_absolute(&now, &entry.expected_unlock),
                    key("withdraw-ready_label"),
                ),
            ];
        }

        if staking.unlocked.is_positive() {
            return vec![DisplayItem::new(
                "people-outline",
                self.format(&staking.unlocked),
                key("withdraw-ready_label"),
            )];
        }

        Vec::new()
    }

    fn nomination_status_item(&self, staking: &StakingDetails) -> DisplayItem {
        let now = (self.config.clock)();
        let description = if staking.status == StakingStatus::NominatingInactive {
            key("becomes-active_label")
        } else {
            key("next-payout_label")
        };
        DisplayItem::new(
            "sync-outline",
            relative_with_absolute(&now, &staking.next_era),
            description,
        )
    }

    async fn delegatee_details(
        &self,
        validator: &str,
        bonded: &Amount,
        has_delegate_form: bool,
    ) -> Result<DelegateeDetails> {
        let details = self.client.validator_details(validator).await?;

        let own_stash = details.own_stash.clone().unwrap_or_default();
        let total = details.total_staking_balance.clone().unwrap_or_default();
        let usage_details = UsageDetails::new(own_stash, total);

        let display_details = DisplayList::new(vec![DisplayItem::new(
            "logo-usd",
            details
                .commission
                .as_ref()
                .map(|c| c.format_percentage())
                .unwrap_or_else(|| "-".to_string()),
            key("commission_label"),
        )]);
        let reward_estimator =
            self.reward_estimator(&details, bonded, has_delegate_form, &display_details);

        Ok(DelegateeDetails {
            address: details.address.clone(),
            name: details.name.clone().unwrap_or_default(),
            status: details
                .status
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
            usage_details,
            display_details,
            state: DelegateeState::Validator(details),
            reward_estimator,
        })
    }

    /// Adds the expected-reward item to `display` when the validator is active, its
    /// commission and last era reward are known and a delegate form exists.
    fn reward_estimator(
        &self,
        details: &ValidatorDetails,
        bonded: &Amount,
        has_delegate_form: bool,
        display: &DisplayList,
    ) -> Option<RewardEstimator> {
        let commission = details.commission.clone()?;
        let last_era_reward = details.last_era_reward.as_ref()?.amount.clone();
        let is_active = details
            .status
            .as_deref()
            .is_some_and(|status| status.eq_ignore_ascii_case("active"));
        if !is_active || !has_delegate_form {
            return None;
        }

        let inputs = RewardInputs {
            protocol: self.config.protocol.clone(),
            commission,
            last_era_reward,
            total_validator_stake: details.total_staking_balance.clone().unwrap_or_default(),
            bonded: bonded.clone(),
        };
        let item = DisplayItem::new(
            "logo-usd",
            inputs.text_for(bonded),
            key("expected-reward_label"),
        )
        .with_id(EXPECTED_REWARD_ID);
        display.apply(vec![DisplayUpdate::replace(EXPECTED_REWARD_ID, Some(item))]);

        Some(RewardEstimator::new(EXPECTED_REWARD_ID, inputs, display.clone()))
    }

    async fn alerts(&self) -> Vec<Alert> {
        match self.client.election_status().await {
            Ok(ElectionStatus::Open) => vec![Alert {
                title: key("alert.election-open.title"),
                description: key("alert.election-open.description"),
                icon: "alert-circle-outline".to_string(),
                color: AlertColor::Warning,
            }],
            Ok(ElectionStatus::Closed) => Vec::new(),
            Err(e) => {
                warn!("Election status unavailable, skipping alert: {}", e);
                Vec::new()
            }
        }
    }

    fn reward_list(&self, records: Vec<RewardRecord>) -> RewardList {
        RewardList {
            rewards: records,
            index_col_label: key("rewards.index-col_label"),
            amount_col_label: key("rewards.amount-col_label"),
            payout_col_label: key("rewards.payout-col_label"),
        }
    }
}

#[async_trait]
impl DelegationExtension for NominationExtension {
    fn protocol(&self) -> &ProtocolInfo {
        &self.config.protocol
    }

    fn delegatee_label(&self) -> StringKey {
        key("delegatee-label")
    }

    fn delegatee_label_plural(&self) -> StringKey {
        key("delegatee-label-plural")
    }

    fn supports_multiple_delegations(&self) -> bool {
        true
    }

    async fn fetch_delegation_details(
        &self,
        delegator: &str,
        delegatees: &[String],
    ) -> Result<DelegationDetails> {
        ensure_cardinality(self, delegatees)?;

        let nominator = self.client.nominator_details(delegator, delegatees).await?;
        let bonded = nominator
            .staking_details
            .as_ref()
            .map(|s| s.total.clone())
            .unwrap_or_default();

        let delegator_details = self.delegator_details(nominator, delegatees).await?;
        let has_delegate_form = delegator_details.main_actions.iter().any(|action| {
            matches!(action.kind, ActionKind::Nomination(kind) if PRIORITIES.is_delegate(kind))
                && action.input_schema.is_some()
        });

        let (validators, alerts) = tokio::join!(
            try_join_all(
                delegatees
                    .iter()
                    .map(|validator| self.delegatee_details(validator, &bonded, has_delegate_form))
            ),
            self.alerts()
        );

        Ok(assemble(alerts, delegator_details, validators?))
    }

    async fn fetch_reward_summary(
        &self,
        delegator: &str,
        delegatees: &[String],
    ) -> Result<Option<RewardList>> {
        let nominator = self.client.nominator_details(delegator, delegatees).await?;
        let Some(staking) = nominator.staking_details.as_ref() else {
            return Ok(None);
        };
        if nominator.delegatees.is_empty() || staking.rewards.is_empty() {
            return Ok(None);
        }

        let records = truncate_history(&staking.rewards, self.config.reward_history_limit)
            .into_iter()
            .map(|reward| RewardRecord {
                index: reward.era_index,
                display_amount: self.format(&reward.amount),
                amount: reward.amount,
                timestamp: reward.timestamp,
            })
            .collect();

        Ok(Some(self.reward_list(records)))
    }

    async fn summarize_delegatees(&self, delegatees: &[String]) -> Result<Vec<DelegateeSummary>> {
        let validators = try_join_all(
            delegatees
                .iter()
                .map(|validator| self.client.validator_details(validator)),
        )
        .await?;

        Ok(validators
            .into_iter()
            .map(|details| DelegateeSummary {
                header: [
                    details.name.clone().unwrap_or_default(),
                    details
                        .commission
                        .as_ref()
                        .map(|c| c.format_percentage())
                        .unwrap_or_default(),
                ],
                description: [shorten_address(&details.address), String::new()],
                address: details.address,
            })
            .collect())
    }
}
