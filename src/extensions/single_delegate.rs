//! Single-delegate model: one baker per delegator, rewards paid out per cycle by the baker.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;
use log::{debug, info};
use serde_json::json;

use super::aggregator::assemble;
use super::composer::{compose, ActionPriorities};
use super::rewards::{
    average_return_per_cycle, delegator_cycle_rewards, truncate_history, PayoutCycle,
    REWARD_HISTORY_LIMIT,
};
use super::{ensure_cardinality, DelegationExtension};
use crate::error::Result;
use crate::models::datetime_utils::{humanize, system_clock, Clock};
use crate::models::{
    shorten_address, ActionDescriptor, Amount, AvailableAction, BakerAction, BakerConfig,
    BakerDelegatorDetails, BakerInfo, DelegateeDetails, DelegateeState, DelegateeSummary,
    DelegationDetails, DelegationInfo, DelegatorDetails, DelegatorState, DisplayItem,
    DisplayList, DisplayText, DisplayUpdate, InputField, InputKind, ProtocolInfo, Ratio,
    RewardList, RewardRecord, StringKey, UsageDetails,
};
use crate::services::{BakerClient, RemoteConfigProvider};

pub const PRIORITIES: ActionPriorities<BakerAction> = ActionPriorities {
    delegate: &[BakerAction::Delegate],
    undelegate: &[BakerAction::Undelegate],
};

pub const HOURS_PER_CYCLE: i64 = 68;
pub const PRESERVED_CYCLES: i64 = 7;

pub const NEXT_PAYOUT_ID: &str = "next_payout";
pub const ESTIMATED_RETURN_ID: &str = "estimated_return";

const DELEGATE_ARG: &str = "delegate";
const AMOUNT_FRACTION_DIGITS: u32 = 10;
const UNKNOWN: &str = "unknown";

fn key(name: &str) -> StringKey {
    StringKey::new(format!("delegation.baker.{name}"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BakerStatus {
    AcceptsDelegation,
    ReachedFullCapacity,
    Deactivated,
}

impl BakerStatus {
    pub fn of(info: &BakerInfo, usage: &UsageDetails) -> Self {
        if !info.baking_active {
            BakerStatus::Deactivated
        } else if usage.usage.as_ref().is_some_and(Ratio::is_below_one) {
            BakerStatus::AcceptsDelegation
        } else {
            BakerStatus::ReachedFullCapacity
        }
    }
}

impl fmt::Display for BakerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BakerStatus::AcceptsDelegation => "Accepts Delegation",
            BakerStatus::ReachedFullCapacity => "Reached Full Capacity",
            BakerStatus::Deactivated => "Deactivated",
        })
    }
}

#[derive(Clone)]
pub struct SingleDelegateConfig {
    pub protocol: ProtocolInfo,
    pub cycle: PayoutCycle,
    /// Share of the published capacity a baker may fill safely.
    pub capacity_factor: Ratio,
    pub reward_history_limit: usize,
    pub clock: Clock,
}

impl SingleDelegateConfig {
    pub fn new(protocol: ProtocolInfo) -> Self {
        Self {
            protocol,
            cycle: PayoutCycle {
                hours_per_cycle: HOURS_PER_CYCLE,
                preserved_cycles: PRESERVED_CYCLES,
            },
            capacity_factor: Ratio::checked(7, 10).unwrap_or_else(Ratio::one),
            reward_history_limit: REWARD_HISTORY_LIMIT,
            clock: system_clock(),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}

pub struct SingleDelegateExtension {
    config: SingleDelegateConfig,
    client: Arc<dyn BakerClient>,
    trusted_bakers: Vec<BakerConfig>,
}

impl SingleDelegateExtension {
    /// Builds the extension, reading the trusted baker list once.
    pub async fn create(
        config: SingleDelegateConfig,
        client: Arc<dyn BakerClient>,
        remote_config: &dyn RemoteConfigProvider,
    ) -> Result<Self> {
        let trusted_bakers = remote_config.baker_configs().await?;
        info!(
            "Loaded {} trusted bakers for {}",
            trusted_bakers.len(),
            config.protocol.identifier
        );
        Ok(Self::new(config, client, trusted_bakers))
    }

    pub fn new(
        config: SingleDelegateConfig,
        client: Arc<dyn BakerClient>,
        trusted_bakers: Vec<BakerConfig>,
    ) -> Self {
        Self {
            config,
            client,
            trusted_bakers,
        }
    }

    pub fn trusted_bakers(&self) -> &[BakerConfig] {
        &self.trusted_bakers
    }

    fn trusted(&self, address: &str) -> Option<&BakerConfig> {
        self.trusted_bakers.iter().find(|baker| baker.address == address)
    }

    fn format(&self, amount: &Amount) -> String {
        amount.format(&self.config.protocol, AMOUNT_FRACTION_DIGITS)
    }

    fn delegator_details(
        &self,
        details: BakerDelegatorDetails,
        delegation: DelegationInfo,
        delegatees: &[String],
    ) -> DelegatorDetails {
        let available = &details.available_actions;
        let delegate = self.create_delegate_action(available, delegatees);
        let undelegate = self.create_undelegate_action(available);
        let actions = compose(delegate, Vec::new(), undelegate);

        let display_details = if delegatees.len() == 1 {
            vec![
                DisplayItem::new("alarm-outline", DisplayText::Pending, key("next-payout_label"))
                    .with_id(NEXT_PAYOUT_ID),
                DisplayItem::new(
                    "logo-usd",
                    DisplayText::Pending,
                    key("estimated-return_label"),
                )
                .with_id(ESTIMATED_RETURN_ID),
            ]
        } else {
            Vec::new()
        };

        DelegatorDetails {
            state: DelegatorState::Baker {
                details,
                delegation,
            },
            main_actions: actions.main,
            secondary_actions: actions.secondary,
            display_details: DisplayList::new(display_details),
        }
    }

    fn create_delegate_action(
        &self,
        available: &[AvailableAction<BakerAction>],
        delegatees: &[String],
    ) -> Option<ActionDescriptor> {
        let action = PRIORITIES.select_delegate(available)?;
        let mut descriptor = ActionDescriptor::new(action.kind, key("delegate.label"));
        descriptor.description = Some(key("delegate.text"));
        descriptor.input_schema = Some(vec![InputField::new(
            DELEGATE_ARG,
            InputKind::Targets,
            json!(delegatees),
        )]);
        Some(descriptor)
    }

    fn create_undelegate_action(
        &self,
        available: &[AvailableAction<BakerAction>],
    ) -> Option<ActionDescriptor> {
        let action = PRIORITIES.select_undelegate(available)?;
        let mut descriptor = ActionDescriptor::new(action.kind, key("undelegate.label"));
        descriptor.icon = Some("close-outline".to_string());
        Some(descriptor)
    }

    async fn delegatee_details(&self, baker: &str) -> Result<DelegateeDetails> {
        let info = self.client.baker_info(baker).await?;
        let config = self.trusted(baker).cloned();

        let safe_capacity = &info.baker_capacity * &self.config.capacity_factor;
        let usage_details = UsageDetails::new(info.staking_balance.clone(), safe_capacity);
        let status = BakerStatus::of(&info, &usage_details);

        let display_details = DisplayList::new(vec![
            DisplayItem::new(
                "logo-usd",
                config
                    .as_ref()
                    .map(|c| c.fee.format_percentage())
                    .unwrap_or_else(|| "Unknown".to_string()),
                key("fee_label"),
            ),
            DisplayItem::new(
                "timer-outline",
                config
                    .as_ref()
                    .and_then(|c| c.payout.as_ref())
                    .map(|payout| format!("{} Cycles {}", payout.cycles, payout.time))
                    .unwrap_or_else(|| "Unknown".to_string()),
                key("payout-schedule_label"),
            ),
        ]);

        Ok(DelegateeDetails {
            address: info.address.clone(),
            name: config
                .as_ref()
                .map(|c| c.name.clone())
                .unwrap_or_else(|| UNKNOWN.to_string()),
            status: status.to_string(),
            usage_details,
            display_details,
            state: DelegateeState::Baker { info, config },
            reward_estimator: None,
        })
    }

    fn remove_projections() -> Vec<DisplayUpdate> {
        vec![
            DisplayUpdate::replace(NEXT_PAYOUT_ID, None),
            DisplayUpdate::replace(ESTIMATED_RETURN_ID, None),
        ]
    }
}

#[async_trait]
impl DelegationExtension for SingleDelegateExtension {
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
        false
    }

    fn default_delegatee(&self) -> Option<&str> {
        self.trusted_bakers.first().map(|baker| baker.address.as_str())
    }

    async fn fetch_delegation_details(
        &self,
        delegator: &str,
        delegatees: &[String],
    ) -> Result<DelegationDetails> {
        ensure_cardinality(self, delegatees)?;

        let (details, delegation) = tokio::try_join!(
            self.client.delegator_details(delegator),
            self.client.delegation_info(delegator)
        )?;
        let delegator_details = self.delegator_details(details, delegation, delegatees);

        let bakers = try_join_all(
            delegatees
                .iter()
                .map(|baker| self.delegatee_details(baker)),
        )
        .await?;

        Ok(assemble(Vec::new(), delegator_details, bakers))
    }

    async fn fetch_reward_summary(
        &self,
        delegator: &str,
        delegatees: &[String],
    ) -> Result<Option<RewardList>> {
        ensure_cardinality(self, delegatees)?;
        let Some(baker) = delegatees.first() else {
            return Ok(None);
        };

        let records = match self.client.delegation_rewards(baker, Some(delegator)).await {
            Ok(records) => records,
            Err(e) => {
                info!("No reward history for {} at {}: {}", delegator, baker, e);
                return Ok(None);
            }
        };

        let rewards: Vec<RewardRecord> = truncate_history(
            &delegator_cycle_rewards(&records),
            self.config.reward_history_limit,
        )
        .into_iter()
        .map(|(cycle, amount, payout)| RewardRecord {
            index: cycle,
            display_amount: self.format(&amount),
            amount,
            timestamp: payout.timestamp_millis(),
        })
        .collect();

        if rewards.is_empty() {
            return Ok(None);
        }
        Ok(Some(RewardList {
            rewards,
            index_col_label: key("rewards.index-col_label"),
            amount_col_label: key("rewards.amount-col_label"),
            payout_col_label: key("rewards.payout-col_label"),
        }))
    }

    async fn summarize_delegatees(&self, delegatees: &[String]) -> Result<Vec<DelegateeSummary>> {
        Ok(delegatees
            .iter()
            .map(|address| {
                let config = self.trusted(address);
                DelegateeSummary {
                    address: address.clone(),
                    header: [
                        config
                            .map(|c| c.name.clone())
                            .unwrap_or_else(|| UNKNOWN.to_string()),
                        config.map(|c| c.fee.format_percentage()).unwrap_or_default(),
                    ],
                    description: [shorten_address(address), String::new()],
                }
            })
            .collect())
    }

    fn has_enrichment(&self) -> bool {
        true
    }

    async fn enrichment_updates(&self, details: &DelegationDetails) -> Vec<DisplayUpdate> {
        // Placeholders only exist for a single named baker.
        let [baker] = details.delegatees.as_slice() else {
            return Vec::new();
        };
        let delegator = &details.delegator;

        let records = match self
            .client
            .delegation_rewards(&baker.address, Some(delegator.address()))
            .await
        {
            Ok(records) => records,
            Err(e) => {
                info!("Reward projection unavailable for {}: {}", baker.address, e);
                return Self::remove_projections();
            }
        };

        let now = (self.config.clock)();
        let is_delegating = delegator.is_delegating();
        let delegated_date = match &delegator.state {
            DelegatorState::Baker { delegation, .. } => delegation.delegated_date,
            DelegatorState::Nominator(_) => None,
        };
        let payout_cycles = match &baker.state {
            DelegateeState::Baker { config, .. } => config
                .as_ref()
                .and_then(|c| c.payout.as_ref())
                .map(|payout| payout.cycles),
            DelegateeState::Validator(_) => None,
        };

        let next_payout = self.config.cycle.next_payout(
            now,
            is_delegating,
            delegated_date,
            &records,
            payout_cycles,
        );
        debug!("Next payout for {} projected at {}", delegator.address(), next_payout);

        let next_payout_item = DisplayItem::new(
            "alarm-outline",
            humanize(&now, &next_payout),
            if is_delegating {
                key("next-payout_label")
            } else {
                key("first-payout_label")
            },
        );
        let estimated_return =
            average_return_per_cycle(&records, delegator.balance()).map(|amount| {
                DisplayItem::new("logo-usd", self.format(&amount), key("estimated-return_label"))
            });

        vec![
            DisplayUpdate::replace(NEXT_PAYOUT_ID, Some(next_payout_item)),
            DisplayUpdate::replace(ESTIMATED_RETURN_ID, estimated_return),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PayoutSchedule;
    use crate::services::ChainSnapshot;

    fn baker(capacity: u64, staking: u64, active: bool) -> BakerInfo {
        BakerInfo {
            address: "tz1baker".into(),
            baker_capacity: Amount::from(capacity),
            staking_balance: Amount::from(staking),
            baking_active: active,
        }
    }

    fn extension(snapshot: ChainSnapshot, trusted: Vec<BakerConfig>) -> SingleDelegateExtension {
        SingleDelegateExtension::new(
            SingleDelegateConfig::new(ProtocolInfo::new("tezos", "XTZ", 6)),
            Arc::new(snapshot),
            trusted,
        )
    }

    #[test]
    fn status_follows_activity_then_usage() {
        let usage = |info: &BakerInfo| {
            UsageDetails::new(
                info.staking_balance.clone(),
                &info.baker_capacity * &Ratio::checked(7, 10).unwrap(),
            )
        };

        let full = baker(10000, 8000, true);
        assert_eq!(BakerStatus::of(&full, &usage(&full)), BakerStatus::ReachedFullCapacity);

        let open = baker(10000, 6000, true);
        assert_eq!(BakerStatus::of(&open, &usage(&open)), BakerStatus::AcceptsDelegation);

        let off = baker(10000, 6000, false);
        assert_eq!(BakerStatus::of(&off, &usage(&off)).to_string(), "Deactivated");
    }

    #[tokio::test]
    async fn untrusted_bakers_show_unknown_terms() {
        let ext = extension(ChainSnapshot::default().with_baker(baker(10000, 8000, true)), vec![]);
        let details = ext.delegatee_details("tz1baker").await.unwrap();

        assert_eq!(details.name, "unknown");
        assert_eq!(details.status, "Reached Full Capacity");
        let items = details.display_details.snapshot();
        assert_eq!(items[0].text, DisplayText::Plain("Unknown".into()));
        assert_eq!(items[1].text, DisplayText::Plain("Unknown".into()));
    }

    #[tokio::test]
    async fn trusted_terms_are_displayed() {
        let trusted = BakerConfig {
            address: "tz1baker".into(),
            name: "Baker One".into(),
            fee: Ratio::parse("0.15").unwrap(),
            payout: Some(PayoutSchedule {
                cycles: 6,
                time: "after end".into(),
            }),
        };
        let ext = extension(
            ChainSnapshot::default().with_baker(baker(10000, 1000, true)),
            vec![trusted],
        );

        assert_eq!(ext.default_delegatee(), Some("tz1baker"));
        let details = ext.delegatee_details("tz1baker").await.unwrap();
        assert_eq!(details.name, "Baker One");
        let items = details.display_details.snapshot();
        assert_eq!(items[0].text, DisplayText::Plain("15%".into()));
        assert_eq!(items[1].text, DisplayText::Plain("6 Cycles after end".into()));
    }
}
