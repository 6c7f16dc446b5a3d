//! Expected-reward item that follows the amount typed into the delegate form.
//!
//! Every edit takes a new generation number. A computation may only write its text while
//! its generation is still the latest one; results of superseded edits are dropped.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use futures::{Stream, StreamExt};
use log::debug;
use tokio::task::JoinHandle;

use super::rewards::expected_reward;
use crate::models::{Amount, DisplayList, DisplayText, ProtocolInfo, Ratio};

const DISPLAY_FRACTION_DIGITS: u32 = 4;

/// Validator figures the projection is computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardInputs {
    pub protocol: ProtocolInfo,
    pub commission: Ratio,
    pub last_era_reward: Amount,
    pub total_validator_stake: Amount,
    /// Stake the nominator already has bonded.
    pub bonded: Amount,
}

impl RewardInputs {
    pub fn expected_reward(&self, stake: &Amount) -> Amount {
        expected_reward(
            &self.commission,
            &self.last_era_reward,
            &self.total_validator_stake,
            stake,
        )
    }

    pub fn text_for(&self, stake: &Amount) -> DisplayText {
        DisplayText::Plain(
            self.expected_reward(stake)
                .format(&self.protocol, DISPLAY_FRACTION_DIGITS),
        )
    }
}

#[derive(Clone)]
pub struct RewardEstimator {
    item_id: String,
    inputs: Arc<RewardInputs>,
    display: DisplayList,
    latest: Arc<Mutex<u64>>,
}

impl RewardEstimator {
    pub fn new(item_id: impl Into<String>, inputs: RewardInputs, display: DisplayList) -> Self {
        Self {
            item_id: item_id.into(),
            inputs: Arc::new(inputs),
            display,
            latest: Arc::new(Mutex::new(0)),
        }
    }

    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    pub fn inputs(&self) -> &RewardInputs {
        &self.inputs
    }

    /// Registers an edit of the form's base-unit `value` field. An unparsable value counts as
    /// zero additional stake.
    pub fn submit(&self, edited_value: &str) -> EstimateTicket {
        let additional = Amount::parse(edited_value).unwrap_or_default();
        let mut latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        *latest += 1;
        EstimateTicket {
            generation: *latest,
            stake: &self.inputs.bonded + &additional,
            estimator: self.clone(),
        }
    }

    /// Submits an edit and resolves it on the runtime.
    pub fn spawn_update(&self, edited_value: &str) -> JoinHandle<bool> {
        let ticket = self.submit(edited_value);
        tokio::spawn(async move { ticket.resolve() })
    }

    /// Follows a stream of edited values until it ends.
    pub async fn watch<S>(&self, edits: S)
    where
        S: Stream<Item = String>,
    {
        let pending: Vec<_> = edits
            .map(|edit| self.spawn_update(&edit))
            .collect()
            .await;
        futures::future::join_all(pending).await;
    }

    fn apply(&self, generation: u64, text: DisplayText) -> bool {
        let latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        if *latest != generation {
            debug!(
                "Dropping stale estimate {} for {}, latest is {}",
                generation, self.item_id, *latest
            );
            return false;
        }
        self.display.set_text(&self.item_id, text)
    }
}

impl PartialEq for RewardEstimator {
    fn eq(&self, other: &Self) -> bool {
        self.item_id == other.item_id && self.inputs == other.inputs
    }
}

impl fmt::Debug for RewardEstimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RewardEstimator")
            .field("item_id", &self.item_id)
            .field("inputs", &self.inputs)
            .finish()
    }
}

/// One pending recomputation.
pub struct EstimateTicket {
    generation: u64,
    stake: Amount,
    estimator: RewardEstimator,
}

impl EstimateTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn stake(&self) -> &Amount {
        &self.stake
    }

    /// Computes the estimate and writes it if no newer edit arrived meanwhile.
    pub fn resolve(self) -> bool {
        let text = self.estimator.inputs.text_for(&self.stake);
        self.estimator.apply(self.generation, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DisplayItem;

    const ID: &str = "expected_reward";

    fn estimator() -> (RewardEstimator, DisplayList) {
        let inputs = RewardInputs {
            protocol: ProtocolInfo::new("polkadot", "DOT", 0),
            commission: Ratio::parse("0.1").unwrap(),
            last_era_reward: Amount::from(1000),
            total_validator_stake: Amount::from(9000),
            bonded: Amount::zero(),
        };
        let list = DisplayList::new(vec![
            DisplayItem::new("logo-usd", inputs.text_for(&Amount::zero()), "reward").with_id(ID),
        ]);
        (RewardEstimator::new(ID, inputs, list.clone()), list)
    }

    fn text(list: &DisplayList) -> DisplayText {
        list.find(ID).unwrap().text
    }

    #[test]
    fn newer_edit_wins_over_slower_older_one() {
        let (estimator, list) = estimator();
        let a = estimator.submit("1000");
        let b = estimator.submit("3000");

        assert!(b.resolve());
        assert!(!a.resolve());
        // 0.9 * 1000 * 3000 / 12000
        assert_eq!(text(&list), DisplayText::Plain("225 DOT".into()));
    }

    #[test]
    fn edits_resolved_in_order_all_apply() {
        let (estimator, list) = estimator();
        assert!(estimator.submit("1000").resolve());
        assert_eq!(text(&list), DisplayText::Plain("90 DOT".into()));
        assert!(estimator.submit("not a number").resolve());
        assert_eq!(text(&list), DisplayText::Plain("0 DOT".into()));
    }

    #[tokio::test]
    async fn watching_a_stream_leaves_the_last_edit() {
        let (estimator, list) = estimator();
        let edits = futures::stream::iter(vec!["1000".to_string(), "3000".to_string()]);
        estimator.watch(edits).await;
        assert_eq!(text(&list), DisplayText::Plain("225 DOT".into()));
    }
}
