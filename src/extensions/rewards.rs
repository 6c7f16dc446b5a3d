//! Reward history and forward projections. Pure functions over already fetched data.

use chrono::{DateTime, Duration, Utc};

use crate::models::{Amount, BakerRewardRecord, Ratio};

/// Rewards shown in a history list.
pub const REWARD_HISTORY_LIMIT: usize = 5;

/// `(1 - commission) * last_era_reward * stake / (total_validator_stake + stake)`.
///
/// A zero denominator (no stake at all) projects no reward.
pub fn expected_reward(
    commission: &Ratio,
    last_era_reward: &Amount,
    total_validator_stake: &Amount,
    stake: &Amount,
) -> Amount {
    let pool = total_validator_stake + stake;
    match stake.ratio_to(&pool) {
        Some(share) => &(last_era_reward * &commission.complement()) * &share,
        None => Amount::zero(),
    }
}

/// Keeps the first `limit` records exactly as the source ordered them.
pub fn truncate_history<T: Clone>(records: &[T], limit: usize) -> Vec<T> {
    records.iter().take(limit).cloned().collect()
}

/// Mean per-cycle return `(totalRewards + totalFees) / stakingBalance` over all records,
/// scaled by `balance`. Records without staking balance are skipped.
pub fn average_return_per_cycle(records: &[BakerRewardRecord], balance: &Amount) -> Option<Amount> {
    let per_cycle = records.iter().filter_map(|record| {
        (&record.total_rewards + &record.total_fees).ratio_to(&record.staking_balance)
    });
    Ratio::mean(per_cycle).map(|mean| balance * &mean)
}

/// The delegator's share of each cycle it had stake in: `(rewards + fees) * delegated / staking`.
pub fn delegator_cycle_rewards(records: &[BakerRewardRecord]) -> Vec<(u64, Amount, DateTime<Utc>)> {
    records
        .iter()
        .filter(|record| record.delegated_balance.is_positive())
        .filter_map(|record| {
            let share = record.delegated_balance.ratio_to(&record.staking_balance)?;
            let reward = &(&record.total_rewards + &record.total_fees) * &share;
            Some((record.cycle, reward, record.payout))
        })
        .collect()
}

/// Cycle arithmetic of a single-delegate chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayoutCycle {
    pub hours_per_cycle: i64,
    /// Cycles a fresh delegation waits before it is counted.
    pub preserved_cycles: i64,
}

impl PayoutCycle {
    /// `(hours_per_cycle * preserved_cycles + payout_cycles)` hours.
    pub fn delay(&self, payout_cycles: Option<u32>) -> Duration {
        Duration::hours(
            self.hours_per_cycle * self.preserved_cycles + i64::from(payout_cycles.unwrap_or(0)),
        )
    }

    /// Projected date of the next payout.
    ///
    /// While delegating, the first cycle with delegated balance gives the date, unless the
    /// delay counted from the delegation date lands later. Otherwise the delay is counted
    /// from `now`.
    pub fn next_payout(
        &self,
        now: DateTime<Utc>,
        is_delegating: bool,
        delegated_date: Option<DateTime<Utc>>,
        records: &[BakerRewardRecord],
        payout_cycles: Option<u32>,
    ) -> DateTime<Utc> {
        let delay = self.delay(payout_cycles);
        if !is_delegating {
            return now + delay;
        }

        let next = records
            .iter()
            .find(|record| record.delegated_balance.is_positive())
            .map(|record| record.payout)
            .unwrap_or(now + delay);
        let from_delegation = delegated_date.unwrap_or(now) + delay;

        next.max(from_delegation)
    }
}
