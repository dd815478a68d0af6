//! Customer orders and randomized order generation

use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::catalog::{BubbleId, LiquidId};
use crate::consts::{MIN_REPUTATION, PRICE_PER_BUBBLE, PRICE_PER_LIQUID};

/// A requested drink with a deadline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Sequential order number within the level (1-based)
    pub index: u32,
    pub liquids: BTreeSet<LiquidId>,
    /// Whether the drink must be shaken into a single blended layer
    pub needs_shake: bool,
    pub bubbles: BTreeSet<BubbleId>,
    pub start_time: f32,
    pub end_time: f32,
    pub price: u64,
}

/// What a level allows an order to ask for
#[derive(Debug, Clone, Copy)]
pub struct OrderPolicy<'a> {
    pub liquids: &'a [LiquidId],
    pub max_liquids: usize,
    /// Drawn uniformly; a single entry pins the shake requirement
    pub shake_choices: &'a [bool],
    pub bubbles: &'a [BubbleId],
    pub max_bubbles: usize,
    /// Seconds allowed to fulfill an order, `[min, max)`
    pub time_range: (f32, f32),
}

impl Order {
    /// Draw a random order. The price is left at zero; the economy prices it.
    pub fn generate<R: Rng + ?Sized>(
        policy: &OrderPolicy<'_>,
        rng: &mut R,
        now: f32,
        index: u32,
    ) -> Self {
        let liquids = sample_distinct(policy.liquids, policy.max_liquids, rng);
        let bubbles = sample_distinct(policy.bubbles, policy.max_bubbles, rng);
        let needs_shake = policy.shake_choices.choose(rng).copied().unwrap_or(false);

        let (min, max) = policy.time_range;
        let time_allowed = if max > min {
            rng.random_range(min..max)
        } else {
            min
        };

        Self {
            index,
            liquids,
            needs_shake,
            bubbles,
            start_time: now,
            end_time: now + time_allowed,
            price: 0,
        }
    }

    pub fn with_price(mut self, price: u64) -> Self {
        self.price = price;
        self
    }

    /// Two-digit order number shown on the ticket
    pub fn label(&self) -> String {
        format!("{:02}", self.index)
    }

    pub fn is_expired(&self, now: f32) -> bool {
        now > self.end_time
    }

    /// Fraction of time remaining: 1.0 when placed, 0.0 at the deadline
    pub fn progress(&self, now: f32) -> f32 {
        let duration = self.end_time - self.start_time;
        if duration <= 0.0 {
            return 0.0;
        }
        ((self.end_time - now) / duration).clamp(0.0, 1.0)
    }
}

/// Payout for an order of the given size at the current reputation
pub fn price_for(liquid_count: usize, bubble_count: usize, reputation: f32) -> u64 {
    let base = liquid_count as f32 * PRICE_PER_LIQUID + bubble_count as f32 * PRICE_PER_BUBBLE;
    let scale = (reputation - MIN_REPUTATION) / 2.0;
    (base * scale).round().max(0.0) as u64
}

/// Pick between 1 and `min(max, pool.len())` distinct entries; empty if either is zero
fn sample_distinct<T, R>(pool: &[T], max: usize, rng: &mut R) -> BTreeSet<T>
where
    T: Copy + Ord,
    R: Rng + ?Sized,
{
    let upper = max.min(pool.len());
    if upper == 0 {
        return BTreeSet::new();
    }
    let count = rng.random_range(1..=upper);
    pool.choose_multiple(rng, count).copied().collect()
}
