//! Economy state and core simulation types
//!
//! Everything one level attempt needs lives in `GameState`. It is owned by the
//! host and passed by `&mut` into `tick`/`submit`; the presentation layer reads
//! an owned `Snapshot` afterwards instead of holding on to the state.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::catalog::{BubbleId, LiquidId};
use super::check::CheckResult;
use super::order::Order;
use crate::consts::STARTING_REPUTATION;
use crate::level::LevelConfig;

/// Current phase of a level attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelPhase {
    /// Orders arrive and age
    Playing,
    /// Clock frozen
    Paused,
    /// Goal reached
    Won,
    /// Time ran out short of the goal
    Lost,
}

impl LevelPhase {
    pub fn is_finished(&self) -> bool {
        matches!(self, LevelPhase::Won | LevelPhase::Lost)
    }
}

/// Something the presentation layer may want to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    OrderSpawned { index: u32, price: u64 },
    OrderExpired { index: u32 },
    OrderFulfilled { index: u32, price: u64 },
    OrderFailed { index: u32, price: u64, result: CheckResult },
    LevelWon { money: u64 },
    LevelLost { money: u64 },
}

/// Running totals for the current attempt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStats {
    pub fulfilled: u32,
    pub failed: u32,
    pub expired: u32,
}

/// Complete state of one level attempt (deterministic for a given seed)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Level being played
    pub level: LevelConfig,
    pub money: u64,
    /// Stars, always within [1, 5]
    pub reputation: f32,
    /// Seconds of unpaused play since the level loaded
    pub elapsed: f32,
    pub phase: LevelPhase,
    /// Queued orders, oldest first
    pub orders: Vec<Order>,
    pub stats: OrderStats,
    /// Pending events, drained by the presentation layer
    pub events: Vec<GameEvent>,
    /// Number given to the next generated order
    pub(crate) next_index: u32,
}

impl GameState {
    /// Create a fresh attempt at `level`
    pub fn new(level: LevelConfig, seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            level,
            money: 0,
            reputation: STARTING_REPUTATION,
            elapsed: 0.0,
            phase: LevelPhase::Playing,
            orders: Vec::new(),
            stats: OrderStats::default(),
            events: Vec::new(),
            next_index: 1,
        }
    }

    /// Switch to another level and start it from scratch
    pub fn load_level(&mut self, level: LevelConfig) {
        log::info!("Loading level '{}'", level.display_name());
        self.level = level;
        self.reset();
    }

    /// Restart the current level (same seed, same order sequence)
    pub fn reset(&mut self) {
        *self = Self::new(self.level.clone(), self.seed);
    }

    /// Queue an order if there is room. Returns false when the queue is full.
    pub fn push_order(&mut self, order: Order) -> bool {
        if self.orders.len() >= self.level.rules.order_limit {
            return false;
        }
        self.orders.push(order);
        true
    }

    pub fn order(&self, index: u32) -> Option<&Order> {
        self.orders.iter().find(|o| o.index == index)
    }

    /// Remove an order from the queue
    pub fn take_order(&mut self, index: u32) -> Option<Order> {
        let pos = self.orders.iter().position(|o| o.index == index)?;
        Some(self.orders.remove(pos))
    }

    /// Allocate the next order number
    pub(crate) fn next_order_index(&mut self) -> u32 {
        let index = self.next_index;
        self.next_index += 1;
        index
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Seconds left on the level clock, if it has one
    pub fn time_remaining(&self) -> Option<f32> {
        self.level
            .goal
            .time_limit()
            .map(|limit| (limit - self.elapsed).max(0.0))
    }

    /// Owned copy of everything the HUD shows
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            level_name: self.level.display_name().to_string(),
            phase: self.phase,
            money: self.money,
            target_money: self.level.goal.target_money(),
            reputation: self.reputation,
            elapsed: self.elapsed,
            time_remaining: self.time_remaining(),
            stats: self.stats,
            orders: self
                .orders
                .iter()
                .map(|order| OrderView {
                    index: order.index,
                    label: order.label(),
                    price: order.price,
                    needs_shake: order.needs_shake,
                    liquids: order.liquids.iter().copied().collect(),
                    bubbles: order.bubbles.iter().copied().collect(),
                    progress: order.progress(self.elapsed),
                })
                .collect(),
        }
    }
}

/// HUD view of a queued order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderView {
    pub index: u32,
    pub label: String,
    pub price: u64,
    pub needs_shake: bool,
    pub liquids: Vec<LiquidId>,
    pub bubbles: Vec<BubbleId>,
    /// Remaining time fraction (1.0 fresh, 0.0 at the deadline)
    pub progress: f32,
}

/// Point-in-time copy of the economy for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub level_name: String,
    pub phase: LevelPhase,
    pub money: u64,
    pub target_money: u64,
    pub reputation: f32,
    pub elapsed: f32,
    pub time_remaining: Option<f32>,
    pub stats: OrderStats,
    pub orders: Vec<OrderView>,
}
