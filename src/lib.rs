//! Bubble Tea - order-fulfillment core for a layered-drink arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (cups, orders, validation, economy)
//! - `level`: Data-driven level configuration and campaign progression
//!
//! Rendering, physics and input live in the presentation layer, which drives
//! the simulation through `sim::tick`, `sim::submit` and the `Cup` mutators.

pub mod level;
pub mod sim;

pub use level::{LevelConfig, LevelError, LevelGoal, LevelSet};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Nominal cup volume; dispensers stop pouring here
    pub const CUP_CAPACITY: f32 = 1.0;
    /// Minimum volume for a cup to count as full (90% of capacity)
    pub const FULL_THRESHOLD: f32 = 0.9;
    /// Layers at or below this volume are dropped after a drain
    pub const AMOUNT_EPSILON: f32 = 1e-5;

    /// Reputation bounds (stars)
    pub const MIN_REPUTATION: f32 = 1.0;
    pub const MAX_REPUTATION: f32 = 5.0;
    /// Reputation at the start of every level attempt
    pub const STARTING_REPUTATION: f32 = 3.0;

    /// Price weight per required liquid
    pub const PRICE_PER_LIQUID: f32 = 1.5;
    /// Price weight per required topping
    pub const PRICE_PER_BUBBLE: f32 = 0.5;

    /// Mean seconds between order arrivals at order frequency 1.0
    pub const BASE_ORDER_INTERVAL: f32 = 10.0;
    /// Default cap on simultaneously queued orders
    pub const DEFAULT_ORDER_LIMIT: usize = 5;

    /// Reputation lost when an order runs out of time
    pub const EXPIRY_PENALTY: f32 = 0.5;

    /// Accumulated flow a dispenser waits for before liquid reaches the cup
    pub const DISPENSER_START_DELAY: f32 = 0.1;
    /// Default dispenser flow rate (cup volumes per second)
    pub const DISPENSER_FLOW_RATE: f32 = 0.25;
}

/// Clamp a reputation value to the valid star range
#[inline]
pub fn clamp_reputation(reputation: f32) -> f32 {
    reputation.clamp(consts::MIN_REPUTATION, consts::MAX_REPUTATION)
}
