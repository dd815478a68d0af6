//! Deterministic simulation module
//!
//! All order and economy logic lives here. This module must be pure and
//! deterministic:
//! - Time advances only through `tick`
//! - Seeded RNG only
//! - Stable iteration order (ordered maps keyed by ID)
//! - No rendering, physics or platform dependencies

pub mod autoplay;
pub mod catalog;
pub mod check;
pub mod cup;
pub mod dispenser;
pub mod order;
pub mod state;
pub mod tick;

pub use catalog::{BubbleId, BubbleShape, BubbleType, Catalog, LiquidId, LiquidType};
pub use check::{CheckResult, check};
pub use cup::{Composition, Cup, Liquid, blend_color};
pub use dispenser::Dispenser;
pub use order::{Order, OrderPolicy, price_for};
pub use state::{GameEvent, GameState, LevelPhase, OrderStats, OrderView, Snapshot};
pub use tick::{TickInput, spawn_probability, submit, tick};
