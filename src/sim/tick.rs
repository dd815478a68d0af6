//! Simulation tick and order submission
//!
//! The host calls `tick` once per frame and `submit` when the player hands
//! over a cup. Both run to completion before the next call, so queue
//! mutations never interleave.

use rand::Rng;

use super::check::{CheckResult, check};
use super::cup::Cup;
use super::order::{Order, price_for};
use super::state::{GameEvent, GameState, LevelPhase};
use crate::clamp_reputation;
use crate::consts::{BASE_ORDER_INTERVAL, EXPIRY_PENALTY};
use crate::level::LevelGoal;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pause toggle
    pub pause: bool,
}

/// Advance the level by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            LevelPhase::Playing => {
                state.phase = LevelPhase::Paused;
                return;
            }
            LevelPhase::Paused => state.phase = LevelPhase::Playing,
            _ => {}
        }
    }

    if state.phase != LevelPhase::Playing {
        return;
    }

    state.elapsed += dt;

    expire_orders(state);
    spawn_order(state, dt);
    evaluate_time_limit(state);
}

/// Present `cup` for the queued order numbered `order_index`.
///
/// The order leaves the queue whatever the outcome and its price is always
/// paid; the result only decides whether reputation rises or falls. Returns
/// `None` (and changes nothing) if the order is no longer queued or the
/// level is not being played.
pub fn submit(state: &mut GameState, order_index: u32, cup: &Cup) -> Option<CheckResult> {
    if state.phase != LevelPhase::Playing {
        log::warn!("Ignoring submission for order {} while {:?}", order_index, state.phase);
        return None;
    }
    let Some(order) = state.take_order(order_index) else {
        log::warn!("Order {} is not queued", order_index);
        return None;
    };

    let result = check(&order, cup);
    state.money += order.price;

    if result.is_valid() {
        state.reputation =
            clamp_reputation(state.reputation + state.level.rules.reputation_per_correct_order);
        state.stats.fulfilled += 1;
        log::debug!("Order {} fulfilled for ${}", order.index, order.price);
        state.events.push(GameEvent::OrderFulfilled {
            index: order.index,
            price: order.price,
        });
    } else {
        let loss = result.reputation_penalty() * state.level.rules.reputation_loss_multiplier;
        state.reputation = clamp_reputation(state.reputation - loss);
        state.stats.failed += 1;
        log::debug!("Order {} failed: {}", order.index, result.as_str());
        state.events.push(GameEvent::OrderFailed {
            index: order.index,
            price: order.price,
            result: result.clone(),
        });
    }

    evaluate_target_money(state);
    Some(result)
}

/// Probability that an order arrives during a tick of length `dt`
pub fn spawn_probability(order_frequency: f32, dt: f32) -> f32 {
    let interval = BASE_ORDER_INTERVAL / order_frequency;
    let p = dt / interval;
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
}

/// Drop orders past their deadline, costing reputation for each
fn expire_orders(state: &mut GameState) {
    let now = state.elapsed;
    if !state.orders.iter().any(|o| o.is_expired(now)) {
        return;
    }

    let (expired, active): (Vec<Order>, Vec<Order>) = std::mem::take(&mut state.orders)
        .into_iter()
        .partition(|o| o.is_expired(now));
    state.orders = active;

    let loss = EXPIRY_PENALTY * state.level.rules.reputation_loss_multiplier;
    for order in expired {
        state.reputation = clamp_reputation(state.reputation - loss);
        state.stats.expired += 1;
        log::debug!("Order {} expired", order.index);
        state.events.push(GameEvent::OrderExpired { index: order.index });
    }
}

/// Maybe generate a new order; skipped silently while the queue is full
fn spawn_order(state: &mut GameState, dt: f32) {
    if state.orders.len() >= state.level.rules.order_limit {
        return;
    }
    let p = spawn_probability(state.level.rules.order_frequency, dt);
    if p <= 0.0 || !state.rng.random_bool(p as f64) {
        return;
    }

    let index = state.next_order_index();
    let order = Order::generate(&state.level.order_policy(), &mut state.rng, state.elapsed, index);
    let price = price_for(order.liquids.len(), order.bubbles.len(), state.reputation);
    let order = order.with_price(price);

    log::debug!(
        "Order {} placed: {} liquids, {} bubbles, shake={}, ${}, due at {:.1}s",
        order.index,
        order.liquids.len(),
        order.bubbles.len(),
        order.needs_shake,
        order.price,
        order.end_time
    );
    state.events.push(GameEvent::OrderSpawned {
        index: order.index,
        price: order.price,
    });
    state.push_order(order);
}

fn evaluate_target_money(state: &mut GameState) {
    if let LevelGoal::TargetMoney { target } = state.level.goal {
        if state.money >= target {
            finish(state, true);
        }
    }
}

fn evaluate_time_limit(state: &mut GameState) {
    if let LevelGoal::TimeLimit {
        target_money,
        seconds,
    } = state.level.goal
    {
        if state.elapsed > seconds {
            finish(state, state.money >= target_money);
        }
    }
}

fn finish(state: &mut GameState, won: bool) {
    if state.phase.is_finished() {
        return;
    }
    let money = state.money;
    if won {
        state.phase = LevelPhase::Won;
        log::info!("Level '{}' won with ${}", state.level.display_name(), money);
        state.events.push(GameEvent::LevelWon { money });
    } else {
        state.phase = LevelPhase::Lost;
        log::info!("Level '{}' lost with ${}", state.level.display_name(), money);
        state.events.push(GameEvent::LevelLost { money });
    }
}
