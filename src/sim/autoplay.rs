//! Scripted player
//!
//! Serves queued orders with correctly prepared cups. Used by the headless
//! runner for demo and balance runs, and by tests that need a level to
//! progress on its own.

use std::cmp::Ordering;

use super::check::CheckResult;
use super::cup::Cup;
use super::order::Order;
use super::state::GameState;
use super::tick::submit;
use crate::consts::CUP_CAPACITY;

/// The queued order closest to its deadline
pub fn most_urgent(state: &GameState) -> Option<&Order> {
    state
        .orders
        .iter()
        .min_by(|a, b| a.end_time.partial_cmp(&b.end_time).unwrap_or(Ordering::Equal))
}

/// Build a cup that satisfies `order`: equal pours of each liquid filling the
/// cup, shaken if required, one of each topping.
pub fn prepare_cup(order: &Order) -> Cup {
    let mut cup = Cup::new();
    if !order.liquids.is_empty() {
        let share = CUP_CAPACITY / order.liquids.len() as f32;
        for &liquid in &order.liquids {
            cup.pour(liquid, share);
        }
    }
    if order.needs_shake {
        cup.blend();
    }
    for &bubble in &order.bubbles {
        cup.add_topping(bubble);
    }
    cup
}

/// Serve the most urgent order once it has waited at least `min_age`
/// seconds. Returns the check result, or `None` if nothing was served.
pub fn serve(state: &mut GameState, min_age: f32) -> Option<CheckResult> {
    let now = state.elapsed;
    let (index, cup) = {
        let order = most_urgent(state)?;
        if now - order.start_time < min_age {
            return None;
        }
        (order.index, prepare_cup(order))
    };
    submit(state, index, &cup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{LevelConfig, LevelGoal};
    use crate::sim::catalog::{BubbleId, LiquidId};
    use crate::sim::check::check;

    fn order(index: u32, liquids: &[u32], needs_shake: bool, bubbles: &[u32], end_time: f32) -> Order {
        Order {
            index,
            liquids: liquids.iter().map(|&i| LiquidId(i)).collect(),
            needs_shake,
            bubbles: bubbles.iter().map(|&i| BubbleId(i)).collect(),
            start_time: 0.0,
            end_time,
            price: 3,
        }
    }

    #[test]
    fn test_prepared_cups_pass_check() {
        let orders = [
            order(1, &[0], false, &[], 30.0),
            order(2, &[0, 1, 2], false, &[0], 30.0),
            order(3, &[0, 1, 2], true, &[0, 1], 30.0),
            order(4, &[3], true, &[2], 30.0),
        ];
        for o in &orders {
            assert_eq!(check(o, &prepare_cup(o)), CheckResult::Valid, "order {}", o.index);
        }
    }

    #[test]
    fn test_most_urgent() {
        let mut state = GameState::new(LevelConfig::new(LevelGoal::TargetMoney { target: 100 }), 1);
        assert!(most_urgent(&state).is_none());
        state.push_order(order(1, &[0], false, &[], 50.0));
        state.push_order(order(2, &[0], false, &[], 20.0));
        state.push_order(order(3, &[0], false, &[], 40.0));
        assert_eq!(most_urgent(&state).map(|o| o.index), Some(2));
    }

    #[test]
    fn test_serve_waits_for_min_age() {
        let mut state = GameState::new(LevelConfig::new(LevelGoal::TargetMoney { target: 100 }), 1);
        state.push_order(order(1, &[0, 1], true, &[0], 50.0));
        state.elapsed = 1.0;
        assert_eq!(serve(&mut state, 2.0), None);
        assert_eq!(state.orders.len(), 1);

        state.elapsed = 2.5;
        assert_eq!(serve(&mut state, 2.0), Some(CheckResult::Valid));
        assert!(state.orders.is_empty());
        assert_eq!(state.money, 3);
        assert_eq!(state.stats.fulfilled, 1);
    }
}
