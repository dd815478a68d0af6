//! End-to-end gameplay scenarios driven through the public API.

use std::collections::BTreeSet;

use bubble_tea::consts::{CUP_CAPACITY, SIM_DT, STARTING_REPUTATION};
use bubble_tea::sim::*;
use bubble_tea::{LevelConfig, LevelGoal, LevelSet};

fn order(index: u32, liquids: &[LiquidId], needs_shake: bool, bubbles: &[BubbleId], price: u64) -> Order {
    Order {
        index,
        liquids: liquids.iter().copied().collect(),
        needs_shake,
        bubbles: bubbles.iter().copied().collect(),
        start_time: 0.0,
        end_time: 60.0,
        price,
    }
}

/// A level where orders only appear when a test queues them
fn quiet_level(goal: LevelGoal) -> LevelConfig {
    let mut level = LevelConfig::new(goal);
    level.name = Some("Quiet".to_string());
    level.rules.order_frequency = 1e-9;
    level
}

fn run_for(state: &mut GameState, seconds: f32) {
    let steps = (seconds / SIM_DT).round() as u32;
    for _ in 0..steps {
        tick(state, &TickInput::default(), SIM_DT);
    }
}

#[test]
fn test_dispensed_drink_earns_money() {
    let set = LevelSet::builtin();
    let tea = set.catalog.liquid_by_name("Tea").unwrap();
    let milk = set.catalog.liquid_by_name("Milk").unwrap();
    let tapioca = set.catalog.bubble_by_name("Tapioca").unwrap();

    let mut state = GameState::new(quiet_level(LevelGoal::TargetMoney { target: 100 }), 7);
    let price = price_for(2, 1, STARTING_REPUTATION);
    state.push_order(order(1, &[tea, milk], false, &[tapioca], price));

    // Half a cup from each tap
    let mut cup = Cup::new();
    let mut tea_tap = Dispenser::new(tea).with_flow_rate(0.5);
    while cup.total_liquid() < 0.5 {
        tea_tap.update(Some(&mut cup), SIM_DT);
    }
    tea_tap.update(None, SIM_DT);
    let mut milk_tap = Dispenser::new(milk).with_flow_rate(0.5);
    for _ in 0..600 {
        milk_tap.update(Some(&mut cup), SIM_DT);
    }
    cup.add_topping(tapioca);

    assert!((cup.total_liquid() - CUP_CAPACITY).abs() < 1e-4);
    assert_eq!(cup.layers().len(), 2);

    let result = submit(&mut state, 1, &cup);
    assert_eq!(result, Some(CheckResult::Valid));
    assert_eq!(state.money, price);
    assert!(state.reputation > STARTING_REPUTATION);
    assert!(state.orders.is_empty());
}

#[test]
fn test_target_money_reached_by_single_order() {
    let mut state = GameState::new(quiet_level(LevelGoal::TargetMoney { target: 20 }), 1);
    state.push_order(order(1, &[LiquidId(0)], false, &[], 25));

    let mut cup = Cup::new();
    cup.pour(LiquidId(0), 1.0);
    submit(&mut state, 1, &cup);

    assert_eq!(state.money, 25);
    assert_eq!(state.phase, LevelPhase::Won);
    let events = state.drain_events();
    assert_eq!(
        events,
        vec![
            GameEvent::OrderFulfilled { index: 1, price: 25 },
            GameEvent::LevelWon { money: 25 },
        ]
    );

    // Nothing moves after the level ends
    run_for(&mut state, 5.0);
    assert_eq!(state.elapsed, 0.0);
}

#[test]
fn test_layered_cup_for_shaken_order() {
    let tea = LiquidId(0);
    let milk = LiquidId(1);
    let mut state = GameState::new(quiet_level(LevelGoal::TargetMoney { target: 100 }), 1);
    state.push_order(order(1, &[tea, milk], true, &[], 4));
    state.push_order(order(2, &[tea, milk], true, &[], 4));

    let mut cup = Cup::new();
    cup.pour(tea, 0.5);
    cup.pour(milk, 0.5);

    assert_eq!(submit(&mut state, 1, &cup), Some(CheckResult::NeedsShake));
    assert!((state.reputation - (STARTING_REPUTATION - 0.3)).abs() < 1e-6);
    // Paid anyway
    assert_eq!(state.money, 4);

    cup.blend();
    assert_eq!(submit(&mut state, 2, &cup), Some(CheckResult::Valid));
    assert_eq!(state.money, 8);
    assert_eq!(state.stats.failed, 1);
    assert_eq!(state.stats.fulfilled, 1);
}

#[test]
fn test_time_limit_runs_out() {
    let goal = LevelGoal::TimeLimit {
        target_money: 10,
        seconds: 3.0,
    };
    let mut state = GameState::new(quiet_level(goal), 1);
    state.push_order(order(1, &[LiquidId(0)], false, &[], 6));
    let mut cup = Cup::new();
    cup.pour(LiquidId(0), 1.0);
    submit(&mut state, 1, &cup);

    run_for(&mut state, 2.0);
    assert_eq!(state.phase, LevelPhase::Playing);
    let remaining = state.time_remaining().unwrap();
    assert!((remaining - 1.0).abs() < 1e-3);

    run_for(&mut state, 1.5);
    assert_eq!(state.phase, LevelPhase::Lost);
    assert!(state.drain_events().contains(&GameEvent::LevelLost { money: 6 }));
    assert_eq!(state.time_remaining(), Some(0.0));
    assert_eq!(LevelSet::builtin().follow_up(0, state.phase), Some(0));
}

#[test]
fn test_ignored_orders_expire() {
    let mut level = LevelConfig::new(LevelGoal::TargetMoney { target: 100 });
    level.liquids = vec![LiquidId(0), LiquidId(1)];
    level.rules.order_frequency = 10.0;
    level.rules.order_time_range = (2.0, 3.0);
    level.rules.order_limit = 3;
    let mut state = GameState::new(level, 11);

    run_for(&mut state, 30.0);

    assert!(state.stats.expired > 0);
    assert_eq!(state.reputation, 1.0);
    assert!(state.orders.len() <= 3);
    assert!(state.orders.iter().all(|o| !o.is_expired(state.elapsed)));
}

#[test]
fn test_order_numbers_are_sequential() {
    let mut level = LevelConfig::new(LevelGoal::TargetMoney { target: 1000 });
    level.liquids = vec![LiquidId(0)];
    level.rules.order_frequency = 5.0;
    level.rules.order_time_range = (100.0, 200.0);
    level.rules.order_limit = 4;
    let mut state = GameState::new(level, 3);

    run_for(&mut state, 60.0);
    let labels: Vec<String> = state.snapshot().orders.iter().map(|o| o.label.clone()).collect();
    assert_eq!(labels, vec!["01", "02", "03", "04"]);

    // Freed slot takes the next number, not a reused one
    let first = autoplay::most_urgent(&state).map(|o| o.index).unwrap();
    autoplay::serve(&mut state, 0.0);
    run_for(&mut state, 60.0);
    let indices: BTreeSet<u32> = state.orders.iter().map(|o| o.index).collect();
    assert!(!indices.contains(&first));
    assert!(indices.contains(&5));
}

#[test]
fn test_same_seed_same_session() {
    let level = LevelSet::builtin().levels[1].clone();
    let play = |seed| {
        let mut state = GameState::new(level.clone(), seed);
        for _ in 0..(60.0 / SIM_DT) as u32 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            autoplay::serve(&mut state, 3.0);
        }
        state.snapshot()
    };
    assert_eq!(play(2024), play(2024));
}

#[test]
fn test_autoplay_never_misses_on_first_level() {
    let set = LevelSet::builtin();
    let mut state = GameState::new(set.levels[0].clone(), 5);
    while !state.phase.is_finished() {
        tick(&mut state, &TickInput::default(), SIM_DT);
        autoplay::serve(&mut state, 1.0);
    }
    let snapshot = state.snapshot();
    assert_eq!(snapshot.stats.failed, 0);
    assert_eq!(snapshot.stats.expired, 0);
    assert_eq!(snapshot.phase == LevelPhase::Won, snapshot.money >= 5);
    assert!(snapshot.elapsed > 30.0);
}
