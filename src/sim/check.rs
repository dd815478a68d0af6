//! Order validation
//!
//! Compares a finished cup against an order and reports the single most
//! actionable problem. Checks run in a fixed order and stop at the first
//! failure:
//! 1. Fullness
//! 2. Shake state (blended vs. layered)
//! 3. Liquid types
//! 4. Toppings

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::catalog::{BubbleId, LiquidId};
use super::cup::Cup;
use super::order::Order;
use crate::consts::FULL_THRESHOLD;

/// Outcome of presenting a cup for an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckResult {
    /// Less than 90% full
    NotFull,
    /// Order wanted a shaken drink but the cup is not a single blended layer
    NeedsShake,
    /// Order wanted layers but at least one layer is mixed
    ExcessiveShake,
    WrongLiquids {
        missing: BTreeSet<LiquidId>,
        excessive: BTreeSet<LiquidId>,
    },
    WrongBubbles {
        missing: BTreeSet<BubbleId>,
        excessive: BTreeSet<BubbleId>,
    },
    Valid,
}

impl CheckResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, CheckResult::Valid)
    }

    /// Base reputation loss for a failed order (before the level multiplier)
    pub fn reputation_penalty(&self) -> f32 {
        match self {
            CheckResult::Valid => 0.0,
            CheckResult::NeedsShake => 0.3,
            CheckResult::ExcessiveShake => 0.1,
            CheckResult::NotFull => 0.4,
            CheckResult::WrongLiquids { .. } => 0.6,
            CheckResult::WrongBubbles { .. } => 0.5,
        }
    }

    /// Short reason for feedback and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckResult::NotFull => "not full",
            CheckResult::NeedsShake => "needs shake",
            CheckResult::ExcessiveShake => "excessive shake",
            CheckResult::WrongLiquids { .. } => "wrong liquids",
            CheckResult::WrongBubbles { .. } => "wrong bubbles",
            CheckResult::Valid => "valid",
        }
    }
}

/// Validate a cup against an order. Pure; neither argument is modified.
pub fn check(order: &Order, cup: &Cup) -> CheckResult {
    if cup.total_liquid() < FULL_THRESHOLD {
        return CheckResult::NotFull;
    }

    let layers = cup.layers();
    let cup_liquids: BTreeSet<LiquidId> = if order.needs_shake {
        let [blended] = layers else {
            return CheckResult::NeedsShake;
        };
        blended.composition.types().collect()
    } else {
        let mut types = BTreeSet::new();
        for layer in layers {
            let Some(id) = layer.composition.single() else {
                return CheckResult::ExcessiveShake;
            };
            types.insert(id);
        }
        types
    };

    if cup_liquids != order.liquids {
        return CheckResult::WrongLiquids {
            missing: order.liquids.difference(&cup_liquids).copied().collect(),
            excessive: cup_liquids.difference(&order.liquids).copied().collect(),
        };
    }

    let cup_bubbles: BTreeSet<BubbleId> = cup
        .bubbles()
        .iter()
        .filter(|&(_, &count)| count > 0)
        .map(|(&id, _)| id)
        .collect();
    if cup_bubbles != order.bubbles {
        return CheckResult::WrongBubbles {
            missing: order.bubbles.difference(&cup_bubbles).copied().collect(),
            excessive: cup_bubbles.difference(&order.bubbles).copied().collect(),
        };
    }

    CheckResult::Valid
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEA: LiquidId = LiquidId(0);
    const MILK: LiquidId = LiquidId(1);
    const SUGAR: LiquidId = LiquidId(2);
    const TAPIOCA: BubbleId = BubbleId(0);
    const RED_BEAN: BubbleId = BubbleId(1);

    fn order(liquids: &[LiquidId], needs_shake: bool, bubbles: &[BubbleId]) -> Order {
        Order {
            index: 1,
            liquids: liquids.iter().copied().collect(),
            needs_shake,
            bubbles: bubbles.iter().copied().collect(),
            start_time: 0.0,
            end_time: 60.0,
            price: 4,
        }
    }

    fn layered_cup() -> Cup {
        let mut cup = Cup::new();
        cup.pour(TEA, 0.5);
        cup.pour(MILK, 0.5);
        cup.add_topping(TAPIOCA);
        cup
    }

    #[test]
    fn test_valid_layered() {
        let result = check(&order(&[TEA, MILK], false, &[TAPIOCA]), &layered_cup());
        assert_eq!(result, CheckResult::Valid);
        assert!(result.is_valid());
    }

    #[test]
    fn test_valid_shaken() {
        let mut cup = layered_cup();
        cup.blend();
        assert_eq!(check(&order(&[TEA, MILK], true, &[TAPIOCA]), &cup), CheckResult::Valid);
    }

    #[test]
    fn test_not_full_wins_over_everything() {
        let mut cup = Cup::new();
        cup.pour(SUGAR, 0.5);
        cup.blend();
        let result = check(&order(&[TEA, MILK], false, &[RED_BEAN]), &cup);
        assert_eq!(result, CheckResult::NotFull);
    }

    #[test]
    fn test_ninety_percent_is_full() {
        let mut cup = Cup::new();
        cup.pour(TEA, 0.9);
        assert_eq!(check(&order(&[TEA], false, &[]), &cup), CheckResult::Valid);
    }

    #[test]
    fn test_needs_shake_before_liquids() {
        // Matching types but still layered
        let result = check(&order(&[TEA, MILK], true, &[TAPIOCA]), &layered_cup());
        assert_eq!(result, CheckResult::NeedsShake);
    }

    #[test]
    fn test_needs_shake_after_topping_up_blend() {
        let mut cup = layered_cup();
        cup.blend();
        cup.pour(TEA, 0.1);
        assert_eq!(check(&order(&[TEA, MILK], true, &[TAPIOCA]), &cup), CheckResult::NeedsShake);
    }

    #[test]
    fn test_single_pure_layer_counts_as_shaken() {
        let mut cup = Cup::new();
        cup.pour(TEA, 1.0);
        assert_eq!(check(&order(&[TEA], true, &[]), &cup), CheckResult::Valid);
    }

    #[test]
    fn test_excessive_shake() {
        let mut cup = layered_cup();
        cup.blend();
        assert_eq!(
            check(&order(&[TEA, MILK], false, &[TAPIOCA]), &cup),
            CheckResult::ExcessiveShake
        );
    }

    #[test]
    fn test_wrong_liquids_reports_difference() {
        let result = check(&order(&[TEA, SUGAR], false, &[TAPIOCA]), &layered_cup());
        assert_eq!(
            result,
            CheckResult::WrongLiquids {
                missing: BTreeSet::from([SUGAR]),
                excessive: BTreeSet::from([MILK]),
            }
        );
    }

    #[test]
    fn test_blended_liquids_compared_by_constituents() {
        let mut cup = Cup::new();
        cup.pour(TEA, 0.95);
        cup.pour(SUGAR, 0.05);
        cup.blend();
        let result = check(&order(&[TEA], true, &[]), &cup);
        assert_eq!(
            result,
            CheckResult::WrongLiquids {
                missing: BTreeSet::new(),
                excessive: BTreeSet::from([SUGAR]),
            }
        );
    }

    #[test]
    fn test_wrong_bubbles() {
        let mut cup = layered_cup();
        cup.add_topping(RED_BEAN);
        let result = check(&order(&[TEA, MILK], false, &[TAPIOCA]), &cup);
        assert_eq!(
            result,
            CheckResult::WrongBubbles {
                missing: BTreeSet::new(),
                excessive: BTreeSet::from([RED_BEAN]),
            }
        );

        let result = check(&order(&[TEA, MILK], false, &[TAPIOCA, RED_BEAN]), &layered_cup());
        assert!(matches!(result, CheckResult::WrongBubbles { missing, .. } if missing.contains(&RED_BEAN)));
    }

    #[test]
    fn test_penalty_weights() {
        assert_eq!(CheckResult::NotFull.reputation_penalty(), 0.4);
        assert_eq!(CheckResult::NeedsShake.reputation_penalty(), 0.3);
        assert_eq!(CheckResult::ExcessiveShake.reputation_penalty(), 0.1);
        let wrong_liquids = CheckResult::WrongLiquids {
            missing: BTreeSet::from([TEA]),
            excessive: BTreeSet::new(),
        };
        assert_eq!(wrong_liquids.reputation_penalty(), 0.6);
        let wrong_bubbles = CheckResult::WrongBubbles {
            missing: BTreeSet::new(),
            excessive: BTreeSet::from([TAPIOCA]),
        };
        assert_eq!(wrong_bubbles.reputation_penalty(), 0.5);
        assert_eq!(CheckResult::Valid.reputation_penalty(), 0.0);
    }
}
