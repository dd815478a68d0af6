//! Level configuration and campaign progression
//!
//! Levels are plain data: which liquids and toppings are on offer, how big
//! and how frequent orders are, how reputation reacts, and the goal. A
//! campaign file is JSON with a shared catalog and levels that refer to
//! catalog entries by name.

use std::path::Path;

use glam::Vec4;
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_ORDER_LIMIT;
use crate::sim::catalog::{BubbleId, BubbleShape, Catalog, LiquidId};
use crate::sim::order::OrderPolicy;
use crate::sim::state::LevelPhase;

/// Errors that can occur while loading levels.
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    /// The level file is not valid JSON for the expected schema.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The level file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// A level names a liquid or bubble that the catalog does not define.
    #[error("unresolved {kind} '{name}' in level '{level}'")]
    UnresolvedRef {
        level: String,
        kind: &'static str,
        name: String,
    },

    /// Two catalog entries share a name.
    #[error("duplicate {kind} name '{name}'")]
    DuplicateName { kind: &'static str, name: String },

    #[error("level '{level}': order time range {min}..{max} is invalid")]
    InvalidTimeRange { level: String, min: f32, max: f32 },

    #[error("level '{level}': order frequency must be positive, got {frequency}")]
    InvalidFrequency { level: String, frequency: f32 },

    #[error("level '{level}': order limit must be at least 1")]
    ZeroOrderLimit { level: String },
}

/// How a level is won
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LevelGoal {
    /// Win as soon as money reaches the target; no clock
    TargetMoney { target: u64 },
    /// When the clock runs out, win iff money reached the target
    TimeLimit { target_money: u64, seconds: f32 },
}

impl LevelGoal {
    pub fn target_money(&self) -> u64 {
        match *self {
            LevelGoal::TargetMoney { target } => target,
            LevelGoal::TimeLimit { target_money, .. } => target_money,
        }
    }

    pub fn time_limit(&self) -> Option<f32> {
        match *self {
            LevelGoal::TargetMoney { .. } => None,
            LevelGoal::TimeLimit { seconds, .. } => Some(seconds),
        }
    }
}

/// Order and reputation tuning for a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelRules {
    pub max_liquids_per_order: usize,
    pub max_bubbles_per_order: usize,
    /// Possible values of an order's shake requirement
    pub shake_choices: Vec<bool>,
    /// Order arrival rate multiplier
    pub order_frequency: f32,
    /// Seconds a customer waits, `[min, max)`
    pub order_time_range: (f32, f32),
    pub reputation_loss_multiplier: f32,
    pub reputation_per_correct_order: f32,
    /// Maximum simultaneously queued orders
    pub order_limit: usize,
}

impl Default for LevelRules {
    fn default() -> Self {
        Self {
            max_liquids_per_order: usize::MAX,
            max_bubbles_per_order: usize::MAX,
            shake_choices: vec![true, false],
            order_frequency: 1.0,
            order_time_range: (30.0, 60.0),
            reputation_loss_multiplier: 1.0,
            reputation_per_correct_order: 0.3,
            order_limit: DEFAULT_ORDER_LIMIT,
        }
    }
}

/// A fully resolved level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub name: Option<String>,
    pub liquids: Vec<LiquidId>,
    pub bubbles: Vec<BubbleId>,
    #[serde(flatten)]
    pub rules: LevelRules,
    pub goal: LevelGoal,
}

impl LevelConfig {
    /// A level with default rules and no ingredients
    pub fn new(goal: LevelGoal) -> Self {
        Self {
            name: None,
            liquids: Vec::new(),
            bubbles: Vec::new(),
            rules: LevelRules::default(),
            goal,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown Level")
    }

    /// Generation constraints for new orders
    pub fn order_policy(&self) -> OrderPolicy<'_> {
        OrderPolicy {
            liquids: &self.liquids,
            max_liquids: self.rules.max_liquids_per_order,
            shake_choices: &self.rules.shake_choices,
            bubbles: &self.bubbles,
            max_bubbles: self.rules.max_bubbles_per_order,
            time_range: self.rules.order_time_range,
        }
    }

    /// Check tuning values that would break the simulation
    pub fn validate(&self) -> Result<(), LevelError> {
        let level = self.display_name().to_string();
        let (min, max) = self.rules.order_time_range;
        // A zero-length wait would place an order already at its deadline
        if !(min > 0.0) || !(max >= min) {
            return Err(LevelError::InvalidTimeRange { level, min, max });
        }
        let frequency = self.rules.order_frequency;
        if !(frequency > 0.0) {
            return Err(LevelError::InvalidFrequency { level, frequency });
        }
        if self.rules.order_limit == 0 {
            return Err(LevelError::ZeroOrderLimit { level });
        }
        Ok(())
    }
}

/// Catalog entry for a liquid in a level file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LiquidDef {
    name: String,
    color: Vec4,
}

/// Catalog entry for a topping in a level file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BubbleDef {
    name: String,
    color: Vec4,
    #[serde(default)]
    shape: BubbleShape,
}

/// A level as written in a file (ingredients by name)
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LevelDef {
    name: Option<String>,
    #[serde(default)]
    liquids: Vec<String>,
    #[serde(default)]
    bubbles: Vec<String>,
    #[serde(flatten)]
    rules: LevelRules,
    goal: LevelGoal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LevelFile {
    #[serde(default)]
    liquids: Vec<LiquidDef>,
    #[serde(default)]
    bubbles: Vec<BubbleDef>,
    levels: Vec<LevelDef>,
}

/// An ordered campaign of levels sharing one catalog
#[derive(Debug, Clone)]
pub struct LevelSet {
    pub catalog: Catalog,
    pub levels: Vec<LevelConfig>,
}

impl LevelSet {
    /// Parse a campaign from JSON text
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let file: LevelFile = serde_json::from_str(json)?;

        let mut catalog = Catalog::new();
        for def in &file.liquids {
            if catalog.liquid_by_name(&def.name).is_some() {
                return Err(LevelError::DuplicateName {
                    kind: "liquid",
                    name: def.name.clone(),
                });
            }
            catalog.add_liquid(Some(&def.name), def.color);
        }
        for def in &file.bubbles {
            if catalog.bubble_by_name(&def.name).is_some() {
                return Err(LevelError::DuplicateName {
                    kind: "bubble",
                    name: def.name.clone(),
                });
            }
            catalog.add_bubble(Some(&def.name), def.color, def.shape);
        }

        let mut levels = Vec::with_capacity(file.levels.len());
        for def in file.levels {
            let level_name = def.name.clone().unwrap_or_else(|| "Unknown Level".to_string());
            let liquids = def
                .liquids
                .iter()
                .map(|name| {
                    catalog.liquid_by_name(name).ok_or_else(|| LevelError::UnresolvedRef {
                        level: level_name.clone(),
                        kind: "liquid",
                        name: name.clone(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            let bubbles = def
                .bubbles
                .iter()
                .map(|name| {
                    catalog.bubble_by_name(name).ok_or_else(|| LevelError::UnresolvedRef {
                        level: level_name.clone(),
                        kind: "bubble",
                        name: name.clone(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            let level = LevelConfig {
                name: def.name,
                liquids,
                bubbles,
                rules: def.rules,
                goal: def.goal,
            };
            level.validate()?;
            levels.push(level);
        }

        log::info!(
            "Loaded {} levels ({} liquids, {} bubbles)",
            levels.len(),
            catalog.liquids().len(),
            catalog.bubbles().len()
        );
        Ok(Self { catalog, levels })
    }

    /// Read a campaign from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// The stock three-level campaign
    pub fn builtin() -> Self {
        let mut catalog = Catalog::new();
        let tea = catalog.add_liquid(Some("Tea"), Vec4::new(0.5, 0.25, 0.0, 0.95));
        let milk = catalog.add_liquid(Some("Milk"), Vec4::ONE);
        let sugar = catalog.add_liquid(Some("Sugar Water"), Vec4::new(1.0, 1.0, 1.0, 0.8));
        let vanilla = catalog.add_liquid(Some("Vanilla Extract"), Vec4::new(0.3, 0.15, 0.0, 0.97));
        let strawberry = catalog.add_liquid(Some("Strawberry Juice"), Vec4::new(1.0, 0.4, 0.7, 1.0));
        let mango = catalog.add_liquid(Some("Mango Juice"), Vec4::new(1.0, 0.8, 0.5, 1.0));
        let banana = catalog.add_liquid(Some("Banana Slush"), Vec4::new(1.0, 1.0, 0.7, 1.0));

        let tapioca = catalog.add_bubble(Some("Tapioca"), Vec4::new(0.0, 0.0, 0.0, 1.0), BubbleShape::Sphere);
        let red_bean = catalog.add_bubble(Some("Red Bean"), Vec4::new(0.3, 0.0, 0.0, 1.0), BubbleShape::Capsule);
        let aloe = catalog.add_bubble(Some("Aloe"), Vec4::new(1.0, 1.0, 0.8, 0.6), BubbleShape::Cube);

        let level = |name: &str,
                     liquids: Vec<LiquidId>,
                     max_liquids: usize,
                     bubbles: Vec<BubbleId>,
                     max_bubbles: usize,
                     frequency: f32,
                     time_range: (f32, f32),
                     target_money: u64,
                     seconds: f32| LevelConfig {
            name: Some(name.to_string()),
            liquids,
            bubbles,
            rules: LevelRules {
                max_liquids_per_order: max_liquids,
                max_bubbles_per_order: max_bubbles,
                order_frequency: frequency,
                order_time_range: time_range,
                ..LevelRules::default()
            },
            goal: LevelGoal::TimeLimit {
                target_money,
                seconds,
            },
        };

        let levels = vec![
            level("Level 1", vec![tea, milk, sugar], 2, vec![tapioca, red_bean], 1, 1.0, (60.0, 90.0), 5, 30.0),
            level(
                "Level 2",
                vec![tea, milk, sugar, strawberry, mango],
                3,
                vec![tapioca, red_bean],
                1,
                2.0,
                (30.0, 60.0),
                20,
                60.0,
            ),
            level(
                "Level 3",
                vec![tea, milk, sugar, strawberry, mango, banana, vanilla],
                4,
                vec![tapioca, red_bean, aloe],
                3,
                3.0,
                (50.0, 80.0),
                40,
                90.0,
            ),
        ];

        Self { catalog, levels }
    }

    pub fn get(&self, index: usize) -> Option<&LevelConfig> {
        self.levels.get(index)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Which level to load after `current` ends in `outcome`.
    ///
    /// Winning advances to the next level (or replays the last one); losing
    /// replays the current level. `None` while the level is still running.
    pub fn follow_up(&self, current: usize, outcome: LevelPhase) -> Option<usize> {
        match outcome {
            LevelPhase::Won if current + 1 < self.levels.len() => Some(current + 1),
            LevelPhase::Won | LevelPhase::Lost => Some(current),
            LevelPhase::Playing | LevelPhase::Paused => None,
        }
    }
}
