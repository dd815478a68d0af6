//! Liquid and topping type registry
//!
//! Types are identified by small integer handles. The catalog owns the
//! display data (name, color, shape) and is shared read-only by every cup
//! and order for the lifetime of the process.

use std::collections::HashMap;

use glam::Vec4;
use serde::{Deserialize, Serialize};

/// Identifies a liquid type in the catalog. Cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LiquidId(pub u32);

/// Identifies a bubble (topping) type in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BubbleId(pub u32);

/// A pourable liquid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidType {
    pub id: LiquidId,
    pub name: Option<String>,
    /// RGBA, each channel in [0, 1]
    pub color: Vec4,
}

/// Topping geometry hint for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BubbleShape {
    #[default]
    Sphere,
    Capsule,
    Cube,
}

/// A topping dropped into the cup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BubbleType {
    pub id: BubbleId,
    pub name: Option<String>,
    pub color: Vec4,
    #[serde(default)]
    pub shape: BubbleShape,
}

/// Immutable registry of every liquid and topping type
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    liquids: Vec<LiquidType>,
    bubbles: Vec<BubbleType>,
    liquid_names: HashMap<String, LiquidId>,
    bubble_names: HashMap<String, BubbleId>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a liquid type. Returns its handle.
    pub fn add_liquid(&mut self, name: Option<&str>, color: Vec4) -> LiquidId {
        let id = LiquidId(self.liquids.len() as u32);
        if let Some(name) = name {
            self.liquid_names.insert(name.to_string(), id);
        }
        self.liquids.push(LiquidType {
            id,
            name: name.map(str::to_string),
            color,
        });
        id
    }

    /// Register a topping type. Returns its handle.
    pub fn add_bubble(&mut self, name: Option<&str>, color: Vec4, shape: BubbleShape) -> BubbleId {
        let id = BubbleId(self.bubbles.len() as u32);
        if let Some(name) = name {
            self.bubble_names.insert(name.to_string(), id);
        }
        self.bubbles.push(BubbleType {
            id,
            name: name.map(str::to_string),
            color,
            shape,
        });
        id
    }

    pub fn liquid(&self, id: LiquidId) -> Option<&LiquidType> {
        self.liquids.get(id.0 as usize)
    }

    pub fn bubble(&self, id: BubbleId) -> Option<&BubbleType> {
        self.bubbles.get(id.0 as usize)
    }

    pub fn liquid_by_name(&self, name: &str) -> Option<LiquidId> {
        self.liquid_names.get(name).copied()
    }

    pub fn bubble_by_name(&self, name: &str) -> Option<BubbleId> {
        self.bubble_names.get(name).copied()
    }

    /// Display name, falling back to the numeric handle
    pub fn liquid_label(&self, id: LiquidId) -> String {
        self.liquid(id)
            .and_then(|l| l.name.clone())
            .unwrap_or_else(|| format!("liquid#{}", id.0))
    }

    pub fn bubble_label(&self, id: BubbleId) -> String {
        self.bubble(id)
            .and_then(|b| b.name.clone())
            .unwrap_or_else(|| format!("bubble#{}", id.0))
    }

    pub fn liquids(&self) -> &[LiquidType] {
        &self.liquids
    }

    pub fn bubbles(&self) -> &[BubbleType] {
        &self.bubbles
    }
}
