//! Layered liquid container
//!
//! A cup holds an ordered stack of liquid layers (oldest at the bottom) plus
//! topping counts. Pouring the same mixture twice in a row grows the top
//! layer instead of stacking a new one; blending collapses the whole stack
//! into a single mixed layer.

use std::collections::BTreeMap;

use glam::Vec4;
use serde::{Deserialize, Serialize};

use super::catalog::{BubbleId, Catalog, LiquidId};
use crate::consts::AMOUNT_EPSILON;

/// Proportions of each liquid type in a homogeneous mixture (sum to 1.0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composition(BTreeMap<LiquidId, f32>);

impl Composition {
    /// A single unmixed liquid
    pub fn pure(id: LiquidId) -> Self {
        Self(BTreeMap::from([(id, 1.0)]))
    }

    /// Build a mixture from unnormalized weights.
    ///
    /// Returns `None` when the weights carry no volume (empty, zero or
    /// non-finite total), so a NaN can never reach cup state.
    pub fn from_weights(weights: impl IntoIterator<Item = (LiquidId, f32)>) -> Option<Self> {
        let mut map = BTreeMap::new();
        for (id, weight) in weights {
            if weight > 0.0 {
                *map.entry(id).or_insert(0.0) += weight;
            }
        }
        let total: f32 = map.values().sum();
        if !(total > 0.0) || !total.is_finite() {
            return None;
        }
        for proportion in map.values_mut() {
            *proportion /= total;
        }
        Some(Self(map))
    }

    /// The liquid type if this mixture has exactly one constituent
    pub fn single(&self) -> Option<LiquidId> {
        if self.0.len() == 1 {
            self.0.keys().next().copied()
        } else {
            None
        }
    }

    pub fn is_mixed(&self) -> bool {
        self.0.len() > 1
    }

    /// Constituent types, regardless of proportion
    pub fn types(&self) -> impl Iterator<Item = LiquidId> + '_ {
        self.0.keys().copied()
    }

    pub fn proportion(&self, id: LiquidId) -> f32 {
        self.0.get(&id).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (LiquidId, f32)> + '_ {
        self.0.iter().map(|(&id, &p)| (id, p))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn total(&self) -> f32 {
        self.0.values().sum()
    }
}

/// Quadratic-mean blend of weighted RGBA colors.
///
/// Per channel: `sqrt(sum(w * c^2) / sum(w))`, clamped to [0, 1]. A dominant
/// component pulls the result further than a linear mix would. Zero total
/// weight yields transparent black.
pub fn blend_color(colors: impl IntoIterator<Item = (Vec4, f32)>) -> Vec4 {
    let mut total_weight = 0.0;
    let mut sum_of_squares = Vec4::ZERO;
    for (color, weight) in colors {
        total_weight += weight;
        sum_of_squares += color * color * weight;
    }
    if !(total_weight > 0.0) {
        return Vec4::ZERO;
    }
    let mean = (sum_of_squares / total_weight).to_array().map(f32::sqrt);
    Vec4::from_array(mean).clamp(Vec4::ZERO, Vec4::ONE)
}

/// One homogeneous layer of liquid in a cup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Liquid {
    pub composition: Composition,
    pub amount: f32,
}

impl Liquid {
    pub fn new(composition: Composition, amount: f32) -> Self {
        Self {
            composition,
            amount,
        }
    }

    /// Display color, derived from the catalog
    pub fn color(&self, catalog: &Catalog) -> Vec4 {
        if let Some(id) = self.composition.single() {
            return catalog.liquid(id).map(|l| l.color).unwrap_or(Vec4::ZERO);
        }
        blend_color(
            self.composition
                .iter()
                .filter_map(|(id, p)| catalog.liquid(id).map(|l| (l.color, p))),
        )
    }

    /// Amount-weighted average of several layers, keeping their total volume.
    /// `None` when the layers hold no liquid.
    pub fn blend(layers: &[Liquid]) -> Option<Liquid> {
        let total: f32 = layers.iter().map(|l| l.amount).sum();
        let mut weights: BTreeMap<LiquidId, f32> = BTreeMap::new();
        for layer in layers {
            let layer_total = layer.composition.total();
            if !(layer_total > 0.0) {
                continue;
            }
            for (id, proportion) in layer.composition.iter() {
                *weights.entry(id).or_insert(0.0) += proportion / layer_total * layer.amount;
            }
        }
        let composition = Composition::from_weights(weights)?;
        Some(Liquid::new(composition, total))
    }
}

/// A drink in progress
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cup {
    layers: Vec<Liquid>,
    bubbles: BTreeMap<BubbleId, u32>,
    /// Set whenever the layer stack changes (presentation redraw hint)
    #[serde(skip)]
    liquids_dirty: bool,
    #[serde(skip)]
    bubbles_dirty: bool,
}

impl Cup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layers from bottom (first poured) to top
    pub fn layers(&self) -> &[Liquid] {
        &self.layers
    }

    pub fn bubbles(&self) -> &BTreeMap<BubbleId, u32> {
        &self.bubbles
    }

    pub fn total_liquid(&self) -> f32 {
        self.layers.iter().map(|l| l.amount).sum()
    }

    pub fn bubble_count(&self) -> u32 {
        self.bubbles.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Pour a single unmixed liquid on top
    pub fn pour(&mut self, id: LiquidId, amount: f32) {
        self.pour_mix(Composition::pure(id), amount);
    }

    /// Pour a mixture on top, merging into the top layer if it is the same mixture
    pub fn pour_mix(&mut self, composition: Composition, amount: f32) {
        if !(amount > 0.0) {
            log::warn!("Ignoring pour of non-positive amount {}", amount);
            return;
        }
        match self.layers.last_mut() {
            Some(top) if top.composition == composition => top.amount += amount,
            _ => self.layers.push(Liquid::new(composition, amount)),
        }
        self.liquids_dirty = true;
    }

    /// Remove liquid from the top down. Draining more than the cup holds empties it.
    pub fn drain(&mut self, amount: f32) {
        if !(amount > 0.0) {
            return;
        }
        let mut left = amount;
        while let Some(top) = self.layers.last_mut() {
            if top.amount > left {
                top.amount -= left;
                if top.amount <= AMOUNT_EPSILON {
                    self.layers.pop();
                }
                break;
            }
            left -= top.amount;
            self.layers.pop();
            if left <= 0.0 {
                break;
            }
        }
        self.liquids_dirty = true;
    }

    /// Shake the cup: collapse every layer into one mixed layer.
    /// Irreversible; an empty cup stays empty.
    pub fn blend(&mut self) {
        if self.layers.is_empty() {
            return;
        }
        self.layers = Liquid::blend(&self.layers).into_iter().collect();
        self.liquids_dirty = true;
    }

    /// Drop one topping into the cup
    pub fn add_topping(&mut self, id: BubbleId) {
        self.add_toppings(id, 1);
    }

    pub fn add_toppings(&mut self, id: BubbleId, count: u32) {
        if count == 0 {
            return;
        }
        *self.bubbles.entry(id).or_insert(0) += count;
        self.bubbles_dirty = true;
    }

    /// Returns true once after the layer stack changed
    pub fn take_liquids_dirty(&mut self) -> bool {
        std::mem::take(&mut self.liquids_dirty)
    }

    /// Returns true once after a topping was added
    pub fn take_bubbles_dirty(&mut self) -> bool {
        std::mem::take(&mut self.bubbles_dirty)
    }
}
