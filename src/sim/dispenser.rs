//! Liquid dispenser flow
//!
//! A dispenser pours while a cup sits under it and stops once the cup is at
//! capacity. Flow only reaches the cup after a short start delay; taking the
//! cup away resets the delay.

use serde::{Deserialize, Serialize};

use super::catalog::LiquidId;
use super::cup::Cup;
use crate::consts::{CUP_CAPACITY, DISPENSER_FLOW_RATE, DISPENSER_START_DELAY};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dispenser {
    pub liquid: LiquidId,
    /// Cup volumes per second
    pub flow_rate: f32,
    /// Flow accumulated since the current cup arrived
    #[serde(skip)]
    primed: f32,
}

impl Dispenser {
    pub fn new(liquid: LiquidId) -> Self {
        Self {
            liquid,
            flow_rate: DISPENSER_FLOW_RATE,
            primed: 0.0,
        }
    }

    pub fn with_flow_rate(mut self, flow_rate: f32) -> Self {
        self.flow_rate = flow_rate;
        self
    }

    /// Whether liquid is currently reaching a cup
    pub fn is_pouring(&self) -> bool {
        self.primed > DISPENSER_START_DELAY
    }

    /// Advance the dispenser by `dt` seconds with an optional cup underneath.
    /// Returns the volume poured into the cup.
    pub fn update(&mut self, cup: Option<&mut Cup>, dt: f32) -> f32 {
        let Some(cup) = cup else {
            self.primed = 0.0;
            return 0.0;
        };
        let room = CUP_CAPACITY - cup.total_liquid();
        if room <= 0.0 {
            self.primed = 0.0;
            return 0.0;
        }

        let flow = self.flow_rate * dt;
        self.primed += flow;
        if !self.is_pouring() {
            return 0.0;
        }

        let amount = flow.min(room);
        cup.pour(self.liquid, amount);
        amount
    }
}
