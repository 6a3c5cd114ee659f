use serde::{Deserialize, Serialize};

use detonator_core::powerup;
use detonator_core::time::Countdown;

use crate::GridPos;

/// Pickups dropped by destroyed soft blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpType {
    BombUp,
    FireUp,
    SpeedUp,
}

impl powerup::PowerUpKind for PowerUpType {
    const ALL: &'static [Self] = &[
        PowerUpType::BombUp,
        PowerUpType::FireUp,
        PowerUpType::SpeedUp,
    ];
}

/// A pickup lying on the arena floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub position: GridPos,
    pub kind: PowerUpType,
    timer: Countdown,
}

impl PowerUp {
    pub fn new(position: GridPos, kind: PowerUpType, lifetime: f32) -> Self {
        Self {
            position,
            kind,
            timer: Countdown::new(lifetime),
        }
    }

    /// Returns true once the pickup's lifetime has run out.
    pub fn update(&mut self, dt: f32) -> bool {
        self.timer.tick(dt)
    }

    pub fn time_remaining(&self) -> f32 {
        self.timer.remaining()
    }

    pub fn is_expired(&self) -> bool {
        self.timer.is_expired()
    }
}

/// Owns the live pickups. At most one per cell.
#[derive(Debug, Clone)]
pub struct PowerUpManager {
    powerups: Vec<PowerUp>,
    lifetime: f32,
}

impl PowerUpManager {
    pub fn new(lifetime: f32) -> Self {
        Self {
            powerups: Vec::new(),
            lifetime,
        }
    }

    /// Copy of the live pickups.
    pub fn powerups(&self) -> Vec<PowerUp> {
        self.powerups.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PowerUp> {
        self.powerups.iter()
    }

    /// Place a pickup. Ignored if the cell already holds one.
    pub fn spawn(&mut self, position: GridPos, kind: PowerUpType) {
        if self.get_at(position).is_some() {
            return;
        }
        self.powerups
            .push(PowerUp::new(position, kind, self.lifetime));
    }

    /// Age every pickup and drop the expired ones, returning their cells.
    pub fn update(&mut self, dt: f32) -> Vec<GridPos> {
        let mut expired = Vec::new();
        self.powerups.retain_mut(|pu| {
            if pu.update(dt) {
                expired.push(pu.position);
                false
            } else {
                true
            }
        });
        expired
    }

    pub fn get_at(&self, position: GridPos) -> Option<&PowerUp> {
        self.powerups.iter().find(|pu| pu.position == position)
    }

    /// Remove the pickup at `position` and return its kind.
    pub fn collect(&mut self, position: GridPos) -> Option<PowerUpType> {
        let idx = self
            .powerups
            .iter()
            .position(|pu| pu.position == position)?;
        Some(self.powerups.remove(idx).kind)
    }

    /// Remove the pickup at `position` without reporting it.
    pub fn remove_at(&mut self, position: GridPos) -> bool {
        self.collect(position).is_some()
    }

    pub fn clear(&mut self) {
        self.powerups.clear();
    }

    pub fn count(&self) -> usize {
        self.powerups.len()
    }
}
