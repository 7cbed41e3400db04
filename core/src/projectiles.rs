use serde::{Deserialize, Serialize};

use crate::arena::Arena;
use crate::constants::*;
use crate::types::*;

/// A fireball travelling horizontally at constant speed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub owner: Side,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub radius: f64,
    pub damage: f64,
}

impl Projectile {
    pub fn hitbox(&self) -> Circle {
        Circle {
            x: self.x,
            y: self.y,
            r: self.radius,
        }
    }
}

/// Spawn a fireball at `origin` heading along `direction` (±1).
pub fn spawn_projectile(origin: Vec2, direction: i32, damage: f64, owner: Side, id: u32) -> Projectile {
    let dir = if direction < 0 { -1.0 } else { 1.0 };
    Projectile {
        id,
        owner,
        x: origin.x,
        y: origin.y,
        vx: dir * PROJECTILE_SPEED,
        radius: PROJECTILE_RADIUS,
        damage,
    }
}

pub fn move_projectile(proj: &Projectile) -> Projectile {
    Projectile {
        x: proj.x + proj.vx,
        ..*proj
    }
}

/// True once the whole circle has left the arena horizontally.
pub fn is_off_screen(proj: &Projectile, arena: &Arena) -> bool {
    proj.x + proj.radius < arena.left || proj.x - proj.radius > arena.right
}

/// Translate every projectile and drop the ones that left the screen.
pub fn advance_projectiles(projectiles: &mut Vec<Projectile>, arena: &Arena) {
    for proj in projectiles.iter_mut() {
        *proj = move_projectile(proj);
    }
    projectiles.retain(|proj| !is_off_screen(proj, arena));
}
