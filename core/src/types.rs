use serde::{Deserialize, Serialize};

use crate::progression::PowerUpKind;

// ── Primitives ──────────────────────────────────────────────

pub type Tick = u32;
pub type Seed = u32;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

/// Axis-aligned rectangle, top-left anchored (y grows downward).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Rect { x, y, w, h }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2 {
            x: self.x + self.w / 2.0,
            y: self.y + self.h / 2.0,
        }
    }

    /// Strict overlap: rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

impl Circle {
    pub fn intersects_circle(&self, other: &Circle) -> bool {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let reach = self.r + other.r;
        dx * dx + dy * dy < reach * reach
    }

    /// Closest-point test against a rectangle.
    pub fn intersects_rect(&self, rect: &Rect) -> bool {
        let cx = self.x.clamp(rect.left(), rect.right());
        let cy = self.y.clamp(rect.top(), rect.bottom());
        let dx = self.x - cx;
        let dy = self.y - cy;
        dx * dx + dy * dy < self.r * self.r
    }
}

// ── Sides ───────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Opponent,
}

/// Facing direction: Right = 1, Left = -1.
pub mod facing {
    pub const RIGHT: i32 = 1;
    pub const LEFT: i32 = -1;
}

// ── Input ───────────────────────────────────────────────────

/// Button bitmask constants for the decoded per-tick input snapshot.
pub mod button {
    pub const LEFT: u16 = 1;
    pub const RIGHT: u16 = 1 << 1;
    pub const JUMP: u16 = 1 << 2;
    /// Block on the ground, ground pound in the air.
    pub const DOWN: u16 = 1 << 3;
    pub const DASH: u16 = 1 << 4;
    pub const TELEPORT: u16 = 1 << 5;
    pub const PUNCH: u16 = 1 << 6;
    pub const KICK: u16 = 1 << 7;
    pub const AIR_KICK: u16 = 1 << 8;
    pub const FIREBALL: u16 = 1 << 9;
    pub const ULTIMATE: u16 = 1 << 10;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFrame {
    pub buttons: u16,
    /// One-shot power-up choice (0..3), only read during power-up selection.
    pub selection: Option<u8>,
}

impl InputFrame {
    pub const fn new(buttons: u16) -> Self {
        InputFrame {
            buttons,
            selection: None,
        }
    }

    pub fn held(&self, mask: u16) -> bool {
        self.buttons & mask != 0
    }
}

pub const NULL_INPUT: InputFrame = InputFrame {
    buttons: 0,
    selection: None,
};

// ── Attacks ─────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackKind {
    Punch,
    Kick,
    FireballCast,
    AirKick,
    GroundPound,
    UltimateSlam,
    ShadowPunch,
}

impl AttackKind {
    /// Aerial attacks that only end by touching down.
    pub fn ends_on_landing(self) -> bool {
        matches!(
            self,
            AttackKind::AirKick | AttackKind::GroundPound | AttackKind::UltimateSlam
        )
    }

    pub fn is_stomp(self) -> bool {
        matches!(self, AttackKind::AirKick | AttackKind::GroundPound)
    }

    /// Forced downward speed while the attack is active.
    pub fn forced_fall_speed(self) -> Option<f64> {
        use crate::constants::*;
        match self {
            AttackKind::AirKick => Some(AIR_KICK_FALL_SPEED),
            AttackKind::GroundPound => Some(GROUND_POUND_FALL_SPEED),
            AttackKind::UltimateSlam => Some(ULT_SLAM_SPEED),
            _ => None,
        }
    }
}

// ── Trigger events ──────────────────────────────────────────

/// Discrete one-shot events for the rendering/audio collaborator.
/// The simulation emits them and never reads them back.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TriggerEvent {
    DashTrail { side: Side, x: f64, y: f64 },
    TeleportVanish { side: Side, x: f64, y: f64 },
    TeleportAppear { side: Side, x: f64, y: f64 },
    Blocked { side: Side, x: f64, y: f64 },
    Hit { side: Side, x: f64, y: f64, damage: f64 },
    Crit { x: f64, y: f64 },
    Impact { x: f64, y: f64 },
    Combo { side: Side },
    Clash { x: f64, y: f64 },
    Shockwave { side: Side, x: f64, y: f64, kind: AttackKind },
    Defeated { side: Side },
    FireballCast { side: Side },
    UltimateActivated { side: Side },
    UltimateSpark { side: Side, x: f64, y: f64 },
    PowerUpGranted { side: Side, power_up: PowerUpKind },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_touching_rects_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        let c = Rect::new(9.0, 9.0, 10.0, 10.0);
        assert!(a.intersects(&c));
    }

    #[test]
    fn circle_rect_uses_closest_point() {
        let rect = Rect::new(100.0, 100.0, 20.0, 20.0);
        // Diagonal from the corner: distance ~14.1 > 10
        let far = Circle { x: 90.0, y: 90.0, r: 10.0 };
        assert!(!far.intersects_rect(&rect));
        let near = Circle { x: 95.0, y: 110.0, r: 10.0 };
        assert!(near.intersects_rect(&rect));
    }

    #[test]
    fn circles_overlap_by_radius_sum() {
        let a = Circle { x: 0.0, y: 0.0, r: 15.0 };
        let b = Circle { x: 29.0, y: 0.0, r: 15.0 };
        let c = Circle { x: 31.0, y: 0.0, r: 15.0 };
        assert!(a.intersects_circle(&b));
        assert!(!a.intersects_circle(&c));
    }

    #[test]
    fn input_held_checks_mask() {
        let input = InputFrame::new(button::LEFT | button::PUNCH);
        assert!(input.held(button::PUNCH));
        assert!(!input.held(button::KICK));
        assert!(!NULL_INPUT.held(button::LEFT));
    }

    #[test]
    fn landing_terminated_attacks() {
        assert!(AttackKind::GroundPound.ends_on_landing());
        assert!(AttackKind::UltimateSlam.ends_on_landing());
        assert!(!AttackKind::Punch.ends_on_landing());
    }
}
