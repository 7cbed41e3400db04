use serde::{Deserialize, Serialize};

use crate::fighter::{ActionState, Fighter};
use crate::game::Phase;
use crate::progression::PowerUpKind;
use crate::projectiles::Projectile;
use crate::step::RoundState;
use crate::types::*;

/// `value / max` clamped to [0, 1]; a zero maximum reads as empty.
pub fn ratio(value: f64, max: f64) -> f64 {
    if max <= 0.0 {
        return 0.0;
    }
    (value / max).clamp(0.0, 1.0)
}

fn ratio_u32(value: u32, max: u32) -> f64 {
    ratio(value as f64, max as f64)
}

/// Per-fighter render state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FighterView {
    pub side: Side,
    pub x: f64,
    pub y: f64,
    pub facing: i32,
    pub on_ground: bool,
    pub state: ActionState,
    pub attack: Option<AttackKind>,
    pub health: f64,
    pub max_health: f64,
    pub attack_cooldown: f64,
    pub special_cooldown: f64,
    pub dash_cooldown: f64,
    pub teleport_cooldown: f64,
    pub ult_charge: f64,
    pub aura_active: bool,
    pub invulnerable: bool,
    pub hitbox: Option<Rect>,
}

impl From<&Fighter> for FighterView {
    fn from(f: &Fighter) -> Self {
        FighterView {
            side: f.side,
            x: f.x,
            y: f.y,
            facing: f.facing,
            on_ground: f.on_ground,
            state: f.state,
            attack: f.attack_kind(),
            health: f.health,
            max_health: f.stats.max_health,
            attack_cooldown: ratio_u32(f.timers.attack_cooldown, f.timers.attack_cooldown_max),
            special_cooldown: ratio_u32(f.timers.special_cooldown, f.stats.max_special_cooldown),
            dash_cooldown: ratio_u32(f.timers.dash_cooldown, f.stats.max_dash_cooldown),
            teleport_cooldown: ratio_u32(f.timers.teleport_cooldown, f.stats.max_teleport_cooldown),
            ult_charge: ratio_u32(f.ult_charge, f.stats.max_ult_charge),
            aura_active: f.aura_active(),
            invulnerable: f.is_invulnerable(),
            hitbox: f.hitbox(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerUpOffer {
    pub kind: PowerUpKind,
    pub name: String,
    pub description: String,
}

impl From<PowerUpKind> for PowerUpOffer {
    fn from(kind: PowerUpKind) -> Self {
        PowerUpOffer {
            kind,
            name: kind.name().to_string(),
            description: kind.description().to_string(),
        }
    }
}

/// Everything a renderer needs for one tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub phase: Phase,
    pub level: u32,
    pub ticks_remaining: u32,
    pub player: Option<FighterView>,
    pub opponent: Option<FighterView>,
    pub projectiles: Vec<Projectile>,
    pub events: Vec<TriggerEvent>,
    pub offers: Vec<PowerUpOffer>,
}

impl Frame {
    pub fn capture(phase: &Phase, level: u32, round: Option<&RoundState>) -> Frame {
        let offers = match phase {
            Phase::PowerUpSelect { offers } => offers.iter().copied().map(PowerUpOffer::from).collect(),
            _ => Vec::new(),
        };
        Frame {
            phase: phase.clone(),
            level,
            ticks_remaining: round.map_or(0, |r| r.ticks_remaining),
            player: round.map(|r| FighterView::from(&r.player)),
            opponent: round.map(|r| FighterView::from(&r.opponent)),
            projectiles: round.map_or_else(Vec::new, |r| r.projectiles.clone()),
            events: round.map_or_else(Vec::new, |r| r.events.clone()),
            offers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use crate::fighter::FighterStats;

    #[test]
    fn zero_max_ratio_is_empty() {
        assert_eq!(ratio(5.0, 0.0), 0.0);
        assert_eq!(ratio(0.0, 0.0), 0.0);
        assert_eq!(ratio(50.0, 100.0), 0.5);
        assert_eq!(ratio(150.0, 100.0), 1.0);
    }

    #[test]
    fn fresh_fighter_view() {
        let f = Fighter::new(Side::Player, 200.0, GROUND_Y, FighterStats::default());
        let view = FighterView::from(&f);
        assert_eq!(view.health, 100.0);
        assert_eq!(view.max_health, 100.0);
        // No attack yet, so the attack cooldown max is zero
        assert_eq!(view.attack_cooldown, 0.0);
        assert_eq!(view.ult_charge, 0.0);
        assert!(view.hitbox.is_none());
    }

    #[test]
    fn view_serializes_camel_case() {
        let f = Fighter::new(Side::Opponent, 1400.0, GROUND_Y, FighterStats::default());
        let json = serde_json::to_value(FighterView::from(&f)).unwrap();
        assert_eq!(json["maxHealth"], 100.0);
        assert_eq!(json["side"], "Opponent");
        assert!(json.get("auraActive").is_some());
    }

    #[test]
    fn offers_listed_only_while_selecting() {
        let phase = Phase::PowerUpSelect {
            offers: vec![PowerUpKind::MaxHealth, PowerUpKind::AirDash, PowerUpKind::UltAura],
        };
        let frame = Frame::capture(&phase, 2, None);
        assert_eq!(frame.offers.len(), 3);
        assert_eq!(frame.offers[0].description, "+25 Max HP");
        assert!(frame.player.is_none());

        let frame = Frame::capture(&Phase::Playing, 2, None);
        assert!(frame.offers.is_empty());
    }
}
