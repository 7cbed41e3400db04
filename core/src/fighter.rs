use log::debug;
use serde::{Deserialize, Serialize};

use crate::arena::Arena;
use crate::constants::*;
use crate::physics;
use crate::types::*;

// ── Stats & timers ──────────────────────────────────────────

/// Combat stats. The player's come from the profile, the opponent's from the
/// level table.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FighterStats {
    pub max_health: f64,
    pub damage: f64,
    pub speed: f64,
    /// AI movement scaling; 1.0 for the player.
    pub speed_multiplier: f64,
    pub crit_chance: f64,
    pub fireball_damage: f64,
    pub stomp_damage: f64,
    pub ultimate_damage: f64,
    pub ult_charge_bonus: u32,
    pub max_ult_charge: u32,
    pub max_special_cooldown: u32,
    pub max_dash_cooldown: u32,
    pub max_teleport_cooldown: u32,
    pub max_air_dashes: u32,
    pub has_ult_aura: bool,
}

impl Default for FighterStats {
    fn default() -> Self {
        FighterStats {
            max_health: BASE_HEALTH,
            damage: BASE_DAMAGE,
            speed: BASE_SPEED,
            speed_multiplier: 1.0,
            crit_chance: 0.0,
            fireball_damage: BASE_FIREBALL_DAMAGE,
            stomp_damage: BASE_STOMP_DAMAGE,
            ultimate_damage: BASE_ULTIMATE_DAMAGE,
            ult_charge_bonus: 0,
            max_ult_charge: MAX_ULT_CHARGE,
            max_special_cooldown: BASE_SPECIAL_COOLDOWN,
            max_dash_cooldown: BASE_DASH_COOLDOWN,
            max_teleport_cooldown: BASE_TELEPORT_COOLDOWN,
            max_air_dashes: BASE_AIR_DASHES,
            has_ult_aura: false,
        }
    }
}

/// Countdown timers. All count toward zero, one step per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timers {
    pub attack_cooldown: u32,
    /// Cooldown the last attack started with, for ratio reporting.
    pub attack_cooldown_max: u32,
    pub special_cooldown: u32,
    pub dash_cooldown: u32,
    pub teleport_cooldown: u32,
    /// AI only.
    pub dodge_cooldown: u32,
    /// AI only: ticks left on a timed block.
    pub block_hold: u32,
    pub invulnerable: u32,
}

impl Timers {
    fn tick(&mut self) {
        self.attack_cooldown = self.attack_cooldown.saturating_sub(1);
        self.special_cooldown = self.special_cooldown.saturating_sub(1);
        self.dash_cooldown = self.dash_cooldown.saturating_sub(1);
        self.teleport_cooldown = self.teleport_cooldown.saturating_sub(1);
        self.dodge_cooldown = self.dodge_cooldown.saturating_sub(1);
        self.block_hold = self.block_hold.saturating_sub(1);
        self.invulnerable = self.invulnerable.saturating_sub(1);
    }
}

/// Punch → kick chain. `step` is 1 once a punch opened the window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combo {
    pub step: u8,
    pub timer: u32,
}

// ── Action state ────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UltimatePhase {
    /// Player: falling slam after the hover.
    Slam,
    /// Opponent: timed strike sequence behind the player.
    Barrage { remaining: u32, strikes_left: u32 },
}

/// Mutually exclusive action state. Teleport is instantaneous and never
/// persists as a state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ActionState {
    Idle,
    Moving,
    Blocking,
    Dashing { remaining: u32 },
    Attacking(AttackKind),
    Stunned { remaining: u32 },
    HitStun { remaining: u32, knockback: f64 },
    UltimateCharging { remaining: u32 },
    UltimateExecuting(UltimatePhase),
    Dying { remaining: u32 },
    Dead,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActiveAttack {
    pub kind: AttackKind,
    pub frames_left: u32,
    /// Damaging area for the current frame.
    pub hitbox: Option<Rect>,
    /// Set once the swing lands; the hitbox stays empty afterwards.
    pub connected: bool,
}

impl ActiveAttack {
    fn new(kind: AttackKind, frames: u32) -> Self {
        ActiveAttack {
            kind,
            frames_left: frames,
            hitbox: None,
            connected: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageOutcome {
    /// Invulnerable, dying or dead.
    Ignored,
    Blocked,
    Hit,
    Defeated,
}

// ── Intents ─────────────────────────────────────────────────

/// Decoded per-tick action request. Human input and the AI policy both
/// produce one of these.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intent {
    /// Horizontal walk direction; `None` keeps the current velocity.
    pub walk: Option<i32>,
    pub face: Option<i32>,
    pub jump: bool,
    /// Fraction of the full jump impulse.
    pub jump_scale: f64,
    pub block: bool,
    /// Hold a started block for this many ticks (AI).
    pub block_hold: Option<u32>,
    /// Skip the AI dodge and block checks for this many ticks.
    pub dodge_cooldown: Option<u32>,
    pub dash: bool,
    pub teleport: bool,
    pub ultimate: bool,
    pub attack: Option<AttackKind>,
    /// Replaces the attack's default cooldown (AI attacks slower).
    pub attack_cooldown: Option<u32>,
}

impl Default for Intent {
    fn default() -> Self {
        Intent {
            walk: Some(0),
            face: None,
            jump: false,
            jump_scale: 1.0,
            block: false,
            block_hold: None,
            dodge_cooldown: None,
            dash: false,
            teleport: false,
            ultimate: false,
            attack: None,
            attack_cooldown: None,
        }
    }
}

impl Intent {
    /// Stand still and do nothing.
    pub fn idle() -> Self {
        Intent::default()
    }

    /// Keep the current velocity and do nothing else.
    pub fn hold() -> Self {
        Intent {
            walk: None,
            ..Intent::default()
        }
    }
}

/// Public position of the opposing fighter, as read by ultimate activation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Target {
    pub x: f64,
    pub y: f64,
    pub facing: i32,
}

impl From<&Fighter> for Target {
    fn from(f: &Fighter) -> Self {
        Target {
            x: f.x,
            y: f.y,
            facing: f.facing,
        }
    }
}

// ── Fighter ─────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fighter {
    pub side: Side,
    /// Horizontal center.
    pub x: f64,
    /// Feet.
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub facing: i32,
    pub on_ground: bool,
    pub gravity: f64,
    pub jump_power: f64,
    pub health: f64,
    pub stats: FighterStats,
    pub timers: Timers,
    pub combo: Combo,
    pub ult_charge: u32,
    pub air_dashes: u32,
    pub state: ActionState,
    pub attack: Option<ActiveAttack>,
}

impl Fighter {
    /// Standing on the ground at `x`, full health, idle.
    pub fn new(side: Side, x: f64, ground_y: f64, stats: FighterStats) -> Self {
        Fighter {
            side,
            x,
            y: ground_y,
            vx: 0.0,
            vy: 0.0,
            facing: match side {
                Side::Player => facing::RIGHT,
                Side::Opponent => facing::LEFT,
            },
            on_ground: true,
            gravity: GRAVITY,
            jump_power: JUMP_POWER,
            health: stats.max_health,
            stats,
            timers: Timers::default(),
            combo: Combo::default(),
            ult_charge: 0,
            air_dashes: stats.max_air_dashes,
            state: ActionState::Idle,
            attack: None,
        }
    }

    // ── Queries ──

    pub fn is_alive(&self) -> bool {
        !matches!(self.state, ActionState::Dying { .. } | ActionState::Dead)
    }

    pub fn is_dead(&self) -> bool {
        self.state == ActionState::Dead
    }

    pub fn is_dashing(&self) -> bool {
        matches!(self.state, ActionState::Dashing { .. })
    }

    pub fn is_blocking(&self) -> bool {
        self.state == ActionState::Blocking
    }

    pub fn is_ulting(&self) -> bool {
        matches!(
            self.state,
            ActionState::UltimateCharging { .. } | ActionState::UltimateExecuting(_)
        )
    }

    pub fn is_slamming(&self) -> bool {
        self.state == ActionState::UltimateExecuting(UltimatePhase::Slam)
    }

    pub fn is_invulnerable(&self) -> bool {
        self.timers.invulnerable > 0 || self.is_dashing() || self.is_ulting()
    }

    /// Free to act on voluntary intents this tick.
    pub fn can_act(&self) -> bool {
        matches!(
            self.state,
            ActionState::Idle | ActionState::Moving | ActionState::Blocking | ActionState::Attacking(_)
        )
    }

    pub fn ult_ready(&self) -> bool {
        self.ult_charge >= self.stats.max_ult_charge && !self.is_ulting()
    }

    pub fn aura_active(&self) -> bool {
        self.stats.has_ult_aura && self.ult_charge >= self.stats.max_ult_charge
    }

    pub fn effective_damage(&self) -> f64 {
        if self.aura_active() {
            self.stats.damage + AURA_DAMAGE_BONUS
        } else {
            self.stats.damage
        }
    }

    pub fn effective_speed(&self) -> f64 {
        let base = if self.aura_active() {
            self.stats.speed + AURA_SPEED_BONUS
        } else {
            self.stats.speed
        };
        base * self.stats.speed_multiplier
    }

    pub fn attack_kind(&self) -> Option<AttackKind> {
        self.attack.map(|a| a.kind)
    }

    pub fn hitbox(&self) -> Option<Rect> {
        self.attack.and_then(|a| a.hitbox)
    }

    /// Full standing body rectangle.
    pub fn body(&self) -> Rect {
        Rect::new(
            self.x - FIGHTER_WIDTH * 0.25,
            self.y - FIGHTER_HEIGHT,
            FIGHTER_WIDTH * 0.5,
            FIGHTER_HEIGHT,
        )
    }

    /// Vulnerable area, absent while dashing, reeling or going down.
    pub fn hurtbox(&self) -> Option<Rect> {
        match self.state {
            ActionState::Dashing { .. }
            | ActionState::HitStun { .. }
            | ActionState::Dying { .. }
            | ActionState::Dead => None,
            _ => Some(self.body()),
        }
    }

    /// The fireball cast reached its release frame this tick.
    pub fn releases_projectile(&self) -> bool {
        matches!(
            self.attack,
            Some(ActiveAttack { kind: AttackKind::FireballCast, frames_left, .. })
                if frames_left == FIREBALL_RELEASE_FRAME
        )
    }

    pub fn projectile_origin(&self) -> Vec2 {
        Vec2 {
            x: self.x,
            y: self.y - FIGHTER_HEIGHT * 0.7,
        }
    }

    fn faces_toward(&self, x: f64) -> bool {
        (x < self.x && self.facing == facing::LEFT) || (x > self.x && self.facing == facing::RIGHT)
    }

    // ── Resources ──

    pub fn add_ult_charge(&mut self, amount: u32) {
        self.ult_charge = self
            .ult_charge
            .saturating_add(amount)
            .min(self.stats.max_ult_charge);
    }

    pub fn clamp_ult_charge(&mut self) {
        self.ult_charge = self.ult_charge.min(self.stats.max_ult_charge);
    }

    /// Consume the current hitbox so the same swing cannot land twice.
    pub fn clear_hitbox(&mut self) {
        if let Some(attack) = self.attack.as_mut() {
            attack.connected = true;
            attack.hitbox = None;
        }
    }

    // ── Intents ──

    /// Decode a human input snapshot. Attack choice depends on the grounded
    /// state and on the special cooldown.
    pub fn intent_from_input(&self, input: &InputFrame) -> Intent {
        let mut dir = 0;
        if input.held(button::LEFT) {
            dir -= 1;
        }
        if input.held(button::RIGHT) {
            dir += 1;
        }
        Intent {
            walk: Some(dir),
            face: if dir != 0 { Some(dir) } else { None },
            jump: input.held(button::JUMP),
            block: input.held(button::DOWN) && self.on_ground,
            dash: input.held(button::DASH),
            teleport: input.held(button::TELEPORT),
            ultimate: input.held(button::ULTIMATE),
            attack: self.choose_attack(input),
            ..Intent::default()
        }
    }

    fn choose_attack(&self, input: &InputFrame) -> Option<AttackKind> {
        if !self.on_ground {
            if input.held(button::DOWN) {
                Some(AttackKind::GroundPound)
            } else if input.held(button::KICK | button::AIR_KICK) {
                Some(AttackKind::AirKick)
            } else {
                None
            }
        } else if input.held(button::PUNCH) {
            Some(AttackKind::Punch)
        } else if input.held(button::KICK | button::AIR_KICK) {
            Some(AttackKind::Kick)
        } else if input.held(button::FIREBALL) && self.timers.special_cooldown == 0 {
            Some(AttackKind::FireballCast)
        } else {
            None
        }
    }

    /// Resolve voluntary transitions in priority order:
    /// dash → teleport → ultimate → block/move/jump → attack.
    pub fn apply_intent(
        &mut self,
        intent: &Intent,
        target: &Target,
        arena: &Arena,
        events: &mut Vec<TriggerEvent>,
    ) {
        if !self.can_act() {
            return;
        }

        if let Some(face) = intent.face {
            if face != 0 {
                self.facing = face.signum();
            }
        }
        if let Some(ticks) = intent.dodge_cooldown {
            self.timers.dodge_cooldown = ticks;
        }

        if intent.dash && self.timers.dash_cooldown == 0 && self.try_dash(events) {
            return;
        }

        if intent.teleport && self.timers.teleport_cooldown == 0 && self.on_ground {
            self.teleport(arena, events);
            return;
        }

        if intent.ultimate && self.ult_ready() {
            self.activate_ultimate(target, arena, events);
            return;
        }

        // A timed block cuts the current swing short
        if intent.block && intent.block_hold.is_some() && self.on_ground {
            self.attack = None;
        }
        let attacking = self.attack.is_some();
        let blocking = intent.block && self.on_ground && !attacking;

        if let Some(walk) = intent.walk {
            let mut vx = walk.signum() as f64 * self.effective_speed();
            if blocking {
                vx *= 0.5;
            }
            self.vx = vx;
        }

        if blocking {
            if let Some(hold) = intent.block_hold {
                self.timers.block_hold = hold;
            }
        }

        if intent.jump && self.on_ground && !blocking {
            self.vy = -self.jump_power * intent.jump_scale;
            self.on_ground = false;
        }

        if !blocking && !attacking {
            if let Some(kind) = intent.attack {
                self.start_attack(kind, intent.attack_cooldown, events);
            }
        }

        self.state = if blocking {
            ActionState::Blocking
        } else if let Some(attack) = self.attack {
            ActionState::Attacking(attack.kind)
        } else if self.vx != 0.0 {
            ActionState::Moving
        } else {
            ActionState::Idle
        };
    }

    /// Begin a voluntary attack. Returns false when the attack is not
    /// available (cooldown, wrong ground state, ultimate-only kind).
    pub fn start_attack(
        &mut self,
        kind: AttackKind,
        cooldown_override: Option<u32>,
        events: &mut Vec<TriggerEvent>,
    ) -> bool {
        if self.timers.attack_cooldown > 0 || self.attack.is_some() {
            return false;
        }
        let (frames, cooldown) = match kind {
            AttackKind::Punch if self.on_ground => (PUNCH_FRAMES, PUNCH_COOLDOWN),
            AttackKind::Kick if self.on_ground => (KICK_FRAMES, KICK_COOLDOWN),
            AttackKind::FireballCast if self.on_ground && self.timers.special_cooldown == 0 => {
                (FIREBALL_CAST_FRAMES, FIREBALL_CAST_COOLDOWN)
            }
            AttackKind::AirKick if !self.on_ground => (AIR_KICK_FRAMES, AIR_KICK_COOLDOWN),
            AttackKind::GroundPound if !self.on_ground => {
                (GROUND_POUND_FRAMES, GROUND_POUND_COOLDOWN)
            }
            _ => return false,
        };

        match kind {
            AttackKind::Punch => {
                if self.combo.step == 0 {
                    self.combo = Combo {
                        step: 1,
                        timer: COMBO_WINDOW_TICKS,
                    };
                }
            }
            AttackKind::Kick => {
                if self.combo.step == 1 && self.combo.timer > 0 {
                    self.timers.special_cooldown = 0;
                    events.push(TriggerEvent::Combo { side: self.side });
                }
                self.combo = Combo::default();
            }
            AttackKind::FireballCast => {
                self.timers.special_cooldown = self.stats.max_special_cooldown;
                events.push(TriggerEvent::FireballCast { side: self.side });
            }
            AttackKind::AirKick => {
                self.vy = AIR_KICK_FALL_SPEED;
                self.vx = AIR_KICK_DRIFT * self.facing as f64;
            }
            AttackKind::GroundPound => {
                self.vy = GROUND_POUND_FALL_SPEED;
                self.vx = 0.0;
            }
            _ => {}
        }

        let cooldown = cooldown_override.unwrap_or(cooldown);
        self.timers.attack_cooldown = cooldown;
        self.timers.attack_cooldown_max = cooldown;
        self.attack = Some(ActiveAttack::new(kind, frames));
        self.state = ActionState::Attacking(kind);
        true
    }

    fn try_dash(&mut self, events: &mut Vec<TriggerEvent>) -> bool {
        if !self.on_ground {
            if self.air_dashes == 0 {
                return false;
            }
            self.air_dashes -= 1;
            self.vy = 0.0;
        }
        self.attack = None;
        self.state = ActionState::Dashing {
            remaining: DASH_TICKS,
        };
        self.timers.dash_cooldown = self.stats.max_dash_cooldown;
        self.timers.invulnerable = self.timers.invulnerable.max(DASH_TICKS);
        events.push(TriggerEvent::DashTrail {
            side: self.side,
            x: self.x,
            y: self.y - FIGHTER_HEIGHT * 0.5,
        });
        true
    }

    fn teleport(&mut self, arena: &Arena, events: &mut Vec<TriggerEvent>) {
        self.timers.teleport_cooldown = self.stats.max_teleport_cooldown;
        events.push(TriggerEvent::TeleportVanish {
            side: self.side,
            x: self.x,
            y: self.y - FIGHTER_HEIGHT * 0.5,
        });
        self.x = arena.clamp_x(self.x + TELEPORT_DISTANCE * self.facing as f64, FIGHTER_WIDTH);
        events.push(TriggerEvent::TeleportAppear {
            side: self.side,
            x: self.x,
            y: self.y - FIGHTER_HEIGHT * 0.5,
        });
        self.attack = None;
        self.vx = 0.0;
        self.state = ActionState::Idle;
    }

    /// Spend the full ultimate resource and relocate for the scripted sequence.
    pub fn activate_ultimate(&mut self, target: &Target, arena: &Arena, events: &mut Vec<TriggerEvent>) {
        self.ult_charge = 0;
        self.attack = None;
        self.vx = 0.0;
        self.vy = 0.0;
        events.push(TriggerEvent::UltimateActivated { side: self.side });
        events.push(TriggerEvent::TeleportVanish {
            side: self.side,
            x: self.x,
            y: self.y - FIGHTER_HEIGHT * 0.5,
        });

        match self.side {
            Side::Player => {
                self.x = arena.clamp_x(target.x, FIGHTER_WIDTH);
                self.y = ULT_HOVER_Y;
                self.on_ground = false;
                self.timers.invulnerable = self.timers.invulnerable.max(PLAYER_ULT_INVULN_TICKS);
                self.state = ActionState::UltimateCharging {
                    remaining: ULT_CHARGE_UP_TICKS,
                };
            }
            Side::Opponent => {
                let behind = target.x - target.facing as f64 * BARRAGE_BEHIND_OFFSET;
                self.x = arena.clamp_x(behind, FIGHTER_WIDTH);
                self.y = target.y;
                self.facing = target.facing;
                self.timers.invulnerable = self.timers.invulnerable.max(OPPONENT_ULT_INVULN_TICKS);
                self.state = ActionState::UltimateExecuting(UltimatePhase::Barrage {
                    remaining: BARRAGE_TICKS,
                    strikes_left: BARRAGE_STRIKES,
                });
            }
        }

        events.push(TriggerEvent::TeleportAppear {
            side: self.side,
            x: self.x,
            y: self.y - FIGHTER_HEIGHT * 0.5,
        });
        debug!("{:?} ultimate activated at x={:.1} y={:.1}", self.side, self.x, self.y);
    }

    // ── Per-tick update ──

    /// Advance one tick: forced states, timers, dash and ultimate phases,
    /// physics, then the active attack.
    pub fn update(&mut self, arena: &Arena, events: &mut Vec<TriggerEvent>) {
        // 1. Forced states
        match self.state {
            ActionState::Dead => return,
            ActionState::Stunned { remaining } => {
                self.vx = 0.0;
                self.attack = None;
                self.state = if remaining <= 1 {
                    ActionState::Idle
                } else {
                    ActionState::Stunned {
                        remaining: remaining - 1,
                    }
                };
                return;
            }
            ActionState::HitStun {
                remaining,
                knockback,
            } => {
                self.vx = knockback;
                physics::apply_gravity(self);
                physics::move_and_collide(self, arena);
                if remaining <= 1 {
                    self.vx = 0.0;
                    self.state = ActionState::Idle;
                } else {
                    self.state = ActionState::HitStun {
                        remaining: remaining - 1,
                        knockback,
                    };
                }
                return;
            }
            ActionState::Dying { remaining } => {
                self.vx = 0.0;
                physics::apply_gravity(self);
                physics::settle_on_ground(self, arena);
                self.state = if remaining <= 1 {
                    ActionState::Dead
                } else {
                    ActionState::Dying {
                        remaining: remaining - 1,
                    }
                };
                return;
            }
            _ => {}
        }

        // 2. Timers
        self.timers.tick();
        if self.combo.timer > 0 {
            self.combo.timer -= 1;
            if self.combo.timer == 0 {
                self.combo.step = 0;
            }
        }

        self.advance_dash(events);
        self.advance_ultimate(events);

        // 3. Gravity, or a forced dive
        if !self.is_dashing() && !self.is_ulting() {
            physics::apply_gravity(self);
        }
        if let Some(speed) = self.attack_kind().and_then(AttackKind::forced_fall_speed) {
            self.vy = speed;
        }

        // 4–6. Integrate, collide, clamp
        let pinned = matches!(
            self.state,
            ActionState::UltimateCharging { .. }
                | ActionState::UltimateExecuting(UltimatePhase::Barrage { .. })
        );
        if !pinned {
            physics::move_and_collide(self, arena);
        }

        // 7–8. Active attack
        self.advance_attack(events);
    }

    fn advance_dash(&mut self, events: &mut Vec<TriggerEvent>) {
        let ActionState::Dashing { remaining } = self.state else {
            return;
        };
        self.vx = DASH_SPEED * self.facing as f64;
        self.vy = 0.0;
        let remaining = remaining.saturating_sub(1);
        if remaining % DASH_TRAIL_INTERVAL == 0 {
            events.push(TriggerEvent::DashTrail {
                side: self.side,
                x: self.x,
                y: self.y - FIGHTER_HEIGHT * 0.3,
            });
        }
        if remaining == 0 {
            self.vx = 0.0;
            self.state = ActionState::Idle;
        } else {
            self.state = ActionState::Dashing { remaining };
        }
    }

    fn advance_ultimate(&mut self, events: &mut Vec<TriggerEvent>) {
        match self.state {
            ActionState::UltimateCharging { remaining } => {
                self.timers.invulnerable = self.timers.invulnerable.max(ULT_MIN_INVULN_TICKS);
                self.vx = 0.0;
                self.vy = 0.0;
                let remaining = remaining.saturating_sub(1);
                if remaining % ULT_SPARK_INTERVAL == 0 {
                    events.push(TriggerEvent::UltimateSpark {
                        side: self.side,
                        x: self.x,
                        y: self.y,
                    });
                }
                if remaining == 0 {
                    self.state = ActionState::UltimateExecuting(UltimatePhase::Slam);
                    self.attack = Some(ActiveAttack::new(AttackKind::UltimateSlam, 2));
                } else {
                    self.state = ActionState::UltimateCharging { remaining };
                }
            }
            ActionState::UltimateExecuting(UltimatePhase::Slam) => {
                self.timers.invulnerable = self.timers.invulnerable.max(ULT_MIN_INVULN_TICKS);
                self.vx = 0.0;
                self.vy = ULT_SLAM_SPEED;
                if self.attack_kind() != Some(AttackKind::UltimateSlam) {
                    self.attack = Some(ActiveAttack::new(AttackKind::UltimateSlam, 2));
                }
            }
            ActionState::UltimateExecuting(UltimatePhase::Barrage {
                remaining,
                strikes_left,
            }) => {
                self.timers.invulnerable = self.timers.invulnerable.max(ULT_MIN_INVULN_TICKS);
                self.vx = 0.0;
                self.vy = 0.0;
                let mut strikes_left = strikes_left;
                if remaining % BARRAGE_STRIKE_INTERVAL == 0 && strikes_left > 0 {
                    self.attack = Some(ActiveAttack::new(AttackKind::ShadowPunch, SHADOW_PUNCH_FRAMES));
                    strikes_left -= 1;
                    events.push(TriggerEvent::UltimateSpark {
                        side: self.side,
                        x: self.x,
                        y: self.y - FIGHTER_HEIGHT * 0.5,
                    });
                }
                let remaining = remaining.saturating_sub(1);
                if remaining == 0 {
                    self.attack = None;
                    self.state = ActionState::Idle;
                } else {
                    self.state = ActionState::UltimateExecuting(UltimatePhase::Barrage {
                        remaining,
                        strikes_left,
                    });
                }
            }
            _ => {}
        }
    }

    fn advance_attack(&mut self, events: &mut Vec<TriggerEvent>) {
        let Some(mut attack) = self.attack else {
            return;
        };
        attack.frames_left = attack.frames_left.saturating_sub(1);

        if attack.kind.ends_on_landing() {
            if self.on_ground {
                self.finish_attack();
                if matches!(attack.kind, AttackKind::GroundPound | AttackKind::UltimateSlam) {
                    events.push(TriggerEvent::Shockwave {
                        side: self.side,
                        x: self.x,
                        y: self.y,
                        kind: attack.kind,
                    });
                }
                if attack.kind == AttackKind::UltimateSlam {
                    self.state = ActionState::Idle;
                }
                return;
            }
        } else if attack.frames_left == 0 {
            self.finish_attack();
            return;
        }

        attack.hitbox = if attack.connected {
            None
        } else {
            self.attack_rect(attack.kind)
        };
        self.attack = Some(attack);
    }

    fn finish_attack(&mut self) {
        self.attack = None;
        if let ActionState::Attacking(_) = self.state {
            self.state = if self.vx != 0.0 {
                ActionState::Moving
            } else {
                ActionState::Idle
            };
        }
    }

    /// Hitbox geometry per kind, mirrored by facing. Fireball casts have none.
    fn attack_rect(&self, kind: AttackKind) -> Option<Rect> {
        let (w, h) = (FIGHTER_WIDTH, FIGHTER_HEIGHT);
        let rect = match kind {
            AttackKind::Punch | AttackKind::ShadowPunch => {
                self.reach_rect(w * 0.5, w * 0.6, self.y - h * 0.7, h * 0.2)
            }
            AttackKind::Kick => self.reach_rect(w * 0.3, w * 0.7, self.y - h * 0.2, h * 0.2),
            AttackKind::AirKick => Rect::new(self.x - w * 0.2, self.y - h * 0.3, w * 0.4, h * 0.3),
            AttackKind::GroundPound => Rect::new(self.x - 30.0, self.y - 20.0, 60.0, 40.0),
            AttackKind::UltimateSlam => Rect::new(self.x - 80.0, self.y - 40.0, 160.0, 60.0),
            AttackKind::FireballCast => return None,
        };
        Some(rect)
    }

    /// Rectangle starting `offset` in front of the center and extending `width` further.
    fn reach_rect(&self, offset: f64, width: f64, top: f64, height: f64) -> Rect {
        if self.facing >= 0 {
            Rect::new(self.x + offset, top, width, height)
        } else {
            Rect::new(self.x - offset - width, top, width, height)
        }
    }

    // ── Damage intake ──

    /// Apply an incoming hit from an attacker standing at `attacker_x`.
    ///
    /// A frontal hit on a blocking fighter deals 20%. Hits from behind are
    /// never mitigated.
    pub fn take_damage(
        &mut self,
        amount: f64,
        attacker_x: f64,
        events: &mut Vec<TriggerEvent>,
    ) -> DamageOutcome {
        debug_assert!(amount >= 0.0, "negative damage {amount}");
        let amount = amount.max(0.0);
        if !self.is_alive() || self.is_invulnerable() {
            return DamageOutcome::Ignored;
        }

        if self.is_blocking() && self.faces_toward(attacker_x) {
            self.health = (self.health - amount * BLOCK_DAMAGE_FACTOR).max(0.0);
            events.push(TriggerEvent::Blocked {
                side: self.side,
                x: self.x + 20.0 * self.facing as f64,
                y: self.y - FIGHTER_HEIGHT * 0.5,
            });
            if self.health <= 0.0 {
                self.defeat(events);
                return DamageOutcome::Defeated;
            }
            return DamageOutcome::Blocked;
        }

        self.health = (self.health - amount).max(0.0);
        self.attack = None;
        events.push(TriggerEvent::Hit {
            side: self.side,
            x: self.x,
            y: self.y - FIGHTER_HEIGHT * 0.5,
            damage: amount,
        });
        if self.health <= 0.0 {
            self.defeat(events);
            return DamageOutcome::Defeated;
        }
        self.state = ActionState::HitStun {
            remaining: HIT_STUN_TICKS,
            knockback: -KNOCKBACK_SPEED * self.facing as f64,
        };
        DamageOutcome::Hit
    }

    fn defeat(&mut self, events: &mut Vec<TriggerEvent>) {
        self.health = 0.0;
        self.vx = 0.0;
        self.attack = None;
        self.state = ActionState::Dying {
            remaining: DYING_TICKS,
        };
        events.push(TriggerEvent::Defeated { side: self.side });
        debug!("{:?} defeated", self.side);
    }

    /// Extend an ongoing hit-stun into a launch (landed ultimate slam).
    pub fn launch(&mut self, vx: f64, vy: f64, ticks: u32) {
        if let ActionState::HitStun { .. } = self.state {
            self.vy = vy;
            self.on_ground = false;
            self.state = ActionState::HitStun {
                remaining: ticks,
                knockback: vx,
            };
        }
    }

    /// Force the stunned state. Cancels any action, including dash and ultimate.
    pub fn stun(&mut self, ticks: u32) {
        if !self.is_alive() || ticks == 0 {
            return;
        }
        self.vx = 0.0;
        self.attack = None;
        self.state = ActionState::Stunned { remaining: ticks };
    }
}
