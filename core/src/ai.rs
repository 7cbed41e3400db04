//! Opponent decision policy.
//!
//! Evaluated once per tick and stateless apart from the fighter's own timers.
//! Random rolls are drawn in a fixed order so a scripted [`RandomSource`]
//! selects branches exactly:
//! projectile dodge → melee defense (branch, then retreat kind) → platform
//! jump → aerial attack → teleport → melee kind.

use crate::arena::Arena;
use crate::config::AiTuning;
use crate::fighter::{Fighter, Intent};
use crate::prng::RandomSource;
use crate::projectiles::Projectile;
use crate::types::*;

pub fn decide(
    me: &Fighter,
    opponent: &Fighter,
    projectiles: &[Projectile],
    arena: &Arena,
    tuning: &AiTuning,
    rng: &mut impl RandomSource,
) -> Intent {
    if !me.can_act() {
        return Intent::idle();
    }

    // 1. Ultimate, unconditionally
    if me.ult_ready() && me.on_ground {
        return Intent {
            ultimate: true,
            ..Intent::idle()
        };
    }

    // 2. Hold a timed block until it runs out
    if me.is_blocking() && me.timers.block_hold > 0 {
        return Intent {
            block: true,
            ..Intent::idle()
        };
    }

    let distance = (opponent.x - me.x).abs();
    let toward = if opponent.x < me.x {
        facing::LEFT
    } else {
        facing::RIGHT
    };

    // 3. Dodge / defend
    if me.timers.dodge_cooldown == 0 && me.on_ground {
        if let Some(intent) = dodge_projectile(me, projectiles, tuning, rng) {
            return intent;
        }
        let threatened = opponent.attack.is_some() || opponent.is_slamming();
        if threatened && distance < tuning.melee_threat_range {
            if let Some(intent) = defend_melee(me, toward, tuning, rng) {
                return intent;
            }
        }
    }
    if me.timers.dodge_cooldown > 0 {
        return Intent::hold();
    }

    // 4. Approach, with a detour to the opponent's platform
    let mut intent = Intent {
        walk: Some(toward),
        face: Some(toward),
        ..Intent::idle()
    };
    let opponent_on_platform = arena.platform_under(opponent.x, opponent.y).is_some();
    let me_on_platform = arena.platform_under(me.x, me.y).is_some();
    if opponent_on_platform && !me_on_platform && me.on_ground {
        if let Some(plat) = arena.closest_platform(opponent.x) {
            let cx = plat.center().x;
            if (me.x - cx).abs() < tuning.platform_align_range {
                if rng.chance(tuning.platform_jump_chance) {
                    intent.jump = true;
                }
            } else {
                intent.walk = Some(if cx < me.x { -1 } else { 1 });
            }
        }
    }

    // 5. Aerial attack from above
    if !me.on_ground
        && me.y < opponent.y - tuning.air_attack_height
        && distance < tuning.air_attack_range
        && me.timers.attack_cooldown == 0
    {
        let roll = rng.next_f64();
        if roll < tuning.air_kick_chance {
            intent.attack = Some(AttackKind::AirKick);
        } else if roll < tuning.air_kick_chance + tuning.ground_pound_chance {
            intent.attack = Some(AttackKind::GroundPound);
        }
    }

    // 6. Close long gaps by teleporting
    if me.timers.teleport_cooldown == 0
        && me.on_ground
        && distance > tuning.teleport_min_range
        && rng.chance(tuning.teleport_chance)
    {
        intent.teleport = true;
    }

    // 7–8. Ranged, melee, or hold
    if me.timers.special_cooldown == 0
        && opponent.is_alive()
        && distance > tuning.fireball_min_range
        && distance < tuning.fireball_max_range
        && me.on_ground
    {
        intent.attack = Some(AttackKind::FireballCast);
    } else if distance < tuning.melee_range && me.on_ground {
        intent.walk = Some(0);
        if me.timers.attack_cooldown == 0 && opponent.is_alive() {
            intent.attack = Some(if rng.chance(tuning.punch_chance) {
                AttackKind::Punch
            } else {
                AttackKind::Kick
            });
            intent.attack_cooldown = Some(tuning.melee_cooldown);
        }
    } else if distance > tuning.hold_range {
        intent.walk = Some(0);
    }

    intent
}

/// Jump over an enemy projectile that is closing in at body height.
fn dodge_projectile(
    me: &Fighter,
    projectiles: &[Projectile],
    tuning: &AiTuning,
    rng: &mut impl RandomSource,
) -> Option<Intent> {
    let center_y = me.body().center().y;
    let incoming = projectiles.iter().any(|p| {
        let dx = me.x - p.x;
        p.owner != me.side
            && dx * p.vx > 0.0
            && dx.abs() < tuning.projectile_dodge_range
            && (center_y - p.y).abs() < tuning.projectile_dodge_height
    });
    if incoming && rng.chance(tuning.projectile_dodge_chance) {
        Some(Intent {
            jump: true,
            jump_scale: tuning.dodge_jump_scale,
            dodge_cooldown: Some(tuning.projectile_dodge_cooldown),
            ..Intent::hold()
        })
    } else {
        None
    }
}

/// Block, retreat, or accept the hit. `None` means take it.
fn defend_melee(
    me: &Fighter,
    toward: i32,
    tuning: &AiTuning,
    rng: &mut impl RandomSource,
) -> Option<Intent> {
    let roll = rng.next_f64();
    if roll < tuning.block_chance {
        return Some(Intent {
            block: true,
            block_hold: Some(tuning.block_hold_ticks),
            dodge_cooldown: Some(tuning.melee_dodge_cooldown),
            ..Intent::idle()
        });
    }
    if roll < tuning.block_chance + tuning.retreat_chance {
        if rng.chance(tuning.retreat_step_chance) {
            return Some(Intent {
                walk: Some(-toward),
                dodge_cooldown: Some(tuning.melee_dodge_cooldown),
                ..Intent::idle()
            });
        }
        if me.timers.dash_cooldown == 0 {
            return Some(Intent {
                face: Some(-toward),
                dash: true,
                ..Intent::idle()
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena;
    use crate::constants::*;
    use crate::fighter::{ActionState, DamageOutcome, FighterStats, Target};
    use crate::prng::SequenceRng;
    use crate::projectiles::spawn_projectile;

    fn pair(ai_x: f64, player_x: f64) -> (Fighter, Fighter) {
        (
            Fighter::new(Side::Opponent, ai_x, GROUND_Y, FighterStats::default()),
            Fighter::new(Side::Player, player_x, GROUND_Y, FighterStats::default()),
        )
    }

    fn decide_with(me: &Fighter, player: &Fighter, projectiles: &[Projectile], rolls: Vec<f64>) -> Intent {
        let arena = arena::build(1);
        let mut rng = SequenceRng::new(rolls);
        decide(me, player, projectiles, &arena, &AiTuning::default(), &mut rng)
    }

    #[test]
    fn ultimate_has_top_priority() {
        let (mut me, player) = pair(1000.0, 960.0);
        me.ult_charge = MAX_ULT_CHARGE;
        let intent = decide_with(&me, &player, &[], vec![0.0]);
        assert!(intent.ultimate);
        assert!(intent.attack.is_none());
    }

    #[test]
    fn no_ultimate_while_airborne() {
        let (mut me, player) = pair(1000.0, 600.0);
        me.ult_charge = MAX_ULT_CHARGE;
        me.on_ground = false;
        me.y = 500.0;
        assert!(!decide_with(&me, &player, &[], vec![0.99]).ultimate);
    }

    #[test]
    fn dodges_incoming_fireball() {
        let (me, player) = pair(1000.0, 400.0);
        let fireball = spawn_projectile(player.projectile_origin(), 1, 30.0, Side::Player, 0);
        let mut near = fireball;
        near.x = 800.0;
        let intent = decide_with(&me, &player, &[near], vec![0.5]);
        assert!(intent.jump);
        assert_eq!(intent.jump_scale, 0.8);
        assert_eq!(intent.dodge_cooldown, Some(60));
        assert_eq!(intent.walk, None);
    }

    #[test]
    fn ignores_receding_and_own_fireballs() {
        let (me, player) = pair(1000.0, 400.0);
        let mut receding = spawn_projectile(player.projectile_origin(), -1, 30.0, Side::Player, 0);
        receding.x = 900.0;
        let mut own = spawn_projectile(me.projectile_origin(), 1, 30.0, Side::Opponent, 1);
        own.x = 900.0;
        let intent = decide_with(&me, &player, &[receding, own], vec![0.0]);
        assert!(!intent.jump);
    }

    #[test]
    fn dodge_roll_can_fail() {
        let (me, player) = pair(1000.0, 600.0);
        let mut near = spawn_projectile(player.projectile_origin(), 1, 30.0, Side::Player, 0);
        near.x = 800.0;
        // 0.95 fails the 0.9 dodge; then approach / fireball logic runs
        let intent = decide_with(&me, &player, &[near], vec![0.95]);
        assert!(!intent.jump);
        assert_eq!(intent.attack, Some(AttackKind::FireballCast));
    }

    fn threatened_pair() -> (Fighter, Fighter) {
        let (me, mut player) = pair(1000.0, 930.0);
        let mut events = Vec::new();
        player.start_attack(AttackKind::Punch, None, &mut events);
        (me, player)
    }

    #[test]
    fn melee_threat_block_branch() {
        let (me, player) = threatened_pair();
        let intent = decide_with(&me, &player, &[], vec![0.1]);
        assert!(intent.block);
        assert_eq!(intent.block_hold, Some(30));
        assert_eq!(intent.dodge_cooldown, Some(40));
        assert_eq!(intent.walk, Some(0));
    }

    #[test]
    fn block_roll_cancels_own_swing() {
        let arena = arena::build(1);
        let mut events = Vec::new();
        let (mut me, mut player) = pair(1000.0, 930.0);
        assert!(me.start_attack(AttackKind::Punch, None, &mut events));
        player.start_attack(AttackKind::Punch, None, &mut events);

        let mut rng = SequenceRng::constant(0.1);
        let intent = decide(&me, &player, &[], &arena, &AiTuning::default(), &mut rng);
        assert!(intent.block);
        me.apply_intent(&intent, &Target::from(&player), &arena, &mut events);
        assert_eq!(me.state, ActionState::Blocking);
        assert!(me.attack.is_none());
        assert_eq!(me.timers.block_hold, 30);

        // Block persists while the hold runs
        for _ in 0..10 {
            let intent = decide(&me, &player, &[], &arena, &AiTuning::default(), &mut rng);
            me.apply_intent(&intent, &Target::from(&player), &arena, &mut events);
            me.update(&arena, &mut events);
            assert_eq!(me.state, ActionState::Blocking);
        }

        // Frontal hit only chips
        assert_eq!(me.take_damage(10.0, player.x, &mut events), DamageOutcome::Blocked);
        assert_eq!(me.health, 98.0);
    }

    #[test]
    fn melee_threat_step_back_branch() {
        let (me, player) = threatened_pair();
        let intent = decide_with(&me, &player, &[], vec![0.5, 0.2]);
        // Player is to the left, so stepping back means walking right
        assert_eq!(intent.walk, Some(1));
        assert_eq!(intent.face, None);
        assert!(!intent.dash);
        assert_eq!(intent.dodge_cooldown, Some(40));
    }

    #[test]
    fn melee_threat_dash_away_branch() {
        let (me, player) = threatened_pair();
        let intent = decide_with(&me, &player, &[], vec![0.5, 0.7]);
        assert!(intent.dash);
        assert_eq!(intent.face, Some(1));
    }

    #[test]
    fn melee_threat_accept_hit_branch() {
        let (me, player) = threatened_pair();
        // 0.9 falls through; then the melee roll picks kick
        let intent = decide_with(&me, &player, &[], vec![0.9, 0.8]);
        assert!(!intent.block && !intent.dash);
        assert_eq!(intent.attack, Some(AttackKind::Kick));
        assert_eq!(intent.attack_cooldown, Some(50));
        assert_eq!(intent.walk, Some(0));
    }

    #[test]
    fn keeps_velocity_during_dodge_cooldown() {
        let (mut me, player) = pair(1000.0, 400.0);
        me.timers.dodge_cooldown = 10;
        assert_eq!(decide_with(&me, &player, &[], vec![0.0]), Intent::hold());
    }

    #[test]
    fn holds_block_until_timer_expires() {
        let (mut me, player) = pair(1000.0, 400.0);
        me.state = ActionState::Blocking;
        me.timers.block_hold = 5;
        let intent = decide_with(&me, &player, &[], vec![0.0]);
        assert!(intent.block);
        assert_eq!(intent.walk, Some(0));

        me.timers.block_hold = 0;
        assert!(!decide_with(&me, &player, &[], vec![0.99]).block);
    }

    #[test]
    fn approaches_and_faces_player() {
        let (me, player) = pair(1000.0, 850.0);
        let intent = decide_with(&me, &player, &[], vec![0.99]);
        assert_eq!(intent.walk, Some(-1));
        assert_eq!(intent.face, Some(-1));
        assert!(intent.attack.is_none());
    }

    #[test]
    fn fireball_in_mid_range() {
        let (me, player) = pair(1000.0, 700.0);
        let intent = decide_with(&me, &player, &[], vec![0.99]);
        assert_eq!(intent.attack, Some(AttackKind::FireballCast));
    }

    #[test]
    fn punch_when_close() {
        let (me, player) = pair(1000.0, 950.0);
        let intent = decide_with(&me, &player, &[], vec![0.3]);
        assert_eq!(intent.attack, Some(AttackKind::Punch));
        assert_eq!(intent.walk, Some(0));
    }

    #[test]
    fn holds_position_when_far() {
        let (mut me, player) = pair(1400.0, 200.0);
        me.timers.teleport_cooldown = 10;
        let intent = decide_with(&me, &player, &[], vec![0.0]);
        assert_eq!(intent.walk, Some(0));
        assert_eq!(intent.face, Some(-1));
        assert!(!intent.teleport);
    }

    #[test]
    fn teleports_to_close_long_gaps() {
        let (me, player) = pair(1400.0, 200.0);
        let intent = decide_with(&me, &player, &[], vec![0.01]);
        assert!(intent.teleport);
        let intent = decide_with(&me, &player, &[], vec![0.5]);
        assert!(!intent.teleport);
    }

    #[test]
    fn chases_player_onto_platform() {
        let arena = arena::build(1);
        let plat = arena.platforms[1];
        let (me, mut player) = pair(1100.0, plat.center().x);
        player.y = plat.top();
        // Far from the platform: walk toward it
        let intent = decide_with(&me, &player, &[], vec![0.99]);
        assert_eq!(intent.walk, Some(-1));
        assert!(!intent.jump);

        // Lined up under it: jump on a low roll
        let (me, _) = pair(plat.center().x + 10.0, 0.0);
        let intent = decide_with(&me, &player, &[], vec![0.01]);
        assert!(intent.jump);
    }

    #[test]
    fn aerial_attack_from_above() {
        let (mut me, player) = pair(1000.0, 960.0);
        me.on_ground = false;
        me.y = GROUND_Y - 200.0;
        let intent = decide_with(&me, &player, &[], vec![0.02]);
        assert_eq!(intent.attack, Some(AttackKind::AirKick));
        let intent = decide_with(&me, &player, &[], vec![0.07]);
        assert_eq!(intent.attack, Some(AttackKind::GroundPound));
        let intent = decide_with(&me, &player, &[], vec![0.5]);
        assert_eq!(intent.attack, None);
    }

    #[test]
    fn stunned_ai_does_nothing() {
        let (mut me, player) = pair(1000.0, 950.0);
        me.stun(10);
        assert_eq!(decide_with(&me, &player, &[], vec![0.0]), Intent::idle());
    }
}
