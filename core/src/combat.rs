use crate::constants::*;
use crate::fighter::{DamageOutcome, Fighter};
use crate::prng::RandomSource;
use crate::projectiles::Projectile;
use crate::types::*;

/// Resolve every combat interaction for one tick, in fixed order:
/// player melee, opponent melee, projectile clashes, projectile hits, then
/// clamp both ultimate charges.
pub fn resolve(
    player: &mut Fighter,
    opponent: &mut Fighter,
    projectiles: &mut Vec<Projectile>,
    rng: &mut impl RandomSource,
    events: &mut Vec<TriggerEvent>,
) {
    resolve_melee(player, opponent, rng, events);
    resolve_melee(opponent, player, rng, events);
    resolve_clashes(projectiles, events);
    resolve_projectile_hits(player, opponent, projectiles, events);
    player.clamp_ult_charge();
    opponent.clamp_ult_charge();
}

/// Attacker's active hitbox against the defender's hurtbox. The hitbox is
/// consumed on contact.
pub fn resolve_melee(
    attacker: &mut Fighter,
    defender: &mut Fighter,
    rng: &mut impl RandomSource,
    events: &mut Vec<TriggerEvent>,
) {
    let (Some(attack), Some(hitbox)) = (attacker.attack, attacker.hitbox()) else {
        return;
    };
    let Some(hurtbox) = defender.hurtbox() else {
        return;
    };
    if !hitbox.intersects(&hurtbox) {
        return;
    }

    let kind = attack.kind;
    let center = hitbox.center();
    let crit = kind != AttackKind::UltimateSlam
        && attacker.stats.crit_chance > 0.0
        && rng.chance(attacker.stats.crit_chance);

    let base = match kind {
        AttackKind::UltimateSlam => attacker.stats.ultimate_damage,
        AttackKind::ShadowPunch => attacker.effective_damage() * SHADOW_PUNCH_DAMAGE_FACTOR,
        k if k.is_stomp() => attacker.stats.stomp_damage,
        _ => attacker.effective_damage(),
    };
    let damage = if crit { base * CRIT_MULTIPLIER } else { base };

    let outcome = defender.take_damage(damage, attacker.x, events);
    if crit {
        events.push(TriggerEvent::Crit {
            x: center.x,
            y: center.y,
        });
    }

    if kind == AttackKind::UltimateSlam && outcome == DamageOutcome::Hit {
        let away = if defender.x < attacker.x { -1.0 } else { 1.0 };
        defender.launch(away * ULT_LAUNCH_VX, ULT_LAUNCH_VY, ULT_VICTIM_STUN_TICKS);
    }

    let charge = melee_charge(attacker, kind, crit);
    attacker.add_ult_charge(charge);

    events.push(TriggerEvent::Impact {
        x: center.x,
        y: center.y,
    });
    attacker.clear_hitbox();
}

/// Ultimate charge earned by a landed melee hit. The opponent gains a flat
/// amount for anything.
fn melee_charge(attacker: &Fighter, kind: AttackKind, crit: bool) -> u32 {
    if attacker.side == Side::Opponent {
        return CHARGE_OPPONENT_HIT;
    }
    let crit_bonus = if crit { CHARGE_CRIT_BONUS } else { 0 };
    match kind {
        AttackKind::UltimateSlam => CHARGE_SLAM_LANDED,
        k if k.is_stomp() => CHARGE_STOMP + attacker.stats.ult_charge_bonus + crit_bonus,
        _ => CHARGE_MELEE + attacker.stats.ult_charge_bonus + crit_bonus,
    }
}

fn projectile_charge(shooter: &Fighter) -> u32 {
    match shooter.side {
        Side::Player => CHARGE_PROJECTILE + shooter.stats.ult_charge_bonus,
        Side::Opponent => CHARGE_OPPONENT_HIT,
    }
}

/// Opposing projectiles that overlap annihilate each other. Each projectile
/// takes part in at most one clash.
pub fn resolve_clashes(projectiles: &mut Vec<Projectile>, events: &mut Vec<TriggerEvent>) {
    let mut consumed = vec![false; projectiles.len()];
    for i in 0..projectiles.len() {
        if consumed[i] {
            continue;
        }
        for j in (i + 1)..projectiles.len() {
            if consumed[j] {
                continue;
            }
            let (a, b) = (&projectiles[i], &projectiles[j]);
            if a.owner != b.owner && a.hitbox().intersects_circle(&b.hitbox()) {
                consumed[i] = true;
                consumed[j] = true;
                events.push(TriggerEvent::Clash { x: a.x, y: a.y });
                break;
            }
        }
    }
    compact(projectiles, &consumed);
}

/// Projectiles against the opposing fighter's hurtbox. A hit projectile is
/// consumed and its owner gains ultimate charge.
pub fn resolve_projectile_hits(
    player: &mut Fighter,
    opponent: &mut Fighter,
    projectiles: &mut Vec<Projectile>,
    events: &mut Vec<TriggerEvent>,
) {
    let mut consumed = vec![false; projectiles.len()];
    for (i, proj) in projectiles.iter().enumerate() {
        let (shooter, target) = match proj.owner {
            Side::Player => (&mut *player, &mut *opponent),
            Side::Opponent => (&mut *opponent, &mut *player),
        };
        let Some(hurtbox) = target.hurtbox() else {
            continue;
        };
        if !proj.hitbox().intersects_rect(&hurtbox) {
            continue;
        }
        target.take_damage(proj.damage, proj.x, events);
        shooter.add_ult_charge(projectile_charge(shooter));
        events.push(TriggerEvent::Impact {
            x: proj.x,
            y: proj.y,
        });
        consumed[i] = true;
    }
    compact(projectiles, &consumed);
}

fn compact(projectiles: &mut Vec<Projectile>, consumed: &[bool]) {
    let mut idx = 0;
    projectiles.retain(|_| {
        let keep = !consumed[idx];
        idx += 1;
        keep
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena;
    use crate::fighter::{ActionState, FighterStats, Intent, Target};
    use crate::prng::SequenceRng;
    use crate::progression::{opponent_stats, Difficulty};
    use crate::projectiles::spawn_projectile;

    fn player_at(x: f64) -> Fighter {
        Fighter::new(Side::Player, x, GROUND_Y, FighterStats::default())
    }

    fn opponent_at(x: f64) -> Fighter {
        Fighter::new(Side::Opponent, x, GROUND_Y, opponent_stats(1, Difficulty::Medium))
    }

    /// Start `kind` and advance one tick so the hitbox is live.
    fn swing(f: &mut Fighter, kind: AttackKind) {
        let arena = arena::build(1);
        let mut events = Vec::new();
        let target = Target {
            x: 0.0,
            y: GROUND_Y,
            facing: f.facing,
        };
        f.apply_intent(
            &Intent {
                attack: Some(kind),
                ..Intent::default()
            },
            &target,
            &arena,
            &mut events,
        );
        f.update(&arena, &mut events);
        assert!(f.hitbox().is_some());
    }

    #[test]
    fn level_one_punch_scenario() {
        let mut player = player_at(500.0);
        player.stats.ult_charge_bonus = 5;
        let mut opponent = opponent_at(550.0);
        swing(&mut player, AttackKind::Punch);

        let mut projectiles = Vec::new();
        let mut events = Vec::new();
        let mut rng = SequenceRng::constant(0.5);
        resolve(&mut player, &mut opponent, &mut projectiles, &mut rng, &mut events);

        assert_eq!(opponent.health, 90.0);
        assert!(matches!(opponent.state, ActionState::HitStun { .. }));
        assert_eq!(player.ult_charge, CHARGE_MELEE + 5);
        assert!(player.hitbox().is_none());
        assert!(events.iter().any(|e| matches!(e, TriggerEvent::Impact { .. })));
        // Crit chance is zero, so no roll was drawn
        assert_eq!(rng.consumed(), 0);
    }

    #[test]
    fn swing_hits_only_once() {
        let mut player = player_at(500.0);
        let mut opponent = opponent_at(550.0);
        swing(&mut player, AttackKind::Punch);
        let mut rng = SequenceRng::constant(0.5);
        let mut events = Vec::new();
        let mut projectiles = Vec::new();
        resolve(&mut player, &mut opponent, &mut projectiles, &mut rng, &mut events);

        // Target exposed again, but the spent swing cannot land twice
        opponent.state = ActionState::Idle;
        let arena = arena::build(1);
        player.update(&arena, &mut events);
        assert!(player.hitbox().is_none());
        resolve(&mut player, &mut opponent, &mut projectiles, &mut rng, &mut events);
        assert_eq!(opponent.health, 90.0);
    }

    #[test]
    fn crit_doubles_damage_and_bonus_charge() {
        let mut player = player_at(500.0);
        player.stats.crit_chance = 0.5;
        let mut opponent = opponent_at(550.0);
        swing(&mut player, AttackKind::Punch);
        let mut rng = SequenceRng::constant(0.1);
        let mut events = Vec::new();
        resolve(&mut player, &mut opponent, &mut Vec::new(), &mut rng, &mut events);
        assert_eq!(opponent.health, 80.0);
        assert_eq!(player.ult_charge, CHARGE_MELEE + CHARGE_CRIT_BONUS);
        assert!(events.iter().any(|e| matches!(e, TriggerEvent::Crit { .. })));
    }

    #[test]
    fn opponent_hit_gives_flat_charge() {
        let mut player = player_at(500.0);
        let mut opponent = opponent_at(550.0);
        swing(&mut opponent, AttackKind::Kick);
        let mut rng = SequenceRng::constant(0.5);
        let mut events = Vec::new();
        resolve(&mut player, &mut opponent, &mut Vec::new(), &mut rng, &mut events);
        assert_eq!(player.health, 95.0);
        assert_eq!(opponent.ult_charge, CHARGE_OPPONENT_HIT);
    }

    #[test]
    fn shadow_punch_uses_reduced_damage() {
        let mut player = player_at(500.0);
        player.facing = facing::RIGHT;
        let mut opponent = opponent_at(1400.0);
        opponent.ult_charge = MAX_ULT_CHARGE;
        let arena = arena::build(1);
        let mut events = Vec::new();
        opponent.activate_ultimate(&Target::from(&player), &arena, &mut events);
        opponent.update(&arena, &mut events);
        assert_eq!(opponent.attack_kind(), Some(AttackKind::ShadowPunch));

        let mut rng = SequenceRng::constant(0.5);
        resolve(&mut player, &mut opponent, &mut Vec::new(), &mut rng, &mut events);
        assert!((player.health - (100.0 - 5.0 * SHADOW_PUNCH_DAMAGE_FACTOR)).abs() < 1e-9);
    }

    #[test]
    fn opposing_fireballs_clash() {
        let mut player = player_at(200.0);
        let mut opponent = opponent_at(1400.0);
        let mut projectiles = vec![
            spawn_projectile(Vec2 { x: 800.0, y: 730.0 }, 1, 30.0, Side::Player, 0),
            spawn_projectile(Vec2 { x: 820.0, y: 730.0 }, -1, 30.0, Side::Opponent, 1),
        ];
        let mut rng = SequenceRng::constant(0.5);
        let mut events = Vec::new();
        resolve(&mut player, &mut opponent, &mut projectiles, &mut rng, &mut events);
        assert!(projectiles.is_empty());
        assert_eq!(player.health, 100.0);
        assert_eq!(opponent.health, 100.0);
        assert_eq!(
            events.iter().filter(|e| matches!(e, TriggerEvent::Clash { .. })).count(),
            1
        );
    }

    #[test]
    fn projectile_clashes_at_most_once() {
        let mut projectiles = vec![
            spawn_projectile(Vec2 { x: 800.0, y: 730.0 }, 1, 30.0, Side::Player, 0),
            spawn_projectile(Vec2 { x: 810.0, y: 730.0 }, -1, 30.0, Side::Opponent, 1),
            spawn_projectile(Vec2 { x: 815.0, y: 730.0 }, -1, 30.0, Side::Opponent, 2),
        ];
        let mut events = Vec::new();
        resolve_clashes(&mut projectiles, &mut events);
        assert_eq!(projectiles.len(), 1);
        assert_eq!(projectiles[0].id, 2);
    }

    #[test]
    fn same_owner_projectiles_pass_through() {
        let mut projectiles = vec![
            spawn_projectile(Vec2 { x: 800.0, y: 730.0 }, 1, 30.0, Side::Player, 0),
            spawn_projectile(Vec2 { x: 805.0, y: 730.0 }, 1, 30.0, Side::Player, 1),
        ];
        let mut events = Vec::new();
        resolve_clashes(&mut projectiles, &mut events);
        assert_eq!(projectiles.len(), 2);
        assert!(events.is_empty());
    }

    #[test]
    fn fireball_hits_opposing_fighter() {
        let mut player = player_at(200.0);
        let mut opponent = opponent_at(1000.0);
        let mut projectiles = vec![spawn_projectile(
            Vec2 { x: 980.0, y: 730.0 },
            1,
            30.0,
            Side::Player,
            0,
        )];
        let mut events = Vec::new();
        resolve_projectile_hits(&mut player, &mut opponent, &mut projectiles, &mut events);
        assert!(projectiles.is_empty());
        assert_eq!(opponent.health, 70.0);
        assert_eq!(player.ult_charge, CHARGE_PROJECTILE);
    }

    #[test]
    fn fireball_passes_own_fighter() {
        let mut player = player_at(200.0);
        let mut opponent = opponent_at(1000.0);
        let mut projectiles = vec![spawn_projectile(
            Vec2 { x: 200.0, y: 730.0 },
            1,
            30.0,
            Side::Player,
            0,
        )];
        let mut events = Vec::new();
        resolve_projectile_hits(&mut player, &mut opponent, &mut projectiles, &mut events);
        assert_eq!(projectiles.len(), 1);
        assert_eq!(player.health, 100.0);
    }

    #[test]
    fn charge_clamped_to_max() {
        let mut player = player_at(500.0);
        player.ult_charge = MAX_ULT_CHARGE - 2;
        let mut opponent = opponent_at(550.0);
        swing(&mut player, AttackKind::Punch);
        let mut rng = SequenceRng::constant(0.5);
        resolve(&mut player, &mut opponent, &mut Vec::new(), &mut rng, &mut Vec::new());
        assert_eq!(player.ult_charge, MAX_ULT_CHARGE);
    }

    #[test]
    fn ultimate_slam_scenario() {
        let arena = arena::build(1);
        let mut player = player_at(200.0);
        let mut opponent = opponent_at(1400.0);
        player.ult_charge = MAX_ULT_CHARGE;
        let mut events = Vec::new();
        let mut rng = SequenceRng::constant(0.5);
        let mut projectiles = Vec::new();

        player.apply_intent(
            &Intent {
                ultimate: true,
                ..Intent::default()
            },
            &Target::from(&opponent),
            &arena,
            &mut events,
        );
        assert_eq!(player.ult_charge, 0);
        assert!(player.is_invulnerable());

        for _ in 0..80 {
            player.update(&arena, &mut events);
            opponent.update(&arena, &mut events);
            resolve(&mut player, &mut opponent, &mut projectiles, &mut rng, &mut events);
            if !player.is_ulting() {
                break;
            }
        }
        assert!(!player.is_ulting());
        assert!(player.on_ground);
        assert_eq!(opponent.health, 100.0 - BASE_ULTIMATE_DAMAGE);
        assert_eq!(player.ult_charge, CHARGE_SLAM_LANDED);
        assert!(matches!(
            opponent.state,
            ActionState::HitStun { remaining, knockback } if remaining <= ULT_VICTIM_STUN_TICKS && knockback == ULT_LAUNCH_VX
        ));
    }

    #[test]
    fn slam_finishing_blow_defeats() {
        let arena = arena::build(1);
        let mut player = player_at(200.0);
        let mut opponent = opponent_at(1400.0);
        opponent.health = 50.0;
        player.ult_charge = MAX_ULT_CHARGE;
        let mut events = Vec::new();
        player.activate_ultimate(&Target::from(&opponent), &arena, &mut events);
        let mut rng = SequenceRng::constant(0.5);
        for _ in 0..80 {
            player.update(&arena, &mut events);
            opponent.update(&arena, &mut events);
            resolve(&mut player, &mut opponent, &mut Vec::new(), &mut rng, &mut events);
        }
        assert!(!opponent.is_alive());
        assert_eq!(opponent.health, 0.0);
    }
}
