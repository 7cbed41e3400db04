use crate::arena::Arena;
use crate::constants::*;
use crate::fighter::Fighter;

/// Add the fighter's gravity to vy. No terminal velocity.
pub fn apply_gravity(f: &mut Fighter) {
    f.vy += f.gravity;
}

/// Integrate position and resolve collisions with platforms and the ground.
/// Platforms are one-way: only collide when falling onto the top surface.
/// Returns true when the fighter touched down this tick.
///
/// Grounded state is recomputed every call, so walking off a platform edge
/// starts a fall on the next tick.
pub fn move_and_collide(f: &mut Fighter, arena: &Arena) -> bool {
    let feet_before = f.y;
    f.x += f.vx;
    f.y += f.vy;

    if f.is_dashing() {
        f.x = arena.clamp_x(f.x, FIGHTER_WIDTH);
        return false;
    }

    let mut landed = false;
    if f.vy > 0.0 {
        let body = f.body();
        if let Some(plat) = arena
            .platforms
            .iter()
            .find(|plat| body.intersects(plat) && feet_before <= plat.top())
        {
            f.y = plat.top();
            f.vy = 0.0;
            landed = true;
        }
    }

    if !landed && f.y >= arena.ground_y {
        f.y = arena.ground_y;
        f.vy = 0.0;
        landed = true;
    }

    f.on_ground = landed;
    if landed {
        f.air_dashes = f.stats.max_air_dashes;
    }

    f.x = arena.clamp_x(f.x, FIGHTER_WIDTH);
    landed
}

/// Fall straight onto the ground line, ignoring platforms. Used while dying.
pub fn settle_on_ground(f: &mut Fighter, arena: &Arena) {
    f.y += f.vy;
    if f.y >= arena.ground_y {
        f.y = arena.ground_y;
        f.vy = 0.0;
        f.on_ground = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena;
    use crate::fighter::FighterStats;
    use crate::types::Side;

    fn airborne(x: f64, y: f64) -> Fighter {
        let mut f = Fighter::new(Side::Player, x, GROUND_Y, FighterStats::default());
        f.y = y;
        f.on_ground = false;
        f
    }

    #[test]
    fn gravity_increases_vy() {
        let mut f = airborne(100.0, 300.0);
        apply_gravity(&mut f);
        assert_eq!(f.vy, GRAVITY);
    }

    #[test]
    fn ground_stops_fall() {
        let arena = arena::build(1);
        let mut f = airborne(100.0, 790.0);
        f.vy = 20.0;
        assert!(move_and_collide(&mut f, &arena));
        assert_eq!(f.y, GROUND_Y);
        assert_eq!(f.vy, 0.0);
        assert!(f.on_ground);
    }

    #[test]
    fn one_way_platform_from_above() {
        let arena = arena::build(1);
        let plat = arena.platforms[0];
        let mut f = airborne(plat.center().x, plat.top() - 5.0);
        f.air_dashes = 0;
        f.vy = 10.0;
        assert!(move_and_collide(&mut f, &arena));
        assert_eq!(f.y, plat.top());
        assert!(f.on_ground);
        assert_eq!(f.air_dashes, f.stats.max_air_dashes);
    }

    #[test]
    fn platform_ignored_when_starting_below_top() {
        let arena = arena::build(1);
        let plat = arena.platforms[0];
        let mut f = airborne(plat.center().x, plat.top() + 10.0);
        f.vy = 5.0;
        assert!(!move_and_collide(&mut f, &arena));
        assert!(!f.on_ground);
    }

    #[test]
    fn walking_off_a_platform_clears_ground() {
        let arena = arena::build(1);
        let plat = arena.platforms[0];
        let mut f = airborne(plat.left() - 20.0, plat.top());
        f.on_ground = true;
        apply_gravity(&mut f);
        assert!(!move_and_collide(&mut f, &arena));
        assert!(!f.on_ground);
    }

    #[test]
    fn landing_restores_air_dashes() {
        let arena = arena::build(1);
        let mut f = airborne(100.0, 795.0);
        f.air_dashes = 0;
        f.vy = 10.0;
        move_and_collide(&mut f, &arena);
        assert_eq!(f.air_dashes, BASE_AIR_DASHES);
    }

    #[test]
    fn clamps_to_screen() {
        let arena = arena::build(1);
        let mut f = airborne(10.0, GROUND_Y);
        f.vx = -50.0;
        move_and_collide(&mut f, &arena);
        assert_eq!(f.x, FIGHTER_WIDTH / 2.0);
    }
}
