// All values are per-tick at 60 Hz unless noted.

// Tick rate
pub const TICK_RATE: u32 = 60;

// Screen / arena
pub const SCREEN_WIDTH: f64 = 1600.0;
pub const SCREEN_HEIGHT: f64 = 900.0;
pub const GROUND_Y: f64 = 800.0;

// Match rules
pub const ROUND_DURATION_TICKS: u32 = 60 * TICK_RATE;
pub const MAX_LEVEL: u32 = 10;
/// Defeat animation length before a KO is turned into an outcome.
pub const KO_DELAY_TICKS: u32 = 60;
pub const TIMEOUT_DELAY_TICKS: u32 = 1;
pub const COOLDOWN_FLOOR: u32 = 30;
pub const POWER_UP_OFFERS: usize = 3;

// Fighter body
pub const FIGHTER_WIDTH: f64 = 50.0;
pub const FIGHTER_HEIGHT: f64 = 100.0;
pub const PLAYER_SPAWN_X: f64 = 200.0;
pub const OPPONENT_SPAWN_X: f64 = SCREEN_WIDTH - 200.0;

// Physics
pub const GRAVITY: f64 = 0.9;
pub const JUMP_POWER: f64 = 18.0;

// Baseline stats
pub const BASE_HEALTH: f64 = 100.0;
pub const BASE_DAMAGE: f64 = 10.0;
pub const BASE_SPEED: f64 = 7.0;
pub const BASE_FIREBALL_DAMAGE: f64 = 30.0;
pub const BASE_STOMP_DAMAGE: f64 = 15.0;
pub const BASE_ULTIMATE_DAMAGE: f64 = 75.0;
pub const MAX_ULT_CHARGE: u32 = 100;
pub const BASE_SPECIAL_COOLDOWN: u32 = 180;
pub const BASE_DASH_COOLDOWN: u32 = 60;
pub const BASE_TELEPORT_COOLDOWN: u32 = 120;
pub const BASE_AIR_DASHES: u32 = 1;

// Attacks: (active frames, cooldown)
pub const PUNCH_FRAMES: u32 = 15;
pub const PUNCH_COOLDOWN: u32 = 30;
pub const KICK_FRAMES: u32 = 20;
pub const KICK_COOLDOWN: u32 = 40;
pub const FIREBALL_CAST_FRAMES: u32 = 10;
pub const FIREBALL_CAST_COOLDOWN: u32 = 20;
/// Projectile leaves the hand when this many cast frames remain.
pub const FIREBALL_RELEASE_FRAME: u32 = 5;
pub const AIR_KICK_FRAMES: u32 = 20;
pub const AIR_KICK_COOLDOWN: u32 = 40;
pub const AIR_KICK_FALL_SPEED: f64 = 15.0;
pub const AIR_KICK_DRIFT: f64 = 3.0;
pub const GROUND_POUND_FRAMES: u32 = 30;
pub const GROUND_POUND_COOLDOWN: u32 = 30;
pub const GROUND_POUND_FALL_SPEED: f64 = 25.0;
pub const SHADOW_PUNCH_FRAMES: u32 = 5;
pub const COMBO_WINDOW_TICKS: u32 = 45;

// Damage intake
pub const BLOCK_DAMAGE_FACTOR: f64 = 0.2;
pub const HIT_STUN_TICKS: u32 = 15;
pub const KNOCKBACK_SPEED: f64 = 2.0;
pub const DYING_TICKS: u32 = 60;
pub const CRIT_MULTIPLIER: f64 = 2.0;

// Mobility
pub const DASH_TICKS: u32 = 10;
pub const DASH_SPEED: f64 = 25.0;
pub const DASH_TRAIL_INTERVAL: u32 = 2;
pub const TELEPORT_DISTANCE: f64 = 250.0;

// Ultimate (player: meteor slam)
pub const ULT_HOVER_Y: f64 = 100.0;
pub const ULT_CHARGE_UP_TICKS: u32 = 20;
pub const ULT_SPARK_INTERVAL: u32 = 5;
pub const ULT_SLAM_SPEED: f64 = 40.0;
pub const PLAYER_ULT_INVULN_TICKS: u32 = 120;
pub const ULT_MIN_INVULN_TICKS: u32 = 10;
pub const ULT_VICTIM_STUN_TICKS: u32 = 45;
pub const ULT_LAUNCH_VX: f64 = 25.0;
pub const ULT_LAUNCH_VY: f64 = -25.0;

// Ultimate (opponent: shadow barrage)
pub const BARRAGE_BEHIND_OFFSET: f64 = 60.0;
pub const BARRAGE_TICKS: u32 = 40;
pub const BARRAGE_STRIKE_INTERVAL: u32 = 8;
pub const BARRAGE_STRIKES: u32 = 5;
pub const OPPONENT_ULT_INVULN_TICKS: u32 = 60;
pub const SHADOW_PUNCH_DAMAGE_FACTOR: f64 = 0.75;

// Ultimate charge accrual
pub const CHARGE_MELEE: u32 = 10;
pub const CHARGE_STOMP: u32 = 15;
pub const CHARGE_PROJECTILE: u32 = 15;
pub const CHARGE_CRIT_BONUS: u32 = 5;
pub const CHARGE_SLAM_LANDED: u32 = 20;
pub const CHARGE_OPPONENT_HIT: u32 = 15;

// Ultimate aura
pub const AURA_DAMAGE_BONUS: f64 = 2.0;
pub const AURA_SPEED_BONUS: f64 = 0.5;

// Projectile
pub const PROJECTILE_SPEED: f64 = 12.0;
pub const PROJECTILE_RADIUS: f64 = 15.0;
