//! Space Invaders - a deterministic arcade shooter engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (world state, collisions, reducer)
//! - `renderer`: Surface abstraction that mirrors a world state visually
//! - `platform`: Input mapping, timer sources and the demo autopilot
//! - `session`: Single-threaded event loop holding the current state
//! - `settings`: Player-facing configuration

pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use session::Session;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Width and height of the square playfield
    pub const CANVAS_SIZE: f32 = 600.0;

    /// Projectiles (both sides share radius and speed)
    pub const BULLET_RADIUS: f32 = 3.0;
    pub const BULLET_VELOCITY: f32 = 3.0;

    /// Player ship
    pub const SHIP_RADIUS: f32 = 10.0;
    /// Horizontal speed added per held movement key
    pub const SHIP_SPEED: f32 = 2.0;
    pub const STARTING_LIVES: i32 = 1;

    /// Enemy fleet layout
    pub const STARTING_ALIEN_ROWS: u32 = 1;
    pub const STARTING_ALIEN_COLUMNS: u32 = 23;
    pub const ALIEN_RADIUS: f32 = 6.0;
    pub const ALIEN_SPEED: f32 = 1.0;
    /// Speed multiplier applied when a single enemy remains
    pub const LAST_ALIEN_SPEEDUP: f32 = 3.0;
    /// Vertical offset of the first enemy row
    pub const ALIEN_TOP_MARGIN: f32 = 20.0;
    /// Enemies at or below this line (minus their radius) have broken through
    pub const ALIEN_BOUNDARY: f32 = 420.0;

    /// Per-enemy probability of firing on a sampling tick
    pub const CHANCE_TO_SHOOT: f64 = 0.01;
    /// Enemy fire is only sampled on ticks divisible by this
    pub const FIRE_SAMPLE_PERIOD: u64 = 10;

    /// Destructible cover
    pub const STARTING_WALL_COUNT: u32 = 5;
    pub const WALL_RADIUS: f32 = 40.0;
    pub const WALL_HEIGHT: f32 = 500.0;
    pub const HOLE_RADIUS: f32 = 10.0;

    pub const LEVEL_CAP: u32 = 5;

    /// Upgrade prices (in score points)
    pub const MULTISHOT_COST: u32 = 5;
    pub const BUY_LIFE_COST: u32 = 4;
    pub const PIERCING_ROUNDS_COST: u32 = 2;

    /// Timer period in milliseconds
    pub const TICK_PERIOD_MS: u64 = 10;
}
