//! ECS Systems for the territory simulation.
//!
//! Systems contain the game logic that operates on components. The engine
//! runs them as one chained group, so each tick executes them in this order:
//!
//! - `turret_aim_system` - sweeps turret aim
//! - `turret_fire_system` - fires turrets whose cadence elapsed
//! - `projectile_movement_system` - moves projectiles, retires strays
//! - `projectile_collision_system` - damage, capture and scoring
//! - `region_rebuild_system` - rebuilds merged regions when dirty
//! - `explosion_system` - expires explosion markers

pub mod clock;
pub mod combat;
pub mod movement;
pub mod serialization;
pub mod territory;

pub use clock::*;
pub use combat::*;
pub use movement::*;
pub use serialization::*;
pub use territory::*;
