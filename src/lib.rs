//! Space Invaders simulation core.
//!
//! - `entities`: pure data (bodies, alien grid, shields, the world snapshot)
//! - `geometry`: corner-sampling overlap tests
//! - `swarm`: enemy lateral/vertical motion policy
//! - `projectiles`: shot spawn, advance and expiry
//! - `collision`: pairwise damage resolution
//! - `compute`: the reducer folding commands over snapshots
//! - `input`: key edges to commands
//! - `config`: screen bounds and tuning

pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod geometry;
pub mod input;
pub mod projectiles;
pub mod swarm;

pub use compute::{init_state, reduce, run_commands};
pub use config::GameConfig;
pub use entities::{Command, GameState};
