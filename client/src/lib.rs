//! Client side of the grid world: mirrors what the server says is visible,
//! moves it smoothly between snapshots and resolves the sprites to draw it
//! with.

pub mod actions;
pub mod animation;
pub mod assets;
pub mod components;
pub mod config;
pub mod decode;
pub mod events;
pub mod interpolate;
pub mod plugin;
pub mod resources;
pub mod systems;
pub mod view;
pub mod world;

pub use config::{ClientConfig, GameConfig};
pub use plugin::{SyncSet, WorldSyncPlugin};
pub use world::WorldState;
