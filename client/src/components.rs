use bevy::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NetKind {
    MainPlayer,
    Player,
    Bot,
}

/// ECS mirror of a tracked entity. Its `Transform` follows the display
/// position.
#[derive(Component, Clone, Debug)]
pub struct NetEntity {
    pub id: String,
    pub kind: NetKind,
}

#[derive(Component)]
pub struct LocalPlayer;
