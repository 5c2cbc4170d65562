use bevy::prelude::*;

/// The server sent `init_data`; `GameConfig` now holds its values.
#[derive(Event, Debug, Clone, Copy)]
pub struct WorldInitialized;

#[derive(Event, Debug, Clone)]
pub struct ServerErrorEvent {
    pub message: String,
}

#[derive(Event, Debug, Clone)]
pub struct SkillItemsEvent {
    pub requested_item_id: String,
    pub associated_item_ids: Vec<String>,
}
