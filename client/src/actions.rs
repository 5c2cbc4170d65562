//! Intents the client forwards to the server. The server decides what
//! actually happens.

use bevy::prelude::*;
use gridsync_protocol::messages::{ItemAction, PlayerAction, C2S};

use crate::resources::Outbox;
use crate::world::WorldState;

/// Asks to walk the main player to `target`, given in grid units. The target
/// is rounded to a cell and remembered as pending on the main player.
pub fn request_move(
    world: &mut WorldState,
    outbox: &mut Outbox,
    target: Vec2,
) -> Result<IVec2, serde_json::Error> {
    let cell = target.round().as_ivec2();
    outbox.push(&C2S::PlayerAction(PlayerAction {
        target_x: cell.x,
        target_y: cell.y,
    }))?;
    if let Some(main) = world.main_player.as_mut() {
        main.target = Some(cell.as_vec2());
    }
    Ok(cell)
}

pub fn set_item_active(
    outbox: &mut Outbox,
    item_id: &str,
    active: bool,
) -> Result<(), serde_json::Error> {
    outbox.push(&C2S::ItemAction(ItemAction {
        item_id: item_id.to_string(),
        activate: active,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_is_sent_in_whole_cells() {
        let mut world = WorldState::default();
        let mut outbox = Outbox::default();
        let cell = request_move(&mut world, &mut outbox, Vec2::new(3.4, 6.6)).unwrap();
        assert_eq!(cell, IVec2::new(3, 7));

        let frame: serde_json::Value = serde_json::from_str(&outbox.0[0]).unwrap();
        assert_eq!(frame["type"], "player_action");
        assert_eq!(frame["payload"]["targetX"], 3);
        assert_eq!(frame["payload"]["targetY"], 7);
    }

    #[test]
    fn item_toggle_is_queued() {
        let mut outbox = Outbox::default();
        set_item_active(&mut outbox, "sword", false).unwrap();
        let frame: serde_json::Value = serde_json::from_str(&outbox.0[0]).unwrap();
        assert_eq!(frame["type"], "item_action");
        assert_eq!(frame["payload"]["itemId"], "sword");
        assert_eq!(frame["payload"]["activate"], false);
    }
}
