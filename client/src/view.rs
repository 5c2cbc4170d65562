//! Turns tracked entities into sprite regions for the renderer.

use bevy::prelude::*;
use gridsync_protocol::assets::DirectionKey;
use gridsync_protocol::messages::{Direction, Mode, ObjectLayerSnapshot};

use crate::animation::{layer_priority, AnimationTracker, Owner};
use crate::assets::{to_rect, Fetcher, ItemAssets, TextureStore};
use crate::config::GameConfig;
use crate::world::{EntityState, WorldObject};

/// One atlas region to draw at a world position.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerSprite<H> {
    pub entity_id: String,
    pub item_id: String,
    pub texture: H,
    /// Source rectangle in atlas pixels.
    pub rect: Rect,
    /// Centre of the entity in world pixels.
    pub position: Vec2,
    pub size: Vec2,
    pub key: DirectionKey,
    pub frame_index: usize,
}

/// Borrowed state needed to compose sprites for one frame.
pub struct DrawContext<'a, S: TextureStore> {
    pub now: f64,
    pub config: &'a GameConfig,
    pub tracker: &'a mut AnimationTracker,
    pub assets: &'a mut ItemAssets<S::Handle>,
    pub fetcher: &'a dyn Fetcher,
    pub store: &'a mut S,
}

struct Placement<'e> {
    owner: Owner<'e>,
    pos: Vec2,
    dims: Vec2,
    direction: Direction,
    mode: Mode,
}

impl<S: TextureStore> DrawContext<'_, S> {
    pub fn compose_entity(&mut self, entity: &EntityState) -> Vec<LayerSprite<S::Handle>> {
        let placement = Placement {
            owner: Owner::entity(&entity.id),
            pos: entity.interp_pos,
            dims: entity.dims,
            direction: entity.direction,
            mode: entity.mode,
        };
        self.compose(placement, entity.active_layers())
    }

    pub fn compose_object(&mut self, object: &WorldObject) -> Vec<LayerSprite<S::Handle>> {
        let placement = Placement {
            owner: Owner::object(&object.id),
            pos: object.pos,
            dims: object.dims,
            direction: Direction::None,
            mode: Mode::Idle,
        };
        self.compose(placement, object.layers.iter().filter(|l| l.active))
    }

    /// Layers still loading, or whose assets failed, are left out.
    fn compose<'l>(
        &mut self,
        at: Placement<'_>,
        layers: impl Iterator<Item = &'l ObjectLayerSnapshot>,
    ) -> Vec<LayerSprite<S::Handle>> {
        let mut ready: Vec<_> = layers
            .filter_map(|layer| {
                let item = self.assets.item_metadata(&layer.item_id, self.fetcher)?;
                Some((layer_priority(&item.item_type), layer, item))
            })
            .collect();
        ready.sort_by_key(|(priority, _, _)| *priority);

        let position = self.config.to_pixels(at.pos);
        let size = at.dims * self.config.cell_size;
        let mut sprites = Vec::with_capacity(ready.len());
        for (_, layer, item) in ready {
            let atlas = self.assets.atlas(&layer.item_id, self.fetcher);
            let frame = self.tracker.advance(
                at.owner,
                &layer.item_id,
                at.direction,
                at.mode,
                self.now,
                Some(item.as_ref()),
                atlas.as_deref(),
            );
            let Some(atlas) = atlas else {
                continue;
            };
            let Some(texture) = self
                .assets
                .texture_handle(&layer.item_id, self.fetcher, &mut *self.store)
            else {
                continue;
            };
            let frames = atlas.frames_for(frame.key);
            if frames.is_empty() {
                continue;
            }
            sprites.push(LayerSprite {
                entity_id: at.owner.id.to_string(),
                item_id: layer.item_id.clone(),
                texture,
                rect: to_rect(&frames[frame.index % frames.len()]),
                position,
                size,
                key: frame.key,
                frame_index: frame.index,
            });
        }
        sprites
    }
}
