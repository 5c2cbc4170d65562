use bevy::prelude::*;

use crate::resources::ErrorBanner;

pub fn tick_error_banner(time: Res<Time>, mut banner: ResMut<ErrorBanner>) {
    banner.tick(time.delta());
}
