pub mod build_draw_list;
pub mod camera;
pub mod error_banner;
pub mod interpolate_entities;
pub mod network;
pub mod ping;
pub mod replay;
pub mod sync_net_entities;
#[cfg(feature = "quinnet")]
pub mod transport;
