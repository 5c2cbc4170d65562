// Channel IDs
pub const CH_C2S: u8 = 0;
pub const CH_S2C: u8 = 1;

// init_data defaults, used when the server omits a field
pub const DEFAULT_GRID_W: u32 = 100;
pub const DEFAULT_GRID_H: u32 = 100;
pub const DEFAULT_CELL_SIZE: f32 = 12.0;
pub const DEFAULT_FPS: u32 = 60;
pub const DEFAULT_INTERPOLATION_MS: f32 = 200.0;
pub const DEFAULT_AOI_RADIUS: f32 = 15.0;
pub const DEFAULT_OBJECT_WIDTH: f32 = 1.0;
pub const DEFAULT_OBJECT_HEIGHT: f32 = 1.0;
pub const DEFAULT_CAMERA_SMOOTHING: f32 = 0.15;
pub const DEFAULT_CAMERA_ZOOM: f32 = 1.0;
pub const DEFAULT_SUM_STATS_LIMIT: u32 = 30;

// Per-entity limits
pub const MAX_OBJECT_LAYERS: usize = 20;
pub const MAX_PATH_POINTS: usize = 100;

// Animation
pub const DEFAULT_FRAME_DURATION_MS: u32 = 100;
